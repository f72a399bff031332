//! The cohort catalog and the carrier aggregator.
//!
//! [`Catalog`] is the store the importer writes into: distinct SVs keyed by
//! name, patients with their family, and one row per patient call.
//! [`annotate_carriers`] runs once over the finished catalog and stores, for
//! every SV, the number of distinct families carrying a similar SV of the
//! same type.
//!
//! ```rust
//! use svdb_carriers::{Catalog, MemoryCatalog, count_carriers};
//! use svdb_carriers::catalog::PatientSv;
//! use svdb_core::models::{Filter, Genotype, Interval, Sv, SvType};
//!
//! let mut catalog = MemoryCatalog::new();
//! for (patient, family, start, end) in [("P1", "F1", 1000, 2000), ("P2", "F2", 1010, 1990)] {
//!     let patient_id = catalog.insert_patient(patient, family);
//!     let sv = Sv::new(
//!         Interval::new("chr2", start, end).unwrap(),
//!         SvType::Loss,
//!         Filter::Pass,
//!         "manta",
//!         patient,
//!         Genotype::Het,
//!     );
//!     let sv_id = catalog.insert_if_absent(&sv);
//!     catalog
//!         .insert_patient_sv(PatientSv {
//!             patient_id,
//!             sv_id,
//!             genotype: sv.genotype,
//!             vcf_id: sv.vcf_id.clone(),
//!             source: sv.source.clone(),
//!             filter: sv.filter.clone(),
//!             is_duplicate: false,
//!         })
//!         .unwrap();
//! }
//!
//! let query = Interval::new("chr2", 1000, 2000).unwrap();
//! assert_eq!(count_carriers(&catalog, &query, SvType::Loss, 0.1).unwrap(), 2);
//! ```
pub mod aggregator;
pub mod catalog;
pub mod errors;

// re-exports
pub use self::aggregator::{SearchWindow, annotate_carriers, count_carriers, similarity};
pub use self::catalog::{Catalog, MemoryCatalog};
pub use self::errors::CarrierError;
