//! Cohort import for svdb.
//!
//! Reads a YAML [`ImportConfig`], a patient table and a table of typed calls,
//! then groups and deduplicates every patient's calls, fills a
//! [`Catalog`](svdb_carriers::Catalog) and finishes with the carrier count
//! pass. Results are written back out as TSV.
//!
//! ```no_run
//! use std::fs::File;
//! use std::path::Path;
//!
//! use svdb_carriers::MemoryCatalog;
//! use svdb_import::{ImportConfig, build_annotators, import_cohort, read_calls, read_patients, write_catalog};
//!
//! let config = ImportConfig::try_from(Path::new("config.yml")).unwrap();
//! let annotators = build_annotators(&config.annotation).unwrap();
//! let patients = read_patients(Path::new("patients.tsv")).unwrap();
//! let calls = read_calls(Path::new("calls.tsv.gz")).unwrap();
//!
//! let mut catalog = MemoryCatalog::new();
//! import_cohort(&mut catalog, &patients, calls, &config, &annotators).unwrap();
//! write_catalog(&catalog, File::create("catalog.tsv").unwrap()).unwrap();
//! ```
pub mod annotate;
pub mod config;
pub mod errors;
pub mod importer;
pub mod io;

// re-exports
pub use self::annotate::{ReferenceAnnotator, ReferenceCounts, SvAnnotator, build_annotators};
pub use self::config::ImportConfig;
pub use self::errors::ImportError;
pub use self::importer::{ImportSummary, import_cohort, import_patient, plan_patient};
pub use self::io::{
    PatientRecord, read_bed_intervals, read_calls, read_patients, write_catalog, write_patient_svs,
};
