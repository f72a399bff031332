//! Core models for svdb.
//!
//! This crate holds the geometric primitive every other svdb crate works on,
//! [`Interval`](models::Interval), together with the typed structural-variant
//! call [`Sv`](models::Sv) produced by the caller-translation layer.
//!
//! ## Similarity
//!
//! Two intervals are considered to *overlap* when their union is strictly
//! shorter than the sum of their sizes, and their *distance* is
//! `1 - intersection / union` (IoU distance). Both are undefined across
//! chromosomes.
//!
//! ```rust
//! use svdb_core::models::Interval;
//!
//! let a = Interval::new("chr1", 100, 200).unwrap();
//! let b = Interval::new("chr1", 150, 250).unwrap();
//!
//! assert!(a.overlaps(&b));
//! assert!((a.distance(&b).unwrap() - (1.0 - 50.0 / 150.0)).abs() < 1e-12);
//! ```
pub mod errors;
pub mod models;

pub use errors::IntervalError;
