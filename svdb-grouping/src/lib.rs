//! Interval grouping, sub-clustering and call deduplication.
//!
//! The pieces, leaf first:
//!
//! - [`Group`]: a sorted set of mutually overlapping intervals with its loose
//!   (union), core (intersection) and mean intervals.
//! - [`group`](sweep::group): a two-pass sweep covering an unordered set of
//!   intervals with groups; each interval joins the following groups whose
//!   core it overlaps, up to the first that rejects it.
//! - [`Group::cluster`]: DBSCAN over the pairwise IoU distance matrix, to split
//!   a chained group into tighter sub-events.
//! - [`deduplicate`](dedup::deduplicate): marks calls that duplicate a
//!   higher-priority call in the same group.
//!
//! ```rust
//! use svdb_core::models::Interval;
//! use svdb_grouping::group;
//!
//! let intervals = vec![
//!     Interval::new("chr1", 100, 200).unwrap(),
//!     Interval::new("chr1", 150, 250).unwrap(),
//!     Interval::new("chr1", 900, 1000).unwrap(),
//! ];
//!
//! let groups = group(intervals).unwrap();
//! assert_eq!(groups.len(), 2);
//! assert_eq!(groups[0].core_name(), "chr1-150-200");
//! ```
pub mod dbscan;
pub mod dedup;
pub mod errors;
pub mod group;
pub mod sweep;

// re-exports
pub use self::dedup::{CallEvidence, PriorityPolicy, deduplicate, find_redundant};
pub use self::errors::GroupError;
pub use self::group::{DistanceSummary, Group};
pub use self::sweep::group;
