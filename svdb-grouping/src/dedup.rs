//! Priority-ordered pairwise deduplication of calls within one group.
//!
//! Calls are ranked by `(filter != PASS, source is deprioritized)`; lower
//! ranks are kept in preference. Walking the ranked list, every surviving
//! call marks each later call within the distance cutoff as redundant. A call
//! that has already been marked never marks anything itself, so redundancy is
//! not transitively closed.

use std::collections::HashSet;

use svdb_core::models::{CallId, Filter, GenomicSpan, Sv};

use crate::group::Group;

/// A call that carries enough provenance to be ranked.
pub trait CallEvidence: GenomicSpan {
    fn filter(&self) -> &Filter;
    fn source(&self) -> &str;
    fn call_id(&self) -> CallId;
}

impl CallEvidence for Sv {
    fn filter(&self) -> &Filter {
        &self.filter
    }

    fn source(&self) -> &str {
        &self.source
    }

    fn call_id(&self) -> CallId {
        Sv::call_id(self)
    }
}

/// Which calls to keep when two calls describe the same event.
///
/// `PASS` calls always outrank filtered calls; among calls with the same
/// filter status, calls from a source in `deprioritized_sources` rank last.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct PriorityPolicy {
    pub deprioritized_sources: Vec<String>,
}

impl Default for PriorityPolicy {
    fn default() -> Self {
        // canvas systematically over-calls breakpoint extents
        PriorityPolicy {
            deprioritized_sources: vec!["canvas".to_string()],
        }
    }
}

impl PriorityPolicy {
    /// Sort key for a call; `(false, false)` is the most preferred.
    pub fn rank<T: CallEvidence>(&self, call: &T) -> (bool, bool) {
        let deprioritized = self
            .deprioritized_sources
            .iter()
            .any(|source| source == call.source());
        (!call.filter().is_pass(), deprioritized)
    }

    /// Calls in retention order. The sort is stable, ties keep input order.
    pub fn order<'a, T: CallEvidence>(&self, calls: &'a [T]) -> Vec<&'a T> {
        let mut ordered: Vec<&T> = calls.iter().collect();
        ordered.sort_by_key(|call| self.rank(*call));
        ordered
    }
}

///
/// Identify the redundant calls among `calls`.
///
/// A call is redundant when an earlier, not yet redundant call in priority
/// order lies within `cutoff` of it. Pairs without a defined distance
/// (different chromosomes, disjoint spans) are never duplicates.
///
pub fn find_redundant<T: CallEvidence>(
    calls: &[T],
    cutoff: f64,
    policy: &PriorityPolicy,
) -> HashSet<CallId> {
    let ordered = policy.order(calls);
    let mut redundant: HashSet<CallId> = HashSet::new();

    for (i, kept) in ordered.iter().enumerate() {
        if redundant.contains(&kept.call_id()) {
            continue;
        }
        for other in &ordered[i + 1..] {
            let other_id = other.call_id();
            if redundant.contains(&other_id) {
                continue;
            }
            match kept.interval().distance(other.interval()) {
                Some(distance) if distance <= cutoff => {
                    redundant.insert(other_id);
                }
                _ => {}
            }
        }
    }

    redundant
}

/// [`find_redundant`] over the members of one group.
pub fn deduplicate<T: CallEvidence>(
    group: &Group<T>,
    cutoff: f64,
    policy: &PriorityPolicy,
) -> HashSet<CallId> {
    find_redundant(group.members(), cutoff, policy)
}
