//! Two-pass sweep that covers a set of intervals with [`Group`]s.
//!
//! Overlap is not transitive (A overlaps B, B overlaps C, A misses C), so a
//! single greedy pass can leave overlapping pairs in different groups. The
//! first pass cuts the sorted intervals into a chain of seed groups; the
//! second pass lets every interval join the seed groups that follow its own
//! for as long as their cores still overlap it. No group is created in the
//! second pass, so an overlapping pair can still be split when the later
//! interval's seed core has already shrunk away from the earlier one.

use svdb_core::models::GenomicSpan;
use tracing::debug;

use crate::errors::Result;
use crate::group::Group;

///
/// Group intervals into seed groups, then extend every interval into the
/// following groups whose core it overlaps, stopping at the first rejection.
///
/// Intervals are sorted by `(chrom, start, end)`, stable for ties. An interval
/// may end up in more than one group. Returns no groups for empty input.
///
pub fn group<T>(intervals: Vec<T>) -> Result<Vec<Group<T>>>
where
    T: GenomicSpan + Clone,
{
    let mut sorted = intervals;
    sorted.sort_by(|a, b| a.interval().cmp(b.interval()));

    // pass 1: chain of seed groups, remembering each interval's seed
    let mut groups: Vec<Group<T>> = Vec::new();
    let mut seeds: Vec<usize> = Vec::with_capacity(sorted.len());
    for interval in &sorted {
        match groups.last_mut() {
            Some(current) if current.accepts(interval) => current.add(interval.clone())?,
            _ => groups.push(Group::new(interval.clone())),
        }
        seeds.push(groups.len() - 1);
    }
    let n_seed_members: usize = groups.iter().map(Group::len).sum();

    // pass 2: extend membership forward through the following seed groups
    for (interval, &seed) in sorted.iter().zip(&seeds) {
        for candidate in groups[seed + 1..].iter_mut() {
            if !candidate.accepts(interval) {
                break;
            }
            candidate.add(interval.clone())?;
        }
    }

    debug!(
        intervals = sorted.len(),
        groups = groups.len(),
        extra_memberships = groups.iter().map(Group::len).sum::<usize>() - n_seed_members,
        "grouped intervals"
    );

    Ok(groups)
}
