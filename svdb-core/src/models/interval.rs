use std::cmp::{max, min};
use std::fmt::{self, Display};

use crate::errors::{IntervalError, Result};

/// Represent a genomic span `[start, end)` on one chromosome.
/// Inclusive start, exclusive of end.
///
/// Ordering is lexicographic on `(chrom, start, end)`. Chromosome names are
/// compared as plain strings, so `chr10` sorts before `chr2`.
#[derive(Eq, PartialEq, Hash, Debug, Clone, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct Interval {
    chrom: String,
    start: u32,
    end: u32,
}

impl Interval {
    ///
    /// Create a new interval, rejecting spans whose end lies before their start.
    ///
    pub fn new(chrom: impl Into<String>, start: u32, end: u32) -> Result<Self> {
        let chrom = chrom.into();
        if end < start {
            return Err(IntervalError::InvalidSpan { chrom, start, end });
        }
        Ok(Interval { chrom, start, end })
    }

    pub fn chrom(&self) -> &str {
        &self.chrom
    }

    pub fn start(&self) -> u32 {
        self.start
    }

    pub fn end(&self) -> u32 {
        self.end
    }

    pub fn size(&self) -> u32 {
        self.end - self.start
    }

    ///
    /// Canonical name, `{chrom}-{start}-{end}`
    ///
    pub fn name(&self) -> String {
        format!("{}-{}-{}", self.chrom, self.start, self.end)
    }

    /// Length of the smallest span covering both intervals.
    ///
    /// Only meaningful when both intervals sit on the same chromosome.
    #[inline]
    pub fn union_size(&self, other: &Interval) -> u32 {
        max(self.end, other.end) - min(self.start, other.start)
    }

    /// Signed length of the shared span. Negative when the intervals are
    /// separated by a gap, zero when they abut.
    #[inline]
    pub fn intersect(&self, other: &Interval) -> i64 {
        min(self.end, other.end) as i64 - max(self.start, other.start) as i64
    }

    /// Check if two intervals share a positive length on the same chromosome.
    ///
    /// The test is `union < size_a + size_b`, so a zero-length interval never
    /// overlaps anything, not even itself.
    #[inline]
    pub fn overlaps(&self, other: &Interval) -> bool {
        if self.chrom != other.chrom {
            return false;
        }
        let total_size = self.size() as u64 + other.size() as u64;
        total_size > self.union_size(other) as u64
    }

    /// IoU distance: `1 - intersection / union`.
    ///
    /// Returns `None` for intervals on different chromosomes and for intervals
    /// separated by a gap. Abutting intervals are at distance `1.0`; two
    /// coincident zero-length intervals are at distance `0.0`.
    pub fn distance(&self, other: &Interval) -> Option<f64> {
        if self.chrom != other.chrom {
            return None;
        }
        let intersection = self.intersect(other);
        if intersection < 0 {
            return None;
        }
        let union = self.union_size(other);
        if union == 0 {
            return Some(0.0);
        }
        Some(1.0 - intersection as f64 / union as f64)
    }
}

impl Display for Interval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}-{}", self.chrom, self.start, self.end)
    }
}
