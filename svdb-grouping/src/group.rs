//! A [`Group`] accumulates intervals that are believed to be evidence of the
//! same event.
//!
//! Every member shares a positive length with every other member: an
//! interval is only admitted while it overlaps the current *core* (the
//! intersection of all members so far), so the core never collapses.

use std::cmp::{Ordering, max, min};
use std::collections::{BTreeMap, HashMap};
use std::fmt::{self, Display};

use ndarray::Array2;
use svdb_core::models::{GenomicSpan, Interval};
use tracing::debug;

use crate::dbscan::dbscan;
use crate::errors::{GroupError, Result};

/// DBSCAN `min_samples` used when splitting a group into sub-events.
pub const MIN_SAMPLES: usize = 2;

/// Running sums for the mean and population standard deviation of member
/// coordinates. Integer sums keep the result independent of insertion order.
#[derive(Debug, Clone, Copy, Default)]
struct Moments {
    n: u64,
    sum: u128,
    sum_sq: u128,
}

impl Moments {
    fn push(&mut self, x: u32) {
        let x = x as u128;
        self.n += 1;
        self.sum += x;
        self.sum_sq += x * x;
    }

    fn mean(&self) -> f64 {
        self.sum as f64 / self.n as f64
    }

    /// Mean rounded half-to-even.
    fn rounded_mean(&self) -> u32 {
        self.mean().round_ties_even() as u32
    }

    fn population_stdev(&self) -> f64 {
        let n = self.n as u128;
        let spread = n * self.sum_sq - self.sum * self.sum;
        (spread as f64).sqrt() / self.n as f64
    }
}

/// Mean and population standard deviation of a set of distances.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DistanceSummary {
    pub mean: f64,
    pub stdev: f64,
}

impl DistanceSummary {
    fn from_values(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let n = values.len() as f64;
        let mean = values.iter().sum::<f64>() / n;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
        Some(DistanceSummary {
            mean,
            stdev: variance.sqrt(),
        })
    }
}

///
/// IoU distance between two spans given as `(start, size)`.
///
/// Unlike [`Interval::distance`] this never returns "undefined": spans that
/// do not touch get a distance above one, which is what a precomputed
/// distance matrix needs.
///
pub fn span_distance(u: (u32, u32), v: (u32, u32)) -> f64 {
    let (u_start, u_end) = (u.0 as i64, u.0 as i64 + u.1 as i64);
    let (v_start, v_end) = (v.0 as i64, v.0 as i64 + v.1 as i64);
    let union = max(u_end, v_end) - min(u_start, v_start);
    if union == 0 {
        return 0.0;
    }
    1.0 - (min(u_end, v_end) - max(u_start, v_start)) as f64 / union as f64
}

/// A non-empty, sorted collection of mutually overlapping intervals plus
/// their summary intervals.
#[derive(Debug, Clone)]
pub struct Group<T> {
    members: Vec<T>,
    loose: Interval,
    core: Interval,
    mean: Interval,
    starts: Moments,
    ends: Moments,
}

impl<T: GenomicSpan> Group<T> {
    /// Start a new group from its first member.
    pub fn new(first: T) -> Self {
        let span = first.interval().clone();
        let mut starts = Moments::default();
        let mut ends = Moments::default();
        starts.push(span.start());
        ends.push(span.end());

        Group {
            members: vec![first],
            loose: span.clone(),
            core: span.clone(),
            mean: span,
            starts,
            ends,
        }
    }

    /// Whether `candidate` overlaps the current core.
    pub fn accepts(&self, candidate: &impl GenomicSpan) -> bool {
        self.core.overlaps(candidate.interval())
    }

    ///
    /// Admit a new member and refresh the summary intervals.
    ///
    /// Fails with [`GroupError::InvalidGroupMembership`] if the member does
    /// not overlap the current core; the group is left untouched.
    ///
    pub fn add(&mut self, member: T) -> Result<()> {
        let span = member.interval();
        if !self.accepts(span) {
            return Err(GroupError::InvalidGroupMembership {
                interval: span.name(),
                core: self.core.name(),
            });
        }

        let chrom = self.core.chrom().to_string();
        self.loose = Interval::new(
            chrom.as_str(),
            min(self.loose.start(), span.start()),
            max(self.loose.end(), span.end()),
        )?;
        self.core = Interval::new(
            chrom.as_str(),
            max(self.core.start(), span.start()),
            min(self.core.end(), span.end()),
        )?;
        self.starts.push(span.start());
        self.ends.push(span.end());
        self.mean = Interval::new(
            chrom,
            self.starts.rounded_mean(),
            self.ends.rounded_mean(),
        )?;

        // insert after any equal members so the list stays stably sorted
        let idx = self
            .members
            .partition_point(|m| m.interval() <= member.interval());
        self.members.insert(idx, member);

        Ok(())
    }

    pub fn members(&self) -> &[T] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn chrom(&self) -> &str {
        self.core.chrom()
    }

    /// Union bounding box of all members.
    pub fn loose_interval(&self) -> &Interval {
        &self.loose
    }

    /// Intersection of all members.
    pub fn core_interval(&self) -> &Interval {
        &self.core
    }

    /// Rounded mean start and end of all members.
    pub fn mean_interval(&self) -> &Interval {
        &self.mean
    }

    pub fn core_name(&self) -> String {
        self.core.name()
    }

    pub fn mean_name(&self) -> String {
        self.mean.name()
    }

    pub fn stdev_start(&self) -> f64 {
        self.starts.population_stdev()
    }

    pub fn stdev_end(&self) -> f64 {
        self.ends.population_stdev()
    }

    pub fn mean_distance_to_core_interval(&self) -> DistanceSummary {
        self.mean_distance_to(&self.core)
    }

    pub fn mean_distance_to_mean_interval(&self) -> DistanceSummary {
        self.mean_distance_to(&self.mean)
    }

    fn mean_distance_to(&self, reference: &Interval) -> DistanceSummary {
        let distances: Vec<f64> = self
            .members
            .iter()
            .filter_map(|m| reference.distance(m.interval()))
            .collect();

        // every member overlaps the core, and the mean interval contains it
        DistanceSummary::from_values(&distances).unwrap_or(DistanceSummary {
            mean: f64::NAN,
            stdev: f64::NAN,
        })
    }

    /// Pairwise [`span_distance`] between all members, in member order.
    pub fn distance_matrix(&self) -> Array2<f64> {
        let spans: Vec<(u32, u32)> = self
            .members
            .iter()
            .map(|m| (m.interval().start(), m.interval().size()))
            .collect();
        let n = spans.len();

        Array2::from_shape_fn((n, n), |(i, j)| span_distance(spans[i], spans[j]))
    }

    ///
    /// Split the group into tighter sub-events with DBSCAN.
    ///
    /// `eps` is the distance cutoff; `min_samples` is [`MIN_SAMPLES`]. Each
    /// noise member becomes a singleton group, each cluster becomes one group
    /// built through [`Group::add`]. The result is keyed by core name;
    /// clusters are built in label order, then noise singletons, and on a
    /// core-name collision the one built last wins.
    ///
    pub fn cluster(&self, eps: f64) -> Result<BTreeMap<String, Group<T>>>
    where
        T: Clone,
    {
        let labels = dbscan(&self.distance_matrix(), eps, MIN_SAMPLES);

        let mut noise: Vec<&T> = Vec::new();
        let mut clusters: BTreeMap<usize, Vec<&T>> = BTreeMap::new();
        for (member, label) in self.members.iter().zip(labels) {
            match label {
                Some(label) => clusters.entry(label).or_default().push(member),
                None => noise.push(member),
            }
        }

        let mut sub_groups = BTreeMap::new();
        for members in clusters.into_values() {
            let mut members = members.into_iter();
            let Some(first) = members.next() else {
                continue;
            };
            let mut group = Group::new(first.clone());
            for member in members {
                group.add(member.clone())?;
            }
            sub_groups.insert(group.core_name(), group);
        }
        // noise goes last and wins a core-name collision
        for member in noise {
            let group = Group::new(member.clone());
            sub_groups.insert(group.core_name(), group);
        }

        debug!(
            core = %self.core,
            members = self.members.len(),
            sub_groups = sub_groups.len(),
            "clustered group"
        );

        Ok(sub_groups)
    }

    /// Number of members per distinct interval name.
    pub fn member_counts(&self) -> HashMap<String, usize> {
        let mut counts = HashMap::new();
        for member in &self.members {
            *counts.entry(member.interval().name()).or_insert(0) += 1;
        }
        counts
    }
}

impl<T> PartialEq for Group<T> {
    fn eq(&self, other: &Self) -> bool {
        self.core == other.core
    }
}

impl<T> Eq for Group<T> {}

impl<T> PartialOrd for Group<T> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<T> Ord for Group<T> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.core.cmp(&other.core)
    }
}

impl<T: GenomicSpan> Display for Group<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "loose interval: {}", self.loose)?;
        writeln!(f, "core interval: {}", self.core)?;
        writeln!(f, "mean interval: {}", self.mean)?;
        writeln!(f, "stdev start: {}", self.stdev_start())?;
        writeln!(f, "stdev end: {}", self.stdev_end())?;
        let names: Vec<String> = self.members.iter().map(|m| m.interval().name()).collect();
        writeln!(f, "intervals: [{}]", names.join(", "))
    }
}
