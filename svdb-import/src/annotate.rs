//! Annotation of new catalog SVs against external reference catalogs.

use std::collections::HashMap;
use std::path::Path;

use svdb_carriers::catalog::Annotations;
use svdb_core::models::{Interval, Sv, SvType};

use crate::config::{AnnotationConfig, ReferenceConfig};
use crate::errors::{ImportError, Result};
use crate::io::read_bed_rows;

///
/// Something that can attach one named value to an SV. `None` means the
/// annotation does not apply to the call.
///
pub trait SvAnnotator: Send + Sync {
    fn name(&self) -> &str;
    fn annotate(&self, sv: &Sv) -> Option<u64>;
}

/// Run every annotator over `sv`.
pub fn annotate_sv(annotators: &[Box<dyn SvAnnotator>], sv: &Sv) -> Annotations {
    annotators
        .iter()
        .map(|annotator| (annotator.name().to_string(), annotator.annotate(sv)))
        .collect()
}

#[derive(Debug, Clone, PartialEq)]
struct ReferenceRecord {
    interval: Interval,
    sample_count: u64,
}

///
/// Reference intervals with a per-record sample count, e.g. one SV type of
/// dbVar. Records are kept sorted by start per chromosome.
///
#[derive(Debug, Clone, Default)]
pub struct ReferenceCounts {
    records: HashMap<String, Vec<ReferenceRecord>>,
    // longest record per chromosome, bounds how far back a query must look
    max_len: HashMap<String, u32>,
}

impl ReferenceCounts {
    pub fn new(records: impl IntoIterator<Item = (Interval, u64)>) -> Self {
        let mut counts = ReferenceCounts::default();
        for (interval, sample_count) in records {
            let longest = counts
                .max_len
                .entry(interval.chrom().to_string())
                .or_default();
            *longest = (*longest).max(interval.size());
            counts
                .records
                .entry(interval.chrom().to_string())
                .or_default()
                .push(ReferenceRecord {
                    interval,
                    sample_count,
                });
        }
        for records in counts.records.values_mut() {
            records.sort_by(|a, b| a.interval.cmp(&b.interval));
        }
        counts
    }

    /// Read `chrom start end sample_count` rows; further columns are ignored.
    pub fn from_path(path: &Path) -> Result<Self> {
        let mut records = vec![];
        for (line, interval, rest) in read_bed_rows(path)? {
            let sample_count = rest
                .first()
                .and_then(|field| field.trim().parse::<u64>().ok())
                .ok_or_else(|| ImportError::MalformedLine {
                    line,
                    reason: format!("missing or invalid sample_count for {interval}"),
                })?;
            records.push((interval, sample_count));
        }
        Ok(ReferenceCounts::new(records))
    }

    pub fn len(&self) -> usize {
        self.records.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    ///
    /// Sum of `sample_count` over the records within `cutoff` of `query`.
    /// Records that do not overlap the query never count.
    ///
    pub fn count(&self, query: &Interval, cutoff: f64) -> u64 {
        let (Some(records), Some(&reach)) = (
            self.records.get(query.chrom()),
            self.max_len.get(query.chrom()),
        ) else {
            return 0;
        };

        let lowest_start = query.start().saturating_sub(reach);
        let first = records.partition_point(|r| r.interval.start() < lowest_start);

        records[first..]
            .iter()
            .take_while(|r| r.interval.start() <= query.end())
            .filter(|r| {
                r.interval
                    .distance(query)
                    .is_some_and(|distance| distance <= cutoff)
            })
            .map(|r| r.sample_count)
            .sum()
    }
}

///
/// Counts from one named reference, stored as `{name}_count`. Inversions
/// are never annotated, and neither are types without a table.
///
#[derive(Debug, Clone)]
pub struct ReferenceAnnotator {
    key: String,
    cutoff: f64,
    tables: HashMap<SvType, ReferenceCounts>,
}

impl ReferenceAnnotator {
    pub fn new(name: &str, cutoff: f64, tables: HashMap<SvType, ReferenceCounts>) -> Self {
        ReferenceAnnotator {
            key: format!("{name}_count"),
            cutoff,
            tables,
        }
    }

    pub fn from_config(reference: &ReferenceConfig, cutoff: f64) -> Result<Self> {
        let mut tables = HashMap::new();
        for (sv_type, path) in &reference.tables {
            tables.insert(*sv_type, ReferenceCounts::from_path(path)?);
        }
        Ok(ReferenceAnnotator::new(&reference.name, cutoff, tables))
    }
}

impl SvAnnotator for ReferenceAnnotator {
    fn name(&self) -> &str {
        &self.key
    }

    fn annotate(&self, sv: &Sv) -> Option<u64> {
        if sv.sv_type == SvType::Inv {
            return None;
        }
        self.tables
            .get(&sv.sv_type)
            .map(|table| table.count(&sv.interval, self.cutoff))
    }
}

/// Load every reference named in the config.
pub fn build_annotators(config: &AnnotationConfig) -> Result<Vec<Box<dyn SvAnnotator>>> {
    config
        .references
        .iter()
        .map(|reference| {
            ReferenceAnnotator::from_config(reference, config.distance)
                .map(|annotator| Box::new(annotator) as Box<dyn SvAnnotator>)
        })
        .collect()
}
