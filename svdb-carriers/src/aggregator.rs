use std::collections::HashSet;
use std::ops::RangeInclusive;

use rayon::prelude::*;
use tracing::{debug, info};

use svdb_core::models::{Interval, SvType};

use crate::catalog::{Catalog, SvId, SvRecord};
use crate::errors::{CarrierError, Result};

/// Write-back progress is logged every this many rows.
const PROGRESS_EVERY: usize = 10_000;

/// Reject cutoffs outside `[0, 1)`; `NaN` is rejected too.
pub fn validate_cutoff(cutoff: f64) -> Result<()> {
    if (0.0..1.0).contains(&cutoff) {
        Ok(())
    } else {
        Err(CarrierError::InvalidCutoff(cutoff))
    }
}

///
/// Bounds on the start and end of any interval whose similarity to a query
/// can reach `1 - cutoff`.
///
/// A similar interval can extend past a query edge by at most
/// `S * (1 / (1 - d) - 1)` and fall short of it by at most `S * d`, where `S`
/// is the query size. Bounds are rounded inwards to whole coordinates, so the
/// query's own coordinates always lie inside the window.
///
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchWindow {
    pub start: RangeInclusive<u32>,
    pub end: RangeInclusive<u32>,
}

impl SearchWindow {
    pub fn around(query: &Interval, cutoff: f64) -> Self {
        let size = query.size() as f64;
        let shrink = size * cutoff;
        let grow = size * (1.0 / (1.0 - cutoff) - 1.0);

        let start = query.start() as f64;
        let end = query.end() as f64;

        SearchWindow {
            start: lower_bound(start - grow)..=upper_bound(start + shrink),
            end: lower_bound(end - shrink)..=upper_bound(end + grow),
        }
    }
}

fn lower_bound(x: f64) -> u32 {
    x.ceil().clamp(0.0, u32::MAX as f64) as u32
}

fn upper_bound(x: f64) -> u32 {
    x.floor().clamp(0.0, u32::MAX as f64) as u32
}

/// IoU of `query` and the span `[start, end)`. Two coincident zero-length
/// spans are identical, so an empty union counts as similarity 1.
pub fn similarity(query: &Interval, start: u32, end: u32) -> f64 {
    let union = query.end().max(end) as i64 - query.start().min(start) as i64;
    if union == 0 {
        return 1.0;
    }
    let intersection = query.end().min(end) as i64 - query.start().max(start) as i64;
    intersection as f64 / union as f64
}

///
/// Count the distinct families carrying an SV of `sv_type` similar to `query`.
///
/// Candidates come from an index-backed [`Catalog::range_query`] over the
/// [`SearchWindow`]; only those with `similarity >= 1 - cutoff` are kept. The
/// query's own carriers count too.
///
pub fn count_carriers<C: Catalog + ?Sized>(
    catalog: &C,
    query: &Interval,
    sv_type: SvType,
    cutoff: f64,
) -> Result<usize> {
    validate_cutoff(cutoff)?;

    let window = SearchWindow::around(query, cutoff);
    let min_similarity = 1.0 - cutoff;

    let families: HashSet<&str> = catalog
        .range_query(query.chrom(), sv_type, window.start, window.end)
        .filter(|hit| similarity(query, hit.start, hit.end) >= min_similarity)
        .map(|hit| hit.family_id)
        .collect();

    Ok(families.len())
}

///
/// Compute and store the carrier count of every catalog SV.
///
/// Must run after every patient is imported: the counts depend on the whole
/// catalog. Counting is read-only and runs in parallel; the write-back is a
/// single sequential pass. Returns the number of rows updated.
///
pub fn annotate_carriers<C>(catalog: &mut C, cutoff: f64) -> Result<usize>
where
    C: Catalog + Sync,
{
    validate_cutoff(cutoff)?;

    let counts: Vec<(SvId, usize)> = {
        let reader: &C = catalog;
        let records: Vec<&SvRecord> = reader.svs().collect();
        records
            .par_iter()
            .map(|record| {
                count_carriers(reader, &record.interval, record.sv_type, cutoff)
                    .map(|count| (record.id, count))
            })
            .collect::<Result<Vec<_>>>()?
    };

    let total = counts.len();
    info!(total, cutoff, "writing carrier counts");

    for (done, (id, count)) in counts.into_iter().enumerate() {
        debug!(sv_id = id, count, "carrier count");
        catalog.update_carrier_count(id, count)?;
        if (done + 1) % PROGRESS_EVERY == 0 {
            info!(done = done + 1, total, "carrier counts written");
        }
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;

    use pretty_assertions::assert_eq;
    use rstest::{fixture, rstest};
    use svdb_core::models::{Filter, Genotype, Sv};

    use crate::catalog::{MemoryCatalog, PatientSv};

    fn add_call(
        catalog: &mut MemoryCatalog,
        patient: &str,
        family: &str,
        interval: (u32, u32),
        sv_type: SvType,
    ) -> SvId {
        let patient_id = catalog.insert_patient(patient, family);
        let sv = Sv::new(
            Interval::new("chr2", interval.0, interval.1).unwrap(),
            sv_type,
            Filter::Pass,
            "manta",
            format!("{patient}-{}", interval.0),
            Genotype::Het,
        );
        let sv_id = catalog.insert_if_absent(&sv);
        catalog
            .insert_patient_sv(PatientSv {
                patient_id,
                sv_id,
                genotype: sv.genotype,
                vcf_id: sv.vcf_id.clone(),
                source: sv.source.clone(),
                filter: sv.filter.clone(),
                is_duplicate: false,
            })
            .unwrap();
        sv_id
    }

    #[fixture]
    fn cohort() -> MemoryCatalog {
        let mut catalog = MemoryCatalog::new();
        add_call(&mut catalog, "P1", "F1", (1000, 2000), SvType::Loss);
        add_call(&mut catalog, "P2", "F2", (1010, 1990), SvType::Loss);
        // same family as P2, so never counted twice
        add_call(&mut catalog, "P3", "F2", (1000, 2000), SvType::Loss);
        // dissimilar and a different type
        add_call(&mut catalog, "P4", "F4", (1000, 1500), SvType::Loss);
        add_call(&mut catalog, "P5", "F5", (1000, 2000), SvType::Gain);
        catalog
    }

    #[rstest]
    #[case(0.0, 1000..=1000, 2000..=2000)]
    #[case(0.1, 889..=1100, 1900..=2111)]
    #[case(0.5, 0..=1500, 1500..=3000)]
    fn test_search_window(
        #[case] cutoff: f64,
        #[case] start: RangeInclusive<u32>,
        #[case] end: RangeInclusive<u32>,
    ) {
        let query = Interval::new("chr2", 1000, 2000).unwrap();
        assert_eq!(SearchWindow::around(&query, cutoff), SearchWindow { start, end });
    }

    #[rstest]
    fn test_search_window_clamps_at_zero() {
        let query = Interval::new("chr2", 10, 110).unwrap();
        let window = SearchWindow::around(&query, 0.5);
        assert_eq!(*window.start.start(), 0);
    }

    #[rstest]
    #[case((1000, 2000), (1010, 1990), 0.98)]
    #[case((1000, 2000), (1000, 2000), 1.0)]
    #[case((1000, 2000), (2000, 3000), 0.0)]
    #[case((5, 5), (5, 5), 1.0)]
    fn test_similarity(#[case] q: (u32, u32), #[case] c: (u32, u32), #[case] expected: f64) {
        let query = Interval::new("chr2", q.0, q.1).unwrap();
        assert!((similarity(&query, c.0, c.1) - expected).abs() < 1e-9);
    }

    #[rstest]
    fn test_count_carriers_counts_distinct_families(cohort: MemoryCatalog) {
        let query = Interval::new("chr2", 1000, 2000).unwrap();
        assert_eq!(count_carriers(&cohort, &query, SvType::Loss, 0.1).unwrap(), 2);
        assert_eq!(count_carriers(&cohort, &query, SvType::Gain, 0.1).unwrap(), 1);
        assert_eq!(count_carriers(&cohort, &query, SvType::Inv, 0.1).unwrap(), 0);
    }

    #[rstest]
    fn test_count_carriers_exact_cutoff(cohort: MemoryCatalog) {
        // only exact matches: P1 (F1) and P3 (F2)
        let query = Interval::new("chr2", 1000, 2000).unwrap();
        assert_eq!(count_carriers(&cohort, &query, SvType::Loss, 0.0).unwrap(), 2);

        let query = Interval::new("chr2", 1010, 1990).unwrap();
        assert_eq!(count_carriers(&cohort, &query, SvType::Loss, 0.0).unwrap(), 1);
    }

    #[rstest]
    fn test_count_carriers_wide_cutoff_admits_partial_overlap(cohort: MemoryCatalog) {
        let query = Interval::new("chr2", 1000, 2000).unwrap();
        assert_eq!(count_carriers(&cohort, &query, SvType::Loss, 0.5).unwrap(), 3);
    }

    #[rstest]
    #[case(1.0)]
    #[case(-0.1)]
    #[case(f64::NAN)]
    fn test_count_carriers_rejects_bad_cutoff(cohort: MemoryCatalog, #[case] cutoff: f64) {
        let query = Interval::new("chr2", 1000, 2000).unwrap();
        assert!(matches!(
            count_carriers(&cohort, &query, SvType::Loss, cutoff),
            Err(CarrierError::InvalidCutoff(_))
        ));
    }

    #[rstest]
    fn test_annotate_carriers(mut cohort: MemoryCatalog) {
        let updated = annotate_carriers(&mut cohort, 0.1).unwrap();
        assert_eq!(updated, 4);

        let counts: Vec<(String, Option<usize>)> = cohort
            .svs()
            .map(|record| (record.name.clone(), record.n_carriers))
            .collect();
        assert_eq!(
            counts,
            vec![
                ("chr2-1000-2000-LOSS".to_string(), Some(2)),
                ("chr2-1010-1990-LOSS".to_string(), Some(2)),
                ("chr2-1000-1500-LOSS".to_string(), Some(1)),
                ("chr2-1000-2000-GAIN".to_string(), Some(1)),
            ]
        );
    }
}
