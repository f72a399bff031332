use proptest::prelude::*;
use svdb_carriers::catalog::PatientSv;
use svdb_carriers::{Catalog, MemoryCatalog, count_carriers};
use svdb_core::models::{Filter, Genotype, Interval, Sv, SvType};

fn cohort() -> impl Strategy<Value = MemoryCatalog> {
    prop::collection::vec((0u32..6, 900u32..1100, 1u32..400), 1..30).prop_map(|calls| {
        let mut catalog = MemoryCatalog::new();
        for (i, (family, start, size)) in calls.into_iter().enumerate() {
            let patient_id = catalog.insert_patient(&format!("P{i}"), &format!("F{family}"));
            let sv = Sv::new(
                Interval::new("chr1", start, start + size).unwrap(),
                SvType::Loss,
                Filter::Pass,
                "manta",
                format!("call{i}"),
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
        }
        catalog
    })
}

proptest! {
    #[test]
    fn widening_the_cutoff_never_lowers_the_count(
        catalog in cohort(),
        start in 900u32..1100,
        size in 1u32..400,
        narrow in 0.0f64..0.9,
        extra in 0.0f64..0.09,
    ) {
        let query = Interval::new("chr1", start, start + size).unwrap();
        let wide = narrow + extra;
        let few = count_carriers(&catalog, &query, SvType::Loss, narrow).unwrap();
        let many = count_carriers(&catalog, &query, SvType::Loss, wide).unwrap();
        prop_assert!(few <= many, "{} carriers at {} but {} at {}", few, narrow, many, wide);
    }

    #[test]
    fn every_catalog_sv_counts_its_own_carriers(catalog in cohort(), cutoff in 0.0f64..0.9) {
        for record in catalog.svs() {
            let count = count_carriers(&catalog, &record.interval, record.sv_type, cutoff).unwrap();
            prop_assert!(count >= 1, "{} has no carriers", record.name);
        }
    }
}
