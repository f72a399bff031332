use proptest::prelude::*;
use svdb_core::models::Interval;

fn interval() -> impl Strategy<Value = Interval> {
    (prop::sample::select(vec!["chr1", "chr2"]), 0u32..10_000, 0u32..5_000)
        .prop_map(|(chrom, start, size)| Interval::new(chrom, start, start + size).unwrap())
}

proptest! {
    #[test]
    fn distance_is_symmetric(a in interval(), b in interval()) {
        prop_assert_eq!(a.distance(&b), b.distance(&a));
    }

    #[test]
    fn distance_to_self_is_zero(a in interval()) {
        prop_assert_eq!(a.distance(&a), Some(0.0));
    }

    #[test]
    fn overlap_is_symmetric(a in interval(), b in interval()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlapping_intervals_have_distance_below_one(a in interval(), b in interval()) {
        if a.overlaps(&b) {
            let d = a.distance(&b).unwrap();
            prop_assert!((0.0..1.0).contains(&d), "distance {} out of range", d);
        }
    }

    #[test]
    fn cross_chromosome_distance_is_undefined(start in 0u32..1_000, size in 1u32..1_000) {
        let a = Interval::new("chr1", start, start + size).unwrap();
        let b = Interval::new("chr2", start, start + size).unwrap();
        prop_assert_eq!(a.distance(&b), None);
        prop_assert!(!a.overlaps(&b));
    }
}
