use proptest::prelude::*;
use sccs_core::{CutpointBounds, EntryRef, Strand, Tail};
use sccs_engine::{classify, cutoff_value, select_cutpoint, ScoredEntry};

fn scored(values: &[f64]) -> Vec<ScoredEntry> {
    values
        .iter()
        .enumerate()
        .map(|(i, &d)| {
            ScoredEntry::new(EntryRef::new(format!("e{}", i), 0, 10, Strand::Forward), d)
        })
        .collect()
}

proptest! {
    #[test]
    fn prop_cutpoint_within_bounds(
        values in prop::collection::vec(0.0f64..1.0, 1..60),
        dy in -0.5f64..0.5,
    ) {
        let cut = select_cutpoint(&scored(&values), dy, 0.7).unwrap();
        prop_assert!(cut <= values.len());
    }

    #[test]
    fn prop_cutpoint_monotone_in_mre(
        values in prop::collection::vec(0.0f64..1.0, 1..60),
        dy in -0.5f64..0.5,
        lower in 0.0f64..1.0,
        raise in 0.0f64..1.0,
    ) {
        let pairs = scored(&values);
        let tight = select_cutpoint(&pairs, dy, lower).unwrap();
        let loose = select_cutpoint(&pairs, dy, lower + raise).unwrap();
        prop_assert!(tight <= loose);
    }

    #[test]
    fn prop_cutoff_is_rounded(values in prop::collection::vec(0.0f64..1.0, 1..30)) {
        let cutoff = cutoff_value(&values, CutpointBounds::new(0.4, 0.7)).unwrap();
        prop_assert!(((cutoff * 1000.0).round() - cutoff * 1000.0).abs() < 1e-6);
    }

    #[test]
    fn prop_partition_covers_input(values in prop::collection::vec(0.0f64..1.0, 1..40)) {
        for tail in [Tail::Low, Tail::High, Tail::TwoTailed] {
            let c = classify(scored(&values), CutpointBounds::new(0.4, 0.7), tail).unwrap();
            prop_assert_eq!(c.partition.good.len() + c.partition.bad.len(), values.len());
        }
    }
}
