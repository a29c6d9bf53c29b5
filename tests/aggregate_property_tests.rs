use archmap::aggregate::{risk_score, sort_and_dedup, summarize};
use archmap::config::RiskWeights;
use archmap::core::{Category, Finding, Severity};
use proptest::prelude::*;
use std::collections::HashSet;

fn severity_strategy() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Alto),
        Just(Severity::Medio),
        Just(Severity::Bajo),
    ]
}

fn finding_strategy() -> impl Strategy<Value = Finding> {
    (
        severity_strategy(),
        0u8..4,
        0u8..6,
        1usize..200,
        any::<bool>(),
    )
        .prop_map(|(severity, rule, file, line, justified)| {
            let mut finding = Finding::new(
                severity,
                Category::Coupling,
                format!("regla-{rule}"),
                format!("capa/archivo_{file}.py"),
                line,
                "evidencia",
            );
            finding.justified = justified;
            finding
        })
}

proptest! {
    #[test]
    fn output_order_is_non_decreasing(findings in prop::collection::vec(finding_strategy(), 0..60)) {
        let sorted = sort_and_dedup(findings);
        let keys: Vec<_> = sorted
            .iter()
            .map(|f| (f.severity, f.file.clone(), f.line))
            .collect();
        let mut expected = keys.clone();
        expected.sort();
        prop_assert_eq!(keys, expected);
    }

    #[test]
    fn suppression_keys_are_unique_after_dedup(findings in prop::collection::vec(finding_strategy(), 0..60)) {
        let sorted = sort_and_dedup(findings);
        let mut seen = HashSet::new();
        for finding in &sorted {
            prop_assert!(seen.insert((finding.rule.clone(), finding.file.clone(), finding.line)));
        }
    }

    #[test]
    fn sorting_is_idempotent(findings in prop::collection::vec(finding_strategy(), 0..60)) {
        let once = sort_and_dedup(findings);
        let twice = sort_and_dedup(once.clone());
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn risk_stays_in_the_closed_range(alto in 0usize..500, medio in 0usize..500, bajo in 0usize..500) {
        let risk = risk_score(alto, medio, bajo, &RiskWeights::default());
        prop_assert!((0.0..=10.0).contains(&risk));
    }

    #[test]
    fn summary_counts_partition_the_findings(findings in prop::collection::vec(finding_strategy(), 0..60)) {
        let sorted = sort_and_dedup(findings);
        let summary = summarize(&sorted, &RiskWeights::default());
        prop_assert_eq!(summary.total, sorted.len());
        prop_assert_eq!(summary.alto + summary.medio + summary.bajo, summary.total);
        prop_assert!(summary.alto_unjustified <= summary.alto);
    }
}
