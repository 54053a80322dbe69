use compliance_ctl::compliance::policies::all_policies;
use compliance_ctl::compliance::{
    CheckOptions, CheckResult, CheckStatus, ReportSummary, ResultFilter, Severity, filter_results,
};
use proptest::prelude::*;

fn severity() -> impl Strategy<Value = Severity> {
    prop_oneof![
        Just(Severity::Low),
        Just(Severity::Medium),
        Just(Severity::High),
        Just(Severity::Critical),
    ]
}

fn check_result() -> impl Strategy<Value = CheckResult> {
    (0..all_policies().len(), 0u8..3, "[a-z]{1,8}/[a-z]{1,8}").prop_map(
        |(index, status, resource)| {
            let policy = all_policies()[index];
            match status {
                0 => policy.pass(resource, "ok"),
                1 => policy.fail(resource, "not ok"),
                _ => {
                    let mut result = policy.pass(resource, "skipped");
                    result.status = CheckStatus::Skipped;
                    result
                }
            }
        },
    )
}

fn rule_ids() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec(
        (0..all_policies().len()).prop_map(|i| all_policies()[i].id.to_string()),
        0..4,
    )
}

proptest! {
    #[test]
    fn filtering_twice_changes_nothing(
        results in prop::collection::vec(check_result(), 0..40),
        skip in rule_ids(),
        only in rule_ids(),
        min in prop::option::of(severity()),
    ) {
        let mut options = CheckOptions::default().with_skip(skip).with_only(only);
        options.min_severity = min;

        let once = filter_results(results, &options);
        let twice = filter_results(once.clone(), &options);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn filter_keeps_order_and_honors_every_criterion(
        results in prop::collection::vec(check_result(), 0..40),
        skip in rule_ids(),
        only in rule_ids(),
        min in prop::option::of(severity()),
    ) {
        let filter = ResultFilter::new(&skip, &only, min);
        let kept = filter.apply(results.clone());

        let expected: Vec<CheckResult> =
            results.into_iter().filter(|r| filter.keeps(r)).collect();
        prop_assert_eq!(&kept, &expected);

        for result in &kept {
            prop_assert!(!skip.contains(&result.rule_id));
            prop_assert!(only.is_empty() || only.contains(&result.rule_id));
            prop_assert!(min.is_none_or(|m| result.severity >= m));
        }
    }

    #[test]
    fn empty_filter_is_identity(results in prop::collection::vec(check_result(), 0..40)) {
        let kept = filter_results(results.clone(), &CheckOptions::default());
        prop_assert_eq!(kept, results);
    }

    #[test]
    fn summary_counts_add_up(results in prop::collection::vec(check_result(), 0..60)) {
        let summary = ReportSummary::from_results(&results);
        prop_assert_eq!(summary.total, results.len());
        prop_assert_eq!(summary.passed + summary.failed + summary.skipped, summary.total);
        prop_assert!((0.0..=100.0).contains(&summary.score));

        let evaluated = summary.total - summary.skipped;
        if evaluated == 0 {
            prop_assert_eq!(summary.score, 0.0);
        } else {
            let expected = summary.passed as f64 / evaluated as f64 * 100.0;
            prop_assert!((summary.score - expected).abs() < 1e-9);
        }
    }
}
