use binary_cnn::Metrics;

/// Renders the final stdout report. The layout is fixed; downstream tooling
/// parses it line by line.
pub fn fmt_report(split_tag: &str, metrics: &Metrics) -> String {
    format!(
        "[Eval/{split_tag} 0vs1] accuracy: {:.2}%  (N={})\n  \
         Confusion matrix (label first):\n    \
         TP: {}   FN: {}   (positives={})\n    \
         FP: {}   TN: {}   (negatives={})\n",
        metrics.accuracy(),
        metrics.total(),
        metrics.true_positives(),
        metrics.false_negatives(),
        metrics.positives(),
        metrics.false_positives(),
        metrics.true_negatives(),
        metrics.negatives(),
    )
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_report_layout() {
        let mut metrics = Metrics::default();
        // 3 correct positives, 1 missed positive, 1 false alarm, 2 correct negatives.
        for _ in 0..3 {
            metrics.record(1, 1);
        }
        metrics.record(0, 1);
        metrics.record(1, 0);
        metrics.record(0, 0);
        metrics.record(0, 0);

        let report = fmt_report("Test", &metrics);
        let expected = "\
[Eval/Test 0vs1] accuracy: 71.43%  (N=7)
  Confusion matrix (label first):
    TP: 3   FN: 1   (positives=4)
    FP: 1   TN: 2   (negatives=3)
";
        assert_eq!(report, expected);
    }

    #[test]
    fn test_empty_run_reports_zero_percent() {
        let report = fmt_report("Test", &Metrics::default());
        assert!(report.starts_with("[Eval/Test 0vs1] accuracy: 0.00%  (N=0)"));
    }
}
