//! Property tests for validation and batch scoring invariants.

use fraud_dashboard::validator;
use fraud_dashboard::{
    Classifier, FeatureRow, InferenceError, InferencePipeline, FEATURE_COUNT, REQUIRED_COLUMNS,
};
use proptest::prelude::*;

/// Echoes V1 back as the probability, so each output is traceable to its row.
struct EchoModel;

impl Classifier for EchoModel {
    fn name(&self) -> &str {
        "echo"
    }

    fn predict_proba(&self, rows: &[FeatureRow]) -> Result<Vec<f64>, InferenceError> {
        Ok(rows.iter().map(|r| r.values()[0] as f64).collect())
    }
}

fn rows_for(probabilities: &[f32]) -> Vec<FeatureRow> {
    probabilities
        .iter()
        .map(|&p| {
            let mut values = [0.0f32; FEATURE_COUNT];
            values[0] = p;
            FeatureRow::new(values)
        })
        .collect()
}

proptest! {
    #[test]
    fn labels_follow_inclusive_threshold(probabilities in prop::collection::vec(0.0f32..=1.0, 0..64)) {
        let rows = rows_for(&probabilities);
        let (results, _) = InferencePipeline::default().infer(&rows, &EchoModel).unwrap();

        for result in &results {
            prop_assert_eq!(result.label == 1, result.probability >= 0.5);
        }
    }

    #[test]
    fn row_order_is_preserved(probabilities in prop::collection::vec(0.0f32..=1.0, 0..64)) {
        let rows = rows_for(&probabilities);
        let (results, _) = InferencePipeline::default().infer(&rows, &EchoModel).unwrap();

        prop_assert_eq!(results.len(), rows.len());
        for (result, p) in results.iter().zip(&probabilities) {
            prop_assert_eq!(result.probability, *p as f64);
        }
    }

    #[test]
    fn summary_is_consistent(probabilities in prop::collection::vec(0.0f32..=1.0, 0..64)) {
        let rows = rows_for(&probabilities);
        let (results, summary) = InferencePipeline::default().infer(&rows, &EchoModel).unwrap();

        let flagged = results.iter().filter(|r| r.label == 1).count();
        prop_assert_eq!(summary.fraud_count, flagged);
        prop_assert!(summary.fraud_count <= summary.total);
        prop_assert_eq!(summary.total, rows.len());

        match summary.average_probability {
            None => prop_assert!(rows.is_empty()),
            Some(avg) => {
                let mean = probabilities.iter().map(|&p| p as f64).sum::<f64>() / rows.len() as f64;
                prop_assert!((avg - mean).abs() < 1e-9);
            }
        }
    }

    #[test]
    fn any_missing_required_column_fails_validation(
        kept in prop::sample::subsequence(REQUIRED_COLUMNS.to_vec(), 0..FEATURE_COUNT),
        extras in prop::collection::vec("[a-z]{1,8}", 0..5),
    ) {
        let mut columns: Vec<String> = kept.iter().map(|s| s.to_string()).collect();
        columns.extend(extras);

        prop_assert!(!validator::validate(&columns));
        prop_assert!(!validator::missing_columns(&columns).is_empty());
    }

    #[test]
    fn all_required_columns_pass_in_any_order(
        columns in prop::collection::vec("[a-z]{1,8}", 0..5)
            .prop_map(|extras| {
                let mut columns: Vec<String> = REQUIRED_COLUMNS.iter().map(|s| s.to_string()).collect();
                columns.extend(extras);
                columns
            })
            .prop_shuffle(),
    ) {
        prop_assert!(validator::validate(&columns));
    }
}
