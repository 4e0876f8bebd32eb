//! Prediction results and summary statistics

use serde::Serialize;
use std::fmt;

/// Round half away from zero to `decimals` places.
///
/// Applied to every probability shown to the user; label decisions always
/// use the unrounded value.
pub fn round_probability(probability: f64, decimals: u32) -> f64 {
    let scale = 10f64.powi(decimals as i32);
    (probability * scale).round() / scale
}

/// Format a probability with a fixed number of decimals after rounding.
pub fn format_probability(probability: f64, decimals: u32) -> String {
    format!(
        "{:.*}",
        decimals as usize,
        round_probability(probability, decimals)
    )
}

/// Model output for one row.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PredictionResult {
    /// 1 = fraud, 0 = legitimate
    pub label: u8,
    /// Unrounded positive-class probability (0.0 - 1.0)
    pub probability: f64,
}

impl PredictionResult {
    /// Label a probability with a closed threshold: `probability >= threshold` is fraud.
    pub fn from_probability(probability: f64, threshold: f64) -> Self {
        let label = if probability >= threshold { 1 } else { 0 };
        Self { label, probability }
    }

    pub fn is_fraud(&self) -> bool {
        self.label == 1
    }
}

/// Aggregates over one prediction batch.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SummaryStats {
    pub fraud_count: usize,
    pub total: usize,
    /// Mean of unrounded probabilities; `None` for an empty batch
    pub average_probability: Option<f64>,
}

impl SummaryStats {
    pub fn from_results(results: &[PredictionResult]) -> Self {
        let total = results.len();
        let fraud_count = results.iter().filter(|r| r.is_fraud()).count();
        let average_probability = if total > 0 {
            Some(results.iter().map(|r| r.probability).sum::<f64>() / total as f64)
        } else {
            None
        };

        Self {
            fraud_count,
            total,
            average_probability,
        }
    }

    /// `Fraudulent: {fraud_count} / {total}`
    pub fn fraud_line(&self) -> String {
        format!("Fraudulent: {} / {}", self.fraud_count, self.total)
    }

    /// `Average Fraud Probability: {avg}`, or `n/a` when nothing was scored.
    pub fn average_line(&self, decimals: u32) -> String {
        let avg = self
            .average_probability
            .map(|p| format_probability(p, decimals))
            .unwrap_or_else(|| "n/a".to_string());
        format!("Average Fraud Probability: {}", avg)
    }
}

impl fmt::Display for SummaryStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n{}", self.fraud_line(), self.average_line(4))
    }
}

/// One displayed result row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultRow {
    /// Zero-based position in the upload
    pub row: usize,
    #[serde(rename = "Prediction")]
    pub prediction: u8,
    /// Rounded for display
    #[serde(rename = "Probability")]
    pub probability: f64,
}

/// Results of one prediction request, aligned with the uploaded rows.
#[derive(Debug, Clone, PartialEq)]
pub struct PredictionReport {
    pub results: Vec<PredictionResult>,
    pub summary: SummaryStats,
}

impl PredictionReport {
    pub fn new(results: Vec<PredictionResult>) -> Self {
        let summary = SummaryStats::from_results(&results);
        Self { results, summary }
    }

    /// First `n` result rows with display-rounded probabilities.
    pub fn preview(&self, n: usize, decimals: u32) -> Vec<ResultRow> {
        self.results
            .iter()
            .take(n)
            .enumerate()
            .map(|(row, r)| ResultRow {
                row,
                prediction: r.label,
                probability: round_probability(r.probability, decimals),
            })
            .collect()
    }

    /// The summary banner, one entry per line.
    pub fn summary_lines(&self, decimals: u32) -> Vec<String> {
        vec![
            self.summary.fraud_line(),
            self.summary.average_line(decimals),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_is_inclusive() {
        assert_eq!(PredictionResult::from_probability(0.5, 0.5).label, 1);
        assert_eq!(PredictionResult::from_probability(0.4999999, 0.5).label, 0);
        assert_eq!(PredictionResult::from_probability(1.0, 0.5).label, 1);
        assert_eq!(PredictionResult::from_probability(0.0, 0.5).label, 0);
    }

    #[test]
    fn test_label_uses_unrounded_value() {
        // Rounds to 0.5000 for display but stays below the threshold
        let result = PredictionResult::from_probability(0.49996, 0.5);
        assert_eq!(result.label, 0);
        assert_eq!(format_probability(result.probability, 4), "0.5000");
    }

    #[test]
    fn test_rounding_half_away_from_zero() {
        assert_eq!(round_probability(0.73, 4), 0.73);
        assert_eq!(round_probability(0.123456, 4), 0.1235);
        assert_eq!(format_probability(0.73, 4), "0.7300");
        assert_eq!(format_probability(0.0, 4), "0.0000");
    }

    #[test]
    fn test_summary_stats() {
        let results = vec![
            PredictionResult::from_probability(0.2, 0.5),
            PredictionResult::from_probability(0.5, 0.5),
        ];
        let stats = SummaryStats::from_results(&results);

        assert_eq!(stats.fraud_count, 1);
        assert_eq!(stats.total, 2);
        assert!((stats.average_probability.unwrap() - 0.35).abs() < 1e-12);
        assert_eq!(stats.average_line(4), "Average Fraud Probability: 0.3500");
    }

    #[test]
    fn test_empty_summary() {
        let stats = SummaryStats::from_results(&[]);

        assert_eq!(stats.fraud_count, 0);
        assert_eq!(stats.total, 0);
        assert_eq!(stats.average_probability, None);
        assert_eq!(stats.fraud_line(), "Fraudulent: 0 / 0");
        assert_eq!(stats.average_line(4), "Average Fraud Probability: n/a");
    }

    #[test]
    fn test_report_preview() {
        let report = PredictionReport::new(vec![
            PredictionResult::from_probability(0.123456, 0.5),
            PredictionResult::from_probability(0.98766, 0.5),
            PredictionResult::from_probability(0.5, 0.5),
        ]);
        let preview = report.preview(2, 4);

        assert_eq!(preview.len(), 2);
        assert_eq!(preview[0].row, 0);
        assert_eq!(preview[0].prediction, 0);
        assert_eq!(preview[0].probability, 0.1235);
        assert_eq!(preview[1].prediction, 1);
        assert_eq!(preview[1].probability, 0.9877);
        assert_eq!(report.summary_lines(4)[0], "Fraudulent: 2 / 3");
    }

    #[test]
    fn test_summary_display() {
        let stats = SummaryStats::from_results(&[PredictionResult::from_probability(0.73, 0.5)]);
        assert_eq!(
            stats.to_string(),
            "Fraudulent: 1 / 1\nAverage Fraud Probability: 0.7300"
        );
    }
}
