//! Request metrics and statistics tracking for the dashboard.

use crate::types::prediction::PredictionResult;
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::info;

/// Latency samples kept in memory
const LATENCY_HISTORY: usize = 10_000;

/// Metrics collector shared by all request handlers
pub struct DashboardMetrics {
    /// Uploads that passed schema validation
    pub uploads_accepted: AtomicU64,
    /// Uploads rejected for missing columns
    pub uploads_rejected: AtomicU64,
    /// Uploads that were not valid CSV
    pub parse_failures: AtomicU64,
    /// Completed prediction runs
    pub predictions_run: AtomicU64,
    /// Prediction runs that failed inside the model
    pub inference_failures: AtomicU64,
    /// Rows scored across all runs
    pub rows_scored: AtomicU64,
    /// Rows labelled fraud across all runs
    pub rows_flagged: AtomicU64,
    /// Prediction latencies (in microseconds)
    latencies: RwLock<Vec<u64>>,
    /// Probability distribution buckets
    score_buckets: RwLock<[u64; 10]>,
    /// Start time for uptime
    start_time: Instant,
}

impl DashboardMetrics {
    pub fn new() -> Self {
        Self {
            uploads_accepted: AtomicU64::new(0),
            uploads_rejected: AtomicU64::new(0),
            parse_failures: AtomicU64::new(0),
            predictions_run: AtomicU64::new(0),
            inference_failures: AtomicU64::new(0),
            rows_scored: AtomicU64::new(0),
            rows_flagged: AtomicU64::new(0),
            latencies: RwLock::new(Vec::with_capacity(1000)),
            score_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    /// Record a schema check outcome
    pub fn record_upload(&self, accepted: bool) {
        let counter = if accepted {
            &self.uploads_accepted
        } else {
            &self.uploads_rejected
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_parse_failure(&self) {
        self.parse_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_inference_failure(&self) {
        self.inference_failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a completed prediction run
    pub fn record_prediction(&self, elapsed: Duration, results: &[PredictionResult]) {
        self.predictions_run.fetch_add(1, Ordering::Relaxed);
        self.rows_scored
            .fetch_add(results.len() as u64, Ordering::Relaxed);
        self.rows_flagged.fetch_add(
            results.iter().filter(|r| r.is_fraud()).count() as u64,
            Ordering::Relaxed,
        );

        if let Ok(mut times) = self.latencies.write() {
            times.push(elapsed.as_micros() as u64);
            if times.len() > LATENCY_HISTORY {
                times.drain(0..LATENCY_HISTORY / 2);
            }
        }

        if let Ok(mut buckets) = self.score_buckets.write() {
            for result in results {
                let bucket = (result.probability * 10.0).clamp(0.0, 9.0) as usize;
                buckets[bucket] += 1;
            }
        }
    }

    /// Get prediction latency statistics
    pub fn latency_stats(&self) -> LatencyStats {
        let mut sorted = match self.latencies.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return LatencyStats::default(),
        };
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();
        let percentile = |q: f64| sorted[((count as f64 * q) as usize).min(count - 1)];

        LatencyStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: percentile(0.50),
            p95_us: percentile(0.95),
            p99_us: percentile(0.99),
            max_us: sorted[count - 1],
        }
    }

    /// Get probability distribution
    pub fn score_distribution(&self) -> [u64; 10] {
        self.score_buckets
            .read()
            .map(|buckets| *buckets)
            .unwrap_or_default()
    }

    /// Point-in-time copy of every metric
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            uptime_secs: self.start_time.elapsed().as_secs(),
            uploads_accepted: self.uploads_accepted.load(Ordering::Relaxed),
            uploads_rejected: self.uploads_rejected.load(Ordering::Relaxed),
            parse_failures: self.parse_failures.load(Ordering::Relaxed),
            predictions_run: self.predictions_run.load(Ordering::Relaxed),
            inference_failures: self.inference_failures.load(Ordering::Relaxed),
            rows_scored: self.rows_scored.load(Ordering::Relaxed),
            rows_flagged: self.rows_flagged.load(Ordering::Relaxed),
            latency: self.latency_stats(),
            score_distribution: self.score_distribution(),
        }
    }

    /// Print summary statistics
    pub fn print_summary(&self) {
        let snapshot = self.snapshot();
        let flag_rate = if snapshot.rows_scored > 0 {
            (snapshot.rows_flagged as f64 / snapshot.rows_scored as f64) * 100.0
        } else {
            0.0
        };

        info!("╔══════════════════════════════════════════════════════════════╗");
        info!("║            FRAUD DETECTION DASHBOARD - METRICS SUMMARY       ║");
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!(
            "║ Uploads: {:>6} accepted │ {:>6} rejected │ {:>6} unparseable ║",
            snapshot.uploads_accepted, snapshot.uploads_rejected, snapshot.parse_failures
        );
        info!(
            "║ Predictions: {:>6} runs │ {:>8} rows │ {:>5.1}% flagged     ║",
            snapshot.predictions_run, snapshot.rows_scored, flag_rate
        );
        info!(
            "║ Latency (μs): mean={:>7} p50={:>7} p95={:>7} p99={:>7} ║",
            snapshot.latency.mean_us,
            snapshot.latency.p50_us,
            snapshot.latency.p95_us,
            snapshot.latency.p99_us
        );
        info!("╠══════════════════════════════════════════════════════════════╣");
        info!("║ Fraud Probability Distribution:                              ║");
        let total: u64 = snapshot.score_distribution.iter().sum();
        for (i, &count) in snapshot.score_distribution.iter().enumerate() {
            let pct = if total > 0 {
                (count as f64 / total as f64) * 100.0
            } else {
                0.0
            };
            let bar: String = "█".repeat(((pct / 2.0) as usize).min(20));
            info!(
                "║   {:.1}-{:.1}: {:>8} ({:>5.1}%) {}",
                i as f64 / 10.0,
                (i + 1) as f64 / 10.0,
                count,
                pct,
                bar
            );
        }
        info!("╚══════════════════════════════════════════════════════════════╝");
    }
}

impl Default for DashboardMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Prediction latency statistics
#[derive(Debug, Default, Clone, Serialize)]
pub struct LatencyStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p95_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}

/// Serializable view of the metrics
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub uploads_accepted: u64,
    pub uploads_rejected: u64,
    pub parse_failures: u64,
    pub predictions_run: u64,
    pub inference_failures: u64,
    pub rows_scored: u64,
    pub rows_flagged: u64,
    pub latency: LatencyStats,
    pub score_distribution: [u64; 10],
}

/// Periodic metrics summary logger
pub struct MetricsReporter {
    metrics: Arc<DashboardMetrics>,
    interval_secs: u64,
}

impl MetricsReporter {
    pub fn new(metrics: Arc<DashboardMetrics>, interval_secs: u64) -> Self {
        Self {
            metrics,
            interval_secs,
        }
    }

    /// Start the periodic reporting task
    pub async fn start(self) {
        let mut interval = tokio::time::interval(Duration::from_secs(self.interval_secs));
        // First tick fires immediately
        interval.tick().await;
        loop {
            interval.tick().await;
            self.metrics.print_summary();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_recording() {
        let metrics = DashboardMetrics::new();

        metrics.record_upload(true);
        metrics.record_upload(false);
        metrics.record_parse_failure();
        metrics.record_prediction(
            Duration::from_micros(150),
            &[
                PredictionResult::from_probability(0.95, 0.5),
                PredictionResult::from_probability(0.05, 0.5),
                PredictionResult::from_probability(1.0, 0.5),
            ],
        );

        let snapshot = metrics.snapshot();
        assert_eq!(snapshot.uploads_accepted, 1);
        assert_eq!(snapshot.uploads_rejected, 1);
        assert_eq!(snapshot.parse_failures, 1);
        assert_eq!(snapshot.predictions_run, 1);
        assert_eq!(snapshot.rows_scored, 3);
        assert_eq!(snapshot.rows_flagged, 2);
        assert_eq!(snapshot.latency.count, 1);
        assert_eq!(snapshot.latency.max_us, 150);
    }

    #[test]
    fn test_score_buckets() {
        let metrics = DashboardMetrics::new();
        metrics.record_prediction(
            Duration::from_micros(10),
            &[
                PredictionResult::from_probability(0.0, 0.5),
                PredictionResult::from_probability(0.55, 0.5),
                PredictionResult::from_probability(1.0, 0.5),
            ],
        );

        let dist = metrics.score_distribution();
        assert_eq!(dist[0], 1);
        assert_eq!(dist[5], 1);
        // 1.0 lands in the top bucket
        assert_eq!(dist[9], 1);
    }

    #[test]
    fn test_latency_percentiles() {
        let metrics = DashboardMetrics::new();
        for us in 1..=100 {
            metrics.record_prediction(Duration::from_micros(us), &[]);
        }

        let stats = metrics.latency_stats();
        assert_eq!(stats.count, 100);
        assert_eq!(stats.p50_us, 51);
        assert_eq!(stats.max_us, 100);
        assert_eq!(stats.mean_us, 50);
    }

    #[test]
    fn test_empty_latency_stats() {
        let stats = DashboardMetrics::new().latency_stats();
        assert_eq!(stats.count, 0);
        assert_eq!(stats.p99_us, 0);
    }
}
