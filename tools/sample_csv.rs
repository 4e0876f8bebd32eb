//! Sample Upload Generator
//!
//! Writes a synthetic CSV with the dashboard's required columns for manual
//! testing. Suspicious rows push the features fraud models typically key on
//! (V10, V12, V14, V17) strongly negative and use larger amounts.
//!
//! Usage: sample-csv [output.csv] [rows] [fraud_rate]

use anyhow::{Context, Result};
use fraud_dashboard::{FEATURE_COUNT, REQUIRED_COLUMNS};
use rand::Rng;
use std::fs::File;
use std::io::{self, Write};
use tracing::info;

/// Features shifted for suspicious rows
const SUSPICIOUS_FEATURES: [&str; 4] = ["V10", "V12", "V14", "V17"];

/// Row generator for testing
struct RowGenerator {
    rng: rand::rngs::ThreadRng,
    row_counter: u64,
}

impl RowGenerator {
    fn new() -> Self {
        Self {
            rng: rand::thread_rng(),
            row_counter: 0,
        }
    }

    /// Elapsed-seconds column the original dataset carries; ignored by the model
    fn next_time(&mut self) -> u64 {
        self.row_counter += 1;
        self.row_counter * self.rng.gen_range(1..30)
    }

    /// Generate a legitimate-looking row
    fn generate_legitimate(&mut self) -> Vec<String> {
        let mut row: Vec<String> = Vec::with_capacity(FEATURE_COUNT + 1);
        row.push(self.next_time().to_string());
        for _ in 0..FEATURE_COUNT - 1 {
            row.push(format!("{:.6}", self.rng.gen_range(-2.0..2.0)));
        }
        row.push(format!("{:.2}", self.rng.gen_range(1.0..250.0)));
        row
    }

    /// Generate a suspicious row
    fn generate_suspicious(&mut self) -> Vec<String> {
        let mut row: Vec<String> = Vec::with_capacity(FEATURE_COUNT + 1);
        row.push(self.next_time().to_string());
        for name in &REQUIRED_COLUMNS[..FEATURE_COUNT - 1] {
            let value: f64 = if SUSPICIOUS_FEATURES.contains(name) {
                self.rng.gen_range(-15.0..-5.0)
            } else {
                self.rng.gen_range(-4.0..4.0)
            };
            row.push(format!("{:.6}", value));
        }
        row.push(format!("{:.2}", self.rng.gen_range(500.0..5000.0)));
        row
    }
}

fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("sample_csv=info".parse()?),
        )
        .with_writer(io::stderr)
        .init();

    // Parse arguments
    let args: Vec<String> = std::env::args().collect();
    let output = args.get(1).map(|s| s.as_str()).unwrap_or("-");
    let count: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);
    let fraud_rate: f64 = args
        .get(3)
        .and_then(|s| s.parse::<f64>().ok())
        .filter(|rate| (0.0..=1.0).contains(rate))
        .unwrap_or(0.1);

    info!(output = %output, count = count, fraud_rate = fraud_rate, "Configuration loaded");

    let sink: Box<dyn Write> = if output == "-" {
        Box::new(io::stdout().lock())
    } else {
        Box::new(File::create(output).with_context(|| format!("Failed to create {}", output))?)
    };
    let mut writer = csv::Writer::from_writer(sink);

    let mut header = vec!["Time"];
    header.extend_from_slice(&REQUIRED_COLUMNS);
    writer.write_record(&header)?;

    let mut generator = RowGenerator::new();
    let mut rng = rand::thread_rng();
    let mut legitimate_count = 0;
    let mut suspicious_count = 0;

    for _ in 0..count {
        let row = if rng.gen_bool(fraud_rate) {
            suspicious_count += 1;
            generator.generate_suspicious()
        } else {
            legitimate_count += 1;
            generator.generate_legitimate()
        };
        writer.write_record(&row)?;
    }
    writer.flush()?;

    info!(
        "Completed! Wrote {} rows ({} legitimate, {} suspicious)",
        count, legitimate_count, suspicious_count
    );

    Ok(())
}
