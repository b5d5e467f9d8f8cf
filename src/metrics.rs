//! Request metrics for the form predictor.

use crate::types::prediction::Label;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::info;

const LATENCY_WINDOW: usize = 10_000;

/// Counters and latency window for one serving process
pub struct FormMetrics {
    /// Predict triggers received
    pub submissions: AtomicU64,
    /// Submissions rejected by input validation
    pub rejected: AtomicU64,
    /// Submissions whose inference call failed
    pub failures: AtomicU64,
    positive: AtomicU64,
    negative: AtomicU64,
    /// Inference times (in microseconds)
    inference_times: RwLock<Vec<u64>>,
    /// Displayed percentage distribution, one bucket per 10 points
    percentage_buckets: RwLock<[u64; 10]>,
    start_time: Instant,
}

impl FormMetrics {
    pub fn new() -> Self {
        Self {
            submissions: AtomicU64::new(0),
            rejected: AtomicU64::new(0),
            failures: AtomicU64::new(0),
            positive: AtomicU64::new(0),
            negative: AtomicU64::new(0),
            inference_times: RwLock::new(Vec::with_capacity(1000)),
            percentage_buckets: RwLock::new([0; 10]),
            start_time: Instant::now(),
        }
    }

    pub fn record_submission(&self) {
        self.submissions.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_rejection(&self) {
        self.rejected.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.failures.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a successful prediction
    pub fn record_prediction(&self, label: Label, percentage: u8, inference_time: Duration) {
        match label {
            Label::Positive => self.positive.fetch_add(1, Ordering::Relaxed),
            Label::Negative => self.negative.fetch_add(1, Ordering::Relaxed),
        };

        if let Ok(mut times) = self.inference_times.write() {
            times.push(inference_time.as_micros() as u64);
            if times.len() > LATENCY_WINDOW {
                times.drain(0..LATENCY_WINDOW / 2);
            }
        }

        let bucket = (percentage as usize / 10).min(9);
        if let Ok(mut buckets) = self.percentage_buckets.write() {
            buckets[bucket] += 1;
        }
    }

    /// Predictions per label
    pub fn label_counts(&self) -> (u64, u64) {
        (
            self.negative.load(Ordering::Relaxed),
            self.positive.load(Ordering::Relaxed),
        )
    }

    /// Inference time statistics over the retained window
    pub fn inference_stats(&self) -> InferenceStats {
        let mut sorted = match self.inference_times.read() {
            Ok(times) if !times.is_empty() => times.clone(),
            _ => return InferenceStats::default(),
        };
        sorted.sort_unstable();

        let count = sorted.len();
        let sum: u64 = sorted.iter().sum();

        InferenceStats {
            count: count as u64,
            mean_us: sum / count as u64,
            p50_us: sorted[count / 2],
            p99_us: sorted[((count as f64 * 0.99) as usize).min(count - 1)],
            max_us: sorted[count - 1],
        }
    }

    pub fn percentage_distribution(&self) -> [u64; 10] {
        self.percentage_buckets
            .read()
            .map(|b| *b)
            .unwrap_or_default()
    }

    /// Log summary statistics
    pub fn print_summary(&self) {
        let submissions = self.submissions.load(Ordering::Relaxed);
        let rejected = self.rejected.load(Ordering::Relaxed);
        let failures = self.failures.load(Ordering::Relaxed);
        let (negative, positive) = self.label_counts();
        let stats = self.inference_stats();
        let uptime = self.start_time.elapsed();

        info!(
            uptime_secs = uptime.as_secs(),
            submissions,
            rejected,
            failures,
            positive,
            negative,
            "Form predictor summary"
        );
        info!(
            count = stats.count,
            mean_us = stats.mean_us,
            p50_us = stats.p50_us,
            p99_us = stats.p99_us,
            max_us = stats.max_us,
            "Inference times"
        );

        let dist = self.percentage_distribution();
        let total: u64 = dist.iter().sum();
        for (i, &count) in dist.iter().enumerate().filter(|(_, &c)| c > 0) {
            let pct = (count as f64 / total as f64) * 100.0;
            info!(
                "  {:>3}-{:>3}%: {:>6} ({:>5.1}%) {}",
                i * 10,
                i * 10 + 9 + (i == 9) as usize,
                count,
                pct,
                "█".repeat(((pct / 5.0) as usize).min(20))
            );
        }
    }
}

impl Default for FormMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Inference time statistics
#[derive(Debug, Default, PartialEq, Eq)]
pub struct InferenceStats {
    pub count: u64,
    pub mean_us: u64,
    pub p50_us: u64,
    pub p99_us: u64,
    pub max_us: u64,
}
