use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use once_cell::sync::Lazy;

/// Global runtime metrics for the collector.
///
/// Purpose:
/// - Count cycles and their outcomes
/// - Give operators one summary line instead of grepping logs
///
/// Design:
/// - Lock-free (Atomics)
/// - Updated once per cycle by the collector loop
#[derive(Default)]
pub struct RuntimeMetrics {
    pub cycles: AtomicUsize,
    pub points_written: AtomicUsize,

    // Skipped cycles, by cause
    pub fetch_errors: AtomicUsize,
    pub api_errors: AtomicUsize,
    pub empty_responses: AtomicUsize,
    pub parse_errors: AtomicUsize,

    pub write_errors: AtomicUsize,
}

impl RuntimeMetrics {
    /// One-line summary in the `[METRICS] key=value` format.
    pub fn summary(&self) -> String {
        format!(
            "[METRICS] cycles={} written={} fetch_err={} api_err={} no_data={} parse_err={} write_err={}",
            self.cycles.load(Ordering::Relaxed),
            self.points_written.load(Ordering::Relaxed),
            self.fetch_errors.load(Ordering::Relaxed),
            self.api_errors.load(Ordering::Relaxed),
            self.empty_responses.load(Ordering::Relaxed),
            self.parse_errors.load(Ordering::Relaxed),
            self.write_errors.load(Ordering::Relaxed),
        )
    }
}

/// Global metrics registry (singleton)
pub static METRICS: Lazy<Arc<RuntimeMetrics>> =
    Lazy::new(|| Arc::new(RuntimeMetrics::default()));
