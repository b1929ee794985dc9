/// Collector module
///
/// This module owns the poll-parse-write loop:
/// - `run_cycle` performs exactly one fetch / validate / parse / write
///   step and reports what happened as a `CycleOutcome`
/// - `run_collector` schedules cycles on the configured interval
///
/// The collector layer sits between:
/// - The price feed (`feed::PriceFeed`)
/// - The time-series sink (`sink::PointSink`)
///
/// Design notes:
/// - Feed- and sink-specific logic MUST NOT live here
/// - Recoverable failures never escape a single cycle
/// - Only a failed write terminates the loop
pub mod runner;

use crate::schema::SamplePoint;

/// Why a cycle ended without writing a point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Transport, timeout or decode failure
    Fetch,

    /// The feed answered with a non-success `code`
    Api,

    /// `idxPx` was not a finite number
    Parse,
}

/// Result of one collector cycle.
///
/// Write failures are not an outcome: they surface as `Err` from
/// the cycle and end the process.
#[derive(Debug, Clone, PartialEq)]
pub enum CycleOutcome {
    /// A point was built and acknowledged by the sink
    Written(SamplePoint),

    /// The feed succeeded but returned no ticker records
    NoData,

    /// The cycle was abandoned before the write step
    Skipped(SkipReason),
}

impl CycleOutcome {
    pub fn is_written(&self) -> bool {
        matches!(self, CycleOutcome::Written(_))
    }
}
