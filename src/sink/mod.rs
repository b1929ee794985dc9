//! Time-series sinks
//!
//! The collector hands every finished `SamplePoint` to a
//! `PointSink`. The InfluxDB v2 implementation is the only
//! production sink.

pub mod influx;

use crate::schema::SamplePoint;

pub use influx::InfluxSink;

/// Destination for sample points.
///
/// CONTRACT:
/// - `write_point` returns only after the sink acknowledged or
///   rejected the point
/// - An `Err` means the point was not stored; the collector treats
///   this as unrecoverable
#[async_trait::async_trait]
pub trait PointSink: Send + Sync {
    fn name(&self) -> &'static str;

    async fn write_point(&self, point: &SamplePoint) -> anyhow::Result<()>;
}
