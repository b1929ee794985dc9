use chrono::{DateTime, Utc};
use influxdb2::models::DataPoint;
use serde::{Deserialize, Deserializer};

/// Measurement under which every sample is stored.
pub const MEASUREMENT: &str = "coin_price";

/// Tag key carrying the instrument identifier.
pub const TAG_INST_ID: &str = "instId";

/// Field key carrying the index price.
pub const FIELD_IDX_PX: &str = "idxPx";

/// `code` value the feed uses for a successful response.
pub const SUCCESS_CODE: &str = "0";

// ------------------------------------------------------------
// Feed envelope
// ------------------------------------------------------------
//
// Decoded response of the index-tickers endpoint:
//
//   { "code": "0", "msg": "", "data": [ { ... } ] }
//
// Only `code`, `msg` and the first ticker's `instId` / `idxPx`
// are consumed by the collector.
//
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct FeedEnvelope {
    /// "0" on success, anything else is an application error
    pub code: String,

    /// Error description, populated on failure
    #[serde(default, deserialize_with = "null_as_default")]
    pub msg: String,

    /// Ticker snapshots, possibly empty or null
    #[serde(default, deserialize_with = "null_as_default")]
    pub data: Vec<TickerRecord>,
}

impl FeedEnvelope {
    pub fn is_success(&self) -> bool {
        self.code == SUCCESS_CODE
    }
}

/// Decodes an explicit JSON `null` as the type's default.
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

// ------------------------------------------------------------
// Ticker record
// ------------------------------------------------------------
//
// One instrument's index snapshot. All numbers arrive as
// strings. The auxiliary fields are decoded for completeness
// but never persisted.
//
#[derive(Debug, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct TickerRecord {
    pub inst_id: String,

    pub idx_px: String,

    #[serde(default)]
    pub high24h: String,

    #[serde(default)]
    pub low24h: String,

    #[serde(default)]
    pub open24h: String,

    #[serde(default)]
    pub sod_utc0: String,

    #[serde(default)]
    pub sod_utc8: String,

    /// Feed-side timestamp in milliseconds, as a string
    #[serde(default)]
    pub ts: String,
}

// ------------------------------------------------------------
// Sample point
// ------------------------------------------------------------
//
// The unit written to the time-series sink:
//
//   coin_price,instId=<inst_id> idxPx=<idx_px> <timestamp>
//
// A point only exists for a finite, successfully parsed price.
//
#[derive(Debug, Clone, PartialEq)]
pub struct SamplePoint {
    pub inst_id: String,
    pub idx_px: f64,
    pub timestamp: DateTime<Utc>,
}

impl SamplePoint {
    /// Builds a point stamped with the current wall-clock time.
    pub fn now(inst_id: impl Into<String>, idx_px: f64) -> Self {
        Self {
            inst_id: inst_id.into(),
            idx_px,
            timestamp: Utc::now(),
        }
    }

    /// Converts the point into an InfluxDB data point with
    /// nanosecond precision.
    pub fn to_data_point(&self) -> anyhow::Result<DataPoint> {
        let mut builder = DataPoint::builder(MEASUREMENT)
            .tag(TAG_INST_ID, self.inst_id.as_str())
            .field(FIELD_IDX_PX, self.idx_px);

        // Dates past 2262 overflow i64 nanoseconds; let the server stamp those.
        if let Some(ns) = self.timestamp.timestamp_nanos_opt() {
            builder = builder.timestamp(ns);
        }

        Ok(builder.build()?)
    }
}
