use std::time::Duration;

use anyhow::{Context, bail};

// ------------------------------------------------------------
// Defaults
// ------------------------------------------------------------
//
// Applied whenever a key is absent or set to an empty string.
//
pub const DEFAULT_INFLUX_URL: &str = "http://localhost:8086";
pub const DEFAULT_INST_ID: &str = "BTC-USDT";
pub const DEFAULT_ORG: &str = "MyOrg";
pub const DEFAULT_BUCKET: &str = "MyBucket";
pub const DEFAULT_FEED_URL: &str = "https://www.okx.com";
pub const DEFAULT_INTERVAL_SECS: u64 = 5;
pub const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 10;

// ------------------------------------------------------------
// Root configuration
// ------------------------------------------------------------
//
// Resolved exactly once at startup and passed by reference to
// the collector. Nothing re-reads the environment afterwards.
//
// Environment keys:
// - INFLUXDB_TOKEN   (required)
// - INFLUXDB_URL, INFLUXDB_ORG, INFLUXDB_BUCKET
// - INST_ID, INTERVAL
// - FEED_URL, HTTP_TIMEOUT
//
#[derive(Debug, Clone)]
pub struct Config {
    /// InfluxDB API token, passed through untouched
    pub token: String,

    /// Base URL of the InfluxDB instance
    pub influx_url: String,

    /// Instrument to poll (e.g. "BTC-USDT")
    pub inst_id: String,

    /// InfluxDB organization
    pub org: String,

    /// InfluxDB bucket
    pub bucket: String,

    /// Poll cadence. Zero means a single cycle, then exit.
    pub interval: Duration,

    /// Base URL of the price feed
    pub feed_url: String,

    /// Upper bound for both the fetch and the write
    pub http_timeout: Duration,
}

impl Config {
    /// Loads `.env` (if present) and resolves the configuration
    /// from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolves the configuration from an arbitrary key lookup.
    ///
    /// Empty values count as absent, so `INST_ID=` in a `.env`
    /// file falls back to the default instead of polling "".
    pub fn from_lookup<F>(lookup: F) -> anyhow::Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.is_empty());

        let Some(token) = get("INFLUXDB_TOKEN") else {
            bail!("INFLUXDB_TOKEN environment variable not set");
        };

        let interval = match get("INTERVAL") {
            Some(raw) => parse_secs("INTERVAL", &raw)?,
            None => DEFAULT_INTERVAL_SECS,
        };

        let http_timeout = match get("HTTP_TIMEOUT") {
            Some(raw) => parse_secs("HTTP_TIMEOUT", &raw)?,
            None => DEFAULT_HTTP_TIMEOUT_SECS,
        };
        if http_timeout == 0 {
            bail!("Invalid HTTP_TIMEOUT value: must be greater than zero");
        }

        Ok(Self {
            token,
            influx_url: get("INFLUXDB_URL").unwrap_or_else(|| DEFAULT_INFLUX_URL.to_string()),
            inst_id: get("INST_ID").unwrap_or_else(|| DEFAULT_INST_ID.to_string()),
            org: get("INFLUXDB_ORG").unwrap_or_else(|| DEFAULT_ORG.to_string()),
            bucket: get("INFLUXDB_BUCKET").unwrap_or_else(|| DEFAULT_BUCKET.to_string()),
            interval: Duration::from_secs(interval),
            feed_url: get("FEED_URL").unwrap_or_else(|| DEFAULT_FEED_URL.to_string()),
            http_timeout: Duration::from_secs(http_timeout),
        })
    }

    /// True when the collector should run exactly one cycle.
    pub fn single_shot(&self) -> bool {
        self.interval.is_zero()
    }
}

fn parse_secs(key: &str, raw: &str) -> anyhow::Result<u64> {
    raw.trim()
        .parse::<u64>()
        .with_context(|| format!("Invalid {} value: {}", key, raw))
}
