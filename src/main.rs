// ------------------------------------------------------------
// Module declarations
// ------------------------------------------------------------
//
// - config:    Configuration resolved from the environment
// - schema:    Feed envelope, ticker record and sample point types
// - util:      Shared helper utilities (instrument ids, log excerpts)
// - feed:      Price feed trait and the OKX index-tickers client
// - sink:      Point sink trait and the InfluxDB v2 writer
// - collector: Poll-parse-write cycle and its scheduling loop
// - metrics:   Process-wide cycle counters
//
mod config;
mod schema;
mod util;
mod feed;
mod sink;
mod collector;
mod metrics;
#[cfg(test)]
mod testing;

use anyhow::bail;
use log::info;

use collector::runner::run_collector;
use config::Config;
use feed::OkxIndexFeed;
use sink::InfluxSink;

// ------------------------------------------------------------
// Application entry point
// ------------------------------------------------------------
//
// Responsibilities:
// - Initialize logging
// - Load configuration (fatal on missing token / bad numbers)
// - Build the feed client and the InfluxDB writer
// - Run the collector until single-shot completion or a
//   write failure
//
// Exit status:
// - 0 after a successful single-shot cycle
// - 1 on configuration errors, write failures, or a single-shot
//   cycle that recorded nothing
//
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    // --------------------------------------------------------
    // Load configuration
    //
    // NOTE:
    // - The token is security-sensitive and never logged.
    // - Runs before any network client exists.
    // --------------------------------------------------------
    let cfg = Config::from_env()?;

    info!(
        "Configured with INFLUXDB_URL: {} INST_ID: {} INTERVAL: {} INFLUXDB_ORG: {} INFLUXDB_BUCKET: {} FEED_URL: {} HTTP_TIMEOUT: {}",
        cfg.influx_url,
        cfg.inst_id,
        cfg.interval.as_secs(),
        cfg.org,
        cfg.bucket,
        cfg.feed_url,
        cfg.http_timeout.as_secs(),
    );

    let feed = OkxIndexFeed::new(cfg.feed_url.clone(), cfg.http_timeout)?;
    let sink = InfluxSink::new(
        &cfg.influx_url,
        cfg.token.clone(),
        &cfg.org,
        &cfg.bucket,
        cfg.http_timeout,
    )?;

    let outcome = run_collector(&feed, &sink, &cfg).await?;

    // Only reachable in single-shot mode
    if !outcome.is_written() {
        bail!("single-shot cycle recorded no point: {:?}", outcome);
    }

    Ok(())
}
