use std::sync::atomic::Ordering;

use anyhow::{Context, anyhow};
use log::{debug, error, info, warn};
use tokio::time::sleep;

use crate::{
    collector::{CycleOutcome, SkipReason},
    config::Config,
    feed::PriceFeed,
    metrics::METRICS,
    schema::SamplePoint,
    sink::PointSink,
};

/// Cycles between two `[METRICS]` summary lines
pub const SUMMARY_EVERY: usize = 60;

/// Runs the collector until single-shot completion or a write failure.
///
/// Behavior:
/// - interval == 0: exactly one cycle, its outcome is returned
/// - interval > 0: cycles forever, sleeping `interval` after each one,
///   whether it wrote a point or was skipped
///
/// GUARANTEES:
/// - Fetch, API and parse failures never stop the loop
/// - A write failure stops the loop immediately and is returned
///
pub async fn run_collector(
    feed: &dyn PriceFeed,
    sink: &dyn PointSink,
    cfg: &Config,
) -> anyhow::Result<CycleOutcome> {
    loop {
        let outcome = match run_cycle(feed, sink, &cfg.inst_id).await {
            Ok(outcome) => outcome,
            Err(e) => {
                error!("[WRITE] {} write failed, stopping: {:#}", sink.name(), e);
                info!("{}", METRICS.summary());
                return Err(e);
            }
        };

        if METRICS.cycles.load(Ordering::Relaxed) % SUMMARY_EVERY == 0 {
            info!("{}", METRICS.summary());
        }

        if cfg.single_shot() {
            return Ok(outcome);
        }

        sleep(cfg.interval).await;
    }
}

/// Performs exactly one poll-parse-write cycle.
///
/// Steps:
/// 1. Fetch the envelope from the feed
/// 2. Reject non-success codes and empty data sets
/// 3. Parse the first ticker's index price
/// 4. Write one point stamped with the current time
///
/// RETURNS:
/// - Ok(outcome) for every recoverable path, after logging it
/// - Err only when the sink failed to store the point
///
pub async fn run_cycle(
    feed: &dyn PriceFeed,
    sink: &dyn PointSink,
    inst_id: &str,
) -> anyhow::Result<CycleOutcome> {
    METRICS.cycles.fetch_add(1, Ordering::Relaxed);

    let envelope = match feed.fetch_index_ticker(inst_id).await {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!("[FETCH] failed to fetch {} from {}: {:#}", inst_id, feed.name(), e);
            METRICS.fetch_errors.fetch_add(1, Ordering::Relaxed);
            return Ok(CycleOutcome::Skipped(SkipReason::Fetch));
        }
    };

    if !envelope.is_success() {
        warn!(
            "[API] {} returned code={} msg={:?}",
            feed.name(),
            envelope.code,
            envelope.msg
        );
        METRICS.api_errors.fetch_add(1, Ordering::Relaxed);
        return Ok(CycleOutcome::Skipped(SkipReason::Api));
    }

    let Some(ticker) = envelope.data.first() else {
        info!("[NO DATA] {} returned no tickers for {}", feed.name(), inst_id);
        METRICS.empty_responses.fetch_add(1, Ordering::Relaxed);
        return Ok(CycleOutcome::NoData);
    };

    let idx_px = match parse_price(&ticker.idx_px) {
        Ok(px) => px,
        Err(e) => {
            warn!("[PARSE] failed to parse index price for {}: {:#}", ticker.inst_id, e);
            METRICS.parse_errors.fetch_add(1, Ordering::Relaxed);
            return Ok(CycleOutcome::Skipped(SkipReason::Parse));
        }
    };

    let point = SamplePoint::now(ticker.inst_id.as_str(), idx_px);

    if let Err(e) = sink.write_point(&point).await {
        METRICS.write_errors.fetch_add(1, Ordering::Relaxed);
        return Err(e).with_context(|| format!("failed to write {} point", point.inst_id));
    }

    METRICS.points_written.fetch_add(1, Ordering::Relaxed);
    debug!("[POINT] {:?}", point);
    info!("[POINT] {} idxPx={}", point.inst_id, point.idx_px);

    Ok(CycleOutcome::Written(point))
}

/// Parses an index price string into a finite float.
pub fn parse_price(raw: &str) -> anyhow::Result<f64> {
    let px: f64 = raw
        .parse()
        .with_context(|| format!("invalid idxPx {:?}", raw))?;

    if !px.is_finite() {
        return Err(anyhow!("non-finite idxPx {:?}", raw));
    }

    Ok(px)
}
