use std::time::Duration;

use anyhow::{Context, anyhow};
use futures_util::stream;
use reqwest::Url;

use crate::schema::SamplePoint;

use super::PointSink;

/// InfluxDB v2 writer
///
/// Writes one point per request through the official client:
///
///   POST /api/v2/write?org=<org>&bucket=<bucket>
///   Authorization: Token <token>
///
/// Blocking from the collector's point of view: the future resolves
/// only once InfluxDB answered, or the timeout elapsed.
pub struct InfluxSink {
    client: influxdb2::Client,
    bucket: String,
    timeout: Duration,
}

impl InfluxSink {
    pub fn new(
        base_url: &str,
        token: impl Into<String>,
        org: &str,
        bucket: &str,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        Url::parse(base_url).with_context(|| format!("invalid INFLUXDB_URL: {}", base_url))?;

        Ok(Self {
            client: influxdb2::Client::new(base_url, org, token),
            bucket: bucket.to_string(),
            timeout,
        })
    }
}

#[async_trait::async_trait]
impl PointSink for InfluxSink {
    fn name(&self) -> &'static str {
        "influxdb"
    }

    async fn write_point(&self, point: &SamplePoint) -> anyhow::Result<()> {
        let data_point = point.to_data_point()?;

        tokio::time::timeout(
            self.timeout,
            self.client.write(&self.bucket, stream::iter(vec![data_point])),
        )
        .await
        .map_err(|_| anyhow!("InfluxDB write timed out after {:?}", self.timeout))?
        .context("InfluxDB rejected write")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{Reply, serve_once};
    use chrono::{TimeZone, Utc};

    fn point() -> SamplePoint {
        SamplePoint {
            inst_id: "BTC-USDT".to_string(),
            idx_px: 64000.5,
            timestamp: Utc.timestamp_opt(1_700_000_000, 0).unwrap(),
        }
    }

    fn sink(base_url: &str, timeout: Duration) -> InfluxSink {
        InfluxSink::new(base_url, "secret-token", "MyOrg", "MyBucket", timeout).unwrap()
    }

    #[test]
    fn bad_base_url_fails_construction() {
        let err = InfluxSink::new("localhost", "t", "o", "b", Duration::from_secs(1));
        assert!(err.is_err());
    }

    #[tokio::test]
    async fn accepted_write_sends_token_and_point() {
        let server = serve_once(Reply::status(204, "No Content", "")).await;

        sink(&server.base_url, Duration::from_secs(5))
            .write_point(&point())
            .await
            .unwrap();

        let request = server.request.await.unwrap();
        let lower = request.to_ascii_lowercase();
        assert!(lower.starts_with("post /api/v2/write?"));
        assert!(lower.contains("org=myorg"));
        assert!(lower.contains("bucket=mybucket"));
        assert!(lower.contains("authorization: token secret-token"));
        assert!(request.contains("coin_price,instId=BTC-USDT idxPx=64000.5 1700000000000000000"));
    }

    #[tokio::test]
    async fn rejected_write_is_an_error() {
        let server = serve_once(Reply::status(
            401,
            "Unauthorized",
            r#"{"code":"unauthorized","message":"unauthorized access"}"#,
        ))
        .await;

        let result = sink(&server.base_url, Duration::from_secs(5))
            .write_point(&point())
            .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn stalled_server_hits_the_timeout() {
        let server = serve_once(Reply::Stall).await;

        let err = sink(&server.base_url, Duration::from_millis(200))
            .write_point(&point())
            .await
            .unwrap_err();

        assert!(err.to_string().contains("timed out"));
    }
}
