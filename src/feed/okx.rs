use std::time::Duration;

use anyhow::{Context, anyhow};
use reqwest::{Client, StatusCode, Url};

use crate::{schema::FeedEnvelope, util};

use super::adapter::PriceFeed;

const INDEX_TICKERS_PATH: &str = "/api/v5/market/index-tickers";

/// Max body characters quoted in a decode error
const BODY_EXCERPT_CHARS: usize = 200;

/// OKX index-tickers client
///
/// OKX REST v5:
/// https://www.okx.com/docs-v5/en/#public-data-rest-api-get-index-tickers
///
/// DESIGN:
/// - Public endpoint, no authentication header
/// - One GET per call, no retries
/// - Request bounded by the configured timeout
pub struct OkxIndexFeed {
    client: Client,
    base_url: String,
}

impl OkxIndexFeed {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("failed to build feed HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Full request URL for one instrument.
    pub fn endpoint(&self, inst_id: &str) -> anyhow::Result<Url> {
        let base = self.base_url.trim_end_matches('/');
        Url::parse_with_params(
            &format!("{}{}", base, INDEX_TICKERS_PATH),
            &[("instId", inst_id)],
        )
        .with_context(|| format!("invalid feed URL: {}", self.base_url))
    }
}

#[async_trait::async_trait]
impl PriceFeed for OkxIndexFeed {

    fn name(&self) -> &'static str {
        "okx"
    }

    async fn fetch_index_ticker(&self, inst_id: &str) -> anyhow::Result<FeedEnvelope> {
        let url = self.endpoint(inst_id)?;

        let response = self
            .client
            .get(url)
            .send()
            .await
            .context("index-tickers request failed")?;

        let status = response.status();
        let body = response
            .text()
            .await
            .context("failed to read index-tickers response body")?;

        decode_envelope(status, &body)
    }
}

/// Decodes an index-tickers response body.
///
/// OKX reports application errors as a normal envelope, sometimes
/// under a 4xx status. Any body that decodes is returned as-is so
/// the collector can inspect `code`; only undecodable bodies fail.
pub fn decode_envelope(status: StatusCode, body: &str) -> anyhow::Result<FeedEnvelope> {
    serde_json::from_str::<FeedEnvelope>(body).map_err(|e| {
        anyhow!(
            "undecodable index-tickers response (HTTP {}): {}: {}",
            status,
            e,
            util::truncate_for_log(body, BODY_EXCERPT_CHARS)
        )
    })
}
