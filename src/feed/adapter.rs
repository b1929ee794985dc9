use crate::schema::FeedEnvelope;

/// PriceFeed is the abstraction layer between:
/// - The collector loop
/// - A concrete market-data HTTP API
///
/// Each implementation must:
/// - Know its endpoint and query format
/// - Decode the response into a `FeedEnvelope`
///
/// THREAD SAFETY:
/// - Must be Send + Sync
///
#[async_trait::async_trait]
pub trait PriceFeed: Send + Sync {

    /// Returns the canonical feed name, used for logging.
    fn name(&self) -> &'static str;

    /// Fetches the latest index ticker for one instrument.
    ///
    /// RETURNS:
    /// - Ok(envelope) whenever a well-formed envelope was received,
    ///   including application-level errors (`code != "0"`)
    /// - Err for transport failures, timeouts and undecodable bodies
    ///
    /// MUST NOT:
    /// - Retry internally
    /// - Interpret `code` or `data`; that is the collector's job
    ///
    async fn fetch_index_ticker(&self, inst_id: &str) -> anyhow::Result<FeedEnvelope>;
}
