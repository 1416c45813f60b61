use anyhow::Result;

/// Language-model provider seam.
///
/// One call per generation attempt; the service layers caching, truncation,
/// retry, and rate limiting on top. Implementations must be safe to call
/// concurrently.
#[async_trait::async_trait]
pub trait SummaryProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &str;

    /// Produce a completion for the structuring instruction + transcript.
    async fn complete(&self, instruction: &str, transcript: &str) -> Result<String>;
}
