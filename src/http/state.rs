use crate::store::{BlobStore, RecordingStore};
use crate::summary::SummaryService;
use serde::Serialize;
use std::sync::Arc;

/// Shared application state for HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Recording metadata documents
    pub recordings: RecordingStore,

    /// Audio blobs
    pub blobs: BlobStore,

    /// Summary generation (cache + provider + retry + rate limit)
    pub summaries: Arc<SummaryService>,

    /// Static configuration exposed to clients via GET /config
    pub client_config: Arc<ClientConfig>,
}

/// Feature flags and limits the browser client needs up front.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    pub max_upload_bytes: u64,
    pub summary_enabled: bool,
    pub summary_rate_limit: RateLimitInfo,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitInfo {
    pub window_secs: u64,
    pub max_requests: u32,
}

impl AppState {
    pub fn new(
        recordings: RecordingStore,
        blobs: BlobStore,
        summaries: Arc<SummaryService>,
        client_config: ClientConfig,
    ) -> Self {
        Self {
            recordings,
            blobs,
            summaries,
            client_config: Arc::new(client_config),
        }
    }
}
