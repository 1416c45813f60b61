//! Summary generation
//!
//! Cached, retried, rate-limited summaries over an abstract language-model
//! provider. The default path returns the cached summary untouched; the
//! provider is only called on first request or explicit regeneration, and a
//! failed generation never caches anything partial.

mod openai;
mod provider;
mod ratelimit;
mod retry;

pub use openai::OpenAiProvider;
pub use provider::SummaryProvider;
pub use ratelimit::FixedWindowLimiter;
pub use retry::RetryPolicy;

use crate::config::SummaryConfig;
use crate::error::AppError;
use crate::store::RecordingStore;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

/// Returned when a summary is requested before any transcript exists.
/// Deliberately not an error and never cached.
pub const NOT_READY_MESSAGE: &str =
    "No transcript is available yet. The summary will be generated once the transcript is ready.";

/// Appended when the transcript exceeds the character budget.
pub const TRUNCATION_MARKER: &str = "\n[transcript truncated]";

/// Fixed structuring instruction sent with every generation.
const STRUCTURE_INSTRUCTION: &str = "You summarize voice-note transcripts. Respond with these \
sections: Topic, Key Points, Details, Action Items, Open Questions. Be concise and only use \
information present in the transcript.";

pub struct SummaryService {
    provider: Arc<dyn SummaryProvider>,
    store: RecordingStore,
    retry: RetryPolicy,
    limiter: FixedWindowLimiter,
    max_transcript_chars: usize,
}

impl SummaryService {
    pub fn new(
        provider: Arc<dyn SummaryProvider>,
        store: RecordingStore,
        retry: RetryPolicy,
        limiter: FixedWindowLimiter,
        max_transcript_chars: usize,
    ) -> Self {
        Self {
            provider,
            store,
            retry,
            limiter,
            max_transcript_chars,
        }
    }

    /// Assemble from config with the given provider.
    pub fn from_config(
        provider: Arc<dyn SummaryProvider>,
        store: RecordingStore,
        cfg: &SummaryConfig,
    ) -> Self {
        Self::new(
            provider,
            store,
            RetryPolicy::new(cfg.max_attempts, Duration::from_millis(cfg.retry_delay_ms)),
            FixedWindowLimiter::new(
                Duration::from_secs(cfg.rate_limit_window_secs),
                cfg.rate_limit_max,
            ),
            cfg.max_transcript_chars,
        )
    }

    /// Record one summary request from `caller` against the fixed window.
    pub fn check_rate_limit(&self, caller: &str) -> Result<(), AppError> {
        if self.limiter.allow(caller) {
            Ok(())
        } else {
            Err(AppError::RateLimited)
        }
    }

    /// Return the summary for a recording, generating and caching it when
    /// needed. `regenerate` forces a fresh provider call.
    pub async fn summary_for(&self, id: &str, regenerate: bool) -> Result<String, AppError> {
        let recording = self
            .store
            .get(id)
            .await
            .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))?;

        if !regenerate {
            if let Some(cached) = recording.summary {
                return Ok(cached);
            }
        }

        if recording.transcript.trim().is_empty() {
            return Ok(NOT_READY_MESSAGE.to_string());
        }

        let input = truncate_transcript(&recording.transcript, self.max_transcript_chars);

        info!(
            "Generating summary for recording {} via {} ({} chars)",
            id,
            self.provider.name(),
            input.len()
        );

        let provider = Arc::clone(&self.provider);
        let summary = self
            .retry
            .run(|_attempt| {
                let provider = Arc::clone(&provider);
                let input = input.clone();
                async move { provider.complete(STRUCTURE_INSTRUCTION, &input).await }
            })
            .await
            .map_err(|e| AppError::Upstream(e.to_string()))?;

        // Cache-write before responding so subsequent requests are free
        self.store
            .update(id, |rec| rec.summary = Some(summary.clone()))
            .await
            .map_err(AppError::Internal)?
            .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))?;

        Ok(summary)
    }
}

/// Bound the transcript to `budget` characters, keeping the head and
/// appending an explicit marker when anything was cut.
pub fn truncate_transcript(transcript: &str, budget: usize) -> String {
    match transcript.char_indices().nth(budget) {
        None => transcript.to_string(),
        Some((byte_idx, _)) => {
            let mut out = transcript[..byte_idx].to_string();
            out.push_str(TRUNCATION_MARKER);
            out
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn short_transcripts_pass_through_unchanged() {
        assert_eq!(truncate_transcript("hello world", 100), "hello world");
        assert_eq!(truncate_transcript("exact", 5), "exact");
    }

    #[test]
    fn long_transcripts_are_cut_with_marker() {
        let out = truncate_transcript("abcdefghij", 4);
        assert_eq!(out, format!("abcd{TRUNCATION_MARKER}"));
    }

    #[test]
    fn truncation_respects_char_boundaries() {
        let out = truncate_transcript("héllö wörld", 3);
        assert!(out.starts_with("hél"));
        assert!(out.ends_with(TRUNCATION_MARKER));
    }
}
