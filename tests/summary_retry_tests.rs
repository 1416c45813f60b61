// Integration tests for summary generation: caching, truncation, and the
// bounded retry policy around the provider, exercised with injected fakes.

use anyhow::Result;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::Duration;
use voicejot::error::AppError;
use voicejot::summary::{
    truncate_transcript, FixedWindowLimiter, RetryPolicy, SummaryProvider, SummaryService,
    TRUNCATION_MARKER,
};
use voicejot::{Recording, RecordingStore};

/// Fails the first `fail_attempts` calls, then succeeds. Records the
/// transcript it was last asked to summarize.
struct FlakyProvider {
    calls: AtomicU32,
    fail_attempts: u32,
    last_input: std::sync::Mutex<String>,
}

impl FlakyProvider {
    fn new(fail_attempts: u32) -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicU32::new(0),
            fail_attempts,
            last_input: std::sync::Mutex::new(String::new()),
        })
    }

    fn calls(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl SummaryProvider for FlakyProvider {
    fn name(&self) -> &str {
        "flaky"
    }

    async fn complete(&self, _instruction: &str, transcript: &str) -> Result<String> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        *self.last_input.lock().unwrap() = transcript.to_string();
        if n <= self.fail_attempts {
            anyhow::bail!("provider outage {n}");
        }
        Ok(format!("summary after {n} attempts"))
    }
}

struct Fixture {
    service: SummaryService,
    store: RecordingStore,
    provider: Arc<FlakyProvider>,
    _dir: tempfile::TempDir,
}

fn fixture(fail_attempts: u32, max_transcript_chars: usize) -> Result<Fixture> {
    let dir = tempfile::tempdir()?;
    let store = RecordingStore::open(dir.path())?;
    let provider = FlakyProvider::new(fail_attempts);

    let service = SummaryService::new(
        provider.clone(),
        store.clone(),
        RetryPolicy::new(3, Duration::from_millis(1)),
        FixedWindowLimiter::new(Duration::from_secs(60), 100),
        max_transcript_chars,
    );

    Ok(Fixture {
        service,
        store,
        provider,
        _dir: dir,
    })
}

async fn seed(store: &RecordingStore, transcript: &str) -> Result<String> {
    let rec = Recording::new(None, transcript.to_string(), "blob.wav".into(), 30);
    Ok(store.insert(rec).await?.id)
}

#[tokio::test]
async fn test_transient_failures_are_retried_then_cached() -> Result<()> {
    let fx = fixture(2, 12_000)?;
    let id = seed(&fx.store, "a long discussion about roadmaps").await?;

    let summary = fx.service.summary_for(&id, false).await.unwrap();
    assert_eq!(summary, "summary after 3 attempts");
    assert_eq!(fx.provider.calls(), 3);

    // Cached now: no further provider traffic
    let again = fx.service.summary_for(&id, false).await.unwrap();
    assert_eq!(again, summary);
    assert_eq!(fx.provider.calls(), 3);

    let stored = fx.store.get(&id).await.unwrap();
    assert_eq!(stored.summary.as_deref(), Some("summary after 3 attempts"));

    Ok(())
}

#[tokio::test]
async fn test_exhausted_retries_surface_upstream_and_cache_nothing() -> Result<()> {
    let fx = fixture(u32::MAX, 12_000)?;
    let id = seed(&fx.store, "doomed").await?;

    let err = fx.service.summary_for(&id, false).await.unwrap_err();
    assert!(matches!(err, AppError::Upstream(_)));
    assert_eq!(fx.provider.calls(), 3, "retry is bounded at three attempts");

    // No partial/garbled summary may ever be cached
    assert!(fx.store.get(&id).await.unwrap().summary.is_none());

    Ok(())
}

#[tokio::test]
async fn test_regenerate_replaces_cached_summary() -> Result<()> {
    let fx = fixture(0, 12_000)?;
    let id = seed(&fx.store, "transcript").await?;

    let first = fx.service.summary_for(&id, false).await.unwrap();
    assert_eq!(first, "summary after 1 attempts");

    let regenerated = fx.service.summary_for(&id, true).await.unwrap();
    assert_eq!(regenerated, "summary after 2 attempts");
    assert_eq!(
        fx.store.get(&id).await.unwrap().summary.as_deref(),
        Some("summary after 2 attempts")
    );

    Ok(())
}

#[tokio::test]
async fn test_unknown_recording_is_not_found() -> Result<()> {
    let fx = fixture(0, 12_000)?;

    let err = fx.service.summary_for("missing", false).await.unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
    assert_eq!(fx.provider.calls(), 0);

    Ok(())
}

#[tokio::test]
async fn test_transcript_is_truncated_before_the_provider_sees_it() -> Result<()> {
    let fx = fixture(0, 10)?;
    let id = seed(&fx.store, "0123456789ABCDEF").await?;

    fx.service.summary_for(&id, false).await.unwrap();

    let sent = fx.provider.last_input.lock().unwrap().clone();
    assert_eq!(sent, format!("0123456789{TRUNCATION_MARKER}"));

    Ok(())
}

#[test]
fn test_truncation_is_a_noop_within_budget() {
    assert_eq!(truncate_transcript("short", 10), "short");
}
