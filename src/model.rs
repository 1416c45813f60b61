use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A persisted voice note: audio blob reference, transcript, optional
/// cached summary, and metadata.
///
/// Wire names are camelCase to match the document schema.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Recording {
    /// Unique identifier, generated at creation, never reused
    pub id: String,

    /// Human label; defaults to a generated placeholder
    pub title: String,

    /// Concatenated finalized speech text; may be empty at creation
    pub transcript: String,

    /// AI-generated summary; absent until first requested, cached after
    pub summary: Option<String>,

    /// Blob filename under the uploads directory; immutable once set
    pub audio_reference: String,

    /// Client-measured session length in seconds, set once at creation
    pub duration_secs: u64,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Recording {
    /// Create a new recording with a fresh UUID and placeholder title.
    pub fn new(
        title: Option<String>,
        transcript: String,
        audio_reference: String,
        duration_secs: u64,
    ) -> Self {
        let now = Utc::now();
        let id = uuid::Uuid::new_v4().to_string();
        let title = title.unwrap_or_else(|| format!("Recording {}", now.to_rfc3339()));

        Self {
            id,
            title,
            transcript,
            summary: None,
            audio_reference,
            duration_secs,
            created_at: now,
            updated_at: now,
        }
    }

    /// Refresh `updated_at`; call on every mutation.
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// Pagination metadata for list responses
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page (1-indexed)
    pub current: u64,

    /// Total number of pages
    pub total: u64,

    /// Total number of recordings across all pages
    pub count: u64,
}

/// Envelope for `GET /recordings`
#[derive(Debug, Serialize, Deserialize)]
pub struct RecordingPage {
    pub recordings: Vec<Recording>,
    pub pagination: Pagination,
}
