use super::range::parse_range;
use super::state::{AppState, ClientConfig};
use crate::error::AppError;
use crate::model::{Recording, RecordingPage};
use crate::store::decode_audio_data_url;
use anyhow::Context;
use axum::body::Body;
use axum::extract::{Path, Query, State};
use axum::http::{header, HeaderMap, StatusCode};
use axum::response::{IntoResponse, Json, Response};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

// ============================================================================
// Request/Response Types
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub page: Option<u64>,
    pub limit: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct CreateRecordingRequest {
    /// Base64 data-URL audio payload (required)
    pub audio: Option<String>,

    /// Optional title (a placeholder is generated if absent)
    pub title: Option<String>,

    /// Transcript captured client-side; may be empty and updated later
    pub transcript: Option<String>,

    /// Client-measured session duration in seconds
    pub duration: Option<u64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateTranscriptRequest {
    pub transcript: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryParams {
    pub regenerate: Option<bool>,
}

#[derive(Debug, Serialize)]
pub struct SummaryResponse {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: DateTime<Utc>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET /recordings
/// Paginated list, newest first
pub async fn list_recordings(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Json<RecordingPage> {
    let page = state
        .recordings
        .list(params.page.unwrap_or(1), params.limit.unwrap_or(20))
        .await;
    Json(page)
}

/// POST /recordings
/// Persist a finished recording: decode the audio payload, write the blob,
/// then create the metadata document referencing it
pub async fn create_recording(
    State(state): State<AppState>,
    Json(req): Json<CreateRecordingRequest>,
) -> Result<impl IntoResponse, AppError> {
    let audio = req
        .audio
        .filter(|a| !a.trim().is_empty())
        .ok_or_else(|| AppError::Validation("No audio data provided".to_string()))?;

    let (extension, bytes) =
        decode_audio_data_url(&audio).map_err(|e| AppError::Validation(e.to_string()))?;

    if bytes.is_empty() {
        return Err(AppError::Validation("Audio payload is empty".to_string()));
    }
    if bytes.len() as u64 > state.client_config.max_upload_bytes {
        return Err(AppError::Validation(format!(
            "Audio payload exceeds the {} byte limit",
            state.client_config.max_upload_bytes
        )));
    }

    let mut recording = Recording::new(
        req.title,
        req.transcript.unwrap_or_default(),
        String::new(),
        req.duration.unwrap_or(0),
    );

    // Blob first, then the document that references it
    recording.audio_reference = state
        .blobs
        .write(&recording.id, &extension, &bytes)
        .await?;

    let recording = state.recordings.insert(recording).await?;

    info!(
        "Created recording {} ({} bytes, {}s)",
        recording.id,
        bytes.len(),
        recording.duration_secs
    );

    Ok((StatusCode::CREATED, Json(recording)))
}

/// GET /recordings/:id
pub async fn get_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Recording>, AppError> {
    state
        .recordings
        .get(&id)
        .await
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))
}

/// PUT /recordings/:id
/// Update the transcript. An already-cached summary is left untouched;
/// regeneration is an explicit, separate request.
pub async fn update_transcript(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateTranscriptRequest>,
) -> Result<Json<Recording>, AppError> {
    state
        .recordings
        .update(&id, |rec| rec.transcript = req.transcript)
        .await?
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))
}

/// DELETE /recordings/:id
/// Remove the document and its blob; blob removal is best-effort
pub async fn delete_recording(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    let removed = state
        .recordings
        .delete(&id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))?;

    if let Err(e) = state.blobs.delete(&removed.audio_reference).await {
        warn!("Failed to remove blob for recording {}: {:#}", id, e);
    }

    info!("Deleted recording {}", id);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /recordings/:id/audio
/// Serve the audio blob; honors single byte-range requests so clients can
/// seek without downloading the whole file
pub async fn get_audio(
    State(state): State<AppState>,
    Path(id): Path<String>,
    headers: HeaderMap,
) -> Result<Response, AppError> {
    let recording = state
        .recordings
        .get(&id)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Recording {id} not found")))?;

    let total = state
        .blobs
        .len(&recording.audio_reference)
        .await
        .ok_or_else(|| AppError::NotFound(format!("Audio for recording {id} not found")))?;

    let range_header = headers
        .get(header::RANGE)
        .and_then(|value| value.to_str().ok());
    let content_type = content_type_for(&recording.audio_reference);

    match parse_range(range_header, total)? {
        Some(range) => {
            let bytes = state
                .blobs
                .read_span(&recording.audio_reference, range.start, range.end)
                .await?;

            Ok(Response::builder()
                .status(StatusCode::PARTIAL_CONTENT)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_RANGE, range.content_range())
                .header(header::CONTENT_LENGTH, range.len())
                .body(Body::from(bytes))
                .context("Failed to build partial audio response")?)
        }
        None => {
            let bytes = state.blobs.read(&recording.audio_reference).await?;

            Ok(Response::builder()
                .status(StatusCode::OK)
                .header(header::CONTENT_TYPE, content_type)
                .header(header::ACCEPT_RANGES, "bytes")
                .header(header::CONTENT_LENGTH, bytes.len())
                .body(Body::from(bytes))
                .context("Failed to build audio response")?)
        }
    }
}

/// GET /recordings/:id/summary?regenerate=<bool>
/// Cached by default; rate-limited per caller
pub async fn get_summary(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<SummaryParams>,
    headers: HeaderMap,
) -> Result<Json<SummaryResponse>, AppError> {
    let caller = caller_key(&headers);
    state.summaries.check_rate_limit(&caller)?;

    let content = state
        .summaries
        .summary_for(&id, params.regenerate.unwrap_or(false))
        .await?;

    Ok(Json(SummaryResponse { content }))
}

/// GET /config
pub async fn get_client_config(State(state): State<AppState>) -> Json<ClientConfig> {
    Json(state.client_config.as_ref().clone())
}

/// GET /health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: Utc::now(),
    })
}

/// Fallback for unknown routes
pub async fn not_found() -> AppError {
    AppError::NotFound("Not Found".to_string())
}

/// Rate-limit key for a caller: first forwarded address when behind a
/// proxy, otherwise a process-local key.
fn caller_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .map(|addr| addr.trim().to_string())
        .filter(|addr| !addr.is_empty())
        .unwrap_or_else(|| "local".to_string())
}

fn content_type_for(filename: &str) -> &'static str {
    match filename.rsplit('.').next() {
        Some("wav") => "audio/wav",
        Some("webm") => "audio/webm",
        Some("ogg") => "audio/ogg",
        Some("mp3") => "audio/mpeg",
        Some("m4a") => "audio/mp4",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn caller_key_prefers_first_forwarded_address() {
        let mut headers = HeaderMap::new();
        headers.insert("x-forwarded-for", "10.0.0.1, 10.0.0.2".parse().unwrap());
        assert_eq!(caller_key(&headers), "10.0.0.1");

        assert_eq!(caller_key(&HeaderMap::new()), "local");
    }

    #[test]
    fn content_type_follows_blob_extension() {
        assert_eq!(content_type_for("abc.wav"), "audio/wav");
        assert_eq!(content_type_for("abc.webm"), "audio/webm");
        assert_eq!(content_type_for("abc.bin"), "application/octet-stream");
    }
}
