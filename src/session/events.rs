use super::machine::TranscriptLine;
use serde::{Deserialize, Serialize};

/// Error classes the controller reports outward. Each failure path surfaces
/// one of these; none is swallowed silently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionErrorKind {
    /// Microphone or recognition access denied
    Permission,
    /// Capture or recognition engine failure
    Recording,
    /// Persistence upload failed
    Network,
}

/// Inbound events from the capture/recognition engines and the UI shell.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// User asked to start a session
    StartRequested,
    /// Microphone + recognition capability acquired
    PermissionGranted,
    /// Permission denied or capability unsupported
    PermissionDenied,
    /// One second of elapsed recording time
    Tick,
    /// Interim recognition result; replaces the current unfinalized line
    InterimSegment(String),
    /// Finalized recognition result; appended as a timestamped line
    FinalSegment(String),
    /// A captured audio chunk
    AudioChunk(Vec<u8>),
    /// Recognition engine ended on its own; carries the epoch it was
    /// started under so stale events can be discarded
    RecognitionEnded { epoch: u64 },
    /// Unrecoverable capture/recognition failure
    EngineFailed(String),
    /// User asked to stop the session
    StopRequested,
    /// Upload outcome for the finalized artifact
    UploadSucceeded { recording_id: String },
    UploadFailed,
    /// User asked to retry a failed upload with the held artifact
    RetryUpload,
}

/// Effects the shell must execute after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEffect {
    /// Acquire microphone permission and the recognition capability
    AcquireCapabilities,
    /// Start (or restart) the recognition engine under the given epoch
    StartRecognition { epoch: u64 },
    /// Start audio capture
    StartCapture,
    /// Deterministically halt capture and recognition
    StopEngines,
    /// Persist the finished artifact
    Upload(RecordingArtifact),
    /// Surface an error to the user
    ReportError(SessionErrorKind),
}

/// The finished, internally consistent artifact handed to persistence.
///
/// The caller holds this across upload retries, so a failed upload never
/// requires re-recording.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordingArtifact {
    /// Space-joined finalized line texts, in timestamp order
    pub transcript: String,

    /// The timestamped lines, for transcript/playback sync on later view
    pub lines: Vec<TranscriptLine>,

    /// Concatenation of all captured audio chunks
    pub audio: Vec<u8>,

    /// Final elapsed-counter value, not wall-clock delta
    pub duration_secs: u64,
}
