use super::events::{RecordingArtifact, SessionEffect, SessionErrorKind, SessionEvent};
use serde::{Deserialize, Serialize};

/// One timestamped, finalized span of recognized speech.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptLine {
    /// Seconds offset from session start, taken from the elapsed counter
    /// at the moment the segment finalized
    pub offset_secs: u64,
    pub text: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionPhase {
    /// No active capture
    Idle,
    /// Acquiring microphone permission and recognition capability
    Armed,
    /// Capture and recognition running concurrently
    Recording,
    /// Stop requested; artifact built, upload in flight
    Finalizing,
    /// Unrecoverable engine failure; session state has been discarded
    Aborted,
}

/// The owned session state. All mutation goes through [`SessionState::apply`],
/// which consumes the state and returns the successor plus the effects the
/// shell must execute.
#[derive(Debug, Clone)]
pub struct SessionState {
    phase: SessionPhase,

    /// Bumped on every recognition start and on stop. Restart requests carry
    /// the epoch they were issued under; anything stale is discarded.
    epoch: u64,

    /// Elapsed-time counter, advanced once per tick. Duration is taken from
    /// here rather than wall clock to tolerate pause/resume drift.
    elapsed_secs: u64,

    lines: Vec<TranscriptLine>,

    /// The single in-place-updated interim line; no timestamp until final
    interim: Option<String>,

    chunks: Vec<Vec<u8>>,

    /// Held across upload retries so a failed upload never loses the session
    pending_upload: Option<RecordingArtifact>,
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionState {
    pub fn new() -> Self {
        Self {
            phase: SessionPhase::Idle,
            epoch: 0,
            elapsed_secs: 0,
            lines: Vec::new(),
            interim: None,
            chunks: Vec::new(),
            pending_upload: None,
        }
    }

    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn elapsed_secs(&self) -> u64 {
        self.elapsed_secs
    }

    pub fn lines(&self) -> &[TranscriptLine] {
        &self.lines
    }

    pub fn interim(&self) -> Option<&str> {
        self.interim.as_deref()
    }

    pub fn pending_upload(&self) -> Option<&RecordingArtifact> {
        self.pending_upload.as_ref()
    }

    /// Feed one event into the state machine.
    pub fn apply(mut self, event: SessionEvent) -> (Self, Vec<SessionEffect>) {
        use SessionEffect as Fx;
        use SessionEvent as Ev;
        use SessionPhase as Phase;

        let effects = match (self.phase, event) {
            (Phase::Idle | Phase::Aborted, Ev::StartRequested) => {
                self.phase = Phase::Armed;
                vec![Fx::AcquireCapabilities]
            }

            (Phase::Armed, Ev::PermissionGranted) => {
                self.phase = Phase::Recording;
                self.epoch += 1;
                self.elapsed_secs = 0;
                self.lines.clear();
                self.interim = None;
                self.chunks.clear();
                vec![Fx::StartCapture, Fx::StartRecognition { epoch: self.epoch }]
            }

            (Phase::Armed, Ev::PermissionDenied) => {
                self.phase = Phase::Idle;
                vec![Fx::ReportError(SessionErrorKind::Permission)]
            }

            (Phase::Armed, Ev::EngineFailed(_)) => {
                self.phase = Phase::Idle;
                vec![Fx::ReportError(SessionErrorKind::Recording)]
            }

            (Phase::Recording, Ev::Tick) => {
                self.elapsed_secs += 1;
                vec![]
            }

            (Phase::Recording, Ev::InterimSegment(text)) => {
                self.interim = Some(text);
                vec![]
            }

            (Phase::Recording, Ev::FinalSegment(text)) => {
                self.lines.push(TranscriptLine {
                    offset_secs: self.elapsed_secs,
                    text,
                });
                self.interim = None;
                vec![]
            }

            (Phase::Recording, Ev::AudioChunk(chunk)) => {
                self.chunks.push(chunk);
                vec![]
            }

            // Recognition engines time out on their own; restart only while
            // still recording and only for the current epoch.
            (Phase::Recording, Ev::RecognitionEnded { epoch }) if epoch == self.epoch => {
                vec![Fx::StartRecognition { epoch: self.epoch }]
            }

            (Phase::Recording, Ev::EngineFailed(_)) => {
                self.abort();
                vec![Fx::StopEngines, Fx::ReportError(SessionErrorKind::Recording)]
            }

            (Phase::Recording, Ev::StopRequested) => {
                // Invalidate any in-flight restart before the engines halt
                self.epoch += 1;
                self.phase = Phase::Finalizing;

                let artifact = self.build_artifact();
                self.pending_upload = Some(artifact.clone());
                vec![Fx::StopEngines, Fx::Upload(artifact)]
            }

            (Phase::Finalizing, Ev::UploadSucceeded { .. }) => {
                self.reset();
                vec![]
            }

            (Phase::Finalizing, Ev::UploadFailed) => {
                // Artifact stays held; the caller retries without re-recording
                vec![Fx::ReportError(SessionErrorKind::Network)]
            }

            (Phase::Finalizing, Ev::RetryUpload) => match &self.pending_upload {
                Some(artifact) => vec![Fx::Upload(artifact.clone())],
                None => vec![],
            },

            // Everything else is stale or out of phase: a late recognition
            // end after stop lands here and is discarded.
            _ => vec![],
        };

        (self, effects)
    }

    fn build_artifact(&self) -> RecordingArtifact {
        let transcript = self
            .lines
            .iter()
            .map(|line| line.text.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        RecordingArtifact {
            transcript,
            lines: self.lines.clone(),
            audio: self.chunks.concat(),
            duration_secs: self.elapsed_secs,
        }
    }

    fn abort(&mut self) {
        self.phase = SessionPhase::Aborted;
        self.elapsed_secs = 0;
        self.lines.clear();
        self.interim = None;
        self.chunks.clear();
        self.pending_upload = None;
    }

    fn reset(&mut self) {
        self.abort();
        self.phase = SessionPhase::Idle;
    }
}
