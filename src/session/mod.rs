//! Recording session controller
//!
//! One recording session, from arming the capture/recognition engines to
//! handing a finished artifact to the upload path. The controller is a pure
//! state machine: the UI shell owns the engines and feeds their callbacks in
//! as `SessionEvent`s; the machine answers with `SessionEffect`s to execute.
//!
//! Recognition engines time out and fire an end event on their own; the
//! machine restarts recognition only while still recording and only for the
//! current epoch, so an end event that arrives after stop can never start
//! the engine again.

mod events;
mod machine;

pub use events::{RecordingArtifact, SessionEffect, SessionErrorKind, SessionEvent};
pub use machine::{SessionPhase, SessionState, TranscriptLine};
