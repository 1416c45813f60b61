pub mod config;
pub mod error;
pub mod http;
pub mod model;
pub mod playback;
pub mod session;
pub mod store;
pub mod summary;

pub use config::Config;
pub use error::AppError;
pub use http::{create_router, AppState};
pub use model::{Pagination, Recording, RecordingPage};
pub use playback::{current_line, seek_target, PlaybackSync};
pub use session::{
    RecordingArtifact, SessionEffect, SessionErrorKind, SessionEvent, SessionPhase, SessionState,
    TranscriptLine,
};
pub use store::{BlobStore, RecordingStore};
pub use summary::{OpenAiProvider, SummaryProvider, SummaryService};
