//! Persistence for recordings
//!
//! Two stores, both keyed by the recording id:
//! - `RecordingStore`: one JSON metadata document per recording
//! - `BlobStore`: one immutable audio blob file per recording

mod blobs;
mod documents;

pub use blobs::{decode_audio_data_url, BlobStore};
pub use documents::RecordingStore;
