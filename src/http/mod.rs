//! HTTP API for the voice-note service:
//! - GET    /health                      - Liveness probe
//! - GET    /config                      - Client configuration
//! - GET    /recordings                  - Paginated list
//! - POST   /recordings                  - Persist a finished recording
//! - GET    /recordings/:id              - Fetch one recording
//! - PUT    /recordings/:id              - Update transcript
//! - DELETE /recordings/:id              - Delete recording + blob
//! - GET    /recordings/:id/audio        - Stream audio (range-aware)
//! - GET    /recordings/:id/summary      - Cached/generated summary

mod handlers;
mod range;
mod routes;
mod state;

pub use range::ByteRange;
pub use routes::create_router;
pub use state::{AppState, ClientConfig, RateLimitInfo};
