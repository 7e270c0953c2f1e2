//! Telemetry
//!
//! Request/response logging for repository calls. Engine-internal events
//! (dispatch, refresh, classification) go straight through `tracing`.

pub mod logging;

pub use logging::{
    format_request, format_response, InMemoryLogger, LogEntry, LogEntryKind, NetworkingLogLevel,
    NetworkingLogger, NoOpLogger, TracingLogger, REDACTED_QUERY_KEYS,
};
