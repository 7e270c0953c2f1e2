//! Logging
//!
//! Request/response diagnostics for repository calls.
//!
//! Verbosity is chosen per call with [`NetworkingLogLevel`]:
//!
//! - `Off`: nothing is written
//! - `Info`: request line, request headers and response status
//! - `Debug`: additionally the request body and the pretty-printed response body
//!
//! `Authorization` header values and credential query parameters
//! ([`REDACTED_QUERY_KEYS`]) are replaced with `[REDACTED]` at every level.

use reqwest::header::{HeaderMap, AUTHORIZATION};
use std::sync::{Mutex, PoisonError};
use std::time::{SystemTime, UNIX_EPOCH};
use url::Url;

use crate::core::{HttpRequest, HttpResponse};

/// Query parameters whose values are never logged.
pub const REDACTED_QUERY_KEYS: &[&str] = &["password", "client_secret", "refresh_token"];

/// Verbosity of request/response logging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord)]
pub enum NetworkingLogLevel {
    #[default]
    Off,
    Info,
    Debug,
}

impl std::fmt::Display for NetworkingLogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NetworkingLogLevel::Off => write!(f, "OFF"),
            NetworkingLogLevel::Info => write!(f, "INFO"),
            NetworkingLogLevel::Debug => write!(f, "DEBUG"),
        }
    }
}

/// Logger interface.
///
/// Implementations must not panic and must ignore `NetworkingLogLevel::Off`.
pub trait NetworkingLogger: Send + Sync {
    /// Log an outgoing request.
    fn log_request(&self, request: &HttpRequest, level: NetworkingLogLevel);

    /// Log a received response.
    fn log_response(&self, request: &HttpRequest, response: &HttpResponse, level: NetworkingLogLevel);
}

/// Render a request block.
pub fn format_request(request: &HttpRequest, level: NetworkingLogLevel) -> String {
    let mut lines = vec![
        "<==================== BEGIN ====================>".to_string(),
        format!("{} '{}'", request.method, display_url(&request.url)),
    ];

    let headers = format_headers(&request.headers);
    if !headers.is_empty() {
        lines.push(headers);
    }

    if level == NetworkingLogLevel::Debug {
        if let Some(body) = &request.body {
            lines.push(format!("  HttpBody : {}", String::from_utf8_lossy(body)));
        }
    }

    lines.join("\n")
}

/// Render a response block.
pub fn format_response(
    request: &HttpRequest,
    response: &HttpResponse,
    level: NetworkingLogLevel,
) -> String {
    let mut lines = vec![
        "<=================== RESPONSE ===================>".to_string(),
        format!(
            "Status code: {} ({} '{}')",
            response.status,
            request.method,
            display_url(&request.url)
        ),
    ];

    if level == NetworkingLogLevel::Debug {
        lines.push(format!("Data:    {}", pretty_json(&response.body)));
    }

    lines.push("<===================== END =====================>".to_string());
    lines.join("\n")
}

fn display_url(url: &Url) -> String {
    let query = match url.query() {
        Some(query) => query,
        None => return url.to_string(),
    };

    let mut base = url.clone();
    base.set_query(None);
    base.set_fragment(None);

    let pairs: Vec<String> = query
        .split('&')
        .map(|pair| match pair.split_once('=') {
            Some((key, _)) if REDACTED_QUERY_KEYS.contains(&key) => {
                format!("{}=[REDACTED]", key)
            }
            _ => pair.to_string(),
        })
        .collect();
    format!("{}?{}", base, pairs.join("&"))
}

fn format_headers(headers: &HeaderMap) -> String {
    if headers.is_empty() {
        return String::new();
    }

    let mut lines = vec!["Headers: [".to_string()];
    for (name, value) in headers {
        let value = if name == AUTHORIZATION {
            "[REDACTED]".to_string()
        } else {
            String::from_utf8_lossy(value.as_bytes()).into_owned()
        };
        lines.push(format!("  {} : {}", name, value));
    }
    lines.push("]".to_string());
    lines.join("\n")
}

fn pretty_json(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| serde_json::to_string_pretty(&value).ok())
        .unwrap_or_else(|| "Data empty".to_string())
}

/// Writes formatted blocks through `tracing`.
///
/// `Info` blocks are emitted with `info!`, `Debug` blocks with `debug!`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }

    fn emit(message: &str, level: NetworkingLogLevel) {
        match level {
            NetworkingLogLevel::Off => {}
            NetworkingLogLevel::Info => {
                tracing::info!(target: "cf_repositories::network", "\n{}", message)
            }
            NetworkingLogLevel::Debug => {
                tracing::debug!(target: "cf_repositories::network", "\n{}", message)
            }
        }
    }
}

impl NetworkingLogger for TracingLogger {
    fn log_request(&self, request: &HttpRequest, level: NetworkingLogLevel) {
        if level != NetworkingLogLevel::Off {
            Self::emit(&format_request(request, level), level);
        }
    }

    fn log_response(&self, request: &HttpRequest, response: &HttpResponse, level: NetworkingLogLevel) {
        if level != NetworkingLogLevel::Off {
            Self::emit(&format_response(request, response, level), level);
        }
    }
}

/// No-op logger implementation.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoOpLogger;

impl NetworkingLogger for NoOpLogger {
    fn log_request(&self, _request: &HttpRequest, _level: NetworkingLogLevel) {}
    fn log_response(&self, _request: &HttpRequest, _response: &HttpResponse, _level: NetworkingLogLevel) {}
}

/// What a log entry describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogEntryKind {
    Request,
    Response,
}

/// Log entry for in-memory storage.
#[derive(Debug, Clone)]
pub struct LogEntry {
    pub kind: LogEntryKind,
    pub level: NetworkingLogLevel,
    pub message: String,
    pub timestamp: u64,
}

/// In-memory logger for testing.
#[derive(Default)]
pub struct InMemoryLogger {
    entries: Mutex<Vec<LogEntry>>,
}

impl InMemoryLogger {
    /// Create new in-memory logger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Get all log entries.
    pub fn get_entries(&self) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Get entries of one kind.
    pub fn get_entries_by_kind(&self, kind: LogEntryKind) -> Vec<LogEntry> {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .filter(|e| e.kind == kind)
            .cloned()
            .collect()
    }

    /// Clear all entries.
    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn record(&self, kind: LogEntryKind, level: NetworkingLogLevel, message: String) {
        if level == NetworkingLogLevel::Off {
            return;
        }

        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_default()
            .as_millis() as u64;

        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(LogEntry {
                kind,
                level,
                message,
                timestamp,
            });
    }
}

impl NetworkingLogger for InMemoryLogger {
    fn log_request(&self, request: &HttpRequest, level: NetworkingLogLevel) {
        self.record(LogEntryKind::Request, level, format_request(request, level));
    }

    fn log_response(&self, request: &HttpRequest, response: &HttpResponse, level: NetworkingLogLevel) {
        self.record(
            LogEntryKind::Response,
            level,
            format_response(request, response, level),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::HttpMethod;
    use bytes::Bytes;
    use reqwest::header::{HeaderValue, CONTENT_TYPE};

    fn sample_request() -> HttpRequest {
        let mut request = HttpRequest::new(
            HttpMethod::Post,
            Url::parse("https://api.example.com/account/register").unwrap(),
        );
        request
            .headers
            .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        request
            .headers
            .insert(AUTHORIZATION, HeaderValue::from_static("Bearer secret-token"));
        request.body = Some(Bytes::from_static(br#"{"email":"a@b.c"}"#));
        request
    }

    #[test]
    fn test_level_ordering() {
        assert!(NetworkingLogLevel::Debug > NetworkingLogLevel::Info);
        assert!(NetworkingLogLevel::Info > NetworkingLogLevel::Off);
        assert_eq!(NetworkingLogLevel::default(), NetworkingLogLevel::Off);
    }

    #[test]
    fn test_info_request_has_headers_without_body() {
        let text = format_request(&sample_request(), NetworkingLogLevel::Info);
        assert!(text.contains("POST 'https://api.example.com/account/register'"));
        assert!(text.contains("content-type : application/json"));
        assert!(!text.contains("HttpBody"));
    }

    #[test]
    fn test_debug_request_has_body() {
        let text = format_request(&sample_request(), NetworkingLogLevel::Debug);
        assert!(text.contains(r#"HttpBody : {"email":"a@b.c"}"#));
    }

    #[test]
    fn test_authorization_is_redacted() {
        let text = format_request(&sample_request(), NetworkingLogLevel::Debug);
        assert!(text.contains("authorization : [REDACTED]"));
        assert!(!text.contains("secret-token"));
    }

    #[test]
    fn test_credential_query_values_are_redacted() {
        let request = HttpRequest::new(
            HttpMethod::Post,
            Url::parse(
                "https://auth.example.com/connect/token?client_id=mobile&client_secret=s3cret\
                 &grant_type=custom&password=hunter2&refresh_token=rt-1&username=jane%40example.com",
            )
            .unwrap(),
        );
        let response = HttpResponse::new(200, Bytes::new());

        for level in [NetworkingLogLevel::Info, NetworkingLogLevel::Debug] {
            let logged = format!(
                "{}\n{}",
                format_request(&request, level),
                format_response(&request, &response, level)
            );
            assert!(!logged.contains("s3cret"));
            assert!(!logged.contains("hunter2"));
            assert!(!logged.contains("rt-1"));
            assert!(logged.contains("client_id=mobile"));
            assert!(logged.contains("password=[REDACTED]"));
            assert!(logged.contains("username=jane%40example.com"));
        }
    }

    #[test]
    fn test_url_without_query_is_unchanged() {
        let url = Url::parse("https://api.example.com/feed").unwrap();
        assert_eq!(display_url(&url), "https://api.example.com/feed");
    }

    #[test]
    fn test_debug_response_pretty_prints_or_reports_empty() {
        let request = sample_request();
        let json = HttpResponse::new(200, r#"{"ok":true}"#);
        let text = format_response(&request, &json, NetworkingLogLevel::Debug);
        assert!(text.contains("Status code: 200"));
        assert!(text.contains("\"ok\": true"));

        let empty = HttpResponse::new(204, Bytes::new());
        let text = format_response(&request, &empty, NetworkingLogLevel::Debug);
        assert!(text.contains("Data empty"));

        let info = format_response(&request, &json, NetworkingLogLevel::Info);
        assert!(!info.contains("Data:"));
    }

    #[test]
    fn test_in_memory_logger_ignores_off() {
        let logger = InMemoryLogger::new();
        let request = sample_request();
        let response = HttpResponse::new(200, Bytes::new());

        logger.log_request(&request, NetworkingLogLevel::Off);
        logger.log_response(&request, &response, NetworkingLogLevel::Off);
        assert!(logger.get_entries().is_empty());

        logger.log_request(&request, NetworkingLogLevel::Info);
        logger.log_response(&request, &response, NetworkingLogLevel::Info);
        assert_eq!(logger.get_entries().len(), 2);
        assert_eq!(logger.get_entries_by_kind(LogEntryKind::Response).len(), 1);

        logger.clear();
        assert!(logger.get_entries().is_empty());
    }
}
