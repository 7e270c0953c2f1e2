//! HTTP Types
//!
//! Verbs, endpoints, tasks and status ranges used to describe a resource.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::Range;

use super::Parameters;

/// HTTP status code.
pub type HttpCode = u16;

/// Half-open range of HTTP status codes.
pub type HttpCodes = Range<HttpCode>;

/// Status codes treated as success unless a call overrides them.
pub const SUCCESS_CODES: HttpCodes = 200..300;

/// Resource-level header map. Later entries for the same name win.
pub type HttpHeaders = BTreeMap<String, String>;

/// HTTP method.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum HttpMethod {
    Get,
    Post,
    Put,
    Delete,
    Patch,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<HttpMethod> for reqwest::Method {
    fn from(method: HttpMethod) -> Self {
        match method {
            HttpMethod::Get => reqwest::Method::GET,
            HttpMethod::Post => reqwest::Method::POST,
            HttpMethod::Put => reqwest::Method::PUT,
            HttpMethod::Delete => reqwest::Method::DELETE,
            HttpMethod::Patch => reqwest::Method::PATCH,
        }
    }
}

/// Verb plus path of a resource.
///
/// The path is appended to the repository base URL, or used verbatim when
/// the call runs in full-path mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Endpoint {
    Get(String),
    Post(String),
    Put(String),
    Delete(String),
    Patch(String),
}

impl Endpoint {
    pub fn get(path: impl Into<String>) -> Self {
        Self::Get(path.into())
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::Post(path.into())
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::Put(path.into())
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::Delete(path.into())
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::Patch(path.into())
    }

    /// Path component.
    pub fn path(&self) -> &str {
        match self {
            Self::Get(path)
            | Self::Post(path)
            | Self::Put(path)
            | Self::Delete(path)
            | Self::Patch(path) => path,
        }
    }

    /// HTTP method for this endpoint.
    pub fn method(&self) -> HttpMethod {
        match self {
            Self::Get(_) => HttpMethod::Get,
            Self::Post(_) => HttpMethod::Post,
            Self::Put(_) => HttpMethod::Put,
            Self::Delete(_) => HttpMethod::Delete,
            Self::Patch(_) => HttpMethod::Patch,
        }
    }
}

/// Cache-policy hint passed through to the transport.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CachePolicy {
    /// Follow the protocol's own caching rules.
    #[default]
    UseProtocol,
    /// Always go to the origin.
    ReloadIgnoringCache,
    /// Serve stale cache entries, loading only on a miss.
    ReturnCacheElseLoad,
    /// Serve from cache or fail.
    ReturnCacheDontLoad,
}

impl CachePolicy {
    /// `Cache-Control` request directive for this policy.
    pub fn cache_control(&self) -> Option<&'static str> {
        match self {
            Self::UseProtocol => None,
            Self::ReloadIgnoringCache => Some("no-cache"),
            Self::ReturnCacheElseLoad => Some("max-stale"),
            Self::ReturnCacheDontLoad => Some("only-if-cached"),
        }
    }
}

/// How a parameter map is written into the request.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ParameterEncoding {
    /// URL parameters go into the query string.
    UrlEncoding,
    /// Body parameters become a JSON object body.
    JsonEncoding,
    /// Query string from URL parameters and JSON body from body parameters.
    UrlAndJsonEncoding,
}

/// Request payload shape.
#[derive(Clone, Debug, PartialEq)]
pub enum HttpTask {
    /// No parameters; forces a JSON content type.
    Request,
    RequestParameters {
        body_parameters: Option<Parameters>,
        encoding: ParameterEncoding,
        url_parameters: Option<Parameters>,
    },
    RequestParametersAndHeaders {
        body_parameters: Option<Parameters>,
        body_encoding: ParameterEncoding,
        url_parameters: Option<Parameters>,
        additional_headers: Option<HttpHeaders>,
    },
}

impl HttpTask {
    /// Query-string parameters only.
    pub fn url_parameters(parameters: Parameters) -> Self {
        Self::RequestParameters {
            body_parameters: None,
            encoding: ParameterEncoding::UrlEncoding,
            url_parameters: Some(parameters),
        }
    }

    /// JSON body parameters only.
    pub fn json_body(parameters: Parameters) -> Self {
        Self::RequestParameters {
            body_parameters: Some(parameters),
            encoding: ParameterEncoding::JsonEncoding,
            url_parameters: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_method_and_path() {
        let endpoint = Endpoint::post("/account/register");
        assert_eq!(endpoint.method(), HttpMethod::Post);
        assert_eq!(endpoint.path(), "/account/register");
        assert_eq!(Endpoint::patch("/x").method().as_str(), "PATCH");
    }

    #[test]
    fn test_success_codes() {
        assert!(SUCCESS_CODES.contains(&200));
        assert!(SUCCESS_CODES.contains(&299));
        assert!(!SUCCESS_CODES.contains(&300));
        assert!(!SUCCESS_CODES.contains(&199));
    }

    #[test]
    fn test_cache_control_mapping() {
        assert_eq!(CachePolicy::default().cache_control(), None);
        assert_eq!(
            CachePolicy::ReloadIgnoringCache.cache_control(),
            Some("no-cache")
        );
        assert_eq!(
            CachePolicy::ReturnCacheDontLoad.cache_control(),
            Some("only-if-cached")
        );
    }

    #[test]
    fn test_reqwest_method_conversion() {
        assert_eq!(reqwest::Method::from(HttpMethod::Delete), reqwest::Method::DELETE);
    }
}
