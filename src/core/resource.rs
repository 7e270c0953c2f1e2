//! Resource Descriptors
//!
//! A resource describes one endpoint call and compiles to an [`HttpRequest`].
//!
//! Per-feature APIs usually implement [`Resource`] on an enum with one
//! variant per endpoint; [`ResourceDescriptor`] covers ad-hoc calls.

use reqwest::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use url::Url;

use super::encoding::{EncodingError, JSON_CONTENT_TYPE};
use super::transport::HttpRequest;
use crate::error::NetworkError;
use crate::types::{CachePolicy, Endpoint, HttpHeaders, HttpTask};

/// Declarative description of an endpoint call.
pub trait Resource: Send + Sync {
    /// Verb and path.
    fn endpoint(&self) -> Endpoint;

    /// Parameter payload.
    fn task(&self) -> HttpTask;

    /// Headers applied before the task's parameters.
    fn headers(&self) -> Option<HttpHeaders> {
        None
    }

    fn cache_policy(&self) -> CachePolicy {
        CachePolicy::default()
    }

    /// Query keys whose values are appended without escaping.
    fn passthrough_query_keys(&self) -> Vec<String> {
        Vec::new()
    }

    /// Compile against a base URL (`base_url + path`).
    fn url_request(&self, base_url: &str) -> Result<HttpRequest, NetworkError> {
        if base_url.is_empty() {
            return Err(NetworkError::InvalidUrl);
        }
        let url = Url::parse(&format!("{}{}", base_url, self.endpoint().path()))
            .map_err(|_| NetworkError::InvalidUrl)?;
        compile(self, url)
    }

    /// Compile using the endpoint path as the absolute URL.
    fn full_path_request(&self) -> Result<HttpRequest, NetworkError> {
        let endpoint = self.endpoint();
        if endpoint.path().is_empty() {
            return Err(NetworkError::InvalidUrl);
        }
        let url = Url::parse(endpoint.path()).map_err(|_| NetworkError::InvalidUrl)?;
        compile(self, url)
    }
}

fn compile<R: Resource + ?Sized>(resource: &R, url: Url) -> Result<HttpRequest, NetworkError> {
    let mut request = HttpRequest::new(resource.endpoint().method(), url);
    request.cache_policy = resource.cache_policy();

    if let Some(headers) = resource.headers() {
        apply_headers(&mut request, &headers)?;
    }

    let passthrough = resource.passthrough_query_keys();
    match resource.task() {
        HttpTask::Request => {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        HttpTask::RequestParameters {
            body_parameters,
            encoding,
            url_parameters,
        } => {
            encoding.encode(
                &mut request,
                body_parameters.as_ref(),
                url_parameters.as_ref(),
                &passthrough,
            )?;
        }
        HttpTask::RequestParametersAndHeaders {
            body_parameters,
            body_encoding,
            url_parameters,
            additional_headers,
        } => {
            if let Some(headers) = additional_headers {
                apply_headers(&mut request, &headers)?;
            }
            body_encoding.encode(
                &mut request,
                body_parameters.as_ref(),
                url_parameters.as_ref(),
                &passthrough,
            )?;
        }
    }

    Ok(request)
}

fn apply_headers(request: &mut HttpRequest, headers: &HttpHeaders) -> Result<(), EncodingError> {
    for (name, value) in headers {
        let header_name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|_| EncodingError::InvalidHeader { name: name.clone() })?;
        let header_value = HeaderValue::from_str(value)
            .map_err(|_| EncodingError::InvalidHeader { name: name.clone() })?;
        request.headers.insert(header_name, header_value);
    }
    Ok(())
}

/// Immutable resource for ad-hoc calls.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceDescriptor {
    endpoint: Endpoint,
    task: HttpTask,
    headers: Option<HttpHeaders>,
    cache_policy: CachePolicy,
    passthrough_keys: Vec<String>,
}

impl ResourceDescriptor {
    /// Create a descriptor with no parameters.
    pub fn new(endpoint: Endpoint) -> Self {
        Self {
            endpoint,
            task: HttpTask::Request,
            headers: None,
            cache_policy: CachePolicy::default(),
            passthrough_keys: Vec::new(),
        }
    }

    pub fn with_task(mut self, task: HttpTask) -> Self {
        self.task = task;
        self
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers
            .get_or_insert_with(HttpHeaders::new)
            .insert(name.into(), value.into());
        self
    }

    pub fn with_cache_policy(mut self, policy: CachePolicy) -> Self {
        self.cache_policy = policy;
        self
    }

    pub fn with_passthrough_key(mut self, key: impl Into<String>) -> Self {
        self.passthrough_keys.push(key.into());
        self
    }
}

impl Resource for ResourceDescriptor {
    fn endpoint(&self) -> Endpoint {
        self.endpoint.clone()
    }

    fn task(&self) -> HttpTask {
        self.task.clone()
    }

    fn headers(&self) -> Option<HttpHeaders> {
        self.headers.clone()
    }

    fn cache_policy(&self) -> CachePolicy {
        self.cache_policy
    }

    fn passthrough_query_keys(&self) -> Vec<String> {
        self.passthrough_keys.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::encoding::FORM_CONTENT_TYPE;
    use crate::types::{parameters, HttpMethod, ParameterEncoding};

    #[test]
    fn test_url_request_joins_base_and_path() {
        let resource = ResourceDescriptor::new(Endpoint::get("/users/42"));
        let request = resource.url_request("https://api.example.com").unwrap();

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.url.as_str(), "https://api.example.com/users/42");
        assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));
        assert!(request.body.is_none());
    }

    #[test]
    fn test_empty_base_is_invalid() {
        let resource = ResourceDescriptor::new(Endpoint::get("https://api.example.com/users"));
        assert_eq!(
            resource.url_request("").unwrap_err(),
            NetworkError::InvalidUrl
        );
    }

    #[test]
    fn test_unparseable_url_is_invalid() {
        let resource = ResourceDescriptor::new(Endpoint::get("/users"));
        assert_eq!(
            resource.url_request("not a url").unwrap_err(),
            NetworkError::InvalidUrl
        );
        let empty = ResourceDescriptor::new(Endpoint::get(""));
        assert_eq!(empty.full_path_request().unwrap_err(), NetworkError::InvalidUrl);
    }

    #[test]
    fn test_full_path_request() {
        let resource = ResourceDescriptor::new(Endpoint::post("https://auth.example.com/token"));
        let request = resource.full_path_request().unwrap();
        assert_eq!(request.url.as_str(), "https://auth.example.com/token");
        assert_eq!(request.method, HttpMethod::Post);
    }

    #[test]
    fn test_headers_and_cache_policy() {
        let resource = ResourceDescriptor::new(Endpoint::get("/feed"))
            .with_header("Authorization", "Bearer abc")
            .with_header("X-Trace", "1")
            .with_cache_policy(CachePolicy::ReloadIgnoringCache);
        let request = resource.url_request("https://api.example.com").unwrap();

        assert_eq!(request.header("authorization"), Some("Bearer abc"));
        assert_eq!(request.header("x-trace"), Some("1"));
        assert_eq!(request.cache_policy, CachePolicy::ReloadIgnoringCache);
    }

    #[test]
    fn test_plain_request_forces_json_content_type() {
        let resource = ResourceDescriptor::new(Endpoint::get("/feed"))
            .with_header("Content-Type", "text/plain");
        let request = resource.url_request("https://api.example.com").unwrap();
        assert_eq!(request.header("content-type"), Some(JSON_CONTENT_TYPE));
    }

    #[test]
    fn test_additional_headers_override_resource_headers() {
        let mut extra = HttpHeaders::new();
        extra.insert("X-Client".to_string(), "task".to_string());
        let resource = ResourceDescriptor::new(Endpoint::get("/feed"))
            .with_header("X-Client", "resource")
            .with_task(HttpTask::RequestParametersAndHeaders {
                body_parameters: None,
                body_encoding: ParameterEncoding::UrlEncoding,
                url_parameters: Some(parameters([("page", "1")])),
                additional_headers: Some(extra),
            });
        let request = resource.url_request("https://api.example.com").unwrap();

        assert_eq!(request.header("x-client"), Some("task"));
        assert_eq!(request.url.query(), Some("page=1"));
        assert_eq!(request.header("content-type"), Some(FORM_CONTENT_TYPE));
    }

    #[test]
    fn test_both_mode_with_one_map_matches_plain_request_headers() {
        let half = ResourceDescriptor::new(Endpoint::post("/items"))
            .with_header("X-App", "demo")
            .with_task(HttpTask::RequestParameters {
                body_parameters: Some(parameters([("name", "x")])),
                encoding: ParameterEncoding::UrlAndJsonEncoding,
                url_parameters: None,
            });
        let plain = ResourceDescriptor::new(Endpoint::post("/items")).with_header("X-App", "demo");

        let half_request = half.url_request("https://api.example.com").unwrap();
        let mut plain_request = plain.url_request("https://api.example.com").unwrap();
        plain_request.headers.remove(CONTENT_TYPE);

        assert_eq!(half_request.headers, plain_request.headers);
        assert!(half_request.header("content-type").is_none());
        assert!(half_request.body.is_none());
        assert_eq!(half_request.url, plain_request.url);
    }

    #[test]
    fn test_encoding_failure_surfaces() {
        let resource = ResourceDescriptor::new(Endpoint::get("/items")).with_task(
            HttpTask::url_parameters(parameters([(
                "ids",
                serde_json::json!([1, 2]),
            )])),
        );
        let error = resource.url_request("https://api.example.com").unwrap_err();
        assert!(matches!(error, NetworkError::EncodingFailure(_)));
    }

    #[test]
    fn test_invalid_header_surfaces_as_encoding_failure() {
        let resource =
            ResourceDescriptor::new(Endpoint::get("/items")).with_header("Bad Header", "x");
        let error = resource.url_request("https://api.example.com").unwrap_err();
        assert!(matches!(error, NetworkError::EncodingFailure(_)));
    }

    #[test]
    fn test_passthrough_keys_reach_encoder() {
        let resource = ResourceDescriptor::new(Endpoint::get("/search"))
            .with_passthrough_key("q")
            .with_task(HttpTask::url_parameters(parameters([("q", "a+b")])));
        let request = resource.url_request("https://api.example.com").unwrap();
        assert_eq!(request.url.query(), Some("q=a+b"));
    }
}
