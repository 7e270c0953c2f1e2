//! Parameter Encoding
//!
//! Writes parameter maps into a request's query string or JSON body.

use bytes::Bytes;
use reqwest::header::{HeaderValue, CONTENT_TYPE};
use thiserror::Error;
use url::form_urlencoded::byte_serialize;

use super::transport::HttpRequest;
use crate::error::NetworkError;
use crate::types::{ParameterEncoding, Parameters};

/// Content type set by the query encoder when none is present.
pub const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded; charset=utf-8";

/// Content type set by the JSON encoder when none is present.
pub const JSON_CONTENT_TYPE: &str = "application/json";

/// Parameter encoding failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum EncodingError {
    #[error("Parameter `{key}` cannot be written to a query string")]
    NotQueryRepresentable { key: String },

    #[error("Parameter `{key}` is not representable as JSON")]
    NotJsonRepresentable { key: String },

    #[error("Parameter serialization failed: {message}")]
    Serialization { message: String },

    #[error("Invalid header `{name}`")]
    InvalidHeader { name: String },
}

impl From<EncodingError> for NetworkError {
    fn from(error: EncodingError) -> Self {
        NetworkError::EncodingFailure(error.to_string())
    }
}

/// Writes a parameter map into a request.
pub trait ParameterEncoder {
    fn encode(&self, request: &mut HttpRequest, parameters: &Parameters)
        -> Result<(), EncodingError>;
}

/// Appends parameters to the URL query.
///
/// Values are form-escaped: alphanumerics and `-._*` are kept, a space
/// becomes `+` and every other byte becomes `%XX`. Keys listed in
/// `passthrough_keys` are appended without escaping.
#[derive(Clone, Debug, Default)]
pub struct UrlParameterEncoder {
    passthrough_keys: Vec<String>,
}

impl UrlParameterEncoder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_passthrough(keys: &[String]) -> Self {
        Self {
            passthrough_keys: keys.to_vec(),
        }
    }

    fn is_passthrough(&self, key: &str) -> bool {
        self.passthrough_keys.iter().any(|k| k == key)
    }
}

/// Form-escape a query component.
pub fn percent_escape(value: &str) -> String {
    byte_serialize(value.as_bytes()).collect()
}

impl ParameterEncoder for UrlParameterEncoder {
    fn encode(
        &self,
        request: &mut HttpRequest,
        parameters: &Parameters,
    ) -> Result<(), EncodingError> {
        let mut items = Vec::with_capacity(parameters.len());
        for (key, value) in parameters {
            let text = value
                .to_query_value()
                .ok_or_else(|| EncodingError::NotQueryRepresentable { key: key.clone() })?;
            if self.is_passthrough(key) {
                items.push(format!("{}={}", key, text));
            } else {
                items.push(format!("{}={}", percent_escape(key), percent_escape(&text)));
            }
        }

        if !items.is_empty() {
            let appended = items.join("&");
            let query = match request.url.query() {
                Some(existing) if !existing.is_empty() => format!("{}&{}", existing, appended),
                _ => appended,
            };
            request.url.set_query(Some(&query));
        }

        if !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
        }
        Ok(())
    }
}

/// Serializes parameters as a JSON object body.
#[derive(Clone, Copy, Debug, Default)]
pub struct JsonParameterEncoder;

impl ParameterEncoder for JsonParameterEncoder {
    fn encode(
        &self,
        request: &mut HttpRequest,
        parameters: &Parameters,
    ) -> Result<(), EncodingError> {
        let mut object = serde_json::Map::with_capacity(parameters.len());
        for (key, value) in parameters {
            let json = value
                .to_json()
                .ok_or_else(|| EncodingError::NotJsonRepresentable { key: key.clone() })?;
            object.insert(key.clone(), json);
        }

        let body = serde_json::to_vec(&object).map_err(|e| EncodingError::Serialization {
            message: e.to_string(),
        })?;
        request.body = Some(Bytes::from(body));

        if !request.headers.contains_key(CONTENT_TYPE) {
            request
                .headers
                .insert(CONTENT_TYPE, HeaderValue::from_static(JSON_CONTENT_TYPE));
        }
        Ok(())
    }
}

impl ParameterEncoding {
    /// Apply this encoding mode.
    ///
    /// Each mode is a no-op when a map it needs is absent. `UrlAndJsonEncoding`
    /// needs both and applies neither encoder if either one is missing.
    pub fn encode(
        &self,
        request: &mut HttpRequest,
        body_parameters: Option<&Parameters>,
        url_parameters: Option<&Parameters>,
        passthrough_keys: &[String],
    ) -> Result<(), EncodingError> {
        match self {
            Self::UrlEncoding => {
                if let Some(url_parameters) = url_parameters {
                    UrlParameterEncoder::with_passthrough(passthrough_keys)
                        .encode(request, url_parameters)?;
                }
            }
            Self::JsonEncoding => {
                if let Some(body_parameters) = body_parameters {
                    JsonParameterEncoder.encode(request, body_parameters)?;
                }
            }
            Self::UrlAndJsonEncoding => {
                if let (Some(body_parameters), Some(url_parameters)) =
                    (body_parameters, url_parameters)
                {
                    UrlParameterEncoder::with_passthrough(passthrough_keys)
                        .encode(request, url_parameters)?;
                    JsonParameterEncoder.encode(request, body_parameters)?;
                }
            }
        }
        Ok(())
    }
}
