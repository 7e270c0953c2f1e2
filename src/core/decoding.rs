//! Response Decoding
//!
//! Maps response bodies to typed values. Parse failures become
//! [`NetworkError::DecodingFailure`] with a position-free description, so
//! every decoder reports the same message for the same structural problem.

use serde::de::DeserializeOwned;
use serde_json::error::Category;

use crate::error::NetworkError;

/// Decodes a response body into `T`.
pub trait ResponseDecoder: Send + Sync {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, NetworkError>;
}

/// Decodes straight from bytes.
#[derive(Clone, Copy, Debug, Default)]
pub struct SliceDecoder;

impl ResponseDecoder for SliceDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, NetworkError> {
        if data.is_empty() {
            return Err(NetworkError::NoData);
        }
        serde_json::from_slice(data).map_err(decoding_failure)
    }
}

/// Parses into a JSON tree first, then maps the tree into `T`.
#[derive(Clone, Copy, Debug, Default)]
pub struct ValueDecoder;

impl ResponseDecoder for ValueDecoder {
    fn decode<T: DeserializeOwned>(&self, data: &[u8]) -> Result<T, NetworkError> {
        if data.is_empty() {
            return Err(NetworkError::NoData);
        }
        let value: serde_json::Value = serde_json::from_slice(data).map_err(decoding_failure)?;
        serde_json::from_value(value).map_err(decoding_failure)
    }
}

/// Decode a JSON body with the default decoder.
pub fn decode_json<T: DeserializeOwned>(data: &[u8]) -> Result<T, NetworkError> {
    SliceDecoder.decode(data)
}

fn decoding_failure(error: serde_json::Error) -> NetworkError {
    NetworkError::DecodingFailure(describe(&error))
}

/// Lower-cased structural description of a parse failure, without source
/// positions.
pub fn describe(error: &serde_json::Error) -> String {
    let full = error.to_string();
    let positioned = match full.find(" at line ") {
        Some(index) => &full[..index],
        None => full.as_str(),
    };
    // A JSON tree reports `null` as a unit value.
    let normalized = positioned
        .replacen("invalid type: unit value", "invalid type: null", 1)
        .to_lowercase();
    let message = normalized.as_str();

    match error.classify() {
        Category::Data => {
            if let Some(key) = missing_field(message) {
                format!("key not found (key: {})", key)
            } else if message.starts_with("invalid type: null") {
                format!("value not found ({})", message)
            } else if is_type_mismatch(message) {
                format!("type mismatch ({})", message)
            } else {
                format!("data corrupted ({})", message)
            }
        }
        Category::Syntax | Category::Eof | Category::Io => {
            format!("data corrupted ({})", message)
        }
    }
}

fn missing_field(message: &str) -> Option<&str> {
    message
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next())
}

fn is_type_mismatch(message: &str) -> bool {
    ["invalid type", "invalid value", "invalid length", "unknown variant"]
        .iter()
        .any(|prefix| message.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TokenInfo;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Mode {
        kind: Kind,
    }

    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    enum Kind {
        Fast,
    }

    fn both<T: DeserializeOwned + std::fmt::Debug>(data: &[u8]) -> (NetworkError, NetworkError) {
        (
            SliceDecoder.decode::<T>(data).unwrap_err(),
            ValueDecoder.decode::<T>(data).unwrap_err(),
        )
    }

    #[test]
    fn test_decode_success() {
        let token: TokenInfo =
            decode_json(br#"{"access_token":"a","expires_in":60,"refresh_token":"r"}"#).unwrap();
        assert_eq!(token.access_token, "a");

        let via_value: TokenInfo = ValueDecoder
            .decode(br#"{"access_token":"a","expires_in":60,"refresh_token":"r"}"#)
            .unwrap();
        assert_eq!(via_value, token);
    }

    #[test]
    fn test_missing_key_parity() {
        let (slice, value) = both::<TokenInfo>(br#"{"expires_in":60,"refresh_token":"r"}"#);
        assert_eq!(
            slice,
            NetworkError::DecodingFailure("key not found (key: access_token)".to_string())
        );
        assert_eq!(slice, value);
        assert_eq!(
            slice.to_string(),
            "Failed to map data to a Decodable object. key not found (key: access_token)"
        );
    }

    #[test]
    fn test_type_mismatch_parity() {
        let (slice, value) =
            both::<TokenInfo>(br#"{"access_token":"a","expires_in":"Soon","refresh_token":"r"}"#);
        assert_eq!(slice, value);
        match slice {
            NetworkError::DecodingFailure(message) => {
                assert!(message.starts_with("type mismatch (invalid type: string \"soon\""));
                assert!(!message.contains("line"));
                assert_eq!(message, message.to_lowercase());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_null_value_parity() {
        let (slice, value) =
            both::<TokenInfo>(br#"{"access_token":null,"expires_in":1,"refresh_token":"r"}"#);
        assert_eq!(slice, value);
        assert!(matches!(slice, NetworkError::DecodingFailure(m) if m.starts_with("value not found")));
    }

    #[test]
    fn test_unknown_variant_is_type_mismatch() {
        let (slice, value) = both::<Mode>(br#"{"kind":"Slow"}"#);
        assert_eq!(slice, value);
        match slice {
            NetworkError::DecodingFailure(message) => {
                assert_eq!(
                    message,
                    "type mismatch (unknown variant `slow`, expected `fast`)"
                );
                assert_eq!(message, message.to_lowercase());
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_camel_case_missing_key_is_lower_cased() {
        let (slice, value) = both::<crate::types::UserInfo>(br#"{"firstName":"Jane"}"#);
        assert_eq!(slice, value);
        assert_eq!(
            slice,
            NetworkError::DecodingFailure("key not found (key: email)".to_string())
        );

        #[derive(Debug, Deserialize)]
        #[allow(dead_code)]
        #[serde(rename_all = "camelCase")]
        struct Flags {
            is_active: bool,
        }
        let (slice, _) = both::<Flags>(b"{}");
        assert_eq!(
            slice,
            NetworkError::DecodingFailure("key not found (key: isactive)".to_string())
        );
    }

    #[test]
    fn test_corrupted_data() {
        let error = decode_json::<TokenInfo>(b"{not json").unwrap_err();
        assert!(matches!(error, NetworkError::DecodingFailure(m) if m.starts_with("data corrupted")));

        let truncated = ValueDecoder.decode::<TokenInfo>(br#"{"access_token":"#).unwrap_err();
        assert!(
            matches!(truncated, NetworkError::DecodingFailure(m) if m.starts_with("data corrupted"))
        );
    }

    #[test]
    fn test_empty_body_is_no_data() {
        assert_eq!(decode_json::<TokenInfo>(b"").unwrap_err(), NetworkError::NoData);
        assert_eq!(
            ValueDecoder.decode::<TokenInfo>(b"").unwrap_err(),
            NetworkError::NoData
        );
    }
}
