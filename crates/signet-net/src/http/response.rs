//! Response interpretation: response types, parsed bodies, progress.

use bytes::Bytes;
use serde::de::DeserializeOwned;

use crate::error::{NetworkError, Result};

/// How the response body should be interpreted once the exchange finishes.
///
/// This is a transport-native setting: writing it takes effect immediately
/// on the underlying transport, even mid-exchange (with the same undefined
/// effect on an in-flight call the platform has).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ResponseType {
    /// Pick an interpretation from the effective mime type: JSON for
    /// `application/json` / `*+json`, text otherwise.
    #[default]
    Auto,
    /// Decode the body as UTF-8 text (lossy).
    Text,
    /// Parse the body as JSON.
    Json,
    /// Keep the raw bytes.
    Binary,
}

/// A response body parsed according to the configured [`ResponseType`].
///
/// `None` both before a response is available and when JSON parsing fails —
/// the exchange still completes in the latter case, mirroring the platform.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum ResponseData {
    /// No response is available (yet).
    #[default]
    None,
    /// A text body.
    Text(String),
    /// A parsed JSON body.
    Json(serde_json::Value),
    /// A raw binary body.
    Bytes(Bytes),
}

impl ResponseData {
    /// Check whether any response value is present.
    pub fn is_none(&self) -> bool {
        matches!(self, Self::None)
    }

    /// Get the text body, if this is a text response.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Get the JSON value, if this is a JSON response.
    pub fn as_json(&self) -> Option<&serde_json::Value> {
        match self {
            Self::Json(value) => Some(value),
            _ => None,
        }
    }

    /// Get the raw bytes, if this is a binary response.
    pub fn as_bytes(&self) -> Option<&Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }

    /// Deserialize the response into a typed value.
    ///
    /// Works for JSON responses directly and for text responses containing
    /// JSON.
    pub fn decode<T: DeserializeOwned>(&self) -> Result<T> {
        match self {
            Self::Json(value) => Ok(serde_json::from_value(value.clone())?),
            Self::Text(text) => Ok(serde_json::from_str(text)?),
            Self::Bytes(bytes) => Ok(serde_json::from_slice(bytes)?),
            Self::None => Err(NetworkError::Json("no response available".to_string())),
        }
    }
}

/// Check whether a mime type's essence denotes JSON.
fn is_json_mime(mime: &str) -> bool {
    let essence = mime.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
    essence == "application/json" || essence.ends_with("+json")
}

/// Parse an accumulated body per the response type and effective mime.
///
/// The effective mime is the caller's override when one was set, otherwise
/// the response's Content-Type; it only matters for [`ResponseType::Auto`].
pub(crate) fn parse_body(
    response_type: ResponseType,
    mime: Option<&str>,
    body: &[u8],
) -> ResponseData {
    match response_type {
        ResponseType::Binary => ResponseData::Bytes(Bytes::copy_from_slice(body)),
        ResponseType::Text => ResponseData::Text(String::from_utf8_lossy(body).into_owned()),
        ResponseType::Json => match serde_json::from_slice(body) {
            Ok(value) => ResponseData::Json(value),
            Err(err) => {
                tracing::warn!(target: "signet_net::http", "Response is not valid JSON: {}", err);
                ResponseData::None
            }
        },
        ResponseType::Auto => {
            if mime.is_some_and(is_json_mime) {
                match serde_json::from_slice(body) {
                    Ok(value) => ResponseData::Json(value),
                    Err(err) => {
                        tracing::warn!(target: "signet_net::http", "Response is not valid JSON: {}", err);
                        ResponseData::Text(String::from_utf8_lossy(body).into_owned())
                    }
                }
            } else {
                ResponseData::Text(String::from_utf8_lossy(body).into_owned())
            }
        }
    }
}

/// Progress information for a transfer.
#[derive(Clone, Debug)]
pub struct TransferProgress {
    /// Number of bytes received so far.
    pub bytes_received: u64,
    /// Total number of bytes, if known.
    pub total_bytes: Option<u64>,
}

impl TransferProgress {
    /// Get the progress as a fraction (0.0 to 1.0), if the total is known.
    pub fn fraction(&self) -> Option<f64> {
        self.total_bytes.map(|total| {
            if total == 0 {
                1.0
            } else {
                self.bytes_received as f64 / total as f64
            }
        })
    }

    /// Get the progress as a percentage (0 to 100), if the total is known.
    pub fn percent(&self) -> Option<u8> {
        self.fraction().map(|f| (f * 100.0).min(100.0) as u8)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_text() {
        let parsed = parse_body(ResponseType::Text, None, b"hello");
        assert_eq!(parsed.as_text(), Some("hello"));
    }

    #[test]
    fn test_parse_json() {
        let parsed = parse_body(ResponseType::Json, None, br#"{"a":1}"#);
        assert_eq!(parsed.as_json(), Some(&json!({"a": 1})));
    }

    #[test]
    fn test_parse_json_failure_yields_none() {
        let parsed = parse_body(ResponseType::Json, None, b"not json");
        assert!(parsed.is_none());
    }

    #[test]
    fn test_parse_binary() {
        let parsed = parse_body(ResponseType::Binary, None, &[0, 159, 146]);
        assert_eq!(parsed.as_bytes().map(|b| b.as_ref()), Some(&[0u8, 159, 146][..]));
    }

    #[test]
    fn test_auto_follows_mime() {
        let parsed = parse_body(ResponseType::Auto, Some("application/json"), br#"[1,2]"#);
        assert_eq!(parsed.as_json(), Some(&json!([1, 2])));

        let parsed = parse_body(
            ResponseType::Auto,
            Some("application/json; charset=utf-8"),
            br#"true"#,
        );
        assert_eq!(parsed.as_json(), Some(&json!(true)));

        let parsed = parse_body(ResponseType::Auto, Some("text/plain"), b"[1,2]");
        assert_eq!(parsed.as_text(), Some("[1,2]"));

        let parsed = parse_body(ResponseType::Auto, None, b"plain");
        assert_eq!(parsed.as_text(), Some("plain"));
    }

    #[test]
    fn test_auto_suffix_json_mime() {
        let parsed = parse_body(ResponseType::Auto, Some("application/problem+json"), br#"{}"#);
        assert_eq!(parsed.as_json(), Some(&json!({})));
    }

    #[test]
    fn test_auto_invalid_json_falls_back_to_text() {
        let parsed = parse_body(ResponseType::Auto, Some("application/json"), b"oops");
        assert_eq!(parsed.as_text(), Some("oops"));
    }

    #[test]
    fn test_decode_typed() {
        let parsed = parse_body(ResponseType::Json, None, br#"{"a":7}"#);
        let map: std::collections::HashMap<String, i64> = parsed.decode().unwrap();
        assert_eq!(map["a"], 7);

        let none = ResponseData::None;
        assert!(none.decode::<serde_json::Value>().is_err());
    }

    #[test]
    fn test_progress_fraction() {
        let progress = TransferProgress {
            bytes_received: 50,
            total_bytes: Some(200),
        };
        assert_eq!(progress.fraction(), Some(0.25));
        assert_eq!(progress.percent(), Some(25));

        let unknown = TransferProgress {
            bytes_received: 50,
            total_bytes: None,
        };
        assert_eq!(unknown.fraction(), None);

        let empty = TransferProgress {
            bytes_received: 0,
            total_bytes: Some(0),
        };
        assert_eq!(empty.fraction(), Some(1.0));
    }
}
