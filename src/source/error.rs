//! Fetch error types

use serde_json::Value;
use thiserror::Error;

/// Errors raised while fetching a chart payload
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("Request timeout")]
    Timeout,

    #[error("Backend unavailable: {0}")]
    Unavailable(String),

    /// Non-OK response. `body` holds the JSON body when there was one.
    #[error("HTTP error! Status: {status}")]
    Status { status: u16, body: Option<Value> },

    #[error("Invalid JSON: {0}")]
    Decode(#[from] serde_json::Error),
}

impl FetchError {
    /// Classify a transport error the same way for every request
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            FetchError::Timeout
        } else if err.is_connect() {
            FetchError::Unavailable(err.to_string())
        } else {
            FetchError::Request(err)
        }
    }

    /// `error` message carried by a non-OK JSON body, if any
    pub fn error_payload(&self) -> Option<&str> {
        match self {
            FetchError::Status {
                body: Some(body), ..
            } => body
                .get("error")
                .and_then(Value::as_str)
                .filter(|message| !message.is_empty()),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = FetchError::Status {
            status: 500,
            body: None,
        };
        assert_eq!(err.to_string(), "HTTP error! Status: 500");
        assert_eq!(FetchError::Timeout.to_string(), "Request timeout");
    }

    #[test]
    fn test_error_payload() {
        let err = FetchError::Status {
            status: 401,
            body: Some(json!({"error": "Unauthorized"})),
        };
        assert_eq!(err.error_payload(), Some("Unauthorized"));

        let err = FetchError::Status {
            status: 502,
            body: Some(json!([1, 2])),
        };
        assert_eq!(err.error_payload(), None);
        assert_eq!(FetchError::Timeout.error_payload(), None);

        let err = FetchError::Status {
            status: 500,
            body: Some(json!({"error": ""})),
        };
        assert_eq!(err.error_payload(), None);
    }

    #[test]
    fn test_decode_error_conversion() {
        let parse_err = serde_json::from_str::<Value>("not json").unwrap_err();
        let err: FetchError = parse_err.into();
        assert!(matches!(err, FetchError::Decode(_)));
    }
}
