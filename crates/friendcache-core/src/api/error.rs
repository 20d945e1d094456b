use thiserror::Error;

#[derive(Error, Debug)]
pub enum FetchError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Server returned {status}: {body}")]
    BadStatus {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("Invalid response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Maximum length for error response bodies in error messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl FetchError {
    /// Truncate a response body to avoid logging excessive data
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            body.to_string()
        } else {
            let mut end = MAX_ERROR_BODY_LENGTH;
            while !body.is_char_boundary(end) {
                end -= 1;
            }
            format!("{}... (truncated, {} total bytes)", &body[..end], body.len())
        }
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        FetchError::BadStatus {
            status,
            body: Self::truncate_body(body),
        }
    }

    /// True when the failure came from the transport rather than the payload
    pub fn is_network(&self) -> bool {
        matches!(self, FetchError::Network(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_keeps_short_body() {
        let err = FetchError::from_status(reqwest::StatusCode::NOT_FOUND, "missing");
        assert_eq!(err.to_string(), "Server returned 404 Not Found: missing");
    }

    #[test]
    fn test_from_status_truncates_long_body() {
        let body = "x".repeat(MAX_ERROR_BODY_LENGTH + 20);
        match FetchError::from_status(reqwest::StatusCode::BAD_GATEWAY, &body) {
            FetchError::BadStatus { body, .. } => {
                assert!(body.starts_with(&"x".repeat(MAX_ERROR_BODY_LENGTH)));
                assert!(body.ends_with("(truncated, 520 total bytes)"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        let body = "é".repeat(MAX_ERROR_BODY_LENGTH);
        let truncated = FetchError::truncate_body(&body);
        assert!(truncated.contains("truncated"));
    }

    #[test]
    fn test_decode_error_is_not_network() {
        let err: FetchError = serde_json::from_str::<Vec<i32>>("nope").unwrap_err().into();
        assert!(!err.is_network());
    }
}
