use thiserror::Error;

/// All errors that can occur when calling the Dolby.io REST APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// The credential is missing, invalid or expired (HTTP 401).
    #[error("authentication failed: {message}")]
    Authentication { message: String },

    /// The credential does not grant access to the requested resource (HTTP 403).
    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    /// The requested resource was not found (HTTP 404).
    #[error("not found: {message}")]
    NotFound { message: String },

    /// The request was rate-limited (HTTP 429).
    #[error("rate limited (retry after {retry_after:?}s): {message}")]
    RateLimit {
        message: String,
        retry_after: Option<u64>,
    },

    /// Any other failed response, with the status code and parsed body.
    #[error("API error {status_code}: {message}")]
    Api {
        status_code: u16,
        message: String,
        body: Option<serde_json::Value>,
    },

    /// A transport-level HTTP error from reqwest.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// An I/O error, typically from reading a local file before upload.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The response did not have the expected shape.
    #[error("unexpected response shape for {context}: {source}")]
    Decode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// An outgoing request body could not be serialized.
    #[error("failed to serialize {context}: {source}")]
    Encode {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// The credential cannot be turned into a header value.
    #[error("invalid credential: {0}")]
    InvalidCredential(String),

    /// A paginated fetch issued more requests than its configured bound.
    #[error("pagination of {path} exceeded {max_pages} pages")]
    PageLimitExceeded { path: String, max_pages: usize },

    /// The server handed back a cursor that was already followed.
    #[error("pagination of {path} returned cursor {cursor:?} twice")]
    CursorCycle { path: String, cursor: String },

    /// Polling for job completion exceeded the configured timeout.
    #[error("poll timed out after {0:?}")]
    Timeout(std::time::Duration),

    /// The media job reached a terminal unsuccessful status.
    #[error("job failed: {0}")]
    JobFailed(String),
}

impl Error {
    pub(crate) fn decode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Decode {
            context: context.into(),
            source,
        }
    }

    pub(crate) fn encode(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Encode {
            context: context.into(),
            source,
        }
    }

    /// HTTP status code carried by the error, if it came from a response.
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Self::Authentication { .. } => Some(401),
            Self::PermissionDenied { .. } => Some(403),
            Self::NotFound { .. } => Some(404),
            Self::RateLimit { .. } => Some(429),
            Self::Api { status_code, .. } => Some(*status_code),
            Self::Http(e) => e.status().map(|s| s.as_u16()),
            _ => None,
        }
    }
}

/// A convenience alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn serde_failure() -> serde_json::Error {
        let bad: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        serde_json::to_value(bad).unwrap_err()
    }

    #[test]
    fn encode_errors_blame_the_request() {
        let err = Error::encode("media job request", serde_failure());
        let msg = err.to_string();
        assert!(msg.starts_with("failed to serialize media job request"), "{msg}");
        assert!(err.status_code().is_none());
    }

    #[test]
    fn decode_errors_blame_the_response() {
        let err = Error::decode("recordings", serde_failure());
        assert!(err.to_string().starts_with("unexpected response shape for recordings"));
    }
}
