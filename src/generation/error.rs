use thiserror::Error;

/// Errors surfaced by the text-generation backend client.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// The server returned HTTP 429. `retry_after_ms` is how long the
    /// server asked us to wait before retrying.
    #[error("rate limited, retry after {retry_after_ms}ms")]
    RateLimited { retry_after_ms: u64 },

    /// Any other non-success HTTP status, with the response body.
    #[error("backend error (status {status}): {message}")]
    ApiError { status: u16, message: String },

    /// The request exceeded the client's configured timeout.
    #[error("generation request timed out")]
    Timeout,

    /// Underlying network failure (DNS, refused connection, bad body).
    #[error("network error: {0}")]
    Network(reqwest::Error),
}

impl From<reqwest::Error> for GenerationError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            GenerationError::Timeout
        } else {
            GenerationError::Network(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rate_limited_display() {
        let err = GenerationError::RateLimited {
            retry_after_ms: 5000,
        };
        assert_eq!(err.to_string(), "rate limited, retry after 5000ms");
    }

    #[test]
    fn api_error_display() {
        let err = GenerationError::ApiError {
            status: 401,
            message: "invalid token".into(),
        };
        assert_eq!(err.to_string(), "backend error (status 401): invalid token");
    }

    #[test]
    fn error_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<GenerationError>();
    }
}
