//! Request error types.

use thiserror::Error;

// ============================================================================
// Error Kind
// ============================================================================

/// Coarse classification of a request failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Credentials were rejected (HTTP 401).
    Authentication,
    /// The API asked us to slow down (HTTP 429).
    RateLimited,
    /// Connection failure, timeout, or unreadable body.
    Transport,
    /// Any other non-2xx status.
    ServerRejected,
    /// Caller or configuration mistake; never retried.
    Usage,
}

// ============================================================================
// Request Error
// ============================================================================

/// Error type for API requests.
#[derive(Debug, Error)]
pub enum RequestError {
    /// Credentials were rejected.
    #[error(
        "Authentication failed. Check MYBILLBOOK_AUTH_TOKEN, MYBILLBOOK_COOKIES and MYBILLBOOK_COMPANY_ID"
    )]
    AuthenticationFailure,

    /// Still rate limited after every allowed attempt.
    #[error("Rate limit exceeded after {attempts} attempt(s)")]
    RateLimited {
        /// Requests sent before giving up.
        attempts: u32,
    },

    /// Connection failure, timeout, or a body that is not valid JSON.
    #[error("Transport failure: {0}")]
    TransportFailure(String),

    /// Non-2xx status other than 401 and 429.
    #[error("Server rejected request with status {status}: {body}")]
    ServerRejected {
        /// HTTP status code.
        status: u16,
        /// Raw response body.
        body: String,
    },

    /// HTTP method other than GET or POST.
    #[error("Unsupported HTTP method: {0}")]
    UnsupportedMethod(String),

    /// A credential cannot be sent as a header value.
    #[error("Invalid header value for {0}")]
    InvalidHeader(&'static str),

    /// Base URL or endpoint does not form a valid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The HTTP client could not be built or the request could not be
    /// constructed.
    #[error("HTTP client error: {0}")]
    Client(#[from] reqwest::Error),
}

impl RequestError {
    /// Returns the classification of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::AuthenticationFailure => ErrorKind::Authentication,
            Self::RateLimited { .. } => ErrorKind::RateLimited,
            Self::TransportFailure(_) => ErrorKind::Transport,
            Self::ServerRejected { .. } => ErrorKind::ServerRejected,
            Self::UnsupportedMethod(_)
            | Self::InvalidHeader(_)
            | Self::InvalidUrl(_)
            | Self::Client(_) => ErrorKind::Usage,
        }
    }

    /// Returns true if this kind of failure may succeed on retry.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind(), ErrorKind::RateLimited | ErrorKind::Transport)
    }

    /// Returns true if the credentials were rejected.
    pub fn is_auth_failure(&self) -> bool {
        self.kind() == ErrorKind::Authentication
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retryable_kinds() {
        assert!(RequestError::RateLimited { attempts: 1 }.is_retryable());
        assert!(RequestError::TransportFailure("reset".to_string()).is_retryable());
        assert!(!RequestError::AuthenticationFailure.is_retryable());
        assert!(
            !RequestError::ServerRejected {
                status: 500,
                body: String::new()
            }
            .is_retryable()
        );
        assert!(!RequestError::UnsupportedMethod("PUT".to_string()).is_retryable());
    }

    #[test]
    fn test_server_rejected_message_carries_body() {
        let err = RequestError::ServerRejected {
            status: 422,
            body: r#"{"error":"bad page"}"#.to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("422"));
        assert!(msg.contains("bad page"));
    }
}
