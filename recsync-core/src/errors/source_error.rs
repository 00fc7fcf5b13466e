/// Source-system client errors.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    #[error("authentication failed: {reason}")]
    AuthFailed { reason: String },

    #[error("network error calling source: {reason}")]
    Network { reason: String },

    #[error("source returned HTTP {status}: {body}")]
    Http { status: u16, body: String },

    #[error("unexpected source response: {reason}")]
    BadResponse { reason: String },
}

impl SourceError {
    /// Whether this error is transient (timeout, connection reset,
    /// rate limit) and safe to retry from outside.
    pub fn is_transient(&self) -> bool {
        match self {
            SourceError::Network { .. } => true,
            SourceError::Http { status, .. } => *status == 429 || *status >= 500,
            _ => false,
        }
    }
}
