// error.rs
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Reasons a webhook request is rejected.
///
/// Variants never carry the secret, the supplied signature or the computed
/// digest, so they are safe to log.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum VerificationError {
    /// No secret was configured or passed for this call.
    #[error("secret is required")]
    ConfigurationMissing,

    #[error("Missing signature")]
    MissingSignature,

    #[error("Missing timestamp")]
    MissingTimestamp,

    /// The timestamp is older than the tolerance window or is not an integer.
    #[error("Timestamp is too old")]
    TimestampTooOld,

    /// Digest mismatch: wrong secret, tampered body or tampered timestamp.
    #[error("Invalid signature")]
    InvalidSignature,
}

impl VerificationError {
    /// HTTP status a receiver should answer with.
    pub fn status_code(&self) -> StatusCode {
        match self {
            VerificationError::ConfigurationMissing => StatusCode::INTERNAL_SERVER_ERROR,
            VerificationError::MissingSignature | VerificationError::MissingTimestamp => {
                StatusCode::BAD_REQUEST
            }
            VerificationError::TimestampTooOld | VerificationError::InvalidSignature => {
                StatusCode::UNAUTHORIZED
            }
        }
    }
}

impl IntoResponse for VerificationError {
    fn into_response(self) -> Response {
        (self.status_code(), self.to_string()).into_response()
    }
}

pub type VerificationResult<T> = Result<T, VerificationError>;
