use thiserror::Error;

/// Error type for token issuance and validation.
///
/// Validation failures are kept distinct here so they can be logged and
/// tested precisely; the service collapses them into a single
/// invalid-or-expired answer before anything reaches a caller.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    #[error("Failed to encode token: {0}")]
    EncodingFailed(String),

    #[error("Token signature is invalid")]
    InvalidSignature,

    #[error("Token is expired")]
    Expired,

    #[error("Token is malformed: {0}")]
    Malformed(String),
}
