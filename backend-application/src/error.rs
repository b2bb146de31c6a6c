use thiserror::Error;

/// Application-level failures. `BadRequest` messages are client-facing and
/// end up verbatim in the error envelope; `Internal` details stay in logs.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("{0}")]
    BadRequest(String),
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}
