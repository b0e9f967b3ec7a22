use thiserror::Error;

/// Business errors surfaced by the domain services.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("validation error: {0}")]
    Validation(String),
    #[error("email already registered")]
    DuplicateUser,
    #[error("email already subscribed")]
    DuplicateSubscriber,
    #[error("invalid credentials")]
    Unauthorized,
    #[error("store error: {0}")]
    Store(String),
}
