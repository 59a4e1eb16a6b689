use crate::domain::error::DomainError;

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error(transparent)]
    Validation(#[from] DomainError),

    #[error("storage error: {0}")]
    Persistence(#[source] Box<dyn std::error::Error + Send + Sync>),
}
