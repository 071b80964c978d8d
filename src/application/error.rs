// Application errors surfaced to invocation callers
use crate::domain::normalizer::NormalizeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error(transparent)]
    MalformedResponse(#[from] NormalizeError),

    #[error("{0}")]
    ClientInput(String),

    #[error("unknown forecast category: {0}")]
    UnknownCategory(String),

    #[error("forecast fetch failed: {0:#}")]
    Upstream(anyhow::Error),

    #[error("photo upload failed: {0:#}")]
    Storage(anyhow::Error),

    #[error("report persistence failed: {0:#}")]
    Persistence(anyhow::Error),
}

impl ServiceError {
    pub fn status_code(&self) -> u16 {
        match self {
            ServiceError::ClientInput(_) => 400,
            ServiceError::UnknownCategory(_) => 404,
            ServiceError::MalformedResponse(_) | ServiceError::Upstream(_) => 502,
            ServiceError::Storage(_) | ServiceError::Persistence(_) => 500,
        }
    }
}
