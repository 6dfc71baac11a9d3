use thiserror::Error;

/// Service layer errors - combines all error types
#[derive(Error, Debug)]
pub enum ServiceError {
    #[error(transparent)]
    DatabaseError(#[from] wayfarer_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] wayfarer_core::error::CoreError),

    #[error("Lookup request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("Lookup returned {status} for {url}")]
    LookupStatus { status: u16, url: String },

    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;
