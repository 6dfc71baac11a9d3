use thiserror::Error;

/// Application-level errors (HTTP layer)
#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    ServiceError(#[from] wayfarer_service::error::ServiceError),

    #[error(transparent)]
    DatabaseError(#[from] wayfarer_db::error::DbError),

    #[error(transparent)]
    CoreError(#[from] wayfarer_core::error::CoreError),
}

pub type AppResult<T> = std::result::Result<T, AppError>;
