use diesel::r2d2::{Error as R2D2Error, PoolError};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Entity not found")]
    NotFound,

    /// A unique or foreign key constraint rejected the write. The message is
    /// safe to show to API clients.
    #[error("{0}")]
    ConstraintViolation(String),

    /// A stored row no longer satisfies the domain constraints.
    #[error("Invalid stored data: {0}")]
    InvalidData(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Connection error: {0}")]
    ConnectionError(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

impl From<DieselError> for RepositoryError {
    fn from(err: DieselError) -> Self {
        match err {
            DieselError::NotFound => RepositoryError::NotFound,

            DieselError::DatabaseError(kind, info) => {
                let message = info.message().to_string();
                match kind {
                    DatabaseErrorKind::UniqueViolation => {
                        log::warn!("Unique constraint violation: {message}");
                        RepositoryError::ConstraintViolation(
                            "Resource already exists".to_string(),
                        )
                    }
                    DatabaseErrorKind::ForeignKeyViolation => {
                        log::warn!("Foreign key constraint violation: {message}");
                        RepositoryError::ConstraintViolation(
                            "Resource is referenced by other records".to_string(),
                        )
                    }
                    DatabaseErrorKind::NotNullViolation | DatabaseErrorKind::CheckViolation => {
                        RepositoryError::DatabaseError(message)
                    }
                    _ => RepositoryError::DatabaseError(message),
                }
            }

            DieselError::SerializationError(e) | DieselError::DeserializationError(e) => {
                RepositoryError::InvalidData(e.to_string())
            }

            DieselError::RollbackTransaction | DieselError::BrokenTransactionManager => {
                RepositoryError::DatabaseError(format!("Transaction failed: {err}"))
            }

            _ => RepositoryError::Unexpected(format!("Unexpected diesel error: {err}")),
        }
    }
}

impl From<R2D2Error> for RepositoryError {
    fn from(err: R2D2Error) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}

impl From<PoolError> for RepositoryError {
    fn from(err: PoolError) -> Self {
        RepositoryError::ConnectionError(err.to_string())
    }
}
