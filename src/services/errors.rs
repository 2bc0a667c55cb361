//! Error type shared by every service function.

use thiserror::Error;

use crate::domain::auth::AuthenticatedUser;
use crate::domain::user::UserRole;
use crate::repository::errors::RepositoryError;

#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{0}")]
    Unauthorized(String),

    #[error("Insufficient permissions")]
    Forbidden,

    #[error("Resource not found")]
    NotFound,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    TypeConstraint(String),

    #[error("File storage unavailable: {0}")]
    Storage(String),

    #[error("Internal server error")]
    Internal,
}

pub type ServiceResult<T> = Result<T, ServiceError>;

impl From<RepositoryError> for ServiceError {
    fn from(err: RepositoryError) -> Self {
        match err {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::ConstraintViolation(message) => ServiceError::Conflict(message),
            other => {
                log::error!("Repository failure: {other}");
                ServiceError::Internal
            }
        }
    }
}

/// Fails with [`ServiceError::Forbidden`] unless the user holds one of `roles`.
pub fn ensure_role(user: &AuthenticatedUser, roles: &[UserRole]) -> ServiceResult<()> {
    if user.has_role(roles) {
        Ok(())
    } else {
        Err(ServiceError::Forbidden)
    }
}
