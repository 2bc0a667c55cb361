//! Error conversion glue between the domain, form, persistence and service layers.
//!
//! The domain layer must not depend on repository or service error types, but
//! loading a row into a domain value or parsing a payload can fail its
//! constraints.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::InvalidData(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use validator::ValidationErrors;

    use crate::domain::types::TypeConstraintError;
    use crate::forms::FormError;
    use crate::services::ServiceError;
    use crate::storage::StorageError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<ValidationErrors> for ServiceError {
        fn from(val: ValidationErrors) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            ServiceError::Validation(val.to_string())
        }
    }

    impl From<StorageError> for ServiceError {
        fn from(val: StorageError) -> Self {
            match val {
                StorageError::NotFound => ServiceError::NotFound,
                other => {
                    log::error!("File storage failure: {other}");
                    ServiceError::Storage(other.to_string())
                }
            }
        }
    }
}
