use thiserror::Error;

use crate::repository::RepositoryError;

pub type ServiceResult<T> = Result<T, ServiceError>;

/// Failures reported by the catalog and page services.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The requested product or tag does not exist.
    #[error("not found")]
    NotFound,
    /// A sale asked for more units than are in stock.
    #[error("product {product_id} has {available} units in stock, {requested} requested")]
    InsufficientStock {
        product_id: i32,
        requested: i32,
        available: i32,
    },
    /// Arguments outside their valid range (page numbers, quantities, ...).
    #[error("invalid input: {0}")]
    Validation(String),
    /// Submitted form data failed validation.
    #[error("{0}")]
    Form(String),
    /// The data changed concurrently or violates a uniqueness constraint.
    #[error("conflicting change")]
    Conflict,
    #[error(transparent)]
    Repository(RepositoryError),
}

impl From<RepositoryError> for ServiceError {
    fn from(value: RepositoryError) -> Self {
        match value {
            RepositoryError::NotFound => ServiceError::NotFound,
            RepositoryError::Conflict => ServiceError::Conflict,
            other => ServiceError::Repository(other),
        }
    }
}
