pub mod resource_repository;

use thiserror::Error;

use crate::models::ValidationError;
use crate::store::StoreError;

pub use resource_repository::ResourceRepository;

#[derive(Debug, Error)]
pub enum RepoError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("not found")]
    NotFound,
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("serde error: {0}")]
    Serde(#[from] serde_json::Error),
}
