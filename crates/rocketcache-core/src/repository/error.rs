use thiserror::Error;

use crate::api::ApiError;
use crate::cache::CacheError;

#[derive(Error, Debug)]
pub enum RepositoryError {
    #[error(transparent)]
    Remote(#[from] ApiError),

    #[error(transparent)]
    Storage(#[from] CacheError),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
