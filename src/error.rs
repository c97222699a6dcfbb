// error.rs
use thiserror::Error;

use crate::util::MovieId;

/// Errors surfaced by the movie store and its backends.
#[derive(Debug, Error)]
pub enum MovieError {
    /// The request body could not be decoded into a movie.
    #[error("{0}")]
    Decode(String),

    #[error("movie {0} not found")]
    NotFound(MovieId),

    /// A delete removed no record.
    #[error("movie to delete not found")]
    DeleteNotFound(MovieId),

    /// A record could not be encoded to, or decoded from, its stored JSON form.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// The key-value backend failed or could not be reached.
    #[error("{0}")]
    Backend(String),
}

impl From<redis::RedisError> for MovieError {
    fn from(e: redis::RedisError) -> Self {
        MovieError::Backend(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, MovieError>;
