// util.rs
use uuid::Uuid;

pub type MovieId = String;
pub type CollectionKey = &'static str;

/// The single hash collection holding every movie record, keyed by id.
pub const MOVIES_COLLECTION: CollectionKey = "movies";

/// Generates a fresh, hyphenated v4 UUID for a new movie.
pub fn new_movie_id() -> MovieId {
    Uuid::new_v4().to_string()
}
