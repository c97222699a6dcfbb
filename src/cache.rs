// cache.rs
use async_trait::async_trait;
use log::{debug, warn};
use serde::de::{self, IgnoredAny, MapAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

use crate::encoding;
use crate::error::{MovieError, Result};
use crate::storage::HashBackend;
use crate::util::{new_movie_id, CollectionKey, MovieId, MOVIES_COLLECTION};

/// A movie record.
///
/// Decoding is lenient in the same ways as the service's existing clients expect:
/// missing or `null` fields stay empty, a `null` document is an empty movie, a
/// repeated key keeps its last value, field names match without regard to case and
/// unknown fields are skipped.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub description: String,
}

impl<'de> Deserialize<'de> for Movie {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(MovieVisitor)
    }
}

struct MovieVisitor;

impl<'de> Visitor<'de> for MovieVisitor {
    type Value = Movie;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a movie object or null")
    }

    fn visit_unit<E: de::Error>(self) -> std::result::Result<Movie, E> {
        Ok(Movie::default())
    }

    fn visit_none<E: de::Error>(self) -> std::result::Result<Movie, E> {
        Ok(Movie::default())
    }

    fn visit_map<A>(self, mut map: A) -> std::result::Result<Movie, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut movie = Movie::default();
        while let Some(key) = map.next_key::<String>()? {
            let slot = if fold_eq(&key, "id") {
                Some(&mut movie.id)
            } else if fold_eq(&key, "title") {
                Some(&mut movie.title)
            } else if fold_eq(&key, "description") {
                Some(&mut movie.description)
            } else {
                None
            };
            match slot {
                // null leaves whatever an earlier key set
                Some(slot) => {
                    if let Some(value) = map.next_value::<Option<String>>()? {
                        *slot = value;
                    }
                }
                None => {
                    map.next_value::<IgnoredAny>()?;
                }
            }
        }
        Ok(movie)
    }
}

/// Case-insensitive match of a JSON key against a lowercase field name. The long s
/// folds to `s`, as in Unicode simple case folding.
fn fold_eq(key: &str, name: &str) -> bool {
    key.chars()
        .map(|c| if c == '\u{17f}' { 's' } else { c })
        .flat_map(char::to_lowercase)
        .eq(name.chars())
}

/// Persistence operations the HTTP layer relies on.
#[async_trait]
pub trait MovieService {
    /// Stores `movie` under a freshly generated id, replacing any id it carried.
    async fn create_movie(&self, movie: Movie) -> Result<Movie>;
    async fn get_movie(&self, id: &str) -> Result<Movie>;
    /// Returns every stored movie in backend enumeration order.
    async fn get_movies(&self) -> Result<Vec<Movie>>;
    /// Overwrites the record at `movie.id`, creating it if absent.
    async fn update_movie(&self, movie: Movie) -> Result<Movie>;
    async fn delete_movie(&self, id: &str) -> Result<()>;
}

// MovieCache -----------------------------------------------------------------

/// Keeps movies as JSON records in a single hash collection, one field per id.
pub struct MovieCache<B> {
    backend: B,
    collection: CollectionKey,
}

impl<B: HashBackend> MovieCache<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            collection: MOVIES_COLLECTION,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn put_record(&self, movie: &Movie) -> Result<()> {
        let record = encoding::to_string(movie)?;
        self.backend.hset(self.collection, &movie.id, record).await
    }
}

#[async_trait]
impl<B: HashBackend + Send + Sync> MovieService for MovieCache<B> {
    async fn create_movie(&self, mut movie: Movie) -> Result<Movie> {
        movie.id = new_movie_id();
        self.put_record(&movie).await?;
        debug!("created movie {}", movie.id);
        Ok(movie)
    }

    async fn get_movie(&self, id: &str) -> Result<Movie> {
        let record = match self.backend.hget(self.collection, id).await {
            Ok(Some(record)) => record,
            Ok(None) => return Err(MovieError::NotFound(id.to_string())),
            Err(e) => {
                warn!("reading movie {} failed: {}", id, e);
                return Err(MovieError::NotFound(id.to_string()));
            }
        };
        Ok(serde_json::from_str(&record)?)
    }

    async fn get_movies(&self) -> Result<Vec<Movie>> {
        let records = self.backend.hgetall(self.collection).await?;
        debug!("decoding {} movie records", records.len());
        records
            .values()
            .map(|record| serde_json::from_str(record).map_err(MovieError::from))
            .collect()
    }

    async fn update_movie(&self, movie: Movie) -> Result<Movie> {
        self.put_record(&movie).await?;
        debug!("updated movie {}", movie.id);
        Ok(movie)
    }

    async fn delete_movie(&self, id: &str) -> Result<()> {
        // A failed delete reports zero removals, so it surfaces as NotFound.
        let removed = match self.backend.hdel(self.collection, id).await {
            Ok(removed) => removed,
            Err(e) => {
                warn!("deleting movie {} failed: {}", id, e);
                0
            }
        };
        if removed == 0 {
            return Err(MovieError::DeleteNotFound(id.to_string()));
        }
        debug!("deleted movie {}", id);
        Ok(())
    }
}
