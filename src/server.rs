use log::{debug, error, info};
use rocket::http::{ContentType, Status};
use rocket::response::{self, Responder};
use rocket::serde::json::{self, Json};
use rocket::{delete, get, post, put, routes, Build, Request, Rocket, State};
use serde::Serialize;
use std::sync::Arc;

use crate::cache::{Movie, MovieCache, MovieService};
use crate::encoding;
use crate::error::{MovieError, Result};
use crate::storage::{MemoryBackend, RedisBackend, RedisConfig};

pub type SharedMovieService = Arc<dyn MovieService + Send + Sync>;

/// Body of every response. Each variant serializes to a single-key JSON object,
/// written with [`encoding::to_string`].
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ApiBody {
    Movie { movie: Movie },
    Movies { movies: Vec<Movie> },
    Error { error: String },
    Message { message: String },
}

impl ApiBody {
    fn error(e: impl ToString) -> Self {
        ApiBody::Error {
            error: e.to_string(),
        }
    }

    fn message(message: &str) -> Self {
        ApiBody::Message {
            message: message.to_string(),
        }
    }
}

impl<'r> Responder<'r, 'static> for ApiBody {
    fn respond_to(self, request: &'r Request<'_>) -> response::Result<'static> {
        let body = encoding::to_string(&self).map_err(|e| {
            error!("encoding response body failed: {}", e);
            Status::InternalServerError
        })?;
        (ContentType::JSON, body).respond_to(request)
    }
}

pub type ApiResponse = (Status, ApiBody);

fn reply(status: Status, body: ApiBody) -> ApiResponse {
    (status, body)
}

fn decode(body: std::result::Result<Json<Movie>, json::Error<'_>>) -> Result<Movie> {
    body.map(Json::into_inner)
        .map_err(|e| MovieError::Decode(e.to_string()))
}

#[post("/movies", data = "<body>")]
async fn create_movie(
    body: std::result::Result<Json<Movie>, json::Error<'_>>,
    movies: &State<SharedMovieService>,
) -> ApiResponse {
    let movie = match decode(body) {
        Ok(movie) => movie,
        Err(e) => return reply(Status::BadRequest, ApiBody::error(e)),
    };
    match movies.create_movie(movie).await {
        Ok(movie) => reply(Status::Ok, ApiBody::Movie { movie }),
        Err(e) => reply(Status::BadRequest, ApiBody::error(e)),
    }
}

#[get("/movies")]
async fn get_movies(movies: &State<SharedMovieService>) -> ApiResponse {
    match movies.get_movies().await {
        Ok(movies) => reply(Status::Ok, ApiBody::Movies { movies }),
        Err(e) => reply(Status::BadRequest, ApiBody::error(e)),
    }
}

#[get("/movies/<id>")]
async fn get_movie(id: &str, movies: &State<SharedMovieService>) -> ApiResponse {
    match movies.get_movie(id).await {
        Ok(movie) => reply(Status::Ok, ApiBody::Movie { movie }),
        Err(e) => {
            debug!("get movie {}: {}", id, e);
            reply(Status::NotFound, ApiBody::message("movie not found"))
        }
    }
}

/// Replaces title and description of an existing movie. A missing movie is a
/// 400 here, unlike the 404 of the plain read.
#[put("/movies/<id>", data = "<body>")]
async fn update_movie(
    id: &str,
    body: std::result::Result<Json<Movie>, json::Error<'_>>,
    movies: &State<SharedMovieService>,
) -> ApiResponse {
    let mut existing = match movies.get_movie(id).await {
        Ok(movie) => movie,
        Err(e) => return reply(Status::BadRequest, ApiBody::error(e)),
    };
    let changes = match decode(body) {
        Ok(movie) => movie,
        Err(e) => return reply(Status::BadRequest, ApiBody::error(e)),
    };
    existing.title = changes.title;
    existing.description = changes.description;
    match movies.update_movie(existing).await {
        Ok(movie) => reply(Status::Ok, ApiBody::Movie { movie }),
        Err(e) => reply(Status::BadRequest, ApiBody::error(e)),
    }
}

#[delete("/movies/<id>")]
async fn delete_movie(id: &str, movies: &State<SharedMovieService>) -> ApiResponse {
    match movies.delete_movie(id).await {
        Ok(()) => reply(Status::Ok, ApiBody::message("movie deleted successfuly")),
        Err(e) => reply(Status::NotFound, ApiBody::error(e)),
    }
}

pub struct ServerNode {
    config: ServerConfig,
    movies: SharedMovieService,
}

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub port: u16,
    pub redis: RedisConfig,
    pub use_memory_store: bool,
}

impl ServerNode {
    pub fn new(config: ServerConfig) -> Result<Self> {
        let movies: SharedMovieService = if config.use_memory_store {
            info!("Using in-memory movie store.");
            Arc::new(MovieCache::new(MemoryBackend::new()))
        } else {
            info!("Using Redis movie store.");
            Arc::new(MovieCache::new(RedisBackend::new(config.redis.clone())?))
        };
        Ok(Self::with_service(config, movies))
    }

    /// Builds a node around an already constructed movie service.
    pub fn with_service(config: ServerConfig, movies: SharedMovieService) -> Self {
        ServerNode { config, movies }
    }

    pub fn movies(&self) -> SharedMovieService {
        self.movies.clone()
    }

    pub fn build(&self) -> Rocket<Build> {
        rocket::build()
            .configure(
                rocket::Config::figment()
                    .merge(("address", "0.0.0.0"))
                    .merge(("port", self.config.port)),
            )
            .manage(self.movies.clone())
            .mount(
                "/",
                routes![
                    create_movie,
                    get_movies,
                    get_movie,
                    update_movie,
                    delete_movie,
                ],
            )
    }
}
