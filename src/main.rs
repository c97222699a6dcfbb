use clap::{App, Arg};
use movie_cache_server::server::{ServerConfig, ServerNode};
use movie_cache_server::storage::RedisConfig;
use std::time::Duration;

const DEFAULT_REDIS_ADDR: &str = "localhost:6379";

fn setup_logger(log_file: Option<&str>) -> Result<(), fern::InitError> {
    let mut dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            out.finish(format_args!(
                "[{}][{}][{}] {}",
                chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
                record.target(),
                record.level(),
                message
            ))
        })
        .level(log::LevelFilter::Info)
        .level_for("movie_cache_server", log::LevelFilter::Debug)
        .chain(std::io::stdout());
    if let Some(path) = log_file {
        dispatch = dispatch.chain(fern::log_file(path)?);
    }
    dispatch.apply()?;
    Ok(())
}

#[rocket::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let matches = App::new("movie-cache-server")
        .version("0.1")
        .about("A CRUD HTTP service for movies kept in a Redis hash")
        .arg(
            Arg::with_name("port")
                .long("port")
                .takes_value(true)
                .default_value("5000")
                .help("HTTP listen port"),
        )
        .arg(
            Arg::with_name("redis_addr")
                .long("redis-addr")
                .takes_value(true)
                .help("Redis address as host:port [env: REDIS_ADDR, default: localhost:6379]"),
        )
        .arg(
            Arg::with_name("redis_db")
                .long("redis-db")
                .takes_value(true)
                .default_value("0")
                .help("Redis logical database index"),
        )
        .arg(
            Arg::with_name("expiration")
                .long("expiration")
                .takes_value(true)
                .default_value("1")
                .help("Record expiration in seconds (accepted but not applied)"),
        )
        .arg(
            Arg::with_name("use_memory_store")
                .long("use-memory-store")
                .help("Keep movies in process memory instead of Redis"),
        )
        .arg(
            Arg::with_name("log_file")
                .long("log-file")
                .takes_value(true)
                .help("Also append logs to this file"),
        )
        .get_matches();
    setup_logger(matches.value_of("log_file"))?;

    let port = matches.value_of_t::<u16>("port").unwrap_or_else(|e| e.exit());
    let redis_db = matches.value_of_t::<i64>("redis_db").unwrap_or_else(|e| e.exit());
    let expiration = matches
        .value_of_t::<u64>("expiration")
        .unwrap_or_else(|e| e.exit());
    let redis_addr = matches
        .value_of("redis_addr")
        .map(String::from)
        .or_else(|| std::env::var("REDIS_ADDR").ok())
        .unwrap_or_else(|| String::from(DEFAULT_REDIS_ADDR));

    let config = ServerConfig {
        port,
        redis: RedisConfig {
            addr: redis_addr,
            db: redis_db,
            expiration: Duration::from_secs(expiration),
        },
        use_memory_store: matches.is_present("use_memory_store"),
    };
    let server_node = ServerNode::new(config)?;
    server_node.build().launch().await?;
    Ok(())
}
