pub mod cache;
pub mod encoding;
pub mod error;
pub mod server;
pub mod storage;
pub mod util;
