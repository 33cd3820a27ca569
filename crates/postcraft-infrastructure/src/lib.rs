pub mod config_service;
pub mod paths;
pub mod session_cache;
pub mod storage;

pub use crate::config_service::ConfigService;
pub use crate::paths::PostcraftPaths;
pub use crate::session_cache::{FileSessionCache, InMemorySessionCache};
