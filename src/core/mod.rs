mod config;
pub mod error;

pub use config::{API_KEY_PREFIX, AppConfig, DEFAULT_CATALOG_PATH, catalog_path_from_env};
pub use error::{ChatError, ConfigError, UpstreamError};
