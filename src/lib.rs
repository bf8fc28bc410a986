pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod infra;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::infra::DbPool;

/// Load configuration from the environment and open the store.
pub fn open_from_env() -> Result<DbPool, AppError> {
    let config = AppConfig::from_env()?;
    infra::connect(&config.db_location())
}
