//! Environment configuration (`.env` is honoured).

use crate::error::AppError;
use std::io::ErrorKind;
use std::path::PathBuf;

pub const DATABASE_URL_VAR: &str = "DATABASE_URL";
const MEMORY_URL: &str = ":memory:";

/// Where the document store lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DbLocation {
    Memory,
    File(PathBuf),
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub database_url: String,
}

/// A missing `.env` is fine; an unreadable or malformed one is not.
fn check_env_file<T>(res: Result<T, dotenvy::Error>) -> Result<(), AppError> {
    match res {
        Ok(_) => Ok(()),
        Err(dotenvy::Error::Io(e)) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(AppError::Config(format!(".env: {}", e))),
    }
}

fn default_db_path() -> PathBuf {
    let base = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
    base.join("person-store").join("people.db")
}

impl AppConfig {
    pub fn from_env() -> Result<Self, AppError> {
        check_env_file(dotenvy::dotenv())?;
        Self::from_value(std::env::var(DATABASE_URL_VAR).ok())
    }

    /// Build from an explicit `DATABASE_URL` value; `None` selects the default path.
    pub fn from_value(value: Option<String>) -> Result<Self, AppError> {
        let database_url = match value {
            Some(v) => {
                let v = v.trim().to_string();
                if v.is_empty() {
                    return Err(AppError::Config(format!("{} is empty", DATABASE_URL_VAR)));
                }
                v
            }
            None => default_db_path().to_string_lossy().into_owned(),
        };
        log::info!("Configuration loaded: database={}", database_url);
        Ok(Self { database_url })
    }

    pub fn db_location(&self) -> DbLocation {
        if self.database_url == MEMORY_URL {
            return DbLocation::Memory;
        }
        let path = self
            .database_url
            .strip_prefix("sqlite://")
            .unwrap_or(&self.database_url);
        DbLocation::File(PathBuf::from(path))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_url_selects_in_memory_store() {
        let cfg = AppConfig::from_value(Some(":memory:".into())).unwrap();
        assert_eq!(cfg.db_location(), DbLocation::Memory);
    }

    #[test]
    fn sqlite_scheme_is_stripped() {
        let cfg = AppConfig::from_value(Some("sqlite:///tmp/people.db".into())).unwrap();
        assert_eq!(cfg.db_location(), DbLocation::File(PathBuf::from("/tmp/people.db")));
    }

    #[test]
    fn blank_url_is_rejected() {
        let err = AppConfig::from_value(Some("   ".into())).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn missing_env_file_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let res = dotenvy::from_path(dir.path().join(".env"));
        assert!(check_env_file(res).is_ok());
    }

    #[test]
    fn malformed_env_file_is_a_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".env");
        std::fs::write(&path, "PERSON_STORE_BROKEN=\"unterminated\n").unwrap();
        let err = check_env_file(dotenvy::from_path(&path)).unwrap_err();
        assert_eq!(err.code(), "CONFIG_ERROR");
    }

    #[test]
    fn missing_url_uses_default_path() {
        let cfg = AppConfig::from_value(None).unwrap();
        assert!(cfg.database_url.ends_with("people.db"));
    }
}
