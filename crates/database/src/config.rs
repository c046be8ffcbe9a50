use crate::{error::ConfigError, search::SearchConfig};
use std::{path::PathBuf, str::FromStr};

/// Settings shared by everything that talks to the database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub database_url: String,
    pub search: SearchConfig,
}

impl DatabaseConfig {
    /// Reads `DATABASE_URL`, `SEARCH_INDEX_PATH` and `SEARCH_RESULT_LIMIT`,
    /// falling back to a `.env` file for anything not set in the environment
    pub fn from_env() -> Result<Self, ConfigError> {
        let database_url = required("DATABASE_URL")?;

        let mut search = SearchConfig {
            index_path: optional("SEARCH_INDEX_PATH").map(PathBuf::from),
            ..SearchConfig::default()
        };
        if let Some(limit) = parse_optional("SEARCH_RESULT_LIMIT")? {
            search.result_limit = limit;
        }

        Ok(Self {
            database_url,
            search,
        })
    }
}

pub fn required(name: &'static str) -> Result<String, ConfigError> {
    optional(name).ok_or(ConfigError::Missing(name))
}

pub fn optional(name: &'static str) -> Option<String> {
    dotenvy::var(name).ok().filter(|value| !value.trim().is_empty())
}

pub fn parse_optional<T>(name: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    optional(name)
        .map(|value| {
            value.trim().parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: e.to_string(),
            })
        })
        .transpose()
}
