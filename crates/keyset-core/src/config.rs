//! Paginator configuration.
//!
//! Loaded from environment variables, with defaults for anything unset.
//!
//! # Environment Variables
//!
//! - `KEYSET_MAX_PAGE_SIZE`: largest `first`/`last` a request may ask for (default: unlimited)
//! - `KEYSET_RANKING_TTL_SECS`: lifetime of a cached ranking in seconds (default: `600`)
//! - `KEYSET_RANKING_LIMIT`: number of ids kept from a computed ranking (default: `128`)

use std::time::Duration;
use thiserror::Error as ThisError;

pub const ENV_MAX_PAGE_SIZE: &str = "KEYSET_MAX_PAGE_SIZE";
pub const ENV_RANKING_TTL_SECS: &str = "KEYSET_RANKING_TTL_SECS";
pub const ENV_RANKING_LIMIT: &str = "KEYSET_RANKING_LIMIT";

///
/// ConfigError
///

#[derive(Clone, Debug, Eq, PartialEq, ThisError)]
pub enum ConfigError {
    #[error("invalid value for {name}: {message}")]
    InvalidValue { name: String, message: String },
}

impl ConfigError {
    fn invalid(name: &str, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            name: name.to_string(),
            message: message.into(),
        }
    }
}

///
/// PaginationConfig
///
/// # Invariants
///
/// - `max_page_size`, when set, is at least 1
/// - `ranking_limit` is at least 1
///

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct PaginationConfig {
    /// Upper bound on requested page size; `None` accepts any size.
    pub max_page_size: Option<u32>,
    /// How long a computed ranking stays in the ranking cache.
    pub ranking_ttl: Duration,
    /// How many ids of a computed ranking are kept (and embedded in cursors).
    pub ranking_limit: usize,
}

impl PaginationConfig {
    pub const DEFAULT_RANKING_TTL: Duration = Duration::from_secs(10 * 60);
    pub const DEFAULT_RANKING_LIMIT: usize = 128;

    /// Load configuration from the process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Load configuration from any variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let max_page_size = lookup(ENV_MAX_PAGE_SIZE)
            .map(|value| parse_positive::<u32>(ENV_MAX_PAGE_SIZE, &value))
            .transpose()?;

        let ranking_ttl = lookup(ENV_RANKING_TTL_SECS)
            .map(|value| parse_positive::<u64>(ENV_RANKING_TTL_SECS, &value))
            .transpose()?
            .map_or(Self::DEFAULT_RANKING_TTL, Duration::from_secs);

        let ranking_limit = lookup(ENV_RANKING_LIMIT)
            .map(|value| parse_positive::<usize>(ENV_RANKING_LIMIT, &value))
            .transpose()?
            .unwrap_or(Self::DEFAULT_RANKING_LIMIT);

        let config = Self {
            max_page_size,
            ranking_ttl,
            ranking_limit,
        };
        tracing::debug!(?config, "loaded pagination config");

        Ok(config)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_page_size: None,
            ranking_ttl: Self::DEFAULT_RANKING_TTL,
            ranking_limit: Self::DEFAULT_RANKING_LIMIT,
        }
    }
}

// Parse a strictly positive integer.
fn parse_positive<T>(name: &str, value: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    match value.trim().parse::<T>() {
        Ok(parsed) if parsed > T::default() => Ok(parsed),
        Ok(_) => Err(ConfigError::invalid(name, "must be greater than zero")),
        Err(_) => {
            let message = format!("'{value}' is not a valid number");
            Err(ConfigError::invalid(name, message))
        }
    }
}

///
/// TESTS
///
