//! Application configuration loaded from environment variables.

use std::env;
use std::str::FromStr;

use yatube_core::pagination::Pagination;
use yatube_infra::JwtConfig;

#[cfg(feature = "postgres")]
use yatube_infra::DatabaseConfig;

#[cfg(feature = "rate-limit")]
use yatube_infra::RateLimitConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    /// `None` runs the in-memory store.
    #[cfg(feature = "postgres")]
    pub database: Option<DatabaseConfig>,
    pub jwt: JwtConfig,
    pub pagination: Pagination,
    #[cfg(feature = "rate-limit")]
    pub rate_limit: RateLimitConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 8080,
            #[cfg(feature = "postgres")]
            database: None,
            jwt: JwtConfig::default(),
            pagination: Pagination::default(),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::default(),
        }
    }
}

fn parse_env<T: FromStr>(key: &str) -> Option<T> {
    env::var(key).ok().and_then(|s| s.trim().parse().ok())
}

/// Build page settings, keeping `0 < page_size <= max_page_size`.
fn pagination(page_size: Option<u64>, max_page_size: Option<u64>) -> Pagination {
    let defaults = Pagination::default();
    let max_limit = max_page_size.filter(|m| *m > 0).unwrap_or(defaults.max_limit);
    let default_limit = page_size
        .filter(|s| *s > 0)
        .unwrap_or(defaults.default_limit)
        .min(max_limit);

    Pagination {
        default_limit,
        max_limit,
    }
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: parse_env("PORT").unwrap_or(8080),
            #[cfg(feature = "postgres")]
            database: DatabaseConfig::from_env(),
            jwt: JwtConfig::from_env(),
            pagination: pagination(parse_env("PAGE_SIZE"), parse_env("MAX_PAGE_SIZE")),
            #[cfg(feature = "rate-limit")]
            rate_limit: RateLimitConfig::from_env(),
        }
    }
}
