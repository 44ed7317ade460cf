//! # Service Configuration
//!
//! Read from the environment once at startup.
//!
//! | Variable | Default | Meaning |
//! |----------|---------|---------|
//! | `PORT` | `8080` | listen port |
//! | `PAGE_SIZE` | `20` | items per page for `_page` requests |

use thiserror::Error;

pub const DEFAULT_PORT: u16 = 8080;
pub const DEFAULT_PAGE_SIZE: u64 = 20;

/// A configuration variable was set to something unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("invalid value for {var}: {value:?} ({reason})")]
    Invalid {
        var: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    pub port: u16,
    /// Page size applied to `_page`-style range requests.
    pub default_page_size: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            default_page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Build from an arbitrary variable lookup. Unset variables take defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port = match lookup("PORT") {
            Some(value) => value.trim().parse().map_err(|_| ConfigError::Invalid {
                var: "PORT",
                value,
                reason: "expected a port number",
            })?,
            None => DEFAULT_PORT,
        };

        let default_page_size = match lookup("PAGE_SIZE") {
            Some(value) => match value.trim().parse::<u64>() {
                Ok(size) if size > 0 => size,
                _ => {
                    return Err(ConfigError::Invalid {
                        var: "PAGE_SIZE",
                        value,
                        reason: "expected a positive integer",
                    })
                }
            },
            None => DEFAULT_PAGE_SIZE,
        };

        Ok(Self {
            port,
            default_page_size,
        })
    }
}
