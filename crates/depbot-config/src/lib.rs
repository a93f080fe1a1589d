//! Config module.

mod errors;

use std::env;

pub use errors::ConfigError;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Max attempts for optimistic and transient retries.
    pub max_attempts: u32,
}

#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Read queue parallelism.
    pub read_concurrency: usize,
    /// Max attempts per outbound call.
    pub max_attempts: u32,
    /// Initial retry backoff (in milliseconds).
    pub initial_backoff_ms: u64,
    /// Max retry backoff (in milliseconds).
    pub max_backoff_ms: u64,
}

#[derive(Debug, Clone)]
pub struct LockConfig {
    /// Wait timeout for the issue critical section (in milliseconds).
    pub issue_lock_timeout_ms: u64,
}

#[derive(Debug, Clone)]
pub struct MonorepoConfig {
    /// Delay before a partial release is forced (in seconds).
    pub release_timeout_secs: u64,
    /// JSON override of the monorepo catalogue.
    pub definitions: String,
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    /// Use bunyan logging.
    pub use_bunyan: bool,
}

/// Bot configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Bot name.
    pub name: String,
    /// Head ref prefix of every bot branch.
    pub branch_prefix: String,
    /// Database options.
    pub database: DatabaseConfig,
    /// API options.
    pub api: ApiConfig,
    /// Lock options.
    pub lock: LockConfig,
    /// Monorepo options.
    pub monorepo: MonorepoConfig,
    /// Logging options.
    pub logging: LoggingConfig,
    /// App version
    pub version: String,
}

impl Config {
    /// Create configuration from environment.
    pub fn from_env(version: String) -> Config {
        Config {
            name: env_to_str("BOT_NAME", "depbot"),
            branch_prefix: env_to_str("BOT_BRANCH_PREFIX", "depbot/"),
            database: DatabaseConfig {
                max_attempts: env_to_u32("BOT_DATABASE_MAX_ATTEMPTS", 5),
            },
            api: ApiConfig {
                read_concurrency: env_to_usize("BOT_API_READ_CONCURRENCY", 8),
                max_attempts: env_to_u32("BOT_API_MAX_ATTEMPTS", 5),
                initial_backoff_ms: env_to_u64("BOT_API_INITIAL_BACKOFF_MS", 500),
                max_backoff_ms: env_to_u64("BOT_API_MAX_BACKOFF_MS", 10_000),
            },
            lock: LockConfig {
                issue_lock_timeout_ms: env_to_u64("BOT_ISSUE_LOCK_TIMEOUT_MS", 10_000),
            },
            monorepo: MonorepoConfig {
                release_timeout_secs: env_to_u64("BOT_MONOREPO_RELEASE_TIMEOUT_SECS", 1800),
                definitions: env_to_str("BOT_MONOREPO_DEFINITIONS", ""),
            },
            logging: LoggingConfig {
                use_bunyan: env_to_bool("BOT_LOGGING_USE_BUNYAN", false),
            },
            version,
        }
    }

    /// Create configuration from environment, without version.
    pub fn from_env_no_version() -> Config {
        Self::from_env(String::new())
    }

    /// Check that the configuration values are usable.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.branch_prefix.is_empty() {
            return Err(ConfigError::EmptyValue {
                name: "BOT_BRANCH_PREFIX",
            });
        }

        if self.api.read_concurrency == 0 {
            return Err(ConfigError::ZeroValue {
                name: "BOT_API_READ_CONCURRENCY",
            });
        }

        if self.api.max_attempts == 0 {
            return Err(ConfigError::ZeroValue {
                name: "BOT_API_MAX_ATTEMPTS",
            });
        }

        if self.database.max_attempts == 0 {
            return Err(ConfigError::ZeroValue {
                name: "BOT_DATABASE_MAX_ATTEMPTS",
            });
        }

        if self.api.initial_backoff_ms > self.api.max_backoff_ms {
            return Err(ConfigError::InvalidBackoff {
                initial: self.api.initial_backoff_ms,
                max: self.api.max_backoff_ms,
            });
        }

        Ok(())
    }
}

fn env_to_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_u32(name: &str, default: u32) -> u32 {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_usize(name: &str, default: usize) -> usize {
    env::var(name)
        .map(|e| e.parse().unwrap_or(default))
        .unwrap_or(default)
}

fn env_to_bool(name: &str, default: bool) -> bool {
    env::var(name).map(|e| !e.is_empty()).unwrap_or(default)
}

fn env_to_str(name: &str, default: &str) -> String {
    env::var(name)
        .unwrap_or_else(|_e| default.to_string())
        .replace("\\n", "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let config = Config::from_env_no_version();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_read_concurrency_is_rejected() {
        let mut config = Config::from_env_no_version();
        config.api.read_concurrency = 0;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::ZeroValue {
                name: "BOT_API_READ_CONCURRENCY"
            })
        ));
    }

    #[test]
    fn inverted_backoff_is_rejected() {
        let mut config = Config::from_env_no_version();
        config.api.initial_backoff_ms = 20_000;
        config.api.max_backoff_ms = 1_000;

        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidBackoff { .. })
        ));
    }
}
