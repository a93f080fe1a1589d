use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration value '{name}' must not be empty")]
    EmptyValue { name: &'static str },

    #[error("Configuration value '{name}' must be greater than zero")]
    ZeroValue { name: &'static str },

    #[error("Initial backoff ({initial}ms) is greater than max backoff ({max}ms)")]
    InvalidBackoff { initial: u64, max: u64 },

    #[error("Invalid monorepo definitions in 'BOT_MONOREPO_DEFINITIONS': {source}")]
    InvalidMonorepoDefinitions { source: serde_json::Error },
}
