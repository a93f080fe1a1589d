//! Log configuration for processes hosting the engine.

use std::str::FromStr;

use depbot_config::Config;
use thiserror::Error;
use tracing::Subscriber;
use tracing_bunyan_formatter::{BunyanFormattingLayer, JsonStorageLayer};
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter};
use tracing_tree::HierarchicalLayer;

const DEFAULT_DIRECTIVES: &str = "info,depbot=debug";

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("Could not install global subscriber: {source}")]
    SetGlobalDefault {
        source: tracing::dispatcher::SetGlobalDefaultError,
    },
    #[error("Could not install log bridge: {source}")]
    LogTracer { source: tracing_log::log::SetLoggerError },
    #[error("Invalid log directives '{directives}': {source}")]
    InvalidDirectives {
        directives: String,
        source: tracing_subscriber::filter::ParseError,
    },
}

fn env_filter(directives: Option<String>) -> Result<EnvFilter, LoggingError> {
    let directives = directives.unwrap_or_else(|| DEFAULT_DIRECTIVES.to_string());
    EnvFilter::from_str(&directives)
        .map_err(|source| LoggingError::InvalidDirectives { directives, source })
}

/// Tree output for humans, or bunyan JSON tagged with the bot name and version.
fn build_subscriber(
    config: &Config,
    directives: Option<String>,
) -> Result<impl Subscriber + Send + Sync, LoggingError> {
    let bunyan = config.logging.use_bunyan;
    let tree_layer = (!bunyan).then(|| {
        HierarchicalLayer::new(2)
            .with_targets(true)
            .with_bracketed_fields(true)
    });
    let bunyan_layers = bunyan.then(|| {
        let name = if config.version.is_empty() {
            config.name.clone()
        } else {
            format!("{}-{}", config.name, config.version)
        };

        (JsonStorageLayer, BunyanFormattingLayer::new(name, std::io::stdout))
    });
    let (storage_layer, bunyan_layer) = match bunyan_layers {
        Some((storage, formatting)) => (Some(storage), Some(formatting)),
        None => (None, None),
    };

    Ok(tracing_subscriber::registry()
        .with(ErrorLayer::default())
        .with(env_filter(directives)?)
        .with(tree_layer)
        .with(storage_layer)
        .with(bunyan_layer))
}

/// Install the global subscriber. Call once, at process start.
pub fn configure_logging(config: &Config) -> Result<(), LoggingError> {
    LogTracer::init().map_err(|source| LoggingError::LogTracer { source })?;

    let subscriber = build_subscriber(config, std::env::var("RUST_LOG").ok())?;
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|source| LoggingError::SetGlobalDefault { source })
}
