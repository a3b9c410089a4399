//! Tracing setup

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

use crate::config::AppConfig;
use crate::shared::errors::InfraError;

/// `RUST_LOG` when set, else `logging.level` from the config.
fn filter_for(config: &AppConfig) -> Result<EnvFilter, InfraError> {
    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => EnvFilter::try_new(&config.logging.level).map_err(|e| {
            InfraError::Config(format!(
                "logging.level {:?} is not a valid filter: {}",
                config.logging.level, e
            ))
        }),
    }
}

/// Installs the global subscriber: plain text lines, or one JSON object per
/// event when `logging.format = "json"`.
///
/// `log` records from dependencies are bridged through the same subscriber.
/// Fails if the level is not a valid filter or a subscriber is already set.
pub fn init_tracing(config: &AppConfig) -> Result<(), InfraError> {
    let json = config.logging.format.eq_ignore_ascii_case("json");

    tracing_subscriber::registry()
        .with(filter_for(config)?)
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .try_init()
        .map_err(|e| InfraError::Config(format!("tracing already initialised: {}", e)))
}
