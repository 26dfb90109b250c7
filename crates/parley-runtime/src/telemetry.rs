//! Tracing initialisation

use serde::Deserialize;
use tracing_subscriber::EnvFilter;

use parley_core::{ParleyError, ParleyResult};

#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TelemetryConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub directive: String,
    /// Emit JSON lines instead of human-readable output
    pub json: bool,
    pub with_target: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        TelemetryConfig {
            directive: "info".to_string(),
            json: false,
            with_target: true,
        }
    }
}

/// `RUST_LOG` if set, else the configured directive
pub fn env_filter(config: &TelemetryConfig) -> ParleyResult<EnvFilter> {
    let directive = match std::env::var(EnvFilter::DEFAULT_ENV) {
        Ok(from_env) if !from_env.trim().is_empty() => from_env,
        _ => config.directive.clone(),
    };
    EnvFilter::try_new(&directive)
        .map_err(|e| ParleyError::InvalidConfig(format!("log filter {:?}: {}", directive, e)))
}

/// Install the global subscriber. Fails if one is already installed.
pub fn init_tracing(config: &TelemetryConfig) -> ParleyResult<()> {
    let filter = env_filter(config)?;
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(config.with_target);

    let installed = if config.json {
        builder.json().try_init()
    } else {
        builder.try_init()
    };
    installed.map_err(|e| ParleyError::InvalidConfig(e.to_string()))
}
