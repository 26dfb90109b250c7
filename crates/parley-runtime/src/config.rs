//! Listener configuration

use std::time::Duration;

use serde::Deserialize;

use parley_core::{ParleyError, ParleyResult};
use parley_time::DEFAULT_PACING_CEILING;

/// What a distraction does to the message being decoded
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DistractionPolicy {
    /// Pause, then carry on with the same token
    Resume,
    /// Pause, then drop the partial translation and re-queue the message
    #[default]
    Abort,
}

/// Listener configuration
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Name carried on the listener's tracing span
    pub name: String,
    /// Maximum inter-message delay
    #[serde(with = "duration_str")]
    pub pacing_ceiling: Duration,
    /// Chance of a distraction before each token
    pub distraction_probability: f64,
    /// How long a distraction lasts
    #[serde(with = "duration_str")]
    pub distraction_pause: Duration,
    pub distraction_policy: DistractionPolicy,
    /// Number of recent translations kept
    pub recent_capacity: usize,
    /// Maximum queued messages; arrivals beyond this are dropped
    pub max_queue_len: usize,
    /// Seed for the distraction RNG (entropy if unset)
    pub seed: Option<u64>,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        ListenerConfig {
            name: "listener".to_string(),
            pacing_ceiling: DEFAULT_PACING_CEILING,
            distraction_probability: 0.1,
            distraction_pause: Duration::from_millis(1000),
            distraction_policy: DistractionPolicy::Abort,
            recent_capacity: 10,
            max_queue_len: 1000,
            seed: None,
        }
    }
}

impl ListenerConfig {
    /// Never distracted - deterministic processing
    pub fn attentive() -> Self {
        ListenerConfig {
            distraction_probability: 0.0,
            ..Self::default()
        }
    }

    /// Parse from JSON; missing fields take their defaults
    pub fn from_json(json: &str) -> ParleyResult<Self> {
        let config: ListenerConfig =
            serde_json::from_str(json).map_err(|e| ParleyError::InvalidConfig(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> ParleyResult<()> {
        if !(0.0..=1.0).contains(&self.distraction_probability) {
            return Err(ParleyError::InvalidConfig(format!(
                "distraction_probability must be within [0, 1], got {}",
                self.distraction_probability
            )));
        }
        if self.recent_capacity == 0 {
            return Err(ParleyError::InvalidConfig(
                "recent_capacity must be positive".to_string(),
            ));
        }
        if self.max_queue_len == 0 {
            return Err(ParleyError::InvalidConfig(
                "max_queue_len must be positive".to_string(),
            ));
        }
        if self.pacing_ceiling.is_zero() {
            return Err(ParleyError::InvalidConfig(
                "pacing_ceiling must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Durations as human-readable strings ("5s", "1000ms")
mod duration_str {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer};

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Duration, D::Error>
    where
        D: Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        humantime::parse_duration(&raw).map_err(serde::de::Error::custom)
    }
}
