//! Timing tunables for generation and the processing screen.

use std::time::Duration;

use thiserror::Error;

/// Placeholder shown in both reveal slots when generation fails.
pub const DEFAULT_FALLBACK_REFERENCE: &str =
    "https://images.unsplash.com/photo-1542190891-2093d38760f2?w=800&q=80";

/// Invalid configuration value.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// The variable is set but is not a positive integer.
    #[error("{key} must be a positive integer number of milliseconds, got {value:?}")]
    InvalidMillis {
        /// Environment variable name.
        key: &'static str,
        /// The raw value found.
        value: String,
    },

    /// The variable is set but empty.
    #[error("{key} must not be empty")]
    Empty {
        /// Environment variable name.
        key: &'static str,
    },
}

/// Timing constants for the orchestration core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tunables {
    /// Delay between the end of one status poll and the start of the next.
    pub poll_interval: Duration,
    /// Maximum wall-clock time a job may take to reach a terminal status.
    pub generation_budget: Duration,
    /// Cadence of the processing-screen progress climb.
    pub progress_step: Duration,
    /// Pause after progress reaches 100 before navigating away.
    pub settle_delay: Duration,
    /// Highest percentage progress may reach while generation is outstanding.
    pub progress_cap: u8,
    /// Reference used for both slots of the fallback pair.
    pub fallback_reference: String,
}

impl Default for Tunables {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_millis(2_000),
            generation_budget: Duration::from_millis(180_000),
            progress_step: Duration::from_millis(420),
            settle_delay: Duration::from_millis(1_500),
            progress_cap: 95,
            fallback_reference: DEFAULT_FALLBACK_REFERENCE.to_owned(),
        }
    }
}

impl Tunables {
    /// Builds tunables from the process environment, falling back to the
    /// defaults for unset variables.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a variable is set to an invalid value.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds tunables from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if a key maps to an invalid value.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        let millis = |key: &'static str, default: Duration| -> Result<Duration, ConfigError> {
            match lookup(key) {
                None => Ok(default),
                Some(raw) => match raw.trim().parse::<u64>() {
                    Ok(ms) if ms > 0 => Ok(Duration::from_millis(ms)),
                    _ => Err(ConfigError::InvalidMillis { key, value: raw }),
                },
            }
        };

        let fallback_reference = match lookup("BOOTH_FALLBACK_URL") {
            None => defaults.fallback_reference,
            Some(raw) if raw.trim().is_empty() => {
                return Err(ConfigError::Empty {
                    key: "BOOTH_FALLBACK_URL",
                });
            }
            Some(raw) => raw.trim().to_owned(),
        };

        Ok(Self {
            poll_interval: millis("BOOTH_POLL_INTERVAL_MS", defaults.poll_interval)?,
            generation_budget: millis("BOOTH_GENERATION_BUDGET_MS", defaults.generation_budget)?,
            progress_step: millis("BOOTH_PROGRESS_STEP_MS", defaults.progress_step)?,
            settle_delay: millis("BOOTH_SETTLE_DELAY_MS", defaults.settle_delay)?,
            progress_cap: defaults.progress_cap,
            fallback_reference,
        })
    }
}
