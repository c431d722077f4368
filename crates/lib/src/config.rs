//! Navigator configuration.
//!
//! All fields have defaults, so a configuration file only needs the values it changes:
//!
//! ```json
//! { "transition_timeout_ms": 2000 }
//! ```

use std::{path::Path, time::Duration};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Capacity of the command channel into the UI loop.
const DEFAULT_COMMAND_BUFFER: usize = 100;

/// Errors produced while loading or validating a [`NavigatorConfig`].
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A channel capacity was set to zero.
    #[error("Invalid configuration: {field} must be greater than zero")]
    ZeroCapacity { field: &'static str },

    /// The configuration file could not be read.
    #[error("Failed to read configuration file '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    /// The configuration file is not valid JSON for this schema.
    #[error("Failed to parse configuration file '{path}': {source}")]
    Parse {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

impl From<ConfigError> for crate::Error {
    fn from(err: ConfigError) -> Self {
        crate::Error::Config(err)
    }
}

/// Tunables for a [`Navigator`](crate::Navigator).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NavigatorConfig {
    /// Capacity of the command channel into the UI loop. Callers wait for room when full.
    pub command_buffer: usize,

    /// How long a caller waits for an operation before its completion fails.
    ///
    /// `None` waits forever, which is what an animate-until-done UI expects. The timeout
    /// only affects the caller: the navigation change still happens when the platform
    /// eventually finishes.
    pub transition_timeout_ms: Option<u64>,

    /// Animate modal presentation and dismissal.
    pub animate_modals: bool,
}

impl Default for NavigatorConfig {
    fn default() -> Self {
        Self {
            command_buffer: DEFAULT_COMMAND_BUFFER,
            transition_timeout_ms: None,
            animate_modals: true,
        }
    }
}

impl NavigatorConfig {
    /// Load a configuration from a JSON file and validate it.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let config: Self = serde_json::from_str(&contents).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Check the values a navigator cannot start with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.command_buffer == 0 {
            return Err(ConfigError::ZeroCapacity {
                field: "command_buffer",
            });
        }
        Ok(())
    }

    pub fn transition_timeout(&self) -> Option<Duration> {
        self.transition_timeout_ms.map(Duration::from_millis)
    }

    pub fn with_transition_timeout(mut self, timeout: Duration) -> Self {
        self.transition_timeout_ms = Some(u64::try_from(timeout.as_millis()).unwrap_or(u64::MAX));
        self
    }

    pub fn with_animate_modals(mut self, animate: bool) -> Self {
        self.animate_modals = animate;
        self
    }
}
