//! # Configuration Module
//!
//! Handles loading and validating configuration from TOML files.
//!
//! Every field has a default, so an empty file (or no file at all, via
//! [`Config::default`]) yields a working transmitter: 1000-2000 µs range
//! centered at 1500, 7ms broadcast interval, 10 listeners.

use serde::Deserialize;
use serde::de::Error;
use std::fs;
use std::path::Path;

use crate::error::Result;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub channels: ChannelConfig,

    #[serde(default)]
    pub broadcast: BroadcastConfig,
}

/// Channel value range configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ChannelConfig {
    /// Lower clamp bound in microseconds
    #[serde(default = "default_min_value")]
    pub min_value: u16,

    /// Upper clamp bound in microseconds
    #[serde(default = "default_max_value")]
    pub max_value: u16,

    /// Initial value for all 14 channels
    #[serde(default = "default_default_value")]
    pub default_value: u16,
}

/// Broadcast timing and fanout configuration
#[derive(Debug, Deserialize, Clone)]
pub struct BroadcastConfig {
    /// Period between frame deliveries, floored to 7ms by the broadcaster
    #[serde(default = "default_interval_ms")]
    pub interval_ms: u64,

    /// Maximum number of registered listeners
    #[serde(default = "default_max_listeners")]
    pub max_listeners: usize,
}

// Default value functions
fn default_min_value() -> u16 { 1000 }
fn default_max_value() -> u16 { 2000 }
fn default_default_value() -> u16 { 1500 }
fn default_interval_ms() -> u64 { 7 }
fn default_max_listeners() -> usize { 10 }

impl Default for ChannelConfig {
    fn default() -> Self {
        Self {
            min_value: default_min_value(),
            max_value: default_max_value(),
            default_value: default_default_value(),
        }
    }
}

impl Default for BroadcastConfig {
    fn default() -> Self {
        Self {
            interval_ms: default_interval_ms(),
            max_listeners: default_max_listeners(),
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            channels: ChannelConfig::default(),
            broadcast: BroadcastConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the configuration file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use ibus_tx::config::Config;
    ///
    /// let config = Config::load("config/default.toml")?;
    /// # Ok::<(), ibus_tx::error::IbusError>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let config: Config = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns error if any configuration value is out of valid range
    pub fn validate(&self) -> Result<()> {
        if self.channels.min_value >= self.channels.max_value {
            return Err(crate::error::IbusError::Config(
                toml::de::Error::custom("min_value must be less than max_value")
            ));
        }

        if self.channels.default_value < self.channels.min_value
            || self.channels.default_value > self.channels.max_value {
            return Err(crate::error::IbusError::Config(
                toml::de::Error::custom("default_value must be within channel range (min_value to max_value)")
            ));
        }

        if self.broadcast.interval_ms == 0 {
            return Err(crate::error::IbusError::Config(
                toml::de::Error::custom("interval_ms must be greater than 0")
            ));
        }

        if self.broadcast.max_listeners == 0 {
            return Err(crate::error::IbusError::Config(
                toml::de::Error::custom("max_listeners must be greater than 0")
            ));
        }

        Ok(())
    }
}
