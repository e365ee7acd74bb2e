//! Configuration loading and validation.
//!
//! Tunables that change between practice fields and competition live in a
//! TOML file; everything safety-related (interference bands, clamp limits)
//! is compiled in and deliberately not configurable. Every field has a
//! default, so an empty file is a valid configuration.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;
use tracing::info;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Validation(String),
}

/// Distance gates and timers for the teleop automation.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AutomationConfig {
    /// Farthest blue-alliance X at which the speaker automation will start
    /// aiming [m].
    pub auto_aim_x_m: f64,
    /// Farthest blue-alliance X at which the layup preset is usable [m].
    pub layup_x_m: f64,
    /// Delay between a piece leaving into the amp and amp mode releasing
    /// itself [s].
    pub amp_exit_delay_s: f64,
}

impl Default for AutomationConfig {
    fn default() -> Self {
        Self {
            auto_aim_x_m: 7.0,
            layup_x_m: 2.0,
            amp_exit_delay_s: 0.5,
        }
    }
}

/// Deadbands for the manual jog axes, applied to the raw stick value.
#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct JogConfig {
    pub pivot_deadband: f64,
    pub climber_deadband: f64,
    pub trigger_deadband: f64,
}

impl Default for JogConfig {
    fn default() -> Self {
        Self {
            pivot_deadband: 0.2,
            climber_deadband: 0.2,
            trigger_deadband: 0.1,
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct KestrelConfig {
    /// Control cycle period [ms].
    pub cycle_period_ms: u64,
    pub automation: AutomationConfig,
    pub jog: JogConfig,
}

impl Default for KestrelConfig {
    fn default() -> Self {
        Self {
            cycle_period_ms: 20,
            automation: AutomationConfig::default(),
            jog: JogConfig::default(),
        }
    }
}

impl KestrelConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cycle_period_ms == 0 || self.cycle_period_ms > 100 {
            return Err(ConfigError::Validation(format!(
                "cycle_period_ms must be in 1..=100, got {}",
                self.cycle_period_ms
            )));
        }
        if self.automation.layup_x_m > self.automation.auto_aim_x_m {
            return Err(ConfigError::Validation(format!(
                "layup_x_m ({}) must not exceed auto_aim_x_m ({})",
                self.automation.layup_x_m, self.automation.auto_aim_x_m
            )));
        }
        if self.automation.amp_exit_delay_s < 0.0 {
            return Err(ConfigError::Validation(
                "amp_exit_delay_s must be non-negative".into(),
            ));
        }
        for (name, value) in [
            ("jog.pivot_deadband", self.jog.pivot_deadband),
            ("jog.climber_deadband", self.jog.climber_deadband),
            ("jog.trigger_deadband", self.jog.trigger_deadband),
        ] {
            if !(0.0..1.0).contains(&value) {
                return Err(ConfigError::Validation(format!(
                    "{name} must be in [0, 1), got {value}"
                )));
            }
        }
        Ok(())
    }

    /// Cycle period as a duration, for the loop timer.
    pub const fn cycle_period(&self) -> std::time::Duration {
        std::time::Duration::from_millis(self.cycle_period_ms)
    }
}

pub fn load_config_from_str(raw: &str) -> Result<KestrelConfig, ConfigError> {
    let config: KestrelConfig = toml::from_str(raw)?;
    config.validate()?;
    Ok(config)
}

pub fn load_config(path: &Path) -> Result<KestrelConfig, ConfigError> {
    let raw = fs::read_to_string(path)?;
    let config = load_config_from_str(&raw)?;
    info!(path = %path.display(), "config loaded");
    Ok(config)
}
