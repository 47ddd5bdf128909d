//! TOML-based scenario configuration and preset definitions.

use std::fs;
use std::path::Path;

use serde::Deserialize;
use thiserror::Error;

use crate::agent::{AgentParams, MAX_ACTIONS, QLearningAgent, QTable, scaled_episodes};
use crate::devices::priority::{DEFAULT_PRIORITY_PERIOD, DEFAULT_PRIORITY_TOKENS};
use crate::devices::{DeviceSpec, PriorityRule};
use crate::sim::Environment;
use crate::sim::pricing::PriceSchedule;
use crate::sim::reward::{RewardShaping, UserProfile};
use crate::sim::sleep::SleepWindow;

/// Top-level scenario configuration parsed from TOML.
///
/// All sections have defaults; a file only needs to list what it changes.
/// Load from TOML with [`ScenarioConfig::from_toml_file`] or start from a
/// named preset with [`ScenarioConfig::from_preset`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Episode length and sleep window.
    #[serde(default)]
    pub environment: EnvironmentConfig,
    /// Hourly tariff.
    #[serde(default)]
    pub pricing: PricingConfig,
    /// Refrigerator-class detection and duty cycle.
    #[serde(default)]
    pub priority: PriorityConfig,
    /// Reward constants and user profile.
    #[serde(default)]
    pub reward: RewardShaping,
    /// Learning parameters and training length.
    #[serde(default)]
    pub agent: AgentConfig,
    /// Devices registered at startup, in bit order.
    #[serde(default)]
    pub devices: Vec<DeviceSpec>,
}

/// Episode length and sleep window.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EnvironmentConfig {
    /// Hours per episode (must be > 0).
    pub max_hours: usize,
    /// First hour ordinary devices are forced off.
    pub sleep_hour: usize,
    /// First hour they may run again.
    pub wake_hour: usize,
}

impl Default for EnvironmentConfig {
    fn default() -> Self {
        Self {
            max_hours: 24,
            sleep_hour: 22,
            wake_hour: 6,
        }
    }
}

/// Hourly tariff.
///
/// A non-empty `hourly` list overrides the peak/off-peak fields.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PricingConfig {
    pub off_peak_price: f64,
    pub peak_price: f64,
    /// First peak hour (inclusive).
    pub peak_start: usize,
    /// End of the peak (exclusive).
    pub peak_end: usize,
    /// Explicit per-hour prices, one per hour of the episode.
    pub hourly: Vec<f64>,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            off_peak_price: 0.2,
            peak_price: 0.5,
            peak_start: 12,
            peak_end: 18,
            hourly: Vec::new(),
        }
    }
}

/// Refrigerator-class detection and duty cycle.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PriorityConfig {
    /// Case-insensitive name fragments marking a priority device.
    pub tokens: Vec<String>,
    /// Priority devices run when `hour % period == 0`.
    pub period: usize,
}

impl Default for PriorityConfig {
    fn default() -> Self {
        Self {
            tokens: DEFAULT_PRIORITY_TOKENS.iter().map(|t| t.to_string()).collect(),
            period: DEFAULT_PRIORITY_PERIOD,
        }
    }
}

/// Learning parameters and training length.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AgentConfig {
    pub alpha: f64,
    pub gamma: f64,
    pub epsilon: f64,
    /// Nominal episode count before the speed factor is applied.
    pub episodes: usize,
    /// Episodes actually run: `ceil(episodes / speed_factor)`.
    pub speed_factor: f64,
    /// Master random seed.
    pub seed: u64,
    /// Report every N episodes (0 disables progress output).
    pub progress_interval: usize,
}

impl Default for AgentConfig {
    fn default() -> Self {
        let p = AgentParams::default();
        Self {
            alpha: p.alpha,
            gamma: p.gamma,
            epsilon: p.epsilon,
            episodes: 1000,
            speed_factor: 1.0,
            seed: p.seed,
            progress_interval: p.progress_interval,
        }
    }
}

impl AgentConfig {
    pub fn params(&self) -> AgentParams {
        AgentParams {
            alpha: self.alpha,
            gamma: self.gamma,
            epsilon: self.epsilon,
            seed: self.seed,
            progress_interval: self.progress_interval,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug, Error)]
#[error("config error: {field}: {message}")]
pub struct ConfigError {
    /// Dotted field path (e.g., `"agent.alpha"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl ConfigError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

impl ScenarioConfig {
    /// A small home: one fridge, three lamps, a TV and a washing machine.
    pub fn household() -> Self {
        Self {
            devices: vec![
                DeviceSpec::new("fridge", 150.0, 1),
                DeviceSpec::new("lamp", 60.0, 3),
                DeviceSpec::new("tv", 120.0, 1),
                DeviceSpec::new("washing_machine", 500.0, 1),
            ],
            ..Self::default()
        }
    }

    /// Late sleeper on a cost-conscious profile with a wrapping peak tariff.
    pub fn night_owl() -> Self {
        Self {
            environment: EnvironmentConfig {
                sleep_hour: 2,
                wake_hour: 10,
                ..EnvironmentConfig::default()
            },
            pricing: PricingConfig {
                off_peak_price: 0.15,
                peak_price: 0.6,
                peak_start: 18,
                peak_end: 2,
                ..PricingConfig::default()
            },
            reward: RewardShaping {
                profile: UserProfile::Economy,
                ..RewardShaping::default()
            },
            devices: vec![
                DeviceSpec::new("freezer", 200.0, 1),
                DeviceSpec::new("lamp", 60.0, 2),
                DeviceSpec::new("computer", 300.0, 1),
                DeviceSpec::new("tv", 120.0, 1),
            ],
            ..Self::default()
        }
    }

    /// Comfort-first profile with air conditioning and a looser limit.
    pub fn comfort() -> Self {
        Self {
            reward: RewardShaping {
                threshold_fraction: 0.6,
                device_on_bonus: 3.0,
                profile: UserProfile::Comfort,
                ..RewardShaping::default()
            },
            agent: AgentConfig {
                epsilon: 0.1,
                ..AgentConfig::default()
            },
            devices: vec![
                DeviceSpec::new("air_conditioner", 1500.0, 1),
                DeviceSpec::new("fridge", 150.0, 1),
                DeviceSpec::new("lamp", 60.0, 2),
                DeviceSpec::new("heater", 1000.0, 1),
            ],
            ..Self::default()
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["household", "night_owl", "comfort"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "household" => Ok(Self::household()),
            "night_owl" => Ok(Self::night_owl()),
            "comfort" => Ok(Self::comfort()),
            _ => Err(ConfigError::new(
                "preset",
                format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            )),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| {
            ConfigError::new("scenario", format!("cannot read \"{}\": {e}", path.display()))
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError::new("toml", e.to_string()))
    }

    /// Total device instances after expanding quantities.
    pub fn device_count(&self) -> usize {
        self.devices.iter().map(|d| d.quantity as usize).sum()
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();

        let env = &self.environment;
        if env.max_hours == 0 {
            errors.push(ConfigError::new("environment.max_hours", "must be > 0"));
        }
        if env.sleep_hour >= env.max_hours.max(1) {
            errors.push(ConfigError::new(
                "environment.sleep_hour",
                "must be < environment.max_hours",
            ));
        }
        if env.wake_hour >= env.max_hours.max(1) {
            errors.push(ConfigError::new(
                "environment.wake_hour",
                "must be < environment.max_hours",
            ));
        }

        let p = &self.pricing;
        if [p.off_peak_price, p.peak_price]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            errors.push(ConfigError::new("pricing", "prices must be finite and >= 0"));
        }
        if p.peak_start > env.max_hours || p.peak_end > env.max_hours {
            errors.push(ConfigError::new(
                "pricing.peak_start",
                "peak hours must be <= environment.max_hours",
            ));
        }
        if !p.hourly.is_empty() && p.hourly.len() != env.max_hours {
            errors.push(ConfigError::new(
                "pricing.hourly",
                format!(
                    "must list {} prices, got {}",
                    env.max_hours,
                    p.hourly.len()
                ),
            ));
        }
        if p.hourly.iter().any(|&v| !v.is_finite() || v < 0.0) {
            errors.push(ConfigError::new("pricing.hourly", "prices must be finite and >= 0"));
        }

        if self.priority.period == 0 {
            errors.push(ConfigError::new("priority.period", "must be > 0"));
        }

        let r = &self.reward;
        if !r.threshold_fraction.is_finite() || r.threshold_fraction <= 0.0 {
            errors.push(ConfigError::new("reward.threshold_fraction", "must be > 0"));
        }
        if r.mild_band > r.medium_band {
            errors.push(ConfigError::new(
                "reward.mild_band",
                "must be <= reward.medium_band",
            ));
        }
        if !(0.0..=1.0).contains(&r.sleep_fraction) {
            errors.push(ConfigError::new(
                "reward.sleep_fraction",
                "must be in [0.0, 1.0]",
            ));
        }

        let a = &self.agent;
        for (field, v) in [
            ("agent.alpha", a.alpha),
            ("agent.gamma", a.gamma),
            ("agent.epsilon", a.epsilon),
        ] {
            if !(0.0..=1.0).contains(&v) {
                errors.push(ConfigError::new(field, "must be in [0.0, 1.0]"));
            }
        }
        if !a.speed_factor.is_finite() || a.speed_factor <= 0.0 {
            errors.push(ConfigError::new("agent.speed_factor", "must be > 0"));
        } else if let Err(e) = scaled_episodes(a.episodes, a.speed_factor) {
            errors.push(ConfigError::new("agent.episodes", e.to_string()));
        }

        for (i, d) in self.devices.iter().enumerate() {
            if d.name.trim().is_empty() {
                errors.push(ConfigError::new(
                    format!("devices[{i}].name"),
                    "must not be empty",
                ));
            }
            if !d.power_w.is_finite() || d.power_w <= 0.0 {
                errors.push(ConfigError::new(
                    format!("devices[{i}].power_w"),
                    "must be > 0",
                ));
            }
            if d.quantity == 0 {
                errors.push(ConfigError::new(
                    format!("devices[{i}].quantity"),
                    "must be > 0",
                ));
            }
        }
        let count = self.device_count();
        if count > MAX_ACTIONS.ilog2() as usize {
            errors.push(ConfigError::new(
                "devices",
                format!(
                    "{count} devices exceed the limit of {} ({MAX_ACTIONS} joint actions)",
                    MAX_ACTIONS.ilog2()
                ),
            ));
        }

        errors
    }

    /// Builds the price table described by `[pricing]`.
    pub fn price_schedule(&self) -> PriceSchedule {
        let p = &self.pricing;
        if p.hourly.is_empty() {
            PriceSchedule::time_of_use(
                self.environment.max_hours,
                p.off_peak_price,
                p.peak_price,
                p.peak_start,
                p.peak_end,
            )
        } else {
            PriceSchedule::from_prices(p.hourly.clone())
        }
    }

    /// Builds an environment with every configured device registered.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::InvalidDeviceSpec`] for a bad `[[devices]]`
    /// entry.
    pub fn build_environment(&self) -> crate::Result<Environment> {
        let env_cfg = &self.environment;
        let mut env = Environment::new(env_cfg.max_hours)
            .with_prices(self.price_schedule())
            .with_sleep_window(SleepWindow::new(env_cfg.sleep_hour, env_cfg.wake_hour))
            .with_priority_rule(PriorityRule::new(&self.priority.tokens, self.priority.period))
            .with_reward(self.reward.clone());
        env.register_devices(&self.devices)?;
        Ok(env)
    }

    /// Builds the environment and an agent over it.
    ///
    /// # Errors
    ///
    /// Propagates environment, action-space and table-shape errors.
    pub fn build_agent(&self, table: Option<QTable>) -> crate::Result<QLearningAgent> {
        QLearningAgent::new(self.build_environment()?, self.agent.params(), table)
    }
}
