//! Hourly household environment: device states, consumption, cost and reward.

use crate::devices::{Device, DeviceRegistry, DeviceSpec, PriorityRule};
use crate::error::{Error, Result};

use super::clock::HourClock;
use super::pricing::PriceSchedule;
use super::reward::{HourSummary, RewardShaping};
use super::sleep::SleepWindow;
use super::types::StepOutcome;

/// Default number of hours in one episode.
pub const DEFAULT_MAX_HOURS: usize = 24;

/// Environment owning the device registry, the hour cursor and the rules
/// that turn a joint action into consumption, cost and reward.
///
/// The only persistent mode is the current hour, cyclic with period
/// `max_hours`. Everything else is a function of the registry and the rules.
#[derive(Debug, Clone)]
pub struct Environment {
    devices: DeviceRegistry,
    clock: HourClock,
    prices: PriceSchedule,
    sleep: SleepWindow,
    priority: PriorityRule,
    reward: RewardShaping,
}

impl Environment {
    /// Creates an empty environment with default rules.
    ///
    /// # Arguments
    ///
    /// * `max_hours` - Episode length in hours (zero is treated as one)
    pub fn new(max_hours: usize) -> Self {
        let clock = HourClock::new(max_hours);
        let prices = if clock.max_hours() == DEFAULT_MAX_HOURS {
            PriceSchedule::default()
        } else {
            PriceSchedule::time_of_use(clock.max_hours(), 0.2, 0.5, 12, 18)
        };
        Self {
            devices: DeviceRegistry::new(),
            clock,
            prices,
            sleep: SleepWindow::default(),
            priority: PriorityRule::default(),
            reward: RewardShaping::default(),
        }
    }

    /// Replaces the price table.
    pub fn with_prices(mut self, prices: PriceSchedule) -> Self {
        self.prices = prices;
        self
    }

    /// Replaces the sleep window.
    pub fn with_sleep_window(mut self, sleep: SleepWindow) -> Self {
        self.sleep = sleep;
        self
    }

    /// Replaces the priority rule and re-flags registered devices.
    pub fn with_priority_rule(mut self, priority: PriorityRule) -> Self {
        self.devices.apply_priority(&priority);
        self.priority = priority;
        self
    }

    /// Replaces the reward constants.
    pub fn with_reward(mut self, reward: RewardShaping) -> Self {
        self.reward = reward;
        self
    }

    /// Registers devices; see [`DeviceRegistry::register`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDeviceSpec`] without registering anything if
    /// any spec is invalid.
    pub fn register_devices(&mut self, specs: &[DeviceSpec]) -> Result<usize> {
        self.devices.register(specs, &self.priority)
    }

    /// Removes every device whose name contains `token`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if nothing matches.
    pub fn remove_device(&mut self, token: &str) -> Result<Vec<String>> {
        self.devices.remove_matching(token)
    }

    /// Moves to hour 0, switches everything off, then switches priority
    /// devices on.
    ///
    /// # Returns
    ///
    /// The initial state (hour 0).
    pub fn reset(&mut self) -> usize {
        self.clock.reset();
        for d in self.devices.iter_mut() {
            d.on = d.priority;
        }
        self.clock.hour()
    }

    /// Applies one joint action for the current hour and advances the clock.
    ///
    /// `action` holds one 0/1 entry per device in registry order; any
    /// non-zero entry means on. Priority devices follow their schedule and
    /// ordinary devices are forced off inside the sleep window, regardless
    /// of the commanded bit.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionSizeMismatch`] if `action.len()` differs from
    /// the device count. The environment is unchanged in that case.
    pub fn step(&mut self, action: &[u8]) -> Result<StepOutcome> {
        if action.len() != self.devices.len() {
            return Err(Error::ActionSizeMismatch {
                expected: self.devices.len(),
                actual: action.len(),
            });
        }

        let hour = self.clock.hour();
        let sleeping = self.sleep.contains(hour);
        let priority_on = self.priority.scheduled_on(hour);

        let mut summary = HourSummary {
            in_sleep_window: sleeping,
            ..HourSummary::default()
        };
        for (d, &bit) in self.devices.iter_mut().zip(action) {
            d.on = if d.priority {
                priority_on
            } else {
                bit != 0 && !sleeping
            };
            summary.consumption_kwh += d.consumption_kwh();
            if d.on {
                if d.priority {
                    summary.priority_on += 1;
                } else {
                    summary.ordinary_on += 1;
                }
            }
        }

        summary.limit_kwh = self.compute_consumption_limit();
        summary.cost = summary.consumption_kwh * self.prices.price_at(hour);
        let reward = self.reward.reward(&summary);

        let (next, done) = self.clock.advance();
        Ok(StepOutcome {
            reward,
            consumption_kwh: summary.consumption_kwh,
            cost: summary.cost,
            hour: next,
            done,
        })
    }

    /// Allowed hourly consumption (kWh): a fraction of the summed rated draw
    /// of every registered device, independent of state and time.
    pub fn compute_consumption_limit(&self) -> f64 {
        self.reward.limit_kwh(self.devices.rated_kw_total())
    }

    /// Current hour (the observable state).
    pub fn hour(&self) -> usize {
        self.clock.hour()
    }

    pub fn max_hours(&self) -> usize {
        self.clock.max_hours()
    }

    pub fn num_devices(&self) -> usize {
        self.devices.len()
    }

    pub fn devices(&self) -> &DeviceRegistry {
        &self.devices
    }

    /// Devices in bit order.
    pub fn device_iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub fn prices(&self) -> &PriceSchedule {
        &self.prices
    }

    pub fn sleep_window(&self) -> SleepWindow {
        self.sleep
    }

    pub fn priority_rule(&self) -> &PriorityRule {
        &self.priority
    }

    pub fn reward_shaping(&self) -> &RewardShaping {
        &self.reward
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HOURS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn env_with(specs: &[DeviceSpec]) -> Environment {
        let mut env = Environment::default();
        env.register_devices(specs).expect("valid specs");
        env
    }

    #[test]
    fn reset_turns_on_priority_only() {
        let mut env = env_with(&[
            DeviceSpec::new("fridge", 200.0, 1),
            DeviceSpec::new("lamp", 100.0, 1),
        ]);
        assert_eq!(env.reset(), 0);
        assert_eq!(env.devices().state_bits(), vec![1, 0]);
    }

    #[test]
    fn step_rejects_wrong_action_length() {
        let mut env = env_with(&[DeviceSpec::new("lamp", 100.0, 2)]);
        env.reset();
        let err = env.step(&[1]);
        assert!(matches!(
            err,
            Err(Error::ActionSizeMismatch {
                expected: 2,
                actual: 1
            })
        ));
        assert_eq!(env.hour(), 0);
    }

    #[test]
    fn day_ends_exactly_on_24th_step() {
        let mut env = env_with(&[DeviceSpec::new("lamp", 100.0, 1)]);
        env.reset();
        let mut done_at = Vec::new();
        for i in 1..=24 {
            let out = env.step(&[1]).expect("sized action");
            assert!(out.hour < env.max_hours());
            assert_eq!(out.done, out.hour == 0);
            if out.done {
                done_at.push(i);
            }
        }
        assert_eq!(done_at, vec![24]);
    }

    #[test]
    fn priority_device_ignores_command() {
        let mut env = env_with(&[DeviceSpec::new("fridge", 1000.0, 1)]);
        env.reset();
        // hour 0: scheduled on despite a 0 bit
        let out = env.step(&[0]).expect("sized action");
        assert!((out.consumption_kwh - 1.0).abs() < 1e-12);
        // hour 1: scheduled off despite a 1 bit
        let out = env.step(&[1]).expect("sized action");
        assert_eq!(out.consumption_kwh, 0.0);
    }

    #[test]
    fn sleep_window_forces_ordinary_devices_off() {
        let mut env = env_with(&[DeviceSpec::new("lamp", 100.0, 1)]);
        env.reset();
        // hour 0 is inside the default 22 -> 6 window
        let out = env.step(&[1]).expect("sized action");
        assert_eq!(out.consumption_kwh, 0.0);
        // 20 (under limit) + 10 (quiet sleep hour)
        assert_eq!(out.reward, 30.0);
        assert_eq!(env.devices().state_bits(), vec![0]);
    }

    #[test]
    fn reward_during_the_day() {
        let mut env = env_with(&[DeviceSpec::new("heater", 2000.0, 1), DeviceSpec::new("lamp", 100.0, 1)]);
        env.reset();
        for _ in 0..8 {
            env.step(&[0, 0]).expect("sized action");
        }
        assert_eq!(env.hour(), 8);
        // limit = 0.5 * 2.1 = 1.05 kWh; both on = 2.1 kWh, excess 1.05 -> severe
        let out = env.step(&[1, 1]).expect("sized action");
        assert!((out.consumption_kwh - 2.1).abs() < 1e-12);
        let expected = -(1.05 * 60.0) + 2.0 * 2.0;
        assert!((out.reward - expected).abs() < 1e-9);
        // off-peak price 0.2
        assert!((out.cost - 2.1 * 0.2).abs() < 1e-12);
    }

    #[test]
    fn consumption_limit_is_half_rated_kw() {
        let env = env_with(&[DeviceSpec::new("lamp", 100.0, 2), DeviceSpec::new("tv", 200.0, 1)]);
        assert!((env.compute_consumption_limit() - 0.2).abs() < 1e-12);
        assert_eq!(Environment::default().compute_consumption_limit(), 0.0);
    }

    #[test]
    fn remove_then_step_needs_smaller_action() {
        let mut env = env_with(&[DeviceSpec::new("lamp", 100.0, 2), DeviceSpec::new("tv", 200.0, 1)]);
        env.remove_device("lamp").expect("lamps exist");
        env.reset();
        assert!(env.step(&[1, 1, 1]).is_err());
        assert!(env.step(&[1]).is_ok());
    }

    #[test]
    fn custom_priority_rule_reflags_devices() {
        let env = env_with(&[DeviceSpec::new("aquarium", 50.0, 1)])
            .with_priority_rule(PriorityRule::new(["aquarium"], 2));
        assert!(env.devices().get("aquarium_1").is_some_and(|d| d.priority));
    }
}
