//! Multi-term reward shaping for one simulated hour.

use serde::Deserialize;

/// How strongly the occupant weights energy cost against comfort.
///
/// Only affects the optional cost term; [`UserProfile::None`] disables it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UserProfile {
    #[default]
    None,
    Economy,
    Balanced,
    Comfort,
}

impl UserProfile {
    /// Multiplier applied to the hourly cost.
    pub fn weight(self) -> f64 {
        match self {
            UserProfile::None => 0.0,
            UserProfile::Economy => 0.5,
            UserProfile::Balanced => 0.75,
            UserProfile::Comfort => 1.0,
        }
    }
}

/// Tunable constants of the reward function.
///
/// All consumption quantities are in kWh for one hour. Doubles as the
/// `[reward]` section of a scenario file.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct RewardShaping {
    /// Fraction of the total rated draw allowed before penalties apply.
    pub threshold_fraction: f64,
    /// Excess (kWh) below which `mild_rate` applies.
    pub mild_band: f64,
    /// Excess (kWh) below which `medium_rate` applies.
    pub medium_band: f64,
    pub mild_rate: f64,
    pub medium_rate: f64,
    pub severe_rate: f64,
    /// Flat bonus when consumption stays within the limit.
    pub under_limit_bonus: f64,
    /// Bonus for quiet hours inside the sleep window.
    pub sleep_bonus: f64,
    /// Fraction of the limit consumption must stay under to earn `sleep_bonus`.
    pub sleep_fraction: f64,
    /// Bonus per priority device left on.
    pub priority_on_bonus: f64,
    /// Bonus per ordinary device left on.
    pub device_on_bonus: f64,
    pub profile: UserProfile,
    /// Scale of the cost term (`cost * profile weight * cost_weight`).
    pub cost_weight: f64,
}

impl Default for RewardShaping {
    fn default() -> Self {
        Self {
            threshold_fraction: 0.5,
            mild_band: 0.5,
            medium_band: 1.0,
            mild_rate: 20.0,
            medium_rate: 40.0,
            severe_rate: 60.0,
            under_limit_bonus: 20.0,
            sleep_bonus: 10.0,
            sleep_fraction: 0.7,
            priority_on_bonus: 5.0,
            device_on_bonus: 2.0,
            profile: UserProfile::None,
            cost_weight: 1.0,
        }
    }
}

/// Observed quantities for one hour, fed to [`RewardShaping::reward`].
#[derive(Debug, Clone, Copy, Default)]
pub struct HourSummary {
    pub consumption_kwh: f64,
    pub limit_kwh: f64,
    pub cost: f64,
    pub in_sleep_window: bool,
    pub priority_on: usize,
    pub ordinary_on: usize,
}

impl RewardShaping {
    /// Allowed consumption given the total rated draw in kW.
    pub fn limit_kwh(&self, rated_kw_total: f64) -> f64 {
        rated_kw_total * self.threshold_fraction
    }

    /// Penalty for exceeding the limit by `excess` kWh (0 when not over).
    pub fn excess_penalty(&self, excess: f64) -> f64 {
        if excess <= 0.0 {
            0.0
        } else if excess < self.mild_band {
            excess * self.mild_rate
        } else if excess < self.medium_band {
            excess * self.medium_rate
        } else {
            excess * self.severe_rate
        }
    }

    /// Total reward for one hour.
    pub fn reward(&self, s: &HourSummary) -> f64 {
        let mut reward = 0.0;

        let excess = s.consumption_kwh - s.limit_kwh;
        if excess > 0.0 {
            reward -= self.excess_penalty(excess);
        } else {
            reward += self.under_limit_bonus;
        }

        if s.in_sleep_window && s.consumption_kwh <= s.limit_kwh * self.sleep_fraction {
            reward += self.sleep_bonus;
        }

        reward += s.priority_on as f64 * self.priority_on_bonus;
        reward += s.ordinary_on as f64 * self.device_on_bonus;

        reward - s.cost * self.profile.weight() * self.cost_weight
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn summary(consumption_kwh: f64, limit_kwh: f64) -> HourSummary {
        HourSummary {
            consumption_kwh,
            limit_kwh,
            ..HourSummary::default()
        }
    }

    #[test]
    fn under_limit_earns_flat_bonus() {
        let r = RewardShaping::default();
        assert_eq!(r.reward(&summary(0.5, 1.0)), 20.0);
        // At the limit is not over it.
        assert_eq!(r.reward(&summary(1.0, 1.0)), 20.0);
    }

    #[test]
    fn penalty_bands_escalate() {
        let r = RewardShaping::default();
        assert!((r.excess_penalty(0.25) - 5.0).abs() < 1e-12);
        assert!((r.excess_penalty(0.75) - 30.0).abs() < 1e-12);
        assert!((r.excess_penalty(2.0) - 120.0).abs() < 1e-12);
        assert!((r.reward(&summary(3.0, 1.0)) + 120.0).abs() < 1e-12);
    }

    #[test]
    fn sleep_bonus_requires_quiet_hour() {
        let r = RewardShaping::default();
        let mut s = summary(0.6, 1.0);
        s.in_sleep_window = true;
        assert_eq!(r.reward(&s), 30.0);
        s.consumption_kwh = 0.8;
        assert_eq!(r.reward(&s), 20.0);
    }

    #[test]
    fn device_bonuses_favor_priority() {
        let r = RewardShaping::default();
        let mut s = summary(0.0, 1.0);
        s.priority_on = 1;
        s.ordinary_on = 2;
        assert_eq!(r.reward(&s), 20.0 + 5.0 + 4.0);
    }

    #[test]
    fn cost_term_is_off_by_default() {
        let mut r = RewardShaping::default();
        let mut s = summary(0.0, 1.0);
        s.cost = 4.0;
        assert_eq!(r.reward(&s), 20.0);

        r.profile = UserProfile::Comfort;
        assert_eq!(r.reward(&s), 16.0);
        r.profile = UserProfile::Economy;
        assert_eq!(r.reward(&s), 18.0);
    }

    #[test]
    fn limit_is_fraction_of_rated_draw() {
        let r = RewardShaping::default();
        assert!((r.limit_kwh(3.0) - 1.5).abs() < 1e-12);
    }
}
