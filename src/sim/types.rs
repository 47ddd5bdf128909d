//! Step and trace records produced by the environment and the agent.

use std::fmt;

/// Result of executing one joint action for one hour.
#[derive(Debug, Clone, PartialEq)]
pub struct StepOutcome {
    /// Shaped reward for the hour.
    pub reward: f64,
    /// Energy drawn during the hour (kWh).
    pub consumption_kwh: f64,
    /// Energy cost at the hour's unit price.
    pub cost: f64,
    /// Hour after advancing, in `[0, max_hours)`.
    pub hour: usize,
    /// `true` exactly when `hour` wrapped back to 0.
    pub done: bool,
}

/// One row of a simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct HourRecord {
    /// Hour at which the action was applied.
    pub hour: usize,
    /// Encoded joint action chosen (or supplied) for the hour.
    pub action: usize,
    /// Commanded on/off bit per device, in registry order.
    pub bits: Vec<u8>,
    pub consumption_kwh: f64,
    /// Running total including this hour.
    pub cumulative_kwh: f64,
    pub reward: f64,
    pub cost: f64,
}

impl fmt::Display for HourRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits: String = self.bits.iter().map(|b| char::from(b'0' + b)).collect();
        write!(
            f,
            "h={:>2} | action={:>4} [{}] | {:>6.3} kWh (cum {:>7.3}) | cost={:.3} reward={:>7.2}",
            self.hour,
            self.action,
            bits,
            self.consumption_kwh,
            self.cumulative_kwh,
            self.cost,
            self.reward,
        )
    }
}

/// Full trace of one simulated day without learning.
#[derive(Debug, Clone, Default)]
pub struct SimulationTrace {
    /// Energy drawn over the whole day (kWh).
    pub total_consumption_kwh: f64,
    pub hours: Vec<HourRecord>,
    /// Applied on/off state per device and hour, in registry order.
    ///
    /// This is the state after priority and sleep rules, which may differ
    /// from the commanded bits in `hours`.
    pub device_states: Vec<(String, Vec<u8>)>,
}

impl SimulationTrace {
    pub fn total_cost(&self) -> f64 {
        self.hours.iter().map(|h| h.cost).sum()
    }

    pub fn total_reward(&self) -> f64 {
        self.hours.iter().map(|h| h.reward).sum()
    }
}
