//! Post-hoc summaries of training runs and simulated days.

use std::fmt;

use super::types::SimulationTrace;

/// Aggregate indicators over the per-episode totals of a training run.
#[derive(Debug, Clone, PartialEq)]
pub struct TrainingReport {
    /// Number of episodes run.
    pub episodes: usize,
    pub first_reward: f64,
    pub last_reward: f64,
    /// Highest episode reward and its index.
    pub best_reward: f64,
    pub best_episode: usize,
    /// Mean reward over the trailing window.
    pub trailing_mean_reward: f64,
    /// Mean consumption (kWh per day) over the trailing window.
    pub trailing_mean_consumption_kwh: f64,
    /// Window length used for the trailing means.
    pub window: usize,
}

impl TrainingReport {
    /// Computes the report from per-episode totals.
    ///
    /// # Arguments
    ///
    /// * `rewards` - Total reward per episode
    /// * `consumptions` - Total consumption per episode (kWh)
    /// * `window` - Trailing window for the means (clamped to the run length)
    pub fn from_episodes(rewards: &[f64], consumptions: &[f64], window: usize) -> Self {
        if rewards.is_empty() {
            return Self {
                episodes: 0,
                first_reward: 0.0,
                last_reward: 0.0,
                best_reward: 0.0,
                best_episode: 0,
                trailing_mean_reward: 0.0,
                trailing_mean_consumption_kwh: 0.0,
                window: 0,
            };
        }

        let n = rewards.len();
        let window = window.clamp(1, n);
        let (best_episode, best_reward) = rewards
            .iter()
            .copied()
            .enumerate()
            .fold((0, f64::NEG_INFINITY), |best, (i, r)| {
                if r > best.1 { (i, r) } else { best }
            });

        let tail_rewards = &rewards[n - window..];
        let tail_consumption = &consumptions[consumptions.len().saturating_sub(window)..];
        let mean = |xs: &[f64]| {
            if xs.is_empty() {
                0.0
            } else {
                xs.iter().sum::<f64>() / xs.len() as f64
            }
        };

        Self {
            episodes: n,
            first_reward: rewards[0],
            last_reward: rewards[n - 1],
            best_reward,
            best_episode,
            trailing_mean_reward: mean(tail_rewards),
            trailing_mean_consumption_kwh: mean(tail_consumption),
            window,
        }
    }
}

impl fmt::Display for TrainingReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Training Report ---")?;
        writeln!(f, "Episodes:              {}", self.episodes)?;
        writeln!(f, "First episode reward:  {:.2}", self.first_reward)?;
        writeln!(f, "Last episode reward:   {:.2}", self.last_reward)?;
        writeln!(
            f,
            "Best episode reward:   {:.2} (episode {})",
            self.best_reward, self.best_episode
        )?;
        writeln!(
            f,
            "Mean reward (last {}):  {:.2}",
            self.window, self.trailing_mean_reward
        )?;
        write!(
            f,
            "Mean consumption:      {:.3} kWh/day",
            self.trailing_mean_consumption_kwh
        )
    }
}

/// Totals and peak of one simulated day.
#[derive(Debug, Clone, PartialEq)]
pub struct SimulationReport {
    pub total_consumption_kwh: f64,
    pub total_cost: f64,
    pub total_reward: f64,
    /// Hour with the largest consumption (earliest on ties).
    pub peak_hour: usize,
    pub peak_consumption_kwh: f64,
    /// Hours in which some device was on.
    pub active_hours: usize,
}

impl SimulationReport {
    pub fn from_trace(trace: &SimulationTrace) -> Self {
        let mut peak_hour = 0;
        let mut peak = 0.0_f64;
        let mut active_hours = 0;
        for h in &trace.hours {
            if h.consumption_kwh > peak {
                peak = h.consumption_kwh;
                peak_hour = h.hour;
            }
            if h.consumption_kwh > 0.0 {
                active_hours += 1;
            }
        }

        Self {
            total_consumption_kwh: trace.total_consumption_kwh,
            total_cost: trace.total_cost(),
            total_reward: trace.total_reward(),
            peak_hour,
            peak_consumption_kwh: peak,
            active_hours,
        }
    }
}

impl fmt::Display for SimulationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "--- Simulation Report ---")?;
        writeln!(f, "Total consumption:     {:.3} kWh", self.total_consumption_kwh)?;
        writeln!(f, "Total cost:            {:.3}", self.total_cost)?;
        writeln!(f, "Total reward:          {:.2}", self.total_reward)?;
        writeln!(
            f,
            "Peak hour:             {} ({:.3} kWh)",
            self.peak_hour, self.peak_consumption_kwh
        )?;
        write!(f, "Active hours:          {}", self.active_hours)
    }
}
