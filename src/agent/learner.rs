//! Tabular Q-learning agent driving an [`Environment`].

use rand::{Rng, SeedableRng, rngs::StdRng};
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::sim::Environment;
use crate::sim::types::{HourRecord, SimulationTrace};

use super::action::ActionCodec;
use super::progress::{EpisodeSummary, ProgressSink};
use super::qtable::QTable;

/// Upper bound on the episodes a single `train` call runs.
pub const MAX_EPISODES: usize = 100_000_000;

/// Episodes actually run for a nominal count: `ceil(num_episodes / speed_factor)`.
///
/// # Errors
///
/// Returns [`Error::InvalidParameter`] if `speed_factor` is not a positive
/// number or the scaled count exceeds [`MAX_EPISODES`].
pub fn scaled_episodes(num_episodes: usize, speed_factor: f64) -> Result<usize> {
    if !speed_factor.is_finite() || speed_factor <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "speed factor must be > 0, got {speed_factor}"
        )));
    }
    let scaled = (num_episodes as f64 / speed_factor).ceil();
    if !scaled.is_finite() || scaled > MAX_EPISODES as f64 {
        return Err(Error::InvalidParameter(format!(
            "{num_episodes} episodes at speed {speed_factor} exceed the limit of {MAX_EPISODES}"
        )));
    }
    Ok(scaled as usize)
}

/// Learning and exploration parameters.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentParams {
    /// Learning rate in `[0, 1]`.
    pub alpha: f64,
    /// Discount factor in `[0, 1]`.
    pub gamma: f64,
    /// Exploration probability in `[0, 1]`.
    pub epsilon: f64,
    /// Seed for the exploration RNG.
    pub seed: u64,
    /// Report every `progress_interval` episodes (0 disables reporting).
    pub progress_interval: usize,
}

impl Default for AgentParams {
    fn default() -> Self {
        Self {
            alpha: 0.1,
            gamma: 0.9,
            epsilon: 0.2,
            seed: 42,
            progress_interval: 100,
        }
    }
}

impl AgentParams {
    fn validate(&self) -> Result<()> {
        for (name, v) in [
            ("alpha", self.alpha),
            ("gamma", self.gamma),
            ("epsilon", self.epsilon),
        ] {
            if !(0.0..=1.0).contains(&v) {
                return Err(Error::InvalidParameter(format!(
                    "{name} must be in [0, 1], got {v}"
                )));
            }
        }
        Ok(())
    }
}

/// Per-episode totals of a training run and the table it produced.
#[derive(Debug, Clone)]
pub struct TrainingOutcome {
    pub episode_rewards: Vec<f64>,
    pub episode_consumptions: Vec<f64>,
    /// Snapshot of the value table after the last episode.
    pub q_table: QTable,
}

/// Epsilon-greedy tabular Q-learner.
///
/// The agent owns its environment. After adding or removing devices through
/// [`QLearningAgent::env_mut`], call [`QLearningAgent::sync_device_count`]
/// before training or simulating again.
pub struct QLearningAgent {
    env: Environment,
    params: AgentParams,
    codec: ActionCodec,
    table: QTable,
    rng: StdRng,
}

impl QLearningAgent {
    /// Creates an agent over `env`.
    ///
    /// `table` reuses values from an earlier session; `None` starts from a
    /// zero-filled table of shape `(max_hours, 2^devices)`.
    ///
    /// # Errors
    ///
    /// - [`Error::ActionSpaceTooLarge`] if the environment has too many devices
    /// - [`Error::TableShapeMismatch`] if `table` has the wrong shape
    /// - [`Error::InvalidParameter`] if a rate lies outside `[0, 1]`
    pub fn new(env: Environment, params: AgentParams, table: Option<QTable>) -> Result<Self> {
        params.validate()?;
        let codec = ActionCodec::new(env.num_devices())?;
        let expected = (env.max_hours(), codec.num_actions());
        let table = match table {
            Some(t) => {
                t.validate()?;
                t.check_shape(expected)?;
                t
            }
            None => QTable::zeros(expected.0, expected.1),
        };
        let rng = StdRng::seed_from_u64(params.seed);
        Ok(Self {
            env,
            params,
            codec,
            table,
            rng,
        })
    }

    /// Epsilon-greedy action for `state`.
    ///
    /// With probability `epsilon` returns a uniform index in
    /// `[0, num_actions)`; otherwise the greedy action. The RNG is not
    /// touched when `epsilon` is zero.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `state >= max_hours`; the RNG
    /// is not advanced in that case.
    pub fn choose_action(&mut self, state: usize) -> Result<usize> {
        self.check_state(state)?;
        if self.params.epsilon > 0.0 && self.rng.random::<f64>() < self.params.epsilon {
            Ok(self.rng.random_range(0..self.codec.num_actions()))
        } else {
            Ok(self.table.argmax(state))
        }
    }

    /// Highest-valued action for `state`, lowest index on ties.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `state >= max_hours`.
    pub fn greedy_action(&self, state: usize) -> Result<usize> {
        self.check_state(state)?;
        Ok(self.table.argmax(state))
    }

    /// See [`ActionCodec::encode`].
    pub fn encode_action(&self, bits: &[u8]) -> Result<usize> {
        self.codec.encode(bits)
    }

    /// See [`ActionCodec::decode`].
    pub fn decode_action(&self, action: usize) -> Result<Vec<u8>> {
        self.codec.decode(action)
    }

    /// One-step temporal-difference update:
    /// `Q[s,a] += alpha * (reward + gamma * max Q[s',.] - Q[s,a])`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if either state is `>= max_hours`
    /// - [`Error::InvalidAction`] if `action >= num_actions`
    ///
    /// The table is unchanged on error.
    pub fn update_value(
        &mut self,
        state: usize,
        action: usize,
        reward: f64,
        next_state: usize,
    ) -> Result<()> {
        self.check_state(state)?;
        self.check_state(next_state)?;
        if action >= self.table.shape().1 {
            return Err(Error::InvalidAction {
                action,
                num_actions: self.table.shape().1,
            });
        }
        let current = self.table.get(state, action);
        let target = reward + self.params.gamma * self.table.max(next_state);
        self.table
            .set(state, action, current + self.params.alpha * (target - current));
        Ok(())
    }

    /// Runs `ceil(num_episodes / speed_factor)` learning episodes.
    ///
    /// Each episode resets the environment and steps until the hour wraps,
    /// updating the table with the hour reached after each step as the next
    /// state. Calling `train` again continues from the current table.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidParameter`] if `speed_factor` is not a positive number
    ///   or the scaled episode count is over [`MAX_EPISODES`]
    /// - [`Error::ActionSizeMismatch`] if the device set changed without a
    ///   [`sync_device_count`](Self::sync_device_count)
    pub fn train(
        &mut self,
        num_episodes: usize,
        speed_factor: f64,
        sink: &mut dyn ProgressSink,
    ) -> Result<TrainingOutcome> {
        let episodes = scaled_episodes(num_episodes, speed_factor)?;
        self.ensure_synced()?;

        info!(
            episodes,
            devices = self.codec.num_devices(),
            actions = self.codec.num_actions(),
            "training started"
        );

        let mut rewards = Vec::new();
        let mut consumptions = Vec::new();
        for episode in 0..episodes {
            let mut state = self.env.reset();
            let mut total_reward = 0.0;
            let mut total_consumption = 0.0;

            loop {
                let action = self.choose_action(state)?;
                let bits = self.codec.decode(action)?;
                let outcome = self.env.step(&bits)?;
                let next_state = outcome.hour;
                self.update_value(state, action, outcome.reward, next_state)?;
                state = next_state;
                total_reward += outcome.reward;
                total_consumption += outcome.consumption_kwh;
                if outcome.done {
                    break;
                }
            }

            rewards.push(total_reward);
            consumptions.push(total_consumption);

            let interval = self.params.progress_interval;
            if interval > 0 && episode % interval == 0 {
                sink.episode_finished(&EpisodeSummary {
                    episode,
                    total_reward,
                    total_consumption_kwh: total_consumption,
                });
            }
        }

        info!(
            episodes,
            last_reward = rewards.last().copied().unwrap_or(0.0),
            "training finished"
        );
        Ok(TrainingOutcome {
            episode_rewards: rewards,
            episode_consumptions: consumptions,
            q_table: self.table.clone(),
        })
    }

    /// Plays one day (`max_hours` steps) without learning.
    ///
    /// `custom_actions[i]`, when present, replaces the policy's choice at
    /// step `i`; later steps fall back to [`choose_action`](Self::choose_action).
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidAction`] if a custom action is out of range
    /// - [`Error::ActionSizeMismatch`] if the device set changed without a
    ///   [`sync_device_count`](Self::sync_device_count)
    pub fn simulate_day(&mut self, custom_actions: Option<&[usize]>) -> Result<SimulationTrace> {
        self.ensure_synced()?;
        let custom = custom_actions.unwrap_or(&[]);
        if let Some(&bad) = custom.iter().find(|&&a| a >= self.codec.num_actions()) {
            return Err(Error::InvalidAction {
                action: bad,
                num_actions: self.codec.num_actions(),
            });
        }

        let mut state = self.env.reset();
        let mut device_states: Vec<(String, Vec<u8>)> = self
            .env
            .device_iter()
            .map(|d| (d.name.clone(), Vec::with_capacity(self.env.max_hours())))
            .collect();
        let mut hours = Vec::with_capacity(self.env.max_hours());
        let mut cumulative = 0.0;

        for step in 0..self.env.max_hours() {
            let action = match custom.get(step) {
                Some(&a) => a,
                None => self.choose_action(state)?,
            };
            let bits = self.codec.decode(action)?;
            let outcome = self.env.step(&bits)?;
            cumulative += outcome.consumption_kwh;

            for ((_, trace), d) in device_states.iter_mut().zip(self.env.device_iter()) {
                trace.push(d.state_bit());
            }
            hours.push(HourRecord {
                hour: state,
                action,
                bits,
                consumption_kwh: outcome.consumption_kwh,
                cumulative_kwh: cumulative,
                reward: outcome.reward,
                cost: outcome.cost,
            });
            state = outcome.hour;
        }

        debug!(total_kwh = cumulative, "simulated day");
        Ok(SimulationTrace {
            total_consumption_kwh: cumulative,
            hours,
            device_states,
        })
    }

    /// Recomputes the device and action counts after the device set changed.
    ///
    /// When the table shape no longer matches, it is replaced by a zero-filled
    /// table; learned values are discarded.
    ///
    /// # Returns
    ///
    /// `true` if the table was replaced.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ActionSpaceTooLarge`] if the new device count is over
    /// the limit; the agent is unchanged in that case.
    pub fn sync_device_count(&mut self) -> Result<bool> {
        let codec = ActionCodec::new(self.env.num_devices())?;
        self.codec = codec;
        let expected = (self.env.max_hours(), codec.num_actions());
        if self.table.shape() == expected {
            return Ok(false);
        }
        warn!(
            old = ?self.table.shape(),
            new = ?expected,
            "device set changed, value table reset"
        );
        self.table = QTable::zeros(expected.0, expected.1);
        Ok(true)
    }

    /// Replaces the value table with one from an earlier session.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShapeMismatch`] (or [`Error::Serialization`] for
    /// a malformed table) and keeps the current table.
    pub fn load_q_table(&mut self, table: QTable) -> Result<()> {
        table.validate()?;
        table.check_shape(self.expected_shape())?;
        debug!(shape = ?table.shape(), "value table loaded");
        self.table = table;
        Ok(())
    }

    /// Shape the value table must have for the current environment.
    pub fn expected_shape(&self) -> (usize, usize) {
        (self.env.max_hours(), self.codec.num_actions())
    }

    pub fn q_table(&self) -> &QTable {
        &self.table
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Mutable environment access for device changes.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    pub fn params(&self) -> &AgentParams {
        &self.params
    }

    /// Changes the exploration rate, e.g. to 0 for greedy playback.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidParameter`] if `epsilon` is outside `[0, 1]`.
    pub fn set_epsilon(&mut self, epsilon: f64) -> Result<()> {
        if !(0.0..=1.0).contains(&epsilon) {
            return Err(Error::InvalidParameter(format!(
                "epsilon must be in [0, 1], got {epsilon}"
            )));
        }
        self.params.epsilon = epsilon;
        Ok(())
    }

    pub fn num_devices(&self) -> usize {
        self.codec.num_devices()
    }

    pub fn num_actions(&self) -> usize {
        self.codec.num_actions()
    }

    fn check_state(&self, state: usize) -> Result<()> {
        let hours = self.table.shape().0;
        if state >= hours {
            return Err(Error::InvalidParameter(format!(
                "state {state} is out of range for {hours} hours"
            )));
        }
        Ok(())
    }

    fn ensure_synced(&self) -> Result<()> {
        if self.codec.num_devices() != self.env.num_devices() {
            return Err(Error::ActionSizeMismatch {
                expected: self.env.num_devices(),
                actual: self.codec.num_devices(),
            });
        }
        Ok(())
    }
}
