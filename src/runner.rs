//! Scenario driver: builds an agent from a config, trains it, then plays one day.

use tracing::info;

use crate::agent::{ProgressSink, QLearningAgent, QTable, TrainingOutcome};
use crate::config::ScenarioConfig;
use crate::error::Result;
use crate::sim::kpi::{SimulationReport, TrainingReport};
use crate::sim::types::SimulationTrace;

/// Trailing window for the training report means.
pub const REPORT_WINDOW: usize = 100;

pub struct ScenarioRun {
    pub training: TrainingOutcome,
    pub trace: SimulationTrace,
    pub training_report: TrainingReport,
    pub simulation_report: SimulationReport,
}

/// Trains on `config` and simulates one day with the learned table.
///
/// `table`, when given, seeds the agent with values from an earlier run.
/// The agent is returned alongside the results so callers can keep training
/// or persist its table.
///
/// # Errors
///
/// Propagates any environment, action-space or table-shape error.
pub fn run_scenario(
    config: &ScenarioConfig,
    table: Option<QTable>,
    sink: &mut dyn ProgressSink,
) -> Result<(QLearningAgent, ScenarioRun)> {
    let mut agent = config.build_agent(table)?;
    info!(
        devices = agent.num_devices(),
        max_hours = agent.env().max_hours(),
        "scenario ready"
    );

    let training = agent.train(config.agent.episodes, config.agent.speed_factor, sink)?;
    let trace = agent.simulate_day(None)?;

    let training_report = TrainingReport::from_episodes(
        &training.episode_rewards,
        &training.episode_consumptions,
        REPORT_WINDOW,
    );
    let simulation_report = SimulationReport::from_trace(&trace);

    Ok((
        agent,
        ScenarioRun {
            training,
            trace,
            training_report,
            simulation_report,
        },
    ))
}
