//! Shared test fixtures for integration tests.

#![allow(dead_code)]

use home_energy_rl::agent::{AgentParams, QLearningAgent};
use home_energy_rl::devices::DeviceSpec;
use home_energy_rl::sim::Environment;

/// Tolerance for floating-point comparisons of kWh and reward sums.
pub const EPS: f64 = 1e-9;

/// One fridge (150 W) and two lamps (100 W each).
pub fn fridge_and_lamps() -> Vec<DeviceSpec> {
    vec![
        DeviceSpec::new("fridge", 150.0, 1),
        DeviceSpec::new("lamp", 100.0, 2),
    ]
}

/// Default 24-hour environment with [`fridge_and_lamps`] registered.
pub fn default_environment() -> Environment {
    let mut env = Environment::default();
    env.register_devices(&fridge_and_lamps())
        .expect("fixture specs are valid");
    env
}

/// Agent over `env` with default parameters and the given seed.
pub fn agent_with_seed(env: Environment, seed: u64) -> QLearningAgent {
    let params = AgentParams {
        seed,
        ..AgentParams::default()
    };
    QLearningAgent::new(env, params, None).expect("fixture action space is small")
}

/// Unique path under the system temp directory.
pub fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("home_energy_rl_{}_{name}", std::process::id()))
}
