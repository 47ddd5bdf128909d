//! Household hourly energy environment and a tabular Q-learning scheduler.

/// Q-learning agent, action encoding and value table.
pub mod agent;
pub mod cli;
pub mod config;
pub mod devices;
pub mod error;
pub mod io;
pub mod runner;
/// Environment, clock, pricing, reward and reports.
pub mod sim;

pub use error::{Error, Result};
