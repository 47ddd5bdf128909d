/// Joint-action encoding.
pub mod action;
pub mod learner;
pub mod progress;
pub mod qtable;

pub use action::{ActionCodec, MAX_ACTIONS};
pub use learner::{AgentParams, MAX_EPISODES, QLearningAgent, TrainingOutcome, scaled_episodes};
pub use progress::{EpisodeSummary, ProgressSink};
pub use qtable::QTable;
