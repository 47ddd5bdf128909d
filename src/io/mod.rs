/// CSV export of simulated days and training curves.
pub mod export;
/// Value-table persistence.
pub mod qtable;
