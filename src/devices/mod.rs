//! Household appliance models and the ordered registry that holds them.

/// Priority (refrigerator-class) appliance detection and schedule.
pub mod priority;
pub mod registry;
pub mod types;

// Re-export the main types for convenience
pub use priority::PriorityRule;
pub use registry::DeviceRegistry;
pub use types::Device;
pub use types::DeviceSpec;
