/// Cyclic hour cursor.
pub mod clock;
pub mod environment;
pub mod kpi;
/// Hour-indexed energy prices.
pub mod pricing;
pub mod reward;
/// Sleep-window rule for ordinary appliances.
pub mod sleep;
pub mod types;

pub use environment::Environment;
