//! Common types for household appliances.

use serde::{Deserialize, Serialize};

/// Watts to kilowatts. One simulated step is one hour, so the result is also
/// the energy drawn in kWh for that step.
pub const WATTS_PER_KW: f64 = 1000.0;

/// A registration request: `quantity` instances of an appliance called `name`.
///
/// Deserialized from `[[devices]]` tables in scenario files.
///
/// # Examples
///
/// ```
/// use home_energy_rl::devices::DeviceSpec;
///
/// let spec = DeviceSpec::new("lamp", 100.0, 2);
/// assert_eq!(spec.quantity, 2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DeviceSpec {
    /// Base name shared by every instance (e.g. `"lamp"`).
    pub name: String,
    /// Rated power draw of one instance in watts (must be > 0).
    pub power_w: f64,
    /// Number of instances to register (must be > 0, defaults to 1).
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

impl DeviceSpec {
    /// Creates a new registration request.
    pub fn new(name: impl Into<String>, power_w: f64, quantity: u32) -> Self {
        Self {
            name: name.into(),
            power_w,
            quantity,
        }
    }
}

/// A single appliance instance tracked by the environment.
///
/// `name` is unique within a registry. `on` is the state applied during the
/// most recent step (or reset).
#[derive(Debug, Clone, PartialEq)]
pub struct Device {
    /// Unique instance name (`<base>_<index>`, index starting at 1).
    pub name: String,
    /// Rated power draw in watts.
    pub power_w: f64,
    /// Whether the device is currently switched on.
    pub on: bool,
    /// Whether the device follows the fixed priority schedule.
    pub priority: bool,
}

impl Device {
    /// Creates a powered-off device.
    pub fn new(name: impl Into<String>, power_w: f64, priority: bool) -> Self {
        Self {
            name: name.into(),
            power_w,
            on: false,
            priority,
        }
    }

    /// Rated draw in kW.
    pub fn rated_kw(&self) -> f64 {
        self.power_w / WATTS_PER_KW
    }

    /// Energy drawn over one hour in kWh given the current state.
    pub fn consumption_kwh(&self) -> f64 {
        if self.on { self.rated_kw() } else { 0.0 }
    }

    /// The state as an action bit.
    pub fn state_bit(&self) -> u8 {
        u8::from(self.on)
    }
}
