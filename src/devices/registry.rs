//! Insertion-ordered device registry.
//!
//! A device's position in the registry is its bit position in an encoded
//! joint action, so the registry is a `Vec` and never reorders entries.

use tracing::debug;

use crate::error::{Error, Result};

use super::priority::PriorityRule;
use super::types::{Device, DeviceSpec};

/// Ordered collection of uniquely named devices.
#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    devices: Vec<Device>,
}

impl DeviceRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Expands each spec into `quantity` powered-off devices named
    /// `<name>_<i>`.
    ///
    /// Numbering continues after the highest index already registered for the
    /// same base name, so repeated registrations never collide. Every spec is
    /// validated before the registry is touched.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidDeviceSpec`] if any spec has an empty name, a
    /// non-positive or non-finite power draw, or a zero quantity.
    pub fn register(&mut self, specs: &[DeviceSpec], priority: &PriorityRule) -> Result<usize> {
        for spec in specs {
            validate_spec(spec)?;
        }

        let mut staged: Vec<Device> = Vec::new();
        for spec in specs {
            let base = spec.name.trim();
            let start = self
                .devices
                .iter()
                .chain(staged.iter())
                .filter_map(|d| instance_index(&d.name, base))
                .max()
                .unwrap_or(0);
            for i in 1..=spec.quantity as usize {
                let name = format!("{base}_{}", start + i);
                let is_priority = priority.matches(&name);
                debug!(device = %name, power_w = spec.power_w, priority = is_priority, "registered device");
                staged.push(Device::new(name, spec.power_w, is_priority));
            }
        }

        let added = staged.len();
        self.devices.extend(staged);
        Ok(added)
    }

    /// Removes every device whose name contains `token`.
    ///
    /// Returns the removed names in registry order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if `token` is empty or matches nothing.
    pub fn remove_matching(&mut self, token: &str) -> Result<Vec<String>> {
        if token.is_empty() || !self.devices.iter().any(|d| d.name.contains(token)) {
            return Err(Error::NotFound(token.to_string()));
        }

        let mut removed = Vec::new();
        self.devices.retain(|d| {
            if d.name.contains(token) {
                removed.push(d.name.clone());
                false
            } else {
                true
            }
        });
        debug!(token, count = removed.len(), "removed devices");
        Ok(removed)
    }

    /// Re-evaluates the priority flag of every device against `rule`.
    pub fn apply_priority(&mut self, rule: &PriorityRule) {
        for d in &mut self.devices {
            d.priority = rule.matches(&d.name);
        }
    }

    pub fn len(&self) -> usize {
        self.devices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.devices.is_empty()
    }

    /// Devices in bit order.
    pub fn iter(&self) -> impl Iterator<Item = &Device> {
        self.devices.iter()
    }

    pub(crate) fn iter_mut(&mut self) -> impl Iterator<Item = &mut Device> {
        self.devices.iter_mut()
    }

    /// Looks a device up by its unique name.
    pub fn get(&self, name: &str) -> Option<&Device> {
        self.devices.iter().find(|d| d.name == name)
    }

    /// Unique names in bit order.
    pub fn names(&self) -> Vec<String> {
        self.devices.iter().map(|d| d.name.clone()).collect()
    }

    /// Sum of all rated draws in kW, regardless of state.
    pub fn rated_kw_total(&self) -> f64 {
        self.devices.iter().map(Device::rated_kw).sum()
    }

    /// Current on/off state of every device as action bits.
    pub fn state_bits(&self) -> Vec<u8> {
        self.devices.iter().map(Device::state_bit).collect()
    }
}

fn validate_spec(spec: &DeviceSpec) -> Result<()> {
    if spec.name.trim().is_empty() {
        return Err(Error::InvalidDeviceSpec("device name must not be empty".into()));
    }
    if !spec.power_w.is_finite() || spec.power_w <= 0.0 {
        return Err(Error::InvalidDeviceSpec(format!(
            "{}: power draw must be > 0 W, got {}",
            spec.name, spec.power_w
        )));
    }
    if spec.quantity == 0 {
        return Err(Error::InvalidDeviceSpec(format!(
            "{}: quantity must be > 0",
            spec.name
        )));
    }
    Ok(())
}

/// Parses the instance index of `name` if it is `<base>_<n>`.
fn instance_index(name: &str, base: &str) -> Option<usize> {
    name.strip_prefix(base)?.strip_prefix('_')?.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule() -> PriorityRule {
        PriorityRule::default()
    }

    #[test]
    fn expands_quantity_into_unique_names() {
        let mut reg = DeviceRegistry::new();
        let added = reg
            .register(&[DeviceSpec::new("lamp", 100.0, 2)], &rule())
            .expect("valid spec");
        assert_eq!(added, 2);
        assert_eq!(reg.names(), vec!["lamp_1", "lamp_2"]);
        for d in reg.iter() {
            assert_eq!(d.power_w, 100.0);
            assert!(!d.on);
        }
    }

    #[test]
    fn preserves_insertion_order() {
        let mut reg = DeviceRegistry::new();
        reg.register(
            &[
                DeviceSpec::new("tv", 150.0, 1),
                DeviceSpec::new("fridge", 200.0, 1),
                DeviceSpec::new("lamp", 60.0, 2),
            ],
            &rule(),
        )
        .expect("valid specs");
        assert_eq!(reg.names(), vec!["tv_1", "fridge_1", "lamp_1", "lamp_2"]);
        assert!(reg.get("fridge_1").is_some_and(|d| d.priority));
        assert!(reg.get("tv_1").is_some_and(|d| !d.priority));
    }

    #[test]
    fn repeated_registration_continues_numbering() {
        let mut reg = DeviceRegistry::new();
        reg.register(&[DeviceSpec::new("lamp", 60.0, 2)], &rule())
            .expect("first batch");
        reg.register(&[DeviceSpec::new("lamp", 60.0, 1)], &rule())
            .expect("second batch");
        assert_eq!(reg.names(), vec!["lamp_1", "lamp_2", "lamp_3"]);
    }

    #[test]
    fn invalid_spec_leaves_registry_untouched() {
        let mut reg = DeviceRegistry::new();
        let err = reg.register(
            &[DeviceSpec::new("lamp", 60.0, 2), DeviceSpec::new("heater", 0.0, 1)],
            &rule(),
        );
        assert!(matches!(err, Err(Error::InvalidDeviceSpec(_))));
        assert!(reg.is_empty());

        let err = reg.register(&[DeviceSpec::new("lamp", 60.0, 0)], &rule());
        assert!(matches!(err, Err(Error::InvalidDeviceSpec(_))));
        let err = reg.register(&[DeviceSpec::new("  ", 60.0, 1)], &rule());
        assert!(matches!(err, Err(Error::InvalidDeviceSpec(_))));
        let err = reg.register(&[DeviceSpec::new("lamp", f64::NAN, 1)], &rule());
        assert!(matches!(err, Err(Error::InvalidDeviceSpec(_))));
        assert!(reg.is_empty());
    }

    #[test]
    fn remove_matching_drops_all_instances() {
        let mut reg = DeviceRegistry::new();
        reg.register(
            &[DeviceSpec::new("lamp", 60.0, 3), DeviceSpec::new("tv", 150.0, 1)],
            &rule(),
        )
        .expect("valid specs");
        let removed = reg.remove_matching("lamp").expect("lamps exist");
        assert_eq!(removed, vec!["lamp_1", "lamp_2", "lamp_3"]);
        assert_eq!(reg.names(), vec!["tv_1"]);
    }

    #[test]
    fn remove_unknown_is_not_found() {
        let mut reg = DeviceRegistry::new();
        reg.register(&[DeviceSpec::new("tv", 150.0, 1)], &rule())
            .expect("valid spec");
        assert!(matches!(reg.remove_matching("oven"), Err(Error::NotFound(_))));
        assert!(matches!(reg.remove_matching(""), Err(Error::NotFound(_))));
        assert_eq!(reg.len(), 1);
    }

    #[test]
    fn rated_total_is_in_kw() {
        let mut reg = DeviceRegistry::new();
        reg.register(
            &[DeviceSpec::new("lamp", 100.0, 2), DeviceSpec::new("oven", 2000.0, 1)],
            &rule(),
        )
        .expect("valid specs");
        assert!((reg.rated_kw_total() - 2.2).abs() < 1e-12);
    }
}
