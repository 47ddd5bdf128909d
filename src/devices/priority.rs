/// Identifies refrigerator-class appliances and drives their fixed schedule.
///
/// A device is a priority device when its unique name contains one of
/// `tokens` (case-insensitive). Priority devices ignore the policy and run
/// on hours where `hour % period == 0`.
#[derive(Debug, Clone, PartialEq)]
pub struct PriorityRule {
    tokens: Vec<String>,
    period: usize,
}

/// Name fragments treated as priority appliances when none are configured.
pub const DEFAULT_PRIORITY_TOKENS: &[&str] =
    &["fridge", "refrigerator", "freezer", "minibar", "geladeira", "frigobar"];

/// Default duty-cycle period in hours.
pub const DEFAULT_PRIORITY_PERIOD: usize = 3;

impl PriorityRule {
    /// Creates a rule from name tokens and a duty-cycle period.
    ///
    /// A `period` of zero is treated as one (always on).
    pub fn new<I, S>(tokens: I, period: usize) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|t| t.as_ref().to_lowercase())
                .filter(|t| !t.is_empty())
                .collect(),
            period: period.max(1),
        }
    }

    /// A rule that never matches.
    pub fn none() -> Self {
        Self {
            tokens: Vec::new(),
            period: 1,
        }
    }

    /// Returns `true` if `name` denotes a priority appliance.
    pub fn matches(&self, name: &str) -> bool {
        let lower = name.to_lowercase();
        self.tokens.iter().any(|t| lower.contains(t.as_str()))
    }

    /// Scheduled state of a priority device at `hour`.
    pub fn scheduled_on(&self, hour: usize) -> bool {
        hour % self.period == 0
    }

    /// Duty-cycle period in hours.
    pub fn period(&self) -> usize {
        self.period
    }
}

impl Default for PriorityRule {
    fn default() -> Self {
        Self::new(DEFAULT_PRIORITY_TOKENS, DEFAULT_PRIORITY_PERIOD)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn matching_is_case_insensitive_substring() {
        let rule = PriorityRule::default();
        assert!(rule.matches("Fridge_1"));
        assert!(rule.matches("kitchen_freezer_2"));
        assert!(!rule.matches("lamp_1"));
    }

    #[test]
    fn schedule_follows_period() {
        let rule = PriorityRule::new(["fridge"], 3);
        let on: Vec<usize> = (0..10).filter(|&h| rule.scheduled_on(h)).collect();
        assert_eq!(on, vec![0, 3, 6, 9]);
    }

    #[test]
    fn zero_period_is_always_on() {
        let rule = PriorityRule::new(["fridge"], 0);
        assert_eq!(rule.period(), 1);
        assert!((0..24).all(|h| rule.scheduled_on(h)));
    }

    #[test]
    fn none_matches_nothing() {
        assert!(!PriorityRule::none().matches("fridge_1"));
    }
}
