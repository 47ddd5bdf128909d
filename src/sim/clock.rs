/// A cyclic hour cursor for one simulated day.
///
/// The hour always lies in `[0, max_hours)`. Advancing past the last hour
/// wraps back to 0, which marks the end of an episode.
///
/// # Examples
///
/// ```
/// use home_energy_rl::sim::clock::HourClock;
///
/// let mut clock = HourClock::new(3);
/// assert_eq!(clock.advance(), (1, false));
/// assert_eq!(clock.advance(), (2, false));
/// assert_eq!(clock.advance(), (0, true));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HourClock {
    /// Current hour of the day
    hour: usize,
    /// Number of hours in one cycle
    max_hours: usize,
}

impl HourClock {
    /// Creates a clock at hour 0.
    ///
    /// # Arguments
    ///
    /// * `max_hours` - Cycle length; zero is treated as one
    pub fn new(max_hours: usize) -> Self {
        Self {
            hour: 0,
            max_hours: max_hours.max(1),
        }
    }

    /// Current hour.
    pub fn hour(&self) -> usize {
        self.hour
    }

    /// Cycle length.
    pub fn max_hours(&self) -> usize {
        self.max_hours
    }

    /// Moves the clock back to hour 0.
    pub fn reset(&mut self) {
        self.hour = 0;
    }

    /// Advances one hour.
    ///
    /// # Returns
    ///
    /// `(new_hour, wrapped)` where `wrapped` is `true` exactly when the new
    /// hour is 0.
    pub fn advance(&mut self) -> (usize, bool) {
        self.hour = (self.hour + 1) % self.max_hours;
        (self.hour, self.hour == 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = HourClock::new(24);
        assert_eq!(clock.hour(), 0);
        assert_eq!(clock.max_hours(), 24);
    }

    #[test]
    fn test_wraps_once_per_cycle() {
        let mut clock = HourClock::new(24);
        let wraps: Vec<usize> = (1..=48)
            .filter(|_| clock.advance().1)
            .collect();
        assert_eq!(wraps, vec![24, 48]);
    }

    #[test]
    fn test_reset() {
        let mut clock = HourClock::new(5);
        clock.advance();
        clock.advance();
        clock.reset();
        assert_eq!(clock.hour(), 0);
    }

    #[test]
    fn test_zero_length_clock() {
        let mut clock = HourClock::new(0);
        assert_eq!(clock.max_hours(), 1);
        assert_eq!(clock.advance(), (0, true));
    }
}
