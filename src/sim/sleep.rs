/// Hours during which ordinary appliances are forced off.
///
/// The window is half-open, `[sleep_hour, wake_hour)`, and wraps past
/// midnight when `sleep_hour > wake_hour` (the usual 22 → 6 case). Equal
/// bounds describe an empty window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SleepWindow {
    /// First hour of the window (inclusive).
    pub sleep_hour: usize,
    /// First hour after the window (exclusive).
    pub wake_hour: usize,
}

impl SleepWindow {
    pub fn new(sleep_hour: usize, wake_hour: usize) -> Self {
        Self {
            sleep_hour,
            wake_hour,
        }
    }

    /// A window that contains no hour.
    pub fn disabled() -> Self {
        Self::new(0, 0)
    }

    /// Returns `true` when `hour` falls inside the window.
    pub fn contains(&self, hour: usize) -> bool {
        if self.sleep_hour <= self.wake_hour {
            hour >= self.sleep_hour && hour < self.wake_hour
        } else {
            hour >= self.sleep_hour || hour < self.wake_hour
        }
    }
}

impl Default for SleepWindow {
    fn default() -> Self {
        Self::new(22, 6)
    }
}

#[cfg(test)]
mod tests {
    use super::SleepWindow;

    #[test]
    fn default_window_wraps_midnight() {
        let w = SleepWindow::default();
        let inside: Vec<usize> = (0..24).filter(|&h| w.contains(h)).collect();
        assert_eq!(inside, vec![0, 1, 2, 3, 4, 5, 22, 23]);
    }

    #[test]
    fn daytime_window_does_not_wrap() {
        let w = SleepWindow::new(13, 15);
        assert!(!w.contains(12));
        assert!(w.contains(13));
        assert!(w.contains(14));
        assert!(!w.contains(15));
    }

    #[test]
    fn disabled_window_is_empty() {
        let w = SleepWindow::disabled();
        assert!((0..24).all(|h| !w.contains(h)));
    }
}
