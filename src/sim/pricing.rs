/// Hour-indexed unit energy price.
///
/// Lookups wrap modulo the table length, so a 24-entry table serves any hour.
#[derive(Debug, Clone, PartialEq)]
pub struct PriceSchedule {
    prices: Vec<f64>,
}

impl PriceSchedule {
    /// Creates a schedule from explicit per-hour prices.
    pub fn from_prices(prices: Vec<f64>) -> Self {
        Self { prices }
    }

    /// Flat `off_peak` price with `peak` applied on hours in `[peak_start, peak_end)`.
    ///
    /// The window wraps past midnight when `peak_start > peak_end`.
    pub fn time_of_use(
        max_hours: usize,
        off_peak: f64,
        peak: f64,
        peak_start: usize,
        peak_end: usize,
    ) -> Self {
        let prices = (0..max_hours)
            .map(|h| {
                let in_peak = if peak_start <= peak_end {
                    h >= peak_start && h < peak_end
                } else {
                    h >= peak_start || h < peak_end
                };
                if in_peak { peak } else { off_peak }
            })
            .collect();
        Self { prices }
    }

    /// Price at `hour`, or 0.0 for an empty schedule.
    pub fn price_at(&self, hour: usize) -> f64 {
        if self.prices.is_empty() {
            return 0.0;
        }
        self.prices[hour % self.prices.len()]
    }

    pub fn prices(&self) -> &[f64] {
        &self.prices
    }
}

impl Default for PriceSchedule {
    fn default() -> Self {
        Self::time_of_use(24, 0.2, 0.5, 12, 18)
    }
}
