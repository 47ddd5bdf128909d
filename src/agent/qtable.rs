//! Dense `(hour, action)` value table.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Row-major table of action values, one row per hour.
///
/// The shape is fixed at construction; a different device count needs a new
/// table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QTable {
    rows: usize,
    cols: usize,
    values: Vec<f64>,
}

impl QTable {
    /// Zero-filled table of shape `(rows, cols)`.
    pub fn zeros(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            values: vec![0.0; rows * cols],
        }
    }

    /// Builds a table from nested rows.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] if the rows have different lengths.
    pub fn from_rows(rows: Vec<Vec<f64>>) -> Result<Self> {
        let cols = rows.first().map_or(0, Vec::len);
        if let Some((i, r)) = rows.iter().enumerate().find(|(_, r)| r.len() != cols) {
            return Err(Error::Serialization(format!(
                "row {i} has {} values, expected {cols}",
                r.len()
            )));
        }
        let n = rows.len();
        Ok(Self {
            rows: n,
            cols,
            values: rows.into_iter().flatten().collect(),
        })
    }

    /// Checks that the flat storage agrees with the declared shape.
    ///
    /// Tables built in this crate always pass; deserialized ones may not.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Serialization`] when the value count is wrong.
    pub fn validate(&self) -> Result<()> {
        let Some(expected) = self.rows.checked_mul(self.cols) else {
            return Err(Error::Serialization(format!(
                "table shape {}x{} is too large",
                self.rows, self.cols
            )));
        };
        if self.values.len() != expected {
            return Err(Error::Serialization(format!(
                "table declares {}x{} but holds {} values",
                self.rows,
                self.cols,
                self.values.len()
            )));
        }
        Ok(())
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// Ensures the shape equals `expected`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TableShapeMismatch`] otherwise.
    pub fn check_shape(&self, expected: (usize, usize)) -> Result<()> {
        if self.shape() != expected {
            return Err(Error::TableShapeMismatch {
                expected,
                actual: self.shape(),
            });
        }
        Ok(())
    }

    /// Value at `(state, action)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn get(&self, state: usize, action: usize) -> f64 {
        self.values[self.index(state, action)]
    }

    /// Sets the value at `(state, action)`.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of range.
    pub fn set(&mut self, state: usize, action: usize, value: f64) {
        let i = self.index(state, action);
        self.values[i] = value;
    }

    /// All action values for `state`.
    pub fn row(&self, state: usize) -> &[f64] {
        let start = state * self.cols;
        &self.values[start..start + self.cols]
    }

    /// Index of the largest value in `state`'s row, lowest index on ties.
    pub fn argmax(&self, state: usize) -> usize {
        let row = self.row(state);
        let mut best = 0;
        for (i, &v) in row.iter().enumerate().skip(1) {
            if v > row[best] {
                best = i;
            }
        }
        best
    }

    /// Largest value in `state`'s row (0.0 for an empty row).
    pub fn max(&self, state: usize) -> f64 {
        self.row(state)
            .iter()
            .copied()
            .reduce(f64::max)
            .unwrap_or(0.0)
    }

    /// Rows as nested vectors.
    pub fn to_rows(&self) -> Vec<Vec<f64>> {
        (0..self.rows).map(|s| self.row(s).to_vec()).collect()
    }

    fn index(&self, state: usize, action: usize) -> usize {
        assert!(
            state < self.rows && action < self.cols,
            "index ({state}, {action}) out of range for {}x{} table",
            self.rows,
            self.cols
        );
        state * self.cols + action
    }
}

/// Tab-separated rows with two decimals.
impl fmt::Display for QTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for state in 0..self.rows {
            let line: Vec<String> = self.row(state).iter().map(|q| format!("{q:.2}")).collect();
            writeln!(f, "{}", line.join("\t"))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zeros_has_requested_shape() {
        let q = QTable::zeros(24, 8);
        assert_eq!(q.shape(), (24, 8));
        assert!(q.row(23).iter().all(|&v| v == 0.0));
        assert!(q.validate().is_ok());
    }

    #[test]
    fn argmax_breaks_ties_low() {
        let q = QTable::from_rows(vec![vec![1.0, 3.0, 3.0, 2.0], vec![0.0; 4]]).expect("rectangular");
        assert_eq!(q.argmax(0), 1);
        assert_eq!(q.argmax(1), 0);
        assert_eq!(q.max(0), 3.0);
    }

    #[test]
    fn negative_rows_pick_least_negative() {
        let q = QTable::from_rows(vec![vec![-5.0, -1.0, -3.0]]).expect("rectangular");
        assert_eq!(q.argmax(0), 1);
        assert_eq!(q.max(0), -1.0);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        assert!(QTable::from_rows(vec![vec![1.0, 2.0], vec![1.0]]).is_err());
    }

    #[test]
    fn check_shape_reports_both_shapes() {
        let q = QTable::zeros(24, 4);
        assert!(q.check_shape((24, 4)).is_ok());
        assert!(matches!(
            q.check_shape((24, 8)),
            Err(Error::TableShapeMismatch {
                expected: (24, 8),
                actual: (24, 4)
            })
        ));
    }

    #[test]
    fn rows_round_trip() {
        let rows = vec![vec![1.0, 2.0], vec![3.0, 4.0]];
        let mut q = QTable::from_rows(rows.clone()).expect("rectangular");
        assert_eq!(q.to_rows(), rows);
        q.set(1, 1, 9.0);
        assert_eq!(q.get(1, 1), 9.0);
        assert_eq!(q.get(1, 0), 3.0);
    }

    #[test]
    fn display_is_tab_separated() {
        let q = QTable::from_rows(vec![vec![1.0, 2.5]]).expect("rectangular");
        assert_eq!(format!("{q}"), "1.00\t2.50\n");
    }

    #[test]
    #[should_panic]
    fn out_of_range_get_panics() {
        QTable::zeros(2, 2).get(2, 0);
    }
}
