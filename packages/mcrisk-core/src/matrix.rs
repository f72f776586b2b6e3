//! Dense day-by-path matrix shared by the returns and portfolio value stages.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Row-major `days × paths` matrix of `f64`.
///
/// Row `t` holds day `t` for every path; column `s` is one simulated path.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Matrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl Matrix {
    /// Build a matrix from row-major data.
    ///
    /// Fails if `data.len() != rows * cols`.
    pub fn from_vec(rows: usize, cols: usize, data: Vec<f64>) -> Result<Self> {
        if rows.checked_mul(cols) != Some(data.len()) {
            return Err(Error::InvalidParameter(format!(
                "expected {} x {} = {} elements, got {}",
                rows,
                cols,
                rows.saturating_mul(cols),
                data.len()
            )));
        }
        Ok(Self { rows, cols, data })
    }

    /// Build a matrix from a list of equally sized rows.
    pub fn from_rows(rows: &[Vec<f64>]) -> Result<Self> {
        let cols = rows.first().map(Vec::len).unwrap_or(0);
        if let Some(bad) = rows.iter().position(|r| r.len() != cols) {
            return Err(Error::InvalidParameter(format!(
                "row {} has {} columns, expected {}",
                bad,
                rows[bad].len(),
                cols
            )));
        }
        let data = rows.iter().flatten().copied().collect();
        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Build a single-path matrix from one column of values.
    pub fn from_column(values: &[f64]) -> Self {
        Self {
            rows: values.len(),
            cols: 1,
            data: values.to_vec(),
        }
    }

    /// A matrix of the given shape filled with `value`.
    pub fn filled(rows: usize, cols: usize, value: f64) -> Self {
        Self {
            rows,
            cols,
            data: vec![value; rows * cols],
        }
    }

    /// Number of rows (days).
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of columns (paths).
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// True if either dimension is zero.
    pub fn is_empty(&self) -> bool {
        self.rows == 0 || self.cols == 0
    }

    /// Element at day `t`, path `s`.
    pub fn get(&self, t: usize, s: usize) -> Option<f64> {
        if t < self.rows && s < self.cols {
            Some(self.data[t * self.cols + s])
        } else {
            None
        }
    }

    /// All paths for day `t`.
    pub fn row(&self, t: usize) -> Option<&[f64]> {
        if t < self.rows {
            Some(&self.data[t * self.cols..(t + 1) * self.cols])
        } else {
            None
        }
    }

    /// One path across all days.
    pub fn column(&self, s: usize) -> Option<Vec<f64>> {
        if s < self.cols {
            Some(self.data.iter().skip(s).step_by(self.cols).copied().collect())
        } else {
            None
        }
    }

    /// Iterate over rows.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // chunk size must be non-zero; a zero-column matrix has no data
        self.data.chunks_exact(self.cols.max(1))
    }

    /// Values on the final day across all paths (empty if there are no rows).
    pub fn last_row(&self) -> Vec<f64> {
        self.rows
            .checked_sub(1)
            .and_then(|t| self.row(t))
            .map(<[f64]>::to_vec)
            .unwrap_or_default()
    }

    /// Row-major backing data.
    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Matrix {
        // 3 days x 2 paths
        Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]]).unwrap()
    }

    #[test]
    fn test_shape_and_access() {
        let m = sample();
        assert_eq!(m.shape(), (3, 2));
        assert_eq!(m.get(1, 0), Some(3.0));
        assert_eq!(m.get(2, 1), Some(6.0));
        assert_eq!(m.get(3, 0), None);
        assert_eq!(m.get(0, 2), None);
    }

    #[test]
    fn test_row_and_column() {
        let m = sample();
        assert_eq!(m.row(0), Some(&[1.0, 2.0][..]));
        assert_eq!(m.column(1), Some(vec![2.0, 4.0, 6.0]));
        assert_eq!(m.last_row(), vec![5.0, 6.0]);
        assert!(m.column(2).is_none());
    }

    #[test]
    fn test_iter_rows() {
        let m = sample();
        let sums: Vec<f64> = m.iter_rows().map(|r| r.iter().sum()).collect();
        assert_eq!(sums, vec![3.0, 7.0, 11.0]);
    }

    #[test]
    fn test_from_vec_length_mismatch() {
        let result = Matrix::from_vec(2, 2, vec![1.0, 2.0, 3.0]);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_from_rows_ragged() {
        let result = Matrix::from_rows(&[vec![1.0, 2.0], vec![3.0]]);
        assert!(matches!(result, Err(Error::InvalidParameter(_))));
    }

    #[test]
    fn test_empty() {
        let m = Matrix::from_rows(&[]).unwrap();
        assert!(m.is_empty());
        assert!(m.last_row().is_empty());
        assert_eq!(m.iter_rows().count(), 0);

        assert!(Matrix::filled(3, 0, 1.0).is_empty());
    }

    #[test]
    fn test_from_column() {
        let m = Matrix::from_column(&[0.1, -0.05, 0.02]);
        assert_eq!(m.shape(), (3, 1));
        assert_eq!(m.column(0), Some(vec![0.1, -0.05, 0.02]));
    }
}
