//! Pure reshapes from typed metric rows to the data each section draws.

pub mod correlation;
pub mod cumulative;
pub mod monthly;
pub mod sector;
pub mod volatility;

use std::cmp::Ordering;
use std::fmt;

/// A pivot could not produce one value per cell.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeError {
    pub table: &'static str,
    pub row_key: String,
    pub column_key: String,
}

impl fmt::Display for ReshapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "cannot reshape {}: duplicate entry for ({}, {})",
            self.table, self.row_key, self.column_key
        )
    }
}

impl std::error::Error for ReshapeError {}

/// Orders values high to low with missing values last.
pub(crate) fn descending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => y.total_cmp(&x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Orders values low to high with missing values last.
pub(crate) fn ascending_missing_last(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(x), Some(y)) => x.total_cmp(&y),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
