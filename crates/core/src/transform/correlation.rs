use crate::domain::metrics::CorrelationRow;
use crate::transform::ReshapeError;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationMatrix {
    /// Distinct `Ticker_1` values, sorted.
    pub rows: Vec<String>,
    /// Distinct `Ticker_2` values, sorted.
    pub columns: Vec<String>,
    /// `values[r][c]`; pairs absent from the input are `None`.
    pub values: Vec<Vec<Option<f64>>>,
}

impl CorrelationMatrix {
    pub fn is_square(&self) -> bool {
        self.rows == self.columns
    }

    pub fn get(&self, row: &str, column: &str) -> Option<f64> {
        let r = self.rows.iter().position(|t| t == row)?;
        let c = self.columns.iter().position(|t| t == column)?;
        self.values[r][c]
    }
}

/// Pivots (Ticker_1, Ticker_2, Correlation) rows into a matrix.
///
/// Each pair may appear at most once. Rows missing either ticker are ignored.
pub fn correlation_matrix(rows: &[CorrelationRow]) -> Result<CorrelationMatrix, ReshapeError> {
    let mut cells = BTreeMap::<(&str, &str), Option<f64>>::new();
    let mut row_keys = BTreeSet::<&str>::new();
    let mut column_keys = BTreeSet::<&str>::new();

    for row in rows {
        let (Some(t1), Some(t2)) = (row.ticker_1.as_deref(), row.ticker_2.as_deref()) else {
            continue;
        };
        if cells.insert((t1, t2), row.correlation).is_some() {
            return Err(ReshapeError {
                table: "stock_correlation",
                row_key: t1.to_string(),
                column_key: t2.to_string(),
            });
        }
        row_keys.insert(t1);
        column_keys.insert(t2);
    }

    let values = row_keys
        .iter()
        .map(|r| {
            column_keys
                .iter()
                .map(|c| cells.get(&(*r, *c)).copied().flatten())
                .collect()
        })
        .collect();

    Ok(CorrelationMatrix {
        rows: row_keys.into_iter().map(str::to_string).collect(),
        columns: column_keys.into_iter().map(str::to_string).collect(),
        values,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(a: &str, b: &str, v: f64) -> CorrelationRow {
        CorrelationRow {
            ticker_1: Some(a.to_string()),
            ticker_2: Some(b.to_string()),
            correlation: Some(v),
        }
    }

    fn full_grid() -> Vec<CorrelationRow> {
        let tickers = ["TCS", "INFY", "WIPRO"];
        let mut rows = Vec::new();
        for a in tickers {
            for b in tickers {
                let v = if a == b { 1.0 } else { 0.42 };
                rows.push(row(a, b, v));
            }
        }
        rows
    }

    #[test]
    fn full_grid_is_square_with_unit_diagonal() {
        let m = correlation_matrix(&full_grid()).unwrap();
        assert!(m.is_square());
        assert_eq!(m.rows, ["INFY", "TCS", "WIPRO"]);
        assert_eq!(m.values.len(), 3);
        assert!(m.values.iter().all(|r| r.len() == 3));
        for t in &m.rows {
            assert_eq!(m.get(t, t), Some(1.0));
        }
        assert_eq!(m.get("TCS", "WIPRO"), Some(0.42));
    }

    #[test]
    fn missing_pairs_become_empty_cells() {
        let rows = vec![row("A", "A", 1.0), row("A", "B", 0.3), row("B", "B", 1.0)];
        let m = correlation_matrix(&rows).unwrap();
        assert_eq!(m.get("B", "A"), None);
        assert_eq!(m.get("A", "B"), Some(0.3));
    }

    #[test]
    fn duplicate_pair_fails() {
        let mut rows = full_grid();
        rows.push(row("TCS", "INFY", 0.5));
        let err = correlation_matrix(&rows).unwrap_err();
        assert_eq!(err.row_key, "TCS");
        assert_eq!(err.column_key, "INFY");
    }
}
