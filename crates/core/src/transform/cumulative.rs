use crate::domain::metrics::CumulativeReturnRow;
use crate::transform::{descending_missing_last, ReshapeError};
use chrono::NaiveDateTime;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet, HashMap};

pub const TOP_PERFORMERS: usize = 5;

/// Date-indexed wide table: one column per ticker, `series[c][r]` is the value of
/// `tickers[c]` on `dates[r]`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReturnPivot {
    pub dates: Vec<NaiveDateTime>,
    pub tickers: Vec<String>,
    pub series: Vec<Vec<Option<f64>>>,
}

/// Tickers ranked by their last recorded cumulative return, best first.
///
/// "Last" follows row order and skips missing values. Tickers that never have a value are not
/// ranked; ties go to the alphabetically earlier ticker.
pub fn top_by_last_value(rows: &[CumulativeReturnRow], limit: usize) -> Vec<String> {
    let mut last = BTreeMap::<&str, Option<f64>>::new();
    for row in rows {
        let Some(ticker) = row.ticker.as_deref() else {
            continue;
        };
        let slot = last.entry(ticker).or_insert(None);
        if row.cumulative_return.is_some() {
            *slot = row.cumulative_return;
        }
    }

    let mut ranked: Vec<(&str, Option<f64>)> =
        last.into_iter().filter(|(_, v)| v.is_some()).collect();
    ranked.sort_by(|a, b| descending_missing_last(a.1, b.1));
    ranked
        .into_iter()
        .take(limit)
        .map(|(t, _)| t.to_string())
        .collect()
}

/// Pivots the rows of the top `limit` tickers into a [`ReturnPivot`].
///
/// Rows without a date still count towards ranking but have no place on the date axis.
pub fn pivot_top_performers(
    rows: &[CumulativeReturnRow],
    limit: usize,
) -> Result<ReturnPivot, ReshapeError> {
    let selected: BTreeSet<String> = top_by_last_value(rows, limit).into_iter().collect();
    let tickers: Vec<String> = selected.into_iter().collect();
    let column_of: HashMap<&str, usize> = tickers
        .iter()
        .enumerate()
        .map(|(i, t)| (t.as_str(), i))
        .collect();

    let mut cells = BTreeMap::<NaiveDateTime, Vec<Option<Option<f64>>>>::new();
    for row in rows {
        let Some(col) = row.ticker.as_deref().and_then(|t| column_of.get(t)) else {
            continue;
        };
        let Some(date) = row.date else {
            continue;
        };
        let slots = cells
            .entry(date)
            .or_insert_with(|| vec![None; tickers.len()]);
        if slots[*col].is_some() {
            return Err(ReshapeError {
                table: "cumulative_return",
                row_key: date.format("%Y-%m-%d %H:%M:%S").to_string(),
                column_key: tickers[*col].clone(),
            });
        }
        slots[*col] = Some(row.cumulative_return);
    }

    let dates: Vec<NaiveDateTime> = cells.keys().copied().collect();
    let series = (0..tickers.len())
        .map(|c| cells.values().map(|slots| slots[c].flatten()).collect())
        .collect();

    Ok(ReturnPivot {
        dates,
        tickers,
        series,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(d: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 1, d)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn row(ticker: &str, d: u32, v: Option<f64>) -> CumulativeReturnRow {
        CumulativeReturnRow {
            ticker: Some(ticker.to_string()),
            date: Some(day(d)),
            cumulative_return: v,
        }
    }

    fn six_tickers() -> Vec<CumulativeReturnRow> {
        let mut rows = Vec::new();
        for (i, t) in ["A", "B", "C", "D", "E", "F"].iter().enumerate() {
            rows.push(row(t, 1, Some(0.0)));
            rows.push(row(t, 2, Some(10.0 - i as f64)));
        }
        rows
    }

    #[test]
    fn keeps_five_best_last_values() {
        let top = top_by_last_value(&six_tickers(), TOP_PERFORMERS);
        assert_eq!(top, ["A", "B", "C", "D", "E"]);

        let pivot = pivot_top_performers(&six_tickers(), TOP_PERFORMERS).unwrap();
        assert_eq!(pivot.tickers, ["A", "B", "C", "D", "E"]);
        assert!(!pivot.tickers.contains(&"F".to_string()));
        assert_eq!(pivot.dates, vec![day(1), day(2)]);
        assert_eq!(pivot.series[0], vec![Some(0.0), Some(10.0)]);
        assert_eq!(pivot.series[4], vec![Some(0.0), Some(6.0)]);
    }

    #[test]
    fn last_value_follows_row_order_not_date() {
        // Z's last row is the earlier date; it still counts as Z's last value.
        let rows = vec![
            row("Y", 1, Some(1.0)),
            row("Z", 2, Some(0.5)),
            row("Z", 1, Some(9.0)),
        ];
        assert_eq!(top_by_last_value(&rows, 1), ["Z"]);
    }

    #[test]
    fn trailing_missing_values_are_skipped() {
        let rows = vec![
            row("Y", 1, Some(2.0)),
            row("Z", 1, Some(3.0)),
            row("Z", 2, None),
            row("N", 1, None),
        ];
        assert_eq!(top_by_last_value(&rows, 5), ["Z", "Y"]);
    }

    #[test]
    fn ragged_dates_leave_gaps() {
        let rows = vec![row("A", 1, Some(1.0)), row("B", 2, Some(2.0))];
        let pivot = pivot_top_performers(&rows, 5).unwrap();
        assert_eq!(pivot.tickers, ["A", "B"]);
        assert_eq!(pivot.series[0], vec![Some(1.0), None]);
        assert_eq!(pivot.series[1], vec![None, Some(2.0)]);
    }

    #[test]
    fn undated_rows_rank_but_stay_off_the_axis() {
        let mut rows = vec![row("A", 1, Some(1.0)), row("B", 1, Some(2.0))];
        rows.push(CumulativeReturnRow {
            ticker: Some("A".to_string()),
            date: None,
            cumulative_return: Some(5.0),
        });
        rows.push(CumulativeReturnRow {
            ticker: Some("JUNK".to_string()),
            date: None,
            cumulative_return: None,
        });

        assert_eq!(top_by_last_value(&rows, 5), ["A", "B"]);
        let pivot = pivot_top_performers(&rows, 5).unwrap();
        assert_eq!(pivot.dates, vec![day(1)]);
        assert_eq!(pivot.series[0], vec![Some(1.0)]);
    }

    #[test]
    fn duplicate_date_for_ticker_is_an_error() {
        let rows = vec![row("A", 1, Some(1.0)), row("A", 1, Some(1.5))];
        let err = pivot_top_performers(&rows, 5).unwrap_err();
        assert_eq!(err.column_key, "A");
        assert!(err.to_string().contains("cumulative_return"));
    }

    #[test]
    fn rerunning_gives_the_same_pivot() {
        let rows = six_tickers();
        assert_eq!(
            pivot_top_performers(&rows, TOP_PERFORMERS).unwrap(),
            pivot_top_performers(&rows, TOP_PERFORMERS).unwrap()
        );
    }
}
