use crate::domain::metrics::MonthlyMoverRow;
use crate::transform::{ascending_missing_last, descending_missing_last};
use serde::Serialize;
use std::collections::HashSet;

pub const MOVERS_PER_SIDE: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMovers {
    pub month: String,
    pub gainers: Vec<MonthlyMoverRow>,
    pub losers: Vec<MonthlyMoverRow>,
}

/// Distinct months in order of first appearance.
pub fn distinct_months(rows: &[MonthlyMoverRow]) -> Vec<String> {
    let mut seen = HashSet::new();
    rows.iter()
        .filter_map(|r| r.month.as_deref())
        .filter(|m| seen.insert(*m))
        .map(str::to_string)
        .collect()
}

/// The requested month if it exists, otherwise the first available one.
pub fn resolve_month(months: &[String], requested: Option<&str>) -> Option<String> {
    requested
        .and_then(|want| months.iter().find(|m| m.as_str() == want))
        .or_else(|| months.first())
        .cloned()
}

/// Best and worst `limit` rows of one month.
pub fn monthly_movers(rows: &[MonthlyMoverRow], month: &str, limit: usize) -> MonthlyMovers {
    let in_month: Vec<&MonthlyMoverRow> = rows
        .iter()
        .filter(|r| r.month.as_deref() == Some(month))
        .collect();

    let mut gainers = in_month.clone();
    gainers.sort_by(|a, b| descending_missing_last(a.monthly_return, b.monthly_return));
    let mut losers = in_month;
    losers.sort_by(|a, b| ascending_missing_last(a.monthly_return, b.monthly_return));

    MonthlyMovers {
        month: month.to_string(),
        gainers: gainers.into_iter().take(limit).cloned().collect(),
        losers: losers.into_iter().take(limit).cloned().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::table::Cell;

    fn row(ticker: &str, month: &str, v: Option<f64>) -> MonthlyMoverRow {
        MonthlyMoverRow {
            ticker: ticker.to_string(),
            month: Some(month.to_string()),
            monthly_return: v,
            rank: Cell::Null,
            kind: Cell::Text("Gainer".to_string()),
        }
    }

    fn twelve_in_march() -> Vec<MonthlyMoverRow> {
        let mut rows: Vec<_> = (0..12)
            .map(|i| row(&format!("T{i:02}"), "2024-03", Some(f64::from(i) - 6.0)))
            .collect();
        rows.push(row("OTHER", "2024-02", Some(50.0)));
        rows
    }

    fn tickers(rows: &[MonthlyMoverRow]) -> Vec<&str> {
        rows.iter().map(|r| r.ticker.as_str()).collect()
    }

    #[test]
    fn months_keep_first_seen_order() {
        let mut rows = twelve_in_march();
        rows.insert(0, row("X", "2024-04", None));
        assert_eq!(distinct_months(&rows), ["2024-04", "2024-03", "2024-02"]);
    }

    #[test]
    fn unknown_month_falls_back_to_first() {
        let months = vec!["2024-03".to_string(), "2024-02".to_string()];
        assert_eq!(resolve_month(&months, Some("2024-02")).as_deref(), Some("2024-02"));
        assert_eq!(resolve_month(&months, Some("1999-01")).as_deref(), Some("2024-03"));
        assert_eq!(resolve_month(&months, None).as_deref(), Some("2024-03"));
        assert_eq!(resolve_month(&[], Some("2024-03")), None);
    }

    #[test]
    fn splits_gainers_and_losers() {
        let movers = monthly_movers(&twelve_in_march(), "2024-03", MOVERS_PER_SIDE);
        assert_eq!(tickers(&movers.gainers), ["T11", "T10", "T09", "T08", "T07"]);
        assert_eq!(tickers(&movers.losers), ["T00", "T01", "T02", "T03", "T04"]);
        assert!(movers
            .gainers
            .iter()
            .all(|g| !movers.losers.iter().any(|l| l.ticker == g.ticker)));
        assert!(!tickers(&movers.gainers).contains(&"OTHER"));
    }

    #[test]
    fn small_months_overlap_and_missing_sort_last() {
        let rows = vec![
            row("A", "2024-01", Some(1.0)),
            row("B", "2024-01", None),
            row("C", "2024-01", Some(-2.0)),
        ];
        let movers = monthly_movers(&rows, "2024-01", MOVERS_PER_SIDE);
        assert_eq!(tickers(&movers.gainers), ["A", "C", "B"]);
        assert_eq!(tickers(&movers.losers), ["C", "A", "B"]);
    }

    #[test]
    fn month_without_rows_is_empty() {
        let movers = monthly_movers(&twelve_in_march(), "2030-01", MOVERS_PER_SIDE);
        assert!(movers.gainers.is_empty());
        assert!(movers.losers.is_empty());
    }
}
