use crate::domain::metrics::VolatilityRow;
use crate::transform::descending_missing_last;

pub const TOP_VOLATILE: usize = 10;

/// Most volatile tickers first, at most `limit` of them.
pub fn top_volatile(rows: &[VolatilityRow], limit: usize) -> Vec<VolatilityRow> {
    let mut sorted = rows.to_vec();
    sorted.sort_by(|a, b| descending_missing_last(a.std_dev_daily_return, b.std_dev_daily_return));
    sorted.truncate(limit);
    sorted
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(ticker: &str, v: Option<f64>) -> VolatilityRow {
        VolatilityRow {
            ticker: ticker.to_string(),
            std_dev_daily_return: v,
        }
    }

    #[test]
    fn keeps_ten_highest_in_descending_order() {
        let rows: Vec<_> = (0..14)
            .map(|i| row(&format!("T{i:02}"), Some(f64::from(i) / 1000.0)))
            .collect();
        let top = top_volatile(&rows, TOP_VOLATILE);
        assert_eq!(top.len(), 10);
        assert_eq!(top[0].ticker, "T13");
        assert_eq!(top[9].ticker, "T04");
        assert!(top
            .windows(2)
            .all(|w| w[0].std_dev_daily_return >= w[1].std_dev_daily_return));
    }

    #[test]
    fn short_input_and_missing_values() {
        let rows = vec![row("A", None), row("B", Some(0.02)), row("C", Some(0.03))];
        let top = top_volatile(&rows, TOP_VOLATILE);
        let tickers: Vec<_> = top.iter().map(|r| r.ticker.as_str()).collect();
        assert_eq!(tickers, ["C", "B", "A"]);
    }

    #[test]
    fn ties_keep_input_order() {
        let rows = vec![row("BEL", Some(0.023)), row("TRENT", Some(0.023))];
        let top = top_volatile(&rows, TOP_VOLATILE);
        assert_eq!(top[0].ticker, "BEL");
        assert_eq!(top[1].ticker, "TRENT");
    }
}
