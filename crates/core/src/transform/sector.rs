use crate::domain::metrics::SectorReturnRow;
use crate::transform::descending_missing_last;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorAverage {
    pub sector: String,
    /// Rows with a usable yearly return.
    pub observations: usize,
    pub average_return: Option<f64>,
}

/// Mean yearly return per sector, unrounded, in sector-name order.
///
/// Rows without a sector are dropped. Missing returns do not count towards the mean; a sector
/// with none at all has no average.
pub fn sector_means(rows: &[SectorReturnRow]) -> Vec<SectorAverage> {
    let mut acc = BTreeMap::<&str, (f64, usize)>::new();
    for row in rows {
        let Some(sector) = row.sector.as_deref() else {
            continue;
        };
        let (sum, count) = acc.entry(sector).or_insert((0.0, 0));
        if let Some(v) = row.yearly_return {
            *sum += v;
            *count += 1;
        }
    }

    acc.into_iter()
        .map(|(sector, (sum, count))| SectorAverage {
            sector: sector.to_string(),
            observations: count,
            average_return: (count > 0).then(|| sum / count as f64),
        })
        .collect()
}

/// Sector means, best first, rounded to two decimals for display.
pub fn rank_sectors(rows: &[SectorReturnRow]) -> Vec<SectorAverage> {
    let mut out = sector_means(rows);
    out.sort_by(|a, b| descending_missing_last(a.average_return, b.average_return));
    for s in &mut out {
        s.average_return = s.average_return.map(round2);
    }
    out
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round_ties_even() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(sector: Option<&str>, v: Option<f64>) -> SectorReturnRow {
        SectorReturnRow {
            sector: sector.map(str::to_string),
            yearly_return: v,
        }
    }

    fn sample() -> Vec<SectorReturnRow> {
        vec![
            row(Some("IT"), Some(12.345)),
            row(Some("Banking"), Some(4.0)),
            row(Some("IT"), Some(20.111)),
            row(Some("Energy"), Some(-3.5)),
            row(Some("Banking"), Some(7.25)),
            row(Some("Banking"), None),
            row(None, Some(100.0)),
        ]
    }

    #[test]
    fn means_preserve_the_total() {
        let rows = sample();
        let total: f64 = rows
            .iter()
            .filter(|r| r.sector.is_some())
            .filter_map(|r| r.yearly_return)
            .sum();
        let recomposed: f64 = sector_means(&rows)
            .iter()
            .map(|s| s.observations as f64 * s.average_return.unwrap_or(0.0))
            .sum();
        assert!((total - recomposed).abs() < 1e-9);
    }

    #[test]
    fn ranked_descending_and_rounded() {
        let ranked = rank_sectors(&sample());
        let names: Vec<_> = ranked.iter().map(|s| s.sector.as_str()).collect();
        assert_eq!(names, ["IT", "Banking", "Energy"]);
        assert_eq!(ranked[0].average_return, Some(16.23));
        assert_eq!(ranked[1].average_return, Some(5.62));
        assert_eq!(ranked[1].observations, 2);
        assert_eq!(ranked[2].average_return, Some(-3.5));
        for s in &ranked {
            let v = s.average_return.unwrap();
            assert!(((v * 100.0).round() - v * 100.0).abs() < 1e-6);
        }
    }

    #[test]
    fn sector_without_values_sorts_last() {
        let rows = vec![row(Some("Pharma"), None), row(Some("Auto"), Some(-1.0))];
        let ranked = rank_sectors(&rows);
        assert_eq!(ranked[0].sector, "Auto");
        assert_eq!(ranked[1].sector, "Pharma");
        assert_eq!(ranked[1].average_return, None);
        assert_eq!(ranked[1].observations, 0);
    }
}
