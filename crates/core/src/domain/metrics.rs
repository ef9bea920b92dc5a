//! Typed views over the five metric tables.
//!
//! Each `from_table` applies the column coercions once so transforms never touch raw cells:
//! returns become `Option<f64>` (unparseable values are missing), null dates are missing and
//! unparseable date text is an error.

use crate::domain::table::{Cell, Table};
use anyhow::Context;
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VolatilityRow {
    pub ticker: String,
    pub std_dev_daily_return: Option<f64>,
}

impl VolatilityRow {
    pub fn from_table(table: &Table) -> anyhow::Result<Vec<Self>> {
        let ticker = table.column_index("Ticker")?;
        let std_dev = table.column_index("std_dev_daily_return")?;
        Ok(table
            .rows
            .iter()
            .map(|row| Self {
                ticker: row[ticker].to_key().unwrap_or_default(),
                std_dev_daily_return: row[std_dev].to_number(),
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CumulativeReturnRow {
    pub ticker: Option<String>,
    /// `None` when the stored date is null.
    pub date: Option<NaiveDateTime>,
    pub cumulative_return: Option<f64>,
}

impl CumulativeReturnRow {
    pub fn from_table(table: &Table) -> anyhow::Result<Vec<Self>> {
        let ticker = table.column_index("Ticker")?;
        let date = table.column_index("date")?;
        let value = table.column_index("cumulative_return")?;
        table
            .rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                Ok(Self {
                    ticker: row[ticker].to_key(),
                    date: row[date]
                        .to_datetime()
                        .with_context(|| format!("{} row {i}: bad date", table.name))?,
                    cumulative_return: row[value].to_number(),
                })
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SectorReturnRow {
    pub sector: Option<String>,
    pub yearly_return: Option<f64>,
}

impl SectorReturnRow {
    pub fn from_table(table: &Table) -> anyhow::Result<Vec<Self>> {
        let sector = table.column_index("sector")?;
        let value = table.column_index("yearly_return")?;
        Ok(table
            .rows
            .iter()
            .map(|row| Self {
                sector: row[sector].to_key(),
                yearly_return: row[value].to_number(),
            })
            .collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CorrelationRow {
    pub ticker_1: Option<String>,
    pub ticker_2: Option<String>,
    pub correlation: Option<f64>,
}

impl CorrelationRow {
    pub fn from_table(table: &Table) -> anyhow::Result<Vec<Self>> {
        let t1 = table.column_index("Ticker_1")?;
        let t2 = table.column_index("Ticker_2")?;
        let value = table.column_index("Correlation")?;
        Ok(table
            .rows
            .iter()
            .map(|row| Self {
                ticker_1: row[t1].to_key(),
                ticker_2: row[t2].to_key(),
                correlation: row[value].to_number(),
            })
            .collect())
    }
}

/// One row of `top5_gainers_losers`. `rank` and `kind` are shown as stored.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyMoverRow {
    pub ticker: String,
    pub month: Option<String>,
    pub monthly_return: Option<f64>,
    pub rank: Cell,
    #[serde(rename = "type")]
    pub kind: Cell,
}

impl MonthlyMoverRow {
    pub fn from_table(table: &Table) -> anyhow::Result<Vec<Self>> {
        let ticker = table.column_index("Ticker")?;
        let month = table.column_index("Month")?;
        let value = table.column_index("Monthly_Return")?;
        let rank = table.column_index("Rank")?;
        let kind = table.column_index("Type")?;
        Ok(table
            .rows
            .iter()
            .map(|row| Self {
                ticker: row[ticker].to_key().unwrap_or_default(),
                month: row[month].to_key(),
                monthly_return: row[value].to_number(),
                rank: row[rank].clone(),
                kind: row[kind].clone(),
            })
            .collect())
    }
}
