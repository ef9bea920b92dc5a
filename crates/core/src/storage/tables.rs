use crate::domain::table::{Cell, Table};
use anyhow::Context;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::{Column, Executor, Row, TypeInfo, ValueRef};
use std::fmt;

/// The metric tables the dashboard reads. Only these names are ever put into SQL.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SourceTable {
    Volatility,
    CumulativeReturn,
    SectorPerformance,
    StockCorrelation,
    MonthlyGainersLosers,
}

impl SourceTable {
    pub const ALL: [SourceTable; 5] = [
        SourceTable::Volatility,
        SourceTable::CumulativeReturn,
        SourceTable::SectorPerformance,
        SourceTable::StockCorrelation,
        SourceTable::MonthlyGainersLosers,
    ];

    pub fn table_name(self) -> &'static str {
        match self {
            SourceTable::Volatility => "volatility_analysis",
            SourceTable::CumulativeReturn => "cumulative_return",
            SourceTable::SectorPerformance => "sector_performance",
            SourceTable::StockCorrelation => "stock_correlation",
            SourceTable::MonthlyGainersLosers => "top5_gainers_losers",
        }
    }
}

impl fmt::Display for SourceTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[async_trait::async_trait]
pub trait TableSource: Send + Sync {
    async fn fetch_table(&self, table: SourceTable) -> anyhow::Result<Table>;
}

#[derive(Debug, Clone)]
pub struct MySqlTableSource {
    pool: MySqlPool,
}

impl MySqlTableSource {
    pub fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait::async_trait]
impl TableSource for MySqlTableSource {
    async fn fetch_table(&self, table: SourceTable) -> anyhow::Result<Table> {
        let t0 = std::time::Instant::now();
        let sql = format!("SELECT * FROM {}", table.table_name());
        let rows = sqlx::query(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("query {table} failed"))?;

        let columns = if rows.is_empty() {
            // No rows means no row metadata; ask the server for the result shape instead.
            let described = (&self.pool)
                .describe(&sql)
                .await
                .with_context(|| format!("describe {table} failed"))?;
            described
                .columns()
                .iter()
                .map(|c| c.name().to_string())
                .collect()
        } else {
            rows[0].columns().iter().map(|c| c.name().to_string()).collect()
        };

        let out = rows_to_table(table, columns, &rows)?;
        tracing::debug!(
            %table,
            rows = out.len(),
            elapsed_ms = t0.elapsed().as_millis(),
            "loaded table"
        );
        Ok(out)
    }
}

fn rows_to_table(
    table: SourceTable,
    columns: Vec<String>,
    rows: &[MySqlRow],
) -> anyhow::Result<Table> {
    let mut out = Table::new(table.table_name(), columns);

    for (i, row) in rows.iter().enumerate() {
        let mut cells = Vec::with_capacity(row.len());
        for idx in 0..row.len() {
            let cell = decode_cell(row, idx)
                .with_context(|| format!("{table} row {i} column {idx}: decode failed"))?;
            cells.push(cell);
        }
        out.push_row(cells)?;
    }
    Ok(out)
}

/// How a column's server-reported type is turned into a [`Cell`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColumnKind {
    Bool,
    Int,
    Unsigned,
    Float,
    Double,
    Decimal,
    Year,
    Date,
    DateTime,
    Time,
    /// Read as a string, or as raw bytes decoded lossily as UTF-8.
    Other,
}

fn column_kind(type_name: &str) -> ColumnKind {
    let upper = type_name.to_ascii_uppercase();
    match upper.as_str() {
        "BOOLEAN" => ColumnKind::Bool,
        "TINYINT" | "SMALLINT" | "INT" | "MEDIUMINT" | "BIGINT" => ColumnKind::Int,
        t if t.ends_with(" UNSIGNED") => ColumnKind::Unsigned,
        "FLOAT" => ColumnKind::Float,
        "DOUBLE" => ColumnKind::Double,
        "DECIMAL" => ColumnKind::Decimal,
        "YEAR" => ColumnKind::Year,
        "DATE" => ColumnKind::Date,
        "DATETIME" | "TIMESTAMP" => ColumnKind::DateTime,
        "TIME" => ColumnKind::Time,
        _ => ColumnKind::Other,
    }
}

fn decode_cell(row: &MySqlRow, idx: usize) -> anyhow::Result<Cell> {
    if row.try_get_raw(idx)?.is_null() {
        return Ok(Cell::Null);
    }

    let type_name = row.columns()[idx].type_info().name();
    let cell = match column_kind(type_name) {
        ColumnKind::Bool => Cell::Int(i64::from(row.try_get::<bool, _>(idx)?)),
        ColumnKind::Int => Cell::Int(row.try_get::<i64, _>(idx)?),
        ColumnKind::Unsigned => {
            let v = row.try_get::<u64, _>(idx)?;
            i64::try_from(v).map_or(Cell::Float(v as f64), Cell::Int)
        }
        ColumnKind::Float => Cell::Float(f64::from(row.try_get::<f32, _>(idx)?)),
        ColumnKind::Double => Cell::Float(row.try_get::<f64, _>(idx)?),
        ColumnKind::Decimal => {
            let d = row.try_get::<Decimal, _>(idx)?;
            d.to_f64().map_or(Cell::Text(d.to_string()), Cell::Float)
        }
        // sqlx has no checked decode for YEAR; it arrives as a two-byte integer.
        ColumnKind::Year => Cell::Int(i64::from(row.try_get_unchecked::<u16, _>(idx)?)),
        ColumnKind::Date => Cell::Date(row.try_get::<NaiveDate, _>(idx)?),
        ColumnKind::DateTime => Cell::DateTime(row.try_get::<NaiveDateTime, _>(idx)?),
        ColumnKind::Time => Cell::Text(row.try_get::<NaiveTime, _>(idx)?.to_string()),
        ColumnKind::Other => match row.try_get::<String, _>(idx) {
            Ok(s) => Cell::Text(s),
            Err(_) => {
                // Lossy: invalid UTF-8 becomes U+FFFD.
                tracing::debug!(column = idx, type_name, "decoding raw bytes as text");
                let bytes = row.try_get_unchecked::<Vec<u8>, _>(idx)?;
                Cell::Text(String::from_utf8_lossy(&bytes).into_owned())
            }
        },
    };
    Ok(cell)
}
