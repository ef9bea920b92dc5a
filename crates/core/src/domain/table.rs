use anyhow::{bail, ensure, Context};
use chrono::{DateTime, NaiveDate, NaiveDateTime};
use serde::Serialize;
use std::fmt;

/// A single value as decoded from the database.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Cell {
    Null,
    Int(i64),
    Float(f64),
    Text(String),
    Date(NaiveDate),
    DateTime(NaiveDateTime),
}

impl Cell {
    /// Lenient numeric coercion: anything that is not a finite number becomes `None`.
    pub fn to_number(&self) -> Option<f64> {
        let v = match self {
            Cell::Int(i) => *i as f64,
            Cell::Float(f) => *f,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Null | Cell::Date(_) | Cell::DateTime(_) => return None,
        };
        v.is_finite().then_some(v)
    }

    /// Date coercion. Nulls are missing; unparseable text is an error.
    pub fn to_datetime(&self) -> anyhow::Result<Option<NaiveDateTime>> {
        match self {
            Cell::Date(d) => Ok(Some(d.and_time(chrono::NaiveTime::MIN))),
            Cell::DateTime(dt) => Ok(Some(*dt)),
            Cell::Text(s) => parse_datetime_text(s.trim()).map(Some),
            Cell::Null => Ok(None),
            Cell::Int(_) | Cell::Float(_) => bail!("cannot interpret {self:?} as a date"),
        }
    }

    /// Text key for grouping and filtering; `None` for nulls.
    pub fn to_key(&self) -> Option<String> {
        match self {
            Cell::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Null => Ok(()),
            Cell::Int(i) => write!(f, "{i}"),
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Text(s) => f.write_str(s),
            Cell::Date(d) => write!(f, "{}", d.format("%Y-%m-%d")),
            Cell::DateTime(dt) => write!(f, "{}", dt.format("%Y-%m-%d %H:%M:%S")),
        }
    }
}

fn parse_datetime_text(s: &str) -> anyhow::Result<NaiveDateTime> {
    if let Ok(d) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Ok(d.and_time(chrono::NaiveTime::MIN));
    }
    for fmt in ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(dt);
        }
    }
    DateTime::parse_from_rfc3339(s)
        .map(|dt| dt.naive_utc())
        .with_context(|| format!("unparseable date: {s:?}"))
}

/// The full contents of one database table, column order preserved.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Table {
    pub name: String,
    pub columns: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

impl Table {
    pub fn new(name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            name: name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn push_row(&mut self, row: Vec<Cell>) -> anyhow::Result<()> {
        ensure!(
            row.len() == self.columns.len(),
            "row width {} does not match {} columns of table {}",
            row.len(),
            self.columns.len(),
            self.name
        );
        self.rows.push(row);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, column: &str) -> anyhow::Result<usize> {
        self.columns
            .iter()
            .position(|c| c == column)
            .with_context(|| format!("table {} has no column {column}", self.name))
    }
}
