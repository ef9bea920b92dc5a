//! Assembles the page: five sections in fixed order, each computed from the loaded tables and
//! the current month selection. A section that fails to build reports its error in place.

use crate::chart::{self, Figure};
use crate::domain::metrics::{
    CorrelationRow, CumulativeReturnRow, MonthlyMoverRow, SectorReturnRow, VolatilityRow,
};
use crate::storage::cache::DashboardTables;
use crate::transform::{correlation, cumulative, monthly, sector, volatility};
use serde::Serialize;

pub const PAGE_TITLE: &str = "📊 Stock Dashboard";
pub const HEADING: &str = "📊 Data-Driven Stock Analysis Dashboard";

#[derive(Debug, Clone, Serialize)]
pub struct DashboardView {
    pub page_title: &'static str,
    pub heading: &'static str,
    pub sections: Vec<Section>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Section {
    pub id: &'static str,
    pub heading: &'static str,
    #[serde(flatten)]
    pub content: SectionContent,
}

#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SectionContent {
    Chart {
        figure: Figure,
    },
    Movers {
        months: Vec<String>,
        selected: Option<String>,
        gainers: Vec<MonthlyMoverRow>,
        losers: Vec<MonthlyMoverRow>,
    },
    Error {
        message: String,
    },
}

impl DashboardView {
    pub fn build(tables: &DashboardTables, month: Option<&str>) -> Self {
        let sections = vec![
            section("volatility", "Volatility (Top 10)", || {
                volatility_section(tables)
            }),
            section("cumulative-return", "Cumulative Return (Top 5 Stocks)", || {
                cumulative_section(tables)
            }),
            section("sector-performance", "Sector-wise Performance", || {
                sector_section(tables)
            }),
            section("correlation", "Stock Correlation Heatmap", || {
                correlation_section(tables)
            }),
            section("monthly-movers", "Monthly Top 5 Gainers & Losers", || {
                movers_section(tables, month)
            }),
        ];

        Self {
            page_title: PAGE_TITLE,
            heading: HEADING,
            sections,
        }
    }

    pub fn failed_sections(&self) -> usize {
        self.sections
            .iter()
            .filter(|s| matches!(s.content, SectionContent::Error { .. }))
            .count()
    }
}

fn section(
    id: &'static str,
    heading: &'static str,
    build: impl FnOnce() -> anyhow::Result<SectionContent>,
) -> Section {
    let content = build().unwrap_or_else(|err| {
        tracing::error!(section = id, error = %format!("{err:#}"), "section failed");
        SectionContent::Error {
            message: format!("{err:#}"),
        }
    });
    Section {
        id,
        heading,
        content,
    }
}

fn volatility_section(tables: &DashboardTables) -> anyhow::Result<SectionContent> {
    let rows = VolatilityRow::from_table(&tables.volatility)?;
    let top = volatility::top_volatile(&rows, volatility::TOP_VOLATILE);
    Ok(SectionContent::Chart {
        figure: chart::volatility_bar(&top),
    })
}

fn cumulative_section(tables: &DashboardTables) -> anyhow::Result<SectionContent> {
    let rows = CumulativeReturnRow::from_table(&tables.cumulative_return)?;
    let pivot = cumulative::pivot_top_performers(&rows, cumulative::TOP_PERFORMERS)?;
    Ok(SectionContent::Chart {
        figure: chart::cumulative_lines(&pivot),
    })
}

fn sector_section(tables: &DashboardTables) -> anyhow::Result<SectionContent> {
    let rows = SectorReturnRow::from_table(&tables.sector_performance)?;
    Ok(SectionContent::Chart {
        figure: chart::sector_bar(&sector::rank_sectors(&rows)),
    })
}

fn correlation_section(tables: &DashboardTables) -> anyhow::Result<SectionContent> {
    let rows = CorrelationRow::from_table(&tables.stock_correlation)?;
    let matrix = correlation::correlation_matrix(&rows)?;
    Ok(SectionContent::Chart {
        figure: chart::correlation_heatmap(&matrix),
    })
}

fn movers_section(
    tables: &DashboardTables,
    requested: Option<&str>,
) -> anyhow::Result<SectionContent> {
    let rows = MonthlyMoverRow::from_table(&tables.monthly_gainers_losers)?;
    let months = monthly::distinct_months(&rows);
    let selected = monthly::resolve_month(&months, requested);
    if let (Some(want), Some(got)) = (requested, selected.as_deref()) {
        if want != got {
            tracing::debug!(requested = want, selected = got, "unknown month; using default");
        }
    }

    let (gainers, losers) = match selected.as_deref() {
        Some(m) => {
            let movers = monthly::monthly_movers(&rows, m, monthly::MOVERS_PER_SIDE);
            (movers.gainers, movers.losers)
        }
        None => (Vec::new(), Vec::new()),
    };

    Ok(SectionContent::Movers {
        months,
        selected,
        gainers,
        losers,
    })
}
