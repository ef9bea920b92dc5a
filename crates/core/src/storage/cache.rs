use crate::domain::table::Table;
use crate::storage::tables::{SourceTable, TableSource};
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

/// Snapshots of all five metric tables for one render.
#[derive(Debug, Clone)]
pub struct DashboardTables {
    pub volatility: Arc<Table>,
    pub cumulative_return: Arc<Table>,
    pub sector_performance: Arc<Table>,
    pub stock_correlation: Arc<Table>,
    pub monthly_gainers_losers: Arc<Table>,
}

/// Per-table memoization of full-table loads.
///
/// Entries expire a fixed duration after they were loaded. A miss (or an expired entry) is
/// refilled inline by the caller, and concurrent callers for the same table wait on the one
/// load in flight. Failed loads are not stored.
#[derive(Clone)]
pub struct TableCache {
    source: Arc<dyn TableSource>,
    entries: Cache<SourceTable, Arc<Table>>,
}

impl TableCache {
    pub fn new(source: Arc<dyn TableSource>, ttl: Duration) -> Self {
        let entries = Cache::builder()
            .max_capacity(64)
            .time_to_live(ttl)
            .build();
        Self { source, entries }
    }

    pub async fn get(&self, table: SourceTable) -> anyhow::Result<Arc<Table>> {
        let source = Arc::clone(&self.source);
        self.entries
            .try_get_with(table, async move {
                tracing::info!(%table, "table cache miss; loading");
                source.fetch_table(table).await.map(Arc::new)
            })
            .await
            .map_err(|e| anyhow::anyhow!("load {table} failed: {e:#}"))
    }

    pub async fn load_all(&self) -> anyhow::Result<DashboardTables> {
        Ok(DashboardTables {
            volatility: self.get(SourceTable::Volatility).await?,
            cumulative_return: self.get(SourceTable::CumulativeReturn).await?,
            sector_performance: self.get(SourceTable::SectorPerformance).await?,
            stock_correlation: self.get(SourceTable::StockCorrelation).await?,
            monthly_gainers_losers: self.get(SourceTable::MonthlyGainersLosers).await?,
        })
    }
}
