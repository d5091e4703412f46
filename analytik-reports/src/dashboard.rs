//! One recomputation pass per filter change over a memoized base table.

use analytik_core::{FilterEngine, FilterOptions, FilterState, TransactionRecord};
use analytik_ingest::{ExportOptions, IngestError, LoadDiagnostics, SourceTable, export_csv};
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::error::ReportError;
use crate::kpi::{ComparativeKpi, ComparativePeriodResult};
use crate::measure::{EntityKey, Measure};
use crate::ranking::{RankingAggregator, RankingResult};
use crate::trend::TrendSeries;

/// Produces a fresh [`SourceTable`] when the cache is empty or reloaded.
pub type Loader = Box<dyn Fn() -> Result<SourceTable, IngestError>>;

/// Load-once, read-many holder of the base table.
///
/// Only `get_or_load` and `reload` write; readers get a shared, immutable
/// handle that stays valid after an invalidation.
#[derive(Debug, Default)]
pub struct TableCache {
    table: Option<Arc<SourceTable>>,
}

impl TableCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(table: SourceTable) -> Self {
        Self { table: Some(Arc::new(table)) }
    }

    pub fn get(&self) -> Option<Arc<SourceTable>> {
        self.table.clone()
    }

    pub fn is_loaded(&self) -> bool {
        self.table.is_some()
    }

    pub fn get_or_load<F>(&mut self, load: F) -> Result<Arc<SourceTable>, IngestError>
    where
        F: FnOnce() -> Result<SourceTable, IngestError>,
    {
        if let Some(table) = &self.table {
            return Ok(Arc::clone(table));
        }
        self.reload(load)
    }

    /// Replace the cached table. On failure the previous table is kept.
    pub fn reload<F>(&mut self, load: F) -> Result<Arc<SourceTable>, IngestError>
    where
        F: FnOnce() -> Result<SourceTable, IngestError>,
    {
        let table = Arc::new(load()?);
        info!(
            rows = table.records.len(),
            dropped = table.diagnostics.total_rows - table.diagnostics.kept_rows(),
            "sales table cached"
        );
        self.table = Some(Arc::clone(&table));
        Ok(table)
    }

    pub fn invalidate(&mut self) {
        self.table = None;
    }
}

/// Everything a renderer needs after one filter change.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub filter: FilterState,
    pub kpis: ComparativePeriodResult,
    pub top_customers: RankingResult,
    pub trend: TrendSeries,
    pub records: Vec<TransactionRecord>,
    pub options: FilterOptions,
    pub diagnostics: LoadDiagnostics,
}

impl DashboardSnapshot {
    /// Pure function of the table and the filter state.
    pub fn compute(table: &SourceTable, state: &FilterState) -> Self {
        let records = FilterEngine::apply(&table.records, state);

        let kpis = ComparativeKpi::compute(&records);
        let top_customers = RankingAggregator::top_entities(
            &records,
            EntityKey::Customer,
            Measure::Amount,
            state.top_n,
        );
        let trend = TrendSeries::monthly(&records, Measure::Amount);

        debug!(
            filtered = records.len(),
            current = ?kpis.current_period,
            prior = ?kpis.prior_period,
            months = trend.points.len(),
            "dashboard recomputed"
        );

        Self {
            filter: state.clone(),
            kpis,
            top_customers,
            trend,
            records,
            options: FilterOptions::from_records(&table.records, &table.calendar),
            diagnostics: table.diagnostics,
        }
    }
}

/// Request/response entry point: one full pass per `refresh`.
pub struct Dashboard {
    cache: TableCache,
    loader: Option<Loader>,
}

impl Dashboard {
    pub fn new<F>(loader: F) -> Self
    where
        F: Fn() -> Result<SourceTable, IngestError> + 'static,
    {
        Self {
            cache: TableCache::new(),
            loader: Some(Box::new(loader)),
        }
    }

    /// A dashboard over an already-loaded table. It cannot reload.
    pub fn from_table(table: SourceTable) -> Self {
        Self {
            cache: TableCache::with_table(table),
            loader: None,
        }
    }

    pub fn table(&mut self) -> Result<Arc<SourceTable>, ReportError> {
        if let Some(table) = self.cache.get() {
            return Ok(table);
        }
        let loader = self.loader.as_ref().ok_or(ReportError::NotLoaded)?;
        Ok(self.cache.get_or_load(loader)?)
    }

    pub fn reload(&mut self) -> Result<Arc<SourceTable>, ReportError> {
        let loader = self.loader.as_ref().ok_or(ReportError::NotLoaded)?;
        Ok(self.cache.reload(loader)?)
    }

    pub fn invalidate(&mut self) {
        self.cache.invalidate();
    }

    pub fn is_loaded(&self) -> bool {
        self.cache.is_loaded()
    }

    pub fn refresh(&mut self, state: &FilterState) -> Result<DashboardSnapshot, ReportError> {
        let table = self.table()?;
        Ok(DashboardSnapshot::compute(&table, state))
    }

    /// CSV projection of the records that pass `state`.
    pub fn export(
        &mut self,
        state: &FilterState,
        options: ExportOptions,
    ) -> Result<Vec<u8>, ReportError> {
        let table = self.table()?;
        let records = FilterEngine::apply(&table.records, state);
        Ok(export_csv(&table, &records, options)?)
    }
}
