//! SalesAggregator
//!
//! Binds the aggregations to one loaded dataset. The dataset is shared
//! read-only, so an aggregator can serve any number of concurrent
//! selections. Borough totals don't depend on the selection and are
//! computed on first use, then reused.

use serde::Serialize;
use std::sync::{Arc, OnceLock};

use crate::dataset::{Borough, EnrichedSale, SalesDataset};

use super::error::AggregateResult;
use super::ranking::{rank_neighborhoods, NeighborhoodRanking};
use super::resolve_borough;
use super::totals::{borough_totals, BoroughTotal};
use super::trend::{monthly_trend, MonthlyTotal};

/// Everything the dashboard re-renders when the borough selection changes
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughDashboard {
    pub borough: Borough,
    pub neighborhoods: NeighborhoodRanking,
    pub trend: Vec<MonthlyTotal>,
}

/// One page of the raw data table
#[derive(Debug, Serialize)]
pub struct RecordPage<'a> {
    /// Rows matching the filter, before paging
    pub total: usize,
    pub offset: usize,
    pub records: Vec<&'a EnrichedSale>,
}

/// Query front-end over an immutable sales dataset
pub struct SalesAggregator {
    dataset: Arc<SalesDataset>,
    totals: OnceLock<Vec<BoroughTotal>>,
}

impl SalesAggregator {
    pub fn new(dataset: Arc<SalesDataset>) -> Self {
        Self {
            dataset,
            totals: OnceLock::new(),
        }
    }

    pub fn dataset(&self) -> &SalesDataset {
        &self.dataset
    }

    /// Top/bottom neighborhoods of a borough by sale count
    pub fn rank_neighborhoods(
        &self,
        borough_name: &str,
        top_n: usize,
        bottom_n: usize,
    ) -> AggregateResult<NeighborhoodRanking> {
        rank_neighborhoods(self.dataset.records(), borough_name, top_n, bottom_n)
    }

    /// Monthly sale price totals of a borough
    pub fn monthly_trend(&self, borough_name: &str) -> AggregateResult<Vec<MonthlyTotal>> {
        monthly_trend(self.dataset.records(), borough_name)
    }

    /// Sale price totals of every borough present in the dataset
    pub fn borough_totals(&self) -> &[BoroughTotal] {
        self.totals
            .get_or_init(|| borough_totals(self.dataset.records()))
            .as_slice()
    }

    /// Recompute the borough-scoped views for one selection
    pub fn dashboard(
        &self,
        borough_name: &str,
        top_n: usize,
        bottom_n: usize,
    ) -> AggregateResult<BoroughDashboard> {
        let neighborhoods = self.rank_neighborhoods(borough_name, top_n, bottom_n)?;
        let trend = self.monthly_trend(borough_name)?;

        tracing::debug!(
            borough = %neighborhoods.borough,
            months = trend.len(),
            "Computed borough dashboard"
        );

        Ok(BoroughDashboard {
            borough: neighborhoods.borough,
            neighborhoods,
            trend,
        })
    }

    /// Rows of the data table, optionally restricted to one borough
    pub fn records(
        &self,
        borough_name: Option<&str>,
        offset: usize,
        limit: usize,
    ) -> AggregateResult<RecordPage<'_>> {
        let filtered = self.filtered(borough_name)?;

        Ok(RecordPage {
            total: filtered.len(),
            offset,
            records: filtered.into_iter().skip(offset).take(limit).collect(),
        })
    }

    /// All rows, optionally restricted to one borough
    pub fn filtered(&self, borough_name: Option<&str>) -> AggregateResult<Vec<&EnrichedSale>> {
        let borough = borough_name.map(resolve_borough).transpose()?;

        Ok(self
            .dataset
            .records()
            .iter()
            .filter(|r| borough.map_or(true, |b| r.borough == b))
            .collect())
    }
}
