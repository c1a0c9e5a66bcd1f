//! Sales aggregation
//!
//! Turns the loaded sales rows into the chart-ready tables of the dashboard:
//!
//! - **enrich**: borough code to catalog borough
//! - **ranking**: top/bottom neighborhoods by sale count (bar charts)
//! - **trend**: monthly sale price totals (line chart)
//! - **totals**: sale price totals per borough (choropleth)
//! - **aggregator**: [`SalesAggregator`], the above bound to one dataset
//!
//! Every function is pure; nothing here mutates the dataset.
//!
//! # Example
//!
//! ```rust
//! use borough_sales::aggregate::{enrich_borough_names, rank_neighborhoods};
//! use borough_sales::dataset::SaleRecord;
//! use chrono::NaiveDate;
//!
//! let date = NaiveDate::from_ymd_opt(2016, 9, 1).unwrap();
//! let records = enrich_borough_names(vec![
//!     SaleRecord::new(1, "SOHO", 100.0, date),
//!     SaleRecord::new(1, "SOHO", 200.0, date),
//!     SaleRecord::new(1, "TRIBECA", 50.0, date),
//! ])?;
//!
//! let ranking = rank_neighborhoods(&records, "Manhattan", 1, 1)?;
//! assert_eq!(ranking.top[0].neighborhood, "SOHO");
//! assert_eq!(ranking.bottom[0].neighborhood, "TRIBECA");
//! # Ok::<(), borough_sales::aggregate::AggregateError>(())
//! ```

pub mod aggregator;
pub mod enrich;
pub mod error;
pub mod ranking;
pub mod totals;
pub mod trend;

pub use aggregator::{BoroughDashboard, RecordPage, SalesAggregator};
pub use enrich::enrich_borough_names;
pub use error::{AggregateError, AggregateResult};
pub use ranking::{
    rank_neighborhoods, NeighborhoodCount, NeighborhoodRanking, DEFAULT_BOTTOM_N, DEFAULT_TOP_N,
};
pub use totals::{borough_totals, price_range, BoroughTotal};
pub use trend::{monthly_trend, MonthlyTotal};

use crate::dataset::Borough;

/// Resolve a selected borough name against the catalog
pub fn resolve_borough(name: &str) -> AggregateResult<Borough> {
    Borough::from_name(name).ok_or_else(|| AggregateError::UnknownBorough(name.to_string()))
}
