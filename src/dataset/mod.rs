//! Sales dataset
//!
//! Everything read at startup:
//!
//! - **catalog**: the fixed borough code/name mapping
//! - **types**: raw and enriched sale rows, month buckets, the dataset value
//! - **loader**: sales CSV parsing
//! - **boundaries**: borough boundary GeoJSON for the choropleth
//! - **error**: load errors
//!
//! Both inputs are loaded once and never mutated; a load failure aborts
//! startup.

pub mod boundaries;
pub mod catalog;
pub mod error;
pub mod loader;
pub mod types;

pub use boundaries::{BoroughBoundaries, DEFAULT_FEATURE_ID_KEY};
pub use catalog::Borough;
pub use error::{DatasetError, DatasetResult};
pub use loader::{SalesLoader, DEFAULT_DATE_FORMAT, DEFAULT_DELIMITER};
pub use types::{EnrichedSale, SaleRecord, SalesDataset, YearMonth};
