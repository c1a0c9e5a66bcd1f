//! Core data types for the sales dataset
//!
//! - `SaleRecord`: one raw row of the rolling sales CSV
//! - `EnrichedSale`: a row with its catalog borough attached
//! - `YearMonth`: calendar-month bucket used by the price trend
//! - `SalesDataset`: the immutable, loaded-once collection of enriched rows

use chrono::{DateTime, Datelike, NaiveDate, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use std::collections::BTreeSet;
use std::path::PathBuf;

use super::catalog::Borough;

/// One property sale as read from the dataset, before enrichment
#[derive(Debug, Clone, PartialEq)]
pub struct SaleRecord {
    /// Raw borough code, unvalidated until enrichment
    pub borough_code: i64,
    pub neighborhood: String,
    /// Non-negative; zero for non-arm's-length transfers
    pub sale_price: f64,
    pub sale_date: NaiveDate,
}

impl SaleRecord {
    pub fn new(
        borough_code: i64,
        neighborhood: impl Into<String>,
        sale_price: f64,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            borough_code,
            neighborhood: neighborhood.into(),
            sale_price,
            sale_date,
        }
    }
}

/// A sale record whose borough code resolved against the catalog
#[derive(Debug, Clone, PartialEq)]
pub struct EnrichedSale {
    pub borough: Borough,
    pub neighborhood: String,
    pub sale_price: f64,
    pub sale_date: NaiveDate,
}

impl EnrichedSale {
    pub fn new(
        borough: Borough,
        neighborhood: impl Into<String>,
        sale_price: f64,
        sale_date: NaiveDate,
    ) -> Self {
        Self {
            borough,
            neighborhood: neighborhood.into(),
            sale_price,
            sale_date,
        }
    }

    pub fn month(&self) -> YearMonth {
        YearMonth::from_date(self.sale_date)
    }
}

impl Serialize for EnrichedSale {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut row = serializer.serialize_struct("EnrichedSale", 5)?;
        row.serialize_field("borough_code", &self.borough.code())?;
        row.serialize_field("borough_name", self.borough.name())?;
        row.serialize_field("neighborhood", &self.neighborhood)?;
        row.serialize_field("sale_price", &self.sale_price)?;
        row.serialize_field("sale_date", &self.sale_date)?;
        row.end()
    }
}

/// Calendar-month bucket.
///
/// Ordering is chronological (year, then month). Serializes as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct YearMonth {
    pub year: i32,
    /// 1-12
    pub month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Self {
        Self { year, month }
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }
}

impl std::fmt::Display for YearMonth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl Serialize for YearMonth {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The loaded dataset. Read-only after construction.
#[derive(Debug, Clone)]
pub struct SalesDataset {
    records: Vec<EnrichedSale>,
    /// File the rows came from, if any
    source: Option<PathBuf>,
    loaded_at: DateTime<Utc>,
}

impl SalesDataset {
    pub fn new(records: Vec<EnrichedSale>) -> Self {
        Self {
            records,
            source: None,
            loaded_at: Utc::now(),
        }
    }

    /// Builder method: record where the rows were loaded from
    pub fn source(mut self, path: impl Into<PathBuf>) -> Self {
        self.source = Some(path.into());
        self
    }

    pub fn records(&self) -> &[EnrichedSale] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn source_path(&self) -> Option<&PathBuf> {
        self.source.as_ref()
    }

    pub fn loaded_at(&self) -> DateTime<Utc> {
        self.loaded_at
    }

    /// Boroughs with at least one record, in code order
    pub fn boroughs_present(&self) -> Vec<Borough> {
        self.records
            .iter()
            .map(|r| r.borough)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_year_month_ordering() {
        let mut months = vec![
            YearMonth::new(2017, 1),
            YearMonth::new(2016, 12),
            YearMonth::new(2016, 9),
        ];
        months.sort();
        assert_eq!(
            months,
            vec![
                YearMonth::new(2016, 9),
                YearMonth::new(2016, 12),
                YearMonth::new(2017, 1),
            ]
        );
    }

    #[test]
    fn test_year_month_display() {
        assert_eq!(YearMonth::from_date(date(2016, 1, 15)).to_string(), "2016-01");
        assert_eq!(
            serde_json::to_string(&YearMonth::new(2017, 8)).unwrap(),
            "\"2017-08\""
        );
    }

    #[test]
    fn test_enriched_sale_serialization() {
        let sale = EnrichedSale::new(Borough::StatenIsland, "ANNADALE", 510000.0, date(2017, 3, 2));
        let json = serde_json::to_value(&sale).unwrap();

        assert_eq!(json["borough_code"], 5);
        assert_eq!(json["borough_name"], "Staten Island");
        assert_eq!(json["neighborhood"], "ANNADALE");
        assert_eq!(json["sale_price"], 510000.0);
        assert_eq!(json["sale_date"], "2017-03-02");
    }

    #[test]
    fn test_boroughs_present() {
        let dataset = SalesDataset::new(vec![
            EnrichedSale::new(Borough::Queens, "ASTORIA", 1.0, date(2016, 9, 1)),
            EnrichedSale::new(Borough::Manhattan, "SOHO", 1.0, date(2016, 9, 1)),
            EnrichedSale::new(Borough::Queens, "ASTORIA", 1.0, date(2016, 9, 2)),
        ]);

        assert_eq!(dataset.len(), 3);
        assert_eq!(
            dataset.boroughs_present(),
            vec![Borough::Manhattan, Borough::Queens]
        );
    }
}
