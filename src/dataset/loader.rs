//! Sales CSV loader
//!
//! Reads the NYC rolling sales CSV into [`SaleRecord`]s. Columns are located
//! by header name, so extra columns and column order don't matter. Any
//! malformed row aborts the load with its line number.

use chrono::{DateTime, NaiveDate, NaiveDateTime};
use std::io::Read;
use std::path::Path;

use super::error::{DatasetError, DatasetResult};
use super::types::SaleRecord;
use crate::config::DataConfig;

pub const BOROUGH_COLUMN: &str = "BOROUGH";
pub const NEIGHBORHOOD_COLUMN: &str = "NEIGHBORHOOD";
pub const SALE_PRICE_COLUMN: &str = "SALE PRICE";
pub const SALE_DATE_COLUMN: &str = "SALE DATE";

pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DELIMITER: char = ',';

/// Date layouts tried after the configured one
const FALLBACK_DATE_FORMATS: [&str; 5] = [
    "%Y-%m-%d",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M:%S",
    "%m/%d/%Y",
    "%Y/%m/%d",
];

/// Positions of the required columns in a header row
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct ColumnMap {
    borough: usize,
    neighborhood: usize,
    sale_price: usize,
    sale_date: usize,
}

impl ColumnMap {
    fn from_headers(headers: &csv::StringRecord) -> DatasetResult<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
                .ok_or_else(|| DatasetError::MissingColumn(name.to_string()))
        };

        Ok(Self {
            borough: find(BOROUGH_COLUMN)?,
            neighborhood: find(NEIGHBORHOOD_COLUMN)?,
            sale_price: find(SALE_PRICE_COLUMN)?,
            sale_date: find(SALE_DATE_COLUMN)?,
        })
    }
}

/// CSV loader for the sales dataset
pub struct SalesLoader {
    /// Format tried first when parsing sale dates
    date_format: String,
    delimiter: u8,
}

impl Default for SalesLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl SalesLoader {
    pub fn new() -> Self {
        Self {
            date_format: DEFAULT_DATE_FORMAT.to_string(),
            delimiter: DEFAULT_DELIMITER as u8,
        }
    }

    /// Loader for the `[data]` section's date format and delimiter
    pub fn from_config(config: &DataConfig) -> DatasetResult<Self> {
        if !config.delimiter.is_ascii() {
            return Err(DatasetError::InvalidDelimiter(config.delimiter));
        }

        Ok(Self::new()
            .with_date_format(&config.date_format)
            .with_delimiter(config.delimiter as u8))
    }

    /// Set the preferred sale date format (strftime)
    pub fn with_date_format(mut self, format: &str) -> Self {
        self.date_format = format.to_string();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Load all records from a CSV file
    pub fn load(&self, path: &Path) -> DatasetResult<Vec<SaleRecord>> {
        let file = std::fs::File::open(path).map_err(|source| DatasetError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let records = self.load_reader(file)?;
        tracing::debug!(path = ?path, rows = records.len(), "Loaded sales CSV");
        Ok(records)
    }

    /// Load from a CSV string (useful for testing)
    pub fn load_str(&self, csv_data: &str) -> DatasetResult<Vec<SaleRecord>> {
        self.load_reader(csv_data.as_bytes())
    }

    /// Load from any reader producing CSV with a header row
    pub fn load_reader<R: Read>(&self, reader: R) -> DatasetResult<Vec<SaleRecord>> {
        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .delimiter(self.delimiter)
            .from_reader(reader);

        let columns = ColumnMap::from_headers(reader.headers()?)?;
        let mut records = Vec::new();

        for (idx, result) in reader.records().enumerate() {
            let record = result?;
            let line = record
                .position()
                .map(|p| p.line() as usize)
                .unwrap_or(idx + 2);

            let sale = self
                .parse_row(&record, &columns)
                .map_err(|message| DatasetError::InvalidRow { line, message })?;
            records.push(sale);
        }

        Ok(records)
    }

    fn parse_row(
        &self,
        record: &csv::StringRecord,
        columns: &ColumnMap,
    ) -> Result<SaleRecord, String> {
        let field = |idx: usize, name: &str| {
            record
                .get(idx)
                .map(str::trim)
                .ok_or_else(|| format!("missing {} value", name))
        };

        let code_str = field(columns.borough, BOROUGH_COLUMN)?;
        let borough_code = code_str
            .parse::<i64>()
            .map_err(|_| format!("invalid borough code '{}'", code_str))?;

        let neighborhood = field(columns.neighborhood, NEIGHBORHOOD_COLUMN)?;
        if neighborhood.is_empty() {
            return Err("empty neighborhood".to_string());
        }

        let sale_price = parse_price(field(columns.sale_price, SALE_PRICE_COLUMN)?)?;
        let sale_date = self.parse_date(field(columns.sale_date, SALE_DATE_COLUMN)?)?;

        Ok(SaleRecord::new(
            borough_code,
            neighborhood,
            sale_price,
            sale_date,
        ))
    }

    /// Parse a sale date, trying the configured format first
    fn parse_date(&self, s: &str) -> Result<NaiveDate, String> {
        let formats = std::iter::once(self.date_format.as_str()).chain(FALLBACK_DATE_FORMATS);

        for fmt in formats {
            if let Ok(date) = NaiveDate::parse_from_str(s, fmt) {
                return Ok(date);
            }
            if let Ok(dt) = NaiveDateTime::parse_from_str(s, fmt) {
                return Ok(dt.date());
            }
        }

        if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
            return Ok(dt.date_naive());
        }

        Err(format!("invalid sale date '{}'", s))
    }
}

/// Parse a sale price such as `650000`, `650000.0` or `$1,250,000`
fn parse_price(s: &str) -> Result<f64, String> {
    let cleaned: String = s
        .strip_prefix('$')
        .unwrap_or(s)
        .chars()
        .filter(|c| *c != ',')
        .collect();

    match cleaned.trim().parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 => Ok(value),
        _ => Err(format!("invalid sale price '{}'", s)),
    }
}
