//! Per-borough sale price totals (choropleth input)

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::{Borough, EnrichedSale};

/// Summed sale price of one borough over the whole dataset
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoroughTotal {
    pub borough_code: u8,
    pub borough_name: &'static str,
    pub sale_price: f64,
}

/// Sum sale prices per borough, in borough code order.
///
/// Boroughs without records are omitted, so the result holds 0 to 5 entries.
pub fn borough_totals(records: &[EnrichedSale]) -> Vec<BoroughTotal> {
    let mut totals: BTreeMap<Borough, f64> = BTreeMap::new();
    for record in records {
        *totals.entry(record.borough).or_insert(0.0) += record.sale_price;
    }

    totals
        .into_iter()
        .map(|(borough, sale_price)| BoroughTotal {
            borough_code: borough.code(),
            borough_name: borough.name(),
            sale_price,
        })
        .collect()
}

/// Smallest and largest total, the colour range of the heat map
pub fn price_range(totals: &[BoroughTotal]) -> Option<(f64, f64)> {
    totals.iter().map(|t| t.sale_price).fold(None, |range, price| {
        Some(match range {
            None => (price, price),
            Some((min, max)) => (min.min(price), max.max(price)),
        })
    })
}
