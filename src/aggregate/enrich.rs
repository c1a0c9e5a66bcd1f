//! Borough name enrichment

use crate::dataset::{Borough, EnrichedSale, SaleRecord};

use super::error::{AggregateError, AggregateResult};

/// Attach the catalog borough to every record.
///
/// Fails on the first code outside the catalog. `row` in the error is the
/// 1-based position of the offending record among the data records.
pub fn enrich_borough_names<I>(records: I) -> AggregateResult<Vec<EnrichedSale>>
where
    I: IntoIterator<Item = SaleRecord>,
{
    records
        .into_iter()
        .enumerate()
        .map(|(idx, record)| {
            let borough = u8::try_from(record.borough_code)
                .ok()
                .and_then(Borough::from_code)
                .ok_or(AggregateError::UnknownBoroughCode {
                    code: record.borough_code,
                    row: idx + 1,
                })?;

            Ok(EnrichedSale {
                borough,
                neighborhood: record.neighborhood,
                sale_price: record.sale_price,
                sale_date: record.sale_date,
            })
        })
        .collect()
}
