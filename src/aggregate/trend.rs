//! Monthly sale price trend

use serde::Serialize;
use std::collections::BTreeMap;

use crate::dataset::{EnrichedSale, YearMonth};

use super::error::AggregateResult;
use super::resolve_borough;

/// Summed sale price of one borough in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyTotal {
    pub borough_code: u8,
    pub borough_name: &'static str,
    pub month: YearMonth,
    pub sale_price: f64,
}

/// Sum sale prices of `borough_name` per calendar month, oldest first.
///
/// Only months with at least one sale appear; gaps are not filled.
pub fn monthly_trend(
    records: &[EnrichedSale],
    borough_name: &str,
) -> AggregateResult<Vec<MonthlyTotal>> {
    let borough = resolve_borough(borough_name)?;

    let mut months: BTreeMap<YearMonth, f64> = BTreeMap::new();
    for record in records.iter().filter(|r| r.borough == borough) {
        *months.entry(record.month()).or_insert(0.0) += record.sale_price;
    }

    Ok(months
        .into_iter()
        .map(|(month, sale_price)| MonthlyTotal {
            borough_code: borough.code(),
            borough_name: borough.name(),
            month,
            sale_price,
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::AggregateError;
    use crate::dataset::Borough;
    use chrono::NaiveDate;

    fn sale(borough: Borough, date: (i32, u32, u32), price: f64) -> EnrichedSale {
        EnrichedSale::new(
            borough,
            "ANYWHERE",
            price,
            NaiveDate::from_ymd_opt(date.0, date.1, date.2).unwrap(),
        )
    }

    #[test]
    fn test_same_month_is_summed() {
        let records = vec![
            sale(Borough::Bronx, (2016, 1, 15), 100.0),
            sale(Borough::Bronx, (2016, 1, 20), 100.0),
        ];

        let trend = monthly_trend(&records, "Bronx").unwrap();

        assert_eq!(
            trend,
            vec![MonthlyTotal {
                borough_code: 2,
                borough_name: "Bronx",
                month: YearMonth::new(2016, 1),
                sale_price: 200.0,
            }]
        );
    }

    #[test]
    fn test_chronological_across_years() {
        let records = vec![
            sale(Borough::Queens, (2017, 2, 1), 30.0),
            sale(Borough::Queens, (2016, 11, 3), 10.0),
            sale(Borough::Queens, (2017, 1, 9), 20.0),
            sale(Borough::Queens, (2016, 9, 30), 5.0),
            sale(Borough::Brooklyn, (2016, 10, 1), 1000.0),
        ];

        let trend = monthly_trend(&records, "queens").unwrap();

        let months: Vec<String> = trend.iter().map(|t| t.month.to_string()).collect();
        assert_eq!(months, ["2016-09", "2016-11", "2017-01", "2017-02"]);
        assert!(trend.iter().all(|t| t.borough_name == "Queens"));
    }

    #[test]
    fn test_totals_match_direct_sum() {
        let records = vec![
            sale(Borough::Manhattan, (2016, 9, 1), 1_250_000.0),
            sale(Borough::Manhattan, (2016, 9, 12), 0.0),
            sale(Borough::Manhattan, (2016, 12, 24), 3_400_000.0),
            sale(Borough::Manhattan, (2017, 8, 31), 785_000.0),
            sale(Borough::StatenIsland, (2017, 8, 31), 450_000.0),
        ];

        let trend = monthly_trend(&records, "Manhattan").unwrap();

        let trend_sum: f64 = trend.iter().map(|t| t.sale_price).sum();
        let direct_sum: f64 = records
            .iter()
            .filter(|r| r.borough == Borough::Manhattan)
            .map(|r| r.sale_price)
            .sum();
        assert_eq!(trend_sum, direct_sum);
        assert_eq!(trend.len(), 3);
    }

    #[test]
    fn test_empty_borough() {
        let records = vec![sale(Borough::Queens, (2017, 2, 1), 30.0)];
        assert!(monthly_trend(&records, "Bronx").unwrap().is_empty());
    }

    #[test]
    fn test_unknown_borough() {
        let err = monthly_trend(&[], "Gotham").unwrap_err();
        assert_eq!(err, AggregateError::UnknownBorough("Gotham".to_string()));
    }

    #[test]
    fn test_serialized_shape() {
        let records = vec![sale(Borough::Bronx, (2016, 1, 15), 100.0)];
        let json = serde_json::to_value(monthly_trend(&records, "Bronx").unwrap()).unwrap();

        assert_eq!(
            json,
            serde_json::json!([{
                "borough_code": 2,
                "borough_name": "Bronx",
                "month": "2016-01",
                "sale_price": 100.0
            }])
        );
    }
}
