//! Neighborhood density ranking
//!
//! Counts sales per neighborhood within one borough and returns both ends
//! of the ranking, for the top/bottom bar charts.

use serde::Serialize;
use std::collections::HashMap;

use crate::dataset::{Borough, EnrichedSale};

use super::error::AggregateResult;
use super::resolve_borough;

pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_BOTTOM_N: usize = 5;

/// Number of sales recorded in one neighborhood
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NeighborhoodCount {
    pub neighborhood: String,
    pub count: usize,
}

impl NeighborhoodCount {
    pub fn new(neighborhood: impl Into<String>, count: usize) -> Self {
        Self {
            neighborhood: neighborhood.into(),
            count,
        }
    }
}

/// Both ends of a borough's neighborhood ranking
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NeighborhoodRanking {
    pub borough: Borough,
    /// Highest counts first
    pub top: Vec<NeighborhoodCount>,
    /// Tail of the same descending ranking, in ranking order
    pub bottom: Vec<NeighborhoodCount>,
}

/// Rank the neighborhoods of `borough_name` by sale count.
///
/// The ranking is by count descending, ties by neighborhood name ascending.
/// `top` is its first `top_n` entries and `bottom` its last `bottom_n`; a
/// borough with fewer neighborhoods yields whatever is available, and the
/// two slices overlap when the ranking is shorter than `top_n + bottom_n`.
pub fn rank_neighborhoods(
    records: &[EnrichedSale],
    borough_name: &str,
    top_n: usize,
    bottom_n: usize,
) -> AggregateResult<NeighborhoodRanking> {
    let borough = resolve_borough(borough_name)?;
    let ranked = ranking(records, borough);

    let top = ranked.iter().take(top_n).cloned().collect();
    let bottom = ranked[ranked.len().saturating_sub(bottom_n)..].to_vec();

    Ok(NeighborhoodRanking {
        borough,
        top,
        bottom,
    })
}

/// Full descending ranking of one borough's neighborhoods
fn ranking(records: &[EnrichedSale], borough: Borough) -> Vec<NeighborhoodCount> {
    let mut counts: HashMap<&str, usize> = HashMap::new();
    for record in records.iter().filter(|r| r.borough == borough) {
        *counts.entry(record.neighborhood.as_str()).or_insert(0) += 1;
    }

    let mut ranked: Vec<NeighborhoodCount> = counts
        .into_iter()
        .map(|(name, count)| NeighborhoodCount::new(name, count))
        .collect();

    ranked.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.neighborhood.cmp(&b.neighborhood))
    });
    ranked
}
