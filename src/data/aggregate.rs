use serde::Serialize;

use super::filter::FilteredView;
use crate::error::NoNumericData;

/// Scalar price summary over a filtered view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PriceAggregate {
    /// All records in the view, priced or not.
    pub count: usize,
    /// Records whose price parsed; mean/max/min are taken over these only.
    pub priced_count: usize,
    pub mean: f64,
    pub max: f64,
    pub min: f64,
}

impl PriceAggregate {
    /// Records left out of the numeric statistics.
    pub fn unparsable_count(&self) -> usize {
        self.count - self.priced_count
    }
}

/// Summarise the prices of `view`.
///
/// Unparsable prices are counted in `count` but excluded from the statistics.
/// Fails with [`NoNumericData`] when no record has a usable price.
pub fn compute_aggregate(view: &FilteredView) -> Result<PriceAggregate, NoNumericData> {
    let count = view.len();
    let mut priced_count = 0usize;
    let mut sum = 0.0;
    let mut max = f64::NEG_INFINITY;
    let mut min = f64::INFINITY;

    for price in view.iter().filter_map(|r| r.price()) {
        priced_count += 1;
        sum += price;
        max = max.max(price);
        min = min.min(price);
    }

    if priced_count == 0 {
        return Err(NoNumericData {
            record_count: count,
        });
    }

    Ok(PriceAggregate {
        count,
        priced_count,
        mean: sum / priced_count as f64,
        max,
        min,
    })
}

/// Render a price in Indian units:
/// * `>= 100_000` → lakhs, one decimal
/// * `>= 1_000`   → thousands, one decimal
/// * otherwise    → the raw value, two decimals, suffixed "hundreds"
pub fn format_price(value: f64) -> String {
    if value >= 100_000.0 {
        format!("{:.1} lakhs", value / 100_000.0)
    } else if value >= 1_000.0 {
        format!("{:.1} thousands", value / 1_000.0)
    } else {
        format!("{value:.2} hundreds")
    }
}
