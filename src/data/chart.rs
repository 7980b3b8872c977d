use std::collections::HashMap;

use serde::Serialize;

use super::filter::FilteredView;
use super::model::{Column, FieldValue, GroupColumn};

// ---------------------------------------------------------------------------
// Grouped mean price (pie / bar charts)
// ---------------------------------------------------------------------------

/// One group of a [`GroupedPriceTable`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupRow {
    pub key: FieldValue,
    /// Mean over the group's parsable prices; `None` if there are none.
    pub mean_price: Option<f64>,
    /// Records in the group, priced or not.
    pub count: usize,
}

/// Mean price per distinct value of a grouping column.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedPriceTable {
    pub column: GroupColumn,
    /// One row per distinct key, in order of first appearance.
    pub rows: Vec<GroupRow>,
}

impl GroupedPriceTable {
    /// `(key, mean)` for every group with a defined mean.
    pub fn means(&self) -> impl Iterator<Item = (&FieldValue, f64)> + '_ {
        self.rows
            .iter()
            .filter_map(|row| row.mean_price.map(|m| (&row.key, m)))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Default)]
struct MeanAcc {
    sum: f64,
    priced: usize,
    count: usize,
}

/// Group `view` by `column` and average the parsable prices of each group.
pub fn group_by_mean(view: &FilteredView, column: GroupColumn) -> GroupedPriceTable {
    let col = Column::from(column);
    let mut order: Vec<FieldValue> = Vec::new();
    let mut groups: HashMap<FieldValue, MeanAcc> = HashMap::new();

    for rec in view {
        let key = rec.value(col);
        let acc = groups.entry(key.clone()).or_insert_with(|| {
            order.push(key);
            MeanAcc::default()
        });
        acc.count += 1;
        if let Some(price) = rec.price() {
            acc.sum += price;
            acc.priced += 1;
        }
    }

    let rows = order
        .into_iter()
        .map(|key| {
            let acc = groups.remove(&key).unwrap_or_default();
            GroupRow {
                mean_price: (acc.priced > 0).then(|| acc.sum / acc.priced as f64),
                count: acc.count,
                key,
            }
        })
        .collect();

    GroupedPriceTable { column, rows }
}

// ---------------------------------------------------------------------------
// Unaggregated projections (scatter charts)
// ---------------------------------------------------------------------------

/// One `(x, y)` pair per record where both values are non-null.
pub fn pairs(view: &FilteredView, x: Column, y: Column) -> Vec<(FieldValue, FieldValue)> {
    view.iter()
        .map(|rec| (rec.value(x), rec.value(y)))
        .filter(|(xv, yv)| !xv.is_null() && !yv.is_null())
        .collect()
}

/// A scatter point with an extra colour dimension.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub x: FieldValue,
    pub y: FieldValue,
    /// May be null; the point is still drawn, in a neutral colour.
    pub color: FieldValue,
}

/// Like [`pairs`], carrying `color` along for each point.
pub fn colored_points(view: &FilteredView, x: Column, y: Column, color: Column) -> Vec<ScatterPoint> {
    view.iter()
        .filter_map(|rec| {
            let (xv, yv) = (rec.value(x), rec.value(y));
            if xv.is_null() || yv.is_null() {
                return None;
            }
            Some(ScatterPoint {
                x: xv,
                y: yv,
                color: rec.value(color),
            })
        })
        .collect()
}
