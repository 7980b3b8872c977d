use serde::Serialize;

use super::aggregate::{compute_aggregate, PriceAggregate};
use super::chart::{colored_points, group_by_mean, pairs, GroupedPriceTable, ScatterPoint};
use super::filter::{apply_filters, FilterSelection, FilteredView};
use super::model::{Column, FieldValue, GroupColumn, LaptopRecord};
use crate::error::NoNumericData;

/// Everything the dashboard draws for one filter selection.
#[derive(Debug, Clone, Serialize)]
pub struct DashboardSnapshot {
    #[serde(skip)]
    pub view: FilteredView,
    pub record_count: usize,
    /// `Err` when the view holds no usable price.
    #[serde(serialize_with = "serialize_aggregate")]
    pub aggregate: Result<PriceAggregate, NoNumericData>,
    pub price_by_type: GroupedPriceTable,
    pub price_by_ram: GroupedPriceTable,
    pub price_by_company: GroupedPriceTable,
    /// Screen size vs price.
    pub inches_vs_price: Vec<(FieldValue, FieldValue)>,
    /// Operating system vs company, coloured by price.
    pub os_by_company: Vec<ScatterPoint>,
}

impl DashboardSnapshot {
    /// Run one full pass: filter, then aggregate and project the view.
    pub fn compute(records: &[LaptopRecord], selection: &FilterSelection) -> Self {
        let view = apply_filters(records, selection);
        let aggregate = compute_aggregate(&view);
        log::debug!(
            "recomputed dashboard: {} of {} records, aggregate ok: {}",
            view.len(),
            records.len(),
            aggregate.is_ok()
        );

        DashboardSnapshot {
            record_count: view.len(),
            aggregate,
            price_by_type: group_by_mean(&view, GroupColumn::TypeName),
            price_by_ram: group_by_mean(&view, GroupColumn::Ram),
            price_by_company: group_by_mean(&view, GroupColumn::Company),
            inches_vs_price: pairs(&view, Column::Inches, Column::Price),
            os_by_company: colored_points(&view, Column::OpSys, Column::Company, Column::Price),
            view,
        }
    }

    /// Pretty JSON of the derived tables (the raw records are left out).
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

fn serialize_aggregate<S>(
    aggregate: &Result<PriceAggregate, NoNumericData>,
    serializer: S,
) -> Result<S::Ok, S::Error>
where
    S: serde::Serializer,
{
    aggregate.as_ref().ok().serialize(serializer)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::FilterSelection;
    use crate::data::model::tests::laptop;
    use crate::data::model::FilterColumn;

    fn records() -> Vec<LaptopRecord> {
        let mut recs = vec![
            laptop(1, "Apple", "Ultrabook", FieldValue::Integer(150000)),
            laptop(2, "HP", "Notebook", FieldValue::Integer(50000)),
            laptop(3, "HP", "Notebook", FieldValue::String("N/A".into())),
        ];
        recs[0].ram_label = "16GB".into();
        recs[0].operating_system = "macOS".into();
        recs
    }

    #[test]
    fn full_pass_over_default_selection() {
        let recs = records();
        let snap = DashboardSnapshot::compute(&recs, &FilterSelection::select_all(&recs));

        assert_eq!(snap.record_count, 3);
        let agg = snap.aggregate.unwrap();
        assert_eq!(agg.mean, 100000.0);
        assert_eq!(snap.price_by_type.rows.len(), 2);
        assert_eq!(snap.price_by_ram.rows.len(), 2);
        assert_eq!(snap.price_by_company.rows[1].mean_price, Some(50000.0));
        assert_eq!(snap.inches_vs_price.len(), 2);
        assert_eq!(snap.os_by_company.len(), 3);
    }

    #[test]
    fn filtered_pass_without_prices_reports_no_numeric_data() {
        let recs = records();
        let mut selection = FilterSelection::select_all(&recs);
        selection.set(FilterColumn::Company, [FieldValue::String("HP".into())]);
        selection.set(FilterColumn::Ram, [FieldValue::String("8GB".into())]);
        let mut only_na = recs.clone();
        only_na.remove(1);

        let snap = DashboardSnapshot::compute(&only_na, &selection);
        assert_eq!(snap.record_count, 1);
        assert_eq!(snap.aggregate, Err(NoNumericData { record_count: 1 }));
        assert_eq!(snap.price_by_company.rows[0].mean_price, None);
        assert!(snap.inches_vs_price.is_empty());
    }

    #[test]
    fn empty_input_produces_empty_tables() {
        let snap = DashboardSnapshot::compute(&[], &FilterSelection::default());
        assert_eq!(snap.record_count, 0);
        assert!(snap.aggregate.is_err());
        assert!(snap.price_by_type.is_empty());
        assert!(snap.os_by_company.is_empty());
    }

    #[test]
    fn json_export_holds_derived_tables_only() {
        let recs = records();
        let snap = DashboardSnapshot::compute(&recs, &FilterSelection::default());
        let json: serde_json::Value = serde_json::from_str(&snap.to_json().unwrap()).unwrap();
        assert_eq!(json["record_count"], 3);
        assert_eq!(json["aggregate"]["priced_count"], 2);
        assert_eq!(json["price_by_type"]["column"], "TypeName");
        assert_eq!(json["price_by_type"]["rows"][0]["key"], "Ultrabook");
        assert!(json.get("view").is_none());

        let empty = DashboardSnapshot::compute(&[], &FilterSelection::default());
        let json: serde_json::Value = serde_json::from_str(&empty.to_json().unwrap()).unwrap();
        assert!(json["aggregate"].is_null());
    }
}
