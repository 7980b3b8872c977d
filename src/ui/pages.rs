use eframe::egui::{self, Color32, RichText, Ui};
use egui_extras::{Column as TableColumn, TableBuilder};

use laptop_lens::{format_price, Column, DashboardSnapshot};

const CARD_ACCENT: Color32 = Color32::from_rgb(0x0F, 0x52, 0xBA);

// ---------------------------------------------------------------------------
// Home: metric cards
// ---------------------------------------------------------------------------

/// The four metric values as displayed; prices fall back to a placeholder
/// when the view has no usable price.
pub fn metric_values(snapshot: &DashboardSnapshot) -> [(&'static str, String, &'static str); 4] {
    let price = |f: fn(&laptop_lens::PriceAggregate) -> f64| {
        snapshot
            .aggregate
            .as_ref()
            .map(|agg| format_price(f(agg)))
            .unwrap_or_else(|_| "-".to_string())
    };
    [
        ("Total Laptops", snapshot.record_count.to_string(), "All Laptops"),
        ("Average Price of Laptops", price(|a| a.mean), "All Laptops"),
        ("Maximum Price", price(|a| a.max), "High Price"),
        ("Minimum Price", price(|a| a.min), "Low Price"),
    ]
}

fn metric_card(ui: &mut Ui, title: &str, value: &str, caption: &str) {
    egui::Frame::group(ui.style())
        .stroke(egui::Stroke::new(2.0, CARD_ACCENT))
        .show(ui, |ui: &mut Ui| {
            ui.set_min_width(ui.available_width());
            ui.label(title);
            ui.heading(RichText::new(value).strong());
            ui.small(caption);
        });
}

pub fn home_page(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.heading("Laptop Specifications Analysis Dashboard");
    ui.add_space(8.0);

    let metrics = metric_values(snapshot);
    for pair in metrics.chunks(2) {
        ui.columns(2, |cols| {
            for (col, (title, value, caption)) in cols.iter_mut().zip(pair) {
                metric_card(col, title, value, caption);
            }
        });
        ui.add_space(6.0);
    }

    match &snapshot.aggregate {
        Ok(agg) if agg.unparsable_count() > 0 => {
            ui.weak(format!(
                "{} of {} laptops have no numeric price and are left out of the price figures.",
                agg.unparsable_count(),
                agg.count
            ));
        }
        Ok(_) => {}
        Err(e) => {
            ui.weak(format!("Price figures unavailable: {e}."));
        }
    }
}

// ---------------------------------------------------------------------------
// Data: table of the filtered records
// ---------------------------------------------------------------------------

pub fn data_page(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    let records = snapshot.view.records();
    ui.label(format!("{} laptops", records.len()));

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .columns(TableColumn::auto().at_least(60.0), Column::ALL.len())
        .header(20.0, |mut header| {
            for col in Column::ALL {
                header.col(|ui| {
                    ui.strong(col.name());
                });
            }
        })
        .body(|body| {
            body.rows(18.0, records.len(), |mut row| {
                let rec = &records[row.index()];
                for col in Column::ALL {
                    let text = match col {
                        Column::Price => rec.price_in_rupees.to_string(),
                        other => rec.value(other).to_string(),
                    };
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}

#[cfg(test)]
mod tests {
    use super::*;
    use laptop_lens::{FieldValue, FilterSelection, LaptopRecord};

    fn record(id: i64, price: FieldValue) -> LaptopRecord {
        LaptopRecord {
            id,
            company: "Lenovo".to_string(),
            product_name: "ThinkPad".to_string(),
            type_name: "Notebook".to_string(),
            screen_inches: Some(14.0),
            screen_resolution: "1920x1080".to_string(),
            cpu: "Intel Core i7".to_string(),
            ram_label: "16GB".to_string(),
            storage: "512GB SSD".to_string(),
            gpu: "Intel UHD".to_string(),
            operating_system: "Windows 10".to_string(),
            weight: "1.4kg".to_string(),
            price_in_rupees: price,
        }
    }

    #[test]
    fn metrics_are_formatted() {
        let recs = vec![
            record(1, FieldValue::Integer(50000)),
            record(2, FieldValue::Integer(150000)),
            record(3, FieldValue::String("N/A".into())),
        ];
        let snap = DashboardSnapshot::compute(&recs, &FilterSelection::default());
        let values: Vec<String> = metric_values(&snap).into_iter().map(|(_, v, _)| v).collect();
        assert_eq!(values, vec!["3", "1.0 lakhs", "1.5 lakhs", "50.0 thousands"]);
    }

    #[test]
    fn metrics_without_prices_show_placeholders() {
        let recs = vec![record(1, FieldValue::String("N/A".into()))];
        let snap = DashboardSnapshot::compute(&recs, &FilterSelection::default());
        let values: Vec<String> = metric_values(&snap).into_iter().map(|(_, v, _)| v).collect();
        assert_eq!(values, vec!["1", "-", "-", "-"]);
    }
}
