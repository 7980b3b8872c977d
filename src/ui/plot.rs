use std::f64::consts::{PI, TAU};

use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{Bar, BarChart, GridMark, Legend, Plot, PlotPoint, PlotPoints, Points, Polygon, Text};

use laptop_lens::{format_price, DashboardSnapshot, FieldValue, GroupedPriceTable, ScatterPoint};

use crate::color::{price_gradient, ColorMap};

const CHART_HEIGHT: f32 = 320.0;

/// Price bands used to colour the company/OS scatter.
const PRICE_BANDS: usize = 5;

// ---------------------------------------------------------------------------
// Charts page (central panel)
// ---------------------------------------------------------------------------

/// Render every chart for the current snapshot.
pub fn charts_page(ui: &mut Ui, snapshot: &DashboardSnapshot) {
    ui.columns(2, |cols| {
        pie_chart(
            &mut cols[0],
            "pie_type",
            "Average Price by Laptop Type",
            &snapshot.price_by_type,
        );
        pie_chart(
            &mut cols[1],
            "pie_ram",
            "Average Price by RAM Capacity",
            &snapshot.price_by_ram,
        );
    });
    ui.separator();

    bar_chart(
        ui,
        "Price Distribution of Laptops Across Companies",
        &snapshot.price_by_company,
    );
    ui.separator();

    inches_scatter(ui, &snapshot.inches_vs_price);
    ui.separator();

    os_company_scatter(ui, &snapshot.os_by_company);
}

// ---------------------------------------------------------------------------
// Pie: share of the summed group means
// ---------------------------------------------------------------------------

/// One wedge of a pie, in radians.
#[derive(Debug, Clone, PartialEq)]
pub struct Wedge {
    pub key: FieldValue,
    pub start: f64,
    pub end: f64,
    pub share: f64,
}

/// Split the circle between groups in proportion to their mean price.
/// Groups without a defined mean, or with a non-positive one, get no wedge.
pub fn pie_wedges(table: &GroupedPriceTable) -> Vec<Wedge> {
    let slices: Vec<(&FieldValue, f64)> = table.means().filter(|(_, m)| *m > 0.0).collect();
    let total: f64 = slices.iter().map(|(_, m)| m).sum();
    if total <= 0.0 {
        return Vec::new();
    }

    let mut start = 0.0;
    slices
        .into_iter()
        .map(|(key, mean)| {
            let share = mean / total;
            let end = start + share * TAU;
            let wedge = Wedge {
                key: key.clone(),
                start,
                end,
                share,
            };
            start = end;
            wedge
        })
        .collect()
}

/// Outlines for one wedge: the center, then the arc sampled every ~2 degrees.
/// Polygons must be convex, so wedges wider than a half turn are split.
pub fn sector_outlines(wedge: &Wedge) -> Vec<Vec<[f64; 2]>> {
    let span = wedge.end - wedge.start;
    let pieces = ((span / PI).ceil() as usize).max(1);
    (0..pieces)
        .map(|p| {
            let from = wedge.start + span * p as f64 / pieces as f64;
            let to = wedge.start + span * (p + 1) as f64 / pieces as f64;
            let steps = (((to - from) / TAU * 180.0).ceil() as usize).max(1);
            let mut points = vec![[0.0, 0.0]];
            points.extend((0..=steps).map(|i| {
                let a = from + (to - from) * i as f64 / steps as f64;
                [a.cos(), a.sin()]
            }));
            points
        })
        .collect()
}

fn pie_chart(ui: &mut Ui, id: &str, title: &str, table: &GroupedPriceTable) {
    ui.strong(title);
    let wedges = pie_wedges(table);
    if wedges.is_empty() {
        ui.label("No priced laptops in the selection.");
        return;
    }
    let colors = ColorMap::new(wedges.iter().map(|w| &w.key));

    Plot::new(id)
        .height(CHART_HEIGHT)
        .data_aspect(1.0)
        .show_axes(false)
        .show_grid(false)
        .allow_drag(false)
        .allow_zoom(false)
        .allow_scroll(false)
        .allow_boxed_zoom(false)
        .legend(Legend::default())
        .show(ui, |plot_ui| {
            for wedge in &wedges {
                let color = colors.color_for(&wedge.key);
                for outline in sector_outlines(wedge) {
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::new(outline))
                            .name(wedge.key.to_string())
                            .fill_color(color)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );
                }

                let mid = (wedge.start + wedge.end) / 2.0;
                plot_ui.text(Text::new(
                    PlotPoint::new(0.65 * mid.cos(), 0.65 * mid.sin()),
                    RichText::new(format!("{}\n{:.1}%", wedge.key, wedge.share * 100.0))
                        .color(Color32::BLACK),
                ));
            }
        });
}

// ---------------------------------------------------------------------------
// Bar: mean price per company
// ---------------------------------------------------------------------------

fn bar_chart(ui: &mut Ui, title: &str, table: &GroupedPriceTable) {
    ui.strong(title);
    let groups: Vec<(String, f64)> = table.means().map(|(k, m)| (k.to_string(), m)).collect();
    if groups.is_empty() {
        ui.label("No priced laptops in the selection.");
        return;
    }
    let colors = ColorMap::new(table.means().map(|(k, _)| k));

    let bars: Vec<Bar> = table
        .means()
        .enumerate()
        .map(|(i, (key, mean))| {
            Bar::new(i as f64, mean)
                .name(key.to_string())
                .fill(colors.color_for(key))
                .width(0.7)
        })
        .collect();
    let labels: Vec<String> = groups.iter().map(|(k, _)| k.clone()).collect();

    Plot::new("bar_company")
        .height(CHART_HEIGHT)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .y_axis_label("price_in_rupees")
        .allow_drag(false)
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("Average price"));
            for (i, (_, mean)) in groups.iter().enumerate() {
                plot_ui.text(Text::new(
                    PlotPoint::new(i as f64, mean * 1.04),
                    format_price(*mean),
                ));
            }
        });
}

/// Label for an integer grid position on a categorical axis.
fn category_label(labels: &[String], value: f64) -> String {
    if value < 0.0 || value.fract().abs() > 1e-9 {
        return String::new();
    }
    labels.get(value as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Scatter: screen size vs price
// ---------------------------------------------------------------------------

fn inches_scatter(ui: &mut Ui, pairs: &[(FieldValue, FieldValue)]) {
    ui.strong("Price-wise Breakdown of Laptop Inches");
    let points: Vec<[f64; 2]> = pairs
        .iter()
        .filter_map(|(x, y)| Some([x.as_f64()?, y.as_f64()?]))
        .collect();

    Plot::new("scatter_inches")
        .height(CHART_HEIGHT)
        .x_axis_label("Inches")
        .y_axis_label("Price in Rupees")
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(PlotPoints::new(points))
                    .radius(5.0)
                    .color(Color32::from_rgb(0x0F, 0x52, 0xBA))
                    .name("Laptops"),
            );
        });
}

// ---------------------------------------------------------------------------
// Scatter: operating system vs company, coloured by price
// ---------------------------------------------------------------------------

/// Categorical scatter laid out on integer grid positions.
#[derive(Debug, Default)]
pub struct CategoryScatter {
    pub x_labels: Vec<String>,
    pub y_labels: Vec<String>,
    /// Points per price band, cheapest first; `None` band for missing prices.
    pub bands: Vec<(String, Option<usize>, Vec<[f64; 2]>)>,
}

/// Place categorical points on a grid and bucket them into price bands.
pub fn layout_category_scatter(points: &[ScatterPoint]) -> CategoryScatter {
    let mut x_labels: Vec<String> = Vec::new();
    let mut y_labels: Vec<String> = Vec::new();
    let index_of = |labels: &mut Vec<String>, v: &FieldValue| -> usize {
        let label = v.to_string();
        match labels.iter().position(|l| *l == label) {
            Some(i) => i,
            None => {
                labels.push(label);
                labels.len() - 1
            }
        }
    };

    let prices: Vec<f64> = points.iter().filter_map(|p| p.color.as_f64()).collect();
    let min = prices.iter().copied().fold(f64::INFINITY, f64::min);
    let max = prices.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let width = (max - min) / PRICE_BANDS as f64;

    let mut banded: Vec<Vec<[f64; 2]>> = vec![Vec::new(); PRICE_BANDS];
    let mut unpriced: Vec<[f64; 2]> = Vec::new();
    for p in points {
        let xy = [
            index_of(&mut x_labels, &p.x) as f64,
            index_of(&mut y_labels, &p.y) as f64,
        ];
        match p.color.as_f64() {
            Some(price) if width > 0.0 => {
                let band = (((price - min) / width) as usize).min(PRICE_BANDS - 1);
                banded[band].push(xy);
            }
            Some(_) => banded[0].push(xy),
            None => unpriced.push(xy),
        }
    }

    let mut bands: Vec<(String, Option<usize>, Vec<[f64; 2]>)> = banded
        .into_iter()
        .enumerate()
        .filter(|(_, pts)| !pts.is_empty())
        .map(|(i, pts)| {
            let lo = min + width * i as f64;
            let hi = if width > 0.0 { lo + width } else { max };
            let name = format!("{} – {}", format_price(lo), format_price(hi));
            (name, Some(i), pts)
        })
        .collect();
    if !unpriced.is_empty() {
        bands.push(("No price".to_string(), None, unpriced));
    }

    CategoryScatter {
        x_labels,
        y_labels,
        bands,
    }
}

fn os_company_scatter(ui: &mut Ui, points: &[ScatterPoint]) {
    ui.strong("Company-wise Breakdown of Operating Systems");
    let layout = layout_category_scatter(points);
    let CategoryScatter {
        x_labels,
        y_labels,
        bands,
    } = layout;

    Plot::new("scatter_os_company")
        .height(CHART_HEIGHT + 80.0)
        .legend(Legend::default())
        .x_axis_label("OpSys")
        .y_axis_label("Company")
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&x_labels, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| category_label(&y_labels, mark.value))
        .show(ui, |plot_ui| {
            for (name, band, pts) in bands {
                let color = match band {
                    Some(i) => price_gradient(i as f64 / (PRICE_BANDS - 1) as f64),
                    None => Color32::GRAY,
                };
                plot_ui.points(
                    Points::new(PlotPoints::new(pts))
                        .radius(6.0)
                        .color(color.gamma_multiply(0.8))
                        .name(name),
                );
            }
        });
}
