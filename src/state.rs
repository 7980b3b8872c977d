use std::path::Path;

use anyhow::{Context, Result};

use laptop_lens::data::source::{load_dataset, SourceSpec};
use laptop_lens::{DashboardSnapshot, FieldValue, FilterColumn, FilterSelection, LaptopDataset};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Which view the central panel shows.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Charts,
    Data,
}

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Loaded dataset (None until a source is loaded).
    pub dataset: Option<LaptopDataset>,

    /// Per-column filter selections.
    pub selection: FilterSelection,

    /// Metrics and chart tables for the current selection.
    pub snapshot: Option<DashboardSnapshot>,

    /// Active page of the main menu.
    pub page: Page,

    /// Table read from DuckDB sources.
    pub table: String,

    /// Where the current dataset came from.
    pub source_label: Option<String>,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    pub fn new(table: &str) -> Self {
        Self {
            dataset: None,
            selection: FilterSelection::default(),
            snapshot: None,
            page: Page::Home,
            table: table.to_string(),
            source_label: None,
            status_message: None,
        }
    }

    /// Fetch from `spec` and replace the dataset. A failed load keeps the
    /// previous dataset and reports the error.
    pub fn load(&mut self, spec: &SourceSpec) {
        let source = spec.open();
        match load_dataset(source.as_ref()) {
            Ok(dataset) => self.set_dataset(dataset, source.describe()),
            Err(e) => {
                log::error!("Failed to load {}: {e}", source.describe());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Load a file picked in the UI, dispatching on its extension.
    pub fn load_path(&mut self, path: &Path) {
        match SourceSpec::from_path(path, &self.table) {
            Ok(spec) => self.load(&spec),
            Err(e) => {
                log::error!("Cannot open {}: {e}", path.display());
                self.status_message = Some(format!("Error: {e}"));
            }
        }
    }

    /// Ingest a newly loaded dataset and select every value of every filter.
    pub fn set_dataset(&mut self, dataset: LaptopDataset, label: String) {
        self.selection = FilterSelection::for_dataset(&dataset);
        self.dataset = Some(dataset);
        self.source_label = Some(label);
        self.status_message = None;
        self.refilter();
    }

    /// Recompute the snapshot after a filter change.
    pub fn refilter(&mut self) {
        self.snapshot = self
            .dataset
            .as_ref()
            .map(|ds| DashboardSnapshot::compute(&ds.records, &self.selection));
    }

    /// Toggle a single value in a column's filter.
    pub fn toggle_filter_value(&mut self, column: FilterColumn, value: &FieldValue) {
        self.selection.toggle(column, value);
        self.refilter();
    }

    /// Select all values in a column.
    pub fn select_all(&mut self, column: FilterColumn) {
        if let Some(all_vals) = self
            .dataset
            .as_ref()
            .and_then(|ds| ds.unique_values.get(&column))
        {
            self.selection.set(column, all_vals.iter().cloned());
            self.refilter();
        }
    }

    /// Deselect all values in a column.
    pub fn select_none(&mut self, column: FilterColumn) {
        self.selection.clear(column);
        self.refilter();
    }

    /// Write the current snapshot's derived tables as pretty JSON.
    pub fn export_snapshot(&self, path: &Path) -> Result<()> {
        let snapshot = self.snapshot.as_ref().context("no dataset loaded")?;
        let json = snapshot.to_json().context("serializing snapshot")?;
        std::fs::write(path, json).with_context(|| format!("writing {}", path.display()))?;
        log::info!("Exported snapshot to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use laptop_lens::LaptopRecord;

    fn record(id: i64, company: &str, price: i64) -> LaptopRecord {
        LaptopRecord {
            id,
            company: company.to_string(),
            product_name: format!("Model {id}"),
            type_name: "Notebook".to_string(),
            screen_inches: Some(15.6),
            screen_resolution: "1920x1080".to_string(),
            cpu: "Intel Core i5".to_string(),
            ram_label: "8GB".to_string(),
            storage: "256GB SSD".to_string(),
            gpu: "Intel UHD".to_string(),
            operating_system: "Windows 10".to_string(),
            weight: "1.8kg".to_string(),
            price_in_rupees: FieldValue::Integer(price),
        }
    }

    fn loaded() -> AppState {
        let ds = LaptopDataset::from_records(vec![
            record(1, "HP", 40000),
            record(2, "Dell", 60000),
            record(3, "HP", 50000),
        ])
        .unwrap();
        let mut state = AppState::new("laptop");
        state.set_dataset(ds, "fixture".into());
        state
    }

    fn visible(state: &AppState) -> usize {
        state.snapshot.as_ref().map_or(0, |s| s.record_count)
    }

    #[test]
    fn new_dataset_shows_everything() {
        let state = loaded();
        assert_eq!(visible(&state), 3);
        assert_eq!(state.source_label.as_deref(), Some("fixture"));
    }

    #[test]
    fn filter_edits_recompute_snapshot() {
        let mut state = loaded();
        let hp = FieldValue::String("HP".into());

        state.toggle_filter_value(FilterColumn::Company, &hp);
        assert_eq!(visible(&state), 1);

        state.select_none(FilterColumn::Company);
        assert_eq!(visible(&state), 0);
        assert!(state.snapshot.as_ref().unwrap().aggregate.is_err());

        state.select_all(FilterColumn::Company);
        assert_eq!(visible(&state), 3);
        let agg = state.snapshot.as_ref().unwrap().aggregate.unwrap();
        assert_eq!(agg.mean, 50000.0);
    }

    #[test]
    fn failed_load_keeps_previous_dataset() {
        let mut state = loaded();
        let dir = tempfile::tempdir().unwrap();
        state.load_path(&dir.path().join("missing.csv"));
        assert!(state.status_message.as_deref().unwrap().starts_with("Error"));
        assert_eq!(visible(&state), 3);

        state.load_path(&dir.path().join("laptops.xlsx"));
        assert!(state.status_message.is_some());
    }

    #[test]
    fn exports_snapshot_json() {
        let state = loaded();
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("snapshot.json");
        state.export_snapshot(&path).unwrap();
        let json: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
        assert_eq!(json["record_count"], 3);

        assert!(AppState::new("laptop").export_snapshot(&path).is_err());
    }
}
