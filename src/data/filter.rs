use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use super::model::{distinct_values, FieldValue, FilterColumn, LaptopDataset, LaptopRecord};

// ---------------------------------------------------------------------------
// Filter predicate: which values are allowed per column
// ---------------------------------------------------------------------------

/// Per-column selection state: maps filter column → set of allowed values.
///
/// A column absent from the map is unconstrained. A column present with an
/// empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FilterSelection {
    allowed: BTreeMap<FilterColumn, BTreeSet<FieldValue>>,
}

impl FilterSelection {
    /// Every filter column mapped to all values observed in `records`
    /// (i.e., show everything).
    pub fn select_all(records: &[LaptopRecord]) -> Self {
        let allowed = FilterColumn::ALL
            .into_iter()
            .map(|col| (col, distinct_values(records, col.column())))
            .collect();
        FilterSelection { allowed }
    }

    /// Default selection for a loaded dataset, reusing its column index.
    pub fn for_dataset(dataset: &LaptopDataset) -> Self {
        FilterSelection {
            allowed: dataset.unique_values.clone(),
        }
    }

    /// Constrain `column` to exactly `values`.
    pub fn set<I>(&mut self, column: FilterColumn, values: I)
    where
        I: IntoIterator<Item = FieldValue>,
    {
        self.allowed.insert(column, values.into_iter().collect());
    }

    /// Drop the constraint on `column` altogether.
    pub fn unconstrain(&mut self, column: FilterColumn) {
        self.allowed.remove(&column);
    }

    /// Deselect every value of `column`; the view becomes empty.
    pub fn clear(&mut self, column: FilterColumn) {
        self.allowed.insert(column, BTreeSet::new());
    }

    /// Flip membership of a single value.
    pub fn toggle(&mut self, column: FilterColumn, value: &FieldValue) {
        let selected = self.allowed.entry(column).or_default();
        if !selected.remove(value) {
            selected.insert(value.clone());
        }
    }

    pub fn allowed(&self, column: FilterColumn) -> Option<&BTreeSet<FieldValue>> {
        self.allowed.get(&column)
    }

    pub fn is_selected(&self, column: FilterColumn, value: &FieldValue) -> bool {
        self.allowed
            .get(&column)
            .map_or(true, |selected| selected.contains(value))
    }

    /// Whether `record` satisfies every constraint.
    pub fn matches(&self, record: &LaptopRecord) -> bool {
        self.allowed
            .iter()
            .all(|(col, selected)| selected.contains(&record.value(col.column())))
    }
}

// ---------------------------------------------------------------------------
// FilteredView
// ---------------------------------------------------------------------------

/// The records that passed a [`FilterSelection`], in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct FilteredView {
    records: Vec<LaptopRecord>,
}

impl FilteredView {
    pub fn records(&self) -> &[LaptopRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, LaptopRecord> {
        self.records.iter()
    }
}

impl From<Vec<LaptopRecord>> for FilteredView {
    fn from(records: Vec<LaptopRecord>) -> Self {
        FilteredView { records }
    }
}

impl<'a> IntoIterator for &'a FilteredView {
    type Item = &'a LaptopRecord;
    type IntoIter = std::slice::Iter<'a, LaptopRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// Return the records that pass all constraints of `selection`.
///
/// A record passes a column constraint when:
/// * The column is not present in `selection` → passes (no constraint)
/// * The allowed set for that column is empty → nothing selected → fails
/// * The record's value for that column is in the allowed set → passes
pub fn apply_filters(records: &[LaptopRecord], selection: &FilterSelection) -> FilteredView {
    records
        .iter()
        .filter(|rec| selection.matches(rec))
        .cloned()
        .collect::<Vec<_>>()
        .into()
}
