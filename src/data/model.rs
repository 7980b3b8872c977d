use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

use crate::error::{DataSourceError, Result};

// ---------------------------------------------------------------------------
// FieldValue – a single cell of the laptop table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value.
/// Used as a key in `BTreeMap` / `BTreeSet` downstream, so it must be `Ord`.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Null,
}

// -- Manual Eq/Ord so we can put FieldValue in BTreeSet --

// Equality follows `Ord`, so a NaN cell equals itself.
impl PartialEq for FieldValue {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == std::cmp::Ordering::Equal
    }
}

impl Eq for FieldValue {}

impl PartialOrd for FieldValue {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for FieldValue {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        use FieldValue::*;
        fn discriminant(v: &FieldValue) -> u8 {
            match v {
                Null => 0,
                Integer(_) => 1,
                Float(_) => 2,
                String(_) => 3,
            }
        }
        let da = discriminant(self);
        let db = discriminant(other);
        if da != db {
            return da.cmp(&db);
        }
        match (self, other) {
            (Null, Null) => std::cmp::Ordering::Equal,
            (Integer(a), Integer(b)) => a.cmp(b),
            (Float(a), Float(b)) => a.total_cmp(b),
            (String(a), String(b)) => a.cmp(b),
            _ => std::cmp::Ordering::Equal,
        }
    }
}

impl std::hash::Hash for FieldValue {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);
        match self {
            FieldValue::String(s) => s.hash(state),
            FieldValue::Integer(i) => i.hash(state),
            FieldValue::Float(f) => f.to_bits().hash(state),
            FieldValue::Null => {}
        }
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{s}"),
            FieldValue::Integer(i) => write!(f, "{i}"),
            FieldValue::Float(v) => write!(f, "{v}"),
            FieldValue::Null => write!(f, "<null>"),
        }
    }
}

impl FieldValue {
    /// Numeric view of the value, for chart axes.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FieldValue::Float(v) => Some(*v),
            FieldValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Render as plain text; null becomes the empty string.
    fn to_text(&self) -> String {
        match self {
            FieldValue::Null => String::new(),
            other => other.to_string(),
        }
    }
}

/// Best-effort numeric coercion of a price cell.
///
/// Integers and finite floats are taken as-is, strings are trimmed and parsed.
/// Everything else (`"N/A"`, empty text, null, NaN, infinities) is unparsable
/// and yields `None`.
pub fn parse_price(value: &FieldValue) -> Option<f64> {
    let parsed = match value {
        FieldValue::Integer(i) => Some(*i as f64),
        FieldValue::Float(f) => Some(*f),
        FieldValue::String(s) => s.trim().parse::<f64>().ok(),
        FieldValue::Null => None,
    };
    parsed.filter(|p| p.is_finite())
}

// ---------------------------------------------------------------------------
// Columns of the laptop table
// ---------------------------------------------------------------------------

/// Every column of the backing table, in storage order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Column {
    Id,
    Company,
    Product,
    TypeName,
    Inches,
    ScreenResolution,
    Cpu,
    Ram,
    Memory,
    Gpu,
    OpSys,
    Weight,
    Price,
}

impl Column {
    /// Storage order of the table; the relational query selects in this order.
    pub const ALL: [Column; 13] = [
        Column::Id,
        Column::Company,
        Column::Product,
        Column::TypeName,
        Column::Inches,
        Column::ScreenResolution,
        Column::Cpu,
        Column::Ram,
        Column::Memory,
        Column::Gpu,
        Column::OpSys,
        Column::Weight,
        Column::Price,
    ];

    /// Column name in the backing table.
    pub fn name(self) -> &'static str {
        match self {
            Column::Id => "laptop_ID",
            Column::Company => "Company",
            Column::Product => "Product",
            Column::TypeName => "TypeName",
            Column::Inches => "Inches",
            Column::ScreenResolution => "ScreenResolution",
            Column::Cpu => "CPU",
            Column::Ram => "RAM",
            Column::Memory => "Memory",
            Column::Gpu => "GPU",
            Column::OpSys => "OpSys",
            Column::Weight => "Weight",
            Column::Price => "price_in_rupees",
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Column {
    type Err = DataSourceError;

    fn from_str(s: &str) -> Result<Self> {
        Column::ALL
            .into_iter()
            .find(|c| c.name().eq_ignore_ascii_case(s))
            .ok_or_else(|| DataSourceError::MissingColumn(s.to_string()))
    }
}

impl Serialize for Column {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Columns exposed as sidebar filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FilterColumn {
    Company,
    TypeName,
    Ram,
    Inches,
    OpSys,
}

impl FilterColumn {
    pub const ALL: [FilterColumn; 5] = [
        FilterColumn::Company,
        FilterColumn::TypeName,
        FilterColumn::Ram,
        FilterColumn::Inches,
        FilterColumn::OpSys,
    ];

    pub fn column(self) -> Column {
        match self {
            FilterColumn::Company => Column::Company,
            FilterColumn::TypeName => Column::TypeName,
            FilterColumn::Ram => Column::Ram,
            FilterColumn::Inches => Column::Inches,
            FilterColumn::OpSys => Column::OpSys,
        }
    }

    /// Sidebar heading.
    pub fn label(self) -> &'static str {
        match self {
            FilterColumn::Company => "Company",
            FilterColumn::TypeName => "TypeName",
            FilterColumn::Ram => "RAM",
            FilterColumn::Inches => "Inches",
            FilterColumn::OpSys => "OperatingSystem",
        }
    }
}

impl From<FilterColumn> for Column {
    fn from(col: FilterColumn) -> Self {
        col.column()
    }
}

/// Columns a price table can be grouped by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupColumn {
    TypeName,
    Ram,
    Company,
}

impl From<GroupColumn> for Column {
    fn from(col: GroupColumn) -> Self {
        match col {
            GroupColumn::TypeName => Column::TypeName,
            GroupColumn::Ram => Column::Ram,
            GroupColumn::Company => Column::Company,
        }
    }
}

impl Serialize for GroupColumn {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        Column::from(*self).serialize(serializer)
    }
}

// ---------------------------------------------------------------------------
// LaptopRecord – one row of the table
// ---------------------------------------------------------------------------

/// A single laptop (one row of the source table).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaptopRecord {
    pub id: i64,
    pub company: String,
    pub product_name: String,
    pub type_name: String,
    /// Screen diagonal; `None` when the store holds no usable number.
    pub screen_inches: Option<f64>,
    pub screen_resolution: String,
    pub cpu: String,
    /// Categorical, e.g. `"8GB"`.
    pub ram_label: String,
    pub storage: String,
    pub gpu: String,
    pub operating_system: String,
    pub weight: String,
    /// Raw price cell; may hold text such as `"N/A"`.
    pub price_in_rupees: FieldValue,
}

/// A decoded row keyed by column name, as produced by the file loaders.
pub type RawRow = BTreeMap<String, FieldValue>;

impl LaptopRecord {
    /// Numeric price, if the raw cell parses.
    pub fn price(&self) -> Option<f64> {
        parse_price(&self.price_in_rupees)
    }

    /// Cell value for `column`. The price column projects to its parsed
    /// number, or null when it does not parse.
    pub fn value(&self, column: Column) -> FieldValue {
        let text = |s: &str| FieldValue::String(s.to_string());
        match column {
            Column::Id => FieldValue::Integer(self.id),
            Column::Company => text(&self.company),
            Column::Product => text(&self.product_name),
            Column::TypeName => text(&self.type_name),
            Column::Inches => self
                .screen_inches
                .map(FieldValue::Float)
                .unwrap_or(FieldValue::Null),
            Column::ScreenResolution => text(&self.screen_resolution),
            Column::Cpu => text(&self.cpu),
            Column::Ram => text(&self.ram_label),
            Column::Memory => text(&self.storage),
            Column::Gpu => text(&self.gpu),
            Column::OpSys => text(&self.operating_system),
            Column::Weight => text(&self.weight),
            Column::Price => self.price().map(FieldValue::Float).unwrap_or(FieldValue::Null),
        }
    }

    /// Build a record from a row decoded by name. `row_no` is only used in
    /// error messages.
    pub fn from_raw_row(row: &RawRow, row_no: usize) -> Result<Self> {
        let cell = |col: Column| -> Result<&FieldValue> {
            row.iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(col.name()))
                .map(|(_, v)| v)
                .ok_or_else(|| DataSourceError::MissingColumn(col.name().to_string()))
        };
        let text = |col: Column| -> Result<String> { Ok(cell(col)?.to_text()) };

        let id = match cell(Column::Id)? {
            FieldValue::Integer(i) => *i,
            FieldValue::Float(f) if f.fract() == 0.0 => *f as i64,
            FieldValue::String(s) => s.trim().parse::<i64>().map_err(|_| {
                DataSourceError::InvalidRow {
                    row: row_no,
                    message: format!("laptop_ID '{s}' is not an integer"),
                }
            })?,
            other => {
                return Err(DataSourceError::InvalidRow {
                    row: row_no,
                    message: format!("laptop_ID {other} is not an integer"),
                })
            }
        };

        let screen_inches = match cell(Column::Inches)? {
            FieldValue::String(s) => s.trim().parse::<f64>().ok(),
            other => other.as_f64(),
        }
        .filter(|v| v.is_finite());

        Ok(LaptopRecord {
            id,
            company: text(Column::Company)?,
            product_name: text(Column::Product)?,
            type_name: text(Column::TypeName)?,
            screen_inches,
            screen_resolution: text(Column::ScreenResolution)?,
            cpu: text(Column::Cpu)?,
            ram_label: text(Column::Ram)?,
            storage: text(Column::Memory)?,
            gpu: text(Column::Gpu)?,
            operating_system: text(Column::OpSys)?,
            weight: text(Column::Weight)?,
            price_in_rupees: cell(Column::Price)?.clone(),
        })
    }
}

// ---------------------------------------------------------------------------
// LaptopDataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full record set with pre-computed distinct values per filter column.
#[derive(Debug, Clone)]
pub struct LaptopDataset {
    /// All laptops, in source order.
    pub records: Vec<LaptopRecord>,
    /// For each filter column the sorted set of observed values.
    pub unique_values: BTreeMap<FilterColumn, BTreeSet<FieldValue>>,
}

impl LaptopDataset {
    /// Validate id uniqueness and build the column indices.
    pub fn from_records(records: Vec<LaptopRecord>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(records.len());
        for rec in &records {
            if !seen.insert(rec.id) {
                return Err(DataSourceError::DuplicateId(rec.id));
            }
        }

        let unique_values = FilterColumn::ALL
            .into_iter()
            .map(|col| (col, distinct_values(&records, col.column())))
            .collect();

        Ok(LaptopDataset {
            records,
            unique_values,
        })
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Records whose price cell does not parse to a number.
    pub fn unparsable_price_count(&self) -> usize {
        self.records.iter().filter(|r| r.price().is_none()).count()
    }
}

/// Sorted distinct values of `column` over `records`.
pub fn distinct_values(records: &[LaptopRecord], column: Column) -> BTreeSet<FieldValue> {
    records.iter().map(|r| r.value(column)).collect()
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    /// Minimal record for tests; the remaining columns are filled in.
    pub(crate) fn laptop(id: i64, company: &str, type_name: &str, price: FieldValue) -> LaptopRecord {
        LaptopRecord {
            id,
            company: company.to_string(),
            product_name: format!("Model {id}"),
            type_name: type_name.to_string(),
            screen_inches: Some(15.6),
            screen_resolution: "1920x1080".to_string(),
            cpu: "Intel Core i5".to_string(),
            ram_label: "8GB".to_string(),
            storage: "256GB SSD".to_string(),
            gpu: "Intel UHD".to_string(),
            operating_system: "Windows 10".to_string(),
            weight: "1.8kg".to_string(),
            price_in_rupees: price,
        }
    }

    fn raw_row(pairs: &[(&str, FieldValue)]) -> RawRow {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    fn full_row(id: FieldValue, inches: FieldValue, price: FieldValue) -> RawRow {
        let s = |v: &str| FieldValue::String(v.to_string());
        raw_row(&[
            ("laptop_ID", id),
            ("Company", s("Dell")),
            ("Product", s("XPS 13")),
            ("TypeName", s("Ultrabook")),
            ("Inches", inches),
            ("ScreenResolution", s("1920x1080")),
            ("CPU", s("Intel Core i7")),
            ("RAM", s("16GB")),
            ("Memory", s("512GB SSD")),
            ("GPU", s("Intel Iris")),
            ("OpSys", s("Windows 10")),
            ("Weight", s("1.2kg")),
            ("price_in_rupees", price),
        ])
    }

    #[test]
    fn parse_price_coerces_numbers_and_text() {
        assert_eq!(parse_price(&FieldValue::Integer(50000)), Some(50000.0));
        assert_eq!(parse_price(&FieldValue::Float(1234.5)), Some(1234.5));
        assert_eq!(
            parse_price(&FieldValue::String(" 71378.68 ".into())),
            Some(71378.68)
        );
        assert_eq!(parse_price(&FieldValue::String("N/A".into())), None);
        assert_eq!(parse_price(&FieldValue::String(String::new())), None);
        assert_eq!(parse_price(&FieldValue::String("NaN".into())), None);
        assert_eq!(parse_price(&FieldValue::Float(f64::INFINITY)), None);
        assert_eq!(parse_price(&FieldValue::Null), None);
    }

    #[test]
    fn field_values_order_numerically() {
        let mut set = BTreeSet::new();
        set.insert(FieldValue::Float(15.6));
        set.insert(FieldValue::Float(13.3));
        set.insert(FieldValue::Float(17.3));
        set.insert(FieldValue::Null);
        let ordered: Vec<_> = set.into_iter().collect();
        assert_eq!(
            ordered,
            vec![
                FieldValue::Null,
                FieldValue::Float(13.3),
                FieldValue::Float(15.6),
                FieldValue::Float(17.3),
            ]
        );
    }

    #[test]
    fn nan_cells_equal_themselves() {
        let nan = FieldValue::Float(f64::NAN);
        assert_eq!(nan, nan.clone());
        assert_eq!(nan.cmp(&nan), std::cmp::Ordering::Equal);

        let mut set = HashSet::new();
        set.insert(nan.clone());
        assert!(set.contains(&nan));

        let mut record = laptop(1, "Dell", "Notebook", FieldValue::Integer(40000));
        record.screen_inches = Some(f64::NAN);
        assert_eq!(record.value(Column::Inches), record.value(Column::Inches));
    }

    #[test]
    fn column_names_round_trip() {
        for col in Column::ALL {
            assert_eq!(col.name().parse::<Column>().unwrap(), col);
        }
        assert_eq!("opsys".parse::<Column>().unwrap(), Column::OpSys);
        assert!("Battery".parse::<Column>().is_err());
    }

    #[test]
    fn price_column_projects_parsed_value() {
        let priced = laptop(1, "HP", "Notebook", FieldValue::String("42000".into()));
        let unpriced = laptop(2, "HP", "Notebook", FieldValue::String("N/A".into()));
        assert_eq!(priced.value(Column::Price), FieldValue::Float(42000.0));
        assert_eq!(unpriced.value(Column::Price), FieldValue::Null);
        assert_eq!(
            unpriced.price_in_rupees,
            FieldValue::String("N/A".into())
        );
    }

    #[test]
    fn from_raw_row_types_id_and_inches() {
        let row = full_row(
            FieldValue::String("7".into()),
            FieldValue::String("13.3".into()),
            FieldValue::String("N/A".into()),
        );
        let rec = LaptopRecord::from_raw_row(&row, 0).unwrap();
        assert_eq!(rec.id, 7);
        assert_eq!(rec.screen_inches, Some(13.3));
        assert_eq!(rec.ram_label, "16GB");
        assert_eq!(rec.storage, "512GB SSD");
        assert_eq!(rec.price(), None);
    }

    #[test]
    fn from_raw_row_keeps_missing_inches_as_none() {
        let row = full_row(
            FieldValue::Integer(3),
            FieldValue::Null,
            FieldValue::Integer(55000),
        );
        let rec = LaptopRecord::from_raw_row(&row, 0).unwrap();
        assert_eq!(rec.screen_inches, None);
        assert_eq!(rec.value(Column::Inches), FieldValue::Null);
        assert_eq!(rec.price(), Some(55000.0));

        let row = full_row(
            FieldValue::Integer(4),
            FieldValue::String("nan".into()),
            FieldValue::Integer(55000),
        );
        let rec = LaptopRecord::from_raw_row(&row, 0).unwrap();
        assert_eq!(rec.screen_inches, None);
        assert_eq!(rec, rec.clone());
    }

    #[test]
    fn from_raw_row_rejects_bad_id_and_missing_column() {
        let row = full_row(
            FieldValue::String("abc".into()),
            FieldValue::Float(15.6),
            FieldValue::Integer(1),
        );
        let err = LaptopRecord::from_raw_row(&row, 4).unwrap_err();
        assert!(matches!(err, DataSourceError::InvalidRow { row: 4, .. }));

        let mut row = full_row(
            FieldValue::Integer(1),
            FieldValue::Float(15.6),
            FieldValue::Integer(1),
        );
        row.remove("GPU");
        let err = LaptopRecord::from_raw_row(&row, 0).unwrap_err();
        assert!(matches!(err, DataSourceError::MissingColumn(ref c) if c == "GPU"));
    }

    #[test]
    fn dataset_rejects_duplicate_ids() {
        let records = vec![
            laptop(1, "Acer", "Notebook", FieldValue::Integer(30000)),
            laptop(1, "Asus", "Gaming", FieldValue::Integer(90000)),
        ];
        let err = LaptopDataset::from_records(records).unwrap_err();
        assert!(matches!(err, DataSourceError::DuplicateId(1)));
    }

    #[test]
    fn dataset_indexes_filter_columns() {
        let records = vec![
            laptop(1, "Acer", "Notebook", FieldValue::Integer(30000)),
            laptop(2, "Asus", "Gaming", FieldValue::String("N/A".into())),
            laptop(3, "Acer", "Gaming", FieldValue::Integer(80000)),
        ];
        let ds = LaptopDataset::from_records(records).unwrap();
        assert_eq!(ds.len(), 3);
        assert_eq!(ds.unparsable_price_count(), 1);
        assert_eq!(ds.unique_values[&FilterColumn::Company].len(), 2);
        assert_eq!(ds.unique_values[&FilterColumn::TypeName].len(), 2);
        assert_eq!(ds.unique_values[&FilterColumn::Inches].len(), 1);
        assert_eq!(ds.unique_values.len(), FilterColumn::ALL.len());
    }
}
