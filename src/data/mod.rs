/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///  duckdb / .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  source   │  RecordSource::fetch_all_records → Vec<LaptopRecord>
///   └──────────┘
///        │
///        ▼
///   ┌───────────────┐
///   │ LaptopDataset │  records, distinct values per filter column
///   └───────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  FilterSelection → FilteredView
///   └──────────┘
///        │
///        ├──────────────┐
///        ▼              ▼
///   ┌───────────┐  ┌─────────┐
///   │ aggregate │  │  chart   │  grouped means, scatter pairs
///   └───────────┘  └─────────┘
///        │              │
///        └──────┬───────┘
///               ▼
///   ┌──────────────────┐
///   │ DashboardSnapshot │  consumed by the UI
///   └──────────────────┘
/// ```

pub mod aggregate;
pub mod chart;
pub mod database;
pub mod filter;
pub mod loader;
pub mod model;
pub mod snapshot;
pub mod source;
