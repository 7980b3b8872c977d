//! Filter-and-aggregate pipeline behind the laptop specifications dashboard.
//!
//! Records are fetched once through a [`data::source::RecordSource`], then
//! every filter change runs [`data::snapshot::DashboardSnapshot::compute`]
//! from scratch over the immutable record set.

pub mod config;
pub mod data;
pub mod error;

pub use data::aggregate::{compute_aggregate, format_price, PriceAggregate};
pub use data::chart::{colored_points, group_by_mean, pairs, GroupedPriceTable, ScatterPoint};
pub use data::filter::{apply_filters, FilterSelection, FilteredView};
pub use data::model::{Column, FieldValue, FilterColumn, GroupColumn, LaptopDataset, LaptopRecord};
pub use data::snapshot::DashboardSnapshot;
pub use error::{DataSourceError, NoNumericData};
