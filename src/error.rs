use thiserror::Error;

/// Failure to load the laptop table. Fatal for the current load: no partial
/// record set is ever returned alongside it.
#[derive(Debug, Error)]
pub enum DataSourceError {
    #[error("invalid data source '{uri}': {reason}")]
    InvalidUri { uri: String, reason: String },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("database error: {0}")]
    Database(#[from] duckdb::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),

    #[error("Arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),

    #[error("column '{column}' has unsupported type {data_type}")]
    UnsupportedColumnType { column: String, data_type: String },

    #[error("missing column '{0}'")]
    MissingColumn(String),

    #[error("row {row}: {message}")]
    InvalidRow { row: usize, message: String },

    #[error("duplicate laptop id {0}")]
    DuplicateId(i64),
}

/// Signalled when a price aggregate is requested over a view in which no
/// record carries a parsable price. Not fatal: the UI shows placeholders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("no numeric prices among {record_count} records")]
pub struct NoNumericData {
    /// Records in the view, all of them without a usable price.
    pub record_count: usize,
}

pub type Result<T> = std::result::Result<T, DataSourceError>;
