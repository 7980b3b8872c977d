use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::{DataSourceError, Result};

use super::database::DuckDbSource;
use super::loader::FileSource;
use super::model::{LaptopDataset, LaptopRecord};

/// Table read when none is configured.
pub const DEFAULT_TABLE: &str = "laptop";

/// Anything that can produce the full laptop table in one read.
pub trait RecordSource {
    /// Read every row. Either the whole table or an error; never a partial set.
    fn fetch_all_records(&self) -> Result<Vec<LaptopRecord>>;

    /// Human-readable origin for logs and the status bar.
    fn describe(&self) -> String;
}

// ---------------------------------------------------------------------------
// Connection strings
// ---------------------------------------------------------------------------

/// Flat file formats understood by [`FileSource`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Json,
    Parquet,
}

impl fmt::Display for FileFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            FileFormat::Csv => "csv",
            FileFormat::Json => "json",
            FileFormat::Parquet => "parquet",
        })
    }
}

/// Parsed connection string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceSpec {
    DuckDb { path: PathBuf, table: String },
    File { path: PathBuf, format: FileFormat },
}

impl SourceSpec {
    /// Parse a connection string.
    ///
    /// Accepted forms:
    /// * `duckdb://<path>`  – DuckDB database file, reading `table`
    /// * `csv://<path>`, `json://<path>`, `parquet://<path>`
    /// * a bare path, dispatched on its extension
    pub fn parse(uri: &str, table: &str) -> Result<Self> {
        let uri = uri.trim();
        if uri.is_empty() {
            return Err(invalid(uri, "empty connection string"));
        }
        if table.trim().is_empty() {
            return Err(invalid(uri, "empty table name"));
        }

        let Some((scheme, rest)) = uri.split_once("://") else {
            return Self::from_path(Path::new(uri), table);
        };
        if rest.is_empty() {
            return Err(invalid(uri, "missing path"));
        }

        let path = PathBuf::from(rest);
        match scheme.to_ascii_lowercase().as_str() {
            "duckdb" if rest == "memory" => Err(invalid(
                uri,
                "an in-memory database holds no laptop table; give a database file",
            )),
            "duckdb" => Ok(SourceSpec::DuckDb {
                path,
                table: table.to_string(),
            }),
            "csv" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Csv,
            }),
            "json" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Json,
            }),
            "parquet" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Parquet,
            }),
            other => Err(invalid(uri, &format!("unknown scheme '{other}'"))),
        }
    }

    /// Dispatch a bare path by extension.
    pub fn from_path(path: &Path, table: &str) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        let path = path.to_path_buf();
        match ext.as_str() {
            "duckdb" | "db" => Ok(SourceSpec::DuckDb {
                path,
                table: table.to_string(),
            }),
            "csv" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Csv,
            }),
            "json" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Json,
            }),
            "parquet" | "pq" => Ok(SourceSpec::File {
                path,
                format: FileFormat::Parquet,
            }),
            other => Err(DataSourceError::UnsupportedFormat(other.to_string())),
        }
    }

    /// Instantiate the adapter for this spec.
    pub fn open(&self) -> Box<dyn RecordSource> {
        match self {
            SourceSpec::DuckDb { path, table } => Box::new(DuckDbSource::new(path, table)),
            SourceSpec::File { path, format } => Box::new(FileSource::new(path, *format)),
        }
    }
}

fn invalid(uri: &str, reason: &str) -> DataSourceError {
    DataSourceError::InvalidUri {
        uri: uri.to_string(),
        reason: reason.to_string(),
    }
}

/// Fetch everything from `source` and index it.
pub fn load_dataset(source: &dyn RecordSource) -> Result<LaptopDataset> {
    let records = source.fetch_all_records()?;
    let dataset = LaptopDataset::from_records(records)?;

    log::info!(
        "Loaded {} laptops from {}",
        dataset.len(),
        source.describe()
    );
    let unparsable = dataset.unparsable_price_count();
    if unparsable > 0 {
        log::warn!(
            "{unparsable} of {} laptops have no numeric price and are left out of price statistics",
            dataset.len()
        );
    }
    Ok(dataset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::tests::laptop;
    use crate::data::model::FieldValue;

    #[test]
    fn parses_schemes() {
        assert_eq!(
            SourceSpec::parse("duckdb://data/laptops.duckdb", "laptop").unwrap(),
            SourceSpec::DuckDb {
                path: PathBuf::from("data/laptops.duckdb"),
                table: "laptop".into()
            }
        );
        assert_eq!(
            SourceSpec::parse("CSV://laptops.txt", "laptop").unwrap(),
            SourceSpec::File {
                path: PathBuf::from("laptops.txt"),
                format: FileFormat::Csv
            }
        );
        assert_eq!(
            SourceSpec::parse("parquet:///tmp/l.bin", "laptop").unwrap(),
            SourceSpec::File {
                path: PathBuf::from("/tmp/l.bin"),
                format: FileFormat::Parquet
            }
        );
    }

    #[test]
    fn bare_paths_dispatch_on_extension() {
        assert!(matches!(
            SourceSpec::parse("laptops.db", "t").unwrap(),
            SourceSpec::DuckDb { ref table, .. } if table == "t"
        ));
        assert!(matches!(
            SourceSpec::parse("laptops.PQ", "t").unwrap(),
            SourceSpec::File { format: FileFormat::Parquet, .. }
        ));
        assert!(matches!(
            SourceSpec::parse("laptops.json", "t").unwrap(),
            SourceSpec::File { format: FileFormat::Json, .. }
        ));
        assert!(matches!(
            SourceSpec::parse("laptops.xlsx", "t"),
            Err(DataSourceError::UnsupportedFormat(ref e)) if e == "xlsx"
        ));
    }

    #[test]
    fn rejects_bad_connection_strings() {
        for uri in ["", "duckdb://", "duckdb://memory", "mysql://localhost/laptops"] {
            assert!(
                matches!(
                    SourceSpec::parse(uri, "laptop"),
                    Err(DataSourceError::InvalidUri { .. })
                ),
                "{uri}"
            );
        }
        assert!(SourceSpec::parse("laptops.csv", " ").is_err());
    }

    struct FixedSource(Vec<LaptopRecord>);

    impl RecordSource for FixedSource {
        fn fetch_all_records(&self) -> Result<Vec<LaptopRecord>> {
            Ok(self.0.clone())
        }

        fn describe(&self) -> String {
            "fixture".into()
        }
    }

    #[test]
    fn load_dataset_validates_ids() {
        let ok = FixedSource(vec![
            laptop(1, "HP", "Notebook", FieldValue::Integer(1)),
            laptop(2, "HP", "Notebook", FieldValue::String("N/A".into())),
        ]);
        let ds = load_dataset(&ok).unwrap();
        assert_eq!(ds.len(), 2);

        let dup = FixedSource(vec![
            laptop(9, "HP", "Notebook", FieldValue::Integer(1)),
            laptop(9, "HP", "Notebook", FieldValue::Integer(2)),
        ]);
        assert!(matches!(
            load_dataset(&dup),
            Err(DataSourceError::DuplicateId(9))
        ));
    }
}
