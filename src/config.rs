use clap::Parser;

use crate::data::source::{SourceSpec, DEFAULT_TABLE};
use crate::error::Result;

/// Laptop specifications analysis dashboard.
#[derive(Debug, Clone, Parser)]
#[command(name = "laptop-lens")]
#[command(version, about)]
pub struct Args {
    /// Data source loaded at start-up: `duckdb://<file>`, `csv://<file>`,
    /// `json://<file>`, `parquet://<file>` or a bare path
    #[arg(long, env = "LAPTOP_LENS_SOURCE")]
    pub source: Option<String>,

    /// Table read from DuckDB sources
    #[arg(long, env = "LAPTOP_LENS_TABLE", default_value = DEFAULT_TABLE)]
    pub table: String,
}

impl Args {
    /// Parsed `--source`, if one was given.
    pub fn source_spec(&self) -> Result<Option<SourceSpec>> {
        self.source
            .as_deref()
            .map(|uri| SourceSpec::parse(uri, &self.table))
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn defaults_to_no_source_and_laptop_table() {
        let args = Args::try_parse_from(["laptop-lens"]).unwrap();
        assert_eq!(args.table, "laptop");
        assert!(args.source_spec().unwrap().is_none());
    }

    #[test]
    fn source_and_table_flags() {
        let args = Args::try_parse_from([
            "laptop-lens",
            "--source",
            "duckdb://shop.duckdb",
            "--table",
            "laptops_2024",
        ])
        .unwrap();
        assert_eq!(
            args.source_spec().unwrap(),
            Some(SourceSpec::DuckDb {
                path: PathBuf::from("shop.duckdb"),
                table: "laptops_2024".into()
            })
        );
    }

    #[test]
    fn bad_source_is_reported() {
        let args = Args::try_parse_from(["laptop-lens", "--source", "laptops.xlsx"]).unwrap();
        assert!(args.source_spec().is_err());
    }
}
