//! DuckDB-backed record source.
//!
//! Each fetch opens the database read-only, runs one `SELECT` over the
//! laptop table in storage column order, and drops the connection before
//! returning, on success and on failure alike.

use std::path::{Path, PathBuf};

use duckdb::{AccessMode, Config, Connection};

use super::model::{Column, FieldValue, LaptopRecord};
use super::source::RecordSource;
use crate::error::Result;

pub struct DuckDbSource {
    path: PathBuf,
    table: String,
}

impl DuckDbSource {
    pub fn new(path: impl AsRef<Path>, table: &str) -> Self {
        DuckDbSource {
            path: path.as_ref().to_path_buf(),
            table: table.to_string(),
        }
    }

    /// The single unconstrained read. Text columns are cast to `VARCHAR`,
    /// `Inches` is coerced to `DOUBLE` (null if it does not parse) and the
    /// price is read as text so that cells such as `N/A` survive the query.
    fn select_sql(&self) -> String {
        let projection: Vec<String> = Column::ALL
            .into_iter()
            .map(|col| {
                let name = quote_ident(col.name());
                match col {
                    Column::Id => format!("CAST({name} AS BIGINT)"),
                    Column::Inches => format!("TRY_CAST({name} AS DOUBLE)"),
                    _ => format!("CAST({name} AS VARCHAR)"),
                }
            })
            .collect();
        format!(
            "SELECT {} FROM {}",
            projection.join(", "),
            quote_ident(&self.table)
        )
    }
}

/// Double-quote an identifier, escaping embedded quotes.
fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

fn text(value: Option<String>) -> String {
    value.unwrap_or_default()
}

impl RecordSource for DuckDbSource {
    fn fetch_all_records(&self) -> Result<Vec<LaptopRecord>> {
        let config = Config::default().access_mode(AccessMode::ReadOnly)?;
        let conn = Connection::open_with_flags(&self.path, config)?;

        let sql = self.select_sql();
        log::debug!("{}: {sql}", self.describe());

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(duckdb::params![], |row| {
            Ok(LaptopRecord {
                id: row.get(0)?,
                company: text(row.get(1)?),
                product_name: text(row.get(2)?),
                type_name: text(row.get(3)?),
                screen_inches: row.get::<_, Option<f64>>(4)?.filter(|v| v.is_finite()),
                screen_resolution: text(row.get(5)?),
                cpu: text(row.get(6)?),
                ram_label: text(row.get(7)?),
                storage: text(row.get(8)?),
                gpu: text(row.get(9)?),
                operating_system: text(row.get(10)?),
                weight: text(row.get(11)?),
                price_in_rupees: row
                    .get::<_, Option<String>>(12)?
                    .map(FieldValue::String)
                    .unwrap_or(FieldValue::Null),
            })
        })?;

        let records = rows.collect::<std::result::Result<Vec<_>, _>>()?;
        Ok(records)
    }

    fn describe(&self) -> String {
        format!("duckdb://{} (table {})", self.path.display(), self.table)
    }
}
