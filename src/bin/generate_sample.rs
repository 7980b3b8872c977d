use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;

use laptop_lens::data::source::DEFAULT_TABLE;
use laptop_lens::{Column, FieldValue, LaptopRecord};

/// Write a deterministic synthetic laptop table.
#[derive(Debug, Parser)]
#[command(name = "generate_sample")]
struct Args {
    /// Output file; the format follows the extension (csv, json, parquet, duckdb)
    #[arg(default_value = "sample_laptops.csv")]
    output: PathBuf,

    /// Number of laptops
    #[arg(long, default_value_t = 1300)]
    rows: usize,

    /// PRNG seed
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// Table name for DuckDB output
    #[arg(long, default_value = DEFAULT_TABLE)]
    table: String,
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    fn pick<'a, T>(&mut self, items: &'a [T]) -> &'a T {
        &items[(self.next_u64() % items.len() as u64) as usize]
    }
}

// (name, price multiplier)
const COMPANIES: &[(&str, f64)] = &[
    ("Apple", 1.6),
    ("HP", 1.0),
    ("Dell", 1.1),
    ("Lenovo", 1.0),
    ("Asus", 0.95),
    ("Acer", 0.8),
    ("MSI", 1.3),
    ("Toshiba", 0.9),
    ("Razer", 1.8),
];
const TYPES: &[(&str, f64)] = &[
    ("Notebook", 0.8),
    ("Ultrabook", 1.3),
    ("Gaming", 1.4),
    ("2 in 1 Convertible", 1.1),
    ("Workstation", 1.7),
    ("Netbook", 0.6),
];
const RAM: &[(&str, f64)] = &[
    ("4GB", 0.7),
    ("8GB", 1.0),
    ("16GB", 1.4),
    ("32GB", 2.0),
];
const INCHES: &[f64] = &[11.6, 12.5, 13.3, 14.0, 15.6, 17.3];
const OPSYS: &[&str] = &["Windows 10", "macOS", "Linux", "No OS", "Chrome OS"];
const CPUS: &[&str] = &[
    "Intel Core i3 7100U 2.4GHz",
    "Intel Core i5 8250U 1.6GHz",
    "Intel Core i7 8550U 1.8GHz",
    "AMD Ryzen 5 2500U 2GHz",
];
const GPUS: &[&str] = &["Intel UHD Graphics 620", "Nvidia GeForce GTX 1050", "AMD Radeon 530"];
const STORAGE: &[&str] = &["128GB SSD", "256GB SSD", "512GB SSD", "1TB HDD", "128GB SSD +  1TB HDD"];
const RESOLUTIONS: &[&str] = &["1366x768", "Full HD 1920x1080", "IPS Panel Retina Display 2560x1600"];

fn generate(rows: usize, seed: u64) -> Vec<LaptopRecord> {
    let mut rng = SimpleRng::new(seed);
    (0..rows)
        .map(|i| {
            let (company, company_f) = *rng.pick(COMPANIES);
            let (type_name, type_f) = *rng.pick(TYPES);
            let (ram, ram_f) = *rng.pick(RAM);
            let inches = *rng.pick(INCHES);
            let operating_system = if company == "Apple" { "macOS" } else { *rng.pick(OPSYS) };

            let price = (45_000.0 * company_f * type_f * ram_f * rng.gauss(1.0, 0.12)).max(9_000.0);
            // About 2% of rows carry an unusable price.
            let price_in_rupees = if rng.next_f64() < 0.02 {
                FieldValue::String("N/A".to_string())
            } else {
                FieldValue::Float((price * 100.0).round() / 100.0)
            };

            LaptopRecord {
                id: i as i64 + 1,
                company: company.to_string(),
                product_name: format!("{company} {}{}", &type_name[..1], 100 + i),
                type_name: type_name.to_string(),
                screen_inches: Some(inches),
                screen_resolution: rng.pick(RESOLUTIONS).to_string(),
                cpu: rng.pick(CPUS).to_string(),
                ram_label: ram.to_string(),
                storage: rng.pick(STORAGE).to_string(),
                gpu: rng.pick(GPUS).to_string(),
                operating_system: operating_system.to_string(),
                weight: format!("{:.2}kg", (inches / 8.0 + rng.gauss(0.0, 0.15)).max(0.9)),
                price_in_rupees,
            }
        })
        .collect()
}

/// Cell text as stored in flat files; the price keeps its raw form.
fn cell_text(rec: &LaptopRecord, col: Column) -> String {
    match col {
        Column::Price => rec.price_in_rupees.to_string(),
        other => rec.value(other).to_string(),
    }
}

// ---------------------------------------------------------------------------
// Writers
// ---------------------------------------------------------------------------

fn write_csv(path: &Path, records: &[LaptopRecord]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(Column::ALL.iter().map(|c| c.name()))?;
    for rec in records {
        writer.write_record(Column::ALL.iter().map(|&c| cell_text(rec, c)))?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, records: &[LaptopRecord]) -> Result<()> {
    let rows: Vec<serde_json::Map<String, serde_json::Value>> = records
        .iter()
        .map(|rec| {
            Column::ALL
                .iter()
                .map(|&col| {
                    let value = match col {
                        Column::Price => serde_json::to_value(&rec.price_in_rupees),
                        other => serde_json::to_value(rec.value(other)),
                    };
                    value.map(|v| (col.name().to_string(), v))
                })
                .collect::<serde_json::Result<_>>()
        })
        .collect::<serde_json::Result<_>>()?;
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, &rows)?;
    Ok(())
}

fn write_parquet(path: &Path, records: &[LaptopRecord]) -> Result<()> {
    let mut fields = Vec::with_capacity(Column::ALL.len());
    let mut columns: Vec<ArrayRef> = Vec::with_capacity(Column::ALL.len());
    for col in Column::ALL {
        match col {
            Column::Id => {
                fields.push(Field::new(col.name(), DataType::Int64, false));
                columns.push(Arc::new(Int64Array::from_iter_values(records.iter().map(|r| r.id))));
            }
            Column::Inches => {
                fields.push(Field::new(col.name(), DataType::Float64, true));
                columns.push(Arc::new(Float64Array::from_iter(
                    records.iter().map(|r| r.screen_inches),
                )));
            }
            // The price mixes numbers and text, so it is stored as text.
            other => {
                fields.push(Field::new(other.name(), DataType::Utf8, true));
                columns.push(Arc::new(StringArray::from_iter_values(
                    records.iter().map(|r| cell_text(r, other)),
                )));
            }
        }
    }

    let schema = Arc::new(Schema::new(fields));
    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn write_duckdb(path: &Path, table: &str, records: &[LaptopRecord]) -> Result<()> {
    if path.exists() {
        bail!("{} already exists; refusing to overwrite a database", path.display());
    }
    let conn = duckdb::Connection::open(path).context("creating DuckDB database")?;

    let columns: Vec<String> = Column::ALL
        .iter()
        .map(|&col| {
            let ty = match col {
                Column::Id => "BIGINT PRIMARY KEY",
                Column::Inches => "DOUBLE",
                _ => "VARCHAR",
            };
            format!("\"{}\" {ty}", col.name())
        })
        .collect();
    conn.execute_batch(&format!(
        "CREATE TABLE \"{}\" ({})",
        table.replace('"', "\"\""),
        columns.join(", ")
    ))?;

    let mut appender = conn.appender(table)?;
    for rec in records {
        let text: Vec<String> = Column::ALL.iter().map(|&c| cell_text(rec, c)).collect();
        appender.append_row(duckdb::params![
            rec.id,
            text[1],
            text[2],
            text[3],
            rec.screen_inches,
            text[5],
            text[6],
            text[7],
            text[8],
            text[9],
            text[10],
            text[11],
            text[12],
        ])?;
    }
    appender.flush()?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let records = generate(args.rows, args.seed);
    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(&args.output, &records)?,
        "json" => write_json(&args.output, &records)?,
        "parquet" | "pq" => write_parquet(&args.output, &records)?,
        "duckdb" | "db" => write_duckdb(&args.output, &args.table, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    log::info!("Wrote {} laptops to {}", records.len(), args.output.display());
    println!("Wrote {} laptops to {}", records.len(), args.output.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use laptop_lens::data::source::{load_dataset, SourceSpec};

    #[test]
    fn generation_is_deterministic() {
        assert_eq!(generate(50, 7), generate(50, 7));
        assert_ne!(generate(50, 7), generate(50, 8));
    }

    #[test]
    fn generated_ids_are_unique_and_some_prices_missing() {
        let records = generate(1000, 42);
        let ds = laptop_lens::LaptopDataset::from_records(records).unwrap();
        let unparsable = ds.unparsable_price_count();
        assert!(unparsable > 0 && unparsable < 60, "{unparsable}");
        assert!(ds.records.iter().filter(|r| r.company == "Apple").all(|r| r.operating_system == "macOS"));
    }

    #[test]
    fn every_format_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let records = generate(40, 3);

        let csv = dir.path().join("l.csv");
        write_csv(&csv, &records).unwrap();
        let json = dir.path().join("l.json");
        write_json(&json, &records).unwrap();
        let parquet = dir.path().join("l.parquet");
        write_parquet(&parquet, &records).unwrap();
        let duck = dir.path().join("l.duckdb");
        write_duckdb(&duck, "laptop", &records).unwrap();

        for path in [&csv, &json, &parquet, &duck] {
            let spec = SourceSpec::from_path(path, "laptop").unwrap();
            let ds = load_dataset(spec.open().as_ref()).unwrap();
            assert_eq!(ds.len(), records.len(), "{}", path.display());
            for (got, want) in ds.records.iter().zip(&records) {
                assert_eq!(got.id, want.id);
                assert_eq!(got.company, want.company);
                assert_eq!(got.screen_inches, want.screen_inches);
                assert_eq!(got.price(), want.price(), "{}", path.display());
            }
        }

        assert!(write_duckdb(&duck, "laptop", &records).is_err());
    }
}
