// Shared test helpers for input files, configs and database inspection.
//
// Each test file includes this with `mod helpers;`, so not every helper is
// used by every file.

#![allow(dead_code)]

use std::io::Write;
use std::path::{Path, PathBuf};

use tempfile::TempDir;

use customer_load::{Config, CustomerRecord, CustomerStore, Policy, StoreOptions};

/// Header row used by the sample files.
pub const HEADER: &str = "Customer Id,Name,Email,Company,City,Country,Birthday";

/// Writes `HEADER` followed by `rows` (each row without a newline) to `dir/name`.
pub fn write_csv(dir: &TempDir, name: &str, rows: &[String]) -> PathBuf {
    let path = dir.path().join(name);
    let mut file = std::fs::File::create(&path).expect("Failed to create CSV file");
    writeln!(file, "{HEADER}").expect("Failed to write header");
    for row in rows {
        writeln!(file, "{row}").expect("Failed to write row");
    }
    path
}

/// `count` distinct, well-formed customer rows.
pub fn synthetic_rows(count: usize) -> Vec<String> {
    (0..count)
        .map(|i| {
            format!(
                "{i:08x},Customer {i},customer{i}@example.com,Company {},City {},Country {},19{:02}-{:02}-{:02}",
                i % 97,
                i % 31,
                i % 13,
                i % 100,
                i % 12 + 1,
                i % 28 + 1
            )
        })
        .collect()
}

/// Writes `count` synthetic rows and returns the file path.
pub fn synthetic_csv(dir: &TempDir, count: usize) -> PathBuf {
    write_csv(dir, "customers.csv", &synthetic_rows(count))
}

/// A config writing to `dir/bench.db` with progress logging off.
pub fn test_config(dir: &TempDir, file: PathBuf, policies: Vec<Policy>) -> Config {
    Config {
        file,
        db_path: dir.path().join("bench.db"),
        policies,
        progress_interval_secs: 0,
        ..Default::default()
    }
}

/// Opens the database a config points at.
pub async fn open_store(db_path: &Path) -> CustomerStore {
    CustomerStore::open(db_path, &StoreOptions::default())
        .await
        .expect("Failed to open store")
}

/// Every row in the table, sorted so comparisons ignore insertion order.
pub async fn table_contents(db_path: &Path) -> Vec<CustomerRecord> {
    let store = open_store(db_path).await;
    let mut rows = store.fetch_all().await.expect("Failed to fetch rows");
    store.close().await;
    rows.sort();
    rows
}

/// Builds a record the way a row with these fields would parse.
pub fn record(fields: [&str; 7]) -> CustomerRecord {
    let [id, name, email, company, city, country, birthday] = fields;
    CustomerRecord {
        id: id.to_string(),
        name: name.to_string(),
        email: email.to_string(),
        company: company.to_string(),
        city: city.to_string(),
        country: country.to_string(),
        birthday: birthday.to_string(),
    }
}
