use std::fs::File;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::Error;

/// Name of the column holding the raw SQL text.
pub const SQL_COLUMN: &str = "sql";

#[derive(Debug, Deserialize)]
struct InputRow {
    sql: String,
}

/// Load the `sql` column of a `.csv` or `.json` table, one string per row.
///
/// Empty cells are returned as empty strings; the analyzer drops them as
/// unparseable.
pub fn load_queries(path: &Path) -> Result<Vec<String>, Error> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("csv") => load_csv(path),
        Some("json") => load_json(path),
        _ => Err(Error::UnsupportedFormat {
            path: path.to_path_buf(),
        }),
    }
}

fn load_csv(path: &Path) -> Result<Vec<String>, Error> {
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let file = File::open(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut reader = csv::Reader::from_reader(file);

    let has_sql_column = reader
        .headers()
        .map_err(csv_error)?
        .iter()
        .any(|header| header.trim() == SQL_COLUMN);
    if !has_sql_column {
        return Err(Error::MissingSqlColumn {
            path: path.to_path_buf(),
        });
    }

    reader
        .deserialize::<InputRow>()
        .map(|row| row.map(|row| row.sql).map_err(csv_error))
        .collect()
}

/// JSON input is an array of objects; every object must carry `sql`.
fn load_json(path: &Path) -> Result<Vec<String>, Error> {
    let text = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let rows: Vec<serde_json::Map<String, Value>> =
        serde_json::from_str(&text).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })?;

    rows.into_iter()
        .map(|mut row| match row.remove(SQL_COLUMN) {
            None => Err(Error::MissingSqlColumn {
                path: path.to_path_buf(),
            }),
            Some(Value::String(sql)) => Ok(sql),
            Some(Value::Null) => Ok(String::new()),
            Some(other) => Ok(other.to_string()),
        })
        .collect()
}
