use std::io::Write;
use std::path::{Component, Path};

use serde::Serialize;

use crate::analysis::{BatchReport, QueryRecord};
use crate::error::Error;
use crate::output::report;

/// Result table columns, in output order.
pub const OUTPUT_COLUMNS: [&str; 11] = [
    "query",
    "joins",
    "subqueries",
    "where_conditions",
    "functions",
    "tables",
    "group_by",
    "order_by",
    "lines",
    "characters",
    "complexity",
];

/// One row of the results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OutputRow<'a> {
    /// Raw query text.
    pub query: &'a str,
    /// Top-level joins.
    pub joins: usize,
    /// Nested selects.
    pub subqueries: i64,
    /// `WHERE` conditions.
    pub where_conditions: usize,
    /// Function calls.
    pub functions: usize,
    /// Tables.
    pub tables: usize,
    /// `GROUP BY` columns.
    pub group_by: usize,
    /// `ORDER BY` columns.
    pub order_by: usize,
    /// Lines of query text.
    pub lines: usize,
    /// Characters of query text.
    pub characters: usize,
    /// Complexity score.
    pub complexity: f64,
}

impl<'a> From<&'a QueryRecord> for OutputRow<'a> {
    fn from(record: &'a QueryRecord) -> Self {
        let features = &record.features;
        Self {
            query: &record.query,
            joins: features.joins,
            subqueries: features.subqueries,
            where_conditions: features.where_conditions,
            functions: features.functions,
            tables: features.tables,
            group_by: features.group_by,
            order_by: features.order_by,
            lines: record.length.lines,
            characters: record.length.characters,
            complexity: record.complexity,
        }
    }
}

/// Write the CSV table, JSON table and Markdown report to `output_dir`.
pub fn write_output(output_dir: &Path, name: &str, batch: &BatchReport) -> Result<(), Error> {
    validate_output_name(name)?;

    std::fs::create_dir_all(output_dir).map_err(|source| Error::Io {
        path: output_dir.to_path_buf(),
        source,
    })?;

    let rows: Vec<OutputRow<'_>> = batch.records.iter().map(OutputRow::from).collect();

    // Write _analysis.csv
    let csv_path = output_dir.join(format!("{name}_analysis.csv"));
    write_csv(&csv_path, &rows)?;

    // Write _analysis.json
    let json_path = output_dir.join(format!("{name}_analysis.json"));
    let json = serde_json::to_string_pretty(&rows).map_err(|source| Error::Json {
        path: json_path.clone(),
        source,
    })?;
    write_file(&json_path, json.as_bytes())?;

    // Write _report.md
    let report_path = output_dir.join(format!("{name}_report.md"));
    let report_content = report::build_report(&batch.records, batch.skipped.len());
    write_file(&report_path, report_content.as_bytes())?;

    Ok(())
}

fn write_csv(path: &Path, rows: &[OutputRow<'_>]) -> Result<(), Error> {
    let csv_error = |source| Error::Csv {
        path: path.to_path_buf(),
        source,
    };
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(csv_error)?;
    writer.write_record(OUTPUT_COLUMNS).map_err(csv_error)?;
    for row in rows {
        writer.serialize(row).map_err(csv_error)?;
    }
    writer.flush().map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), Error> {
    std::fs::File::create(path)
        .and_then(|mut file| file.write_all(contents))
        .map_err(|source| Error::Io {
            path: path.to_path_buf(),
            source,
        })
}

fn validate_output_name(name: &str) -> Result<(), Error> {
    let invalid = |reason| Error::InvalidOutputName {
        name: name.to_string(),
        reason,
    };
    if name.trim().is_empty() {
        return Err(invalid("name must not be empty"));
    }
    let candidate = Path::new(name);
    if candidate.is_absolute() {
        return Err(invalid("absolute paths are not allowed"));
    }
    if candidate.components().any(|component| {
        matches!(
            component,
            Component::ParentDir | Component::RootDir | Component::Prefix(_)
        )
    }) {
        return Err(invalid("traversal segments are not allowed"));
    }
    if name.contains('/') || name.contains('\\') {
        return Err(invalid("path separators are not allowed"));
    }
    Ok(())
}
