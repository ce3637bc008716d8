use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors outside the per-query pipeline: input loading, configuration, output.
#[derive(Debug, Error)]
pub enum Error {
    /// Reading or writing a file failed.
    #[error("failed to access {}: {source}", path.display())]
    Io {
        /// File being accessed.
        path: PathBuf,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A CSV file could not be read or written.
    #[error("CSV error in {}: {source}", path.display())]
    Csv {
        /// File being read or written.
        path: PathBuf,
        /// Underlying CSV error.
        #[source]
        source: csv::Error,
    },

    /// A JSON file could not be read or written.
    #[error("JSON error in {}: {source}", path.display())]
    Json {
        /// File being read or written.
        path: PathBuf,
        /// Underlying JSON error.
        #[source]
        source: serde_json::Error,
    },

    /// The input table has no `sql` column.
    #[error("input {} has no `sql` column", path.display())]
    MissingSqlColumn {
        /// Input file.
        path: PathBuf,
    },

    /// The input file extension is neither `.csv` nor `.json`.
    #[error("unsupported input format for {}: expected .csv or .json", path.display())]
    UnsupportedFormat {
        /// Input file.
        path: PathBuf,
    },

    /// No SQL dialect is known by this name.
    #[error("unknown SQL dialect `{0}`")]
    UnknownDialect(String),

    /// The weights file is not a valid weights object.
    #[error("invalid complexity weights: {0}")]
    Weights(#[source] serde_json::Error),

    /// The output name would escape the output directory.
    #[error("invalid output name '{name}': {reason}")]
    InvalidOutputName {
        /// Rejected name.
        name: String,
        /// Why the name was rejected.
        reason: &'static str,
    },
}
