//! Score SQL queries by structural complexity for NL-to-SQL dataset curation.
#![warn(missing_docs)]

/// Single-query and batch analysis.
pub mod analysis;
/// Fatal error type for input, configuration and output.
pub mod error;
/// Structural feature counters.
pub mod features;
/// Query table loading from CSV or JSON.
pub mod input;
/// File output and markdown report generation.
pub mod output;
/// SQL tokenizing and grouping into a syntax tree.
pub mod parser;
/// Weighted complexity scoring.
pub mod scoring;

pub use analysis::{analyze, Analyzer, BatchReport, QueryRecord};
pub use error::Error;
pub use features::{FeatureCounts, QueryLength};
pub use parser::{parse, ParseError, SyntaxTree};
pub use scoring::{complexity, ComplexityWeights};
