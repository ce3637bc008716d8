/// Writes the analysis tables and report to disk.
pub mod formatter;
/// Builds a Markdown feature-distribution report from analyzed queries.
pub mod report;
