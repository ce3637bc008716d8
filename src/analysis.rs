use rayon::prelude::*;
use sqlparser::dialect::{dialect_from_str, Dialect, GenericDialect};
use tracing::{debug, info};

use crate::error::Error;
use crate::features::{FeatureCounts, QueryLength};
use crate::parser::{parse_with_dialect, ParseError};
use crate::scoring::ComplexityWeights;

/// Everything derived from one successfully parsed query.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryRecord {
    /// Raw query text as read from the input.
    pub query: String,
    /// The seven structural feature counts.
    pub features: FeatureCounts,
    /// Line and character length of `query`.
    pub length: QueryLength,
    /// Weighted complexity score.
    pub complexity: f64,
}

/// A query left out of the results because it did not parse.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedQuery {
    /// Zero-based position in the input.
    pub index: usize,
    /// Parser error message.
    pub reason: String,
}

/// Ordered results of a batch run.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BatchReport {
    /// One record per parsed query, in input order.
    pub records: Vec<QueryRecord>,
    /// Queries that produced no syntax tree.
    pub skipped: Vec<SkippedQuery>,
}

/// Parses and scores queries with a fixed dialect and weight set.
#[derive(Debug, Clone)]
pub struct Analyzer {
    dialect: String,
    weights: ComplexityWeights,
}

impl Analyzer {
    /// Create an analyzer for a dialect name understood by `sqlparser`
    /// (`generic`, `postgresql`, `mysql`, `sqlite`, ...).
    pub fn new(dialect: &str, weights: ComplexityWeights) -> Result<Self, Error> {
        if dialect_from_str(dialect).is_none() {
            return Err(Error::UnknownDialect(dialect.to_string()));
        }
        Ok(Self {
            dialect: dialect.to_string(),
            weights,
        })
    }

    /// Configured dialect name.
    pub fn dialect_name(&self) -> &str {
        &self.dialect
    }

    /// Configured score weights.
    pub fn weights(&self) -> &ComplexityWeights {
        &self.weights
    }

    fn dialect(&self) -> Box<dyn Dialect> {
        dialect_from_str(&self.dialect).unwrap_or_else(|| Box::new(GenericDialect {}))
    }

    /// Parse, count and score one query.
    pub fn analyze(&self, query: &str) -> Result<QueryRecord, ParseError> {
        self.analyze_with(query, &*self.dialect())
    }

    fn analyze_with(&self, query: &str, dialect: &dyn Dialect) -> Result<QueryRecord, ParseError> {
        let tree = parse_with_dialect(query, dialect)?;
        let features = FeatureCounts::extract(&tree);
        let length = QueryLength::of(query);
        Ok(QueryRecord {
            query: query.to_string(),
            features,
            length,
            complexity: self.weights.score(&features, &length),
        })
    }

    /// Analyze every query in parallel, keeping input order and dropping
    /// queries that fail to parse.
    pub fn analyze_batch<S>(&self, queries: &[S]) -> BatchReport
    where
        S: AsRef<str> + Sync,
    {
        let outcomes: Vec<Result<QueryRecord, ParseError>> = queries
            .par_iter()
            .map_init(
                || self.dialect(),
                |dialect, query| self.analyze_with(query.as_ref(), &**dialect),
            )
            .collect();

        let mut report = BatchReport::default();
        for (index, outcome) in outcomes.into_iter().enumerate() {
            match outcome {
                Ok(record) => report.records.push(record),
                Err(err) => {
                    debug!(index, error = %err, "skipping unparseable query");
                    report.skipped.push(SkippedQuery {
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }
        info!(
            analyzed = report.records.len(),
            skipped = report.skipped.len(),
            dialect = %self.dialect,
            "batch analysis finished"
        );
        report
    }
}

impl Default for Analyzer {
    fn default() -> Self {
        Self {
            dialect: "generic".to_string(),
            weights: ComplexityWeights::default(),
        }
    }
}

/// Analyze one query with the generic dialect and default weights.
pub fn analyze(query: &str) -> Result<QueryRecord, ParseError> {
    Analyzer::default().analyze(query)
}
