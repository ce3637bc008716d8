use serde::{Deserialize, Serialize};

use crate::error::Error;
use crate::features::{FeatureCounts, QueryLength};

/// Per-feature multipliers for the complexity score.
///
/// Length weights default to zero; set them to fold query size into the score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComplexityWeights {
    /// Weight per top-level join.
    pub joins: f64,
    /// Weight per nested `SELECT`.
    pub subqueries: f64,
    /// Weight per `WHERE` condition.
    pub where_conditions: f64,
    /// Weight per function call.
    pub functions: f64,
    /// Weight per table.
    pub tables: f64,
    /// Weight per `GROUP BY` column.
    pub group_by: f64,
    /// Weight per `ORDER BY` column.
    pub order_by: f64,
    /// Weight per line of query text.
    pub lines: f64,
    /// Weight per character of query text.
    pub characters: f64,
}

impl Default for ComplexityWeights {
    fn default() -> Self {
        Self {
            joins: 1.5,
            subqueries: 2.0,
            where_conditions: 1.0,
            functions: 1.5,
            tables: 1.0,
            group_by: 1.0,
            order_by: 1.0,
            lines: 0.0,
            characters: 0.0,
        }
    }
}

impl ComplexityWeights {
    /// Parse weights from a JSON object; omitted fields keep their defaults.
    pub fn load_from_json(json: &str) -> Result<Self, Error> {
        serde_json::from_str(json).map_err(Error::Weights)
    }

    /// Weighted sum of the seven feature counts.
    #[allow(clippy::cast_precision_loss)]
    pub fn score_features(&self, features: &FeatureCounts) -> f64 {
        features.joins as f64 * self.joins
            + features.subqueries as f64 * self.subqueries
            + features.where_conditions as f64 * self.where_conditions
            + features.functions as f64 * self.functions
            + features.tables as f64 * self.tables
            + features.group_by as f64 * self.group_by
            + features.order_by as f64 * self.order_by
    }

    /// Feature score plus the weighted query length.
    #[allow(clippy::cast_precision_loss)]
    pub fn score(&self, features: &FeatureCounts, length: &QueryLength) -> f64 {
        self.score_features(features)
            + length.lines as f64 * self.lines
            + length.characters as f64 * self.characters
    }
}
