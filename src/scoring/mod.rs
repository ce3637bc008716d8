/// Configurable score weights.
pub mod weights;

pub use weights::ComplexityWeights;

use crate::features::FeatureCounts;

/// Complexity score with the default weights:
/// `joins*1.5 + subqueries*2 + where_conditions + functions*1.5 + tables + group_by + order_by`.
pub fn complexity(features: &FeatureCounts) -> f64 {
    ComplexityWeights::default().score_features(features)
}
