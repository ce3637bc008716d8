use sql_complexity::{complexity, ComplexityWeights, FeatureCounts};

fn counts(values: [usize; 6], subqueries: i64) -> FeatureCounts {
    let [joins, where_conditions, functions, tables, group_by, order_by] = values;
    FeatureCounts {
        joins,
        subqueries,
        where_conditions,
        functions,
        tables,
        group_by,
        order_by,
    }
}

#[test]
fn score_is_linear_in_the_counts() {
    let samples = [
        counts([0, 0, 0, 1, 0, 0], 0),
        counts([1, 1, 0, 2, 0, 0], 0),
        counts([0, 0, 1, 1, 2, 1], 0),
        counts([3, 4, 2, 5, 1, 2], 2),
        counts([0, 0, 0, 0, 0, 0], -1),
    ];
    for left in samples {
        for right in samples {
            assert_eq!(
                complexity(&left) + complexity(&right),
                complexity(&(left + right)),
                "{left:?} + {right:?}"
            );
        }
    }
}

#[test]
fn each_feature_carries_its_weight() {
    let unit = [
        (counts([1, 0, 0, 0, 0, 0], 0), 1.5),
        (counts([0, 0, 0, 0, 0, 0], 1), 2.0),
        (counts([0, 1, 0, 0, 0, 0], 0), 1.0),
        (counts([0, 0, 1, 0, 0, 0], 0), 1.5),
        (counts([0, 0, 0, 1, 0, 0], 0), 1.0),
        (counts([0, 0, 0, 0, 1, 0], 0), 1.0),
        (counts([0, 0, 0, 0, 0, 1], 0), 1.0),
    ];
    for (features, expected) in unit {
        assert_eq!(complexity(&features), expected, "{features:?}");
    }
}

#[test]
fn no_select_lowers_the_score() {
    assert_eq!(complexity(&counts([0, 0, 0, 1, 0, 0], -1)), -1.0);
}

#[test]
fn weights_file_round_trips_through_json() {
    let weights = ComplexityWeights {
        joins: 2.0,
        characters: 0.25,
        ..ComplexityWeights::default()
    };
    let json = serde_json::to_string(&weights).expect("weights should serialize");
    assert_eq!(
        ComplexityWeights::load_from_json(&json).expect("weights should parse"),
        weights
    );
}
