//! Structural feature counters over a grouped syntax tree.
//!
//! Every counter is a pure function of the tree. Joins, tables, `GROUP BY` and
//! `ORDER BY` only look at the statement's immediate children; subqueries and
//! functions walk the whole tree; `WHERE` conditions walk the first top-level
//! `WHERE` clause.

/// `GROUP BY` / `ORDER BY` column counters.
pub mod clauses;
/// `WHERE`-clause condition counter.
pub mod conditions;
/// Function call counter.
pub mod functions;
/// Top-level `JOIN` counter.
pub mod joins;
/// Nested `SELECT` counter.
pub mod subqueries;
/// `FROM`-clause table counter.
pub mod tables;

use std::ops::Add;

use serde::{Deserialize, Serialize};

use crate::parser::SyntaxTree;

pub use clauses::{count_group_by, count_order_by};
pub use conditions::count_where_conditions;
pub use functions::count_functions;
pub use joins::count_joins;
pub use subqueries::count_subqueries;
pub use tables::count_tables;

/// Feature column names, in output order.
pub const FEATURE_COLUMNS: [&str; 7] = [
    "joins",
    "subqueries",
    "where_conditions",
    "functions",
    "tables",
    "group_by",
    "order_by",
];

/// The seven structural feature counts of one query.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureCounts {
    /// Bare `JOIN` keywords at the top level.
    pub joins: usize,
    /// `SELECT` verbs anywhere in the tree, minus the statement's own.
    /// Negative for statements without any `SELECT`.
    pub subqueries: i64,
    /// Predicates inside the top-level `WHERE` clause.
    pub where_conditions: usize,
    /// Function calls anywhere in the tree (nested calls count once).
    pub functions: usize,
    /// Tables named after the top-level `FROM`.
    pub tables: usize,
    /// Columns listed after the top-level `GROUP BY`.
    pub group_by: usize,
    /// Columns listed after the top-level `ORDER BY`.
    pub order_by: usize,
}

impl FeatureCounts {
    /// Run all seven counters over `tree`.
    pub fn extract(tree: &SyntaxTree) -> Self {
        Self {
            joins: count_joins(tree),
            subqueries: count_subqueries(tree),
            where_conditions: count_where_conditions(tree),
            functions: count_functions(tree),
            tables: count_tables(tree),
            group_by: count_group_by(tree),
            order_by: count_order_by(tree),
        }
    }

    /// Counts in [`FEATURE_COLUMNS`] order.
    pub fn values(&self) -> [i64; 7] {
        [
            to_i64(self.joins),
            self.subqueries,
            to_i64(self.where_conditions),
            to_i64(self.functions),
            to_i64(self.tables),
            to_i64(self.group_by),
            to_i64(self.order_by),
        ]
    }

    /// `(column, count)` pairs in [`FEATURE_COLUMNS`] order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, i64)> {
        FEATURE_COLUMNS.into_iter().zip(self.values())
    }
}

fn to_i64(count: usize) -> i64 {
    i64::try_from(count).unwrap_or(i64::MAX)
}

impl Add for FeatureCounts {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self {
            joins: self.joins + rhs.joins,
            subqueries: self.subqueries + rhs.subqueries,
            where_conditions: self.where_conditions + rhs.where_conditions,
            functions: self.functions + rhs.functions,
            tables: self.tables + rhs.tables,
            group_by: self.group_by + rhs.group_by,
            order_by: self.order_by + rhs.order_by,
        }
    }
}

/// Line and character length of the raw query text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryLength {
    /// Number of lines, split at every Unicode line boundary.
    pub lines: usize,
    /// Number of Unicode scalar values.
    pub characters: usize,
}

impl QueryLength {
    /// Measure `query`.
    pub fn of(query: &str) -> Self {
        Self {
            lines: count_lines(query),
            characters: query.chars().count(),
        }
    }
}

/// Line count over Unicode line boundaries; `\r\n` is one break and a
/// trailing break opens no extra line.
fn count_lines(text: &str) -> usize {
    let mut lines = 0;
    let mut open = false;
    let mut chars = text.chars().peekable();
    while let Some(c) = chars.next() {
        if is_line_break(c) {
            lines += 1;
            open = false;
            if c == '\r' {
                chars.next_if_eq(&'\n');
            }
        } else {
            open = true;
        }
    }
    lines + usize::from(open)
}

fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r'
            | '\u{0b}'
            | '\u{0c}'
            | '\u{1c}'
            | '\u{1d}'
            | '\u{1e}'
            | '\u{85}'
            | '\u{2028}'
            | '\u{2029}'
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    #[test]
    fn extract_runs_every_counter() {
        let tree = parse("SELECT COUNT(*) FROM t GROUP BY x, y ORDER BY x").unwrap();
        assert_eq!(
            FeatureCounts::extract(&tree),
            FeatureCounts {
                joins: 0,
                subqueries: 0,
                where_conditions: 0,
                functions: 1,
                tables: 1,
                group_by: 2,
                order_by: 1,
            }
        );
    }

    #[test]
    fn iter_follows_column_order() {
        let counts = FeatureCounts {
            joins: 1,
            subqueries: -1,
            where_conditions: 2,
            functions: 3,
            tables: 4,
            group_by: 5,
            order_by: 6,
        };
        let pairs: Vec<_> = counts.iter().collect();
        assert_eq!(pairs[0], ("joins", 1));
        assert_eq!(pairs[1], ("subqueries", -1));
        assert_eq!(pairs[6], ("order_by", 6));
    }

    #[test]
    fn query_length_counts_lines_and_chars() {
        assert_eq!(
            QueryLength::of("SELECT a\nFROM t\n"),
            QueryLength {
                lines: 2,
                characters: 16
            }
        );
        assert_eq!(QueryLength::of("SELECT 'é'").characters, 10);
        assert_eq!(QueryLength::of(""), QueryLength::default());
    }

    #[test]
    fn every_line_ending_style_splits_lines() {
        assert_eq!(QueryLength::of("SELECT a\rFROM t").lines, 2);
        assert_eq!(QueryLength::of("SELECT a\r\nFROM t\r\n").lines, 2);
        assert_eq!(QueryLength::of("SELECT a\u{2028}FROM t").lines, 2);
        assert_eq!(QueryLength::of("SELECT a\n\nFROM t").lines, 3);
        assert_eq!(QueryLength::of("\n").lines, 1);
    }
}
