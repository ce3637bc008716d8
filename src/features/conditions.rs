use crate::parser::{SyntaxNode, SyntaxTree};

/// Bare comparison operators that count as a condition on their own.
const COMPARISON_SYMBOLS: &[&str] = &[">", "<", ">=", "<=", "=", "<>", "!="];

/// Keywords that introduce a condition without forming a `Comparison` group.
const CONDITION_KEYWORDS: &[&str] = &["BETWEEN", "IN"];

/// Count condition units in the first top-level `WHERE` clause.
///
/// A `Comparison` counts once, a parenthesis counts its contents, an
/// identifier list counts its immediate comparisons, and `BETWEEN`, `IN` and
/// bare comparison operators count once each. A comparison operator left
/// ungrouped next to a grouped comparison is counted again.
pub fn count_where_conditions(tree: &SyntaxTree) -> usize {
    tree.children()
        .iter()
        .find_map(|node| match node {
            SyntaxNode::Where(clause) => Some(clause),
            _ => None,
        })
        .map_or(0, |clause| count_conditions(clause))
}

fn count_conditions(nodes: &[SyntaxNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            SyntaxNode::Comparison(_) => 1,
            SyntaxNode::Parenthesis(children) => count_conditions(children),
            SyntaxNode::IdentifierList(items) => items
                .iter()
                .filter(|item| matches!(item, SyntaxNode::Comparison(_)))
                .count(),
            SyntaxNode::Keyword(text) => usize::from(CONDITION_KEYWORDS.contains(&text.as_str())),
            SyntaxNode::Token(token) => usize::from(COMPARISON_SYMBOLS.contains(&token.text.as_str())),
            SyntaxNode::Dml(_)
            | SyntaxNode::Identifier(_)
            | SyntaxNode::Function(_)
            | SyntaxNode::Where(_)
            | SyntaxNode::Statement(_) => 0,
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn conditions(sql: &str) -> usize {
        count_where_conditions(&parse(sql).unwrap())
    }

    #[test]
    fn no_where_clause_means_zero() {
        assert_eq!(conditions("SELECT a FROM t"), 0);
    }

    #[test]
    fn each_comparison_counts_once() {
        assert_eq!(conditions("SELECT a FROM t WHERE a > 1"), 1);
        assert_eq!(conditions("SELECT a FROM t WHERE a > 1 AND b = 'x' OR c <> d"), 3);
    }

    #[test]
    fn parentheses_are_counted_through() {
        assert_eq!(
            conditions("SELECT a FROM t WHERE (a > 1 OR b < 2) AND c = 3"),
            3
        );
    }

    #[test]
    fn between_and_in_count_as_conditions() {
        assert_eq!(conditions("SELECT a FROM t WHERE a BETWEEN 1 AND 5"), 1);
        assert_eq!(conditions("SELECT a FROM t WHERE a IN (1, 2, 3)"), 1);
    }

    #[test]
    fn subquery_where_clauses_are_not_descended() {
        assert_eq!(
            conditions("SELECT a FROM t WHERE a IN (SELECT b FROM u WHERE c = 1)"),
            1
        );
    }

    #[test]
    fn ungrouped_operator_counts_as_a_condition() {
        // `-1` lexes as an operator and a literal, so `>` stays a bare token.
        assert_eq!(conditions("SELECT a FROM t WHERE a > -1"), 1);
        assert_eq!(conditions("SELECT a FROM t WHERE a > 1 AND b > -1"), 2);
    }

    #[test]
    fn like_predicates_count_through_their_comparison() {
        assert_eq!(conditions("SELECT a FROM t WHERE name LIKE 'A%'"), 1);
        assert_eq!(conditions("SELECT a FROM t WHERE name NOT LIKE 'A%'"), 1);
    }
}
