use crate::parser::{SyntaxNode, SyntaxTree};

/// Count nested `SELECT` statements.
///
/// Every `SELECT` verb in the tree is counted, then the statement's own is
/// subtracted. A statement without any `SELECT` therefore yields `-1`; an
/// empty tree yields `0`.
pub fn count_subqueries(tree: &SyntaxTree) -> i64 {
    if tree.is_empty() {
        return 0;
    }
    let selects = i64::try_from(count_selects(tree.children())).unwrap_or(i64::MAX);
    selects - 1
}

fn count_selects(nodes: &[SyntaxNode]) -> usize {
    nodes
        .iter()
        .map(|node| match node {
            SyntaxNode::Dml(verb) => usize::from(verb.eq_ignore_ascii_case("select")),
            SyntaxNode::Keyword(_) | SyntaxNode::Token(_) => 0,
            SyntaxNode::Identifier(children)
            | SyntaxNode::IdentifierList(children)
            | SyntaxNode::Parenthesis(children)
            | SyntaxNode::Function(children)
            | SyntaxNode::Comparison(children)
            | SyntaxNode::Where(children)
            | SyntaxNode::Statement(children) => count_selects(children),
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn subqueries(sql: &str) -> i64 {
        count_subqueries(&parse(sql).unwrap())
    }

    #[test]
    fn single_select_has_no_subqueries() {
        assert_eq!(subqueries("SELECT a FROM t WHERE b = 1"), 0);
    }

    #[test]
    fn counts_selects_at_any_depth() {
        assert_eq!(
            subqueries("SELECT a FROM t WHERE b IN (SELECT b FROM u)"),
            1
        );
        assert_eq!(
            subqueries(
                "SELECT a FROM (SELECT a FROM t WHERE a IN (SELECT a FROM u)) s \
                 WHERE EXISTS (SELECT 1 FROM v)"
            ),
            3
        );
    }

    #[test]
    fn selects_inside_function_arguments_count() {
        assert_eq!(
            subqueries("SELECT COALESCE((SELECT MAX(x) FROM u), 0) FROM t"),
            1
        );
    }

    #[test]
    fn statement_without_select_goes_negative() {
        assert_eq!(subqueries("UPDATE t SET a = 1"), -1);
    }
}
