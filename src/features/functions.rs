use crate::parser::{list_members, SyntaxNode, SyntaxTree};

/// Count function calls anywhere in the tree.
///
/// A call counts once and its arguments are not searched, so
/// `ROUND(AVG(x))` is a single function.
pub fn count_functions(tree: &SyntaxTree) -> usize {
    tree.children().iter().map(count_in).sum()
}

fn count_in(node: &SyntaxNode) -> usize {
    match node {
        SyntaxNode::Function(_) => 1,
        SyntaxNode::IdentifierList(items) => list_members(items).map(count_in).sum(),
        SyntaxNode::Identifier(children)
        | SyntaxNode::Parenthesis(children)
        | SyntaxNode::Comparison(children)
        | SyntaxNode::Where(children)
        | SyntaxNode::Statement(children) => children.iter().map(count_in).sum(),
        SyntaxNode::Keyword(_) | SyntaxNode::Dml(_) | SyntaxNode::Token(_) => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse;

    fn functions(sql: &str) -> usize {
        count_functions(&parse(sql).unwrap())
    }

    #[test]
    fn counts_calls_in_projection_and_predicates() {
        assert_eq!(functions("SELECT a FROM t"), 0);
        assert_eq!(functions("SELECT COUNT(*) FROM t"), 1);
        assert_eq!(
            functions("SELECT MAX(a), MIN(b) AS lo FROM t WHERE LOWER(c) = 'x'"),
            3
        );
    }

    #[test]
    fn nested_calls_count_once() {
        assert_eq!(functions("SELECT ROUND(AVG(price), 2) FROM t"), 1);
    }

    #[test]
    fn calls_inside_subqueries_count() {
        assert_eq!(
            functions("SELECT a FROM t WHERE b > (SELECT AVG(b) FROM t)"),
            1
        );
    }
}
