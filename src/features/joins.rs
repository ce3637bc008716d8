use crate::parser::SyntaxTree;

/// Count bare `JOIN` keywords among the statement's immediate children.
///
/// Qualified phrases (`LEFT JOIN`, `INNER JOIN`) are single keywords with
/// their own text and do not match; joins inside parentheses are not visited.
pub fn count_joins(tree: &SyntaxTree) -> usize {
    tree.children()
        .iter()
        .filter(|node| node.is_keyword("JOIN"))
        .count()
}
