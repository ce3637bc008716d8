use crate::parser::{SyntaxNode, SyntaxTree};

/// Keywords that end the `FROM` clause scan.
const FROM_TERMINATORS: &[&str] = &["WHERE", "GROUP BY", "ORDER BY", "LIMIT"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FromScan {
    BeforeFrom,
    Collecting,
}

/// Count tables named after the top-level `FROM`.
///
/// Identifiers count once, identifier lists count their identifier members,
/// and any other group is scanned the same way over its own children, so an
/// unaliased derived table contributes the tables of its own `FROM`. A `WHERE`
/// group has no `FROM` of its own, so subqueries inside it add nothing.
pub fn count_tables(tree: &SyntaxTree) -> usize {
    count_tables_in(tree.children())
}

fn count_tables_in(nodes: &[SyntaxNode]) -> usize {
    let mut state = FromScan::BeforeFrom;
    let mut tables = 0;
    for node in nodes {
        if state == FromScan::Collecting {
            match node {
                SyntaxNode::Identifier(_) => tables += 1,
                SyntaxNode::IdentifierList(items) => {
                    tables += items
                        .iter()
                        .filter(|item| matches!(item, SyntaxNode::Identifier(_)))
                        .count();
                }
                SyntaxNode::Parenthesis(children)
                | SyntaxNode::Function(children)
                | SyntaxNode::Comparison(children)
                | SyntaxNode::Where(children)
                | SyntaxNode::Statement(children) => tables += count_tables_in(children),
                SyntaxNode::Keyword(_)
                    if FROM_TERMINATORS
                        .iter()
                        .any(|terminator| node.is_keyword(terminator)) =>
                {
                    break;
                }
                SyntaxNode::Keyword(_) | SyntaxNode::Dml(_) | SyntaxNode::Token(_) => {}
            }
        }
        if node.is_keyword("FROM") {
            state = FromScan::Collecting;
        }
    }
    tables
}
