use crate::parser::{list_members, SyntaxNode, SyntaxTree};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClauseScan {
    Before,
    Active,
}

/// Count the columns listed after the top-level `GROUP BY`.
pub fn count_group_by(tree: &SyntaxTree) -> usize {
    count_clause_columns(tree.children(), "GROUP BY")
}

/// Count the columns listed after the top-level `ORDER BY`.
pub fn count_order_by(tree: &SyntaxTree) -> usize {
    count_clause_columns(tree.children(), "ORDER BY")
}

/// Scan siblings for `clause`, then count identifiers until the next keyword.
///
/// An identifier list counts all of its members; a bare identifier counts
/// one. Literals and function calls outside a list are not columns.
fn count_clause_columns(nodes: &[SyntaxNode], clause: &str) -> usize {
    let mut state = ClauseScan::Before;
    let mut columns = 0;
    for node in nodes {
        if state == ClauseScan::Active && matches!(node, SyntaxNode::Keyword(_)) {
            break;
        }
        if node.is_keyword(clause) {
            state = ClauseScan::Active;
        }
        if state == ClauseScan::Active {
            match node {
                SyntaxNode::IdentifierList(items) => columns += list_members(items).count(),
                SyntaxNode::Identifier(_) => columns += 1,
                _ => {}
            }
        }
    }
    columns
}
