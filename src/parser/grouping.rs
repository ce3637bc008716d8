//! Grouping passes that turn a flat run of leaves into the nested tree.
//!
//! Passes run inside-out: every parenthesis is grouped before the token list
//! that contains it, and each list goes through the passes in a fixed order
//! (functions, identifiers, postfix, comparisons, aliases, lists, `WHERE`).

use super::tree::{SyntaxNode, TokenKind};
use super::ParseError;

/// Keywords that close a `WHERE` clause.
const WHERE_TERMINATORS: &[&str] = &[
    "ORDER BY",
    "GROUP BY",
    "LIMIT",
    "UNION",
    "UNION ALL",
    "EXCEPT",
    "INTERSECT",
    "HAVING",
    "RETURNING",
    "INTO",
];

/// Nest balanced brackets into `Parenthesis` groups.
///
/// An unmatched `)` stays a plain punctuation leaf; an unclosed `(` is closed
/// at end of input.
pub(crate) fn nest_parentheses(
    leaves: Vec<SyntaxNode>,
    max_depth: usize,
) -> Result<Vec<SyntaxNode>, ParseError> {
    let mut stack: Vec<Vec<SyntaxNode>> = vec![Vec::new()];
    for leaf in leaves {
        if leaf.is_punctuation("(") {
            if stack.len() > max_depth {
                return Err(ParseError::TooDeep(max_depth));
            }
            stack.push(vec![leaf]);
        } else if leaf.is_punctuation(")") && stack.len() > 1 {
            if let Some(mut inner) = stack.pop() {
                inner.push(leaf);
                push_into_top(&mut stack, SyntaxNode::Parenthesis(inner));
            }
        } else {
            push_into_top(&mut stack, leaf);
        }
    }
    while stack.len() > 1 {
        if let Some(inner) = stack.pop() {
            push_into_top(&mut stack, SyntaxNode::Parenthesis(inner));
        }
    }
    Ok(stack.pop().unwrap_or_default())
}

fn push_into_top(stack: &mut [Vec<SyntaxNode>], node: SyntaxNode) {
    if let Some(top) = stack.last_mut() {
        top.push(node);
    }
}

/// Run every grouping pass over `nodes`, innermost parentheses first.
pub(crate) fn group(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let nodes = nodes
        .into_iter()
        .map(|node| match node {
            SyntaxNode::Parenthesis(children) => SyntaxNode::Parenthesis(group(children)),
            other => other,
        })
        .collect();

    let nodes = group_functions(nodes);
    let nodes = group_identifiers(nodes);
    let nodes = group_postfix(nodes);
    let nodes = group_comparisons(nodes);
    let nodes = group_aliases(nodes);
    let nodes = group_identifier_lists(nodes);
    group_where(nodes)
}

/// `name (args)` becomes `Function[Identifier[name], Parenthesis]`.
fn group_functions(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        if node.token_kind() == Some(TokenKind::Name) {
            if let Some(args) = iter.next_if(|next| matches!(next, SyntaxNode::Parenthesis(_))) {
                out.push(SyntaxNode::Function(vec![
                    SyntaxNode::Identifier(vec![node]),
                    args,
                ]));
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// Names and dotted chains (`schema.table.column`, `t.*`) become identifiers.
fn group_identifiers(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        if node.token_kind() != Some(TokenKind::Name) {
            out.push(node);
            continue;
        }
        let mut parts = vec![node];
        while let Some(dot) = iter.next_if(|next| next.is_punctuation(".")) {
            parts.push(dot);
            match iter.next_if(|next| {
                matches!(
                    next.token_kind(),
                    Some(TokenKind::Name | TokenKind::Wildcard)
                )
            }) {
                Some(part) => parts.push(part),
                None => break,
            }
        }
        out.push(SyntaxNode::Identifier(parts));
    }
    out
}

/// Fold `::type` casts and `ASC`/`DESC` into the preceding operand.
fn group_postfix(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        let castable = matches!(
            node,
            SyntaxNode::Identifier(_) | SyntaxNode::Function(_)
        ) || node.token_kind() == Some(TokenKind::Literal);
        if !castable {
            out.push(node);
            continue;
        }

        let mut tail = Vec::new();
        while let Some(cast) = iter.next_if(|next| next.is_punctuation("::")) {
            tail.push(cast);
            match iter.next_if(|next| {
                matches!(next, SyntaxNode::Identifier(_) | SyntaxNode::Function(_))
            }) {
                Some(target) => tail.push(target),
                None => break,
            }
        }
        // String literals never take a sort direction; ordinals (`ORDER BY 2 DESC`) do.
        if node.token_kind() != Some(TokenKind::Literal) || is_number(&node) || !tail.is_empty() {
            if let Some(direction) =
                iter.next_if(|next| next.is_keyword("ASC") || next.is_keyword("DESC"))
            {
                tail.push(direction);
            }
        }

        out.push(if tail.is_empty() {
            node
        } else {
            extend_identifier(node, tail)
        });
    }
    out
}

/// `left <op> right` becomes a `Comparison` when both sides are operands.
fn group_comparisons(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out: Vec<SyntaxNode> = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        if node.token_kind() == Some(TokenKind::Comparison) && out.last().is_some_and(is_operand) {
            if let Some(right) = iter.next_if(is_operand) {
                let mut parts = out.split_off(out.len() - 1);
                parts.extend([node, right]);
                out.push(SyntaxNode::Comparison(parts));
                continue;
            }
        }
        out.push(node);
    }
    out
}

/// `x AS y` and implicit `x y` become one aliased identifier.
fn group_aliases(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        let explicit = matches!(
            node,
            SyntaxNode::Identifier(_) | SyntaxNode::Function(_) | SyntaxNode::Parenthesis(_)
        ) || node.token_kind() == Some(TokenKind::Literal);
        if !explicit {
            out.push(node);
            continue;
        }

        if let Some(as_keyword) = iter.next_if(|next| next.is_keyword("AS")) {
            match iter.next_if(|next| matches!(next, SyntaxNode::Identifier(_))) {
                Some(alias) => out.push(extend_identifier(node, vec![as_keyword, alias])),
                None => out.extend([node, as_keyword]),
            }
            continue;
        }

        let implicit = node.token_kind() != Some(TokenKind::Literal);
        match iter.next_if(|next| implicit && matches!(next, SyntaxNode::Identifier(_))) {
            Some(alias) => out.push(extend_identifier(node, vec![alias])),
            None => out.push(node),
        }
    }
    out
}

/// Comma-separated runs of list members become one `IdentifierList`.
fn group_identifier_lists(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out: Vec<SyntaxNode> = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    let mut list_open = false;
    while let Some(node) = iter.next() {
        let joins_run = node.is_punctuation(",")
            && (list_open || out.last().is_some_and(is_list_member));
        if joins_run {
            if let Some(next) = iter.next_if(is_list_member) {
                if list_open {
                    if let Some(SyntaxNode::IdentifierList(items)) = out.last_mut() {
                        items.extend([node, next]);
                        continue;
                    }
                }
                let mut items = out.split_off(out.len() - 1);
                items.extend([node, next]);
                out.push(SyntaxNode::IdentifierList(items));
                list_open = true;
                continue;
            }
        }
        list_open = false;
        out.push(node);
    }
    out
}

/// `WHERE` and everything up to its terminator become one `Where` group.
fn group_where(nodes: Vec<SyntaxNode>) -> Vec<SyntaxNode> {
    let mut out = Vec::with_capacity(nodes.len());
    let mut iter = nodes.into_iter().peekable();
    while let Some(node) = iter.next() {
        if !node.is_keyword("WHERE") {
            out.push(node);
            continue;
        }
        let mut clause = vec![node];
        while let Some(next) = iter.next_if(|next| !closes_where(next)) {
            clause.push(next);
        }
        out.push(SyntaxNode::Where(clause));
    }
    out
}

fn closes_where(node: &SyntaxNode) -> bool {
    node.is_punctuation(")")
        || WHERE_TERMINATORS
            .iter()
            .any(|terminator| node.is_keyword(terminator))
}

fn is_number(node: &SyntaxNode) -> bool {
    matches!(node, SyntaxNode::Token(token)
        if token.kind == TokenKind::Literal
            && token.text.starts_with(|c: char| c.is_ascii_digit() || c == '.'))
}

fn is_operand(node: &SyntaxNode) -> bool {
    match node {
        SyntaxNode::Identifier(_) | SyntaxNode::Function(_) | SyntaxNode::Parenthesis(_) => true,
        SyntaxNode::Token(token) => matches!(token.kind, TokenKind::Name | TokenKind::Literal),
        SyntaxNode::Keyword(_) => {
            node.is_keyword("NULL") || node.is_keyword("TRUE") || node.is_keyword("FALSE")
        }
        _ => false,
    }
}

fn is_list_member(node: &SyntaxNode) -> bool {
    match node {
        SyntaxNode::Identifier(_)
        | SyntaxNode::Function(_)
        | SyntaxNode::Parenthesis(_)
        | SyntaxNode::Comparison(_) => true,
        SyntaxNode::Token(token) => matches!(
            token.kind,
            TokenKind::Name | TokenKind::Literal | TokenKind::Wildcard
        ),
        SyntaxNode::Keyword(_) => node.is_keyword("NULL"),
        _ => false,
    }
}

/// Append `tail` to an identifier, or wrap a non-identifier head in a new one.
fn extend_identifier(head: SyntaxNode, tail: Vec<SyntaxNode>) -> SyntaxNode {
    match head {
        SyntaxNode::Identifier(mut children) => {
            children.extend(tail);
            SyntaxNode::Identifier(children)
        }
        other => {
            let mut children = Vec::with_capacity(tail.len() + 1);
            children.push(other);
            children.extend(tail);
            SyntaxNode::Identifier(children)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::token(TokenKind::Name, text)
    }

    fn punct(text: &str) -> SyntaxNode {
        SyntaxNode::token(TokenKind::Punctuation, text)
    }

    #[test]
    fn nesting_closes_unbalanced_brackets() {
        let nested = nest_parentheses(vec![punct("("), name("a")], 8).unwrap();
        assert_eq!(
            nested,
            vec![SyntaxNode::Parenthesis(vec![punct("("), name("a")])]
        );

        let stray = nest_parentheses(vec![name("a"), punct(")")], 8).unwrap();
        assert_eq!(stray, vec![name("a"), punct(")")]);
    }

    #[test]
    fn nesting_beyond_ceiling_fails() {
        let leaves = (0..4).map(|_| punct("(")).collect();
        assert!(matches!(
            nest_parentheses(leaves, 3),
            Err(ParseError::TooDeep(3))
        ));
    }

    #[test]
    fn dotted_names_form_one_identifier() {
        let grouped = group(vec![name("t"), punct("."), name("id")]);
        assert_eq!(
            grouped,
            vec![SyntaxNode::Identifier(vec![name("t"), punct("."), name("id")])]
        );
    }

    #[test]
    fn numbers_take_a_sort_direction_but_strings_do_not() {
        let desc = SyntaxNode::keyword("DESC");
        let number = SyntaxNode::token(TokenKind::Literal, "2");
        assert_eq!(
            group(vec![number.clone(), desc.clone()]),
            vec![SyntaxNode::Identifier(vec![number, desc.clone()])]
        );

        let string = SyntaxNode::token(TokenKind::Literal, "'x'");
        assert_eq!(
            group(vec![string.clone(), desc.clone()]),
            vec![string, desc]
        );
    }

    #[test]
    fn trailing_comma_does_not_extend_the_list() {
        let grouped = group(vec![name("a"), punct(","), name("b"), punct(",")]);
        assert_eq!(grouped.len(), 2);
        assert!(matches!(grouped[0], SyntaxNode::IdentifierList(ref items) if items.len() == 3));
        assert_eq!(grouped[1], punct(","));
    }
}
