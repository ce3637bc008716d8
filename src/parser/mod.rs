//! SQL text to grouped syntax tree.
//!
//! Tokenization is delegated to `sqlparser`; the grouping passes rebuild the
//! loosely typed token-group tree the feature counters walk.

/// Grouping passes over lexed leaves.
mod grouping;
/// Token stream to leaf conversion, compound keyword merging.
mod lexer;
/// Syntax node and tree types.
pub mod tree;

use sqlparser::dialect::{Dialect, GenericDialect};
use sqlparser::tokenizer::TokenizerError;
use thiserror::Error;

pub use tree::{list_members, SyntaxNode, SyntaxTree, Token, TokenKind};

/// Deepest parenthesis nesting accepted before a query is rejected.
pub const MAX_NESTING_DEPTH: usize = 256;

/// Reasons a query yields no syntax tree.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The tokenizer rejected the text (unterminated string, stray character, ...).
    #[error("tokenizer error: {0}")]
    Tokenize(#[from] TokenizerError),
    /// The text holds no SQL tokens once whitespace, comments and `;` are removed.
    #[error("query contains no SQL tokens")]
    Empty,
    /// Parenthesis nesting exceeds the supported depth.
    #[error("parenthesis nesting exceeds {0} levels")]
    TooDeep(usize),
}

/// Parse `sql` with the generic dialect.
pub fn parse(sql: &str) -> Result<SyntaxTree, ParseError> {
    parse_with_dialect(sql, &GenericDialect {})
}

/// Parse the first statement of `sql` into a grouped syntax tree.
pub fn parse_with_dialect(sql: &str, dialect: &dyn Dialect) -> Result<SyntaxTree, ParseError> {
    let leaves = lexer::lex(sql, dialect)?;
    let nested = grouping::nest_parentheses(leaves, MAX_NESTING_DEPTH)?;
    Ok(SyntaxTree::new(grouping::group(nested)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn name(text: &str) -> SyntaxNode {
        SyntaxNode::token(TokenKind::Name, text)
    }

    fn ident(text: &str) -> SyntaxNode {
        SyntaxNode::Identifier(vec![name(text)])
    }

    fn punct(text: &str) -> SyntaxNode {
        SyntaxNode::token(TokenKind::Punctuation, text)
    }

    #[test]
    fn simple_select_has_flat_top_level() {
        let tree = parse("SELECT a FROM t").unwrap();
        assert_eq!(
            tree.children(),
            &[
                SyntaxNode::Dml("SELECT".to_string()),
                ident("a"),
                SyntaxNode::keyword("FROM"),
                ident("t"),
            ]
        );
    }

    #[test]
    fn where_clause_wraps_its_predicates() {
        let tree = parse("SELECT a FROM t WHERE a > 1 ORDER BY a").unwrap();
        let children = tree.children();
        assert_eq!(
            children[4],
            SyntaxNode::Where(vec![
                SyntaxNode::keyword("WHERE"),
                SyntaxNode::Comparison(vec![
                    ident("a"),
                    SyntaxNode::token(TokenKind::Comparison, ">"),
                    SyntaxNode::token(TokenKind::Literal, "1"),
                ]),
            ])
        );
        assert_eq!(children[5], SyntaxNode::keyword("ORDER BY"));
    }

    #[test]
    fn function_call_holds_callee_and_arguments() {
        let tree = parse("SELECT COUNT(*) FROM t").unwrap();
        assert_eq!(
            tree.children()[1],
            SyntaxNode::Function(vec![
                ident("COUNT"),
                SyntaxNode::Parenthesis(vec![
                    punct("("),
                    SyntaxNode::token(TokenKind::Wildcard, "*"),
                    punct(")"),
                ]),
            ])
        );
    }

    #[test]
    fn aliases_and_ordering_fold_into_identifiers() {
        let tree = parse("SELECT u.name AS n FROM users u ORDER BY n DESC").unwrap();
        let children = tree.children();
        assert_eq!(children[1].to_string(), "u . name AS n");
        assert!(matches!(children[1], SyntaxNode::Identifier(_)));
        assert_eq!(children[3], SyntaxNode::Identifier(vec![name("users"), ident("u")]));
        assert_eq!(children[5].to_string(), "n DESC");
    }

    #[test]
    fn comma_runs_become_identifier_lists() {
        let tree = parse("SELECT a, b, c FROM t").unwrap();
        let SyntaxNode::IdentifierList(items) = &tree.children()[1] else {
            panic!("expected identifier list, got {:?}", tree.children()[1]);
        };
        assert_eq!(list_members(items).count(), 3);
    }

    #[test]
    fn nested_where_closes_at_its_bracket() {
        let tree = parse("SELECT a FROM t WHERE b IN (SELECT c FROM u WHERE d = 1)").unwrap();
        let SyntaxNode::Where(clause) = &tree.children()[4] else {
            panic!("expected WHERE group");
        };
        let SyntaxNode::Parenthesis(inner) = &clause[3] else {
            panic!("expected subquery parenthesis, got {:?}", clause[3]);
        };
        assert!(matches!(inner[5], SyntaxNode::Where(_)));
        assert_eq!(inner.last(), Some(&punct(")")));
    }

    #[test]
    fn deep_nesting_is_rejected() {
        let sql = format!(
            "SELECT {}1{}",
            "(".repeat(MAX_NESTING_DEPTH + 1),
            ")".repeat(MAX_NESTING_DEPTH + 1)
        );
        assert!(matches!(parse(&sql), Err(ParseError::TooDeep(_))));
    }

    #[test]
    fn empty_text_is_rejected() {
        assert!(matches!(parse(""), Err(ParseError::Empty)));
    }
}
