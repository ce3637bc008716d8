use std::fmt;

/// Category of a leaf token that is neither a keyword nor a DML verb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    /// Unquoted or quoted object name (`orders`, `"Order Lines"`).
    Name,
    /// Number, string, or placeholder literal.
    Literal,
    /// `*` in projection position (`SELECT *`, `COUNT(*)`, `t.*`).
    Wildcard,
    /// Arithmetic or other non-comparison operator.
    Operator,
    /// Binary comparison operator (`=`, `<>`, `LIKE`, ...).
    Comparison,
    /// Brackets, commas, periods, casts.
    Punctuation,
}

/// A leaf token other than a keyword or DML verb.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token category.
    pub kind: TokenKind,
    /// Normalized source text.
    pub text: String,
}

impl Token {
    /// Build a token of the given kind.
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
        }
    }
}

/// A node of the grouped syntax tree.
///
/// Leaves (`Keyword`, `Dml`, `Token`) carry normalized text; every other
/// variant is a group whose children are kept in source order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyntaxNode {
    /// Reserved word, uppercased, compound phrases joined by one space
    /// (`FROM`, `GROUP BY`, `LEFT JOIN`).
    Keyword(String),
    /// Data-manipulation verb, uppercased (`SELECT`, `UPDATE`).
    Dml(String),
    /// Any other leaf token.
    Token(Token),
    /// A referenced name, possibly dotted, cast, ordered, or aliased.
    Identifier(Vec<SyntaxNode>),
    /// Comma-separated run of list members, commas included.
    IdentifierList(Vec<SyntaxNode>),
    /// Bracketed sub-tree, brackets included.
    Parenthesis(Vec<SyntaxNode>),
    /// Call expression: the callee identifier followed by its argument parenthesis.
    Function(Vec<SyntaxNode>),
    /// Binary predicate: left operand, comparison operator, right operand.
    Comparison(Vec<SyntaxNode>),
    /// `WHERE` keyword and every predicate node up to the clause terminator.
    Where(Vec<SyntaxNode>),
    /// Generic group; the root of every tree is one.
    Statement(Vec<SyntaxNode>),
}

impl SyntaxNode {
    pub(crate) fn keyword(text: impl Into<String>) -> Self {
        Self::Keyword(text.into())
    }

    pub(crate) fn token(kind: TokenKind, text: impl Into<String>) -> Self {
        Self::Token(Token::new(kind, text))
    }

    /// Children of a group node, `None` for leaves.
    pub fn children(&self) -> Option<&[SyntaxNode]> {
        match self {
            Self::Keyword(_) | Self::Dml(_) | Self::Token(_) => None,
            Self::Identifier(children)
            | Self::IdentifierList(children)
            | Self::Parenthesis(children)
            | Self::Function(children)
            | Self::Comparison(children)
            | Self::Where(children)
            | Self::Statement(children) => Some(children),
        }
    }

    /// Normalized text of a leaf, `None` for groups.
    pub fn normalized(&self) -> Option<&str> {
        match self {
            Self::Keyword(text) | Self::Dml(text) => Some(text),
            Self::Token(token) => Some(&token.text),
            _ => None,
        }
    }

    /// Returns `true` for a keyword leaf whose text equals `text` (case-insensitive).
    pub fn is_keyword(&self, text: &str) -> bool {
        matches!(self, Self::Keyword(kw) if kw.eq_ignore_ascii_case(text))
    }

    /// Returns `true` for a punctuation leaf with exactly this text.
    pub fn is_punctuation(&self, text: &str) -> bool {
        self.is_token(TokenKind::Punctuation, text)
    }

    pub(crate) fn is_token(&self, kind: TokenKind, text: &str) -> bool {
        matches!(self, Self::Token(token) if token.kind == kind && token.text == text)
    }

    pub(crate) fn token_kind(&self) -> Option<TokenKind> {
        match self {
            Self::Token(token) => Some(token.kind),
            _ => None,
        }
    }
}

/// Members of an identifier list: every child except separators.
pub fn list_members(items: &[SyntaxNode]) -> impl Iterator<Item = &SyntaxNode> {
    items
        .iter()
        .filter(|item| item.token_kind() != Some(TokenKind::Punctuation))
}

impl fmt::Display for SyntaxNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Keyword(text) | Self::Dml(text) => f.write_str(text),
            Self::Token(token) => f.write_str(&token.text),
            _ => {
                let mut first = true;
                for child in self.children().unwrap_or_default() {
                    if !first {
                        f.write_str(" ")?;
                    }
                    write!(f, "{child}")?;
                    first = false;
                }
                Ok(())
            }
        }
    }
}

/// A grouped syntax tree for one SQL statement.
///
/// Only the parser builds trees, so every tree respects the parser's nesting
/// ceiling and can be walked recursively without a depth guard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyntaxTree {
    root: SyntaxNode,
}

impl SyntaxTree {
    pub(crate) fn new(children: Vec<SyntaxNode>) -> Self {
        Self {
            root: SyntaxNode::Statement(children),
        }
    }

    /// The root statement group.
    pub fn root(&self) -> &SyntaxNode {
        &self.root
    }

    /// Immediate children of the root, in source order.
    pub fn children(&self) -> &[SyntaxNode] {
        self.root.children().unwrap_or_default()
    }

    /// Returns `true` when the statement has no children at all.
    pub fn is_empty(&self) -> bool {
        self.children().is_empty()
    }
}

impl fmt::Display for SyntaxTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.root.fmt(f)
    }
}
