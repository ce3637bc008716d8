use sqlparser::dialect::Dialect;
use sqlparser::keywords::Keyword;
use sqlparser::tokenizer::{Token as SqlToken, Tokenizer, Word};

use super::tree::{SyntaxNode, TokenKind};
use super::ParseError;

/// Words kept as `Keyword` leaves; every other unquoted word is a name.
const STRUCTURAL_KEYWORDS: &[Keyword] = &[
    Keyword::FROM,
    Keyword::WHERE,
    Keyword::GROUP,
    Keyword::ORDER,
    Keyword::PARTITION,
    Keyword::BY,
    Keyword::HAVING,
    Keyword::LIMIT,
    Keyword::OFFSET,
    Keyword::FETCH,
    Keyword::TOP,
    Keyword::JOIN,
    Keyword::INNER,
    Keyword::LEFT,
    Keyword::RIGHT,
    Keyword::FULL,
    Keyword::OUTER,
    Keyword::CROSS,
    Keyword::NATURAL,
    Keyword::ON,
    Keyword::USING,
    Keyword::AS,
    Keyword::AND,
    Keyword::OR,
    Keyword::NOT,
    Keyword::IN,
    Keyword::BETWEEN,
    Keyword::IS,
    Keyword::NULL,
    Keyword::TRUE,
    Keyword::FALSE,
    Keyword::EXISTS,
    Keyword::ANY,
    Keyword::SOME,
    Keyword::CASE,
    Keyword::WHEN,
    Keyword::THEN,
    Keyword::ELSE,
    Keyword::END,
    Keyword::DISTINCT,
    Keyword::ALL,
    Keyword::UNION,
    Keyword::INTERSECT,
    Keyword::EXCEPT,
    Keyword::WITH,
    Keyword::RECURSIVE,
    Keyword::INTO,
    Keyword::VALUES,
    Keyword::SET,
    Keyword::ASC,
    Keyword::DESC,
    Keyword::NULLS,
    Keyword::OVER,
    Keyword::WINDOW,
    Keyword::RETURNING,
];

const DML_KEYWORDS: &[Keyword] = &[
    Keyword::SELECT,
    Keyword::INSERT,
    Keyword::UPDATE,
    Keyword::DELETE,
    Keyword::MERGE,
];

/// Words that may precede `JOIN` inside one join phrase.
const JOIN_MODIFIERS: &[Keyword] = &[
    Keyword::NATURAL,
    Keyword::LEFT,
    Keyword::RIGHT,
    Keyword::FULL,
    Keyword::OUTER,
    Keyword::INNER,
    Keyword::CROSS,
];

/// Tokenize `sql` and turn the first statement into a flat run of leaves.
pub(crate) fn lex(sql: &str, dialect: &dyn Dialect) -> Result<Vec<SyntaxNode>, ParseError> {
    let tokens = first_statement(Tokenizer::new(dialect, sql).tokenize()?);
    if tokens.is_empty() {
        return Err(ParseError::Empty);
    }

    let mut leaves: Vec<SyntaxNode> = Vec::with_capacity(tokens.len());
    let mut index = 0;
    while index < tokens.len() {
        let (leaf, consumed) = lex_token(&tokens, index, leaves.last());
        leaves.push(leaf);
        index += consumed;
    }
    Ok(leaves)
}

/// Drop whitespace and comments, then keep the first non-empty `;`-separated statement.
fn first_statement(tokens: Vec<SqlToken>) -> Vec<SqlToken> {
    tokens
        .into_iter()
        .filter(|token| !matches!(token, SqlToken::Whitespace(_) | SqlToken::EOF))
        .skip_while(|token| *token == SqlToken::SemiColon)
        .take_while(|token| *token != SqlToken::SemiColon)
        .collect()
}

/// Lex the token at `index`, returning the leaf and how many tokens it spans.
fn lex_token(tokens: &[SqlToken], index: usize, previous: Option<&SyntaxNode>) -> (SyntaxNode, usize) {
    let token = &tokens[index];
    match token {
        SqlToken::Word(word) => lex_word(tokens, index, word),
        SqlToken::Mul if opens_projection(previous) => {
            (SyntaxNode::token(TokenKind::Wildcard, "*"), 1)
        }
        SqlToken::Eq
        | SqlToken::DoubleEq
        | SqlToken::Neq
        | SqlToken::Lt
        | SqlToken::Gt
        | SqlToken::LtEq
        | SqlToken::GtEq
        | SqlToken::Spaceship => (
            SyntaxNode::token(TokenKind::Comparison, token.to_string()),
            1,
        ),
        SqlToken::Number(..)
        | SqlToken::SingleQuotedString(_)
        | SqlToken::DoubleQuotedString(_)
        | SqlToken::DollarQuotedString(_)
        | SqlToken::NationalStringLiteral(_)
        | SqlToken::EscapedStringLiteral(_)
        | SqlToken::HexStringLiteral(_)
        | SqlToken::Placeholder(_) => (SyntaxNode::token(TokenKind::Literal, token.to_string()), 1),
        SqlToken::Comma
        | SqlToken::LParen
        | SqlToken::RParen
        | SqlToken::Period
        | SqlToken::DoubleColon => (
            SyntaxNode::token(TokenKind::Punctuation, token.to_string()),
            1,
        ),
        other => (SyntaxNode::token(TokenKind::Operator, other.to_string()), 1),
    }
}

fn lex_word(tokens: &[SqlToken], index: usize, word: &Word) -> (SyntaxNode, usize) {
    if word.quote_style.is_some() {
        return (name(word), 1);
    }
    let upper = word.value.to_uppercase();
    match word.keyword {
        kw if DML_KEYWORDS.contains(&kw) => (SyntaxNode::Dml(upper), 1),
        Keyword::GROUP | Keyword::ORDER | Keyword::PARTITION
            if keyword_at(tokens, index + 1) == Some(Keyword::BY) =>
        {
            (SyntaxNode::keyword(format!("{upper} BY")), 2)
        }
        Keyword::UNION if keyword_at(tokens, index + 1) == Some(Keyword::ALL) => {
            (SyntaxNode::keyword("UNION ALL"), 2)
        }
        Keyword::NOT
            if matches!(
                keyword_at(tokens, index + 1),
                Some(Keyword::LIKE | Keyword::ILIKE)
            ) =>
        {
            let operator = tokens
                .get(index + 1)
                .map(|next| next.to_string().to_uppercase())
                .unwrap_or_default();
            (
                SyntaxNode::token(TokenKind::Comparison, format!("NOT {operator}")),
                2,
            )
        }
        Keyword::LIKE | Keyword::ILIKE => (SyntaxNode::token(TokenKind::Comparison, upper), 1),
        // LEFT(...) and RIGHT(...) are string functions, not join sides.
        Keyword::LEFT | Keyword::RIGHT if matches!(tokens.get(index + 1), Some(SqlToken::LParen)) => {
            (name(word), 1)
        }
        kw if kw == Keyword::JOIN || JOIN_MODIFIERS.contains(&kw) => match join_phrase(tokens, index) {
            Some((phrase, consumed)) => (SyntaxNode::keyword(phrase), consumed),
            None => (SyntaxNode::keyword(upper), 1),
        },
        kw if STRUCTURAL_KEYWORDS.contains(&kw) => (SyntaxNode::keyword(upper), 1),
        _ => (name(word), 1),
    }
}

/// Merge `[NATURAL] [LEFT|RIGHT|FULL] [OUTER] [INNER|CROSS] JOIN` into one phrase.
fn join_phrase(tokens: &[SqlToken], start: usize) -> Option<(String, usize)> {
    let mut parts: Vec<String> = Vec::new();
    for token in &tokens[start..] {
        let SqlToken::Word(word) = token else {
            return None;
        };
        if word.quote_style.is_some() {
            return None;
        }
        if word.keyword == Keyword::JOIN {
            parts.push("JOIN".to_string());
            return Some((parts.join(" "), parts.len()));
        }
        if !JOIN_MODIFIERS.contains(&word.keyword) {
            return None;
        }
        parts.push(word.value.to_uppercase());
    }
    None
}

fn keyword_at(tokens: &[SqlToken], index: usize) -> Option<Keyword> {
    match tokens.get(index) {
        Some(SqlToken::Word(word)) if word.quote_style.is_none() => Some(word.keyword),
        _ => None,
    }
}

fn name(word: &Word) -> SyntaxNode {
    SyntaxNode::token(TokenKind::Name, word.to_string())
}

/// `*` is a wildcard right after a projection opener, otherwise multiplication.
fn opens_projection(previous: Option<&SyntaxNode>) -> bool {
    match previous {
        None | Some(SyntaxNode::Dml(_)) => true,
        Some(node) => {
            node.is_punctuation(",")
                || node.is_punctuation("(")
                || node.is_punctuation(".")
                || node.is_keyword("DISTINCT")
                || node.is_keyword("ALL")
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sqlparser::dialect::GenericDialect;

    fn lex_generic(sql: &str) -> Vec<SyntaxNode> {
        lex(sql, &GenericDialect {}).expect("sql should lex")
    }

    fn texts(leaves: &[SyntaxNode]) -> Vec<&str> {
        leaves.iter().filter_map(SyntaxNode::normalized).collect()
    }

    #[test]
    fn compound_keywords_are_merged() {
        let leaves = lex_generic("select a from t left outer join u on 1 = 1 group by a order by a");
        assert!(leaves.contains(&SyntaxNode::keyword("LEFT OUTER JOIN")));
        assert!(leaves.contains(&SyntaxNode::keyword("GROUP BY")));
        assert!(leaves.contains(&SyntaxNode::keyword("ORDER BY")));
        assert!(!leaves.contains(&SyntaxNode::keyword("JOIN")));
    }

    #[test]
    fn bare_join_keeps_plain_text() {
        let leaves = lex_generic("SELECT a FROM t JOIN u ON t.id = u.id");
        assert!(leaves.contains(&SyntaxNode::keyword("JOIN")));
    }

    #[test]
    fn only_the_first_statement_is_kept() {
        let leaves = lex_generic(";; SELECT a FROM t; SELECT b FROM u");
        assert_eq!(texts(&leaves), vec!["SELECT", "a", "FROM", "t"]);
    }

    #[test]
    fn star_is_wildcard_only_in_projection_position() {
        let leaves = lex_generic("SELECT *, a * 2 FROM t");
        assert_eq!(leaves[1], SyntaxNode::token(TokenKind::Wildcard, "*"));
        assert!(leaves.contains(&SyntaxNode::token(TokenKind::Operator, "*")));
    }

    #[test]
    fn not_equal_spellings_normalize_to_one_operator() {
        let bang = lex_generic("SELECT a FROM t WHERE a != 1");
        let angle = lex_generic("SELECT a FROM t WHERE a <> 1");
        assert!(bang.contains(&SyntaxNode::token(TokenKind::Comparison, "<>")));
        assert!(angle.contains(&SyntaxNode::token(TokenKind::Comparison, "<>")));
    }

    #[test]
    fn left_call_is_a_function_name() {
        let leaves = lex_generic("SELECT LEFT(name, 3) FROM t");
        assert_eq!(leaves[1], SyntaxNode::token(TokenKind::Name, "LEFT"));
    }

    #[test]
    fn quoted_keywords_are_names() {
        let leaves = lex_generic("SELECT \"from\" FROM t");
        assert_eq!(leaves[1], SyntaxNode::token(TokenKind::Name, "\"from\""));
    }

    #[test]
    fn whitespace_only_input_is_empty() {
        assert!(matches!(
            lex("  \n -- nothing here\n ;", &GenericDialect {}),
            Err(ParseError::Empty)
        ));
    }

    #[test]
    fn unterminated_string_is_a_tokenizer_error() {
        assert!(matches!(
            lex("SELECT 'oops FROM t", &GenericDialect {}),
            Err(ParseError::Tokenize(_))
        ));
    }
}
