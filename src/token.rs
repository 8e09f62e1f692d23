//! Lexical token descriptors.
//!
//! A [`Token`] pairs a category with a longest-prefix matcher: given the
//! remaining input, the matcher reports how many bytes of a leading chunk it
//! recognizes, or `None`. Operator tokens carry the registered symbol and are
//! owned by the environment; the number/identifier/variable shapes are fixed.

use core::fmt;

/// The lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// A numeric literal such as `42`, `2.5`, or `1e-3`.
    Number,
    /// A registered constant or function name.
    Identifier,
    /// A bracketed variable reference such as `<rate>`.
    Variable,
    /// A prefix operator symbol.
    UnaryOperator,
    /// An infix operator symbol.
    BinaryOperator,
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `,`
    Comma,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Identifier => "identifier",
            TokenKind::Variable => "variable",
            TokenKind::UnaryOperator => "unary operator",
            TokenKind::BinaryOperator => "binary operator",
            TokenKind::LeftParen => "left parenthesis",
            TokenKind::RightParen => "right parenthesis",
            TokenKind::Comma => "comma",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Number,
    Identifier,
    Variable,
    Literal(String),
}

/// An immutable descriptor of one lexical category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    kind: TokenKind,
    pattern: Pattern,
}

impl Token {
    /// The fixed numeric-literal token.
    pub fn number() -> Self {
        Token {
            kind: TokenKind::Number,
            pattern: Pattern::Number,
        }
    }

    /// The fixed identifier token (a letter followed by letters or digits).
    pub fn identifier() -> Self {
        Token {
            kind: TokenKind::Identifier,
            pattern: Pattern::Identifier,
        }
    }

    /// The fixed bracketed-variable token (`<` then a name; the closing `>`
    /// is checked and consumed by the lexer, not matched here).
    pub fn variable() -> Self {
        Token {
            kind: TokenKind::Variable,
            pattern: Pattern::Variable,
        }
    }

    /// An exact-symbol token, used for operators and structural symbols.
    pub fn literal(kind: TokenKind, symbol: &str) -> Self {
        Token {
            kind,
            pattern: Pattern::Literal(symbol.to_string()),
        }
    }

    pub fn left_paren() -> Self {
        Token::literal(TokenKind::LeftParen, "(")
    }

    pub fn right_paren() -> Self {
        Token::literal(TokenKind::RightParen, ")")
    }

    pub fn comma() -> Self {
        Token::literal(TokenKind::Comma, ",")
    }

    pub fn kind(&self) -> TokenKind {
        self.kind
    }

    /// The exact symbol this token matches, for operator and structural
    /// tokens. The number/identifier/variable shapes have no fixed symbol.
    pub fn symbol(&self) -> Option<&str> {
        match &self.pattern {
            Pattern::Literal(symbol) => Some(symbol),
            _ => None,
        }
    }

    /// Length in bytes of the longest prefix of `input` this token
    /// recognizes, or `None` if the leading characters do not match.
    pub fn matched_len(&self, input: &str) -> Option<usize> {
        match &self.pattern {
            Pattern::Number => match_number(input),
            Pattern::Identifier => match_identifier(input),
            Pattern::Variable => match_variable(input),
            Pattern::Literal(symbol) => input.starts_with(symbol.as_str()).then(|| symbol.len()),
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.symbol() {
            Some(symbol) => write!(f, "{} '{}'", self.kind, symbol),
            None => write!(f, "{}", self.kind),
        }
    }
}

/// Matches `digits ('.' digits)? ([eE] [+-]? digits)?`, taking each optional
/// part only when it is complete. `1.` matches as `1`; `1e+` matches as `1`.
fn match_number(input: &str) -> Option<usize> {
    let mut end = count_digits(input, 0);
    if end == 0 {
        return None;
    }

    if input[end..].starts_with('.') {
        let fraction = count_digits(input, end + 1);
        if fraction > 0 {
            end += 1 + fraction;
        }
    }

    let rest = &input[end..];
    if rest.starts_with('e') || rest.starts_with('E') {
        let mut exp = end + 1;
        if input[exp..].starts_with('+') || input[exp..].starts_with('-') {
            exp += 1;
        }
        let digits = count_digits(input, exp);
        if digits > 0 {
            end = exp + digits;
        }
    }

    Some(end)
}

fn count_digits(input: &str, from: usize) -> usize {
    input[from..]
        .bytes()
        .take_while(|b| b.is_ascii_digit())
        .count()
}

/// Matches a Unicode letter followed by letters or ASCII digits.
fn match_identifier(input: &str) -> Option<usize> {
    let mut chars = input.chars();
    let first = chars.next()?;
    if !first.is_alphabetic() {
        return None;
    }

    let mut end = first.len_utf8();
    for c in chars {
        if c.is_alphabetic() || c.is_ascii_digit() {
            end += c.len_utf8();
        } else {
            break;
        }
    }
    Some(end)
}

/// Matches `<` followed by a letter, then letters/digits/`_`/`-` as long as
/// the name still ends in a letter or digit. The reported length includes the
/// opening `<` but never a trailing `_` or `-`.
fn match_variable(input: &str) -> Option<usize> {
    let mut chars = input.chars();
    if chars.next()? != '<' {
        return None;
    }
    let first = chars.next()?;
    if !first.is_alphabetic() {
        return None;
    }

    let mut end = 1 + first.len_utf8();
    let mut valid_end = end;
    for c in chars {
        if c.is_alphabetic() || c.is_ascii_digit() {
            end += c.len_utf8();
            valid_end = end;
        } else if c == '_' || c == '-' {
            end += 1;
        } else {
            break;
        }
    }
    Some(valid_end)
}
