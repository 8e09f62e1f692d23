//! The tokenizer: raw text to a sequence of typed lexemes.
//!
//! Token categories are attempted in a fixed priority order (number,
//! identifier, bracketed variable, operator, structural symbol), with the
//! environment's operator tables consulted longest symbol first. Whether an
//! operator position is unary or binary is decided by looking at the
//! previously emitted lexeme.

use crate::env::Environment;
use crate::error::{FormulaError, Result};
use crate::token::{Token, TokenKind};
use core::fmt;

/// One classified, positioned chunk of source text.
///
/// For variables, `text` is the enclosed name without the angle brackets.
/// `position` is the 0-based column of the lexeme's first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lexeme {
    pub kind: TokenKind,
    pub text: String,
    pub position: usize,
}

impl fmt::Display for Lexeme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} '{}'", self.kind, self.text)
    }
}

/// The tokenizer, bound to one environment.
pub struct Lexer<'e> {
    env: &'e Environment,
}

impl<'e> Lexer<'e> {
    pub fn new(env: &'e Environment) -> Self {
        Lexer { env }
    }

    /// Tokenizes `input` left to right, failing on the first unrecognized or
    /// malformed chunk. All working state is local to the call, so one lexer
    /// can serve concurrent callers.
    pub fn tokenize(&self, input: &str) -> Result<Vec<Lexeme>> {
        let mut scan = Scan {
            env: self.env,
            input,
            pos: 0,
            out: Vec::new(),
        };
        scan.run()?;
        Ok(scan.out)
    }
}

/// Per-call tokenization state.
struct Scan<'a, 'e> {
    env: &'e Environment,
    input: &'a str,
    pos: usize,
    out: Vec<Lexeme>,
}

impl Scan<'_, '_> {
    fn run(&mut self) -> Result<()> {
        loop {
            self.skip_whitespace();
            if self.pos >= self.input.len() {
                return Ok(());
            }
            self.next_lexeme()?;
        }
    }

    fn rest(&self) -> &str {
        &self.input[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c.is_whitespace() {
                self.pos += c.len_utf8();
            } else {
                break;
            }
        }
    }

    fn emit(&mut self, kind: TokenKind, text: String, consumed: usize) {
        self.out.push(Lexeme {
            kind,
            text,
            position: self.pos,
        });
        self.pos += consumed;
    }

    fn next_lexeme(&mut self) -> Result<()> {
        if self.next_number()? {
            return Ok(());
        }
        if self.next_identifier()? {
            return Ok(());
        }
        if self.next_variable()? {
            return Ok(());
        }
        if self.next_operator() {
            return Ok(());
        }
        if self.next_symbol() {
            return Ok(());
        }
        Err(FormulaError::UnexpectedCharacter { position: self.pos })
    }

    /// Numbers: digits with optional fraction and exponent. A dangling `.`
    /// or an exponent without digits is rejected here rather than left to
    /// produce a confusing token split.
    fn next_number(&mut self) -> Result<bool> {
        if !self.peek().is_some_and(|c| c.is_ascii_digit()) {
            return Ok(false);
        }

        let chunk = self.rest();
        let len = Token::number().matched_len(chunk).unwrap_or(0);
        let next = chunk[len..].chars().next();
        if matches!(next, Some('.') | Some('e') | Some('E')) {
            return Err(FormulaError::MalformedNumber {
                text: chunk[..len + 1].to_string(),
                position: self.pos,
            });
        }

        let text = chunk[..len].to_string();
        self.emit(TokenKind::Number, text, len);
        Ok(true)
    }

    /// Identifiers must name a registered constant or function; unknown
    /// names are rejected before the parser ever sees them.
    fn next_identifier(&mut self) -> Result<bool> {
        if !self.peek().is_some_and(char::is_alphabetic) {
            return Ok(false);
        }

        let chunk = self.rest();
        let len = Token::identifier().matched_len(chunk).unwrap_or(0);
        if chunk[len..].starts_with('>') {
            return Err(FormulaError::UnmatchedBracket {
                found: '>',
                position: self.pos + len,
            });
        }

        let name = chunk[..len].to_string();
        if !self.env.is_constant(&name) && !self.env.is_function(&name) {
            return Err(FormulaError::UnknownIdentifier {
                name,
                position: self.pos,
            });
        }

        self.emit(TokenKind::Identifier, name, len);
        Ok(true)
    }

    /// Bracketed variables: `<` followed by a letter commits to this path;
    /// `<` followed by anything else falls through to the operator tables so
    /// symbols like `<` and `<=` stay registrable. A bare `>` never matches
    /// anything and is rejected outright.
    fn next_variable(&mut self) -> Result<bool> {
        match self.peek() {
            Some('>') => {
                return Err(FormulaError::UnmatchedBracket {
                    found: '>',
                    position: self.pos,
                });
            }
            Some('<') => {}
            _ => return Ok(false),
        }

        let chunk = self.rest();
        if !chunk[1..].chars().next().is_some_and(char::is_alphabetic) {
            return Ok(false);
        }

        let len = Token::variable().matched_len(chunk).unwrap_or(0);
        if !chunk[len..].starts_with('>') {
            return Err(FormulaError::UnmatchedBracket {
                found: '<',
                position: self.pos,
            });
        }

        let name = chunk[1..len].to_string();
        if !self.env.is_variable(&name) {
            return Err(FormulaError::UnknownVariable {
                name,
                position: self.pos,
            });
        }

        // The closing '>' is consumed with the token.
        self.emit(TokenKind::Variable, name, len + 1);
        Ok(true)
    }

    fn next_operator(&mut self) -> bool {
        let env = self.env;
        let tokens = if self.unary_expected() {
            env.unary_tokens()
        } else {
            env.binary_tokens()
        };
        self.next_from_table(tokens)
    }

    fn next_symbol(&mut self) -> bool {
        let env = self.env;
        self.next_from_table(env.symbol_tokens())
    }

    fn next_from_table(&mut self, tokens: &[Token]) -> bool {
        for token in tokens {
            if let Some(len) = token.matched_len(self.rest()) {
                let text = self.rest()[..len].to_string();
                self.emit(token.kind(), text, len);
                return true;
            }
        }
        false
    }

    /// An operator position expects a unary operator at the start of the
    /// input and after anything that opens a sub-expression; it expects a
    /// binary operator after anything that completes a value.
    fn unary_expected(&self) -> bool {
        let Some(previous) = self.out.last() else {
            return true;
        };
        match previous.kind {
            TokenKind::LeftParen
            | TokenKind::UnaryOperator
            | TokenKind::BinaryOperator
            | TokenKind::Comma => true,
            TokenKind::Number
            | TokenKind::Identifier
            | TokenKind::Variable
            | TokenKind::RightParen => false,
        }
    }
}
