//! Error types for formula tokenization, parsing, and the manager facade.
//!
//! Every failure surfaces as a [`FormulaError`] value carrying enough context
//! (kind, offending text, source column) for the host to report to an end user
//! or re-prompt. The library itself never prints or terminates the process.

use core::fmt;

/// Result type used throughout the crate.
pub type Result<T> = core::result::Result<T, FormulaError>;

/// Error type for formula tokenization and parsing.
///
/// Columns are 0-based byte offsets into the formula string. Lexical errors
/// are detected before the parser ever sees the token stream, so unknown
/// names are reported at tokenization time.
#[derive(Debug, Clone, PartialEq)]
pub enum FormulaError {
    /// Empty (or all-whitespace) formula text was supplied to the manager.
    EmptyInput,

    /// No token category matched at the given column.
    UnexpectedCharacter { position: usize },

    /// A numeric literal with a dangling `.` or an exponent without digits.
    MalformedNumber { text: String, position: usize },

    /// A `<` without its closing `>`, or a bare `>` outside a variable
    /// reference. `found` is the offending bracket.
    UnmatchedBracket { found: char, position: usize },

    /// An identifier that is neither a registered constant nor a registered
    /// function name.
    UnknownIdentifier { name: String, position: usize },

    /// A bracketed reference to a variable that was never registered.
    UnknownVariable { name: String, position: usize },

    /// An operator symbol with no definition in the environment.
    UnknownOperator { symbol: String, position: usize },

    /// An identifier on the parser stack that names no registered function.
    UnknownFunction { name: String, position: usize },

    /// A `(` or `)` with no matching partner. `found` is the parenthesis
    /// that could not be matched.
    UnmatchedParenthesis { found: char, position: usize },

    /// A token that is valid on its own but cannot appear where it did.
    UnexpectedToken { text: String, position: usize },

    /// A function call whose comma-counted argument list does not match the
    /// function's declared arity.
    InvalidFunctionCall {
        name: String,
        expected: usize,
        found: usize,
        position: usize,
    },

    /// An operator with too few values on the output stack to reduce.
    MissingOperand { symbol: String, position: usize },

    /// The token sequence did not reduce to a single expression tree.
    Syntax(String),
}

impl FormulaError {
    /// The source column the error refers to, when one is available.
    pub fn position(&self) -> Option<usize> {
        match self {
            FormulaError::EmptyInput | FormulaError::Syntax(_) => None,
            FormulaError::UnexpectedCharacter { position }
            | FormulaError::MalformedNumber { position, .. }
            | FormulaError::UnmatchedBracket { position, .. }
            | FormulaError::UnknownIdentifier { position, .. }
            | FormulaError::UnknownVariable { position, .. }
            | FormulaError::UnknownOperator { position, .. }
            | FormulaError::UnknownFunction { position, .. }
            | FormulaError::UnmatchedParenthesis { position, .. }
            | FormulaError::UnexpectedToken { position, .. }
            | FormulaError::InvalidFunctionCall { position, .. }
            | FormulaError::MissingOperand { position, .. } => Some(*position),
        }
    }
}

/// Spells out a function's parameter list for arity error messages,
/// e.g. `2` becomes `"a,b"`.
fn spell_params(count: usize) -> String {
    let mut result = String::new();
    for i in 0..count {
        if i > 0 {
            result.push(',');
        }
        result.push((b'a' + (i % 26) as u8) as char);
    }
    result
}

impl fmt::Display for FormulaError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormulaError::EmptyInput => {
                write!(f, "Cannot build a formula from empty input")
            }
            FormulaError::UnexpectedCharacter { position } => {
                write!(f, "Unexpected token in column {}", position)
            }
            FormulaError::MalformedNumber { text, position } => {
                write!(f, "Invalid number '{}' in column {}", text, position)
            }
            FormulaError::UnmatchedBracket { found, position } => {
                let side = if *found == '<' { "left" } else { "right" };
                write!(f, "Unmatched {} bracket '{}' in column {}", side, found, position)
            }
            FormulaError::UnknownIdentifier { name, position } => {
                write!(f, "Unknown identifier '{}' in column {}", name, position)
            }
            FormulaError::UnknownVariable { name, position } => {
                write!(f, "Unknown variable '<{}>' in column {}", name, position)
            }
            FormulaError::UnknownOperator { symbol, position } => {
                write!(f, "Unknown operator '{}' in column {}", symbol, position)
            }
            FormulaError::UnknownFunction { name, position } => {
                write!(f, "Unknown function '{}' in column {}", name, position)
            }
            FormulaError::UnmatchedParenthesis { found, position } => {
                let side = if *found == '(' { "left" } else { "right" };
                write!(
                    f,
                    "Unmatched {} parenthesis '{}' in column {}",
                    side, found, position
                )
            }
            FormulaError::UnexpectedToken { text, position } => {
                write!(f, "Unexpected token '{}' in column {}", text, position)
            }
            FormulaError::InvalidFunctionCall {
                name,
                expected,
                found,
                ..
            } => {
                let direction = if found < expected {
                    "Not enough"
                } else {
                    "Too many"
                };
                write!(
                    f,
                    "{} arguments for {}({}), expected {}, got {}",
                    direction,
                    name,
                    spell_params(*expected),
                    expected,
                    found
                )
            }
            FormulaError::MissingOperand { symbol, position } => {
                write!(f, "Missing operand for '{}' in column {}", symbol, position)
            }
            FormulaError::Syntax(message) => write!(f, "Syntax error: {}", message),
        }
    }
}

impl core::error::Error for FormulaError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_carries_column_and_names() {
        let err = FormulaError::UnknownIdentifier {
            name: "foo".to_string(),
            position: 4,
        };
        assert_eq!(err.to_string(), "Unknown identifier 'foo' in column 4");
        assert_eq!(err.position(), Some(4));

        let err = FormulaError::UnmatchedParenthesis {
            found: ')',
            position: 7,
        };
        assert_eq!(err.to_string(), "Unmatched right parenthesis ')' in column 7");
    }

    #[test]
    fn test_arity_message_spells_out_parameters() {
        let err = FormulaError::InvalidFunctionCall {
            name: "min".to_string(),
            expected: 2,
            found: 3,
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "Too many arguments for min(a,b), expected 2, got 3"
        );

        let err = FormulaError::InvalidFunctionCall {
            name: "sqrt".to_string(),
            expected: 1,
            found: 0,
            position: 0,
        };
        assert_eq!(
            err.to_string(),
            "Not enough arguments for sqrt(a), expected 1, got 0"
        );
    }

    #[test]
    fn test_empty_input_has_no_position() {
        assert_eq!(FormulaError::EmptyInput.position(), None);
    }
}
