//! The shunting-yard parser, extended for unary operators and function call
//! arity tracking.
//!
//! Three stacks drive the reduction: an output stack of constructed formula
//! nodes, an operator/bracket stack of pending lexemes, and an argument-count
//! stack with one entry per currently-open function call. All three live for
//! a single `parse` call.

use crate::env::Environment;
use crate::error::{FormulaError, Result};
use crate::formula::Formula;
use crate::lexer::Lexeme;
use crate::token::TokenKind;

/// The parser, bound to one environment.
pub struct Parser<'e> {
    env: &'e Environment,
}

impl<'e> Parser<'e> {
    pub fn new(env: &'e Environment) -> Self {
        Parser { env }
    }

    /// Reduces a lexeme sequence to one formula tree. Working state is local
    /// to the call, so one parser can serve concurrent callers.
    pub fn parse(&self, lexemes: &[Lexeme]) -> Result<Formula> {
        let mut run = Reduction {
            env: self.env,
            output: Vec::new(),
            stack: Vec::new(),
            args: Vec::new(),
        };
        run.run(lexemes)
    }
}

/// Per-call parser state.
struct Reduction<'e> {
    env: &'e Environment,
    output: Vec<Formula>,
    stack: Vec<Lexeme>,
    args: Vec<usize>,
}

impl Reduction<'_> {
    fn run(&mut self, lexemes: &[Lexeme]) -> Result<Formula> {
        let mut previous: Option<TokenKind> = None;
        for lexeme in lexemes {
            match lexeme.kind {
                TokenKind::Number => self.number(lexeme)?,
                TokenKind::Identifier => self.identifier(lexeme)?,
                TokenKind::Variable => self.variable(lexeme)?,
                TokenKind::UnaryOperator => self.unary(lexeme)?,
                TokenKind::BinaryOperator => self.binary(lexeme)?,
                TokenKind::LeftParen => self.stack.push(lexeme.clone()),
                TokenKind::RightParen => {
                    let empty_call = previous == Some(TokenKind::LeftParen);
                    self.right_paren(lexeme, empty_call)?;
                }
                TokenKind::Comma => self.comma(lexeme)?,
            }
            previous = Some(lexeme.kind);
        }
        self.finish()
    }

    fn number(&mut self, lexeme: &Lexeme) -> Result<()> {
        let value = lexeme
            .text
            .parse()
            .map_err(|_| FormulaError::MalformedNumber {
                text: lexeme.text.clone(),
                position: lexeme.position,
            })?;
        self.output.push(Formula::Value(value));
        Ok(())
    }

    /// Constants are checked before functions, so a name registered as both
    /// resolves to the constant.
    fn identifier(&mut self, lexeme: &Lexeme) -> Result<()> {
        if let Some(value) = self.env.get_constant(&lexeme.text) {
            self.output.push(Formula::Value(value));
            return Ok(());
        }

        if self.env.is_function(&lexeme.text) {
            // A call is assumed to have one argument until commas (or an
            // empty argument list at the closing parenthesis) prove otherwise.
            self.stack.push(lexeme.clone());
            self.args.push(1);
            return Ok(());
        }

        Err(FormulaError::UnknownIdentifier {
            name: lexeme.text.clone(),
            position: lexeme.position,
        })
    }

    fn variable(&mut self, lexeme: &Lexeme) -> Result<()> {
        match self.env.get_variable(&lexeme.text) {
            Some(formula) => {
                // Shares the registered sub-tree; no copy is made.
                self.output.push(formula.clone());
                Ok(())
            }
            None => Err(FormulaError::UnknownVariable {
                name: lexeme.text.clone(),
                position: lexeme.position,
            }),
        }
    }

    fn unary(&mut self, lexeme: &Lexeme) -> Result<()> {
        if !self.env.is_unary_operator(&lexeme.text) {
            return Err(FormulaError::UnknownOperator {
                symbol: lexeme.text.clone(),
                position: lexeme.position,
            });
        }
        // Unary operators reduce by precedence later; never immediately.
        self.stack.push(lexeme.clone());
        Ok(())
    }

    fn binary(&mut self, lexeme: &Lexeme) -> Result<()> {
        let env = self.env;
        let current =
            env.get_binary_operator(&lexeme.text)
                .ok_or_else(|| FormulaError::UnknownOperator {
                    symbol: lexeme.text.clone(),
                    position: lexeme.position,
                })?;

        loop {
            let Some(top) = self.stack.last() else { break };
            let top_precedence = match top.kind {
                TokenKind::UnaryOperator => {
                    env.get_unary_operator(&top.text)
                        .ok_or_else(|| FormulaError::UnknownOperator {
                            symbol: top.text.clone(),
                            position: top.position,
                        })?
                        .precedence
                }
                TokenKind::BinaryOperator => {
                    env.get_binary_operator(&top.text)
                        .ok_or_else(|| FormulaError::UnknownOperator {
                            symbol: top.text.clone(),
                            position: top.position,
                        })?
                        .precedence
                }
                TokenKind::LeftParen | TokenKind::Identifier => break,
                _ => {
                    return Err(FormulaError::UnexpectedToken {
                        text: top.text.clone(),
                        position: top.position,
                    });
                }
            };

            let reduce = top_precedence > current.precedence
                || (top_precedence == current.precedence && current.left_assoc);
            if !reduce || !self.pop_if_operator()? {
                break;
            }
        }

        self.stack.push(lexeme.clone());
        Ok(())
    }

    fn right_paren(&mut self, lexeme: &Lexeme, empty_call: bool) -> Result<()> {
        if self.stack.is_empty() {
            return Err(FormulaError::UnmatchedParenthesis {
                found: ')',
                position: lexeme.position,
            });
        }

        loop {
            if self.pop_if_operator()? {
                continue;
            }
            match self.stack.last() {
                Some(top) if top.kind == TokenKind::LeftParen => {
                    self.stack.pop();
                    let call = matches!(
                        self.stack.last().map(|l| l.kind),
                        Some(TokenKind::Identifier)
                    );
                    if call {
                        self.finish_function(empty_call)?;
                    } else if empty_call {
                        // "()" groups nothing and calls nothing.
                        return Err(FormulaError::UnexpectedToken {
                            text: lexeme.text.clone(),
                            position: lexeme.position,
                        });
                    }
                    return Ok(());
                }
                Some(top) => {
                    return Err(FormulaError::UnexpectedToken {
                        text: top.text.clone(),
                        position: top.position,
                    });
                }
                None => {
                    return Err(FormulaError::UnmatchedParenthesis {
                        found: ')',
                        position: lexeme.position,
                    });
                }
            }
        }
    }

    fn comma(&mut self, lexeme: &Lexeme) -> Result<()> {
        loop {
            if self.pop_if_operator()? {
                continue;
            }
            match self.stack.last().map(|l| l.kind) {
                // The parenthesis stays; it still closes the call.
                Some(TokenKind::LeftParen) => break,
                _ => {
                    return Err(FormulaError::UnexpectedToken {
                        text: lexeme.text.clone(),
                        position: lexeme.position,
                    });
                }
            }
        }

        match self.args.last_mut() {
            Some(count) => {
                *count += 1;
                Ok(())
            }
            None => Err(FormulaError::UnexpectedToken {
                text: lexeme.text.clone(),
                position: lexeme.position,
            }),
        }
    }

    fn finish(&mut self) -> Result<Formula> {
        loop {
            if self.pop_if_operator()? {
                continue;
            }
            match self.stack.last() {
                None => break,
                Some(top) if top.kind == TokenKind::LeftParen => {
                    return Err(FormulaError::UnmatchedParenthesis {
                        found: '(',
                        position: top.position,
                    });
                }
                Some(top) => {
                    return Err(FormulaError::UnexpectedToken {
                        text: top.text.clone(),
                        position: top.position,
                    });
                }
            }
        }

        match self.output.pop() {
            Some(formula) if self.output.is_empty() => Ok(formula),
            _ => Err(FormulaError::Syntax(
                "expression does not reduce to a single value".to_string(),
            )),
        }
    }

    /// If the operator stack's top is a unary or binary operator, pops it,
    /// reduces it against the output stack, and reports `true`.
    fn pop_if_operator(&mut self) -> Result<bool> {
        let is_operator = matches!(
            self.stack.last().map(|l| l.kind),
            Some(TokenKind::UnaryOperator) | Some(TokenKind::BinaryOperator)
        );
        if !is_operator {
            return Ok(false);
        }
        let Some(lexeme) = self.stack.pop() else {
            return Ok(false);
        };

        let env = self.env;
        match lexeme.kind {
            TokenKind::UnaryOperator => {
                let operator = env.get_unary_operator(&lexeme.text).ok_or_else(|| {
                    FormulaError::UnknownOperator {
                        symbol: lexeme.text.clone(),
                        position: lexeme.position,
                    }
                })?;
                let argument = self.pop_value(&lexeme)?;
                self.output.push(operator.create(argument));
            }
            _ => {
                let operator = env.get_binary_operator(&lexeme.text).ok_or_else(|| {
                    FormulaError::UnknownOperator {
                        symbol: lexeme.text.clone(),
                        position: lexeme.position,
                    }
                })?;
                // Right operand is on top; order matters for non-commutative
                // operators.
                let right = self.pop_value(&lexeme)?;
                let left = self.pop_value(&lexeme)?;
                self.output.push(operator.create(left, right));
            }
        }
        Ok(true)
    }

    /// Pops the function identifier on top of the stack and builds its
    /// application node, validating the comma-counted arity. An empty
    /// argument list counts as zero arguments.
    fn finish_function(&mut self, empty_call: bool) -> Result<()> {
        let Some(lexeme) = self.stack.pop() else {
            return Ok(());
        };
        let name = &lexeme.text;

        let counted = match self.args.pop() {
            Some(counted) if !empty_call => counted,
            Some(_) => 0,
            None => {
                return Err(FormulaError::UnknownFunction {
                    name: name.clone(),
                    position: lexeme.position,
                });
            }
        };

        if self.env.is_unary_function(name) {
            if counted != 1 {
                return Err(FormulaError::InvalidFunctionCall {
                    name: name.clone(),
                    expected: 1,
                    found: counted,
                    position: lexeme.position,
                });
            }
            let argument = self.pop_value(&lexeme)?;
            let function = self.env.get_unary_function(name).ok_or_else(|| {
                FormulaError::UnknownFunction {
                    name: name.clone(),
                    position: lexeme.position,
                }
            })?;
            self.output.push(function.create(argument));
        } else if self.env.is_binary_function(name) {
            if counted != 2 {
                return Err(FormulaError::InvalidFunctionCall {
                    name: name.clone(),
                    expected: 2,
                    found: counted,
                    position: lexeme.position,
                });
            }
            let right = self.pop_value(&lexeme)?;
            let left = self.pop_value(&lexeme)?;
            let function = self.env.get_binary_function(name).ok_or_else(|| {
                FormulaError::UnknownFunction {
                    name: name.clone(),
                    position: lexeme.position,
                }
            })?;
            self.output.push(function.create(left, right));
        } else {
            return Err(FormulaError::UnknownFunction {
                name: name.clone(),
                position: lexeme.position,
            });
        }
        Ok(())
    }

    fn pop_value(&mut self, lexeme: &Lexeme) -> Result<Formula> {
        self.output
            .pop()
            .ok_or_else(|| FormulaError::MissingOperand {
                symbol: lexeme.text.clone(),
                position: lexeme.position,
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Real;
    use crate::lexer::Lexer;

    fn eval(input: &str) -> Result<Real> {
        let env = Environment::with_defaults();
        eval_with(&env, input)
    }

    fn eval_with(env: &Environment, input: &str) -> Result<Real> {
        let lexemes = Lexer::new(env).tokenize(input)?;
        Parser::new(env).parse(&lexemes).map(|f| f.evaluate())
    }

    #[test]
    fn test_precedence_and_associativity() {
        assert_eq!(eval("2 + 3 * 4").unwrap(), 14.0);
        assert_eq!(eval("10 - 4 - 3").unwrap(), 3.0);
        assert_eq!(eval("100 / 10 / 2").unwrap(), 5.0);
        assert_eq!(eval("7 % 4 * 2").unwrap(), 6.0);
        // Exponentiation groups right.
        assert_eq!(eval("2 ^ 3 ^ 2").unwrap(), 512.0);
    }

    #[test]
    fn test_parentheses_override_precedence() {
        assert_eq!(eval("2 * (3 + 4)").unwrap(), 14.0);
        assert_eq!(eval("(2 + 3) * (4 - 1)").unwrap(), 15.0);
        assert_eq!(eval("((2))").unwrap(), 2.0);
    }

    #[test]
    fn test_unary_operators() {
        assert_eq!(eval("-1").unwrap(), -1.0);
        assert_eq!(eval("1 - -1").unwrap(), 2.0);
        assert_eq!(eval("-(2 + 3)").unwrap(), -5.0);
        assert_eq!(eval("+5").unwrap(), 5.0);
        // Unary minus binds tighter than multiplication.
        assert_eq!(eval("-2 * 3").unwrap(), -6.0);
    }

    #[test]
    fn test_unary_with_right_associative_power() {
        // Equal precedence, '^' is right-associative: -(2^2).
        assert_eq!(eval("-2 ^ 2").unwrap(), -4.0);
    }

    #[test]
    fn test_function_calls() {
        assert_eq!(eval("sqrt(16)").unwrap(), 4.0);
        assert_eq!(eval("-sqrt(16)").unwrap(), -4.0);
        assert_eq!(eval("min(3, 5) + max(1, 2)").unwrap(), 5.0);
        assert_eq!(eval("min(1 + 2, 2 * 1)").unwrap(), 2.0);
        assert_eq!(eval("max(min(5, 6), 2)").unwrap(), 5.0);
    }

    #[test]
    fn test_arity_mismatch_too_many() {
        let err = eval("sqrt(1, 2)").unwrap_err();
        assert_eq!(
            err,
            FormulaError::InvalidFunctionCall {
                name: "sqrt".to_string(),
                expected: 1,
                found: 2,
                position: 0,
            }
        );
    }

    #[test]
    fn test_arity_mismatch_too_few() {
        let err = eval("min(1)").unwrap_err();
        assert_eq!(
            err,
            FormulaError::InvalidFunctionCall {
                name: "min".to_string(),
                expected: 2,
                found: 1,
                position: 0,
            }
        );
    }

    #[test]
    fn test_empty_argument_list_counts_as_zero() {
        let err = eval("sqrt()").unwrap_err();
        assert_eq!(
            err,
            FormulaError::InvalidFunctionCall {
                name: "sqrt".to_string(),
                expected: 1,
                found: 0,
                position: 0,
            }
        );
    }

    #[test]
    fn test_empty_parentheses_without_call() {
        let err = eval("()").unwrap_err();
        assert!(matches!(err, FormulaError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unmatched_parentheses() {
        let err = eval("(1 + 2").unwrap_err();
        assert_eq!(err, FormulaError::UnmatchedParenthesis { found: '(', position: 0 });

        let err = eval("1 + 2)").unwrap_err();
        assert_eq!(err, FormulaError::UnmatchedParenthesis { found: ')', position: 5 });

        let err = eval(")1").unwrap_err();
        assert_eq!(err, FormulaError::UnmatchedParenthesis { found: ')', position: 0 });
    }

    #[test]
    fn test_comma_outside_call() {
        let err = eval("(1, 2)").unwrap_err();
        assert!(matches!(
            err,
            FormulaError::UnexpectedToken { ref text, .. } if text == ","
        ));
    }

    #[test]
    fn test_missing_operand() {
        let err = eval("1 +").unwrap_err();
        assert_eq!(
            err,
            FormulaError::MissingOperand {
                symbol: "+".to_string(),
                position: 2,
            }
        );
    }

    #[test]
    fn test_adjacent_values_do_not_reduce() {
        let err = eval("1 2").unwrap_err();
        assert!(matches!(err, FormulaError::Syntax(_)));
    }

    #[test]
    fn test_bare_function_name_without_call() {
        let err = eval("sqrt 4").unwrap_err();
        assert!(matches!(
            err,
            FormulaError::UnexpectedToken { ref text, .. } if text == "sqrt"
        ));
    }

    #[test]
    fn test_constants_resolve_before_functions() {
        let mut env = Environment::with_defaults();
        env.register_constant("f", 7.0);
        env.register_unary_function("f", |v| v);
        assert_eq!(eval_with(&env, "f + 1").unwrap(), 8.0);
    }

    #[test]
    fn test_variable_shares_subtree() {
        let mut env = Environment::with_defaults();
        env.register_variable("x", Formula::Value(10.0));
        assert_eq!(eval_with(&env, "<x> * 2").unwrap(), 20.0);
        assert_eq!(eval_with(&env, "<x> + <x>").unwrap(), 20.0);
    }

    #[test]
    fn test_custom_operator_associativity() {
        let mut env = Environment::new();
        // Right-associative subtraction distinguishes grouping directions:
        // 1 - (2 - 3) = 2 rather than (1 - 2) - 3 = -4.
        env.register_binary_operator("-", 2, false, |a, b| a - b);
        assert_eq!(eval_with(&env, "1 - 2 - 3").unwrap(), 2.0);
    }

    #[test]
    fn test_empty_lexeme_sequence_is_a_syntax_error() {
        let env = Environment::with_defaults();
        let err = Parser::new(&env).parse(&[]).unwrap_err();
        assert!(matches!(err, FormulaError::Syntax(_)));
    }
}
