//! The entry points hosts use: [`FormulaManager`] and the one-shot helpers.

use crate::Real;
use crate::env::Environment;
use crate::error::{FormulaError, Result};
use crate::formula::Formula;
use crate::lexer::Lexer;
use crate::parser::Parser;

/// Parses a formula string against an environment, producing an evaluable
/// tree. Empty (or all-whitespace) input is a usage error, reported before
/// tokenization.
pub fn parse_formula(input: &str, env: &Environment) -> Result<Formula> {
    if input.trim().is_empty() {
        return Err(FormulaError::EmptyInput);
    }
    let lexemes = Lexer::new(env).tokenize(input)?;
    Parser::new(env).parse(&lexemes)
}

/// Parses and immediately evaluates a formula string.
///
/// ```rust
/// use formula_rs::{Environment, interp};
///
/// let env = Environment::with_defaults();
/// assert_eq!(interp("1 + 1", &env).unwrap(), 2.0);
/// ```
pub fn interp(input: &str, env: &Environment) -> Result<Real> {
    parse_formula(input, env).map(|formula| formula.evaluate())
}

/// A thin facade binding a tokenizer and parser to one environment.
///
/// Parsing takes `&self`; the manager can serve multiple threads once its
/// environment is fully configured.
#[derive(Debug)]
pub struct FormulaManager {
    env: Environment,
}

impl FormulaManager {
    pub fn new(env: Environment) -> Self {
        FormulaManager { env }
    }

    pub fn env(&self) -> &Environment {
        &self.env
    }

    /// Registration access to the environment. Configure before parsing;
    /// see the crate docs on concurrent use.
    pub fn env_mut(&mut self) -> &mut Environment {
        &mut self.env
    }

    /// Parses one formula string into an evaluable tree.
    pub fn parse(&self, input: &str) -> Result<Formula> {
        parse_formula(input, &self.env)
    }

    /// Parses and evaluates in one step.
    pub fn evaluate(&self, input: &str) -> Result<Real> {
        interp(input, &self.env)
    }
}
