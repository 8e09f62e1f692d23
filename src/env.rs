//! The environment: the mutable registry of constants, variables, operators,
//! and functions that parameterizes both tokenization and parsing.
//!
//! Operator registration also maintains the token lists the lexer dispatches
//! on. Within each list, tokens are kept ordered by strictly descending
//! symbol length so that when registered symbols share a prefix (`<=` and
//! `<`), the longer one is always attempted first.

use crate::Real;
use crate::constants;
use crate::formula::Formula;
use crate::functions;
use crate::ops::{BinaryFunction, BinaryOperator, UnaryFunction, UnaryOperator};
use crate::token::{Token, TokenKind};
use std::collections::HashMap;

/// The symbol table for one formula vocabulary.
///
/// An environment is expected to be fully configured before parsing begins;
/// lookups never mutate state, so a configured environment can be shared
/// across threads for read-only parsing.
#[derive(Debug)]
pub struct Environment {
    constants: HashMap<String, Real>,
    variables: HashMap<String, Formula>,
    unary_operators: HashMap<String, UnaryOperator>,
    binary_operators: HashMap<String, BinaryOperator>,
    unary_functions: HashMap<String, UnaryFunction>,
    binary_functions: HashMap<String, BinaryFunction>,

    unary_tokens: Vec<Token>,
    binary_tokens: Vec<Token>,
    symbol_tokens: Vec<Token>,
}

impl Environment {
    /// An empty environment with no vocabulary beyond `(`, `)`, and `,`.
    pub fn new() -> Self {
        Environment {
            constants: HashMap::new(),
            variables: HashMap::new(),
            unary_operators: HashMap::new(),
            binary_operators: HashMap::new(),
            unary_functions: HashMap::new(),
            binary_functions: HashMap::new(),
            unary_tokens: Vec::new(),
            binary_tokens: Vec::new(),
            symbol_tokens: vec![Token::left_paren(), Token::right_paren(), Token::comma()],
        }
    }

    /// An environment preloaded with the conventional arithmetic vocabulary:
    /// constants `pi` and `e`; unary `+`/`-`; binary `+ - * / % ^`; unary
    /// functions `sqrt abs ceil floor round sin cos tan`; binary functions
    /// `min max`.
    pub fn with_defaults() -> Self {
        let mut env = Environment::new();

        env.register_constant("pi", constants::PI);
        env.register_constant("e", constants::E);

        env.register_unary_operator("+", 4, |value| value);
        env.register_unary_operator("-", 4, |value| -value);

        env.register_binary_operator("+", 2, true, |a, b| a + b);
        env.register_binary_operator("-", 2, true, |a, b| a - b);
        env.register_binary_operator("*", 3, true, |a, b| a * b);
        env.register_binary_operator("/", 3, true, |a, b| a / b);
        env.register_binary_operator("%", 3, true, |a, b| a % b);
        env.register_binary_operator("^", 4, false, functions::pow);

        env.register_unary_function("sqrt", functions::sqrt);
        env.register_unary_function("abs", functions::abs);
        env.register_unary_function("ceil", functions::ceil);
        env.register_unary_function("floor", functions::floor);
        env.register_unary_function("round", functions::round);
        env.register_unary_function("sin", functions::sin);
        env.register_unary_function("cos", functions::cos);
        env.register_unary_function("tan", functions::tan);

        env.register_binary_function("min", functions::min);
        env.register_binary_function("max", functions::max);

        env
    }

    /// Registers (or overwrites) a named constant.
    pub fn register_constant(&mut self, name: &str, value: Real) {
        self.constants.insert(name.to_string(), value);
    }

    /// Registers (or overwrites) a named variable bound to a formula.
    /// References share the tree; they do not copy it.
    pub fn register_variable(&mut self, name: &str, formula: Formula) {
        self.variables.insert(name.to_string(), formula);
    }

    /// Registers a prefix operator. Higher precedence binds tighter.
    pub fn register_unary_operator<F>(&mut self, symbol: &str, precedence: u8, operation: F)
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        self.unary_operators
            .insert(symbol.to_string(), UnaryOperator::new(symbol, precedence, operation));
        Self::insert_operator_token(
            &mut self.unary_tokens,
            Token::literal(TokenKind::UnaryOperator, symbol),
        );
    }

    /// Registers an infix operator. Higher precedence binds tighter;
    /// `left_assoc` controls how equal-precedence chains group.
    pub fn register_binary_operator<F>(
        &mut self,
        symbol: &str,
        precedence: u8,
        left_assoc: bool,
        operation: F,
    ) where
        F: Fn(Real, Real) -> Real + Send + Sync + 'static,
    {
        self.binary_operators.insert(
            symbol.to_string(),
            BinaryOperator::new(symbol, precedence, left_assoc, operation),
        );
        Self::insert_operator_token(
            &mut self.binary_tokens,
            Token::literal(TokenKind::BinaryOperator, symbol),
        );
    }

    /// Registers a one-argument function, callable as `name(arg)`.
    pub fn register_unary_function<F>(&mut self, name: &str, operation: F)
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        self.unary_functions
            .insert(name.to_string(), UnaryFunction::new(name, operation));
    }

    /// Registers a two-argument function, callable as `name(a, b)`.
    pub fn register_binary_function<F>(&mut self, name: &str, operation: F)
    where
        F: Fn(Real, Real) -> Real + Send + Sync + 'static,
    {
        self.binary_functions
            .insert(name.to_string(), BinaryFunction::new(name, operation));
    }

    pub fn is_constant(&self, name: &str) -> bool {
        self.constants.contains_key(name)
    }

    pub fn is_variable(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    pub fn is_unary_operator(&self, symbol: &str) -> bool {
        self.unary_operators.contains_key(symbol)
    }

    pub fn is_binary_operator(&self, symbol: &str) -> bool {
        self.binary_operators.contains_key(symbol)
    }

    pub fn is_unary_function(&self, name: &str) -> bool {
        self.unary_functions.contains_key(name)
    }

    pub fn is_binary_function(&self, name: &str) -> bool {
        self.binary_functions.contains_key(name)
    }

    pub fn is_function(&self, name: &str) -> bool {
        self.is_unary_function(name) || self.is_binary_function(name)
    }

    pub fn get_constant(&self, name: &str) -> Option<Real> {
        self.constants.get(name).copied()
    }

    pub fn get_variable(&self, name: &str) -> Option<&Formula> {
        self.variables.get(name)
    }

    pub fn get_unary_operator(&self, symbol: &str) -> Option<&UnaryOperator> {
        self.unary_operators.get(symbol)
    }

    pub fn get_binary_operator(&self, symbol: &str) -> Option<&BinaryOperator> {
        self.binary_operators.get(symbol)
    }

    pub fn get_unary_function(&self, name: &str) -> Option<&UnaryFunction> {
        self.unary_functions.get(name)
    }

    pub fn get_binary_function(&self, name: &str) -> Option<&BinaryFunction> {
        self.binary_functions.get(name)
    }

    /// Prefix-operator tokens, longest symbol first.
    pub fn unary_tokens(&self) -> &[Token] {
        &self.unary_tokens
    }

    /// Infix-operator tokens, longest symbol first.
    pub fn binary_tokens(&self) -> &[Token] {
        &self.binary_tokens
    }

    /// Structural symbol tokens: `(`, `)`, `,`.
    pub fn symbol_tokens(&self) -> &[Token] {
        &self.symbol_tokens
    }

    /// Inserts before the first entry with a strictly shorter symbol, keeping
    /// the list in descending symbol-length order. Re-registering a symbol
    /// leaves one stale duplicate token behind; both match identically, so
    /// tokenization is unaffected.
    fn insert_operator_token(tokens: &mut Vec<Token>, token: Token) {
        let length = token.symbol().map_or(0, str::len);
        let index = tokens
            .iter()
            .position(|existing| existing.symbol().map_or(0, str::len) < length)
            .unwrap_or(tokens.len());
        tokens.insert(index, token);
    }
}

impl Default for Environment {
    fn default() -> Self {
        Environment::new()
    }
}
