//! Registry entry types for operators and functions.
//!
//! Operations are shared closures so that a fully-configured
//! [`Environment`](crate::Environment) can be read from multiple threads and
//! so that constructed [`Formula`](crate::Formula) trees stay decoupled from
//! the environment they were parsed against.

use crate::Real;
use crate::formula::Formula;
use core::fmt;
use std::sync::Arc;

/// A one-argument operation, used by unary operators and unary functions.
pub type UnaryOperation = Arc<dyn Fn(Real) -> Real + Send + Sync>;

/// A two-argument operation, used by binary operators and binary functions.
pub type BinaryOperation = Arc<dyn Fn(Real, Real) -> Real + Send + Sync>;

/// A registered prefix operator. Unary operators bind by precedence only;
/// they are always right-associative.
#[derive(Clone)]
pub struct UnaryOperator {
    pub symbol: String,
    pub precedence: u8,
    pub operation: UnaryOperation,
}

impl UnaryOperator {
    pub fn new<F>(symbol: &str, precedence: u8, operation: F) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        UnaryOperator {
            symbol: symbol.to_string(),
            precedence,
            operation: Arc::new(operation),
        }
    }

    /// Builds the application node for this operator over one child tree.
    pub fn create(&self, argument: Formula) -> Formula {
        Formula::Unary {
            operation: self.operation.clone(),
            argument: Arc::new(argument),
        }
    }
}

impl fmt::Debug for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryOperator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .finish_non_exhaustive()
    }
}

/// A registered infix operator.
#[derive(Clone)]
pub struct BinaryOperator {
    pub symbol: String,
    pub precedence: u8,
    /// Whether the operator associates to the left (`a - b - c` as
    /// `(a - b) - c`). Exponentiation-style operators set this to `false`.
    pub left_assoc: bool,
    pub operation: BinaryOperation,
}

impl BinaryOperator {
    pub fn new<F>(symbol: &str, precedence: u8, left_assoc: bool, operation: F) -> Self
    where
        F: Fn(Real, Real) -> Real + Send + Sync + 'static,
    {
        BinaryOperator {
            symbol: symbol.to_string(),
            precedence,
            left_assoc,
            operation: Arc::new(operation),
        }
    }

    /// Builds the application node for this operator over two child trees.
    pub fn create(&self, left: Formula, right: Formula) -> Formula {
        Formula::Binary {
            operation: self.operation.clone(),
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }
}

impl fmt::Debug for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryOperator")
            .field("symbol", &self.symbol)
            .field("precedence", &self.precedence)
            .field("left_assoc", &self.left_assoc)
            .finish_non_exhaustive()
    }
}

/// A registered one-argument function, invoked as `name(arg)`.
#[derive(Clone)]
pub struct UnaryFunction {
    pub name: String,
    pub operation: UnaryOperation,
}

impl UnaryFunction {
    pub fn new<F>(name: &str, operation: F) -> Self
    where
        F: Fn(Real) -> Real + Send + Sync + 'static,
    {
        UnaryFunction {
            name: name.to_string(),
            operation: Arc::new(operation),
        }
    }

    pub fn create(&self, argument: Formula) -> Formula {
        Formula::Unary {
            operation: self.operation.clone(),
            argument: Arc::new(argument),
        }
    }
}

impl fmt::Debug for UnaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UnaryFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

/// A registered two-argument function, invoked as `name(a, b)`.
#[derive(Clone)]
pub struct BinaryFunction {
    pub name: String,
    pub operation: BinaryOperation,
}

impl BinaryFunction {
    pub fn new<F>(name: &str, operation: F) -> Self
    where
        F: Fn(Real, Real) -> Real + Send + Sync + 'static,
    {
        BinaryFunction {
            name: name.to_string(),
            operation: Arc::new(operation),
        }
    }

    pub fn create(&self, left: Formula, right: Formula) -> Formula {
        Formula::Binary {
            operation: self.operation.clone(),
            left: Arc::new(left),
            right: Arc::new(right),
        }
    }
}

impl fmt::Debug for BinaryFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BinaryFunction")
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}
