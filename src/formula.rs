//! The evaluable expression tree produced by parsing.

use crate::Real;
use crate::ops::{BinaryOperation, UnaryOperation};
use core::fmt;
use std::sync::Arc;

/// One node of a parsed formula: a literal value or the application of a
/// registered operation over child trees.
///
/// Nodes are immutable after construction. Children are shared: a variable
/// reference resolves to the variable's sub-tree at parse time, and cloning a
/// formula clones `Arc` handles rather than the trees behind them.
#[derive(Clone)]
pub enum Formula {
    /// A literal numeric value.
    Value(Real),
    /// A unary operator or function applied to one child.
    Unary {
        operation: UnaryOperation,
        argument: Arc<Formula>,
    },
    /// A binary operator or function applied to two children, as
    /// `operation(left, right)`.
    Binary {
        operation: BinaryOperation,
        left: Arc<Formula>,
        right: Arc<Formula>,
    },
}

impl Formula {
    /// Reduces the tree to a number by post-order traversal.
    ///
    /// Evaluation is pure: repeated calls on the same tree yield the same
    /// result. Division by zero and similar follow IEEE float semantics
    /// (infinity/NaN) rather than being special-cased.
    pub fn evaluate(&self) -> Real {
        match self {
            Formula::Value(value) => *value,
            Formula::Unary {
                operation,
                argument,
            } => operation(argument.evaluate()),
            Formula::Binary {
                operation,
                left,
                right,
            } => operation(left.evaluate(), right.evaluate()),
        }
    }
}

impl fmt::Debug for Formula {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Formula::Value(value) => f.debug_tuple("Value").field(value).finish(),
            Formula::Unary { argument, .. } => {
                f.debug_struct("Unary").field("argument", argument).finish_non_exhaustive()
            }
            Formula::Binary { left, right, .. } => f
                .debug_struct("Binary")
                .field("left", left)
                .field("right", right)
                .finish_non_exhaustive(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_value_round_trip() {
        assert_eq!(Formula::Value(1.5).evaluate(), 1.5);
        assert_eq!(Formula::Value(-0.0).evaluate(), -0.0);
        assert!(Formula::Value(Real::NAN).evaluate().is_nan());
    }

    #[test]
    fn test_nested_evaluation_order() {
        // operation(left, right) must see left first for non-commutative ops.
        let tree = Formula::Binary {
            operation: Arc::new(|a, b| a / b),
            left: Arc::new(Formula::Value(1.0)),
            right: Arc::new(Formula::Binary {
                operation: Arc::new(|a, b| a - b),
                left: Arc::new(Formula::Value(10.0)),
                right: Arc::new(Formula::Value(6.0)),
            }),
        };
        assert_eq!(tree.evaluate(), 0.25);
    }

    #[test]
    fn test_clone_shares_children() {
        let shared = Arc::new(Formula::Value(2.0));
        let tree = Formula::Unary {
            operation: Arc::new(|v| v * 3.0),
            argument: shared.clone(),
        };
        let copy = tree.clone();
        assert_eq!(copy.evaluate(), tree.evaluate());
        // Three handles: `shared` plus one in each tree.
        assert_eq!(Arc::strong_count(&shared), 3);
    }

    #[test]
    fn test_division_by_zero_follows_float_semantics() {
        let tree = Formula::Binary {
            operation: Arc::new(|a, b| a / b),
            left: Arc::new(Formula::Value(1.0)),
            right: Arc::new(Formula::Value(0.0)),
        };
        assert!(tree.evaluate().is_infinite());
    }
}
