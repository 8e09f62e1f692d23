#![doc = r#"
# formula-rs

An extensible infix formula parser and evaluation engine.

## Overview

formula-rs embeds a small formula language inside a host application. The host
registers a vocabulary of constants, variables, operators, and functions in an
[`Environment`], then repeatedly parses user-supplied formula strings against
that vocabulary. Parsing produces a [`Formula`] expression tree that is
evaluated by direct recursive reduction.

The pipeline is the classic two-phase one: a tokenizer turns raw text into a
sequence of typed lexemes using the environment's longest-match-first token
tables, and a shunting-yard parser (extended for unary operators and function
call arity tracking) reduces the lexemes into one tree.

Key features:
- Configurable floating-point precision (f32/f64)
- Host-registered constants, variables, operators, and functions
- A default vocabulary covering conventional arithmetic (`pi`, `e`, `+`, `-`,
  `*`, `/`, `%`, `^`, `sqrt`, `sin`, `min`, ...)
- Custom operators with explicit precedence and associativity, with
  longest-match tokenization when symbols share a prefix (`<=` vs `<`)
- Typed errors carrying the offending source column

## Quick Start

```rust
use formula_rs::{Environment, interp};

let env = Environment::with_defaults();
assert_eq!(interp("2 + 3 * 4", &env).unwrap(), 14.0);
assert_eq!(interp("2 * (3 + 4)", &env).unwrap(), 14.0);
assert_eq!(interp("min(3, 5) + max(1, 2)", &env).unwrap(), 5.0);
```

## Variables

Variables are bound to already-parsed [`Formula`] trees and referenced in
angle brackets. The reference resolves to the shared sub-tree at parse time:

```rust
use formula_rs::{Environment, Formula, FormulaManager};

let mut env = Environment::with_defaults();
env.register_variable("x", Formula::Value(10.0));

let manager = FormulaManager::new(env);
let formula = manager.parse("<x> * 2").unwrap();
assert_eq!(formula.evaluate(), 20.0);
```

## Extending the vocabulary

```rust
use formula_rs::{Environment, interp};

let mut env = Environment::with_defaults();
env.register_constant("answer", 42.0);
env.register_binary_operator("<<", 1, true, |a, b| a + b * 2.0);
env.register_unary_function("double", |value| value * 2.0);

assert_eq!(interp("double(answer)", &env).unwrap(), 84.0);
assert_eq!(interp("1 << 3", &env).unwrap(), 7.0);
```

## Error Handling

All failures are returned as typed [`FormulaError`] values; the library never
prints or terminates the process:

```rust
use formula_rs::{Environment, FormulaError, interp};

let env = Environment::with_defaults();
match interp("min(1, 2, 3)", &env) {
    Err(FormulaError::InvalidFunctionCall { name, expected, found, .. }) => {
        assert_eq!(name, "min");
        assert_eq!(expected, 2);
        assert_eq!(found, 3);
    }
    other => panic!("expected an arity error, got {:?}", other),
}
```

## Feature Flags

- `f32`: use 32-bit floating point for all values (default is 64-bit)
- `libm`: back the default vocabulary's math functions with the `libm` crate
  (enabled by default; without it the std float methods are used)
"#]

pub mod engine;
pub mod env;
pub mod error;
pub mod formula;
pub mod functions;
pub mod lexer;
pub mod ops;
pub mod parser;
pub mod token;

pub use engine::{FormulaManager, interp, parse_formula};
pub use env::Environment;
pub use error::{FormulaError, Result};
pub use formula::Formula;
pub use lexer::{Lexeme, Lexer};
pub use ops::{BinaryFunction, BinaryOperator, UnaryFunction, UnaryOperator};
pub use parser::Parser;
pub use token::{Token, TokenKind};

/// The floating-point type used for all values, selected by feature flags.
#[cfg(feature = "f32")]
pub type Real = f32;

/// The floating-point type used for all values, selected by feature flags.
#[cfg(not(feature = "f32"))]
pub type Real = f64;

pub mod constants {
    use super::Real;

    #[cfg(feature = "f32")]
    pub const PI: Real = core::f32::consts::PI;
    #[cfg(feature = "f32")]
    pub const E: Real = core::f32::consts::E;
    #[cfg(feature = "f32")]
    pub const TEST_PRECISION: Real = 1e-6;

    #[cfg(not(feature = "f32"))]
    pub const PI: Real = core::f64::consts::PI;
    #[cfg(not(feature = "f32"))]
    pub const E: Real = core::f64::consts::E;
    #[cfg(not(feature = "f32"))]
    pub const TEST_PRECISION: Real = 1e-10;
}

/// Utility macro to check that two floating point values are approximately
/// equal within a given epsilon (defaults to `constants::TEST_PRECISION`).
#[macro_export]
macro_rules! assert_approx_eq {
    ($left:expr, $right:expr $(,)?) => {
        $crate::assert_approx_eq!($left, $right, $crate::constants::TEST_PRECISION)
    };
    ($left:expr, $right:expr, $epsilon:expr $(,)?) => {{
        let left_val: $crate::Real = $left;
        let right_val: $crate::Real = $right;
        let eps: $crate::Real = $epsilon;

        if left_val.is_nan() && right_val.is_nan() {
            // NaN == NaN for our purposes
        } else if left_val.is_infinite()
            && right_val.is_infinite()
            && left_val.signum() == right_val.signum()
        {
            // Same-signed infinities are equal
        } else {
            assert!(
                (left_val - right_val).abs() < eps,
                "assertion failed: `(left ≈ right)` (left: `{}`, right: `{}`, epsilon: `{}`)",
                left_val,
                right_val,
                eps
            );
        }
    }};
}
