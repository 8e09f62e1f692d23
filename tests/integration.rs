//! Integration tests exercising the library the way a host application
//! would: build a vocabulary, then parse and evaluate formula strings.

use formula_rs::{
    Environment, Formula, FormulaError, FormulaManager, Real, assert_approx_eq, constants, interp,
};

/// Level 1: the default vocabulary end to end.
#[test]
fn test_default_vocabulary_evaluation() {
    let env = Environment::with_defaults();

    assert_eq!(interp("1 + 1", &env).unwrap(), 2.0);
    assert_eq!(interp("2 * (3 + 4)", &env).unwrap(), 14.0);
    assert_eq!(interp("2 ^ 3 ^ 2", &env).unwrap(), 512.0);
    assert_eq!(interp("min(3, 5) + max(1, 2)", &env).unwrap(), 5.0);
    assert_eq!(interp("-sqrt(16)", &env).unwrap(), -4.0);
    assert_eq!(interp("ceil(1.2) + floor(1.8) + round(0.5)", &env).unwrap(), 4.0);
    assert_eq!(interp("abs(1 - 4)", &env).unwrap(), 3.0);

    assert_approx_eq!(interp("sin(pi / 2)", &env).unwrap(), 1.0);
    assert_approx_eq!(interp("cos(0)", &env).unwrap(), 1.0);
    assert_approx_eq!(interp("tan(0)", &env).unwrap(), 0.0);
    assert_approx_eq!(interp("pi + e", &env).unwrap(), constants::PI + constants::E);
}

/// Level 2: host-registered vocabulary.
#[test]
fn test_custom_vocabulary() {
    let mut env = Environment::new();
    env.register_constant("low", 1.0);
    env.register_constant("high", 10.0);
    env.register_binary_operator("+", 2, true, |a, b| a + b);
    env.register_binary_operator("<", 1, true, |a, b| if a < b { 1.0 } else { 0.0 });
    env.register_binary_operator("<=", 1, true, |a, b| if a <= b { 1.0 } else { 0.0 });
    env.register_unary_function("clamp01", |v| v.clamp(0.0, 1.0));

    // Longest match: `<=` must never tokenize as `<` followed by `=`.
    assert_eq!(interp("low <= high", &env).unwrap(), 1.0);
    assert_eq!(interp("high < low", &env).unwrap(), 0.0);
    assert_eq!(interp("clamp01(low + high)", &env).unwrap(), 1.0);

    // '=' alone was never registered.
    let err = interp("low = high", &env).unwrap_err();
    assert_eq!(err, FormulaError::UnexpectedCharacter { position: 4 });
}

/// Level 3: variables as shared sub-trees, including trees built by parsing.
#[test]
fn test_variables_bound_to_parsed_formulas() {
    let mut manager = FormulaManager::new(Environment::with_defaults());
    manager.env_mut().register_variable("x", Formula::Value(10.0));

    let formula = manager.parse("<x> * 2").unwrap();
    assert_eq!(formula.evaluate(), 20.0);

    // A parsed formula can itself be bound as a variable.
    let radius = manager.parse("1 + 2").unwrap();
    manager.env_mut().register_variable("r", radius);
    let area = manager.parse("pi * <r> ^ 2").unwrap();
    assert_approx_eq!(area.evaluate(), constants::PI * 9.0);

    // The tree was shared at parse time; re-binding the name afterwards does
    // not affect formulas that were already parsed.
    manager.env_mut().register_variable("r", Formula::Value(100.0));
    assert_approx_eq!(area.evaluate(), constants::PI * 9.0);
}

#[test]
fn test_error_reporting_carries_columns() {
    let env = Environment::with_defaults();

    let err = interp("1 + bogus", &env).unwrap_err();
    assert_eq!(err.position(), Some(4));
    assert_eq!(err.to_string(), "Unknown identifier 'bogus' in column 4");

    let err = interp("(1 + 2", &env).unwrap_err();
    assert_eq!(err, FormulaError::UnmatchedParenthesis { found: '(', position: 0 });

    let err = interp("1 + 2)", &env).unwrap_err();
    assert_eq!(err, FormulaError::UnmatchedParenthesis { found: ')', position: 5 });

    let err = interp("min(1, 2, 3)", &env).unwrap_err();
    assert_eq!(
        err.to_string(),
        "Too many arguments for min(a,b), expected 2, got 3"
    );

    let err = interp("sqrt()", &env).unwrap_err();
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
fn test_empty_input_is_a_usage_error_not_a_parse_error() {
    let env = Environment::with_defaults();
    assert_eq!(interp("", &env).unwrap_err(), FormulaError::EmptyInput);
    assert_eq!(interp(" \t ", &env).unwrap_err(), FormulaError::EmptyInput);
}

/// A configured environment supports read-only parsing from many threads.
#[test]
fn test_concurrent_parsing_against_shared_environment() {
    let mut env = Environment::with_defaults();
    env.register_variable("x", Formula::Value(2.0));

    std::thread::scope(|scope| {
        let env = &env;
        let mut handles = Vec::new();
        for i in 0..8 {
            handles.push(scope.spawn(move || {
                let input = format!("<x> ^ 2 + {}", i);
                interp(&input, env).unwrap()
            }));
        }
        for (i, handle) in handles.into_iter().enumerate() {
            assert_eq!(handle.join().unwrap(), 4.0 + i as Real);
        }
    });
}

#[test]
fn test_evaluation_is_repeatable() {
    let env = Environment::with_defaults();
    let formula = formula_rs::parse_formula("sqrt(2) * sqrt(2)", &env).unwrap();
    let first = formula.evaluate();
    for _ in 0..10 {
        assert_eq!(formula.evaluate(), first);
    }
}
