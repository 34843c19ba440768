//! Shared test utilities
//!
//! Common helpers for Kestrel integration tests to reduce boilerplate and
//! keep assertions readable.

use kestrel_runtime::{Diagnostic, Kestrel, Value};
use std::cell::RefCell;
use std::rc::Rc;

// Re-export testing utilities
pub use pretty_assertions::{assert_eq, assert_ne};

/// Evaluate source in a fresh runtime
pub fn eval(source: &str) -> Result<Value, Vec<Diagnostic>> {
    Kestrel::new().eval(source)
}

/// Evaluate source and capture everything `print` wrote
pub fn eval_with_output(source: &str) -> (Result<Value, Vec<Diagnostic>>, String) {
    let runtime = Kestrel::new();
    let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
    runtime.set_output(buffer.clone());
    let result = runtime.eval(source);
    let output = String::from_utf8_lossy(&buffer.borrow()).into_owned();
    (result, output)
}

/// Assert that a program runs cleanly and prints exactly `expected`
pub fn assert_prints(source: &str, expected: &str) {
    let (result, output) = eval_with_output(source);
    if let Err(diagnostics) = &result {
        panic!(
            "Expected success, got errors: {:?}\nsource: {}",
            diagnostics, source
        );
    }
    assert_eq!(output, expected, "wrong output for: {}", source);
}

/// Assert that source code evaluates to a number
pub fn assert_eval_number(source: &str, expected: f64) {
    match eval(source) {
        Ok(Value::Number(n)) => assert_eq!(n, expected, "wrong number for: {}", source),
        other => panic!("Expected Number({}), got {:?} for: {}", expected, other, source),
    }
}

/// Assert that source code evaluates to a string
pub fn assert_eval_string(source: &str, expected: &str) {
    match eval(source) {
        Ok(Value::String(s)) => assert_eq!(s.as_str(), expected, "wrong string for: {}", source),
        other => panic!(
            "Expected String({:?}), got {:?} for: {}",
            expected, other, source
        ),
    }
}

/// Assert that source code evaluates to a boolean
pub fn assert_eval_bool(source: &str, expected: bool) {
    match eval(source) {
        Ok(Value::Bool(b)) => assert_eq!(b, expected, "wrong bool for: {}", source),
        other => panic!("Expected Bool({}), got {:?} for: {}", expected, other, source),
    }
}

/// Assert that source code evaluates to null
pub fn assert_eval_null(source: &str) {
    match eval(source) {
        Ok(Value::Null) => {}
        other => panic!("Expected Null, got {:?} for: {}", other, source),
    }
}

/// Assert that source code fails with a specific error code
pub fn assert_error_code(source: &str, expected_code: &str) {
    match eval(source) {
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty(), "Expected error, got success");
            assert_eq!(
                diagnostics[0].code, expected_code,
                "Expected error code {}, got {} ({}) for: {}",
                expected_code, diagnostics[0].code, diagnostics[0].message, source
            );
        }
        Ok(value) => panic!(
            "Expected error {}, got success: {:?} for: {}",
            expected_code, value, source
        ),
    }
}

/// Assert that source code fails with a specific code and exact message
pub fn assert_error_message(source: &str, expected_code: &str, expected_message: &str) {
    match eval(source) {
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty(), "Expected error, got success");
            assert_eq!(diagnostics[0].code, expected_code, "for: {}", source);
            assert_eq!(diagnostics[0].message, expected_message, "for: {}", source);
        }
        Ok(value) => panic!(
            "Expected error {:?}, got success: {:?} for: {}",
            expected_message, value, source
        ),
    }
}

/// Assert that source code produces at least one error (any code)
pub fn assert_has_error(source: &str) {
    match eval(source) {
        Err(diagnostics) => {
            assert!(!diagnostics.is_empty(), "Expected error, got empty diagnostics");
        }
        Ok(value) => panic!("Expected error, got success: {:?} for: {}", value, source),
    }
}

/// Assert that source code evaluates successfully (no errors)
pub fn assert_no_error(source: &str) {
    match eval(source) {
        Ok(_) => {}
        Err(diagnostics) => panic!(
            "Expected success, got errors: {:?} for: {}",
            diagnostics, source
        ),
    }
}
