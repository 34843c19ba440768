//! REPL core logic (UI-agnostic)

use crate::diagnostic::Diagnostic;
use crate::runtime::Kestrel;
use crate::value::Value;
use std::cell::RefCell;
use std::rc::Rc;

/// REPL result type
pub struct ReplResult {
    /// The value produced by evaluation (None on error)
    pub value: Option<Value>,
    /// Diagnostics from all phases
    pub diagnostics: Vec<Diagnostic>,
    /// Standard output captured during execution
    pub stdout: String,
}

/// REPL core state
///
/// Maintains persistent state across multiple eval calls:
/// - Variable, function, and class declarations persist
/// - Errors do not reset state
pub struct ReplCore {
    /// Runtime holding the script world
    runtime: Kestrel,
    /// Captured `print` output, drained per line
    buffer: Rc<RefCell<Vec<u8>>>,
}

impl ReplCore {
    /// Create a new REPL core
    pub fn new() -> Self {
        let runtime = Kestrel::new();
        let buffer: Rc<RefCell<Vec<u8>>> = Rc::new(RefCell::new(Vec::new()));
        runtime.set_output(buffer.clone());
        Self { runtime, buffer }
    }

    /// Evaluate a line of input
    ///
    /// Runs the full pipeline: lex -> parse -> fold -> resolve -> execute.
    /// State persists across calls; a failed line leaves earlier
    /// definitions intact.
    pub fn eval_line(&mut self, input: &str) -> ReplResult {
        self.buffer.borrow_mut().clear();
        let outcome = self.runtime.eval_named(input, "<repl>");
        let stdout = String::from_utf8_lossy(&self.buffer.borrow()).into_owned();

        match outcome {
            Ok(value) => ReplResult {
                value: Some(value),
                diagnostics: Vec::new(),
                stdout,
            },
            Err(diagnostics) => ReplResult {
                value: None,
                diagnostics,
                stdout,
            },
        }
    }

    /// Reset REPL state
    ///
    /// Clears all variables, functions, and classes
    pub fn reset(&mut self) {
        self.runtime = Kestrel::new();
        self.runtime.set_output(self.buffer.clone());
        self.buffer.borrow_mut().clear();
    }
}

impl Default for ReplCore {
    fn default() -> Self {
        Self::new()
    }
}
