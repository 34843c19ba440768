//! Kestrel Runtime - Core language implementation
//!
//! This library provides the complete Kestrel language runtime including:
//! - Lexical analysis and parsing
//! - Constant folding and name resolution
//! - Tree-walking interpretation
//! - Native function and class bridging for host programs

/// Kestrel runtime version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// Public API modules
pub mod ast;
pub mod diagnostic;
pub mod environment;
pub mod fold;
pub mod interpreter;
pub mod lexer;
mod list;
pub mod native;
pub mod parser;
pub mod repl;
pub mod resolver;
pub mod runtime;
pub mod span;
pub mod token;
pub mod value;

// Re-export commonly used types
pub use ast::{Program, VersionedProgram, AST_VERSION};
pub use diagnostic::{error_codes, sort_diagnostics, Diagnostic, DiagnosticLevel};
pub use fold::{fold_program, FoldStats};
pub use interpreter::Interpreter;
pub use lexer::Lexer;
pub use native::NativeRegistry;
pub use parser::Parser;
pub use repl::{ReplCore, ReplResult};
pub use runtime::{Kestrel, RuntimeResult};
pub use span::Span;
pub use token::{Token, TokenKind};
pub use value::{
    Callable, Class, Function, Instance, List, NativeFunction, NativeMethod, RuntimeError, Value,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smoke() {
        // Smoke test to verify the crate builds and tests run
        assert_eq!(VERSION, "0.1.0");

        let runtime = Kestrel::new();
        match runtime.eval("1 + 2") {
            Ok(Value::Number(n)) => assert_eq!(n, 3.0),
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
