//! Kestrel runtime API for embedding

use crate::ast::Program;
use crate::diagnostic::Diagnostic;
use crate::fold;
use crate::interpreter::Interpreter;
use crate::lexer::Lexer;
use crate::native::NativeRegistry;
use crate::parser::Parser;
use crate::resolver::Resolver;
use crate::span::Span;
use crate::value::{NativeFunction, RuntimeError, Value};
use std::cell::{Cell, RefCell};
use std::io::Write;
use std::path::Path;
use std::rc::Rc;

/// Result type for runtime operations
pub type RuntimeResult<T> = Result<T, Vec<Diagnostic>>;

/// Kestrel runtime instance
///
/// Provides a high-level API for embedding Kestrel in host applications.
/// One instance is one script world: globals and resolver state persist
/// across `eval` calls.
///
/// # Examples
///
/// ```
/// use kestrel_runtime::Kestrel;
///
/// let runtime = Kestrel::new();
/// let result = runtime.eval("1 + 2");
/// ```
pub struct Kestrel {
    /// Interpreter for executing code (using interior mutability)
    interpreter: RefCell<Interpreter>,
    /// First id the next parse may mint; monotonic across evals so stale
    /// resolver entries can never alias a fresh node
    next_node_id: Cell<u32>,
    /// Constant folding toggle; on unless the host disables it
    folding: Cell<bool>,
}

impl Kestrel {
    /// Create a new Kestrel runtime with the default natives
    pub fn new() -> Self {
        Self::with_registry(&NativeRegistry::new())
    }

    /// Create a runtime seeded from a host-extended registry
    ///
    /// # Examples
    ///
    /// ```
    /// use kestrel_runtime::{Kestrel, NativeRegistry, Value};
    ///
    /// let mut registry = NativeRegistry::new();
    /// registry.register_callable("answer", 0, |_, _| Ok(Value::Number(42.0)));
    /// let runtime = Kestrel::with_registry(&registry);
    /// ```
    pub fn with_registry(registry: &NativeRegistry) -> Self {
        Self {
            interpreter: RefCell::new(Interpreter::with_registry(registry)),
            next_node_id: Cell::new(0),
            folding: Cell::new(true),
        }
    }

    /// Evaluate Kestrel source code
    ///
    /// Returns the value of the final expression statement, or the
    /// diagnostics that stopped evaluation. Any resolution diagnostic
    /// withholds execution entirely.
    ///
    /// # Examples
    ///
    /// ```
    /// use kestrel_runtime::{Kestrel, Value};
    ///
    /// let runtime = Kestrel::new();
    /// match runtime.eval("1 + 2") {
    ///     Ok(Value::Number(n)) => assert_eq!(n, 3.0),
    ///     other => panic!("unexpected result: {:?}", other),
    /// }
    /// ```
    pub fn eval(&self, source: &str) -> RuntimeResult<Value> {
        self.eval_named(source, "<eval>")
    }

    /// Evaluate source under a file name used in diagnostics
    pub fn eval_named(&self, source: &str, file: &str) -> RuntimeResult<Value> {
        // For REPL-style usage, treat a trailing bare expression as an
        // expression statement by appending the semicolon
        let source = source.trim();
        let source = if !source.is_empty() && !source.ends_with(';') && !source.ends_with('}') {
            format!("{};", source)
        } else {
            source.to_string()
        };

        let program = self.prepare(&source, file)?;

        let mut interpreter = self.interpreter.borrow_mut();
        let resolve_diagnostics = Resolver::new(&mut interpreter).resolve(&program);
        if !resolve_diagnostics.is_empty() {
            return Err(annotate_all(resolve_diagnostics, &source, file));
        }

        match interpreter.interpret(&program) {
            Ok(value) => Ok(value),
            Err(error) => Err(vec![
                runtime_error_to_diagnostic(&error).annotate(&source, file)
            ]),
        }
    }

    /// Evaluate a Kestrel source file
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use kestrel_runtime::Kestrel;
    ///
    /// let runtime = Kestrel::new();
    /// let result = runtime.eval_file("program.kst");
    /// ```
    pub fn eval_file(&self, path: impl AsRef<Path>) -> RuntimeResult<Value> {
        let path = path.as_ref();
        let file = path.display().to_string();
        let source = std::fs::read_to_string(path).map_err(|error| {
            vec![Diagnostic::error(
                format!("Failed to read {}: {}", file, error),
                Span::dummy(),
            )]
        })?;

        self.eval_named(&source, &file)
    }

    /// Run the static phases only (lex, parse, fold, resolve)
    ///
    /// Returns every diagnostic found; an empty result means the source
    /// would be allowed to execute. Nothing runs and the runtime's script
    /// world is left untouched.
    pub fn check(&self, source: &str, file: &str) -> Vec<Diagnostic> {
        let program = match self.prepare(source, file) {
            Ok(program) => program,
            Err(diagnostics) => return diagnostics,
        };

        // Resolve against a scratch interpreter so depths recorded for
        // code that never runs cannot reach the live one
        let mut scratch = Interpreter::new();
        let diagnostics = Resolver::new(&mut scratch).resolve(&program);
        annotate_all(diagnostics, source, file)
    }

    /// Parse (and fold, unless disabled) without resolving or executing
    ///
    /// Tooling entry point: the returned tree serializes through
    /// [`crate::ast::VersionedProgram`].
    pub fn parse_program(&self, source: &str, file: &str) -> RuntimeResult<Program> {
        self.prepare(source, file)
    }

    /// Register a host function on the live runtime
    ///
    /// Unlike registry seeding this reaches an already-constructed world,
    /// replacing any global with the same name.
    pub fn register_callable(
        &self,
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value], Span) -> Result<Value, RuntimeError> + 'static,
    ) {
        let name = name.into();
        let function = NativeFunction {
            name: name.clone(),
            arity,
            func: Rc::new(func),
        };
        self.interpreter
            .borrow_mut()
            .define_global(&name, Value::NativeFunction(Rc::new(function)));
    }

    /// Redirect `print` output
    pub fn set_output(&self, output: Rc<RefCell<dyn Write>>) {
        self.interpreter.borrow_mut().set_output(output);
    }

    /// Enable or disable constant folding for subsequent evaluations
    pub fn set_folding(&self, enabled: bool) {
        self.folding.set(enabled);
    }

    /// Lex, parse, and fold; the shared node-id counter advances even
    /// when parsing fails partway
    fn prepare(&self, source: &str, file: &str) -> RuntimeResult<Program> {
        let (tokens, lex_diagnostics) = Lexer::new(source).tokenize();
        if !lex_diagnostics.is_empty() {
            return Err(annotate_all(lex_diagnostics, source, file));
        }

        let mut parser = Parser::with_start_id(tokens, self.next_node_id.get());
        let (mut program, parse_diagnostics) = parser.parse();
        self.next_node_id.set(parser.next_node_id());
        if !parse_diagnostics.is_empty() {
            return Err(annotate_all(parse_diagnostics, source, file));
        }

        if self.folding.get() {
            fold::fold_program(&mut program);
        }
        Ok(program)
    }
}

impl Default for Kestrel {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a runtime error to a diagnostic at its recorded span
fn runtime_error_to_diagnostic(error: &RuntimeError) -> Diagnostic {
    Diagnostic::error_with_code(error.code(), error.to_string(), error.span())
}

fn annotate_all(diagnostics: Vec<Diagnostic>, source: &str, file: &str) -> Vec<Diagnostic> {
    diagnostics
        .into_iter()
        .map(|diagnostic| diagnostic.annotate(source, file))
        .collect()
}
