//! AST interpreter (tree-walking)
//!
//! Direct evaluation of the resolved AST with environment-chain variable
//! storage. Supports:
//! - Expression evaluation (literals, lists, binary/unary ops, calls,
//!   indexing, property access, `this`/`super`)
//! - Statement execution (declarations, control flow, print, try/catch)
//! - Closures capturing their defining environment
//! - Classes with single inheritance and bound methods
//! - Script exceptions riding a dedicated error variant
//!
//! Statement execution yields a [`Completion`] signal; `return`, `break`,
//! and `continue` travel as values, never as host errors. Only `throw`
//! uses the error channel (`RuntimeError::Thrown`), because it has to
//! cross call boundaries mid-expression.

mod expr;
mod stmt;

use crate::ast::{NodeId, Program, Stmt};
use crate::environment::Environment;
use crate::native::NativeRegistry;
use crate::span::Span;
use crate::value::{BoundNative, Callable, Class, Function, Instance, NativeFunction};
use crate::value::{RuntimeError, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::Write;
use std::rc::Rc;

/// Signal produced by executing a statement
#[derive(Debug, Clone, PartialEq)]
pub(super) enum Completion {
    Normal,
    Return(Value),
    Break,
    Continue,
}

/// Interpreter state
///
/// One interpreter is one script world: globals, resolver depths, and the
/// output sink all persist across `interpret` calls, which is what lets a
/// REPL or a long-lived embedding accumulate state line by line.
pub struct Interpreter {
    /// Outermost environment; natives and top-level names live here
    pub(crate) globals: Rc<RefCell<Environment>>,
    /// Environment of the code currently executing
    pub(crate) environment: Rc<RefCell<Environment>>,
    /// Resolver output: node identity to the number of frames to walk out
    locals: HashMap<NodeId, usize>,
    /// Where `print` writes; hosts and tests swap in their own sink
    output: Rc<RefCell<dyn Write>>,
    /// The built-in Error class; `throw` accepts only its descendants
    pub(crate) error_class: Option<Rc<Class>>,
}

impl Interpreter {
    /// Create an interpreter with the default natives installed
    pub fn new() -> Self {
        Self::with_registry(&NativeRegistry::new())
    }

    /// Create an interpreter seeded from a host-extended registry
    pub fn with_registry(registry: &NativeRegistry) -> Self {
        let globals = Rc::new(RefCell::new(Environment::new()));
        let mut interpreter = Self {
            globals: Rc::clone(&globals),
            environment: globals,
            locals: HashMap::new(),
            output: Rc::new(RefCell::new(std::io::stdout())),
            error_class: None,
        };
        registry.install(&mut interpreter);
        interpreter
    }

    /// Execute a resolved program
    ///
    /// Statements run in order; the first runtime error aborts the rest.
    /// Returns the value of the final statement when it is an expression
    /// statement (the REPL echoes this), `null` otherwise.
    pub fn interpret(&mut self, program: &Program) -> Result<Value, RuntimeError> {
        let mut last_value = Value::Null;

        for statement in &program.statements {
            last_value = match statement {
                Stmt::Expr(expr_stmt) => self.evaluate(&expr_stmt.expr)?,
                _ => {
                    self.execute(statement)?;
                    Value::Null
                }
            };
        }

        Ok(last_value)
    }

    /// Record a resolver depth for a resolvable expression node
    pub(crate) fn resolve(&mut self, id: NodeId, depth: usize) {
        self.locals.insert(id, depth);
    }

    /// Depth recorded for a node, if the resolver pinned it to a local
    pub(crate) fn resolved_depth(&self, id: NodeId) -> Option<usize> {
        self.locals.get(&id).copied()
    }

    /// Redirect `print` output
    pub fn set_output(&mut self, output: Rc<RefCell<dyn Write>>) {
        self.output = output;
    }

    /// Define or replace a global binding
    ///
    /// Used for native seeding and host registration, which may override
    /// an existing name; script `var` goes through the environment's
    /// define-once check instead.
    pub fn define_global(&mut self, name: &str, value: Value) {
        let mut globals = self.globals.borrow_mut();
        if !globals.define(name, value.clone()) {
            globals.assign(name, value);
        }
    }

    /// Execute statements in the given environment, restoring the previous
    /// one afterwards even when execution stops early
    pub(super) fn execute_block(
        &mut self,
        statements: &[Stmt],
        environment: Rc<RefCell<Environment>>,
    ) -> Result<Completion, RuntimeError> {
        let previous = Rc::clone(&self.environment);
        self.environment = environment;
        let result = self.execute_statements(statements);
        self.environment = previous;
        result
    }

    fn execute_statements(&mut self, statements: &[Stmt]) -> Result<Completion, RuntimeError> {
        for statement in statements {
            let completion = self.execute(statement)?;
            if completion != Completion::Normal {
                return Ok(completion);
            }
        }
        Ok(Completion::Normal)
    }

    /// A fresh environment enclosed by the current one
    pub(super) fn child_environment(&self) -> Rc<RefCell<Environment>> {
        Rc::new(RefCell::new(Environment::with_enclosing(Rc::clone(
            &self.environment,
        ))))
    }

    /// Read a variable through its resolved depth, or from globals
    pub(super) fn look_up_variable(
        &self,
        id: NodeId,
        name: &str,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let value = match self.locals.get(&id) {
            Some(&depth) => Environment::get_at(&self.environment, depth, name),
            None => self.globals.borrow().get(name),
        };
        value.ok_or_else(|| RuntimeError::UndefinedVariable {
            name: name.to_string(),
            span,
        })
    }

    /// Write a variable through its resolved depth, or into globals
    ///
    /// Assignment never creates a binding; a miss is an error.
    pub(super) fn assign_variable(
        &mut self,
        id: NodeId,
        name: &str,
        value: Value,
        span: Span,
    ) -> Result<(), RuntimeError> {
        let assigned = match self.locals.get(&id) {
            Some(&depth) => Environment::assign_at(&self.environment, depth, name, value),
            None => self.globals.borrow_mut().assign(name, value),
        };
        if assigned {
            Ok(())
        } else {
            Err(RuntimeError::UndefinedVariable {
                name: name.to_string(),
                span,
            })
        }
    }

    /// Invoke a callable value with an exact-arity check at the call site
    pub(crate) fn call_value(
        &mut self,
        callee: &Value,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let Some(callable) = callee.as_callable() else {
            return Err(RuntimeError::NotCallable { span });
        };
        if args.len() != callable.arity() {
            return Err(RuntimeError::ArityMismatch {
                expected: callable.arity(),
                got: args.len(),
                span,
            });
        }
        callable.call(self, args, span)
    }

    /// Write one line of `print` output; sink failures are not script errors
    pub(super) fn write_line(&self, value: &Value) {
        let _ = writeln!(self.output.borrow_mut(), "{}", value);
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Callable for Function {
    fn name(&self) -> &str {
        self.name()
    }

    fn arity(&self) -> usize {
        self.arity()
    }

    /// Call a user function: one fresh frame under the captured closure
    /// holds both parameters and body locals
    fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
        _span: Span,
    ) -> Result<Value, RuntimeError> {
        let mut environment = Environment::with_enclosing(Rc::clone(&self.closure));
        for (param, arg) in self.declaration.params.iter().zip(args) {
            environment.define(&param.name, arg);
        }

        let completion = interpreter.execute_block(
            &self.declaration.body.statements,
            Rc::new(RefCell::new(environment)),
        )?;

        // Initializers yield the bound instance no matter how they finish
        if self.is_initializer {
            return Ok(Environment::get_at(&self.closure, 0, "this").unwrap_or(Value::Null));
        }

        match completion {
            Completion::Return(value) => Ok(value),
            _ => Ok(Value::Null),
        }
    }
}

impl Callable for Rc<Class> {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        Class::arity(self)
    }

    /// Calling a class constructs an instance, then runs `init` bound to
    /// it when the class (or an ancestor) declares one
    fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        let instance = Value::Instance(Rc::new(Instance::new(Rc::clone(self))));

        if let Some(init) = self.find_method("init") {
            let bound = init.bind(&instance);
            if let Some(callable) = bound.as_callable() {
                callable.call(interpreter, args, span)?;
            }
        }

        Ok(instance)
    }
}

impl Callable for NativeFunction {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        _interpreter: &mut Interpreter,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        (self.func)(&args, span)
    }
}

impl Callable for BoundNative {
    fn name(&self) -> &str {
        &self.name
    }

    fn arity(&self) -> usize {
        self.arity
    }

    fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError> {
        (self.func)(interpreter, &self.receiver, &args, span)
    }
}
