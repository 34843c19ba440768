//! Lexical resolution pass
//!
//! Walks the parsed program between parsing and execution and pins every
//! resolvable expression (`Variable`, `Assign`, `this`, `super`) to the
//! scope depth where its binding lives. The interpreter later follows
//! exactly that many enclosing links instead of searching, so a closure
//! keeps seeing the binding it captured even when an enclosing body later
//! declares the same name. Names found in no surrounding scope are globals
//! and are left to runtime lookup.
//!
//! The pass also rejects programs that are structurally wrong before any
//! code runs: reads of a local inside its own initializer, duplicate
//! declarations in one scope, `return` outside a function, value returns
//! from `init`, `this`/`super` outside a class, self-inheritance, and
//! `break`/`continue` outside a loop. All violations are collected; a
//! single pass reports every one of them.

use crate::ast::*;
use crate::diagnostic::{error_codes, Diagnostic};
use crate::interpreter::Interpreter;
use std::collections::HashMap;

/// Progress of a binding within its scope
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BindingState {
    /// Name introduced, initializer still running
    Declared,
    /// Initializer finished, safe to read
    Defined,
}

/// The kind of function body enclosing the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FunctionType {
    None,
    Function,
    Method,
    Initializer,
}

/// The kind of class body enclosing the current node
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ClassType {
    None,
    Class,
    Subclass,
}

/// Resolver for scope analysis and static validation
pub struct Resolver<'a> {
    /// Receives the (node id, depth) pairs this pass computes
    interpreter: &'a mut Interpreter,
    /// Stack of local scopes; the global scope is deliberately absent
    scopes: Vec<HashMap<String, BindingState>>,
    current_function: FunctionType,
    current_class: ClassType,
    /// Number of enclosing loops (for break/continue validation)
    loop_depth: usize,
    /// Collected diagnostics
    diagnostics: Vec<Diagnostic>,
}

impl<'a> Resolver<'a> {
    /// Create a resolver feeding depths into `interpreter`
    pub fn new(interpreter: &'a mut Interpreter) -> Self {
        Self {
            interpreter,
            scopes: Vec::new(),
            current_function: FunctionType::None,
            current_class: ClassType::None,
            loop_depth: 0,
            diagnostics: Vec::new(),
        }
    }

    /// Resolve a program, reporting every violation found
    ///
    /// Any returned diagnostic means the program must not execute.
    pub fn resolve(&mut self, program: &Program) -> Vec<Diagnostic> {
        self.resolve_statements(&program.statements);
        std::mem::take(&mut self.diagnostics)
    }

    fn resolve_statements(&mut self, statements: &[Stmt]) {
        for statement in statements {
            self.resolve_statement(statement);
        }
    }

    fn resolve_statement(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::VarDecl(var) => self.resolve_var_decl(var),
            Stmt::FunctionDecl(func) => {
                // Define before the body so the function can recurse
                self.declare(&func.name);
                self.define(&func.name.name);
                self.resolve_function(func, FunctionType::Function);
            }
            Stmt::ClassDecl(class) => self.resolve_class_decl(class),
            Stmt::Print(print) => self.resolve_expression(&print.expr),
            Stmt::If(if_stmt) => {
                self.resolve_expression(&if_stmt.cond);
                self.resolve_block(&if_stmt.then_block);
                if let Some(else_branch) = &if_stmt.else_branch {
                    self.resolve_statement(else_branch);
                }
            }
            Stmt::While(while_stmt) => self.resolve_while(while_stmt),
            Stmt::Return(return_stmt) => self.resolve_return(return_stmt),
            Stmt::Break(span) => {
                if self.loop_depth == 0 {
                    self.diagnostics.push(
                        Diagnostic::error_with_code(
                            error_codes::INVALID_LOOP_CONTROL,
                            "Cannot use 'break' outside of a loop.",
                            *span,
                        )
                        .with_label("not inside a loop"),
                    );
                }
            }
            Stmt::Continue(span) => {
                if self.loop_depth == 0 {
                    self.diagnostics.push(
                        Diagnostic::error_with_code(
                            error_codes::INVALID_LOOP_CONTROL,
                            "Cannot use 'continue' outside of a loop.",
                            *span,
                        )
                        .with_label("not inside a loop"),
                    );
                }
            }
            Stmt::Throw(throw) => self.resolve_expression(&throw.value),
            Stmt::Try(try_stmt) => self.resolve_try(try_stmt),
            Stmt::Block(block) => self.resolve_block(block),
            Stmt::Expr(expr_stmt) => self.resolve_expression(&expr_stmt.expr),
        }
    }

    fn resolve_var_decl(&mut self, var: &VarDecl) {
        self.declare(&var.name);
        if let Some(init) = &var.init {
            self.resolve_expression(init);
        }
        self.define(&var.name.name);
    }

    /// Resolve a function or method body
    ///
    /// Parameters and body statements share one scope, matching the single
    /// frame the interpreter pushes per call.
    fn resolve_function(&mut self, decl: &FunctionDecl, kind: FunctionType) {
        let enclosing_function = self.current_function;
        let enclosing_loops = self.loop_depth;
        self.current_function = kind;
        self.loop_depth = 0;

        self.enter_scope();
        for param in &decl.params {
            self.declare(param);
            self.define(&param.name);
        }
        self.resolve_statements(&decl.body.statements);
        self.exit_scope();

        self.loop_depth = enclosing_loops;
        self.current_function = enclosing_function;
    }

    fn resolve_class_decl(&mut self, class: &ClassDecl) {
        let enclosing_class = self.current_class;
        self.current_class = ClassType::Class;

        self.declare(&class.name);
        self.define(&class.name.name);

        if let Some(superclass) = &class.superclass {
            if superclass.name.name == class.name.name {
                self.diagnostics.push(
                    Diagnostic::error_with_code(
                        error_codes::SELF_INHERITANCE,
                        "A class cannot inherit from itself.",
                        superclass.name.span,
                    )
                    .with_label("inherits from itself"),
                );
            }
            self.current_class = ClassType::Subclass;
            self.resolve_local(superclass.id, &superclass.name.name);

            // Methods of a subclass close over a frame holding `super`
            self.enter_scope();
            self.define("super");
        }

        // Every method closes over a frame holding `this`
        self.enter_scope();
        self.define("this");

        for method in &class.methods {
            let kind = if method.name.name == "init" {
                FunctionType::Initializer
            } else {
                FunctionType::Method
            };
            self.resolve_function(method, kind);
        }

        self.exit_scope();
        if class.superclass.is_some() {
            self.exit_scope();
        }

        self.current_class = enclosing_class;
    }

    fn resolve_while(&mut self, while_stmt: &WhileStmt) {
        self.resolve_expression(&while_stmt.cond);

        self.loop_depth += 1;
        self.resolve_block(&while_stmt.body);
        self.loop_depth -= 1;

        // The synthetic for-loop increment runs in the loop's own
        // environment, after the body frame is gone, so it must be
        // resolved with the body scope already closed.
        if let Some(increment) = &while_stmt.increment {
            self.resolve_statement(increment);
        }
    }

    fn resolve_return(&mut self, return_stmt: &ReturnStmt) {
        if self.current_function == FunctionType::None {
            self.diagnostics.push(
                Diagnostic::error_with_code(
                    error_codes::INVALID_RETURN,
                    "Cannot return from top-level code.",
                    return_stmt.span,
                )
                .with_label("return outside a function")
                .with_help("move this statement into a function body"),
            );
        }
        if let Some(value) = &return_stmt.value {
            if self.current_function == FunctionType::Initializer {
                self.diagnostics.push(
                    Diagnostic::error_with_code(
                        error_codes::INITIALIZER_RETURN,
                        "Cannot return a value from an initializer.",
                        return_stmt.span,
                    )
                    .with_label("initializer returns a value")
                    .with_help("'init' yields the new instance; use a bare 'return'"),
                );
            }
            self.resolve_expression(value);
        }
    }

    fn resolve_try(&mut self, try_stmt: &TryStmt) {
        self.resolve_block(&try_stmt.body);
        if let Some(catch) = &try_stmt.catch {
            // The binding and the handler body share one scope, matching
            // the single frame the interpreter pushes for the clause
            self.enter_scope();
            if let Some(binding) = &catch.binding {
                self.declare(binding);
                self.define(&binding.name);
            }
            self.resolve_statements(&catch.body.statements);
            self.exit_scope();
        }
        if let Some(finally) = &try_stmt.finally {
            self.resolve_block(finally);
        }
    }

    fn resolve_block(&mut self, block: &Block) {
        self.enter_scope();
        self.resolve_statements(&block.statements);
        self.exit_scope();
    }

    fn resolve_expression(&mut self, expr: &Expr) {
        match expr {
            Expr::Literal(_, _) => {}
            Expr::Variable(variable) => {
                let in_own_initializer = self
                    .scopes
                    .last()
                    .and_then(|scope| scope.get(&variable.name.name))
                    .is_some_and(|state| *state == BindingState::Declared);
                if in_own_initializer {
                    self.diagnostics.push(
                        Diagnostic::error_with_code(
                            error_codes::SELF_REFERENTIAL_INITIALIZER,
                            format!(
                                "Cannot read local variable '{}' in its own initializer.",
                                variable.name.name
                            ),
                            variable.name.span,
                        )
                        .with_label("read while still initializing")
                        .with_help(format!(
                            "rename this use or finish initializing '{}' first",
                            variable.name.name
                        )),
                    );
                }
                self.resolve_local(variable.id, &variable.name.name);
            }
            Expr::Assign(assign) => {
                self.resolve_expression(&assign.value);
                self.resolve_local(assign.id, &assign.name.name);
            }
            Expr::Unary(unary) => self.resolve_expression(&unary.expr),
            Expr::Binary(binary) => {
                self.resolve_expression(&binary.left);
                self.resolve_expression(&binary.right);
            }
            Expr::Call(call) => {
                self.resolve_expression(&call.callee);
                for arg in &call.args {
                    self.resolve_expression(arg);
                }
            }
            Expr::Index(index) => {
                self.resolve_expression(&index.target);
                self.resolve_expression(&index.index);
            }
            Expr::IndexSet(index_set) => {
                self.resolve_expression(&index_set.target);
                self.resolve_expression(&index_set.index);
                self.resolve_expression(&index_set.value);
            }
            // Property names are looked up dynamically; only the receiver
            // side of a get/set is resolvable
            Expr::Get(get) => self.resolve_expression(&get.object),
            Expr::Set(set) => {
                self.resolve_expression(&set.object);
                self.resolve_expression(&set.value);
            }
            Expr::ListLiteral(list) => {
                for element in &list.elements {
                    self.resolve_expression(element);
                }
            }
            Expr::Group(group) => self.resolve_expression(&group.expr),
            Expr::This(this) => {
                if self.current_class == ClassType::None {
                    self.diagnostics.push(
                        Diagnostic::error_with_code(
                            error_codes::INVALID_THIS,
                            "Cannot use 'this' outside of a class.",
                            this.span,
                        )
                        .with_label("not inside a class")
                        .with_help("move this code into a method"),
                    );
                }
                self.resolve_local(this.id, "this");
            }
            Expr::Super(super_expr) => {
                match self.current_class {
                    ClassType::None => {
                        self.diagnostics.push(
                            Diagnostic::error_with_code(
                                error_codes::INVALID_SUPER,
                                "Cannot use 'super' outside of a class.",
                                super_expr.span,
                            )
                            .with_label("not inside a class"),
                        );
                    }
                    ClassType::Class => {
                        self.diagnostics.push(
                            Diagnostic::error_with_code(
                                error_codes::INVALID_SUPER,
                                "Cannot use 'super' in a class with no superclass.",
                                super_expr.span,
                            )
                            .with_label("class has no superclass")
                            .with_help("declare the class with ': Superclass' to use 'super'"),
                        );
                    }
                    ClassType::Subclass => {}
                }
                self.resolve_local(super_expr.id, "super");
            }
        }
    }

    /// Record how many scopes out the nearest binding for `name` sits
    ///
    /// A miss means the name is global (or undefined, which only runtime
    /// lookup can tell, since natives are seeded there).
    fn resolve_local(&mut self, id: NodeId, name: &str) {
        for (i, scope) in self.scopes.iter().enumerate().rev() {
            if scope.contains_key(name) {
                self.interpreter.resolve(id, self.scopes.len() - 1 - i);
                return;
            }
        }
    }

    fn enter_scope(&mut self) {
        self.scopes.push(HashMap::new());
    }

    fn exit_scope(&mut self) {
        self.scopes.pop();
    }

    /// Introduce a name in the current scope without defining it
    ///
    /// No-op at global scope: top-level redefinition is the environment's
    /// define-once check, reported at runtime.
    fn declare(&mut self, name: &Identifier) {
        if self.scopes.is_empty() {
            return;
        }
        let already_declared = self
            .scopes
            .last()
            .is_some_and(|scope| scope.contains_key(&name.name));
        if already_declared {
            self.diagnostics.push(
                Diagnostic::error_with_code(
                    error_codes::DUPLICATE_DECLARATION,
                    format!("Variable '{}' is already declared in this scope.", name.name),
                    name.span,
                )
                .with_label("redeclaration")
                .with_help(format!("rename one of the '{}' declarations", name.name)),
            );
        }
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.name.clone(), BindingState::Declared);
        }
    }

    /// Mark a declared name as fully initialized
    fn define(&mut self, name: &str) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(name.to_string(), BindingState::Defined);
        }
    }
}
