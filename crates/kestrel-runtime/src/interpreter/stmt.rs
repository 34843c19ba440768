//! Statement execution

use crate::ast::*;
use crate::environment::Environment;
use crate::interpreter::{Completion, Interpreter};
use crate::value::{Class, Function, Method, RuntimeError, Value};
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

impl Interpreter {
    /// Execute a statement
    pub(super) fn execute(&mut self, stmt: &Stmt) -> Result<Completion, RuntimeError> {
        match stmt {
            Stmt::VarDecl(var) => self.execute_var_decl(var),
            Stmt::FunctionDecl(func) => self.execute_function_decl(func),
            Stmt::ClassDecl(class) => self.execute_class_decl(class),
            Stmt::Print(print) => {
                let value = self.evaluate(&print.expr)?;
                self.write_line(&value);
                Ok(Completion::Normal)
            }
            Stmt::If(if_stmt) => self.execute_if(if_stmt),
            Stmt::While(while_stmt) => self.execute_while(while_stmt),
            Stmt::Return(return_stmt) => {
                let value = match &return_stmt.value {
                    Some(expr) => self.evaluate(expr)?,
                    None => Value::Null,
                };
                Ok(Completion::Return(value))
            }
            Stmt::Break(_) => Ok(Completion::Break),
            Stmt::Continue(_) => Ok(Completion::Continue),
            Stmt::Throw(throw) => self.execute_throw(throw),
            Stmt::Try(try_stmt) => self.execute_try(try_stmt),
            Stmt::Block(block) => {
                let environment = self.child_environment();
                self.execute_block(&block.statements, environment)
            }
            Stmt::Expr(expr_stmt) => {
                self.evaluate(&expr_stmt.expr)?;
                Ok(Completion::Normal)
            }
        }
    }

    /// Declare a variable in the current frame; missing initializer is null
    fn execute_var_decl(&mut self, var: &VarDecl) -> Result<Completion, RuntimeError> {
        let value = match &var.init {
            Some(init) => self.evaluate(init)?,
            None => Value::Null,
        };

        let defined = self.environment.borrow_mut().define(&var.name.name, value);
        if !defined {
            return Err(RuntimeError::AlreadyDefined {
                name: var.name.name.clone(),
                span: var.name.span,
            });
        }
        Ok(Completion::Normal)
    }

    /// Declare a function; the closure captures the defining environment
    fn execute_function_decl(&mut self, decl: &Rc<FunctionDecl>) -> Result<Completion, RuntimeError> {
        let function = Function::new(Rc::clone(decl), Rc::clone(&self.environment), false);

        let defined = self
            .environment
            .borrow_mut()
            .define(&decl.name.name, Value::Function(Rc::new(function)));
        if !defined {
            return Err(RuntimeError::AlreadyDefined {
                name: decl.name.name.clone(),
                span: decl.name.span,
            });
        }
        Ok(Completion::Normal)
    }

    /// Declare a class
    ///
    /// Two-phase: the name is defined (as null) before the superclass and
    /// methods are evaluated, then the finished class is assigned over the
    /// placeholder. Methods capture the current environment, with one
    /// extra frame holding `super` when a superclass exists.
    fn execute_class_decl(&mut self, class: &ClassDecl) -> Result<Completion, RuntimeError> {
        let defined = self
            .environment
            .borrow_mut()
            .define(&class.name.name, Value::Null);
        if !defined {
            return Err(RuntimeError::AlreadyDefined {
                name: class.name.name.clone(),
                span: class.name.span,
            });
        }

        let superclass = match &class.superclass {
            Some(expr) => {
                let value = self.look_up_variable(expr.id, &expr.name.name, expr.name.span)?;
                match value {
                    Value::Class(superclass) => Some(superclass),
                    _ => {
                        return Err(RuntimeError::BadSuperclass {
                            span: expr.name.span,
                        })
                    }
                }
            }
            None => None,
        };

        let mut method_env = Rc::clone(&self.environment);
        if let Some(superclass) = &superclass {
            let mut environment = Environment::with_enclosing(method_env);
            environment.define("super", Value::Class(Rc::clone(superclass)));
            method_env = Rc::new(RefCell::new(environment));
        }

        let mut methods = HashMap::new();
        for method in &class.methods {
            let is_initializer = method.name.name == "init";
            let function = Function::new(Rc::clone(method), Rc::clone(&method_env), is_initializer);
            methods.insert(method.name.name.clone(), Method::User(Rc::new(function)));
        }

        let class_value = Value::Class(Rc::new(Class {
            name: class.name.name.clone(),
            superclass,
            methods,
        }));
        self.environment
            .borrow_mut()
            .assign(&class.name.name, class_value);
        Ok(Completion::Normal)
    }

    fn execute_if(&mut self, if_stmt: &IfStmt) -> Result<Completion, RuntimeError> {
        if self.evaluate(&if_stmt.cond)?.is_truthy() {
            let environment = self.child_environment();
            self.execute_block(&if_stmt.then_block.statements, environment)
        } else if let Some(else_branch) = &if_stmt.else_branch {
            self.execute(else_branch)
        } else {
            Ok(Completion::Normal)
        }
    }

    /// Execute a while loop
    ///
    /// The synthetic `for` increment runs in the loop's own environment
    /// after each completed iteration, and again when the body ends in
    /// `continue`; `break` skips it and exits.
    fn execute_while(&mut self, while_stmt: &WhileStmt) -> Result<Completion, RuntimeError> {
        while self.evaluate(&while_stmt.cond)?.is_truthy() {
            let environment = self.child_environment();
            let completion = self.execute_block(&while_stmt.body.statements, environment)?;

            match completion {
                Completion::Break => return Ok(Completion::Normal),
                Completion::Return(value) => return Ok(Completion::Return(value)),
                Completion::Normal | Completion::Continue => {
                    if let Some(increment) = &while_stmt.increment {
                        self.execute(increment)?;
                    }
                }
            }
        }
        Ok(Completion::Normal)
    }

    /// Raise a script exception
    ///
    /// Only instances whose class chain reaches the built-in Error class
    /// may travel the throw channel.
    fn execute_throw(&mut self, throw: &ThrowStmt) -> Result<Completion, RuntimeError> {
        let value = self.evaluate(&throw.value)?;

        let is_error_instance = match (&value, &self.error_class) {
            (Value::Instance(instance), Some(error_class)) => {
                instance.class.has_ancestor(error_class)
            }
            _ => false,
        };
        if !is_error_instance {
            return Err(RuntimeError::InvalidThrow { span: throw.span });
        }

        Err(RuntimeError::Thrown {
            value,
            span: throw.span,
        })
    }

    /// Execute try/catch/finally
    ///
    /// `catch` intercepts script throws only, never host runtime errors.
    /// `finally` runs exactly once whatever the outcome; when it finishes
    /// non-normally, its outcome replaces the pending one.
    fn execute_try(&mut self, try_stmt: &TryStmt) -> Result<Completion, RuntimeError> {
        let environment = self.child_environment();
        let mut pending = self.execute_block(&try_stmt.body.statements, environment);

        if let Err(RuntimeError::Thrown { value, .. }) = &pending {
            if let Some(catch) = &try_stmt.catch {
                let thrown = value.clone();
                let mut environment = Environment::with_enclosing(Rc::clone(&self.environment));
                if let Some(binding) = &catch.binding {
                    environment.define(&binding.name, thrown);
                }
                pending = self.execute_block(
                    &catch.body.statements,
                    Rc::new(RefCell::new(environment)),
                );
            }
        }

        if let Some(finally) = &try_stmt.finally {
            let environment = self.child_environment();
            let outcome = self.execute_block(&finally.statements, environment);
            match outcome {
                Ok(Completion::Normal) => {}
                replacement => pending = replacement,
            }
        }

        pending
    }
}
