//! Native bridge
//!
//! Hosts extend Kestrel through explicit registration, never reflection:
//! a [`NativeRegistry`] collects named, fixed-arity functions and native
//! classes, and seeds the interpreter's global environment at
//! construction. Defaults go in first, so a host entry reusing a default
//! name deliberately replaces it.
//!
//! The defaults every interpreter carries:
//! - `clock()`: seconds since the Unix epoch, as a Number
//! - `Error`: the class whose `init(message)` stores `this.message`;
//!   `throw` accepts only instances descending from it, compared by class
//!   identity so re-binding the `Error` name cannot forge throwables

use crate::interpreter::Interpreter;
use crate::span::Span;
use crate::value::{Class, Method, NativeFunction, NativeMethod, RuntimeError, Value};
use std::collections::HashMap;
use std::rc::Rc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Registration table for host-provided globals
///
/// Build one, register entries, then hand it to
/// [`Interpreter::with_registry`]; one registry can seed any number of
/// interpreters.
pub struct NativeRegistry {
    functions: Vec<Rc<NativeFunction>>,
    classes: Vec<Rc<Class>>,
}

impl NativeRegistry {
    pub fn new() -> Self {
        Self {
            functions: Vec::new(),
            classes: Vec::new(),
        }
    }

    /// Register a host function under `name` with a fixed arity
    pub fn register_callable(
        &mut self,
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&[Value], Span) -> Result<Value, RuntimeError> + 'static,
    ) {
        self.functions.push(Rc::new(NativeFunction {
            name: name.into(),
            arity,
            func: Rc::new(func),
        }));
    }

    /// Register a host class from a native method table
    ///
    /// Scripts call the class like any other (`Vec2(1, 2)`); a method
    /// named `init` becomes its constructor.
    pub fn register_class(&mut self, name: impl Into<String>, methods: Vec<NativeMethod>) {
        let methods = methods
            .into_iter()
            .map(|method| (method.name.clone(), Method::Native(Rc::new(method))))
            .collect();
        self.classes.push(Rc::new(Class {
            name: name.into(),
            superclass: None,
            methods,
        }));
    }

    /// Seed an interpreter's globals: defaults first, host entries after
    pub(crate) fn install(&self, interpreter: &mut Interpreter) {
        install_defaults(interpreter);
        for function in &self.functions {
            interpreter.define_global(&function.name, Value::NativeFunction(Rc::clone(function)));
        }
        for class in &self.classes {
            interpreter.define_global(&class.name, Value::Class(Rc::clone(class)));
        }
    }
}

impl Default for NativeRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn install_defaults(interpreter: &mut Interpreter) {
    interpreter.define_global("clock", clock_native());

    let error_class = error_class();
    interpreter.error_class = Some(Rc::clone(&error_class));
    interpreter.define_global("Error", Value::Class(error_class));
}

fn clock_native() -> Value {
    Value::NativeFunction(Rc::new(NativeFunction {
        name: "clock".to_string(),
        arity: 0,
        func: Rc::new(|_, _| {
            let seconds = SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs_f64();
            Ok(Value::Number(seconds))
        }),
    }))
}

/// The built-in Error class
///
/// Its native `init` stores the single argument in the `message` field
/// unchanged; script subclasses reach it through `super.init(...)`.
fn error_class() -> Rc<Class> {
    let init = NativeMethod::new("init", 1, |_, receiver, args, _| {
        if let Value::Instance(instance) = receiver {
            instance.set_field("message", args.first().cloned().unwrap_or(Value::Null));
        }
        Ok(receiver.clone())
    });

    let mut methods = HashMap::new();
    methods.insert("init".to_string(), Method::Native(Rc::new(init)));
    Rc::new(Class {
        name: "Error".to_string(),
        superclass: None,
        methods,
    })
}
