//! Runtime value representation
//!
//! - Numbers, Bools, Null: immediate values (stack-allocated)
//! - Strings: heap-allocated, reference-counted (Rc<String>), immutable
//! - Lists: shared mutable sequences (List wrapping Rc<RefCell<Vec<Value>>>),
//!   reference semantics: mutation through one alias is visible to all
//! - Functions: AST declaration + captured environment + initializer flag
//! - Classes/Instances: single-inheritance method tables and mutable field maps
//! - NativeFunction/BoundNative: Rust closures callable from Kestrel

use crate::ast::FunctionDecl;
use crate::diagnostic::error_codes;
use crate::environment::Environment;
use crate::interpreter::Interpreter;
use crate::span::Span;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::rc::Rc;
use thiserror::Error;

/// Shared mutable list. Cheap to clone (refcount bump); all clones alias
/// the same elements.
#[derive(Clone)]
pub struct List(Rc<RefCell<Vec<Value>>>);

impl List {
    pub fn new(elements: Vec<Value>) -> Self {
        List(Rc::new(RefCell::new(elements)))
    }

    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    /// Get element by index, cloned out of the backing store
    pub fn get(&self, index: usize) -> Option<Value> {
        self.0.borrow().get(index).cloned()
    }

    /// Overwrite an existing slot; false if out of range
    pub fn set(&self, index: usize, value: Value) -> bool {
        let mut elements = self.0.borrow_mut();
        if index < elements.len() {
            elements[index] = value;
            true
        } else {
            false
        }
    }

    pub fn push(&self, value: Value) {
        self.0.borrow_mut().push(value);
    }

    pub fn pop(&self) -> Option<Value> {
        self.0.borrow_mut().pop()
    }

    /// Insert at `index`; false if `index > len`
    pub fn insert(&self, index: usize, value: Value) -> bool {
        let mut elements = self.0.borrow_mut();
        if index <= elements.len() {
            elements.insert(index, value);
            true
        } else {
            false
        }
    }

    /// Remove and return the element at `index`; None if out of range
    pub fn remove(&self, index: usize) -> Option<Value> {
        let mut elements = self.0.borrow_mut();
        if index < elements.len() {
            Some(elements.remove(index))
        } else {
            None
        }
    }

    pub fn reverse(&self) {
        self.0.borrow_mut().reverse();
    }

    /// Snapshot the elements
    ///
    /// Builtins that re-enter the interpreter (filter, customSort) work on
    /// a snapshot so a script callback touching the receiver list cannot
    /// observe a held borrow.
    pub fn to_vec(&self) -> Vec<Value> {
        self.0.borrow().clone()
    }

    /// Replace the entire contents
    pub fn replace(&self, elements: Vec<Value>) {
        *self.0.borrow_mut() = elements;
    }

    /// Index of the first element equal to `needle` (value equality for
    /// primitives, identity for reference types)
    pub fn index_of(&self, needle: &Value) -> Option<usize> {
        self.0.borrow().iter().position(|element| element == needle)
    }

    /// Index of the last element equal to `needle`
    pub fn rindex_of(&self, needle: &Value) -> Option<usize> {
        self.0.borrow().iter().rposition(|element| element == needle)
    }

    /// Identity comparison: do both handles alias the same storage?
    pub fn ptr_eq(a: &List, b: &List) -> bool {
        Rc::ptr_eq(&a.0, &b.0)
    }

    /// Validate an index value for element access: a non-negative integral
    /// number strictly below the length
    pub(crate) fn checked_index(&self, index: &Value, span: Span) -> Result<usize, RuntimeError> {
        let slot = self.integral_index(index, span)?;
        let len = self.len();
        if slot < 0.0 || slot >= len as f64 {
            return Err(RuntimeError::IndexOutOfRange {
                index: slot as i64,
                len,
                span,
            });
        }
        Ok(slot as usize)
    }

    /// Validate an index value for insertion: like element access, but one
    /// past the end is allowed
    pub(crate) fn checked_insert_index(
        &self,
        index: &Value,
        span: Span,
    ) -> Result<usize, RuntimeError> {
        let slot = self.integral_index(index, span)?;
        let len = self.len();
        if slot < 0.0 || slot > len as f64 {
            return Err(RuntimeError::IndexOutOfRange {
                index: slot as i64,
                len,
                span,
            });
        }
        Ok(slot as usize)
    }

    fn integral_index(&self, index: &Value, span: Span) -> Result<f64, RuntimeError> {
        let Value::Number(n) = index else {
            return Err(RuntimeError::InvalidIndex {
                msg: format!("List index must be a number, got {}.", index.type_name()),
                span,
            });
        };
        if n.fract() != 0.0 || !n.is_finite() {
            return Err(RuntimeError::InvalidIndex {
                msg: format!("List index must be an integer, got {}.", index),
                span,
            });
        }
        Ok(*n)
    }
}

impl PartialEq for List {
    fn eq(&self, other: &Self) -> bool {
        List::ptr_eq(self, other)
    }
}

/// A user-declared function or method with its captured environment
pub struct Function {
    pub declaration: Rc<FunctionDecl>,
    pub closure: Rc<RefCell<Environment>>,
    /// `init` methods always yield the bound instance
    pub is_initializer: bool,
}

impl Function {
    pub fn new(
        declaration: Rc<FunctionDecl>,
        closure: Rc<RefCell<Environment>>,
        is_initializer: bool,
    ) -> Self {
        Self {
            declaration,
            closure,
            is_initializer,
        }
    }

    pub fn name(&self) -> &str {
        &self.declaration.name.name
    }

    pub fn arity(&self) -> usize {
        self.declaration.params.len()
    }

    /// Produce a copy of this function whose closure binds `this`
    pub fn bind(&self, instance: Value) -> Function {
        let mut env = Environment::with_enclosing(Rc::clone(&self.closure));
        env.define("this", instance);
        Function {
            declaration: Rc::clone(&self.declaration),
            closure: Rc::new(RefCell::new(env)),
            is_initializer: self.is_initializer,
        }
    }
}

/// Native function type - Rust closure callable from Kestrel
///
/// Native functions receive a slice of Kestrel values plus the call site
/// span and return either a value or a runtime error.
pub type NativeFn = Rc<dyn Fn(&[Value], Span) -> Result<Value, RuntimeError>>;

/// Host-registered global function
pub struct NativeFunction {
    pub name: String,
    pub arity: usize,
    pub func: NativeFn,
}

/// Native method type - a Rust closure invoked with a bound receiver
///
/// Unlike `NativeFn`, these get the interpreter back so builtins like
/// `filter` and `customSort` can call script functions.
pub type BoundNativeFn =
    Rc<dyn Fn(&mut Interpreter, &Value, &[Value], Span) -> Result<Value, RuntimeError>>;

/// A native method as it sits in a class method table, not yet bound
pub struct NativeMethod {
    pub name: String,
    pub arity: usize,
    pub func: BoundNativeFn,
}

impl NativeMethod {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        func: impl Fn(&mut Interpreter, &Value, &[Value], Span) -> Result<Value, RuntimeError> + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            func: Rc::new(func),
        }
    }
}

/// A native method bound to its receiver (list builtins, native class methods)
pub struct BoundNative {
    pub name: String,
    pub arity: usize,
    pub receiver: Value,
    pub func: BoundNativeFn,
}

/// A method table entry: user-declared or host-provided
#[derive(Clone)]
pub enum Method {
    User(Rc<Function>),
    Native(Rc<NativeMethod>),
}

impl Method {
    pub fn arity(&self) -> usize {
        match self {
            Method::User(function) => function.arity(),
            Method::Native(native) => native.arity,
        }
    }

    /// Bind this method to a receiver, yielding a callable value
    pub fn bind(&self, receiver: &Value) -> Value {
        match self {
            Method::User(function) => Value::Function(Rc::new(function.bind(receiver.clone()))),
            Method::Native(native) => Value::BoundNative(Rc::new(BoundNative {
                name: native.name.clone(),
                arity: native.arity,
                receiver: receiver.clone(),
                func: Rc::clone(&native.func),
            })),
        }
    }
}

/// A class: name, optional superclass, and a method table
pub struct Class {
    pub name: String,
    pub superclass: Option<Rc<Class>>,
    pub methods: HashMap<String, Method>,
}

impl Class {
    /// Look up a method on this class, then up the superclass chain
    pub fn find_method(&self, name: &str) -> Option<Method> {
        if let Some(method) = self.methods.get(name) {
            return Some(method.clone());
        }
        self.superclass
            .as_ref()
            .and_then(|superclass| superclass.find_method(name))
    }

    /// Constructor arity: the `init` method's arity, or zero without one
    pub fn arity(&self) -> usize {
        self.find_method("init").map_or(0, |init| init.arity())
    }

    /// Does this class have `ancestor` anywhere on its superclass chain
    /// (including itself)? Identity comparison, not name comparison.
    pub fn has_ancestor(self: &Rc<Class>, ancestor: &Rc<Class>) -> bool {
        let mut current = Rc::clone(self);
        loop {
            if Rc::ptr_eq(&current, ancestor) {
                return true;
            }
            match &current.superclass {
                Some(superclass) => {
                    let next = Rc::clone(superclass);
                    current = next;
                }
                None => return false,
            }
        }
    }
}

/// An instance: class reference plus mutable field map
pub struct Instance {
    pub class: Rc<Class>,
    fields: RefCell<HashMap<String, Value>>,
}

impl Instance {
    pub fn new(class: Rc<Class>) -> Self {
        Self {
            class,
            fields: RefCell::new(HashMap::new()),
        }
    }

    pub fn get_field(&self, name: &str) -> Option<Value> {
        self.fields.borrow().get(name).cloned()
    }

    /// Set or create a field; neither fields nor methods are pre-declared
    pub fn set_field(&self, name: &str, value: Value) {
        self.fields.borrow_mut().insert(name.to_string(), value);
    }
}

/// Capability shared by every invocable value
///
/// Callers check `arity` before `call`; implementations may assume the
/// argument count already matches.
pub trait Callable {
    fn name(&self) -> &str;
    fn arity(&self) -> usize;
    fn call(
        &self,
        interpreter: &mut Interpreter,
        args: Vec<Value>,
        span: Span,
    ) -> Result<Value, RuntimeError>;
}

/// Runtime value type
#[derive(Clone)]
pub enum Value {
    /// Numeric value (IEEE 754 double-precision)
    Number(f64),
    /// String value (reference-counted, immutable)
    String(Rc<String>),
    /// Boolean value
    Bool(bool),
    /// Null value
    Null,
    /// List value (shared, mutable, reference semantics)
    List(List),
    /// User function or bound method
    Function(Rc<Function>),
    /// Host-registered global function
    NativeFunction(Rc<NativeFunction>),
    /// Native method bound to its receiver
    BoundNative(Rc<BoundNative>),
    /// Class value (also the constructor callable)
    Class(Rc<Class>),
    /// Instance of a class
    Instance(Rc<Instance>),
}

impl Value {
    /// Create a new string value
    pub fn string(s: impl Into<String>) -> Self {
        Value::String(Rc::new(s.into()))
    }

    /// Create a new list value
    pub fn list(elements: Vec<Value>) -> Self {
        Value::List(List::new(elements))
    }

    /// Get the type name of this value
    pub fn type_name(&self) -> &str {
        match self {
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Bool(_) => "bool",
            Value::Null => "null",
            Value::List(_) => "list",
            Value::Function(_) => "function",
            Value::NativeFunction(_) => "native function",
            Value::BoundNative(_) => "native function",
            Value::Class(_) => "class",
            Value::Instance(_) => "instance",
        }
    }

    /// Check if this value is truthy
    ///
    /// `null` and `false` are falsy, `0` and `""` are falsy, everything
    /// else is truthy.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Null => false,
            Value::Bool(b) => *b,
            Value::Number(n) => *n != 0.0,
            Value::String(s) => !s.is_empty(),
            _ => true,
        }
    }

    /// View this value as a callable, if it is one
    pub fn as_callable(&self) -> Option<&dyn Callable> {
        match self {
            Value::Function(function) => Some(function.as_ref()),
            Value::NativeFunction(native) => Some(native.as_ref()),
            Value::BoundNative(bound) => Some(bound.as_ref()),
            Value::Class(class) => Some(class),
            _ => None,
        }
    }
}

impl PartialEq for Value {
    /// Equality contract:
    ///
    /// **Value types** (content equality):
    /// - Number, String, Bool: primitive equality
    /// - Null: equal only to Null
    ///
    /// **Reference types** (identity equality; only the same allocation
    /// is equal):
    /// - List, Function, NativeFunction, BoundNative, Class, Instance
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Number(a), Value::Number(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Null, Value::Null) => true,
            (Value::List(a), Value::List(b)) => List::ptr_eq(a, b),
            (Value::Function(a), Value::Function(b)) => Rc::ptr_eq(a, b),
            (Value::NativeFunction(a), Value::NativeFunction(b)) => Rc::ptr_eq(a, b),
            (Value::BoundNative(a), Value::BoundNative(b)) => Rc::ptr_eq(a, b),
            (Value::Class(a), Value::Class(b)) => Rc::ptr_eq(a, b),
            (Value::Instance(a), Value::Instance(b)) => Rc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => {
                // No trailing .0 for whole numbers
                if n.fract() == 0.0 && n.is_finite() {
                    write!(f, "{:.0}", n)
                } else {
                    write!(f, "{}", n)
                }
            }
            Value::String(s) => write!(f, "{}", s.as_ref()),
            Value::Bool(b) => write!(f, "{}", b),
            Value::Null => write!(f, "null"),
            Value::List(list) => {
                let elements: Vec<String> =
                    list.to_vec().iter().map(|v| v.to_string()).collect();
                write!(f, "[{}]", elements.join(", "))
            }
            Value::Function(function) => write!(f, "<fn {}>", function.name()),
            Value::NativeFunction(native) => write!(f, "<native fn {}>", native.name),
            Value::BoundNative(bound) => write!(f, "<native fn {}>", bound.name),
            Value::Class(class) => write!(f, "<class {}>", class.name),
            Value::Instance(instance) => write!(f, "<{} instance>", instance.class.name),
        }
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Number(n) => write!(f, "Number({})", n),
            Value::String(s) => write!(f, "String({:?})", s),
            Value::Bool(b) => write!(f, "Bool({})", b),
            Value::Null => write!(f, "Null"),
            Value::List(list) => write!(f, "List({:?})", list.to_vec()),
            Value::Function(function) => write!(f, "Function({})", function.name()),
            Value::NativeFunction(native) => write!(f, "NativeFunction({})", native.name),
            Value::BoundNative(bound) => write!(f, "BoundNative({})", bound.name),
            Value::Class(class) => write!(f, "Class({})", class.name),
            Value::Instance(instance) => write!(f, "Instance({})", instance.class.name),
        }
    }
}

/// Extract the message to report for a thrown value
///
/// An `Error` instance carries its text in the `message` field, rendered
/// through Display whatever its type ("null" when the field was never
/// set); a non-instance falls back to its own display form.
pub fn thrown_message(value: &Value) -> String {
    if let Value::Instance(instance) = value {
        return instance.get_field("message").unwrap_or(Value::Null).to_string();
    }
    value.to_string()
}

/// Runtime error type with source span information
#[derive(Debug, Error, Clone)]
pub enum RuntimeError {
    /// Type error (operand or argument of the wrong type)
    #[error("{msg}")]
    TypeError { msg: String, span: Span },
    /// Undefined variable
    #[error("Undefined variable '{name}'.")]
    UndefinedVariable { name: String, span: Span },
    /// Undefined property on an instance or list
    #[error("Undefined property '{name}'.")]
    UndefinedProperty { name: String, span: Span },
    /// Division or modulo by zero
    #[error("Division by zero.")]
    DivideByZero { span: Span },
    /// List index outside the valid range
    #[error("Index {index} out of range for list of length {len}.")]
    IndexOutOfRange { index: i64, len: usize, span: Span },
    /// List index that is not a non-negative integer
    #[error("{msg}")]
    InvalidIndex { msg: String, span: Span },
    /// Call of a non-callable value
    #[error("Can only call functions and classes.")]
    NotCallable { span: Span },
    /// Wrong number of call arguments
    #[error("Expected {expected} arguments but got {got}.")]
    ArityMismatch {
        expected: usize,
        got: usize,
        span: Span,
    },
    /// Redefinition within one scope
    #[error("Variable '{name}' is already defined in this scope.")]
    AlreadyDefined { name: String, span: Span },
    /// `throw` of a non-Error value
    #[error("Can only throw Error instances.")]
    InvalidThrow { span: Span },
    /// A script-level exception in flight (reported only if never caught)
    #[error("Uncaught exception: {}", thrown_message(.value))]
    Thrown { value: Value, span: Span },
    /// Operation on an empty list
    #[error("{msg}")]
    EmptyList { msg: String, span: Span },
    /// `class X : Y` where Y is not a class
    #[error("Superclass must be a class.")]
    BadSuperclass { span: Span },
    /// `sort()` on a list that is not all numbers or all strings
    #[error("{msg}")]
    UnorderableList { msg: String, span: Span },
}

impl RuntimeError {
    /// Get the source span for this error
    pub fn span(&self) -> Span {
        match self {
            RuntimeError::TypeError { span, .. } => *span,
            RuntimeError::UndefinedVariable { span, .. } => *span,
            RuntimeError::UndefinedProperty { span, .. } => *span,
            RuntimeError::DivideByZero { span } => *span,
            RuntimeError::IndexOutOfRange { span, .. } => *span,
            RuntimeError::InvalidIndex { span, .. } => *span,
            RuntimeError::NotCallable { span } => *span,
            RuntimeError::ArityMismatch { span, .. } => *span,
            RuntimeError::AlreadyDefined { span, .. } => *span,
            RuntimeError::InvalidThrow { span } => *span,
            RuntimeError::Thrown { span, .. } => *span,
            RuntimeError::EmptyList { span, .. } => *span,
            RuntimeError::BadSuperclass { span } => *span,
            RuntimeError::UnorderableList { span, .. } => *span,
        }
    }

    /// Get the diagnostic code for this error
    pub fn code(&self) -> &'static str {
        match self {
            RuntimeError::TypeError { .. } => error_codes::TYPE_MISMATCH,
            RuntimeError::UndefinedVariable { .. } => error_codes::UNDEFINED_VARIABLE,
            RuntimeError::UndefinedProperty { .. } => error_codes::UNDEFINED_PROPERTY,
            RuntimeError::DivideByZero { .. } => error_codes::DIVIDE_BY_ZERO,
            RuntimeError::IndexOutOfRange { .. } => error_codes::INDEX_OUT_OF_RANGE,
            RuntimeError::InvalidIndex { .. } => error_codes::INVALID_INDEX,
            RuntimeError::NotCallable { .. } => error_codes::NOT_CALLABLE,
            RuntimeError::ArityMismatch { .. } => error_codes::ARITY_MISMATCH,
            RuntimeError::AlreadyDefined { .. } => error_codes::ALREADY_DEFINED,
            RuntimeError::InvalidThrow { .. } => error_codes::INVALID_THROW,
            RuntimeError::Thrown { .. } => error_codes::UNCAUGHT_EXCEPTION,
            RuntimeError::EmptyList { .. } => error_codes::EMPTY_LIST,
            RuntimeError::BadSuperclass { .. } => error_codes::BAD_SUPERCLASS,
            RuntimeError::UnorderableList { .. } => error_codes::UNORDERABLE_LIST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_creation() {
        let val = Value::Number(42.0);
        assert_eq!(val.to_string(), "42");
    }

    #[test]
    fn test_string_value() {
        let val = Value::string("hello");
        assert_eq!(val.to_string(), "hello");
    }

    #[test]
    fn test_type_names() {
        assert_eq!(Value::Number(42.0).type_name(), "number");
        assert_eq!(Value::string("hi").type_name(), "string");
        assert_eq!(Value::Bool(true).type_name(), "bool");
        assert_eq!(Value::Null.type_name(), "null");
        assert_eq!(Value::list(vec![]).type_name(), "list");
    }

    #[test]
    fn test_is_truthy() {
        assert!(Value::Bool(true).is_truthy());
        assert!(!Value::Bool(false).is_truthy());
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Number(0.0).is_truthy());
        assert!(Value::Number(1.0).is_truthy());
        assert!(Value::Number(-0.5).is_truthy());
        assert!(!Value::string("").is_truthy());
        assert!(Value::string("x").is_truthy());
        assert!(Value::list(vec![]).is_truthy());
    }

    #[test]
    fn test_to_string_number() {
        assert_eq!(Value::Number(42.0).to_string(), "42");
        assert_eq!(Value::Number(2.5).to_string(), "2.5");
        assert_eq!(Value::Number(-5.0).to_string(), "-5");
    }

    #[test]
    fn test_to_string_list() {
        let list = Value::list(vec![
            Value::Number(1.0),
            Value::string("two"),
            Value::Bool(true),
        ]);
        assert_eq!(list.to_string(), "[1, two, true]");
    }

    #[test]
    fn test_to_string_nested_list() {
        let inner = Value::list(vec![Value::Number(1.0), Value::Number(2.0)]);
        let outer = Value::list(vec![inner, Value::Number(3.0)]);
        assert_eq!(outer.to_string(), "[[1, 2], 3]");
    }

    #[test]
    fn test_equality_primitives() {
        assert_eq!(Value::Number(42.0), Value::Number(42.0));
        assert_ne!(Value::Number(42.0), Value::Number(43.0));
        assert_eq!(Value::string("hello"), Value::string("hello"));
        assert_eq!(Value::Null, Value::Null);
        assert_ne!(Value::Number(1.0), Value::Bool(true));
        assert_ne!(Value::Null, Value::Number(0.0));
    }

    #[test]
    fn test_list_equality_is_identity() {
        let a = Value::list(vec![Value::Number(1.0)]);
        let b = a.clone();
        let c = Value::list(vec![Value::Number(1.0)]);

        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_list_aliasing() {
        let a = List::new(vec![Value::Number(1.0)]);
        let b = a.clone();
        b.push(Value::Number(2.0));

        assert_eq!(a.len(), 2);
        assert_eq!(a.get(1), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_list_insert_bounds() {
        let list = List::new(vec![Value::Number(1.0)]);
        assert!(list.insert(1, Value::Number(2.0)));
        assert!(!list.insert(5, Value::Number(3.0)));
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn test_list_remove_bounds() {
        let list = List::new(vec![Value::Number(1.0)]);
        assert_eq!(list.remove(3), None);
        assert_eq!(list.remove(0), Some(Value::Number(1.0)));
        assert!(list.is_empty());
    }

    #[test]
    fn test_list_index_of() {
        let list = List::new(vec![
            Value::Number(1.0),
            Value::Number(2.0),
            Value::Number(1.0),
        ]);
        assert_eq!(list.index_of(&Value::Number(1.0)), Some(0));
        assert_eq!(list.rindex_of(&Value::Number(1.0)), Some(2));
        assert_eq!(list.index_of(&Value::Number(9.0)), None);

        // Reference types match by identity, not contents
        let inner = Value::list(vec![Value::Number(1.0)]);
        let list = List::new(vec![inner.clone()]);
        assert_eq!(list.index_of(&inner), Some(0));
        assert_eq!(list.index_of(&Value::list(vec![Value::Number(1.0)])), None);
    }

    #[test]
    fn test_checked_index_validation() {
        let list = List::new(vec![Value::Number(1.0), Value::Number(2.0)]);
        let span = Span::dummy();

        assert_eq!(list.checked_index(&Value::Number(1.0), span).ok(), Some(1));

        let err = list.checked_index(&Value::Number(2.0), span).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Index 2 out of range for list of length 2."
        );

        let err = list.checked_index(&Value::Number(-1.0), span).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Index -1 out of range for list of length 2."
        );

        let err = list.checked_index(&Value::Number(0.5), span).unwrap_err();
        assert!(err.to_string().contains("must be an integer"));

        let err = list.checked_index(&Value::string("0"), span).unwrap_err();
        assert!(err.to_string().contains("must be a number"));
    }

    #[test]
    fn test_checked_insert_index_allows_end() {
        let list = List::new(vec![Value::Number(1.0)]);
        let span = Span::dummy();

        assert_eq!(
            list.checked_insert_index(&Value::Number(1.0), span).ok(),
            Some(1)
        );
        assert!(list.checked_insert_index(&Value::Number(2.0), span).is_err());
    }

    #[test]
    fn test_instance_fields() {
        let class = Rc::new(Class {
            name: "Point".to_string(),
            superclass: None,
            methods: HashMap::new(),
        });
        let instance = Instance::new(Rc::clone(&class));

        assert_eq!(instance.get_field("x"), None);
        instance.set_field("x", Value::Number(3.0));
        assert_eq!(instance.get_field("x"), Some(Value::Number(3.0)));
        instance.set_field("x", Value::Number(4.0));
        assert_eq!(instance.get_field("x"), Some(Value::Number(4.0)));
    }

    #[test]
    fn test_find_method_walks_superclass_chain() {
        let base = Rc::new(Class {
            name: "Base".to_string(),
            superclass: None,
            methods: HashMap::new(),
        });
        let derived = Rc::new(Class {
            name: "Derived".to_string(),
            superclass: Some(Rc::clone(&base)),
            methods: HashMap::new(),
        });

        assert!(derived.find_method("missing").is_none());
        assert!(derived.has_ancestor(&base));
        assert!(derived.has_ancestor(&derived));
        assert!(!base.has_ancestor(&derived));
    }

    #[test]
    fn test_class_arity_without_init() {
        let class = Class {
            name: "Empty".to_string(),
            superclass: None,
            methods: HashMap::new(),
        };
        assert_eq!(class.arity(), 0);
    }

    #[test]
    fn test_class_display() {
        let class = Rc::new(Class {
            name: "Shape".to_string(),
            superclass: None,
            methods: HashMap::new(),
        });
        assert_eq!(Value::Class(Rc::clone(&class)).to_string(), "<class Shape>");

        let instance = Rc::new(Instance::new(class));
        assert_eq!(Value::Instance(instance).to_string(), "<Shape instance>");
    }

    #[test]
    fn test_thrown_message_reads_message_field() {
        let class = Rc::new(Class {
            name: "Error".to_string(),
            superclass: None,
            methods: HashMap::new(),
        });
        let instance = Rc::new(Instance::new(Rc::clone(&class)));
        instance.set_field("message", Value::string("boom"));

        let value = Value::Instance(instance);
        assert_eq!(thrown_message(&value), "boom");
        assert_eq!(thrown_message(&Value::Number(3.0)), "3");

        // Field never set (init overridden without storing it)
        let bare = Rc::new(Instance::new(class));
        assert_eq!(thrown_message(&Value::Instance(bare)), "null");
    }

    #[test]
    fn test_runtime_error_messages() {
        let err = RuntimeError::ArityMismatch {
            expected: 2,
            got: 3,
            span: Span::dummy(),
        };
        assert_eq!(err.to_string(), "Expected 2 arguments but got 3.");

        let err = RuntimeError::UndefinedVariable {
            name: "x".to_string(),
            span: Span::dummy(),
        };
        assert_eq!(err.to_string(), "Undefined variable 'x'.");

        let err = RuntimeError::NotCallable { span: Span::dummy() };
        assert_eq!(err.to_string(), "Can only call functions and classes.");
    }

    #[test]
    fn test_runtime_error_codes() {
        let err = RuntimeError::DivideByZero { span: Span::new(3, 4) };
        assert_eq!(err.code(), error_codes::DIVIDE_BY_ZERO);
        assert_eq!(err.span(), Span::new(3, 4));
    }
}
