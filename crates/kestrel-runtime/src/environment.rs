//! Lexical environments
//!
//! Environments form a parent-pointer chain: one frame per block, function
//! call, or method binding, with the global frame at the root. `get` and
//! `assign` search outward; `get_at`/`assign_at` skip the search entirely
//! using the scope distance the resolver computed.

use crate::value::Value;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

/// One scope frame: bindings plus an optional enclosing frame
#[derive(Default)]
pub struct Environment {
    enclosing: Option<Rc<RefCell<Environment>>>,
    values: HashMap<String, Value>,
}

impl Environment {
    /// Create a root frame with no enclosing scope
    pub fn new() -> Self {
        Self {
            enclosing: None,
            values: HashMap::new(),
        }
    }

    /// Create a frame nested inside `enclosing`
    pub fn with_enclosing(enclosing: Rc<RefCell<Environment>>) -> Self {
        Self {
            enclosing: Some(enclosing),
            values: HashMap::new(),
        }
    }

    /// Bind a new name in this frame
    ///
    /// Each frame binds a name at most once; returns false if `name` is
    /// already bound here (the caller turns that into an error).
    pub fn define(&mut self, name: &str, value: Value) -> bool {
        if self.values.contains_key(name) {
            return false;
        }
        self.values.insert(name.to_string(), value);
        true
    }

    /// Read a name, searching this frame then outward
    pub fn get(&self, name: &str) -> Option<Value> {
        if let Some(value) = self.values.get(name) {
            return Some(value.clone());
        }
        self.enclosing
            .as_ref()
            .and_then(|parent| parent.borrow().get(name))
    }

    /// Overwrite an existing binding, searching this frame then outward
    ///
    /// Returns false if no frame binds `name`.
    pub fn assign(&mut self, name: &str, value: Value) -> bool {
        if self.values.contains_key(name) {
            self.values.insert(name.to_string(), value);
            return true;
        }
        match &self.enclosing {
            Some(parent) => parent.borrow_mut().assign(name, value),
            None => false,
        }
    }

    /// Walk `distance` enclosing links from `env`
    pub fn ancestor(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
    ) -> Option<Rc<RefCell<Environment>>> {
        let mut current = Rc::clone(env);
        for _ in 0..distance {
            let next = current.borrow().enclosing.as_ref().map(Rc::clone)?;
            current = next;
        }
        Some(current)
    }

    /// Read a name from exactly the frame `distance` hops out, no search
    pub fn get_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
    ) -> Option<Value> {
        let target = Self::ancestor(env, distance)?;
        let value = target.borrow().values.get(name).cloned();
        value
    }

    /// Write a name in exactly the frame `distance` hops out, no search
    pub fn assign_at(
        env: &Rc<RefCell<Environment>>,
        distance: usize,
        name: &str,
        value: Value,
    ) -> bool {
        let Some(target) = Self::ancestor(env, distance) else {
            return false;
        };
        let mut frame = target.borrow_mut();
        if frame.values.contains_key(name) {
            frame.values.insert(name.to_string(), value);
            true
        } else {
            false
        }
    }
}
