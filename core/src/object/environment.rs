//! Lexical scopes captured by functions.

use alloc::rc::Rc;
use core::cell::RefCell;

use hashbrown::HashMap;

use super::Object;
use crate::String;

/// Name bindings for one scope, chained to the enclosing scope.
#[derive(Debug, Default)]
pub struct Environment {
    store: HashMap<String, Object>,
    outer: Option<Rc<RefCell<Environment>>>,
}

impl Environment {
    pub fn new() -> Self {
        Self::default()
    }

    /// A fresh scope whose lookups fall back to `outer`.
    pub fn enclosed(outer: Rc<RefCell<Environment>>) -> Self {
        Self {
            store: HashMap::new(),
            outer: Some(outer),
        }
    }

    /// Resolve `name`, innermost scope first.
    pub fn get(&self, name: &str) -> Option<Object> {
        match self.store.get(name) {
            Some(value) => Some(value.clone()),
            None => self.outer.as_ref()?.borrow().get(name),
        }
    }

    /// Bind `name` in this scope, returning the value it shadows here.
    pub fn set(&mut self, name: impl Into<String>, value: Object) -> Option<Object> {
        self.store.insert(name.into(), value)
    }

    pub fn outer(&self) -> Option<&Rc<RefCell<Environment>>> {
        self.outer.as_ref()
    }
}
