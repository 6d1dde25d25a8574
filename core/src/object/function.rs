//! Callable objects.

use alloc::rc::Rc;
use core::cell::RefCell;
use core::fmt;

use super::{Environment, Object};
use crate::{String, Vec};

/// A user-defined function closed over the environment it was created in.
///
/// Parameters and body are kept as source text; the evaluator that builds
/// functions owns the AST.
pub struct Function {
    pub parameters: Vec<String>,
    pub body: String,
    pub env: Rc<RefCell<Environment>>,
}

impl Function {
    pub fn new(
        parameters: Vec<String>,
        body: impl Into<String>,
        env: Rc<RefCell<Environment>>,
    ) -> Self {
        Self {
            parameters,
            body: body.into(),
            env,
        }
    }
}

// The captured environment may contain this very function, so it is skipped.
impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("parameters", &self.parameters)
            .field("body", &self.body)
            .finish_non_exhaustive()
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fn({}) {{\n{}\n}}", self.parameters.join(", "), self.body)
    }
}

/// Signature of a native function.
pub type BuiltinFn = fn(&[Object]) -> Object;

/// A native function exposed to programs under a fixed name.
#[derive(Clone, Copy)]
pub struct Builtin {
    pub name: &'static str,
    pub func: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, func: BuiltinFn) -> Self {
        Self { name, func }
    }

    pub fn call(&self, args: &[Object]) -> Object {
        (self.func)(args)
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin").field("name", &self.name).finish()
    }
}

impl fmt::Display for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("builtin function")
    }
}
