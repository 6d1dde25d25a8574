use goblin_core::{code::CodeError, object::ObjectError, vm::VmError};
use thiserror::Error;

/// Any error surfaced by the bytecode core.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    #[error("bytecode error: {0}")]
    Code(#[from] CodeError),

    /// Never produced by a run; lets hosts build `Hash` constants with `?`.
    #[error("object error: {0}")]
    Object(#[from] ObjectError),

    #[error("runtime error: {0}")]
    Runtime(VmError),
}

impl From<VmError> for Error {
    // Decoding failures hit during a run are reported as bytecode errors.
    fn from(err: VmError) -> Self {
        match err {
            VmError::Decode(err) => Error::Code(err),
            err => Error::Runtime(err),
        }
    }
}

impl Error {
    /// True for stack exhaustion and an exhausted step budget.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(self, Error::Runtime(err) if err.is_resource_exceeded())
    }
}
