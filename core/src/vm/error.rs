//! Runtime errors raised by the VM.
//!
//! Every error aborts the current `run()`; there is no recovery inside a run
//! and no error is transient.

use thiserror::Error;

use crate::code::{CodeError, Opcode};
use crate::object::ObjectType;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VmError {
    /// Push with every slot of the operand stack live.
    #[error("stack overflow")]
    StackOverflow { capacity: usize },

    /// Pop from an empty operand stack.
    #[error("stack underflow")]
    StackUnderflow,

    /// Arithmetic on anything but two integers.
    #[error("unsupported types for binary operation: {left} {right}")]
    UnsupportedBinaryTypes {
        op: Opcode,
        left: ObjectType,
        right: ObjectType,
    },

    /// `OpMinus` on a non-integer.
    #[error("unsupported type for negation: {0}")]
    UnsupportedNegation(ObjectType),

    /// Opcode that is not defined for the given operand types.
    #[error("unknown operator: {op} ({left} {right})")]
    UnknownOperator {
        op: Opcode,
        left: ObjectType,
        right: ObjectType,
    },

    #[error("division by zero")]
    DivisionByZero,

    /// Result does not fit in an `i64`.
    #[error("integer overflow: {left} {op} {right}")]
    IntegerOverflow { op: Opcode, left: i64, right: i64 },

    /// `OpConstant` referenced past the end of the constant pool.
    #[error("constant index {index} out of range (pool size: {len})")]
    ConstantOutOfRange { index: usize, len: usize },

    #[error("step limit of {limit} instructions exceeded")]
    StepLimitExceeded { limit: u64 },

    #[error(transparent)]
    Decode(#[from] CodeError),
}

impl VmError {
    /// Resource limits, as opposed to errors caused by the program's values.
    pub fn is_resource_exceeded(&self) -> bool {
        matches!(
            self,
            Self::StackOverflow { .. } | Self::StepLimitExceeded { .. }
        )
    }
}
