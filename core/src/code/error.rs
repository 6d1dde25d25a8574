//! Encoding and decoding errors.

use thiserror::Error;

/// Errors raised while encoding, decoding or disassembling instructions.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodeError {
    /// The byte is not present in the definition table.
    #[error("opcode {0} undefined")]
    UndefinedOpcode(u8),

    /// `try_make` received a different number of operands than the opcode declares.
    #[error("operand len {given} does not match defined {expected} for {opcode}")]
    OperandCount {
        opcode: &'static str,
        expected: usize,
        given: usize,
    },

    /// The stream ends before all operands of an instruction.
    #[error("truncated operands for {opcode}: need {needed} bytes, {available} available")]
    TruncatedOperand {
        opcode: &'static str,
        needed: usize,
        available: usize,
    },
}
