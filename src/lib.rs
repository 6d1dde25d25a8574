//! Goblin - bytecode core for the Goblin expression language
//!
//! # Overview
//!
//! This crate bundles the three layers that sit below the Goblin compiler:
//!
//! - [`code`]: the instruction set, with encoding (`make`), decoding
//!   (`read_operands`) and a human-readable disassembler.
//! - [`object`]: the runtime value model, including hash keys for values that
//!   may be used as hash map keys.
//! - [`vm`]: a stack machine that executes compiled [`Bytecode`].
//!
//! # Quick Start
//!
//! ```ignore
//! use goblin::{Bytecode, Object, Opcode, make};
//!
//! // 5 * 2 + 10
//! let code = Bytecode::new(
//!     [
//!         make(Opcode::Constant, &[0]),
//!         make(Opcode::Constant, &[1]),
//!         make(Opcode::Mul, &[]),
//!         make(Opcode::Constant, &[2]),
//!         make(Opcode::Add, &[]),
//!         make(Opcode::Pop, &[]),
//!     ]
//!     .into_iter()
//!     .collect(),
//!     vec![Object::Integer(5), Object::Integer(2), Object::Integer(10)],
//! );
//!
//! assert_eq!(goblin::execute(&code)?, Some(Object::Integer(20)));
//! ```
//!
//! # Limits
//!
//! The operand stack holds [`STACK_SIZE`] values by default. Hosts running
//! untrusted bytecode can shrink it and add an instruction budget through
//! [`ExecutionLimits`] and [`execute_with_limits`].

mod error;

pub use error::Error;

// Re-export the core modules
pub use goblin_core::{code, object, vm};

// Re-export commonly used types
pub use goblin_core::code::{Instructions, Opcode, make};
pub use goblin_core::object::{HashKey, Object, ObjectType};
pub use goblin_core::vm::{Bytecode, ExecutionLimits, STACK_SIZE, VM};

/// Run `code` with default limits and return the value of the last
/// expression statement, if any.
pub fn execute(code: &Bytecode) -> Result<Option<Object>, Error> {
    execute_with_limits(code, ExecutionLimits::default())
}

/// Like [`execute`], with caller-provided limits.
pub fn execute_with_limits(
    code: &Bytecode,
    limits: ExecutionLimits,
) -> Result<Option<Object>, Error> {
    let mut vm = VM::with_limits(code, limits);
    vm.run()?;
    Ok(vm.last_popped_stack_elem().cloned())
}
