//! Goblin virtual machine.
//!
//! The VM consumes the compiler's [`Bytecode`] (instructions + constant pool)
//! and executes it against a fixed-capacity operand [`Stack`]:
//!
//! ```ignore
//! use goblin_core::code::{Opcode, make};
//! use goblin_core::object::Object;
//! use goblin_core::vm::{Bytecode, VM};
//!
//! let code = Bytecode::new(
//!     [make(Opcode::Constant, &[0]), make(Opcode::Minus, &[]), make(Opcode::Pop, &[])]
//!         .into_iter()
//!         .collect(),
//!     vec![Object::Integer(5)],
//! );
//! let mut vm = VM::new(&code);
//! vm.run()?;
//! assert_eq!(vm.last_popped_stack_elem(), Some(&Object::Integer(-5)));
//! ```

mod bytecode;
mod error;
mod operators;
mod runtime;
mod stack;

#[cfg(test)]
mod runtime_test;

pub use bytecode::Bytecode;
pub use error::VmError;
pub use runtime::{ExecutionLimits, STACK_SIZE, VM};
pub use stack::Stack;
