//! Goblin instruction set.
//!
//! This module owns the byte-level format shared by the compiler, the VM and
//! the disassembler:
//!
//! - [`Opcode`] and its [`Definition`] table (mnemonic + operand widths)
//! - [`make`] / [`try_make`] to encode a single instruction
//! - [`lookup`], [`read_operands`] and [`read_u16`] to decode
//! - [`Instructions`], whose `Display` impl is the disassembler

mod error;
mod instructions;
mod opcode;


pub use error::CodeError;
pub use instructions::{Instructions, make, read_operands, read_u16, try_make};
pub use opcode::{Definition, Opcode, lookup};
