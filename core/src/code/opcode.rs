//! Goblin VM Opcodes - Variable-Width Format
//!
//! This module defines the opcodes of Goblin's stack-based virtual machine and
//! the definition table that describes how each one is laid out in a byte stream.
//!
//! # Instruction Format
//!
//! Every instruction starts with a one-byte opcode, followed by zero or more
//! big-endian unsigned operands whose widths are fixed per opcode:
//! ```text
//! ┌────────────┬──────────────────────┐
//! │   Opcode   │  Operands (0..N)     │
//! │  (8 bits)  │  widths per opcode   │
//! └────────────┴──────────────────────┘
//! ```
//!
//! Instructions are concatenated without padding or alignment.
//!
//! # Stack Discipline
//!
//! Stack effect notation: `[..., operand1, operand2] -> [..., result]`

use core::fmt;

use super::CodeError;

/// A single VM opcode.
///
/// The discriminant is the byte written to the instruction stream.
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Opcode {
    // ========================================================================
    // Stack & Constants (0x00)
    // ========================================================================
    /// Push constant from pool
    /// Operand: u16 index | Stack: [...] -> [..., constants[index]]
    Constant = 0x00,

    // ========================================================================
    // Arithmetic (0x01 - 0x05)
    // ========================================================================
    /// Stack: [..., a: Int, b: Int] -> [..., a+b: Int]
    Add = 0x01,

    /// Stack: [..., a: Int, b: Int] -> [..., a-b: Int]
    Sub = 0x02,

    /// Stack: [..., a: Int, b: Int] -> [..., a*b: Int]
    Mul = 0x03,

    /// Truncating division (can error)
    /// Stack: [..., a: Int, b: Int] -> [..., a/b: Int!]
    Div = 0x04,

    /// Power (can error)
    /// Stack: [..., a: Int, b: Int] -> [..., a**b: Int!]
    Exp = 0x05,

    /// Pop top value
    /// Stack: [..., a] -> [...]
    Pop = 0x06,

    // ========================================================================
    // Booleans (0x07 - 0x08)
    // ========================================================================
    /// Stack: [...] -> [..., true]
    True = 0x07,

    /// Stack: [...] -> [..., false]
    False = 0x08,

    // ========================================================================
    // Comparison (0x09 - 0x0C)
    // ========================================================================
    /// Stack: [..., a, b] -> [..., a==b: Bool]
    Equal = 0x09,

    /// Stack: [..., a, b] -> [..., a!=b: Bool]
    NotEqual = 0x0A,

    /// Only defined for integers.
    /// Stack: [..., a: Int, b: Int] -> [..., a>b: Bool]
    GreaterThan = 0x0B,

    /// Only defined for integers.
    /// Stack: [..., a: Int, b: Int] -> [..., a>=b: Bool]
    GreaterThanEqual = 0x0C,

    // ========================================================================
    // Unary (0x0D - 0x0E)
    // ========================================================================
    /// Integer negation
    /// Stack: [..., a: Int] -> [..., -a: Int]
    Minus = 0x0D,

    /// Logical not
    /// Stack: [..., a] -> [..., !a: Bool]
    Bang = 0x0E,
}

/// Mnemonic and operand layout of an opcode.
#[derive(Debug, PartialEq, Eq)]
pub struct Definition {
    pub name: &'static str,
    /// Width in bytes of each operand, in declaration order.
    pub operand_widths: &'static [usize],
}

impl Definition {
    /// Sum of all operand widths.
    pub fn operands_len(&self) -> usize {
        self.operand_widths.iter().sum()
    }
}

impl Opcode {
    pub const ALL: [Opcode; 15] = [
        Opcode::Constant,
        Opcode::Add,
        Opcode::Sub,
        Opcode::Mul,
        Opcode::Div,
        Opcode::Exp,
        Opcode::Pop,
        Opcode::True,
        Opcode::False,
        Opcode::Equal,
        Opcode::NotEqual,
        Opcode::GreaterThan,
        Opcode::GreaterThanEqual,
        Opcode::Minus,
        Opcode::Bang,
    ];

    /// The definition table.
    ///
    /// This match is the single source of truth for both encoding and decoding.
    pub fn definition(self) -> &'static Definition {
        const NO_OPERANDS: &[usize] = &[];
        const CONSTANT_INDEX: &[usize] = &[2];

        match self {
            Self::Constant => &Definition {
                name: "OpConstant",
                operand_widths: CONSTANT_INDEX,
            },
            Self::Add => &Definition {
                name: "OpAdd",
                operand_widths: NO_OPERANDS,
            },
            Self::Sub => &Definition {
                name: "OpSub",
                operand_widths: NO_OPERANDS,
            },
            Self::Mul => &Definition {
                name: "OpMul",
                operand_widths: NO_OPERANDS,
            },
            Self::Div => &Definition {
                name: "OpDiv",
                operand_widths: NO_OPERANDS,
            },
            Self::Exp => &Definition {
                name: "OpExp",
                operand_widths: NO_OPERANDS,
            },
            Self::Pop => &Definition {
                name: "OpPop",
                operand_widths: NO_OPERANDS,
            },
            Self::True => &Definition {
                name: "OpTrue",
                operand_widths: NO_OPERANDS,
            },
            Self::False => &Definition {
                name: "OpFalse",
                operand_widths: NO_OPERANDS,
            },
            Self::Equal => &Definition {
                name: "OpEqual",
                operand_widths: NO_OPERANDS,
            },
            Self::NotEqual => &Definition {
                name: "OpNotEqual",
                operand_widths: NO_OPERANDS,
            },
            Self::GreaterThan => &Definition {
                name: "OpGreaterThan",
                operand_widths: NO_OPERANDS,
            },
            Self::GreaterThanEqual => &Definition {
                name: "OpGreaterThanEqual",
                operand_widths: NO_OPERANDS,
            },
            Self::Minus => &Definition {
                name: "OpMinus",
                operand_widths: NO_OPERANDS,
            },
            Self::Bang => &Definition {
                name: "OpBang",
                operand_widths: NO_OPERANDS,
            },
        }
    }

    pub fn name(self) -> &'static str {
        self.definition().name
    }

    pub const fn as_byte(self) -> u8 {
        self as u8
    }

    /// Check if this opcode pops two integers and pushes an integer
    pub const fn is_arithmetic(self) -> bool {
        matches!(
            self,
            Self::Add | Self::Sub | Self::Mul | Self::Div | Self::Exp
        )
    }

    /// Check if this opcode pops two values and pushes a boolean
    pub const fn is_comparison(self) -> bool {
        matches!(
            self,
            Self::Equal | Self::NotEqual | Self::GreaterThan | Self::GreaterThanEqual
        )
    }

    /// Check if this instruction can fail for a reason other than stack exhaustion
    pub const fn can_error(self) -> bool {
        !matches!(self, Self::Pop | Self::True | Self::False | Self::Bang)
    }
}

impl TryFrom<u8> for Opcode {
    type Error = CodeError;

    fn try_from(byte: u8) -> Result<Self, Self::Error> {
        Ok(match byte {
            0x00 => Self::Constant,
            0x01 => Self::Add,
            0x02 => Self::Sub,
            0x03 => Self::Mul,
            0x04 => Self::Div,
            0x05 => Self::Exp,
            0x06 => Self::Pop,
            0x07 => Self::True,
            0x08 => Self::False,
            0x09 => Self::Equal,
            0x0A => Self::NotEqual,
            0x0B => Self::GreaterThan,
            0x0C => Self::GreaterThanEqual,
            0x0D => Self::Minus,
            0x0E => Self::Bang,
            other => return Err(CodeError::UndefinedOpcode(other)),
        })
    }
}

impl From<Opcode> for u8 {
    fn from(op: Opcode) -> u8 {
        op as u8
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Look up the definition of a raw opcode byte.
pub fn lookup(byte: u8) -> Result<&'static Definition, CodeError> {
    Opcode::try_from(byte).map(Opcode::definition)
}
