//! Instruction encoding, decoding and disassembly.

use core::fmt;
use core::ops::Deref;

use super::{CodeError, Definition, Opcode, lookup};
use crate::Vec;

/// A flat stream of encoded instructions.
///
/// Offsets into the stream are byte offsets. The `Display` impl renders one
/// `"%04d <mnemonic> <operands>"` line per instruction.
#[derive(Clone, Default, PartialEq, Eq, Hash)]
pub struct Instructions(Vec<u8>);

impl Instructions {
    pub fn new() -> Self {
        Self(Vec::new())
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn into_bytes(self) -> Vec<u8> {
        self.0
    }

    /// Append another encoded instruction (or stream) to this one.
    pub fn extend_from(&mut self, other: &Instructions) {
        self.0.extend_from_slice(&other.0);
    }

    /// Append a single instruction and return the offset it was written at.
    pub fn emit(&mut self, op: Opcode, operands: &[usize]) -> usize {
        let offset = self.0.len();
        self.extend_from(&make(op, operands));
        offset
    }
}

impl Deref for Instructions {
    type Target = [u8];

    fn deref(&self) -> &[u8] {
        &self.0
    }
}

impl From<Vec<u8>> for Instructions {
    fn from(bytes: Vec<u8>) -> Self {
        Self(bytes)
    }
}

impl From<&[u8]> for Instructions {
    fn from(bytes: &[u8]) -> Self {
        Self(bytes.to_vec())
    }
}

impl From<Instructions> for Vec<u8> {
    fn from(instructions: Instructions) -> Vec<u8> {
        instructions.0
    }
}

/// Concatenation.
impl FromIterator<Instructions> for Instructions {
    fn from_iter<I: IntoIterator<Item = Instructions>>(iter: I) -> Self {
        let mut out = Instructions::new();
        for instruction in iter {
            out.extend_from(&instruction);
        }
        out
    }
}

/// Encode a single instruction.
///
/// Each operand is written big-endian into the width declared by the opcode's
/// definition. Values wider than their slot are truncated to the low bytes;
/// missing operands are encoded as zero and extra operands are ignored.
pub fn make(op: Opcode, operands: &[usize]) -> Instructions {
    let def = op.definition();
    let mut bytes = Vec::with_capacity(1 + def.operands_len());
    bytes.push(op.as_byte());

    for (i, &width) in def.operand_widths.iter().enumerate() {
        let operand = operands.get(i).copied().unwrap_or(0);
        write_operand(&mut bytes, operand, width);
    }

    Instructions(bytes)
}

/// Encode a single instruction from a raw opcode byte.
///
/// Unlike [`make`], the opcode and the operand count are validated against the
/// definition table.
pub fn try_make(op: u8, operands: &[usize]) -> Result<Instructions, CodeError> {
    let opcode = Opcode::try_from(op)?;
    let def = opcode.definition();
    if operands.len() != def.operand_widths.len() {
        return Err(CodeError::OperandCount {
            opcode: def.name,
            expected: def.operand_widths.len(),
            given: operands.len(),
        });
    }
    Ok(make(opcode, operands))
}

fn write_operand(bytes: &mut Vec<u8>, operand: usize, width: usize) {
    debug_assert!(width <= 8, "operand width {} exceeds 8 bytes", width);
    let encoded = (operand as u64).to_be_bytes();
    bytes.extend_from_slice(&encoded[encoded.len() - width..]);
}

/// Decode the operands of one instruction.
///
/// `bytes` starts right after the opcode byte. Returns the operands in
/// declaration order together with the number of bytes consumed.
pub fn read_operands(def: &Definition, bytes: &[u8]) -> Result<(Vec<usize>, usize), CodeError> {
    let mut operands = Vec::with_capacity(def.operand_widths.len());
    let mut offset = 0;

    for &width in def.operand_widths {
        let slot = bytes
            .get(offset..offset + width)
            .ok_or(CodeError::TruncatedOperand {
                opcode: def.name,
                needed: def.operands_len(),
                available: bytes.len(),
            })?;
        operands.push(read_uint(slot));
        offset += width;
    }

    Ok((operands, offset))
}

/// Read a big-endian `u16` operand.
///
/// Callers slice the two operand bytes out of the stream first, so a short
/// stream is reported where it is sliced.
#[inline]
pub fn read_u16(bytes: [u8; 2]) -> u16 {
    u16::from_be_bytes(bytes)
}

fn read_uint(bytes: &[u8]) -> usize {
    bytes
        .iter()
        .fold(0usize, |acc, &byte| (acc << 8) | byte as usize)
}

impl fmt::Display for Instructions {
    /// Undefined opcodes render as an `ERROR:` line and disassembly resumes at
    /// the next byte. A truncated trailing instruction ends the listing.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut offset = 0;

        while offset < self.0.len() {
            let def = match lookup(self.0[offset]) {
                Ok(def) => def,
                Err(err) => {
                    writeln!(f, "{:04} ERROR: {}", offset, err)?;
                    offset += 1;
                    continue;
                }
            };

            match read_operands(def, &self.0[offset + 1..]) {
                Ok((operands, read)) => {
                    write!(f, "{:04} {}", offset, def.name)?;
                    for operand in &operands {
                        write!(f, " {}", operand)?;
                    }
                    writeln!(f)?;
                    offset += 1 + read;
                }
                Err(err) => {
                    writeln!(f, "{:04} ERROR: {}", offset, err)?;
                    break;
                }
            }
        }

        Ok(())
    }
}

impl fmt::Debug for Instructions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Instructions {{")?;
        for line in crate::format!("{}", self).lines() {
            writeln!(f, "    {}", line)?;
        }
        write!(f, "}}")
    }
}
