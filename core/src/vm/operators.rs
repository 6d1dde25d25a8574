//! Integer operator implementations.

use crate::{code::Opcode, object::ObjectType, vm::VmError};

/// Evaluate an arithmetic opcode on two integers.
///
/// Uses wrapping arithmetic for `+ - *` to prevent panics on overflow.
/// Division truncates toward zero; division by zero returns an error.
/// Exponentiation is exact and reports overflow instead of wrapping.
pub(super) fn integer_arithmetic(op: Opcode, left: i64, right: i64) -> Result<i64, VmError> {
    match op {
        Opcode::Add => Ok(left.wrapping_add(right)),
        Opcode::Sub => Ok(left.wrapping_sub(right)),
        Opcode::Mul => Ok(left.wrapping_mul(right)),
        Opcode::Div => {
            if right == 0 {
                Err(VmError::DivisionByZero)
            } else {
                // Use wrapping_div to handle i64::MIN / -1 case
                Ok(left.wrapping_div(right))
            }
        }
        Opcode::Exp => integer_pow(left, right),
        _ => Err(unknown_integer_operator(op)),
    }
}

/// Evaluate a comparison opcode on two integers.
pub(super) fn integer_comparison(op: Opcode, left: i64, right: i64) -> Result<bool, VmError> {
    match op {
        Opcode::Equal => Ok(left == right),
        Opcode::NotEqual => Ok(left != right),
        Opcode::GreaterThan => Ok(left > right),
        Opcode::GreaterThanEqual => Ok(left >= right),
        _ => Err(unknown_integer_operator(op)),
    }
}

fn unknown_integer_operator(op: Opcode) -> VmError {
    VmError::UnknownOperator {
        op,
        left: ObjectType::Integer,
        right: ObjectType::Integer,
    }
}

/// `base ** exponent` by squaring.
///
/// Negative exponents give the truncated real result: `1` for base 1, `±1`
/// for base -1, `0` otherwise, and division by zero for base 0.
fn integer_pow(base: i64, exponent: i64) -> Result<i64, VmError> {
    let parity_sign = |exponent: i64| if exponent % 2 == 0 { 1 } else { -1 };

    if exponent < 0 {
        return match base {
            0 => Err(VmError::DivisionByZero),
            1 => Ok(1),
            -1 => Ok(parity_sign(exponent)),
            _ => Ok(0),
        };
    }

    let overflow = || VmError::IntegerOverflow {
        op: Opcode::Exp,
        left: base,
        right: exponent,
    };

    match u32::try_from(exponent) {
        Ok(exponent) => base.checked_pow(exponent).ok_or_else(overflow),
        // Only trivial bases survive an exponent this large.
        Err(_) => match base {
            0 | 1 => Ok(base),
            -1 => Ok(parity_sign(exponent)),
            _ => Err(overflow()),
        },
    }
}
