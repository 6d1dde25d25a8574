#![allow(dead_code)]

use goblin::{Bytecode, Instructions, Object};

pub fn int(value: i64) -> Object {
    Object::Integer(value)
}

pub fn string(value: &str) -> Object {
    Object::string(value)
}

pub fn assemble(constants: Vec<Object>, instructions: Vec<Instructions>) -> Bytecode {
    Bytecode::new(instructions.into_iter().collect(), constants)
}

/// Run to completion, rendering any error as its message.
pub fn run(code: &Bytecode) -> Result<Option<Object>, String> {
    goblin::execute(code).map_err(|e| e.to_string())
}

/// Assemble and run a hand-written program.
///
/// Instructions are written as `Constant(0)`, `Add`, `Pop`, ... and expand to
/// `make(Opcode::Constant, &[0])` and so on. Exactly one of `result` (the
/// last popped value) or `error` (the error message) is expected.
#[macro_export]
macro_rules! test_case {
    (
        $name:ident,
        constants: [$($constant:expr),* $(,)?],
        program: [$($op:ident $(($($operand:expr),*))?),* $(,)?],
        $(disassembly: $disassembly:expr,)?
        result: $expected:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let code = $crate::cases::assemble(
                vec![$($constant),*],
                vec![$(goblin::make(goblin::Opcode::$op, &[$($($operand),*)?])),*],
            );
            $(
                pretty_assertions::assert_eq!(code.instructions.to_string(), $disassembly);
            )?
            pretty_assertions::assert_eq!($crate::cases::run(&code), Ok(Some($expected)));
        }
    };
    (
        $name:ident,
        constants: [$($constant:expr),* $(,)?],
        program: [$($op:ident $(($($operand:expr),*))?),* $(,)?],
        $(disassembly: $disassembly:expr,)?
        error: $message:expr $(,)?
    ) => {
        #[test]
        fn $name() {
            let code = $crate::cases::assemble(
                vec![$($constant),*],
                vec![$(goblin::make(goblin::Opcode::$op, &[$($($operand),*)?])),*],
            );
            $(
                pretty_assertions::assert_eq!(code.instructions.to_string(), $disassembly);
            )?
            pretty_assertions::assert_eq!($crate::cases::run(&code), Err($message.to_string()));
        }
    };
}
