//! Tests for the VM dispatch loop.
//!
//! Programs are assembled by hand; each helper mirrors what the compiler
//! would emit for the expression named in the test.

use pretty_assertions::assert_eq;

use crate::{
    ToString, Vec,
    code::{Instructions, Opcode, make},
    object::{FALSE, NULL, Object, TRUE},
    test_utils::init_test_logging,
    vec,
    vm::{Bytecode, ExecutionLimits, STACK_SIZE, VM, VmError},
};

fn constant(index: usize) -> Instructions {
    make(Opcode::Constant, &[index])
}

fn op(op: Opcode) -> Instructions {
    make(op, &[])
}

fn bytecode(constants: Vec<Object>, instructions: Vec<Instructions>) -> Bytecode {
    Bytecode::new(instructions.into_iter().collect(), constants)
}

fn ints(values: &[i64]) -> Vec<Object> {
    values.iter().map(|&value| Object::Integer(value)).collect()
}

/// Run and return the value of the last expression statement.
fn run(code: &Bytecode) -> Object {
    let mut vm = VM::new(code);
    vm.run().unwrap();
    vm.last_popped_stack_elem().cloned().unwrap()
}

fn run_err(code: &Bytecode) -> VmError {
    VM::new(code).run().unwrap_err()
}

#[test]
fn test_integer_constant() {
    init_test_logging();
    let code = bytecode(ints(&[1]), vec![constant(0), op(Opcode::Pop)]);
    assert_eq!(run(&code), Object::Integer(1));
}

#[test]
fn test_integer_arithmetic() {
    // 1 + 2
    let code = bytecode(
        ints(&[1, 2]),
        vec![constant(0), constant(1), op(Opcode::Add), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), Object::Integer(3));

    // 5 * 2 + 10
    let code = bytecode(
        ints(&[5, 2, 10]),
        vec![
            constant(0),
            constant(1),
            op(Opcode::Mul),
            constant(2),
            op(Opcode::Add),
            op(Opcode::Pop),
        ],
    );
    assert_eq!(run(&code), Object::Integer(20));

    // 2 * (5 + 10)
    let code = bytecode(
        ints(&[2, 5, 10]),
        vec![
            constant(0),
            constant(1),
            constant(2),
            op(Opcode::Add),
            op(Opcode::Mul),
            op(Opcode::Pop),
        ],
    );
    assert_eq!(run(&code), Object::Integer(30));

    // 5 ** 2
    let code = bytecode(
        ints(&[5, 2]),
        vec![constant(0), constant(1), op(Opcode::Exp), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), Object::Integer(25));

    // 50 / 2 * 2 + 10 - 5
    let code = bytecode(
        ints(&[50, 2, 2, 10, 5]),
        vec![
            constant(0),
            constant(1),
            op(Opcode::Div),
            constant(2),
            op(Opcode::Mul),
            constant(3),
            op(Opcode::Add),
            constant(4),
            op(Opcode::Sub),
            op(Opcode::Pop),
        ],
    );
    assert_eq!(run(&code), Object::Integer(55));
}

#[test]
fn test_division_truncates_toward_zero() {
    let code = bytecode(
        ints(&[-7, 2]),
        vec![constant(0), constant(1), op(Opcode::Div), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), Object::Integer(-3));
}

#[test]
fn test_division_by_zero() {
    let code = bytecode(
        ints(&[1, 0]),
        vec![constant(0), constant(1), op(Opcode::Div)],
    );
    assert_eq!(run_err(&code), VmError::DivisionByZero);
}

#[test]
fn test_exponent_overflow() {
    let code = bytecode(
        ints(&[10, 19]),
        vec![constant(0), constant(1), op(Opcode::Exp)],
    );
    assert_eq!(run_err(&code).to_string(), "integer overflow: 10 OpExp 19");
}

#[test]
fn test_minus() {
    // -10
    let code = bytecode(ints(&[10]), vec![constant(0), op(Opcode::Minus), op(Opcode::Pop)]);
    assert_eq!(run(&code), Object::Integer(-10));

    // -(-5 + 2)
    let code = bytecode(
        ints(&[5, 2]),
        vec![
            constant(0),
            op(Opcode::Minus),
            constant(1),
            op(Opcode::Add),
            op(Opcode::Minus),
            op(Opcode::Pop),
        ],
    );
    assert_eq!(run(&code), Object::Integer(3));
}

#[test]
fn test_minus_type_error() {
    let code = bytecode(vec![], vec![op(Opcode::True), op(Opcode::Minus)]);
    let err = run_err(&code);
    assert_eq!(err, VmError::UnsupportedNegation(crate::object::ObjectType::Boolean));
    assert_eq!(err.to_string(), "unsupported type for negation: BOOLEAN");
}

#[test]
fn test_boolean_literals() {
    let code = bytecode(vec![], vec![op(Opcode::True), op(Opcode::Pop)]);
    assert_eq!(run(&code), TRUE);

    let code = bytecode(vec![], vec![op(Opcode::False), op(Opcode::Pop)]);
    assert_eq!(run(&code), FALSE);
}

#[test]
fn test_integer_comparisons() {
    let cases = [
        // (left, right, op, expected)
        (1, 2, Opcode::GreaterThan, false),
        (2, 1, Opcode::GreaterThan, true),
        (1, 1, Opcode::GreaterThan, false),
        (1, 1, Opcode::GreaterThanEqual, true),
        (0, 1, Opcode::GreaterThanEqual, false),
        (1, 1, Opcode::Equal, true),
        (1, 2, Opcode::Equal, false),
        (1, 2, Opcode::NotEqual, true),
        (1, 1, Opcode::NotEqual, false),
    ];

    for (left, right, comparison, expected) in cases {
        let code = bytecode(
            ints(&[left, right]),
            vec![constant(0), constant(1), op(comparison), op(Opcode::Pop)],
        );
        assert_eq!(
            run(&code),
            Object::from_bool(expected),
            "{} {} {}",
            left,
            comparison,
            right
        );
    }
}

#[test]
fn test_boolean_equality() {
    let cases = [
        (Opcode::True, Opcode::True, Opcode::Equal, true),
        (Opcode::False, Opcode::False, Opcode::Equal, true),
        (Opcode::True, Opcode::False, Opcode::Equal, false),
        (Opcode::True, Opcode::False, Opcode::NotEqual, true),
        (Opcode::False, Opcode::False, Opcode::NotEqual, false),
    ];

    for (left, right, comparison, expected) in cases {
        let code = bytecode(
            vec![],
            vec![op(left), op(right), op(comparison), op(Opcode::Pop)],
        );
        assert_eq!(run(&code), Object::from_bool(expected));
    }
}

#[test]
fn test_comparison_result_feeds_equality() {
    // (1 < 2) == true, compiled as (2 > 1) == true
    let code = bytecode(
        ints(&[2, 1]),
        vec![
            constant(0),
            constant(1),
            op(Opcode::GreaterThan),
            op(Opcode::True),
            op(Opcode::Equal),
            op(Opcode::Pop),
        ],
    );
    assert_eq!(run(&code), TRUE);
}

#[test]
fn test_mixed_type_equality() {
    // 1 == true
    let code = bytecode(
        ints(&[1]),
        vec![constant(0), op(Opcode::True), op(Opcode::Equal), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), FALSE);

    // 1 != true
    let code = bytecode(
        ints(&[1]),
        vec![constant(0), op(Opcode::True), op(Opcode::NotEqual), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), TRUE);
}

#[test]
fn test_string_equality_is_structural() {
    let code = bytecode(
        vec![Object::string("goblin"), Object::string("goblin")],
        vec![constant(0), constant(1), op(Opcode::Equal), op(Opcode::Pop)],
    );
    assert_eq!(run(&code), TRUE);
}

#[test]
fn test_bang() {
    let cases = [
        (vec![op(Opcode::True), op(Opcode::Bang)], FALSE),
        (vec![op(Opcode::False), op(Opcode::Bang)], TRUE),
        (vec![constant(0), op(Opcode::Bang)], FALSE),
        (vec![op(Opcode::True), op(Opcode::Bang), op(Opcode::Bang)], TRUE),
        (vec![constant(0), op(Opcode::Bang), op(Opcode::Bang)], TRUE),
        (vec![constant(1), op(Opcode::Bang)], FALSE),
        (vec![constant(2), op(Opcode::Bang)], FALSE),
    ];
    let constants = vec![Object::Integer(5), NULL, Object::string("")];

    for (mut instructions, expected) in cases {
        instructions.push(op(Opcode::Pop));
        let code = bytecode(constants.clone(), instructions);
        assert_eq!(run(&code), expected);
    }
}

#[test]
fn test_binary_type_mismatch() {
    let code = bytecode(
        ints(&[1]),
        vec![constant(0), op(Opcode::True), op(Opcode::Add)],
    );
    let err = run_err(&code);
    assert_eq!(
        err,
        VmError::UnsupportedBinaryTypes {
            op: Opcode::Add,
            left: crate::object::ObjectType::Integer,
            right: crate::object::ObjectType::Boolean,
        }
    );
    assert_eq!(
        err.to_string(),
        "unsupported types for binary operation: INTEGER BOOLEAN"
    );
}

#[test]
fn test_string_arithmetic_is_unsupported() {
    let code = bytecode(
        vec![Object::string("a"), Object::string("b")],
        vec![constant(0), constant(1), op(Opcode::Add)],
    );
    assert_eq!(
        run_err(&code).to_string(),
        "unsupported types for binary operation: STRING STRING"
    );
}

#[test]
fn test_unknown_operator() {
    let code = bytecode(
        vec![],
        vec![op(Opcode::True), op(Opcode::False), op(Opcode::GreaterThan)],
    );
    assert_eq!(
        run_err(&code).to_string(),
        "unknown operator: OpGreaterThan (BOOLEAN BOOLEAN)"
    );

    let code = bytecode(
        vec![Object::string("a"), Object::string("b")],
        vec![constant(0), constant(1), op(Opcode::GreaterThanEqual)],
    );
    assert_eq!(
        run_err(&code).to_string(),
        "unknown operator: OpGreaterThanEqual (STRING STRING)"
    );
}

#[test]
fn test_stack_discipline() {
    let code = bytecode(
        ints(&[1, 2]),
        vec![constant(0), constant(1), op(Opcode::Pop)],
    );
    let mut vm = VM::new(&code);
    vm.run().unwrap();

    assert_eq!(vm.sp(), 1);
    assert_eq!(vm.stack_top(), Some(&Object::Integer(1)));
    assert_eq!(vm.last_popped_stack_elem(), Some(&Object::Integer(2)));
}

#[test]
fn test_expression_statement_leaves_stack_empty() {
    let code = bytecode(
        ints(&[1, 2]),
        vec![constant(0), constant(1), op(Opcode::Add), op(Opcode::Pop)],
    );
    let mut vm = VM::new(&code);
    assert_eq!(vm.sp(), 0);
    vm.run().unwrap();

    assert_eq!(vm.sp(), 0);
    assert_eq!(vm.stack_top(), None);
    assert_eq!(vm.last_popped_stack_elem(), Some(&Object::Integer(3)));
}

#[test]
fn test_fresh_vm_has_no_result() {
    let code = Bytecode::default();
    let mut vm = VM::new(&code);
    vm.run().unwrap();
    assert_eq!(vm.stack_top(), None);
    assert_eq!(vm.last_popped_stack_elem(), None);
}

#[test]
fn test_stack_overflow() {
    let code = bytecode(vec![], vec![op(Opcode::True); STACK_SIZE + 1]);
    let mut vm = VM::new(&code);

    let err = vm.run().unwrap_err();
    assert_eq!(err, VmError::StackOverflow { capacity: STACK_SIZE });
    assert_eq!(err.to_string(), "stack overflow");
    assert!(err.is_resource_exceeded());
    assert_eq!(vm.sp(), STACK_SIZE);
}

#[test]
fn test_full_stack_is_allowed() {
    let code = bytecode(vec![], vec![op(Opcode::False); STACK_SIZE]);
    let mut vm = VM::new(&code);
    vm.run().unwrap();
    assert_eq!(vm.sp(), STACK_SIZE);
    assert_eq!(vm.stack_top(), Some(&FALSE));
}

#[test]
fn test_custom_stack_size() {
    let code = bytecode(vec![], vec![op(Opcode::True); 3]);
    let mut vm = VM::with_limits(&code, ExecutionLimits::new().stack_size(2));
    assert_eq!(vm.run().unwrap_err(), VmError::StackOverflow { capacity: 2 });
}

#[test]
fn test_pop_on_empty_stack() {
    let code = bytecode(vec![], vec![op(Opcode::Pop)]);
    assert_eq!(run_err(&code), VmError::StackUnderflow);

    let code = bytecode(vec![], vec![op(Opcode::True), op(Opcode::Add)]);
    assert_eq!(run_err(&code), VmError::StackUnderflow);
}

#[test]
fn test_constant_out_of_range() {
    let code = bytecode(ints(&[1]), vec![constant(1)]);
    assert_eq!(
        run_err(&code),
        VmError::ConstantOutOfRange { index: 1, len: 1 }
    );
}

#[test]
fn test_truncated_constant_operand() {
    let code = Bytecode::new(Instructions::from(vec![Opcode::Constant as u8, 0x00]), ints(&[1]));
    assert!(matches!(
        run_err(&code),
        VmError::Decode(crate::code::CodeError::TruncatedOperand { needed: 2, available: 1, .. })
    ));

    // Opcode as the very last byte.
    let code = Bytecode::new(Instructions::from(vec![Opcode::Constant as u8]), ints(&[1]));
    assert!(matches!(
        run_err(&code),
        VmError::Decode(crate::code::CodeError::TruncatedOperand { needed: 2, available: 0, .. })
    ));
}

#[test]
fn test_undefined_opcode() {
    let code = Bytecode::new(Instructions::from(vec![0xFF]), vec![]);
    let err = run_err(&code);
    assert_eq!(err, VmError::Decode(crate::code::CodeError::UndefinedOpcode(0xFF)));
    assert_eq!(err.to_string(), "opcode 255 undefined");
}

#[test]
fn test_run_stops_at_first_error() {
    let code = bytecode(
        ints(&[1, 2]),
        vec![
            constant(0),
            op(Opcode::True),
            op(Opcode::Add),
            constant(1),
            op(Opcode::Pop),
        ],
    );
    let mut vm = VM::new(&code);
    assert!(vm.run().is_err());
    // Neither the constant push nor the pop after the failure ran.
    assert_eq!(vm.sp(), 0);
    assert_eq!(vm.stack_top(), None);
}

#[test]
fn test_step_limit() {
    let instructions = vec![constant(0), constant(0), op(Opcode::Add), op(Opcode::Pop)];
    let code = bytecode(ints(&[21]), instructions);

    let mut vm = VM::with_limits(&code, ExecutionLimits::new().max_steps(3));
    let err = vm.run().unwrap_err();
    assert_eq!(err, VmError::StepLimitExceeded { limit: 3 });
    assert!(err.is_resource_exceeded());

    let mut vm = VM::with_limits(&code, ExecutionLimits::new().max_steps(4));
    vm.run().unwrap();
    assert_eq!(vm.last_popped_stack_elem(), Some(&Object::Integer(42)));
}

#[test]
fn test_limits_defaults() {
    let limits = ExecutionLimits::default();
    assert_eq!(limits.get_stack_size(), STACK_SIZE);
    assert_eq!(limits.get_max_steps(), None);
}

#[test]
fn test_execute() {
    let code = bytecode(
        ints(&[6, 7]),
        vec![constant(0), constant(1), op(Opcode::Mul), op(Opcode::Pop)],
    );
    assert_eq!(VM::execute(&code).unwrap(), Some(Object::Integer(42)));
}

#[test]
fn test_bytecode_is_not_mutated() {
    let code = bytecode(
        ints(&[3]),
        vec![constant(0), op(Opcode::Minus), op(Opcode::Pop)],
    );
    let before = code.clone();
    let mut vm = VM::new(&code);
    vm.run().unwrap();
    // Re-running reads the same constants.
    vm.run().unwrap();
    assert_eq!(vm.last_popped_stack_elem(), Some(&Object::Integer(-3)));
    assert_eq!(code, before);
}
