use tracing::{debug, trace};

use super::operators::{integer_arithmetic, integer_comparison};
use crate::{
    code::{CodeError, Opcode, read_u16},
    object::{FALSE, Object, TRUE},
    vm::{Bytecode, Stack, VmError},
};

/// Default operand stack capacity.
pub const STACK_SIZE: usize = 2048;

/// Runtime limits for a single VM.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ExecutionLimits {
    /// Maximum number of live stack slots (default: 2048).
    pub(crate) stack_size: usize,
    /// Maximum number of dispatched instructions per `run()` (default: unlimited).
    pub(crate) max_steps: Option<u64>,
}

impl Default for ExecutionLimits {
    fn default() -> Self {
        Self {
            stack_size: STACK_SIZE,
            max_steps: None,
        }
    }
}

impl ExecutionLimits {
    /// Create new limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the operand stack capacity.
    pub fn stack_size(mut self, size: usize) -> Self {
        self.stack_size = size;
        self
    }

    /// Set the instruction budget.
    pub fn max_steps(mut self, steps: u64) -> Self {
        self.max_steps = Some(steps);
        self
    }

    pub fn get_stack_size(&self) -> usize {
        self.stack_size
    }

    pub fn get_max_steps(&self) -> Option<u64> {
        self.max_steps
    }
}

/// Stack-based virtual machine.
///
/// A VM borrows its [`Bytecode`] read-only and owns its operand stack. It is
/// meant for one thread; build one VM per concurrent execution.
pub struct VM<'b> {
    code: &'b Bytecode,
    stack: Stack<Object>,
    limits: ExecutionLimits,
}

impl<'b> VM<'b> {
    pub fn new(code: &'b Bytecode) -> Self {
        Self::with_limits(code, ExecutionLimits::default())
    }

    pub fn with_limits(code: &'b Bytecode, limits: ExecutionLimits) -> Self {
        VM {
            code,
            stack: Stack::new(limits.stack_size),
            limits,
        }
    }

    /// Run `code` on a fresh VM and return the last popped value.
    pub fn execute(code: &Bytecode) -> Result<Option<Object>, VmError> {
        let mut vm = VM::new(code);
        vm.run()?;
        Ok(vm.last_popped_stack_elem().cloned())
    }

    /// The live value on top of the stack, if any.
    pub fn stack_top(&self) -> Option<&Object> {
        self.stack.peek()
    }

    /// The value in slot `sp`, i.e. the one most recently discarded.
    ///
    /// After a program whose last instruction is `OpPop`, this is the value
    /// of the last expression statement.
    pub fn last_popped_stack_elem(&self) -> Option<&Object> {
        self.stack.last_popped()
    }

    /// Current stack pointer (number of live values).
    pub fn sp(&self) -> usize {
        self.stack.len()
    }

    pub fn limits(&self) -> &ExecutionLimits {
        &self.limits
    }

    /// Execute the instruction stream from the start.
    ///
    /// Stops at the end of the stream, or at the first error, which is
    /// returned as is. The stack keeps whatever state the run left it in.
    pub fn run(&mut self) -> Result<(), VmError> {
        debug!(
            instructions = self.code.instructions.len(),
            constants = self.code.constants.len(),
            "vm run"
        );

        let result = self.dispatch_loop();
        match &result {
            Ok(steps) => debug!(steps, sp = self.stack.len(), "vm finished"),
            Err(err) => debug!(%err, sp = self.stack.len(), "vm failed"),
        }
        result.map(|_| ())
    }

    fn dispatch_loop(&mut self) -> Result<u64, VmError> {
        let code = self.code;
        let instructions = code.instructions.as_bytes();
        let mut pc = 0;
        let mut steps: u64 = 0;

        while pc < instructions.len() {
            if let Some(limit) = self.limits.max_steps {
                if steps >= limit {
                    return Err(VmError::StepLimitExceeded { limit });
                }
            }
            steps += 1;

            let op = Opcode::try_from(instructions[pc])?;
            trace!(pc, %op, sp = self.stack.len(), "dispatch");

            match op {
                Opcode::Constant => {
                    let operand = instructions
                        .get(pc + 1..pc + 3)
                        .and_then(|bytes| <[u8; 2]>::try_from(bytes).ok())
                        .ok_or(CodeError::TruncatedOperand {
                            opcode: op.name(),
                            needed: 2,
                            available: instructions.len() - pc - 1,
                        })?;
                    let index = read_u16(operand) as usize;
                    pc += 2;

                    let constant =
                        code.constants
                            .get(index)
                            .ok_or(VmError::ConstantOutOfRange {
                                index,
                                len: code.constants.len(),
                            })?;
                    self.stack.push(constant.clone())?;
                }
                Opcode::Add | Opcode::Sub | Opcode::Mul | Opcode::Div | Opcode::Exp => {
                    self.execute_binary_operation(op)?;
                }
                Opcode::Pop => {
                    self.stack.pop()?;
                }
                Opcode::True => self.stack.push(TRUE)?,
                Opcode::False => self.stack.push(FALSE)?,
                Opcode::Equal
                | Opcode::NotEqual
                | Opcode::GreaterThan
                | Opcode::GreaterThanEqual => {
                    self.execute_comparison(op)?;
                }
                Opcode::Minus => self.execute_minus_operator()?,
                Opcode::Bang => self.execute_bang_operator()?,
            }

            pc += 1;
        }

        Ok(steps)
    }

    fn execute_binary_operation(&mut self, op: Opcode) -> Result<(), VmError> {
        let (left, right) = self.stack.pop_pair()?;

        match (&left, &right) {
            (Object::Integer(l), Object::Integer(r)) => {
                let result = integer_arithmetic(op, *l, *r)?;
                self.stack.push(Object::Integer(result))
            }
            _ => Err(VmError::UnsupportedBinaryTypes {
                op,
                left: left.object_type(),
                right: right.object_type(),
            }),
        }
    }

    fn execute_comparison(&mut self, op: Opcode) -> Result<(), VmError> {
        let (left, right) = self.stack.pop_pair()?;

        if let (Object::Integer(l), Object::Integer(r)) = (&left, &right) {
            let result = integer_comparison(op, *l, *r)?;
            return self.stack.push(Object::from_bool(result));
        }

        match op {
            Opcode::Equal => self.stack.push(Object::from_bool(left == right)),
            Opcode::NotEqual => self.stack.push(Object::from_bool(left != right)),
            _ => Err(VmError::UnknownOperator {
                op,
                left: left.object_type(),
                right: right.object_type(),
            }),
        }
    }

    fn execute_minus_operator(&mut self) -> Result<(), VmError> {
        match self.stack.pop()? {
            Object::Integer(value) => self.stack.push(Object::Integer(value.wrapping_neg())),
            other => Err(VmError::UnsupportedNegation(other.object_type())),
        }
    }

    /// Only `false` negates to `true`; every other operand, `null` included,
    /// negates to `false`.
    fn execute_bang_operator(&mut self) -> Result<(), VmError> {
        let result = match self.stack.pop()? {
            Object::Boolean(true) => FALSE,
            Object::Boolean(false) => TRUE,
            _ => FALSE,
        };
        self.stack.push(result)
    }
}
