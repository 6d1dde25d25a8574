use crate::{Vec, code::Instructions, object::Object};

/// Compiler output handed to the VM: an instruction stream plus the constant
/// pool its `OpConstant` instructions index into.
///
/// The VM borrows a `Bytecode` for its whole lifetime and never mutates it.
#[derive(Clone, Default, PartialEq)]
pub struct Bytecode {
    pub instructions: Instructions,
    pub constants: Vec<Object>,
}

impl Bytecode {
    pub fn new(instructions: Instructions, constants: Vec<Object>) -> Self {
        Self {
            instructions,
            constants,
        }
    }
}

impl core::fmt::Debug for Bytecode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        writeln!(f, "Bytecode {{")?;

        // Print constants pool
        if !self.constants.is_empty() {
            writeln!(f, "  constants: [")?;
            for (i, constant) in self.constants.iter().enumerate() {
                writeln!(
                    f,
                    "    [{}] = {} ({})",
                    i,
                    constant,
                    constant.object_type()
                )?;
            }
            writeln!(f, "  ]")?;
        } else {
            writeln!(f, "  constants: []")?;
        }

        writeln!(f, "  instructions:")?;
        for line in crate::format!("{}", self.instructions).lines() {
            writeln!(f, "    {}", line)?;
        }

        write!(f, "}}")
    }
}
