//! Instruction set definitions.
//!
//! The [`for_each_operation!`](crate::for_each_operation) macro holds the
//! canonical operation table and invokes a callback macro for code
//! generation. This enables multiple modules to generate operation-related
//! code without duplicating definitions.
//!
//! This module generates:
//! - The [`Operation`] enum with mnemonic mappings
//! - [`Operation::from_mnemonic`] for decoding program text
//!
//! See [`decoder`](crate::decoder) for the line decoder built on top.
//!
//! # Instruction format
//!
//! Every instruction is an operation tag plus one signed 64-bit argument.
//! What the argument means depends on the operation (a memory location, a
//! literal constant, a jump distance, or a required size); operations that
//! take no argument store zero and ignore it.

use crate::errors::VmError;

/// Invokes a callback macro with the complete operation definition list.
///
/// This macro enables code generation for operations in multiple modules
/// without duplicating the operation definitions.
#[macro_export]
macro_rules! for_each_operation {
    ($callback:ident) => {
        $callback! {
            // =========================
            // Control
            // =========================
            /// NOOP ; no effect, step to the next instruction
            Noop = "NOOP" => None,
            /// HALT ; terminate normally
            Halt = "HALT" => None,
            /// OUTPUT ; emit the accumulator to the output sink
            Output = "OUTPUT" => None,
            // =========================
            // Accumulator / memory transfer
            // =========================
            /// CLEAR ; accumulator = 0
            Clear = "CLEAR" => None,
            /// AT loc ; accumulator = memory[loc]
            At = "AT" => Location,
            /// SET loc ; memory[loc] = accumulator
            Set = "SET" => Location,
            // =========================
            // Memory shape
            // =========================
            /// INSERT loc ; insert the accumulator at loc (loc == size appends)
            Insert = "INSERT" => Location,
            /// ERASE loc ; remove memory[loc], shifting later cells left
            Erase = "ERASE" => Location,
            // =========================
            // Constant arithmetic
            // =========================
            /// ADDCONST k ; accumulator += k
            AddConst = "ADDCONST" => Constant,
            /// SUBCONST k ; accumulator -= k
            SubConst = "SUBCONST" => Constant,
            /// MULCONST k ; accumulator *= k
            MulConst = "MULCONST" => Constant,
            /// DIVCONST k ; accumulator /= k (k == 0 faults)
            DivConst = "DIVCONST" => Constant,
            // =========================
            // Memory arithmetic
            // =========================
            /// ADDMEM loc ; accumulator += memory[loc]
            AddMem = "ADDMEM" => Location,
            /// SUBMEM loc ; accumulator -= memory[loc]
            SubMem = "SUBMEM" => Location,
            /// MULMEM loc ; accumulator *= memory[loc]
            MulMem = "MULMEM" => Location,
            /// DIVMEM loc ; accumulator /= memory[loc] (zero cell faults)
            DivMem = "DIVMEM" => Location,
            // =========================
            // Jumps
            // =========================
            /// JUMPREL d ; move the cursor by d (d == 0 faults)
            JumpRel = "JUMPREL" => Distance,
            /// JUMPZERO d ; move the cursor by d if the accumulator is 0
            JumpZero = "JUMPZERO" => Distance,
            /// JUMPNZERO d ; move the cursor by d if the accumulator is not 0
            JumpNzero = "JUMPNZERO" => Distance,
            // =========================
            // Diagnostic
            // =========================
            /// CHECKMEM n ; fault unless memory holds at least n cells
            CheckMem = "CHECKMEM" => Size,
        }
    };
}

/// What an operation's single argument means.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArgumentKind {
    /// The operation takes no argument.
    None,
    /// A data memory location.
    Location,
    /// A literal operand.
    Constant,
    /// A signed relative jump distance.
    Distance,
    /// A required memory size.
    Size,
}

impl ArgumentKind {
    /// Whether the decoder expects an operand token for this kind.
    pub const fn takes_argument(&self) -> bool {
        !matches!(self, ArgumentKind::None)
    }
}

macro_rules! define_operations {
    (
        $(
            $(#[$doc:meta])*
            $name:ident = $mnemonic:literal => $kind:ident
        ),* $(,)?
    ) => {
        // =========================
        // Operation enum
        // =========================
        /// Closed set of operations the machine understands.
        ///
        /// Decode failure is represented as a [`VmError`], never as a variant
        /// of this enum, so a decoded operation is always executable.
        #[derive(Copy, Clone, Debug, Eq, PartialEq)]
        pub enum Operation {
            $(
                $(#[$doc])*
                $name,
            )*
        }

        impl Operation {
            /// Returns the textual mnemonic for this operation.
            pub const fn mnemonic(&self) -> &'static str {
                match self {
                    $( Operation::$name => $mnemonic, )*
                }
            }

            /// Returns what this operation's argument means.
            pub const fn argument_kind(&self) -> ArgumentKind {
                match self {
                    $( Operation::$name => ArgumentKind::$kind, )*
                }
            }

            /// Looks up an operation by its mnemonic (case-sensitive).
            pub fn from_mnemonic(token: &str) -> Result<Self, VmError> {
                match token {
                    $( $mnemonic => Ok(Operation::$name), )*
                    _ => Err(VmError::UnknownOperation {
                        mnemonic: token.to_string(),
                    }),
                }
            }
        }
    };
}

for_each_operation!(define_operations);

/// A single decoded instruction, immutable once built.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct Instruction {
    /// The operation to perform.
    pub operation: Operation,
    /// Location, constant, distance or size, depending on the operation.
    pub argument: i64,
}

impl Instruction {
    /// Creates an instruction from an operation and its argument.
    pub const fn new(operation: Operation, argument: i64) -> Self {
        Self {
            operation,
            argument,
        }
    }
}

impl std::fmt::Display for Instruction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        if self.operation.argument_kind().takes_argument() {
            write!(f, "{} {}", self.operation.mnemonic(), self.argument)
        } else {
            f.write_str(self.operation.mnemonic())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mnemonic_valid() {
        assert_eq!(
            Operation::from_mnemonic("ADDCONST").unwrap(),
            Operation::AddConst
        );
        assert_eq!(Operation::from_mnemonic("HALT").unwrap(), Operation::Halt);
        assert_eq!(
            Operation::from_mnemonic("JUMPNZERO").unwrap(),
            Operation::JumpNzero
        );
    }

    #[test]
    fn from_mnemonic_invalid() {
        assert!(matches!(
            Operation::from_mnemonic("FLY"),
            Err(VmError::UnknownOperation { .. })
        ));
        // case-sensitive
        assert!(matches!(
            Operation::from_mnemonic("halt"),
            Err(VmError::UnknownOperation { .. })
        ));
    }

    #[test]
    fn mnemonic_round_trips() {
        for op in [
            Operation::Noop,
            Operation::Output,
            Operation::At,
            Operation::Insert,
            Operation::DivConst,
            Operation::MulMem,
            Operation::JumpZero,
            Operation::CheckMem,
        ] {
            assert_eq!(Operation::from_mnemonic(op.mnemonic()).unwrap(), op);
        }
    }

    #[test]
    fn argument_kinds() {
        assert_eq!(Operation::Halt.argument_kind(), ArgumentKind::None);
        assert_eq!(Operation::Set.argument_kind(), ArgumentKind::Location);
        assert_eq!(Operation::SubConst.argument_kind(), ArgumentKind::Constant);
        assert_eq!(Operation::JumpRel.argument_kind(), ArgumentKind::Distance);
        assert_eq!(Operation::CheckMem.argument_kind(), ArgumentKind::Size);
        assert!(!ArgumentKind::None.takes_argument());
        assert!(ArgumentKind::Location.takes_argument());
    }

    #[test]
    fn instruction_display() {
        assert_eq!(
            Instruction::new(Operation::AddConst, 5).to_string(),
            "ADDCONST 5"
        );
        assert_eq!(
            Instruction::new(Operation::JumpRel, -2).to_string(),
            "JUMPREL -2"
        );
        assert_eq!(Instruction::new(Operation::Halt, 0).to_string(), "HALT");
    }
}
