//! Core virtual machine implementation.
//!
//! The machine executes a decoded instruction sequence against a single
//! signed 64-bit accumulator and a resizable data memory. All arithmetic
//! uses wrapping semantics to prevent overflow panics.
//!
//! Execution follows a fetch-evaluate-advance loop: the instruction under
//! the cursor is evaluated against the mutable state, yields a signed
//! relative jump distance, and the cursor moves by that distance unless the
//! evaluation already forced a terminal status. Any fault turns into the
//! `ERRORED` status; no error crosses the engine boundary once a program is
//! loaded.

use crate::decoder::decode_source;
use crate::errors::VmError;
use crate::isa::{Instruction, Operation};
use crate::memory::DataMemory;
use crate::output::OutputSink;
use crate::program::{InstructionStore, Step};
use crate::status::MachineStatus;
use std::fmt::Write;
use std::fs;
use std::path::Path;

/// Accumulator virtual machine.
///
/// Owns all of its state exclusively: the accumulator, the data memory, the
/// instruction store with its cursor, the lifecycle status and the last
/// fault. State is created empty at construction, populated by
/// [`load`](Machine::load), mutated during [`run`](Machine::run), and wiped
/// by [`reset`](Machine::reset).
#[derive(Debug, Default)]
pub struct Machine {
    /// The single arithmetic working register.
    accumulator: i64,
    /// Data cells instructions read, write and reshape.
    memory: DataMemory,
    /// Decoded instruction sequence plus cursor.
    program: InstructionStore,
    /// Lifecycle status; arbitrated exclusively by this engine.
    status: MachineStatus,
    /// The fault behind the most recent `ERRORED` status, for diagnostics.
    fault: Option<VmError>,
    /// Optional step budget; `None` means execution is unbounded.
    step_limit: Option<u64>,
}

impl Machine {
    /// Creates an empty machine in the `WAITING` status.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current lifecycle status.
    pub fn status(&self) -> MachineStatus {
        self.status
    }

    /// Current accumulator value.
    pub fn accumulator(&self) -> i64 {
        self.accumulator
    }

    /// The fault behind the most recent `ERRORED` status, if any.
    pub fn fault(&self) -> Option<&VmError> {
        self.fault.as_ref()
    }

    /// Returns a value-copy snapshot of the data memory; never a live view.
    pub fn data_memory(&self) -> Vec<i64> {
        self.memory.snapshot()
    }

    /// Bounds execution to at most `limit` evaluated instructions.
    ///
    /// An exceeded budget faults with [`VmError::StepLimitExceeded`]. This
    /// is an external safety policy: with `None` (the default) a program
    /// containing an unconditional backward jump loop runs indefinitely.
    pub fn set_step_limit(&mut self, limit: Option<u64>) {
        self.step_limit = limit;
    }

    /// Decodes `source` and installs it together with `initial_memory`.
    ///
    /// Legal only in the `WAITING` status; otherwise returns the current
    /// status with no state mutated. Decoding stops at the first malformed
    /// line and leaves the machine `ERRORED` with nothing installed. A
    /// valid but empty program installs `initial_memory` and stays
    /// `WAITING`.
    pub fn load(&mut self, source: &str, initial_memory: Vec<i64>) -> MachineStatus {
        if self.status != MachineStatus::Waiting {
            return self.status;
        }

        let instructions = match decode_source(source) {
            Ok(instructions) => instructions,
            Err(fault) => {
                self.fail(fault);
                return self.status;
            }
        };

        self.memory.install(initial_memory);
        self.program.install(instructions);
        if !self.program.is_empty() {
            self.status = MachineStatus::Ready;
        }
        self.status
    }

    /// Reads a program from `path` and loads it.
    ///
    /// An unreadable source is a fatal construction-time failure reported
    /// as `Err` directly, distinct from the `ERRORED` status: no load
    /// attempt could even begin, so no state is touched.
    pub fn load_file<P: AsRef<Path>>(
        &mut self,
        path: P,
        initial_memory: Vec<i64>,
    ) -> Result<MachineStatus, VmError> {
        let path = path.as_ref();
        let source = fs::read_to_string(path).map_err(|e| VmError::Io {
            path: path.display().to_string(),
            reason: e.to_string(),
        })?;
        Ok(self.load(&source, initial_memory))
    }

    /// Runs the loaded program to completion.
    ///
    /// Legal only in the `READY` status; otherwise returns the current
    /// status with no state mutated. Drives the fetch-evaluate-advance loop
    /// until the status leaves `RUNNING` and returns the final status,
    /// `HALTED` or `ERRORED`.
    pub fn run<S: OutputSink>(&mut self, sink: &mut S) -> MachineStatus {
        if self.status != MachineStatus::Ready {
            return self.status;
        }

        self.status = MachineStatus::Running;
        self.program.rewind();
        let mut steps: u64 = 0;

        while self.status == MachineStatus::Running {
            if let Some(limit) = self.step_limit {
                steps += 1;
                if steps > limit {
                    self.fail(VmError::StepLimitExceeded { limit });
                    break;
                }
            }

            // load guarantees a non-empty program; an exhausted cursor is
            // normal termination
            let Some(instruction) = self.program.current() else {
                self.status = MachineStatus::Halted;
                break;
            };

            match self.evaluate(instruction, sink) {
                Ok(distance) if self.status == MachineStatus::Running => {
                    match self.program.advance(distance) {
                        Ok(Step::Within) => {}
                        Ok(Step::PassedEnd) => self.status = MachineStatus::Halted,
                        Err(fault) => self.fail(fault),
                    }
                }
                // HALT already left the running status; the distance is dropped
                Ok(_) => {}
                Err(fault) => self.fail(fault),
            }
        }

        self.status
    }

    /// Wipes all state: accumulator 0, empty memory and program, status
    /// `WAITING`. Legal from any status and always succeeds.
    pub fn reset(&mut self) -> MachineStatus {
        self.accumulator = 0;
        self.memory.clear();
        self.program.clear();
        self.fault = None;
        self.status = MachineStatus::Waiting;
        self.status
    }

    /// Evaluates one instruction and returns the cursor distance to move.
    ///
    /// Every handler checks validity before mutating, so a returned fault
    /// leaves the accumulator and the memory exactly as they were.
    fn evaluate<S: OutputSink>(
        &mut self,
        instruction: Instruction,
        sink: &mut S,
    ) -> Result<i64, VmError> {
        let argument = instruction.argument;
        match instruction.operation {
            // Control
            Operation::Noop => Ok(1),
            Operation::Halt => {
                self.status = MachineStatus::Halted;
                Ok(1)
            }
            Operation::Output => {
                sink.emit(self.accumulator);
                Ok(1)
            }
            // Accumulator / memory transfer
            Operation::Clear => {
                self.accumulator = 0;
                Ok(1)
            }
            Operation::At => {
                self.accumulator = self.memory.get(argument)?;
                Ok(1)
            }
            Operation::Set => {
                self.memory.set(argument, self.accumulator)?;
                Ok(1)
            }
            // Memory shape
            Operation::Insert => {
                self.memory.insert(argument, self.accumulator)?;
                Ok(1)
            }
            Operation::Erase => {
                self.memory.erase(argument)?;
                Ok(1)
            }
            // Constant arithmetic
            Operation::AddConst => {
                self.accumulator = self.accumulator.wrapping_add(argument);
                Ok(1)
            }
            Operation::SubConst => {
                self.accumulator = self.accumulator.wrapping_sub(argument);
                Ok(1)
            }
            Operation::MulConst => {
                self.accumulator = self.accumulator.wrapping_mul(argument);
                Ok(1)
            }
            Operation::DivConst => {
                self.accumulator = self.divide(argument)?;
                Ok(1)
            }
            // Memory arithmetic
            Operation::AddMem => {
                let operand = self.memory.get(argument)?;
                self.accumulator = self.accumulator.wrapping_add(operand);
                Ok(1)
            }
            Operation::SubMem => {
                let operand = self.memory.get(argument)?;
                self.accumulator = self.accumulator.wrapping_sub(operand);
                Ok(1)
            }
            Operation::MulMem => {
                let operand = self.memory.get(argument)?;
                self.accumulator = self.accumulator.wrapping_mul(operand);
                Ok(1)
            }
            Operation::DivMem => {
                let operand = self.memory.get(argument)?;
                self.accumulator = self.divide(operand)?;
                Ok(1)
            }
            // Jumps
            Operation::JumpRel => Self::jump(argument, true),
            Operation::JumpZero => Self::jump(argument, self.accumulator == 0),
            Operation::JumpNzero => Self::jump(argument, self.accumulator != 0),
            // Diagnostic
            Operation::CheckMem => {
                self.memory.require_size(argument)?;
                Ok(1)
            }
        }
    }

    /// Divides the accumulator by `divisor`, faulting on zero.
    fn divide(&self, divisor: i64) -> Result<i64, VmError> {
        if divisor == 0 {
            return Err(VmError::DivisionByZero);
        }
        Ok(self.accumulator.wrapping_div(divisor))
    }

    /// Resolves a jump to its cursor distance.
    ///
    /// A distance of 0 faults regardless of whether the jump would be
    /// taken; an untaken jump falls through with distance 1.
    fn jump(distance: i64, taken: bool) -> Result<i64, VmError> {
        if distance == 0 {
            return Err(VmError::InvalidJumpDistance);
        }
        Ok(if taken { distance } else { 1 })
    }

    /// Records `fault` and moves the machine to the `ERRORED` status.
    fn fail(&mut self, fault: VmError) {
        crate::error!("machine fault: {fault}");
        self.status = MachineStatus::Errored;
        self.fault = Some(fault);
    }

    /// Renders the machine state for diagnostics.
    ///
    /// Includes the status and the accumulator, plus the data memory cells
    /// and the instruction listing when requested. Non-authoritative: the
    /// status and snapshot accessors are the contract.
    pub fn render(&self, show_data: bool, show_code: bool) -> String {
        let mut out = String::new();
        let _ = writeln!(out, "Status: {}", self.status);
        let _ = writeln!(out, "Accumulator: {}", self.accumulator);

        if show_data {
            let _ = writeln!(out, "*** Data Memory ***");
            for (location, value) in self.memory.snapshot().iter().enumerate() {
                let _ = writeln!(out, "Location {location}: {value}");
            }
        }
        if show_code {
            let _ = writeln!(out, "*** Instruction Memory ***");
            for (index, instruction) in self.program.instructions().iter().enumerate() {
                let _ = writeln!(out, "Instruction {index}: {instruction}");
            }
        }
        out
    }
}
