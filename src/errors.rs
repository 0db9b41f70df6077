use accvm_derive::Error;

/// Faults that can occur while decoding or executing a program.
///
/// Every variant except [`VmError::Io`] surfaces through the machine as the
/// `ERRORED` status; `Io` is returned directly to the caller because it
/// precedes any state mutation.
#[derive(Debug, Error)]
pub enum VmError {
    /// Unrecognized mnemonic encountered during decoding.
    #[error("unknown operation `{mnemonic}`")]
    UnknownOperation { mnemonic: String },
    /// Malformed instruction line (bad operand, wrong arity).
    #[error("line {line}: {reason}")]
    DecodeFailure { line: usize, reason: String },
    /// Memory read/write/erase/arithmetic at an index that does not exist.
    #[error("memory access out of range: location {location}, size {size}")]
    OutOfRangeAccess { location: i64, size: usize },
    /// Insert index beyond the current memory size.
    #[error("invalid insert index: location {location}, size {size}")]
    InvalidInsertIndex { location: i64, size: usize },
    /// Constant or memory divisor is zero.
    #[error("division by zero")]
    DivisionByZero,
    /// A jump instruction computed a distance of zero.
    #[error("jump distance must be non-zero")]
    InvalidJumpDistance,
    /// CHECKMEM assertion failure.
    #[error("memory too small: required {required} cells, have {size}")]
    MemoryTooSmall { required: i64, size: usize },
    /// The configured step budget ran out before the program terminated.
    #[error("step limit of {limit} exceeded")]
    StepLimitExceeded { limit: u64 },
    /// Program source could not be read at all.
    #[error("unable to read {path}: {reason}")]
    Io { path: String, reason: String },
}
