//! Textual line decoder.
//!
//! Converts raw program text into [`Instruction`] records. The format is
//! one instruction per line:
//!
//! ```text
//! MNEMONIC [operand]  # optional comment
//! ```
//!
//! - Mnemonics are uppercase (e.g., `ADDCONST`, `HALT`)
//! - Operands are signed decimal integers (e.g., `42`, `-1`)
//! - Comments start with `#`
//! - Blank and comment-only lines are skipped
//!
//! Decoding stops at the first malformed line; the engine never sees a
//! partially decoded program.

use crate::errors::VmError;
use crate::isa::{Instruction, Operation};

const COMMENT_CHAR: char = '#';

/// Decodes a full program source into an ordered instruction sequence.
///
/// Returns the error of the first malformed line, if any.
pub fn decode_source(source: &str) -> Result<Vec<Instruction>, VmError> {
    let mut instructions = Vec::new();
    for (line_no, line) in source.lines().enumerate() {
        if let Some(instruction) = decode_line(line_no + 1, line)? {
            instructions.push(instruction);
        }
    }
    Ok(instructions)
}

/// Decodes one line, returning `None` for blank and comment-only lines.
///
/// `line_no` is 1-based and only used for error context.
pub fn decode_line(line_no: usize, line: &str) -> Result<Option<Instruction>, VmError> {
    let code = line.split(COMMENT_CHAR).next().unwrap_or("");
    let mut tokens = code.split_whitespace();

    let Some(mnemonic) = tokens.next() else {
        return Ok(None);
    };
    let operation = Operation::from_mnemonic(mnemonic)?;
    let operand = tokens.next();

    if let Some(extra) = tokens.next() {
        return Err(VmError::DecodeFailure {
            line: line_no,
            reason: format!("unexpected token `{extra}`"),
        });
    }

    let argument = match (operation.argument_kind().takes_argument(), operand) {
        (true, Some(token)) => parse_operand(line_no, token)?,
        (true, None) => {
            return Err(VmError::DecodeFailure {
                line: line_no,
                reason: format!("{} requires an operand", operation.mnemonic()),
            });
        }
        (false, Some(token)) => {
            return Err(VmError::DecodeFailure {
                line: line_no,
                reason: format!("{} takes no operand, got `{token}`", operation.mnemonic()),
            });
        }
        (false, None) => 0,
    };

    Ok(Some(Instruction::new(operation, argument)))
}

/// Parses a signed integer operand.
fn parse_operand(line_no: usize, token: &str) -> Result<i64, VmError> {
    token.parse::<i64>().map_err(|_| VmError::DecodeFailure {
        line: line_no,
        reason: format!("invalid operand `{token}`"),
    })
}
