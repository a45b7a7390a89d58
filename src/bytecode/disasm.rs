//! Human-readable listing of a code buffer.
//!
//! Disassembly is a read-only pass that never touches the interpreter. Each
//! line shows the byte offset, the raw bytes in hex, and the instruction:
//!
//! ```text
//! 0000: 100a     bipush 10
//! 0004: a30006   if_icmpgt 6 -> 000a
//! ```

use super::instruction::{DecodeError, InstructionIterator};
use std::fmt::Write;

/// Render every instruction in `code`, one per line.
///
/// Bytes that are not opcodes are listed as `unknown_opcode` and the listing
/// carries on with the next byte. An instruction whose immediate runs past
/// the end of the buffer is listed as `<truncated>` and ends the listing.
pub fn disassemble(code: &[u8]) -> String {
    let mut out = String::new();
    for (offset, result) in InstructionIterator::new(code) {
        // Writing to a String never fails
        let _ = match result {
            Ok(inst) => {
                let bytes = &code[inst.position.offset..inst.position.end()];
                match inst.branch_target() {
                    Some(target) => writeln!(
                        out,
                        "{offset:04x}: {:<8} {inst} -> {}",
                        hex::encode(bytes),
                        format_target(target)
                    ),
                    None => writeln!(out, "{offset:04x}: {:<8} {inst}", hex::encode(bytes)),
                }
            }
            Err(DecodeError::UnknownOpcode { opcode }) => {
                writeln!(out, "{offset:04x}: {:<8} unknown_opcode {opcode:#04x}", hex::encode([opcode]))
            }
            Err(DecodeError::TruncatedOperand { opcode, .. }) => writeln!(
                out,
                "{offset:04x}: {:<8} {opcode} <truncated>",
                hex::encode(&code[offset..])
            ),
            Err(DecodeError::EndOfCode { .. }) => Ok(()),
        };
    }
    out
}

fn format_target(target: i64) -> String {
    if target < 0 {
        format!("-{:04x}", target.unsigned_abs())
    } else {
        format!("{target:04x}")
    }
}
