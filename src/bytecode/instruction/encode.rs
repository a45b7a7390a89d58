//! Instruction encoding, the inverse of [`super::decode`]

use super::InstructionKind;
use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// Errors that can occur while encoding an instruction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// An `iconst` value outside `-1..=5` or a fixed local index outside `0..=3`.
    #[error("{0} has no short-form encoding")]
    NoShortForm(String),
}

impl InstructionKind {
    /// Append the binary encoding of this instruction to `out`
    pub fn encode(&self, out: &mut Vec<u8>) -> Result<(), EncodeError> {
        use InstructionKind::*;
        match *self {
            Iconst(v) if !(-1..=5).contains(&v) => {
                return Err(EncodeError::NoShortForm(format!("iconst {v}")))
            }
            IloadN(idx) | IstoreN(idx) if idx > 3 => {
                return Err(EncodeError::NoShortForm(format!("{self:?}")))
            }
            _ => {}
        }

        out.push(self.opcode().byte());
        match *self {
            Bipush(v) => out.push(v as u8),
            Iload(idx) | Istore(idx) => out.push(idx),
            Sipush(v) => push_i16(out, v),
            IfIcmp { offset, .. } | Goto { offset } => push_i16(out, offset),
            _ => {}
        }
        Ok(())
    }
}

fn push_i16(out: &mut Vec<u8>, value: i16) {
    let mut buf = [0u8; 2];
    BigEndian::write_i16(&mut buf, value);
    out.extend_from_slice(&buf);
}

/// Encode a sequence of instructions into a fresh code buffer
pub fn encode_all(instructions: &[InstructionKind]) -> Result<Vec<u8>, EncodeError> {
    let mut out = Vec::with_capacity(instructions.iter().map(InstructionKind::encoded_len).sum());
    for inst in instructions {
        inst.encode(&mut out)?;
    }
    Ok(out)
}
