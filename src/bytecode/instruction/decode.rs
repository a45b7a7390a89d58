//! Instruction decoding from the code buffer

use super::{ByteRange, Condition, Instruction, InstructionKind};
use crate::bytecode::opcode::Opcode;
use crate::bytecode::reader::{CodeReader, UnexpectedEnd};
use thiserror::Error;

/// Error type for instruction decoding
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("no instruction at offset {offset}: end of code")]
    EndOfCode { offset: usize },
    #[error("unknown opcode {opcode:#04x}")]
    UnknownOpcode { opcode: u8 },
    #[error("truncated operand for {opcode}: {source}")]
    TruncatedOperand {
        opcode: Opcode,
        #[source]
        source: UnexpectedEnd,
    },
}

impl InstructionKind {
    /// Decode one instruction, leaving the reader positioned after its last
    /// immediate byte. On a truncated immediate the reader is left just past
    /// the opcode byte.
    pub fn decode(reader: &mut CodeReader<'_>) -> Result<Self, DecodeError> {
        let offset = reader.pos();
        let byte = reader
            .read_u8()
            .map_err(|_| DecodeError::EndOfCode { offset })?;
        let opcode = Opcode::from_byte(byte).ok_or(DecodeError::UnknownOpcode { opcode: byte })?;
        let truncated = |source| DecodeError::TruncatedOperand { opcode, source };

        use InstructionKind::*;
        let kind = match opcode {
            Opcode::Nop => Nop,
            Opcode::IconstM1 => Iconst(-1),
            Opcode::Iconst0 => Iconst(0),
            Opcode::Iconst1 => Iconst(1),
            Opcode::Iconst2 => Iconst(2),
            Opcode::Iconst3 => Iconst(3),
            Opcode::Iconst4 => Iconst(4),
            Opcode::Iconst5 => Iconst(5),
            Opcode::Bipush => Bipush(reader.read_i8().map_err(truncated)?),
            Opcode::Sipush => Sipush(reader.read_i16().map_err(truncated)?),
            Opcode::Iload => Iload(reader.read_u8().map_err(truncated)?),
            Opcode::Iload0 => IloadN(0),
            Opcode::Iload1 => IloadN(1),
            Opcode::Iload2 => IloadN(2),
            Opcode::Iload3 => IloadN(3),
            Opcode::Istore => Istore(reader.read_u8().map_err(truncated)?),
            Opcode::Istore0 => IstoreN(0),
            Opcode::Istore1 => IstoreN(1),
            Opcode::Istore2 => IstoreN(2),
            Opcode::Istore3 => IstoreN(3),
            Opcode::Iadd => Iadd,
            Opcode::Isub => Isub,
            Opcode::Imul => Imul,
            Opcode::Idiv => Idiv,
            Opcode::Irem => Irem,
            Opcode::Ineg => Ineg,
            Opcode::IfIcmpeq => branch(Condition::Eq, reader).map_err(truncated)?,
            Opcode::IfIcmpne => branch(Condition::Ne, reader).map_err(truncated)?,
            Opcode::IfIcmplt => branch(Condition::Lt, reader).map_err(truncated)?,
            Opcode::IfIcmpge => branch(Condition::Ge, reader).map_err(truncated)?,
            Opcode::IfIcmpgt => branch(Condition::Gt, reader).map_err(truncated)?,
            Opcode::IfIcmple => branch(Condition::Le, reader).map_err(truncated)?,
            Opcode::Goto => Goto {
                offset: reader.read_i16().map_err(truncated)?,
            },
            Opcode::Ireturn => Ireturn,
            Opcode::Return => Return,
            Opcode::Halt => Halt,
        };
        Ok(kind)
    }
}

fn branch(cond: Condition, reader: &mut CodeReader<'_>) -> Result<InstructionKind, UnexpectedEnd> {
    Ok(InstructionKind::IfIcmp {
        cond,
        offset: reader.read_i16()?,
    })
}

impl Instruction {
    /// Decode one instruction and record its byte range
    pub fn decode(reader: &mut CodeReader<'_>) -> Result<Self, DecodeError> {
        let offset = reader.pos();
        let kind = InstructionKind::decode(reader)?;
        Ok(Instruction {
            kind,
            position: ByteRange {
                offset,
                length: reader.pos() - offset,
            },
        })
    }
}

/// Linear walk over a code buffer, one instruction at a time.
///
/// Yields the offset at which each decode was attempted alongside the result.
/// After an unknown opcode the walk resumes at the following byte; after a
/// truncated operand there is nothing left to decode and the walk ends.
pub struct InstructionIterator<'a> {
    reader: CodeReader<'a>,
    done: bool,
}

impl<'a> InstructionIterator<'a> {
    pub fn new(code: &'a [u8]) -> Self {
        InstructionIterator {
            reader: CodeReader::new(code),
            done: false,
        }
    }
}

impl<'a> Iterator for InstructionIterator<'a> {
    type Item = (usize, Result<Instruction, DecodeError>);

    fn next(&mut self) -> Option<Self::Item> {
        if self.done || self.reader.is_eof() {
            return None;
        }
        let offset = self.reader.pos();
        let result = Instruction::decode(&mut self.reader);
        if let Err(DecodeError::TruncatedOperand { .. }) = result {
            self.done = true;
        }
        Some((offset, result))
    }
}
