//! Instruction representation, decoding and encoding
//!
//! An [`InstructionKind`] is one opcode together with its decoded immediate.
//! [`Instruction`] additionally records where in the code buffer it was read
//! from, which the disassembler and branch resolution need.

pub mod decode;
pub mod encode;

pub use decode::{DecodeError, InstructionIterator};
pub use encode::EncodeError;

use super::opcode::Opcode;
use std::fmt;

/// Encoded length of every branch instruction: opcode byte plus a 16-bit offset.
///
/// Branch offsets are relative to the opcode byte, so once the decoder has
/// moved past the whole instruction the target is `pc + offset - BRANCH_LEN`.
pub const BRANCH_LEN: usize = 3;

/// Signed relational predicate used by the `if_icmp*` family
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    Eq,
    Ne,
    Lt,
    Ge,
    Gt,
    Le,
}

impl Condition {
    /// Evaluate `left <op> right`, where `right` is the value that was on top of the stack
    pub fn holds(self, left: i32, right: i32) -> bool {
        match self {
            Condition::Eq => left == right,
            Condition::Ne => left != right,
            Condition::Lt => left < right,
            Condition::Ge => left >= right,
            Condition::Gt => left > right,
            Condition::Le => left <= right,
        }
    }

    pub fn opcode(self) -> Opcode {
        match self {
            Condition::Eq => Opcode::IfIcmpeq,
            Condition::Ne => Opcode::IfIcmpne,
            Condition::Lt => Opcode::IfIcmplt,
            Condition::Ge => Opcode::IfIcmpge,
            Condition::Gt => Opcode::IfIcmpgt,
            Condition::Le => Opcode::IfIcmple,
        }
    }
}

/// Position information for an instruction in the code buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub offset: usize,
    pub length: usize,
}

impl ByteRange {
    pub fn end(&self) -> usize {
        self.offset + self.length
    }
}

/// A decoded instruction and where it came from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    pub kind: InstructionKind,
    pub position: ByteRange,
}

impl Instruction {
    /// Absolute target of a branch instruction, `None` for everything else.
    /// May lie outside the code buffer.
    pub fn branch_target(&self) -> Option<i64> {
        self.kind
            .branch_offset()
            .map(|offset| self.position.offset as i64 + i64::from(offset))
    }
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.kind)
    }
}

/// Algebraic data type representing every executable instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InstructionKind {
    Nop,
    /// `iconst_m1` through `iconst_5`; the value is always in `-1..=5`
    Iconst(i8),
    Bipush(i8),
    Sipush(i16),
    Iload(u8),
    /// `iload_0` through `iload_3`
    IloadN(u8),
    Istore(u8),
    /// `istore_0` through `istore_3`
    IstoreN(u8),
    Iadd,
    Isub,
    Imul,
    Idiv,
    Irem,
    Ineg,
    IfIcmp { cond: Condition, offset: i16 },
    Goto { offset: i16 },
    Ireturn,
    Return,
    Halt,
}

impl InstructionKind {
    pub fn opcode(&self) -> Opcode {
        use InstructionKind::*;
        match *self {
            Nop => Opcode::Nop,
            Iconst(-1) => Opcode::IconstM1,
            Iconst(0) => Opcode::Iconst0,
            Iconst(1) => Opcode::Iconst1,
            Iconst(2) => Opcode::Iconst2,
            Iconst(3) => Opcode::Iconst3,
            Iconst(4) => Opcode::Iconst4,
            Iconst(_) => Opcode::Iconst5,
            Bipush(_) => Opcode::Bipush,
            Sipush(_) => Opcode::Sipush,
            Iload(_) => Opcode::Iload,
            IloadN(0) => Opcode::Iload0,
            IloadN(1) => Opcode::Iload1,
            IloadN(2) => Opcode::Iload2,
            IloadN(_) => Opcode::Iload3,
            Istore(_) => Opcode::Istore,
            IstoreN(0) => Opcode::Istore0,
            IstoreN(1) => Opcode::Istore1,
            IstoreN(2) => Opcode::Istore2,
            IstoreN(_) => Opcode::Istore3,
            Iadd => Opcode::Iadd,
            Isub => Opcode::Isub,
            Imul => Opcode::Imul,
            Idiv => Opcode::Idiv,
            Irem => Opcode::Irem,
            Ineg => Opcode::Ineg,
            IfIcmp { cond, .. } => cond.opcode(),
            Goto { .. } => Opcode::Goto,
            Ireturn => Opcode::Ireturn,
            Return => Opcode::Return,
            Halt => Opcode::Halt,
        }
    }

    /// Encoded length including the opcode byte
    pub fn encoded_len(&self) -> usize {
        self.opcode().encoded_len()
    }

    /// Relative branch offset, for `if_icmp*` and `goto`
    pub fn branch_offset(&self) -> Option<i16> {
        match *self {
            InstructionKind::IfIcmp { offset, .. } | InstructionKind::Goto { offset } => Some(offset),
            _ => None,
        }
    }
}

impl fmt::Display for InstructionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use InstructionKind::*;
        let mnemonic = self.opcode().mnemonic();
        match *self {
            Bipush(v) => write!(f, "{mnemonic} {v}"),
            Sipush(v) => write!(f, "{mnemonic} {v}"),
            Iload(idx) | Istore(idx) => write!(f, "{mnemonic} {idx}"),
            IfIcmp { offset, .. } | Goto { offset } => write!(f, "{mnemonic} {offset}"),
            _ => f.write_str(mnemonic),
        }
    }
}
