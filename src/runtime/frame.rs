//! Activation frame
//!
//! Holds the locals and program counter for the single running activation,
//! along with a borrow of the code being executed.

use super::{FaultKind, Value};
use crate::bytecode::instruction::BRANCH_LEN;

const ADDRESSABLE_LOCALS: usize = u8::MAX as usize + 1;

/// Activation frame for one `execute` call
#[derive(Debug)]
pub struct Frame<'code> {
    /// Code buffer being executed
    code: &'code [u8],
    /// Byte offset of the next instruction. Signed because a branch may
    /// retarget before the start of the buffer; the next fetch reports it.
    pc: isize,
    /// Local variables, zero-initialised
    locals: Vec<Value>,
}

impl<'code> Frame<'code> {
    /// Slots past index 255 could never be addressed, so the capacity is
    /// clamped to that range.
    pub fn new(code: &'code [u8], locals_capacity: usize) -> Self {
        Frame {
            code,
            pc: 0,
            locals: vec![Value::ZERO; locals_capacity.min(ADDRESSABLE_LOCALS)],
        }
    }

    pub fn code(&self) -> &'code [u8] {
        self.code
    }

    pub fn pc(&self) -> isize {
        self.pc
    }

    pub fn set_pc(&mut self, pc: usize) {
        self.pc = pc as isize;
    }

    /// Whether the program counter sits exactly at the end of the code
    pub fn at_end(&self) -> bool {
        self.pc == self.code.len() as isize
    }

    /// The program counter as an index into the code, if it points inside it
    pub fn fetch_position(&self) -> Option<usize> {
        usize::try_from(self.pc).ok().filter(|&pc| pc < self.code.len())
    }

    /// Retarget after a taken branch.
    ///
    /// The decoder has already moved past the branch's opcode byte and its
    /// 16-bit offset, while the offset is relative to the opcode byte itself,
    /// hence the correction by the branch length.
    pub fn branch(&mut self, offset: i16) {
        self.pc = self.pc + offset as isize - BRANCH_LEN as isize;
    }

    pub fn local(&self, idx: u8) -> Result<Value, FaultKind> {
        self.locals
            .get(idx as usize)
            .copied()
            .ok_or(FaultKind::LocalOutOfBounds {
                index: idx,
                capacity: self.locals.len(),
            })
    }

    pub fn set_local(&mut self, idx: u8, value: Value) -> Result<(), FaultKind> {
        let capacity = self.locals.len();
        let slot = self
            .locals
            .get_mut(idx as usize)
            .ok_or(FaultKind::LocalOutOfBounds { index: idx, capacity })?;
        *slot = value;
        Ok(())
    }
}
