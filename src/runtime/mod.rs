//! Execution engine
//!
//! This module provides the interpreter: the value representation, the
//! bounded operand stack, the activation frame, the per-instruction
//! operations, and the dispatch loop that ties them together.

pub mod executor;
pub mod frame;
pub mod limits;
pub mod ops;
pub mod stack;
pub mod test_utils;
pub mod value;

pub use executor::Executor;
pub use frame::Frame;
pub use limits::Limits;
pub use stack::Stack;
pub use value::Value;

use crate::bytecode::instruction::DecodeError;
use crate::bytecode::Opcode;
use serde::Serialize;
use std::fmt;

/// Coarse grouping of fault kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FaultClass {
    Stack,
    Arithmetic,
    MalformedProgram,
}

/// Why execution stopped abnormally
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum FaultKind {
    #[error("stack overflow (capacity {capacity})")]
    StackOverflow { capacity: usize },
    #[error("stack underflow")]
    StackUnderflow,
    #[error("division by zero")]
    DivisionByZero,
    #[error("unknown opcode {opcode:#04x}")]
    UnknownOpcode { opcode: u8 },
    #[error("truncated operand for {mnemonic}: needed {needed} bytes, {available} available")]
    TruncatedOperand {
        mnemonic: &'static str,
        needed: usize,
        available: usize,
    },
    #[error("local variable {index} out of bounds (capacity {capacity})")]
    LocalOutOfBounds { index: u8, capacity: usize },
    #[error("program counter outside code of length {len}")]
    PcOutOfBounds { len: usize },
}

impl FaultKind {
    pub fn class(&self) -> FaultClass {
        match self {
            FaultKind::StackOverflow { .. } | FaultKind::StackUnderflow => FaultClass::Stack,
            FaultKind::DivisionByZero => FaultClass::Arithmetic,
            FaultKind::UnknownOpcode { .. }
            | FaultKind::TruncatedOperand { .. }
            | FaultKind::LocalOutOfBounds { .. }
            | FaultKind::PcOutOfBounds { .. } => FaultClass::MalformedProgram,
        }
    }
}

impl FaultKind {
    /// The fault for a failed decode in code of `code_len` bytes
    pub fn from_decode(e: DecodeError, code_len: usize) -> Self {
        match e {
            DecodeError::UnknownOpcode { opcode } => FaultKind::UnknownOpcode { opcode },
            DecodeError::TruncatedOperand { opcode, source } => FaultKind::TruncatedOperand {
                mnemonic: Opcode::mnemonic(opcode),
                needed: source.needed,
                available: source.available,
            },
            DecodeError::EndOfCode { .. } => FaultKind::PcOutOfBounds { len: code_len },
        }
    }
}

/// An engine fault together with the program counter of the instruction
/// that raised it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at pc={pc}")]
pub struct Fault {
    pub kind: FaultKind,
    pub pc: isize,
}

impl Fault {
    pub fn new(kind: FaultKind, pc: isize) -> Self {
        Fault { kind, pc }
    }

    pub fn class(&self) -> FaultClass {
        self.kind.class()
    }
}

/// How a successful execution ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// `ireturn` with a value
    Returned,
    /// `return`
    ReturnedVoid,
    /// `halt`
    Halted,
    /// Ran off the end of the code without a terminating instruction
    FellOff,
}

impl fmt::Display for Termination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Termination::Returned => "returned",
            Termination::ReturnedVoid => "returned void",
            Termination::Halted => "halted",
            Termination::FellOff => "reached end of code",
        })
    }
}

/// Result of an execution that did not fault
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Completion {
    pub value: Value,
    pub termination: Termination,
}

impl Completion {
    pub fn new(value: Value, termination: Termination) -> Self {
        Completion { value, termination }
    }

    /// The integer result code: the returned value, or 0 for every
    /// terminating path that carries no value
    pub fn code(&self) -> i32 {
        self.value.as_i32()
    }
}

/// Result code reported for any fault by [`result_code`]
pub const FAULT_CODE: i32 = -1;

/// Collapse an execution outcome to a single integer: the result code on
/// success, `-1` on any fault. A program can legitimately return `-1`, so this loses information.
pub fn result_code(outcome: &Result<Completion, Fault>) -> i32 {
    match outcome {
        Ok(completion) => completion.code(),
        Err(_) => FAULT_CODE,
    }
}
