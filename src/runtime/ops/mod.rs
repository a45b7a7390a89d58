//! Instruction semantics
//!
//! One function per instruction (or instruction family), organised by
//! category. Each operates on the stack and frame it is handed and reports
//! faults as a bare [`FaultKind`]; the executor attaches the program counter.

pub mod control;
pub mod numeric;
pub mod variable;

// Re-export commonly used types for operation implementations
pub(crate) use crate::runtime::frame::Frame;
pub(crate) use crate::runtime::stack::Stack;
pub(crate) use crate::runtime::{FaultKind, Value};
