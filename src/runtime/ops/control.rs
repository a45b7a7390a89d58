//! Control flow operations
//!
//! Branch offsets are relative to the branch's own opcode byte. The frame's
//! program counter has already advanced past the operands by the time these
//! run; [`Frame::branch`] accounts for that.

use super::{FaultKind, Frame, Stack, Value};
use crate::bytecode::Condition;
use crate::runtime::Termination;

/// What the dispatch loop does after an instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Fetch the instruction at the (possibly retargeted) program counter
    Continue,
    /// Leave the loop with this value
    Return(Termination, Value),
}

/// if_icmp<cond>
/// 1. Pop value c2 from stack
/// 2. Pop value c1 from stack
/// 3. If c1 <cond> c2, retarget by offset
///
/// Both operands are consumed whether or not the branch is taken.
pub fn if_icmp(stack: &mut Stack, frame: &mut Frame<'_>, cond: Condition, offset: i16) -> Result<Flow, FaultKind> {
    let (c1, c2) = stack.pop_pair()?;
    if cond.holds(c1.as_i32(), c2.as_i32()) {
        frame.branch(offset);
    }
    Ok(Flow::Continue)
}

/// goto
pub fn goto(frame: &mut Frame<'_>, offset: i16) -> Flow {
    frame.branch(offset);
    Flow::Continue
}

/// ireturn
/// 1. Pop value from stack
/// 2. Terminate with it
pub fn ireturn(stack: &mut Stack) -> Result<Flow, FaultKind> {
    let value = stack.pop()?;
    Ok(Flow::Return(Termination::Returned, value))
}

/// return
pub fn return_void() -> Flow {
    Flow::Return(Termination::ReturnedVoid, Value::ZERO)
}

/// halt
pub fn halt() -> Flow {
    Flow::Return(Termination::Halted, Value::ZERO)
}
