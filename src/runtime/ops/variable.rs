//! Local variable operations

use super::{FaultKind, Frame, Stack};

/// iload, iload_<n>
/// 1. Read the local at index
/// 2. Push it to the stack
pub fn iload(stack: &mut Stack, frame: &Frame<'_>, idx: u8) -> Result<(), FaultKind> {
    let value = frame.local(idx)?;
    stack.push(value)
}

/// istore, istore_<n>
/// 1. Pop value from stack
/// 2. Replace the local at index with it
pub fn istore(stack: &mut Stack, frame: &mut Frame<'_>, idx: u8) -> Result<(), FaultKind> {
    let value = stack.pop()?;
    frame.set_local(idx, value)
}
