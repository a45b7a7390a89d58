//! Bounded operand stack

use super::{FaultKind, Value};
use std::fmt;

/// The operand stack.
///
/// The stack never grows past `capacity` values: a push onto a full stack
/// is a [`FaultKind::StackOverflow`] and a pop from an empty one is a
/// [`FaultKind::StackUnderflow`].
#[derive(Debug)]
pub struct Stack {
    values: Vec<Value>,
    capacity: usize,
}

impl Stack {
    /// Create an empty stack holding at most `capacity` values
    pub fn with_capacity(capacity: usize) -> Self {
        Stack {
            values: Vec::with_capacity(capacity.min(super::limits::DEFAULT_STACK_CAPACITY)),
            capacity,
        }
    }

    /// Push a value onto the stack
    pub fn push(&mut self, value: Value) -> Result<(), FaultKind> {
        if self.values.len() >= self.capacity {
            return Err(FaultKind::StackOverflow {
                capacity: self.capacity,
            });
        }
        self.values.push(value);
        Ok(())
    }

    /// Pop a value from the stack
    pub fn pop(&mut self) -> Result<Value, FaultKind> {
        self.values.pop().ok_or(FaultKind::StackUnderflow)
    }

    /// Pop the right operand then the left operand of a binary instruction,
    /// returning them as `(left, right)`
    pub fn pop_pair(&mut self) -> Result<(Value, Value), FaultKind> {
        let right = self.pop()?;
        let left = self.pop()?;
        Ok((left, right))
    }

    /// Get the current stack depth
    pub fn depth(&self) -> usize {
        self.values.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Check if the stack is empty
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Clear the stack
    pub fn clear(&mut self) {
        self.values.clear();
    }

    /// Peek at the top value without popping
    pub fn peek(&self) -> Option<Value> {
        self.values.last().copied()
    }

    /// Values from bottom to top
    pub fn as_slice(&self) -> &[Value] {
        &self.values
    }
}

/// Renders as `[bottom, ..., top]`
impl fmt::Display for Stack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, value) in self.values.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{value}")?;
        }
        f.write_str("]")
    }
}
