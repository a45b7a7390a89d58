//! Implementation limits for execution.
//!
//! The defaults match the fixed sizes the bytecode format was designed
//! around. Both capacities are fixed for the duration of an `execute` call.

/// Default operand stack capacity, in values
pub const DEFAULT_STACK_CAPACITY: usize = 1024;

/// Default number of local variable slots per frame.
///
/// Covers every index an `iload`/`istore` operand byte can name.
pub const DEFAULT_LOCALS_CAPACITY: usize = 256;

/// Capacities used by an [`Executor`](super::executor::Executor)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    pub stack_capacity: usize,
    pub locals_capacity: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            stack_capacity: DEFAULT_STACK_CAPACITY,
            locals_capacity: DEFAULT_LOCALS_CAPACITY,
        }
    }
}

impl Limits {
    pub fn with_stack_capacity(mut self, capacity: usize) -> Self {
        self.stack_capacity = capacity;
        self
    }

    pub fn with_locals_capacity(mut self, capacity: usize) -> Self {
        self.locals_capacity = capacity;
        self
    }
}
