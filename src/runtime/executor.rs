//! Bytecode executor

use super::{
    frame::Frame,
    limits::Limits,
    ops::{self, control::Flow},
    stack::Stack,
    Completion, Fault, FaultKind, Termination, Value,
};
use crate::bytecode::{CodeReader, InstructionKind};
use tracing::debug;

/// Executes a code buffer to completion.
///
/// An executor owns its operand stack, which is reset at the start of every
/// [`execute`](Executor::execute) call. Taking `&mut self` there means a
/// single executor can only ever run one program at a time; independent
/// executors share nothing and may run on separate threads.
#[derive(Debug)]
pub struct Executor {
    stack: Stack,
    limits: Limits,
    /// Emit a trace event per executed instruction
    debug: bool,
}

impl Default for Executor {
    fn default() -> Self {
        Executor::new()
    }
}

impl Executor {
    pub fn new() -> Self {
        Executor::with_limits(Limits::default())
    }

    pub fn with_limits(limits: Limits) -> Self {
        Executor {
            stack: Stack::with_capacity(limits.stack_capacity),
            limits,
            debug: false,
        }
    }

    /// Toggle per-instruction tracing. Has no effect on results.
    pub fn set_debug(&mut self, debug: bool) {
        self.debug = debug;
    }

    pub fn debug(&self) -> bool {
        self.debug
    }

    pub fn limits(&self) -> Limits {
        self.limits
    }

    /// Operand stack as left by the most recent execution
    pub fn stack(&self) -> &Stack {
        &self.stack
    }

    /// Run `code` from offset 0 until it returns, halts, runs off the end or
    /// faults.
    ///
    /// A fault carries the offset of the instruction that raised it. For a
    /// branch that lands outside the code, that is the bad target itself,
    /// reported when it is fetched.
    pub fn execute(&mut self, code: &[u8]) -> Result<Completion, Fault> {
        self.stack.clear();
        let mut frame = Frame::new(code, self.limits.locals_capacity);

        debug!(
            code_len = code.len(),
            stack_capacity = self.limits.stack_capacity,
            locals_capacity = self.limits.locals_capacity,
            "executing"
        );

        let outcome = self.run(&mut frame);
        match &outcome {
            Ok(completion) => debug!(
                value = %completion.value,
                termination = %completion.termination,
                "execution finished"
            ),
            Err(fault) => debug!(%fault, class = ?fault.class(), "execution faulted"),
        }
        outcome
    }

    fn run(&mut self, frame: &mut Frame<'_>) -> Result<Completion, Fault> {
        loop {
            if frame.at_end() {
                return Ok(Completion::new(Value::ZERO, Termination::FellOff));
            }

            let pc = frame.pc();
            let position = frame.fetch_position().ok_or(Fault::new(
                FaultKind::PcOutOfBounds {
                    len: frame.code().len(),
                },
                pc,
            ))?;

            let code_len = frame.code().len();
            let mut reader = CodeReader::at(frame.code(), position);
            let kind = InstructionKind::decode(&mut reader)
                .map_err(|e| Fault::new(FaultKind::from_decode(e, code_len), pc))?;
            frame.set_pc(reader.pos());

            let flow = self.step(frame, kind).map_err(|kind| Fault::new(kind, pc))?;

            if self.debug {
                debug!(pc, instruction = %kind, stack = %self.stack, "step");
            }

            if let Flow::Return(termination, value) = flow {
                return Ok(Completion::new(value, termination));
            }
        }
    }

    fn step(&mut self, frame: &mut Frame<'_>, kind: InstructionKind) -> Result<Flow, FaultKind> {
        use InstructionKind::*;

        let stack = &mut self.stack;
        match kind {
            Nop => {}

            // Constants
            Iconst(n) | Bipush(n) => ops::numeric::push_const(stack, i32::from(n))?,
            Sipush(n) => ops::numeric::push_const(stack, i32::from(n))?,

            // Locals
            Iload(idx) | IloadN(idx) => ops::variable::iload(stack, frame, idx)?,
            Istore(idx) | IstoreN(idx) => ops::variable::istore(stack, frame, idx)?,

            // Arithmetic
            Iadd => ops::numeric::iadd(stack)?,
            Isub => ops::numeric::isub(stack)?,
            Imul => ops::numeric::imul(stack)?,
            Idiv => ops::numeric::idiv(stack)?,
            Irem => ops::numeric::irem(stack)?,
            Ineg => ops::numeric::ineg(stack)?,

            // Control
            IfIcmp { cond, offset } => return ops::control::if_icmp(stack, frame, cond, offset),
            Goto { offset } => return Ok(ops::control::goto(frame, offset)),
            Ireturn => return ops::control::ireturn(stack),
            Return => return Ok(ops::control::return_void()),
            Halt => return Ok(ops::control::halt()),
        }
        Ok(Flow::Continue)
    }
}
