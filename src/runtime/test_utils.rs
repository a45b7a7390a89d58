//! Test utilities for runtime testing
//!
//! This module provides test helpers that can be used by any runtime test
//! without creating circular dependencies.

#[cfg(test)]
pub mod test {
    use crate::bytecode::instruction::encode::encode_all;
    use crate::bytecode::InstructionKind;
    use crate::runtime::executor::Executor;
    use crate::runtime::{Completion, Fault, FaultKind, Limits, Termination, Value};

    /// Test builder for creating executor tests fluently
    pub struct ProgramTest {
        instructions: Vec<InstructionKind>,
        limits: Limits,
        debug: bool,
    }

    impl ProgramTest {
        pub fn new() -> Self {
            ProgramTest {
                instructions: Vec::new(),
                limits: Limits::default(),
                debug: false,
            }
        }

        pub fn inst(mut self, kind: InstructionKind) -> Self {
            self.instructions.push(kind);
            self
        }

        /// Append instructions that leave `value` on the stack. Values that
        /// don't fit `sipush` are built as `hi * 65536 + lo`.
        pub fn push(self, value: i32) -> Self {
            if let Ok(short) = i16::try_from(value) {
                return self.inst(InstructionKind::Sipush(short));
            }
            let lo = value as i16;
            let hi = (value.wrapping_sub(i32::from(lo)) >> 16) as i16;
            self.inst(InstructionKind::Sipush(hi))
                .inst(InstructionKind::Sipush(256))
                .inst(InstructionKind::Imul)
                .inst(InstructionKind::Sipush(256))
                .inst(InstructionKind::Imul)
                .inst(InstructionKind::Sipush(lo))
                .inst(InstructionKind::Iadd)
        }

        pub fn limits(mut self, limits: Limits) -> Self {
            self.limits = limits;
            self
        }

        pub fn debug(mut self) -> Self {
            self.debug = true;
            self
        }

        fn run(&self) -> (Executor, Result<Completion, Fault>) {
            let code = encode_all(&self.instructions).expect("test program should encode");
            let mut executor = Executor::with_limits(self.limits);
            executor.set_debug(self.debug);
            let outcome = executor.execute(&code);
            (executor, outcome)
        }

        /// Run to completion and check the values left on the stack
        pub fn expect_stack(self, expected: Vec<i32>) {
            let (executor, outcome) = self.run();
            if let Err(fault) = outcome {
                panic!("Execution failed: {fault}");
            }
            let actual: Vec<i32> = executor.stack().as_slice().iter().map(|v| v.as_i32()).collect();
            assert_eq!(actual, expected, "Stack mismatch");
        }

        pub fn expect_completion(self, value: i32, termination: Termination) {
            let (_, outcome) = self.run();
            match outcome {
                Ok(completion) => assert_eq!(completion, Completion::new(Value::new(value), termination)),
                Err(fault) => panic!("Execution failed: {fault}"),
            }
        }

        /// Run and check the result code, however the program terminated
        pub fn expect_value(self, value: i32) {
            let (_, outcome) = self.run();
            match outcome {
                Ok(completion) => assert_eq!(completion.code(), value, "Result mismatch"),
                Err(fault) => panic!("Execution failed: {fault}"),
            }
        }

        pub fn expect_fault(self, kind: FaultKind, pc: isize) {
            let (_, outcome) = self.run();
            match outcome {
                Ok(completion) => panic!(
                    "Expected {kind} at pc={pc}, but execution {} with {}",
                    completion.termination, completion.value
                ),
                Err(fault) => assert_eq!(fault, Fault::new(kind, pc)),
            }
        }
    }

    #[test]
    fn push_builds_wide_values() {
        for value in [i32::MAX, i32::MIN, 0x7fff_8000, -32769, 65536, 32768] {
            ProgramTest::new().push(value).expect_stack(vec![value]);
        }
    }

    #[test]
    fn debug_does_not_change_outcome() {
        ProgramTest::new()
            .debug()
            .inst(InstructionKind::Iconst(2))
            .inst(InstructionKind::Iconst(3))
            .inst(InstructionKind::Iadd)
            .inst(InstructionKind::Ireturn)
            .expect_value(5);
    }
}
