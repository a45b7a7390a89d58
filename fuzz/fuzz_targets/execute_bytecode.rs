#![no_main]

use libfuzzer_sys::fuzz_target;

use stackvm::bytecode::disasm::disassemble;
use stackvm::runtime::{Executor, Limits};

fuzz_target!(|data: &[u8]| {
    // Backward branches make non-terminating programs trivial to write, so
    // only straight-line code is executed. Any byte sequence must still
    // disassemble without panicking.
    let _ = disassemble(data);

    let straight: Vec<u8> = data
        .iter()
        .map(|&b| if matches!(b, 0x9f..=0xa4 | 0xa7) { 0x00 } else { b })
        .collect();

    let mut executor = Executor::with_limits(Limits::default().with_stack_capacity(64));
    let first = executor.execute(&straight);
    let second = executor.execute(&straight);
    assert_eq!(first, second);
});
