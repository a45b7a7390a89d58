#![no_main]

use libfuzzer_sys::fuzz_target;

use stackvm::bytecode::asm::assemble;
use stackvm::bytecode::instruction::InstructionIterator;

fuzz_target!(|data: &[u8]| {
    let Ok(source) = std::str::from_utf8(data) else {
        return;
    };
    // Whatever assembles must decode cleanly
    if let Ok(code) = assemble(source) {
        for (offset, decoded) in InstructionIterator::new(&code) {
            assert!(decoded.is_ok(), "bad instruction at {offset}");
        }
    }
});
