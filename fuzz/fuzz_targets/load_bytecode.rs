#![no_main]

use libfuzzer_sys::fuzz_target;

use stackvm::loader;

fuzz_target!(|data: &[u8]| {
    // We don't care about the result - we're looking for panics/crashes
    if let Ok(program) = loader::read_program(data) {
        assert_eq!(program.len(), program.header().code_length as usize);
    }
});
