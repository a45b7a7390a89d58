//! The instruction encoding: opcodes, decoding, encoding, and the text
//! tooling built on top of it (disassembler and assembler).

pub mod asm;
pub mod disasm;
pub mod instruction;
pub mod opcode;
pub mod reader;

pub use instruction::{Condition, DecodeError, Instruction, InstructionKind};
pub use opcode::{Immediate, Opcode};
pub use reader::CodeReader;
