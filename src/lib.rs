//! A small stack-machine interpreter for 32-bit integer bytecode.
//!
//! stackvm executes a compact instruction set using JVM opcode numbering:
//! integer constants, local variables, wrapping arithmetic, compare-and-branch,
//! and return. Programs run in a single frame against a bounded operand stack,
//! and every malformed or misbehaving program ends in a typed [`runtime::Fault`]
//! instead of undefined behaviour.
//!
//! # Modules
//!
//! - [`bytecode`] -- Opcode table, instruction decoder/encoder, assembler and disassembler.
//! - [`runtime`] -- The executor, its operand stack and frame, and the fault taxonomy.
//! - [`loader`] -- Reading and writing bytecode files with a versioned header.
//!
//! # Example
//!
//! Assemble a snippet and run it:
//!
//! ```
//! use stackvm::bytecode::asm::assemble;
//! use stackvm::runtime::{Executor, Termination};
//!
//! let code = assemble("
//!     iconst_5
//!     iconst_3
//!     iconst_2
//!     imul
//!     iadd
//!     ireturn
//! ").unwrap();
//!
//! let mut executor = Executor::new();
//! let completion = executor.execute(&code).unwrap();
//! assert_eq!(completion.code(), 11);
//! assert_eq!(completion.termination, Termination::Returned);
//! ```

pub mod bytecode;
pub mod loader;
pub mod runtime;
