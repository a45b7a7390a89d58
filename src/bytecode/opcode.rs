//! Opcode byte values and their immediate layouts.
//!
//! The byte values follow the JVM encoding for the integer subset this
//! interpreter understands, plus `halt` at `0xFF`.

use once_cell::sync::Lazy;
use std::collections::HashMap;
use std::fmt;

/// Shape of the immediate operand that follows an opcode byte
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Immediate {
    /// No immediate
    None,
    /// Signed 8-bit literal
    I8,
    /// Signed 16-bit literal, most significant byte first
    I16,
    /// Unsigned 8-bit local variable index
    LocalIndex,
    /// Signed 16-bit branch offset, relative to the opcode byte
    BranchOffset,
}

impl Immediate {
    /// Number of bytes the immediate occupies after the opcode
    pub fn width(self) -> usize {
        match self {
            Immediate::None => 0,
            Immediate::I8 | Immediate::LocalIndex => 1,
            Immediate::I16 | Immediate::BranchOffset => 2,
        }
    }
}

macro_rules! opcodes {
    ($($name:ident = $byte:literal, $mnemonic:literal, $imm:ident;)*) => {
        /// Every opcode the decoder recognises
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        #[repr(u8)]
        pub enum Opcode {
            $($name = $byte,)*
        }

        impl Opcode {
            /// All opcodes in byte order
            pub const ALL: &'static [Opcode] = &[$(Opcode::$name,)*];

            /// Look up an opcode by its byte value
            pub fn from_byte(byte: u8) -> Option<Opcode> {
                match byte {
                    $($byte => Some(Opcode::$name),)*
                    _ => None,
                }
            }

            /// Assembly mnemonic
            pub fn mnemonic(self) -> &'static str {
                match self {
                    $(Opcode::$name => $mnemonic,)*
                }
            }

            /// Layout of the immediate that follows this opcode
            pub fn immediate(self) -> Immediate {
                match self {
                    $(Opcode::$name => Immediate::$imm,)*
                }
            }
        }
    };
}

opcodes! {
    Nop = 0x00, "nop", None;
    IconstM1 = 0x02, "iconst_m1", None;
    Iconst0 = 0x03, "iconst_0", None;
    Iconst1 = 0x04, "iconst_1", None;
    Iconst2 = 0x05, "iconst_2", None;
    Iconst3 = 0x06, "iconst_3", None;
    Iconst4 = 0x07, "iconst_4", None;
    Iconst5 = 0x08, "iconst_5", None;
    Bipush = 0x10, "bipush", I8;
    Sipush = 0x11, "sipush", I16;
    Iload = 0x15, "iload", LocalIndex;
    Iload0 = 0x1a, "iload_0", None;
    Iload1 = 0x1b, "iload_1", None;
    Iload2 = 0x1c, "iload_2", None;
    Iload3 = 0x1d, "iload_3", None;
    Istore = 0x36, "istore", LocalIndex;
    Istore0 = 0x3b, "istore_0", None;
    Istore1 = 0x3c, "istore_1", None;
    Istore2 = 0x3d, "istore_2", None;
    Istore3 = 0x3e, "istore_3", None;
    Iadd = 0x60, "iadd", None;
    Isub = 0x64, "isub", None;
    Imul = 0x68, "imul", None;
    Idiv = 0x6c, "idiv", None;
    Irem = 0x70, "irem", None;
    Ineg = 0x74, "ineg", None;
    IfIcmpeq = 0x9f, "if_icmpeq", BranchOffset;
    IfIcmpne = 0xa0, "if_icmpne", BranchOffset;
    IfIcmplt = 0xa1, "if_icmplt", BranchOffset;
    IfIcmpge = 0xa2, "if_icmpge", BranchOffset;
    IfIcmpgt = 0xa3, "if_icmpgt", BranchOffset;
    IfIcmple = 0xa4, "if_icmple", BranchOffset;
    Goto = 0xa7, "goto", BranchOffset;
    Ireturn = 0xac, "ireturn", None;
    Return = 0xb1, "return", None;
    Halt = 0xff, "halt", None;
}

static MNEMONICS: Lazy<HashMap<&'static str, Opcode>> =
    Lazy::new(|| Opcode::ALL.iter().map(|op| (op.mnemonic(), *op)).collect());

impl Opcode {
    /// Look up an opcode by its assembly mnemonic
    pub fn from_mnemonic(mnemonic: &str) -> Option<Opcode> {
        MNEMONICS.get(mnemonic).copied()
    }

    /// Byte value of this opcode
    pub fn byte(self) -> u8 {
        self as u8
    }

    /// Total encoded length including the opcode byte
    pub fn encoded_len(self) -> usize {
        1 + self.immediate().width()
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}
