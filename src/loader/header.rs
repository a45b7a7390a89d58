//! Bytecode file header
//!
//! Fixed 16-byte little-endian prefix of every bytecode file:
//!
//! | Offset | Width | Field        |
//! |--------|-------|--------------|
//! | 0      | 4     | magic        |
//! | 4      | 2     | version      |
//! | 6      | 2     | (padding)    |
//! | 8      | 4     | code_length  |
//! | 12     | 4     | entry_point  |

use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::fmt;
use std::io::{self, Write};

pub const MAGIC: u32 = 0xCAFE_BABE;
/// Highest format version this loader accepts
pub const MAX_VERSION: u16 = 1;
pub const HEADER_LEN: usize = 16;

/// Header field a [`HeaderError`] is about
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderField {
    Magic,
    Version,
    Length,
}

impl fmt::Display for HeaderField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            HeaderField::Magic => "magic",
            HeaderField::Version => "version",
            HeaderField::Length => "code_length",
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum HeaderError {
    #[error("truncated header: {available} of 16 bytes")]
    Truncated { available: usize },
    #[error("invalid magic number: expected {expected:#010x}, got {actual:#010x}")]
    Magic { expected: u32, actual: u32 },
    #[error("unsupported version {version} (max supported: {max})")]
    Version { version: u16, max: u16 },
    #[error("declared code length {declared} does not match the {available} bytes present")]
    Length { declared: u64, available: u64 },
}

impl HeaderError {
    /// The field that failed, or `None` when the header was too short to
    /// read any field
    pub fn field(&self) -> Option<HeaderField> {
        match self {
            HeaderError::Truncated { .. } => None,
            HeaderError::Magic { .. } => Some(HeaderField::Magic),
            HeaderError::Version { .. } => Some(HeaderField::Version),
            HeaderError::Length { .. } => Some(HeaderField::Length),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BytecodeHeader {
    pub magic: u32,
    pub version: u16,
    pub code_length: u32,
    /// Recorded but unused; execution always starts at offset 0
    pub entry_point: u32,
}

impl BytecodeHeader {
    /// Header for a current-version file holding `code_length` bytes of code
    pub fn new(code_length: u32) -> Self {
        BytecodeHeader {
            magic: MAGIC,
            version: MAX_VERSION,
            code_length,
            entry_point: 0,
        }
    }

    /// Read the fields out of the first [`HEADER_LEN`] bytes. Does not
    /// validate them.
    pub fn parse(bytes: &[u8]) -> Result<Self, HeaderError> {
        if bytes.len() < HEADER_LEN {
            return Err(HeaderError::Truncated { available: bytes.len() });
        }
        Ok(BytecodeHeader {
            magic: LittleEndian::read_u32(&bytes[0..4]),
            version: LittleEndian::read_u16(&bytes[4..6]),
            code_length: LittleEndian::read_u32(&bytes[8..12]),
            entry_point: LittleEndian::read_u32(&bytes[12..16]),
        })
    }

    /// Check magic, then version
    pub fn validate(&self) -> Result<(), HeaderError> {
        if self.magic != MAGIC {
            return Err(HeaderError::Magic {
                expected: MAGIC,
                actual: self.magic,
            });
        }
        if self.version > MAX_VERSION {
            return Err(HeaderError::Version {
                version: self.version,
                max: MAX_VERSION,
            });
        }
        Ok(())
    }

    pub fn write_to<W: Write>(&self, writer: &mut W) -> io::Result<()> {
        writer.write_u32::<LittleEndian>(self.magic)?;
        writer.write_u16::<LittleEndian>(self.version)?;
        writer.write_u16::<LittleEndian>(0)?;
        writer.write_u32::<LittleEndian>(self.code_length)?;
        writer.write_u32::<LittleEndian>(self.entry_point)?;
        Ok(())
    }

    pub fn to_bytes(&self) -> [u8; HEADER_LEN] {
        let mut bytes = [0u8; HEADER_LEN];
        LittleEndian::write_u32(&mut bytes[0..4], self.magic);
        LittleEndian::write_u16(&mut bytes[4..6], self.version);
        LittleEndian::write_u32(&mut bytes[8..12], self.code_length);
        LittleEndian::write_u32(&mut bytes[12..16], self.entry_point);
        bytes
    }
}
