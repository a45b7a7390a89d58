//! Bounds-checked cursor over a borrowed code buffer

use byteorder::{BigEndian, ByteOrder};
use thiserror::Error;

/// A read ran past the end of the code buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("needed {needed} bytes at offset {offset}, {available} available")]
pub struct UnexpectedEnd {
    pub offset: usize,
    pub needed: usize,
    pub available: usize,
}

pub struct CodeReader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> CodeReader<'a> {
    pub fn new(bytes: &'a [u8]) -> CodeReader<'a> {
        CodeReader { bytes, pos: 0 }
    }

    /// Start reading at `pos`. A position past the end is allowed; every
    /// subsequent read reports [`UnexpectedEnd`].
    pub fn at(bytes: &'a [u8], pos: usize) -> CodeReader<'a> {
        CodeReader { bytes, pos }
    }
}

impl<'a> CodeReader<'a> {
    // Basic operations --------------------------------------------------------
    pub fn pos(&self) -> usize {
        self.pos
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn remaining(&self) -> usize {
        self.bytes.len().saturating_sub(self.pos)
    }

    pub fn has_at_least(&self, count: usize) -> bool {
        self.remaining() >= count
    }

    pub fn is_eof(&self) -> bool {
        self.remaining() == 0
    }

    /// Borrow the next `len` bytes and advance past them
    pub fn read_bytes(&mut self, len: usize) -> Result<&'a [u8], UnexpectedEnd> {
        if !self.has_at_least(len) {
            return Err(UnexpectedEnd {
                offset: self.pos,
                needed: len,
                available: self.remaining(),
            });
        }
        let slice = &self.bytes[self.pos..self.pos + len];
        self.pos += len;
        Ok(slice)
    }

    // Read and interpret types ------------------------------------------------

    pub fn read_u8(&mut self) -> Result<u8, UnexpectedEnd> {
        Ok(self.read_bytes(1)?[0])
    }

    pub fn read_i8(&mut self) -> Result<i8, UnexpectedEnd> {
        Ok(self.read_u8()? as i8)
    }

    // be
    pub fn read_i16(&mut self) -> Result<i16, UnexpectedEnd> {
        Ok(BigEndian::read_i16(self.read_bytes(2)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reads_advance_position() {
        let mut reader = CodeReader::new(&[0x10, 0xff, 0x12, 0x34]);
        assert_eq!(reader.read_u8().unwrap(), 0x10);
        assert_eq!(reader.read_i8().unwrap(), -1);
        assert_eq!(reader.pos(), 2);
        assert_eq!(reader.read_i16().unwrap(), 0x1234);
        assert!(reader.is_eof());
    }

    #[test]
    fn i16_is_big_endian_and_signed() {
        let mut reader = CodeReader::new(&[0xff, 0xfd]);
        assert_eq!(reader.read_i16().unwrap(), -3);
    }

    #[test]
    fn short_read_does_not_advance() {
        let mut reader = CodeReader::at(&[0x11, 0x01], 1);
        let err = reader.read_i16().unwrap_err();
        assert_eq!(
            err,
            UnexpectedEnd {
                offset: 1,
                needed: 2,
                available: 1
            }
        );
        assert_eq!(reader.pos(), 1);
    }

    #[test]
    fn position_past_end() {
        let mut reader = CodeReader::at(&[0x00], 5);
        assert_eq!(reader.remaining(), 0);
        assert!(reader.read_u8().is_err());
    }
}
