//! Bytecode file loading and saving
//!
//! A bytecode file is a [`BytecodeHeader`] followed by exactly
//! `code_length` bytes of code. Loading either yields a complete
//! [`Program`] or an error; no partially read buffer is ever handed back.

pub mod header;

pub use header::{BytecodeHeader, HeaderError, HeaderField, HEADER_LEN, MAGIC, MAX_VERSION};

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Body bytes read per step; the buffer only grows as data arrives, so a
/// header declaring far more code than the source holds costs nothing
const READ_CHUNK: usize = 64 * 1024;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("cannot open {}: {source}", .path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot read bytecode: {0}")]
    Read(#[source] io::Error),
    #[error("invalid header: {0}")]
    HeaderInvalid(#[from] HeaderError),
    #[error("cannot allocate {bytes} bytes for bytecode")]
    Allocation { bytes: usize },
    #[error("truncated code: expected {expected} bytes, got {actual}")]
    TruncatedBody { expected: usize, actual: usize },
}

impl LoadError {
    /// Whether the failure came from the source rather than its contents
    pub fn is_io_failure(&self) -> bool {
        matches!(
            self,
            LoadError::Open { .. } | LoadError::Read(_) | LoadError::Allocation { .. }
        )
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("cannot create {}: {source}", .path.display())]
    Create {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("cannot write bytecode: {0}")]
    Write(#[from] io::Error),
    #[error("code of {len} bytes does not fit a 32-bit length field")]
    TooLarge { len: usize },
}

/// A validated header together with its code
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    header: BytecodeHeader,
    code: Vec<u8>,
}

impl Program {
    pub fn header(&self) -> &BytecodeHeader {
        &self.header
    }

    pub fn code(&self) -> &[u8] {
        &self.code
    }

    pub fn len(&self) -> usize {
        self.code.len()
    }

    pub fn is_empty(&self) -> bool {
        self.code.is_empty()
    }

    pub fn into_code(self) -> Vec<u8> {
        self.code
    }
}

/// Read a header and body from `reader`.
///
/// The source must hold exactly the declared number of code bytes: fewer is
/// [`LoadError::TruncatedBody`], more is a length mismatch in the header.
pub fn read_program<R: Read>(mut reader: R) -> Result<Program, LoadError> {
    let mut raw = Vec::with_capacity(HEADER_LEN);
    reader
        .by_ref()
        .take(HEADER_LEN as u64)
        .read_to_end(&mut raw)
        .map_err(LoadError::Read)?;
    let header = BytecodeHeader::parse(&raw)?;
    header.validate()?;

    let expected = header.code_length as usize;
    let mut code = Vec::new();
    while code.len() < expected {
        let want = (expected - code.len()).min(READ_CHUNK);
        code.try_reserve(want)
            .map_err(|_| LoadError::Allocation { bytes: expected })?;
        let read = reader
            .by_ref()
            .take(want as u64)
            .read_to_end(&mut code)
            .map_err(LoadError::Read)?;
        if read < want {
            break;
        }
    }
    if code.len() < expected {
        return Err(LoadError::TruncatedBody {
            expected,
            actual: code.len(),
        });
    }

    let trailing = io::copy(&mut reader, &mut io::sink()).map_err(LoadError::Read)?;
    if trailing > 0 {
        return Err(HeaderError::Length {
            declared: u64::from(header.code_length),
            available: u64::from(header.code_length) + trailing,
        }
        .into());
    }

    debug!(len = expected, version = header.version, "loaded bytecode");
    Ok(Program { header, code })
}

/// Load a bytecode file from disk
pub fn load<P: AsRef<Path>>(path: P) -> Result<Program, LoadError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    read_program(BufReader::new(file))
}

/// Write a current-version header followed by `code`
pub fn write_program<W: Write>(writer: &mut W, code: &[u8]) -> Result<(), SaveError> {
    let code_length = u32::try_from(code.len()).map_err(|_| SaveError::TooLarge { len: code.len() })?;
    BytecodeHeader::new(code_length).write_to(writer)?;
    writer.write_all(code)?;
    Ok(())
}

/// Save `code` as a bytecode file at `path`, replacing any existing file
pub fn save<P: AsRef<Path>>(path: P, code: &[u8]) -> Result<(), SaveError> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|source| SaveError::Create {
        path: path.to_path_buf(),
        source,
    })?;
    let mut writer = BufWriter::new(file);
    write_program(&mut writer, code)?;
    writer.flush()?;
    debug!(len = code.len(), path = %path.display(), "saved bytecode");
    Ok(())
}
