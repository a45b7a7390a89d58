//! Common test utilities shared between integration tests

#![allow(dead_code)]

use std::io::Write;
use std::sync::{Arc, Mutex};

/// Captured writer that stores output for testing
#[derive(Clone, Default)]
pub struct CapturedWriter(pub Arc<Mutex<Vec<u8>>>);

impl CapturedWriter {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a debug-level subscriber writing plain text into the
/// returned writer
pub fn with_captured_trace<T>(f: impl FnOnce() -> T) -> (T, CapturedWriter) {
    let writer = CapturedWriter::default();
    let sink = writer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .with_writer(move || sink.clone())
        .finish();
    let result = tracing::subscriber::with_default(subscriber, f);
    (result, writer)
}
