pub mod serial;

use crate::error::{Error, Result};

pub use serial::SerialTransport;

/// A byte-oriented link to the device.
pub trait Transport {
    /// Unread inbound bytes, without blocking.
    fn bytes_available(&mut self) -> Result<usize>;

    /// Blocks up to the read timeout, then fails with `Error::Timeout`.
    fn read_byte(&mut self) -> Result<u8>;

    fn write_bytes(&mut self, data: &[u8]) -> Result<()>;

    /// Writes `text` as ASCII, refusing anything the device cannot display.
    fn write_text(&mut self, text: &str) -> Result<()> {
        let data = encode_ascii(text)?;
        self.write_bytes(&data)
    }
}

pub fn encode_ascii(text: &str) -> Result<Vec<u8>> {
    match text.chars().find(|ch| !ch.is_ascii()) {
        Some(ch) => Err(Error::Encoding { ch }),
        None => Ok(text.as_bytes().to_vec()),
    }
}
