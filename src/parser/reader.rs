//! Byte and line reader for the pprof dump.
//!
//! The dump mixes text lines with raw binary integers, so a plain
//! text reader cannot be used: bytes are pulled straight from the
//! source and only line content is run through the text decoder.
//!
//! Lines end with the chosen encoding's representation of `"\n"`,
//! which is one byte for ASCII-compatible charsets but two for
//! UTF-16. The terminator is computed once and then matched as
//! opaque bytes.

use crate::utils::error::{error_context, DecodeError};
use encoding_rs::{Encoding, UTF_16BE, UTF_16LE};
use std::io::{BufRead, ErrorKind, Read};

/// Byte representation of `"\n"` in `encoding`
///
/// `encoding_rs` only encodes into ASCII-compatible charsets (UTF-16
/// maps to UTF-8 on output), so the two UTF-16 byte orders are
/// spelled out here.
pub fn newline_bytes(encoding: &'static Encoding) -> Vec<u8> {
    if encoding == UTF_16LE {
        vec![b'\n', 0x00]
    } else if encoding == UTF_16BE {
        vec![0x00, b'\n']
    } else {
        let (bytes, _, _) = encoding.encode("\n");
        bytes.into_owned()
    }
}

/// Reader over a buffered byte source with encoding-aware line splitting
pub struct DelimitedReader<R> {
    inner: R,
    encoding: &'static Encoding,
    newline: Vec<u8>,
    offset: u64,
}

impl<R: BufRead> DelimitedReader<R> {
    pub fn new(inner: R, encoding: &'static Encoding) -> Self {
        Self {
            inner,
            encoding,
            newline: newline_bytes(encoding),
            offset: 0,
        }
    }

    pub fn encoding(&self) -> &'static Encoding {
        self.encoding
    }

    /// Byte offset of the next unread byte
    pub fn offset(&self) -> u64 {
        self.offset
    }

    /// Fill `buf` completely
    ///
    /// # Errors
    /// * `DecodeError::TruncatedInput` - source ended before `buf` was full
    pub fn read_exact(&mut self, buf: &mut [u8]) -> Result<(), DecodeError> {
        let len = buf.len();
        let mut filled = 0;

        while filled < len {
            match self.inner.read(&mut buf[filled..]) {
                Ok(0) => {
                    return Err(DecodeError::TruncatedInput {
                        offset: self.offset,
                        needed: len - filled,
                    })
                }
                Ok(read) => {
                    filled += read;
                    self.offset += read as u64;
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        }

        Ok(())
    }

    /// Read one line and decode it, terminator excluded
    ///
    /// The last `newline.len()` bytes act as a sliding window that is
    /// compared on every code-unit boundary, so a terminator straddling
    /// two UTF-16 code units is never mistaken for a line end.
    ///
    /// # Errors
    /// * `DecodeError::UnterminatedLine` - source ended before a terminator
    pub fn read_line(&mut self) -> Result<String, DecodeError> {
        let start = self.offset;
        let width = self.newline.len();
        let mut line = Vec::new();

        loop {
            let available = match self.inner.fill_buf() {
                Ok(buf) => buf,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            };

            if available.is_empty() {
                let (partial, _) = self.encoding.decode_without_bom_handling(&line);
                return Err(DecodeError::UnterminatedLine {
                    offset: start,
                    partial: error_context(&partial),
                });
            }

            let mut consumed = 0;
            let mut terminated = false;
            for &byte in available {
                consumed += 1;
                line.push(byte);
                if line.len() % width == 0 && line.ends_with(&self.newline) {
                    terminated = true;
                    break;
                }
            }

            self.inner.consume(consumed);
            self.offset += consumed as u64;

            if terminated {
                line.truncate(line.len() - width);
                let (text, _) = self.encoding.decode_without_bom_handling(&line);
                return Ok(text.into_owned());
            }
        }
    }
}
