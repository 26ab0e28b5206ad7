//! Fixed-width integer frames of the sample stream.
//!
//! Every integer in the profile section is a raw 8-byte little-endian
//! value, independent of the text encoding used for the line sections.

use super::reader::DelimitedReader;
use crate::utils::config::MAX_PREALLOCATED_FRAMES;
use crate::utils::error::DecodeError;
use byteorder::{ByteOrder, LittleEndian};
use std::io::BufRead;

/// Reads 64-bit little-endian integers from a byte source
pub trait FrameRead {
    /// Read one u64
    ///
    /// # Errors
    /// * `DecodeError::TruncatedInput` - fewer than 8 bytes left
    fn read_u64_le(&mut self) -> Result<u64, DecodeError>;

    /// Read `count` consecutive u64 values, failing on the first truncation
    fn read_u64_array(&mut self, count: usize) -> Result<Vec<u64>, DecodeError> {
        // count comes from the file; don't let it size the allocation
        let mut values = Vec::with_capacity(count.min(MAX_PREALLOCATED_FRAMES));
        for _ in 0..count {
            values.push(self.read_u64_le()?);
        }
        Ok(values)
    }
}

impl<R: BufRead> FrameRead for DelimitedReader<R> {
    fn read_u64_le(&mut self) -> Result<u64, DecodeError> {
        let mut bytes = [0u8; 8];
        self.read_exact(&mut bytes)?;
        Ok(LittleEndian::read_u64(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use encoding_rs::{UTF_16LE, UTF_8};
    use std::io::Cursor;

    fn words(values: &[u64]) -> Vec<u8> {
        values.iter().flat_map(|v| v.to_le_bytes()).collect()
    }

    #[test]
    fn test_read_u64_le() {
        let mut bytes = words(&[0x0102_0304_0506_0708]);
        bytes.extend(words(&[u64::MAX]));
        let mut reader = DelimitedReader::new(Cursor::new(bytes), UTF_8);

        assert_eq!(reader.read_u64_le().unwrap(), 0x0102_0304_0506_0708);
        assert_eq!(reader.read_u64_le().unwrap(), u64::MAX);
    }

    #[test]
    fn test_integers_ignore_text_encoding() {
        let mut reader = DelimitedReader::new(Cursor::new(words(&[42])), UTF_16LE);
        assert_eq!(reader.read_u64_le().unwrap(), 42);
    }

    #[test]
    fn test_read_u64_array() {
        let mut reader = DelimitedReader::new(Cursor::new(words(&[0, 3, 0, 1, 0])), UTF_8);
        assert_eq!(reader.read_u64_array(5).unwrap(), vec![0, 3, 0, 1, 0]);
        assert_eq!(reader.read_u64_array(0).unwrap(), Vec::<u64>::new());
    }

    #[test]
    fn test_truncated_u64() {
        let mut reader = DelimitedReader::new(Cursor::new(vec![1, 2, 3]), UTF_8);
        assert!(matches!(
            reader.read_u64_le(),
            Err(DecodeError::TruncatedInput { needed: 5, .. })
        ));
    }

    #[test]
    fn test_array_fails_fast_on_truncation() {
        let mut bytes = words(&[7, 8]);
        bytes.extend_from_slice(&[9, 9]);
        let mut reader = DelimitedReader::new(Cursor::new(bytes), UTF_8);

        assert!(matches!(
            reader.read_u64_array(usize::MAX),
            Err(DecodeError::TruncatedInput { offset: 18, needed: 6 })
        ));
    }
}
