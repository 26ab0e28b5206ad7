//! Decoder for papertrail pprof dumps.
//!
//! A dump has three parts:
//!
//! ```text
//! --- symbol
//! binary=<path>
//! 0x<16 hex digits> <symbol>      (repeated)
//! ---
//! --- profile
//! <5 x u64 LE: 0 3 0 1 0>
//! <count> <depth> <addr>{depth}   (repeated, u64 LE)
//! 0 1 0                           (end of samples)
//! ```
//!
//! The text lines use the caller's charset; the integers are always raw
//! little-endian. Decoding fails on the first structural violation.

use super::binary::FrameRead;
use super::reader::DelimitedReader;
use super::schema::{DecodedTrace, RawSample, SymbolTable};
use crate::utils::config::{
    BINARY_PREFIX, END_OF_SAMPLES, PROFILE_HEADER, PROFILE_SIGNATURE, SECTION_END,
    SYMBOL_HEADER,
};
use crate::utils::error::DecodeError;
use encoding_rs::{Encoding, REPLACEMENT};
use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// Position of the decoder within the dump
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum DecoderState {
    ExpectSymbolHeader,
    ReadingSymbols,
    ExpectProfileHeader,
    ReadingSamples,
    Done,
}

/// Look up a charset by its label (`"UTF-8"`, `"windows-1252"`, `"utf-16le"`, ...)
///
/// # Errors
/// * `DecodeError::UnsupportedEncoding` - label is unknown
pub fn resolve_encoding(label: &str) -> Result<&'static Encoding, DecodeError> {
    match Encoding::for_label(label.trim().as_bytes()) {
        // the replacement charset decodes everything to U+FFFD
        Some(encoding) if encoding != REPLACEMENT => Ok(encoding),
        _ => Err(DecodeError::UnsupportedEncoding(label.to_string())),
    }
}

/// Decode the dump at `path`, reading its text sections as `encoding_label`
///
/// **Public** - main entry point for decoding
///
/// The file handle lives only for the duration of this call.
///
/// # Errors
/// * `DecodeError::UnsupportedEncoding` - unknown charset label
/// * `DecodeError::Io` - file cannot be opened or read
/// * any structural error from [`decode_reader`]
pub fn decode(path: impl AsRef<Path>, encoding_label: &str) -> Result<DecodedTrace, DecodeError> {
    let path = path.as_ref();
    let encoding = resolve_encoding(encoding_label)?;

    debug!("Decoding {} as {}", path.display(), encoding.name());

    let file = File::open(path)?;
    decode_reader(BufReader::new(file), encoding)
}

/// Decode a dump from any buffered byte source
///
/// # Errors
/// * `DecodeError::MalformedHeader` - a section marker line does not match
/// * `DecodeError::MalformedSymbolEntry` - bad line in the symbol section
/// * `DecodeError::UnsupportedFormatVersion` - profile signature mismatch
/// * `DecodeError::MalformedSample` - sample record without frames
/// * `DecodeError::SampleCountOutOfRange` - count does not fit in 32 bits
/// * `DecodeError::TruncatedInput` / `DecodeError::UnterminatedLine` - early EOF
pub fn decode_reader<R: BufRead>(
    reader: R,
    encoding: &'static Encoding,
) -> Result<DecodedTrace, DecodeError> {
    TraceDecoder::new(reader, encoding).run()
}

struct TraceDecoder<R> {
    reader: DelimitedReader<R>,
    state: DecoderState,
    binary: String,
    symbols: SymbolTable,
    samples: Vec<RawSample>,
    unresolved: usize,
}

impl<R: BufRead> TraceDecoder<R> {
    fn new(reader: R, encoding: &'static Encoding) -> Self {
        Self {
            reader: DelimitedReader::new(reader, encoding),
            state: DecoderState::ExpectSymbolHeader,
            binary: String::new(),
            symbols: SymbolTable::new(),
            samples: Vec::new(),
            unresolved: 0,
        }
    }

    fn run(mut self) -> Result<DecodedTrace, DecodeError> {
        while self.state != DecoderState::Done {
            self.state = match self.state {
                DecoderState::ExpectSymbolHeader => self.read_symbol_header()?,
                DecoderState::ReadingSymbols => self.read_symbol_entry()?,
                DecoderState::ExpectProfileHeader => self.read_profile_header()?,
                DecoderState::ReadingSamples => self.read_sample()?,
                DecoderState::Done => DecoderState::Done,
            };
        }

        debug!(
            "Decoded {} samples ({} unresolved addresses) ending at byte {}",
            self.samples.len(),
            self.unresolved,
            self.reader.offset()
        );

        Ok(DecodedTrace {
            binary: self.binary,
            encoding: self.reader.encoding().name().to_string(),
            symbols: self.symbols,
            samples: self.samples,
        })
    }

    fn read_symbol_header(&mut self) -> Result<DecoderState, DecodeError> {
        let line = self.reader.read_line()?;
        if line != SYMBOL_HEADER {
            return Err(DecodeError::malformed_header("'--- symbol'", &line));
        }

        let line = self.reader.read_line()?;
        match line.strip_prefix(BINARY_PREFIX) {
            Some(binary) => self.binary = binary.to_string(),
            None => {
                return Err(DecodeError::malformed_header(
                    "line starting with 'binary='",
                    &line,
                ))
            }
        }

        debug!("Profiled binary: {}", self.binary);
        Ok(DecoderState::ReadingSymbols)
    }

    fn read_symbol_entry(&mut self) -> Result<DecoderState, DecodeError> {
        let line = self.reader.read_line()?;
        if line == SECTION_END {
            debug!("Read {} symbols", self.symbols.len());
            return Ok(DecoderState::ExpectProfileHeader);
        }

        let (address, symbol) =
            parse_symbol_line(&line).ok_or_else(|| DecodeError::malformed_symbol(&line))?;
        self.symbols.insert(address, symbol);

        Ok(DecoderState::ReadingSymbols)
    }

    fn read_profile_header(&mut self) -> Result<DecoderState, DecodeError> {
        let line = self.reader.read_line()?;
        if line != PROFILE_HEADER {
            return Err(DecodeError::malformed_header("'--- profile'", &line));
        }

        let mut signature = [0u64; 5];
        for slot in signature.iter_mut() {
            *slot = self.reader.read_u64_le()?;
        }
        if signature != PROFILE_SIGNATURE {
            return Err(DecodeError::UnsupportedFormatVersion {
                expected: PROFILE_SIGNATURE,
                found: signature,
            });
        }

        Ok(DecoderState::ReadingSamples)
    }

    fn read_sample(&mut self) -> Result<DecoderState, DecodeError> {
        let offset = self.reader.offset();
        let count = self.reader.read_u64_le()?;
        let depth = self.reader.read_u64_le()?;
        let first_address = self.reader.read_u64_le()?;

        if (count, depth, first_address) == END_OF_SAMPLES {
            return Ok(DecoderState::Done);
        }

        let count = u32::try_from(count)
            .map_err(|_| DecodeError::SampleCountOutOfRange { offset, count })?;
        let remaining = usize::try_from(depth)
            .ok()
            .and_then(|depth| depth.checked_sub(1))
            .ok_or(DecodeError::MalformedSample { offset, depth })?;
        let addresses = self.reader.read_u64_array(remaining)?;

        let frames = self.resolve_frames(first_address, &addresses);
        self.samples.push(RawSample::new(count, frames));

        Ok(DecoderState::ReadingSamples)
    }

    /// Resolve a leaf-first address list, dropping a symbol equal to the one before it
    fn resolve_frames(&mut self, first_address: u64, addresses: &[u64]) -> Vec<String> {
        let mut frames: Vec<String> = Vec::with_capacity(addresses.len() + 1);
        frames.push(self.resolve(first_address).to_string());

        for &address in addresses {
            let symbol = self.resolve(address);
            if frames.last().map(String::as_str) != Some(symbol) {
                frames.push(symbol.to_string());
            }
        }

        frames
    }

    fn resolve(&mut self, address: u64) -> &str {
        if self.symbols.get(address).is_none() {
            self.unresolved += 1;
        }
        self.symbols.resolve(address)
    }
}

/// `0x<16 hex digits><whitespace><symbol>`; the symbol runs to the end of
/// the line and may not contain a line break character
static SYMBOL_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^0x([0-9a-fA-F]{16})[ \t\n\x0B\x0C\r]+([^\r\n\x{85}\x{2028}\x{2029}]*)$")
        .expect("symbol line pattern is valid")
});

/// Split a symbol entry into address and symbol
fn parse_symbol_line(line: &str) -> Option<(u64, String)> {
    let caps = SYMBOL_LINE.captures(line)?;
    let address = u64::from_str_radix(&caps[1], 16).ok()?;
    Some((address, caps[2].to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_symbol_line() {
        assert_eq!(
            parse_symbol_line("0x00000000004005d0 main"),
            Some((0x4005d0, "main".to_string()))
        );
        assert_eq!(
            parse_symbol_line("0xFFFFFFFFFFFFFFFF\t\tstd::vector<int>::push_back(int const&)"),
            Some((u64::MAX, "std::vector<int>::push_back(int const&)".to_string()))
        );
    }

    #[test]
    fn test_parse_symbol_line_keeps_inner_whitespace() {
        assert_eq!(
            parse_symbol_line("0x0000000000000001   operator new (unsigned long) "),
            Some((1, "operator new (unsigned long) ".to_string()))
        );
    }

    #[test]
    fn test_parse_symbol_line_allows_empty_symbol() {
        assert_eq!(
            parse_symbol_line("0x0000000000000001 "),
            Some((1, String::new()))
        );
    }

    #[test]
    fn test_parse_symbol_line_rejects_line_breaks_in_symbol() {
        assert_eq!(parse_symbol_line("0x0000000000000001 main\r"), None);
        assert_eq!(parse_symbol_line("0x0000000000000001 ma\u{2028}in"), None);
        assert_eq!(
            parse_symbol_line("0x0000000000000001 \r"),
            Some((1, String::new()))
        );
    }

    #[test]
    fn test_parse_symbol_line_rejects() {
        assert_eq!(parse_symbol_line(""), None);
        assert_eq!(parse_symbol_line("0x1234 short"), None);
        assert_eq!(parse_symbol_line("0x000000000000000g main"), None);
        assert_eq!(parse_symbol_line("0x0000000000000001main"), None);
        assert_eq!(parse_symbol_line("0x00000000000000010 main"), None);
        assert_eq!(parse_symbol_line("00000000000000001 main"), None);
        assert_eq!(parse_symbol_line("0x00000000000000ü1 main"), None);
    }

    #[test]
    fn test_resolve_encoding() {
        assert_eq!(resolve_encoding("UTF-8").unwrap(), encoding_rs::UTF_8);
        assert_eq!(resolve_encoding(" utf8 ").unwrap(), encoding_rs::UTF_8);
        assert_eq!(resolve_encoding("UTF-16LE").unwrap(), encoding_rs::UTF_16LE);
        assert_eq!(resolve_encoding("latin1").unwrap(), encoding_rs::WINDOWS_1252);
        assert_eq!(resolve_encoding("ISO-8859-1").unwrap(), encoding_rs::WINDOWS_1252);
        assert_eq!(resolve_encoding("UTF-16").unwrap(), encoding_rs::UTF_16LE);
        assert!(matches!(
            resolve_encoding("klingon"),
            Err(DecodeError::UnsupportedEncoding(label)) if label == "klingon"
        ));
        assert!(resolve_encoding("iso-2022-kr").is_err());
    }
}
