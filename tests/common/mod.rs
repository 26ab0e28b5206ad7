//! Builder for in-memory pprof dumps.

#![allow(dead_code)]

use encoding_rs::{Encoding, UTF_16BE, UTF_16LE, UTF_8};
use std::io::Write;
use tempfile::NamedTempFile;

pub struct DumpBuilder {
    encoding: &'static Encoding,
    binary: String,
    symbols: Vec<(u64, String)>,
    words: Vec<u64>,
    signature: [u64; 5],
    terminated: bool,
    trailing: Vec<u8>,
}

impl DumpBuilder {
    pub fn new() -> Self {
        Self {
            encoding: UTF_8,
            binary: "/usr/local/bin/server".to_string(),
            symbols: Vec::new(),
            words: Vec::new(),
            signature: [0, 3, 0, 1, 0],
            terminated: true,
            trailing: Vec::new(),
        }
    }

    pub fn encoding(mut self, encoding: &'static Encoding) -> Self {
        self.encoding = encoding;
        self
    }

    pub fn binary(mut self, binary: &str) -> Self {
        self.binary = binary.to_string();
        self
    }

    pub fn symbol(mut self, address: u64, name: &str) -> Self {
        self.symbols.push((address, name.to_string()));
        self
    }

    /// Sample record with addresses leaf first
    pub fn sample(mut self, count: u64, addresses: &[u64]) -> Self {
        self.words.push(count);
        self.words.push(addresses.len() as u64);
        self.words.extend_from_slice(addresses);
        self
    }

    /// Raw words appended to the sample stream as-is
    pub fn words(mut self, words: &[u64]) -> Self {
        self.words.extend_from_slice(words);
        self
    }

    pub fn signature(mut self, signature: [u64; 5]) -> Self {
        self.signature = signature;
        self
    }

    pub fn unterminated(mut self) -> Self {
        self.terminated = false;
        self
    }

    pub fn trailing(mut self, bytes: &[u8]) -> Self {
        self.trailing.extend_from_slice(bytes);
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut out = Vec::new();

        out.extend(self.line("--- symbol"));
        out.extend(self.line(&format!("binary={}", self.binary)));
        for (address, name) in &self.symbols {
            out.extend(self.line(&format!("0x{:016x} {}", address, name)));
        }
        out.extend(self.line("---"));
        out.extend(self.line("--- profile"));

        for word in self.signature.iter().chain(self.words.iter()) {
            out.extend_from_slice(&word.to_le_bytes());
        }
        if self.terminated {
            for word in [0u64, 1, 0] {
                out.extend_from_slice(&word.to_le_bytes());
            }
        }
        out.extend_from_slice(&self.trailing);

        out
    }

    /// Write the dump to a temp file that lives as long as the handle
    pub fn write_temp(&self) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(&self.build()).unwrap();
        file.flush().unwrap();
        file
    }

    fn line(&self, text: &str) -> Vec<u8> {
        encode(self.encoding, &format!("{}\n", text))
    }
}

/// Encode `text`, spelling out UTF-16 which `encoding_rs` cannot produce
pub fn encode(encoding: &'static Encoding, text: &str) -> Vec<u8> {
    if encoding == UTF_16LE {
        text.encode_utf16().flat_map(|unit| unit.to_le_bytes()).collect()
    } else if encoding == UTF_16BE {
        text.encode_utf16().flat_map(|unit| unit.to_be_bytes()).collect()
    } else {
        encoding.encode(text).0.into_owned()
    }
}

/// Symbols main/foo/bar/read at 0x10/0x20/0x30/0x40
pub fn sample_symbols() -> DumpBuilder {
    DumpBuilder::new()
        .symbol(0x10, "main")
        .symbol(0x20, "foo")
        .symbol(0x30, "bar")
        .symbol(0x40, "read")
}
