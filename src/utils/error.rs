//! Error types for the entire application.
//!
//! We use `thiserror` for library-style errors with custom types,
//! and `anyhow` for application-level error propagation in main.rs and commands.

use super::config::MAX_ERROR_CONTEXT_CHARS;
use thiserror::Error;

/// Errors that can occur while decoding a pprof dump
///
/// Every variant is terminal: the decoder never resynchronizes.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Input truncated at byte {offset}: needed {needed} more bytes")]
    TruncatedInput { offset: u64, needed: usize },

    #[error("Line starting at byte {offset} has no terminating newline: '{partial}'")]
    UnterminatedLine { offset: u64, partial: String },

    #[error("Expected {expected}, got '{found}'")]
    MalformedHeader { expected: &'static str, found: String },

    #[error("Malformed symbol entry: '{line}'")]
    MalformedSymbolEntry { line: String },

    #[error("Malformed sample at byte {offset}: depth {depth}")]
    MalformedSample { offset: u64, depth: u64 },

    #[error("Sample at byte {offset} has count {count}, larger than 32 bits")]
    SampleCountOutOfRange { offset: u64, count: u64 },

    #[error("Expected profile signature {expected:?}, got {found:?}")]
    UnsupportedFormatVersion { expected: [u64; 5], found: [u64; 5] },

    #[error("Unsupported text encoding: {0}")]
    UnsupportedEncoding(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl DecodeError {
    pub(crate) fn malformed_header(expected: &'static str, found: &str) -> Self {
        DecodeError::MalformedHeader {
            expected,
            found: error_context(found),
        }
    }

    pub(crate) fn malformed_symbol(line: &str) -> Self {
        DecodeError::MalformedSymbolEntry {
            line: error_context(line),
        }
    }
}

/// Cut offending input down to what fits in an error message
pub(crate) fn error_context(text: &str) -> String {
    text.chars().take(MAX_ERROR_CONTEXT_CHARS).collect()
}

/// Errors that can occur during flamegraph generation
#[derive(Error, Debug)]
pub enum FlamegraphError {
    #[error("Failed to generate flamegraph: {0}")]
    GenerationFailed(String),

    #[error("Empty stack data")]
    EmptyStacks,
}

/// Errors that can occur during file output
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("Failed to write file: {0}")]
    WriteFailed(#[from] std::io::Error),

    #[error("Failed to serialize JSON: {0}")]
    SerializationFailed(#[from] serde_json::Error),

    #[error("Invalid output path: {0}")]
    InvalidPath(String),
}
