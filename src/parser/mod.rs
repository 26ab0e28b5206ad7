//! Decoding of papertrail pprof dumps.
//!
//! This module handles:
//! - Byte and encoding-aware line reads
//! - Little-endian integer frames
//! - The symbol / profile section state machine
//! - The decoded data model

pub mod binary;
pub mod pprof_trace;
pub mod reader;
pub mod schema;

// Re-export main types
pub use binary::FrameRead;
pub use pprof_trace::{decode, decode_reader, resolve_encoding};
pub use reader::DelimitedReader;
pub use schema::{DecodedTrace, RawSample, SymbolTable};
