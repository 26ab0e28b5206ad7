//! Configuration and constants for the decoder and the CLI.

/// Current report schema version
pub const SCHEMA_VERSION: &str = "1.0.0";

// Section markers of the pprof dump. Each one is a full line.
pub const SYMBOL_HEADER: &str = "--- symbol";
pub const BINARY_PREFIX: &str = "binary=";
pub const SECTION_END: &str = "---";
pub const PROFILE_HEADER: &str = "--- profile";

/// The only profile header the decoder understands
pub const PROFILE_SIGNATURE: [u64; 5] = [0, 3, 0, 1, 0];

/// Sample record `(count, depth, first address)` that ends the sample stream
pub const END_OF_SAMPLES: (u64, u64, u64) = (0, 1, 0);

/// Offending input is cut to this many characters in error messages
pub const MAX_ERROR_CONTEXT_CHARS: usize = 128;

/// Location of the synthetic call tree root
pub const ROOT_LOCATION: &str = "<>";

/// Symbol used for addresses missing from the symbol table
pub const UNKNOWN_SYMBOL: &str = "<unknown>";

/// Upper bound for capacity reserved from an on-disk depth value
pub const MAX_PREALLOCATED_FRAMES: usize = 1024;

// CLI defaults
pub const DEFAULT_ENCODING: &str = "UTF-8";
pub const DEFAULT_TOP_ENTRIES: usize = 20;
pub const MAX_TOP_ENTRIES: usize = 1000;
pub const DEFAULT_FLAMEGRAPH_WIDTH: usize = 1200;
