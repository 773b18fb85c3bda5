// Position tracking module
pub mod position;

// File operations module
pub mod file;

// Block replacement module
pub mod block;

// JSON request/response module
pub mod json;

// Language detection module
pub mod language;

// Re-exports
pub use position::{Position, Span, byte_to_position, span_to_positions};
pub use file::{FileContent, FileError, read_file, write_file};
pub use block::{
    Patch, PatchError, PatchOutcome,
    find_block_span, apply_patch, verify_checksum,
};
pub use json::{
    PatchRequest, PatchResponse, PositionJson, ReplacedBlockJson,
    generate_execution_id,
};
pub use language::{Language, detect_language};
