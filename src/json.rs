use crate::language::Language;
use crate::position::{Span, span_to_positions};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A patch request as supplied by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchRequest {
    /// Correlation id echoed in the response; "auto" asks the tool to
    /// generate one
    pub execution_id: String,
    /// Expected BLAKE3 checksum of the target file before patching
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_checksum: Option<String>,
    /// Literal anchor for the block's start
    pub marker: String,
    /// Text spliced over the block, inserted verbatim
    pub replacement: String,
}

/// Line and column of a span endpoint, for JSON output
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PositionJson {
    pub line: usize,
    pub column: usize,
}

/// The replaced block's location in the pre-patch file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplacedBlockJson {
    /// Byte offset where the block started (marker included)
    pub byte_start: usize,
    /// Byte offset one past the block's closing brace
    pub byte_end: usize,
    /// Start of the block as line and column
    pub start: PositionJson,
    /// End of the block as line and column
    pub end: PositionJson,
}

impl ReplacedBlockJson {
    /// Build the location report for a span within the pre-patch content.
    pub fn from_span(content: &str, span: Span) -> Self {
        let (start, end) = span_to_positions(content, span);
        Self {
            byte_start: span.byte_start,
            byte_end: span.byte_end,
            start: PositionJson {
                line: start.line,
                column: start.column,
            },
            end: PositionJson {
                line: end.line,
                column: end.column,
            },
        }
    }
}

/// Outcome of a patch run, reported to the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PatchResponse {
    pub success: bool,
    pub execution_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<Language>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub replaced: Option<ReplacedBlockJson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub old_checksum: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub new_checksum: Option<String>,
    /// Byte offset shift introduced by the replacement
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_shift: Option<i64>,
    /// Whether the patched content was written back to the target file
    pub written: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PatchResponse {
    /// Build a response for a successfully applied patch.
    pub fn applied(
        execution_id: String,
        file: String,
        language: Language,
        replaced: ReplacedBlockJson,
        old_checksum: String,
        new_checksum: String,
        byte_shift: i64,
        written: bool,
    ) -> Self {
        Self {
            success: true,
            execution_id,
            file: Some(file),
            language: Some(language),
            replaced: Some(replaced),
            old_checksum: Some(old_checksum),
            new_checksum: Some(new_checksum),
            byte_shift: Some(byte_shift),
            written,
            error: None,
        }
    }

    /// Build a response for a failed run.
    pub fn failure(execution_id: String, error: String) -> Self {
        Self {
            success: false,
            execution_id,
            file: None,
            language: None,
            replaced: None,
            old_checksum: None,
            new_checksum: None,
            byte_shift: None,
            written: false,
            error: Some(error),
        }
    }
}

/// Generate a fresh execution id for requests that pass "auto".
pub fn generate_execution_id() -> String {
    format!("patch-{}", Uuid::new_v4())
}
