use crate::position::Span;
use thiserror::Error;

/// A single block replacement: a literal marker anchoring the block's start,
/// and the text that replaces the whole block (marker included).
#[derive(Debug, Clone)]
pub struct Patch {
    /// Literal anchor substring; its first occurrence locates the block
    pub marker: String,
    /// Text spliced over the block, inserted verbatim
    pub replacement: String,
}

/// Result of successfully applying a patch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatchOutcome {
    /// Full text after the replacement
    pub content: String,
    /// Byte span of the replaced block, marker included
    pub span: Span,
    /// Byte offset shift (positive = content grew, negative = shrank)
    pub byte_shift: i64,
    /// BLAKE3 checksum of the patched text (hex-encoded)
    pub new_checksum: String,
}

/// Error types for patch operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum PatchError {
    /// The marker string is empty and cannot anchor anything
    #[error("Marker is empty")]
    EmptyMarker,
    /// The literal anchor string is absent from the text
    #[error("Marker not found: {marker:?}")]
    MarkerNotFound { marker: String },
    /// The scan reached end-of-text without the block closing
    #[error("Unbalanced block after marker at byte {block_start}: scan ended at depth {depth}")]
    UnbalancedBlock { block_start: usize, depth: i64 },
    /// Checksum verification failed
    #[error("Checksum mismatch: expected {expected}, got {actual}")]
    ChecksumMismatch { expected: String, actual: String },
}

/// Locate the block anchored by the first occurrence of `marker`.
///
/// The returned span starts at the marker itself and ends one past the brace
/// that closes the block the marker opens. When the marker ends with `{` the
/// scan starts inside that brace; otherwise the scan discovers the block's
/// opening brace on its own.
///
/// The scan is purely lexical: every `{` and `}` after the marker counts,
/// including ones inside string literals, comments, or template expressions.
/// It is not a general-purpose brace matcher; it is only correct for blocks
/// known not to contain unbalanced brace characters in such contexts.
///
/// # Arguments
/// * `source` - The text to search
/// * `marker` - Literal anchor for the block's start
///
/// # Returns
/// * `Ok(Span)` - Byte span of the block, marker included
/// * `Err(PatchError)` - Marker missing or block never closes
pub fn find_block_span(source: &str, marker: &str) -> Result<Span, PatchError> {
    if marker.is_empty() {
        return Err(PatchError::EmptyMarker);
    }

    let byte_start = source
        .find(marker)
        .ok_or_else(|| PatchError::MarkerNotFound {
            marker: marker.to_string(),
        })?;
    let scan_from = byte_start + marker.len();

    // A marker ending with `{` owns its opening brace and starts the scan
    // already one level deep.
    let mut depth: i64 = if marker.ends_with('{') { 1 } else { 0 };

    for (i, ch) in source[scan_from..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Ok(Span {
                        byte_start,
                        byte_end: scan_from + i + 1,
                    });
                }
            }
            _ => {}
        }
    }

    Err(PatchError::UnbalancedBlock {
        block_start: byte_start,
        depth,
    })
}

/// Apply a patch to source text.
///
/// Pure function of its inputs: locates the block, splices the replacement
/// over it, and computes the checksum of the result. Reading the source and
/// persisting the result are the caller's responsibility.
///
/// # Arguments
/// * `source` - The text to patch
/// * `patch` - Marker and replacement
///
/// # Returns
/// * `Ok(PatchOutcome)` - Patched text with span, byte shift, and checksum
/// * `Err(PatchError)` - Block could not be located
pub fn apply_patch(source: &str, patch: &Patch) -> Result<PatchOutcome, PatchError> {
    let span = find_block_span(source, &patch.marker)?;

    let mut content =
        String::with_capacity(source.len() - span.len() + patch.replacement.len());
    content.push_str(&source[..span.byte_start]);
    content.push_str(&patch.replacement);
    content.push_str(&source[span.byte_end..]);

    let new_checksum = blake3::hash(content.as_bytes()).to_hex().to_string();
    let byte_shift = patch.replacement.len() as i64 - span.len() as i64;

    Ok(PatchOutcome {
        content,
        span,
        byte_shift,
        new_checksum,
    })
}

/// Verify that text matches the expected BLAKE3 checksum (hex-encoded).
///
/// Used as a precondition before patching: a mismatch means the file has
/// drifted from the state the patch was authored against, so the marker and
/// replacement can no longer be trusted.
pub fn verify_checksum(content: &str, expected: &str) -> Result<(), PatchError> {
    let actual = blake3::hash(content.as_bytes()).to_hex().to_string();

    if actual == expected {
        Ok(())
    } else {
        Err(PatchError::ChecksumMismatch {
            expected: expected.to_string(),
            actual,
        })
    }
}
