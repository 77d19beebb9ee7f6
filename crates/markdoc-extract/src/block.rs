//! Extracted code block descriptor.

/// A fenced code block extracted from markdown source.
///
/// Invariants: `start < end`, `raw` equals the source substring
/// `source[start..end]`, and blocks produced by one extraction never overlap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language tag from the fence info string, lowercased.
    /// Empty string when the fence has no tag.
    pub language: String,
    /// Block body with leading and trailing whitespace stripped.
    pub code: String,
    /// Byte offset of the opening fence in the source.
    pub start: usize,
    /// Byte offset one past the closing fence.
    pub end: usize,
    /// Exact source text spanning `start..end`, delimiters included.
    pub raw: String,
}
