//! Fenced code block extraction for Markdoc.
//!
//! This crate locates triple-backtick fenced code blocks in raw markdown and
//! produces [`CodeBlock`] descriptors with byte-exact position metadata.
//! Downstream consumers rely on the positions to splice rendered content back
//! into the source, so extraction guarantees that each block's `raw` text
//! equals `source[start..end]`.
//!
//! Extraction is a pure function over the input string: no I/O, no shared
//! state, and no error path. Malformed or unterminated fences simply produce
//! no block.

mod block;
mod scanner;

pub use block::CodeBlock;
pub use scanner::extract_code_blocks;
