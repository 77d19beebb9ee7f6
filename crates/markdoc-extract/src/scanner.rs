//! Forward scanner for triple-backtick fences.
//!
//! Implemented as an explicit state machine (outside fence → info string →
//! body → closed) rather than a regex so that the "first closing fence wins"
//! rule is a stated property instead of a backtracking accident, and so that
//! scanning cost stays linear in the input.

use crate::block::CodeBlock;

const FENCE: &[u8] = b"```";

/// Extract all fenced code blocks from markdown text, in source order.
///
/// An opening fence is three backticks at the start of a line, optionally
/// followed immediately (no space) by a language tag of word characters, then
/// a newline. The body ends at the first subsequent occurrence of three
/// backticks; inline backticks shorter than a full delimiter never terminate
/// a block. An opening fence with no closing delimiter before end of input is
/// not recognized and yields no block.
///
/// # Example
///
/// ```
/// use markdoc_extract::extract_code_blocks;
///
/// let blocks = extract_code_blocks("```mermaid\ngraph TD\nA-->B\n```");
/// assert_eq!(blocks.len(), 1);
/// assert_eq!(blocks[0].language, "mermaid");
/// ```
#[must_use]
pub fn extract_code_blocks(markdown: &str) -> Vec<CodeBlock> {
    let bytes = markdown.as_bytes();
    let mut blocks = Vec::new();
    let mut pos = 0;
    let mut at_line_start = true;

    while pos < bytes.len() {
        if at_line_start && bytes[pos..].starts_with(FENCE) {
            if let Some(block) = scan_block(markdown, pos) {
                pos = block.end;
                // `end` sits just past the closing backticks, never on a
                // fresh line.
                at_line_start = false;
                blocks.push(block);
                continue;
            }
        }
        at_line_start = bytes[pos] == b'\n';
        pos += 1;
    }

    blocks
}

/// Scan a single block starting at an opening fence.
///
/// Returns `None` when the opening is malformed (info string not followed by
/// a newline) or the fence is unterminated.
fn scan_block(source: &str, start: usize) -> Option<CodeBlock> {
    let bytes = source.as_bytes();

    // Info string: word characters directly after the backticks.
    let mut cursor = start + FENCE.len();
    while cursor < bytes.len() && is_word_byte(bytes[cursor]) {
        cursor += 1;
    }
    if bytes.get(cursor) != Some(&b'\n') {
        return None;
    }
    let language = source[start + FENCE.len()..cursor].to_lowercase();

    // Body runs to the first closing delimiter; shortest match wins so one
    // block never swallows the next.
    let body_start = cursor + 1;
    let close = find_fence(bytes, body_start)?;
    let end = close + FENCE.len();

    Some(CodeBlock {
        language,
        code: source[body_start..close].trim().to_owned(),
        start,
        end,
        raw: source[start..end].to_owned(),
    })
}

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

/// Byte offset of the next triple-backtick sequence at or after `from`.
fn find_fence(bytes: &[u8], from: usize) -> Option<usize> {
    bytes[from..]
        .windows(FENCE.len())
        .position(|window| window == FENCE)
        .map(|i| from + i)
}
