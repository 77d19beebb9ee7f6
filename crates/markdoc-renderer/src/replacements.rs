//! Single-pass placeholder replacement.
//!
//! Diagram blocks are swapped for `{{DIAGRAM_N}}` placeholders before
//! markdown conversion. Instead of calling `String::replace` once per
//! diagram (quadratic in document size), all replacements are collected and
//! applied in one scan over the HTML.
//!
//! The marker prefix is chosen per document via [`unique_marker`], so
//! author prose that happens to contain the literal placeholder text is
//! never mistaken for a diagram slot.

use std::collections::HashMap;

use crate::util::escape_html;

/// A placeholder marker prefix guaranteed absent from the source text.
///
/// Starts from `{{DIAGRAM_` and grows until the source no longer contains
/// it; only placeholders the renderer itself inserted can then match.
pub(crate) fn unique_marker(source: &str) -> String {
    let mut marker = String::from("{{DIAGRAM_");
    while source.contains(&marker) {
        marker.push('_');
    }
    marker
}

/// Collected diagram replacements, keyed by diagram index.
pub(crate) struct Replacements {
    marker: String,
    map: HashMap<usize, String>,
}

impl Replacements {
    pub(crate) fn new(marker: String, capacity: usize) -> Self {
        Self {
            marker,
            map: HashMap::with_capacity(capacity),
        }
    }

    /// Add replacement content for a diagram placeholder.
    pub(crate) fn add(&mut self, index: usize, content: String) {
        self.map.insert(index, content);
    }

    /// Add an error figure for a diagram that failed to render.
    pub(crate) fn add_error(&mut self, index: usize, message: &str) {
        let figure = format!(
            r#"<figure class="diagram diagram-error"><pre>{}</pre></figure>"#,
            escape_html(message)
        );
        self.add(index, figure);
    }

    /// Replace every known `{marker}{N}}}` placeholder in a single pass.
    ///
    /// The markdown converter wraps each placeholder in a paragraph of its
    /// own; the surrounding `<p>` pair is dropped so the figure is not left
    /// inside phrasing content. Placeholders with no replacement are kept
    /// verbatim.
    pub(crate) fn apply(self, html: &mut String) {
        if self.map.is_empty() {
            return;
        }

        let mut result = String::with_capacity(html.len());
        let mut remaining = html.as_str();

        while let Some(start) = remaining.find(&self.marker) {
            let before = &remaining[..start];
            let after_marker = &remaining[start + self.marker.len()..];

            let Some(end_pos) = after_marker.find("}}") else {
                // No closing braces; keep the rest as-is.
                result.push_str(before);
                result.push_str(&remaining[start..]);
                remaining = "";
                break;
            };
            let after = &after_marker[end_pos + 2..];

            let replacement = after_marker[..end_pos]
                .parse::<usize>()
                .ok()
                .and_then(|index| self.map.get(&index));

            if let Some(replacement) = replacement {
                if before.ends_with("<p>") && after.starts_with("</p>") {
                    result.push_str(&before[..before.len() - "<p>".len()]);
                    result.push_str(replacement);
                    remaining = &after["</p>".len()..];
                } else {
                    result.push_str(before);
                    result.push_str(replacement);
                    remaining = after;
                }
            } else {
                // Invalid index or no replacement registered.
                result.push_str(before);
                result.push_str(&remaining[start..start + self.marker.len() + end_pos + 2]);
                remaining = after;
            }
        }

        result.push_str(remaining);
        *html = result;
    }
}
