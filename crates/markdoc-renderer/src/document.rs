//! Whole-document rendering.

use markdoc_diagrams::{BlockClassifier, RendererRegistry};
use markdoc_extract::{CodeBlock, extract_code_blocks};
use pulldown_cmark::Parser;
use rayon::prelude::*;

use crate::replacements::{Replacements, unique_marker};

/// A diagram that failed to render, recorded alongside the document.
///
/// The failure is also visible in the HTML itself as an error figure at the
/// diagram's position.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DiagramFailure {
    /// Zero-based index among the document's diagram blocks, in source order.
    pub index: usize,
    /// The fence language tag of the failed block.
    pub language: String,
    /// Human-readable failure description.
    pub message: String,
}

/// The outcome of rendering one markdown document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedDocument {
    /// The document body as an HTML fragment.
    pub html: String,
    /// How many diagram blocks the document contained.
    pub diagram_count: usize,
    /// Diagrams that failed to render, in source order.
    pub errors: Vec<DiagramFailure>,
}

/// Renders markdown documents against a renderer registry.
///
/// Diagram blocks are cut out of the source and replaced with positional
/// placeholders before markdown conversion, so the converter never sees
/// diagram code and cannot mangle it. The diagrams themselves render in
/// parallel, then splice back into the HTML as `<figure>` elements.
pub struct DocumentRenderer<'a> {
    registry: &'a RendererRegistry,
    classifier: BlockClassifier,
}

impl<'a> DocumentRenderer<'a> {
    /// A renderer over the given registry. The classifier is snapshotted
    /// from the registry's registered languages.
    #[must_use]
    pub fn new(registry: &'a RendererRegistry) -> Self {
        Self {
            classifier: BlockClassifier::from_registry(registry),
            registry,
        }
    }

    /// Replace the language classifier, e.g. to render only a subset of the
    /// registry's languages as diagrams.
    #[must_use]
    pub fn with_classifier(mut self, classifier: BlockClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    /// Render a markdown document to an HTML fragment.
    ///
    /// Renderer failures do not abort the document; each failed diagram
    /// becomes an error figure in place and an entry in
    /// [`RenderedDocument::errors`].
    #[must_use]
    pub fn render(&self, markdown: &str) -> RenderedDocument {
        let blocks = extract_code_blocks(markdown);
        let diagrams = self.classifier.filter_diagram_blocks(blocks);

        tracing::debug!(diagrams = diagrams.len(), "rendering document");

        let marker = unique_marker(markdown);
        let html = render_html(markdown, &diagrams, &marker);
        let mut replacements = Replacements::new(marker, diagrams.len());
        let mut errors = Vec::new();

        let results: Vec<_> = diagrams
            .par_iter()
            .map(|block| self.registry.dispatch(&block.language, &block.code))
            .collect();

        for (index, result) in results.into_iter().enumerate() {
            match result {
                Ok(artifact) => {
                    replacements.add(
                        index,
                        format!(r#"<figure class="diagram">{artifact}</figure>"#),
                    );
                }
                Err(error) => {
                    tracing::warn!(
                        language = %diagrams[index].language,
                        %error,
                        "diagram render failed",
                    );
                    let message = error.to_string();
                    replacements.add_error(index, &message);
                    errors.push(DiagramFailure {
                        index,
                        language: diagrams[index].language.clone(),
                        message,
                    });
                }
            }
        }

        let mut html = html;
        replacements.apply(&mut html);

        RenderedDocument {
            html,
            diagram_count: diagrams.len(),
            errors,
        }
    }
}

/// Convert the markdown to HTML with diagram blocks replaced by
/// placeholders.
///
/// Substitution runs back to front so earlier block offsets stay valid.
/// Each placeholder is padded with blank lines to sit in a paragraph of
/// its own regardless of the surrounding prose.
fn render_html(markdown: &str, diagrams: &[CodeBlock], marker: &str) -> String {
    let mut source = markdown.to_owned();
    for (index, block) in diagrams.iter().enumerate().rev() {
        source.replace_range(block.start..block.end, &format!("\n\n{marker}{index}}}}}\n\n"));
    }

    let mut html = String::with_capacity(source.len() * 2);
    pulldown_cmark::html::push_html(&mut html, Parser::new(&source));
    html
}
