//! Markdown to HTML document rendering for Markdoc.
//!
//! Ties the pieces together: fenced blocks are extracted and classified,
//! diagram blocks are swapped for placeholders at their source positions,
//! the substituted markdown goes through `pulldown-cmark`, and rendered SVG
//! figures replace the placeholders in the final HTML.
//!
//! A failed diagram render becomes an error figure naming the language; it
//! never aborts the rest of the document.
//!
//! # Example
//!
//! ```no_run
//! use markdoc_diagrams::RendererRegistry;
//! use markdoc_renderer::DocumentRenderer;
//!
//! let registry = RendererRegistry::with_defaults("https://kroki.io");
//! let document = DocumentRenderer::new(&registry)
//!     .render("# Title\n\n```mermaid\ngraph TD\nA-->B\n```\n");
//! assert_eq!(document.diagram_count, 1);
//! ```

mod document;
mod replacements;
mod util;

pub use document::{DiagramFailure, DocumentRenderer, RenderedDocument};
pub use util::escape_html;
