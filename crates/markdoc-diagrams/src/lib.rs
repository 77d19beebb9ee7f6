//! Diagram rendering for Markdoc.
//!
//! This crate routes fenced diagram source text to a rendering backend and
//! returns a normalized SVG artifact:
//! - [`DiagramRenderer`]: the capability every backend implements
//! - [`RendererRegistry`]: language identifier → renderer dispatch table
//! - [`BlockClassifier`]: filters extracted code blocks to diagram languages
//! - [`SvgArtifact`]: structured SVG tree with inline-style normalization
//! - Service-backed renderers for Mermaid, `GraphViz` (DOT), Nomnoml and Pikchr
//!
//! # Architecture
//!
//! The registry is an explicitly constructed value with no global state; the
//! application assembly owns it and passes it where rendering happens. The
//! `dot` and `graphviz` identifiers alias one shared backend instance.
//!
//! # Example
//!
//! ```no_run
//! use markdoc_diagrams::RendererRegistry;
//!
//! let registry = RendererRegistry::with_defaults("https://kroki.io");
//! assert!(registry.supports("mermaid"));
//!
//! let artifact = registry.dispatch("dot", "digraph { a -> b }")?;
//! let svg = artifact.to_svg_string();
//! # Ok::<(), markdoc_diagrams::RegistryError>(())
//! ```

mod artifact;
mod backends;
mod classify;
mod consts;
mod error;
mod registry;
mod renderer;
mod service;
mod styles;

pub use artifact::{SvgArtifact, SvgElement, SvgParseError};
pub use backends::{MermaidRenderer, NomnomlRenderer, PikchrRenderer, VizRenderer};
pub use classify::BlockClassifier;
pub use consts::{DEFAULT_SERVICE_URL, DEFAULT_TIMEOUT};
pub use error::{RegistryError, RenderError};
pub use registry::RendererRegistry;
pub use renderer::DiagramRenderer;
pub use service::ServiceClient;
pub use styles::ensure_inline_styles;
