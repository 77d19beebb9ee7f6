//! Built-in diagram rendering backends.
//!
//! One type per engine, all delegating layout to the rendering service:
//! - [`MermaidRenderer`]: flowcharts, sequence diagrams
//! - [`VizRenderer`]: `GraphViz` DOT graphs (serves both `dot` and `graphviz`)
//! - [`NomnomlRenderer`]: UML sketches
//! - [`PikchrRenderer`]: PIC-like technical diagrams
//!
//! Each backend parses the returned SVG into a structured artifact and
//! applies inline-style normalization before handing it to the caller.

use std::time::Duration;

use crate::artifact::SvgArtifact;
use crate::error::RenderError;
use crate::renderer::DiagramRenderer;
use crate::service::ServiceClient;
use crate::styles::ensure_inline_styles;

/// Render through the service and normalize the result.
fn render_via(
    client: &ServiceClient,
    endpoint: &str,
    code: &str,
) -> Result<SvgArtifact, RenderError> {
    let svg = client.render_svg(endpoint, code)?;
    let mut artifact = SvgArtifact::parse(&svg)
        .map_err(|e| RenderError::Backend(format!("engine returned invalid SVG: {e}")))?;
    ensure_inline_styles(&mut artifact);
    Ok(artifact)
}

/// Mermaid backend: flowcharts, sequence diagrams, state diagrams.
#[derive(Debug)]
pub struct MermaidRenderer {
    client: ServiceClient,
}

impl MermaidRenderer {
    /// Service endpoint for this engine.
    pub const ENDPOINT: &'static str = "mermaid";

    /// Create a backend talking to the given rendering service.
    #[must_use]
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: ServiceClient::new(service_url),
        }
    }

    /// Set the HTTP timeout for rendering requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DiagramRenderer for MermaidRenderer {
    fn initialize(&self) -> Result<(), RenderError> {
        self.client.ensure_ready()
    }

    fn render(&self, code: &str) -> Result<SvgArtifact, RenderError> {
        render_via(&self.client, Self::ENDPOINT, code)
    }
}

/// `GraphViz` backend for the DOT language.
///
/// One instance is shared between the `dot` and `graphviz` registry keys, so
/// both identifiers use the same engine state.
#[derive(Debug)]
pub struct VizRenderer {
    client: ServiceClient,
}

impl VizRenderer {
    /// Service endpoint for this engine.
    pub const ENDPOINT: &'static str = "graphviz";

    /// Create a backend talking to the given rendering service.
    #[must_use]
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: ServiceClient::new(service_url),
        }
    }

    /// Set the HTTP timeout for rendering requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DiagramRenderer for VizRenderer {
    fn initialize(&self) -> Result<(), RenderError> {
        self.client.ensure_ready()
    }

    fn render(&self, code: &str) -> Result<SvgArtifact, RenderError> {
        render_via(&self.client, Self::ENDPOINT, code)
    }
}

/// Nomnoml backend: UML diagrams in a terse sketch syntax.
#[derive(Debug)]
pub struct NomnomlRenderer {
    client: ServiceClient,
}

impl NomnomlRenderer {
    /// Service endpoint for this engine.
    pub const ENDPOINT: &'static str = "nomnoml";

    /// Create a backend talking to the given rendering service.
    #[must_use]
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: ServiceClient::new(service_url),
        }
    }

    /// Set the HTTP timeout for rendering requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DiagramRenderer for NomnomlRenderer {
    fn initialize(&self) -> Result<(), RenderError> {
        self.client.ensure_ready()
    }

    fn render(&self, code: &str) -> Result<SvgArtifact, RenderError> {
        render_via(&self.client, Self::ENDPOINT, code)
    }
}

/// Pikchr backend: PIC-like technical diagrams.
#[derive(Debug)]
pub struct PikchrRenderer {
    client: ServiceClient,
}

impl PikchrRenderer {
    /// Service endpoint for this engine.
    pub const ENDPOINT: &'static str = "pikchr";

    /// Create a backend talking to the given rendering service.
    #[must_use]
    pub fn new(service_url: impl Into<String>) -> Self {
        Self {
            client: ServiceClient::new(service_url),
        }
    }

    /// Set the HTTP timeout for rendering requests.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.client = self.client.with_timeout(timeout);
        self
    }
}

impl DiagramRenderer for PikchrRenderer {
    fn initialize(&self) -> Result<(), RenderError> {
        self.client.ensure_ready()
    }

    fn render(&self, code: &str) -> Result<SvgArtifact, RenderError> {
        render_via(&self.client, Self::ENDPOINT, code)
    }
}
