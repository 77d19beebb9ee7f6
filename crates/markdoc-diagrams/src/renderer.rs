//! The rendering capability contract.

use crate::artifact::SvgArtifact;
use crate::error::RenderError;

/// Capability implemented by every concrete diagram rendering backend.
///
/// Backends are registered in a [`RendererRegistry`](crate::RendererRegistry)
/// behind `Arc<dyn DiagramRenderer>`; one instance may be registered under
/// several language identifiers.
///
/// Implementations must be safe to share across threads: document rendering
/// fans render calls out in parallel, and the registry provides no
/// serialization across calls routed to the same backend. A backend holding
/// lazily-initialized engine state guards it itself.
pub trait DiagramRenderer: Send + Sync {
    /// Prepare the backend's engine. Idempotent; invoked automatically on the
    /// first render when not yet initialized.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Initialization`] when the engine cannot be
    /// prepared. The error propagates to the render caller, never swallowed.
    fn initialize(&self) -> Result<(), RenderError>;

    /// Render diagram source text in the backend's own grammar to a
    /// normalized SVG artifact.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Backend`] carrying the engine's diagnostic when
    /// the input is invalid for this backend or the engine fails internally;
    /// the contract does not distinguish the two. Returns
    /// [`RenderError::Initialization`] when lazy setup fails.
    fn render(&self, code: &str) -> Result<SvgArtifact, RenderError>;
}
