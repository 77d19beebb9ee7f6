//! Error types for diagram rendering and registry dispatch.
//!
//! The core performs no local recovery: registry operations add context
//! (which language, which stage) and preserve the renderer's original failure
//! as the error source so callers can recover the root diagnostic.

/// Failure produced by a single renderer.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    /// The backend could not be prepared (bad service configuration,
    /// unreachable engine). Surfaced from within a render call, not retried.
    #[error("initialization failed: {0}")]
    Initialization(String),

    /// The backend's engine rejected the input or failed internally. The
    /// payload is the engine's own diagnostic message.
    #[error("{0}")]
    Backend(String),
}

/// Failure produced by the [`RendererRegistry`](crate::RendererRegistry).
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Invalid registration, surfaced immediately at registration time.
    #[error("cannot register renderer for language {language:?}: {reason}")]
    Configuration { language: String, reason: String },

    /// Dispatch requested for a language with no registered renderer.
    /// No fallback renderer is ever substituted.
    #[error("no renderer registered for language: {language}")]
    NotFound { language: String },

    /// A renderer failed; the original failure is preserved as the source.
    #[error("failed to render {language} diagram: {source}")]
    Render {
        language: String,
        source: RenderError,
    },
}

#[cfg(test)]
mod tests {
    use std::error::Error;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_render_wrap_preserves_root_message() {
        let err = RegistryError::Render {
            language: "mermaid".to_owned(),
            source: RenderError::Backend("unexpected token at line 3".to_owned()),
        };

        let display = err.to_string();
        assert_eq!(
            display,
            "failed to render mermaid diagram: unexpected token at line 3"
        );

        let root = err.source().map(ToString::to_string);
        assert_eq!(root.as_deref(), Some("unexpected token at line 3"));
    }

    #[test]
    fn test_not_found_names_language() {
        let err = RegistryError::NotFound {
            language: "unknown".to_owned(),
        };
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_initialization_is_distinct_kind() {
        let err = RenderError::Initialization("engine missing".to_owned());
        assert_eq!(err.to_string(), "initialization failed: engine missing");
    }
}
