//! Renderer registry: language identifier → rendering backend dispatch.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use crate::artifact::SvgArtifact;
use crate::backends::{MermaidRenderer, NomnomlRenderer, PikchrRenderer, VizRenderer};
use crate::consts::DEFAULT_TIMEOUT;
use crate::error::{RegistryError, RenderError};
use crate::renderer::DiagramRenderer;

/// Mapping from diagram-language identifier to renderer instance.
///
/// Keys are stored lowercase and looked up case-insensitively. Several keys
/// may alias one shared renderer instance; the built-in set registers a
/// single `GraphViz` backend under both `dot` and `graphviz`.
///
/// The registry is a plain value with no global state: construct it in the
/// application assembly and pass it where rendering happens. Dispatch never
/// mutates the mapping, so a shared reference is all concurrent renders need.
///
/// # Example
///
/// ```
/// use markdoc_diagrams::RendererRegistry;
///
/// let registry = RendererRegistry::with_defaults("https://kroki.io");
/// assert!(registry.supports("mermaid"));
/// assert!(registry.supports("DOT"));
/// assert!(!registry.supports("javascript"));
/// ```
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn DiagramRenderer>>,
}

impl RendererRegistry {
    /// Create an empty registry with no renderers.
    #[must_use]
    pub fn new() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    /// Create a registry with the built-in renderer set for the given
    /// rendering service: `mermaid`, `dot`/`graphviz` (one shared instance),
    /// `nomnoml` and `pikchr`.
    #[must_use]
    pub fn with_defaults(service_url: &str) -> Self {
        Self::with_defaults_and_timeout(service_url, DEFAULT_TIMEOUT)
    }

    /// Like [`with_defaults`](Self::with_defaults) with an explicit HTTP
    /// timeout for all built-in backends.
    #[must_use]
    pub fn with_defaults_and_timeout(service_url: &str, timeout: Duration) -> Self {
        let mut registry = Self::new();

        registry.insert(
            "mermaid",
            Arc::new(MermaidRenderer::new(service_url).with_timeout(timeout)),
        );

        // DOT and GraphViz are the same language under two names; both keys
        // share one backend instance.
        let viz: Arc<dyn DiagramRenderer> =
            Arc::new(VizRenderer::new(service_url).with_timeout(timeout));
        registry.insert("dot", Arc::clone(&viz));
        registry.insert("graphviz", viz);

        registry.insert(
            "nomnoml",
            Arc::new(NomnomlRenderer::new(service_url).with_timeout(timeout)),
        );
        registry.insert(
            "pikchr",
            Arc::new(PikchrRenderer::new(service_url).with_timeout(timeout)),
        );

        registry
    }

    /// Insert under a key that is already lowercase and non-empty.
    fn insert(&mut self, language: &str, renderer: Arc<dyn DiagramRenderer>) {
        self.renderers.insert(language.to_owned(), renderer);
    }

    /// Register a renderer for a language identifier.
    ///
    /// The key is normalized to lowercase. An existing entry for the same
    /// key is silently overwritten (last registration wins) so tests and
    /// runtime customization can swap backends. Registering one `Arc` under
    /// several keys aliases a single instance; the coercion to
    /// `Arc<dyn DiagramRenderer>` preserves pointer identity.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Configuration`] for a blank identifier.
    pub fn register<R>(&mut self, language: &str, renderer: Arc<R>) -> Result<(), RegistryError>
    where
        R: DiagramRenderer + 'static,
    {
        let key = language.trim().to_lowercase();
        if key.is_empty() {
            return Err(RegistryError::Configuration {
                language: language.to_owned(),
                reason: "language identifier must not be empty".to_owned(),
            });
        }
        self.renderers.insert(key, renderer);
        Ok(())
    }

    /// Render diagram source through the renderer registered for `language`.
    ///
    /// Lookup is case-insensitive. Dispatch never mutates the registry.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NotFound`] when no renderer is registered for
    /// the language; no fallback is substituted. A renderer failure is
    /// wrapped as [`RegistryError::Render`] with the language added for
    /// context and the original error preserved as the source.
    pub fn dispatch(&self, language: &str, code: &str) -> Result<SvgArtifact, RegistryError> {
        let renderer =
            self.renderers
                .get(&language.to_lowercase())
                .ok_or_else(|| RegistryError::NotFound {
                    language: language.to_owned(),
                })?;

        renderer.render(code).map_err(|source| wrap_render_error(language, source))
    }

    /// Whether a renderer is registered for the language (case-insensitive).
    /// False for an empty identifier.
    #[must_use]
    pub fn supports(&self, language: &str) -> bool {
        if language.is_empty() {
            return false;
        }
        self.renderers.contains_key(&language.to_lowercase())
    }

    /// Currently registered language identifiers, in no particular order.
    #[must_use]
    pub fn languages(&self) -> Vec<String> {
        self.renderers.keys().cloned().collect()
    }

    /// Remove the registration for a language (case-insensitive).
    /// Returns whether an entry existed.
    pub fn unregister(&mut self, language: &str) -> bool {
        self.renderers.remove(&language.to_lowercase()).is_some()
    }

    /// Remove all registrations, built-ins included. Intended for test
    /// isolation rather than normal operation.
    pub fn clear(&mut self) {
        self.renderers.clear();
    }

    /// Direct renderer lookup without side effects.
    #[must_use]
    pub fn get(&self, language: &str) -> Option<&Arc<dyn DiagramRenderer>> {
        self.renderers.get(&language.to_lowercase())
    }
}

impl Default for RendererRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn wrap_render_error(language: &str, source: RenderError) -> RegistryError {
    RegistryError::Render {
        language: language.to_owned(),
        source,
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::artifact::SvgElement;

    /// Test renderer that counts calls and renders a fixed artifact.
    struct StubRenderer {
        calls: AtomicUsize,
        label: &'static str,
    }

    impl StubRenderer {
        fn new(label: &'static str) -> Self {
            Self {
                calls: AtomicUsize::new(0),
                label,
            }
        }
    }

    impl DiagramRenderer for StubRenderer {
        fn initialize(&self) -> Result<(), RenderError> {
            Ok(())
        }

        fn render(&self, _code: &str) -> Result<SvgArtifact, RenderError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut root = SvgElement {
                tag: "svg".to_owned(),
                ..SvgElement::default()
            };
            root.set_attr("data-stub", self.label);
            Ok(SvgArtifact { root })
        }
    }

    /// Test renderer that always fails.
    struct FailingRenderer;

    impl DiagramRenderer for FailingRenderer {
        fn initialize(&self) -> Result<(), RenderError> {
            Ok(())
        }

        fn render(&self, _code: &str) -> Result<SvgArtifact, RenderError> {
            Err(RenderError::Backend("syntax error near 'graph'".to_owned()))
        }
    }

    #[test]
    fn test_default_registrations() {
        let registry = RendererRegistry::with_defaults("https://kroki.io");

        for language in ["mermaid", "dot", "graphviz", "nomnoml", "pikchr"] {
            assert!(registry.supports(language), "missing {language}");
        }
        assert!(registry.supports("DOT"));
        assert!(registry.supports("Mermaid"));
        assert!(!registry.supports("unknown"));
        assert!(!registry.supports(""));
        assert_eq!(registry.languages().len(), 5);
    }

    #[test]
    fn test_dot_and_graphviz_share_one_instance() {
        let registry = RendererRegistry::with_defaults("https://kroki.io");

        let dot = registry.get("dot").unwrap();
        let graphviz = registry.get("graphviz").unwrap();
        assert!(Arc::ptr_eq(dot, graphviz));
    }

    #[test]
    fn test_aliased_keys_share_engine_state() {
        let mut registry = RendererRegistry::new();
        let stub = Arc::new(StubRenderer::new("shared"));
        registry.register("dot", Arc::clone(&stub)).unwrap();
        registry.register("graphviz", Arc::clone(&stub)).unwrap();

        registry.dispatch("dot", "digraph {}").unwrap();
        registry.dispatch("graphviz", "digraph {}").unwrap();

        assert_eq!(stub.calls.load(Ordering::SeqCst), 2);
        // Coercing the concrete Arc on registration keeps one allocation.
        let dot = registry.get("dot").unwrap();
        let graphviz = registry.get("graphviz").unwrap();
        assert!(Arc::ptr_eq(dot, graphviz));
    }

    #[test]
    fn test_register_normalizes_case() {
        let mut registry = RendererRegistry::new();
        registry
            .register("MyLang", Arc::new(StubRenderer::new("a")))
            .unwrap();

        assert!(registry.supports("mylang"));
        assert!(registry.supports("MYLANG"));
        assert_eq!(registry.languages(), vec!["mylang".to_owned()]);
    }

    #[test]
    fn test_register_blank_identifier_is_configuration_error() {
        let mut registry = RendererRegistry::new();

        let err = registry
            .register("  ", Arc::new(StubRenderer::new("a")))
            .unwrap_err();
        assert!(matches!(err, RegistryError::Configuration { .. }));
        assert!(!registry.supports("  "));
    }

    #[test]
    fn test_reregistration_overwrites() {
        let mut registry = RendererRegistry::new();
        let first = Arc::new(StubRenderer::new("first"));
        let second = Arc::new(StubRenderer::new("second"));

        registry.register("mermaid", Arc::clone(&first)).unwrap();
        registry.register("mermaid", Arc::clone(&second)).unwrap();

        let artifact = registry.dispatch("mermaid", "graph TD").unwrap();
        assert_eq!(artifact.root.attr("data-stub"), Some("second"));
        assert_eq!(first.calls.load(Ordering::SeqCst), 0);
        assert_eq!(second.calls.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_dispatch_unknown_language_not_found() {
        let registry = RendererRegistry::new();

        let err = registry.dispatch("unknown", "x").unwrap_err();
        assert!(matches!(err, RegistryError::NotFound { .. }));
        assert!(err.to_string().contains("unknown"));
    }

    #[test]
    fn test_dispatch_is_case_insensitive() {
        let mut registry = RendererRegistry::new();
        registry
            .register("mermaid", Arc::new(StubRenderer::new("m")))
            .unwrap();

        assert!(registry.dispatch("MERMAID", "graph TD").is_ok());
    }

    #[test]
    fn test_dispatch_wraps_renderer_failure_with_context() {
        let mut registry = RendererRegistry::new();
        registry.register("mermaid", Arc::new(FailingRenderer)).unwrap();

        let err = registry.dispatch("mermaid", "graph TD").unwrap_err();
        let message = err.to_string();
        assert!(message.contains("mermaid"));
        assert!(message.contains("syntax error near 'graph'"));

        // The original failure stays recoverable as the cause.
        let root = err.source().map(ToString::to_string);
        assert_eq!(root.as_deref(), Some("syntax error near 'graph'"));
    }

    #[test]
    fn test_dispatch_does_not_mutate_registry() {
        let mut registry = RendererRegistry::new();
        registry.register("mermaid", Arc::new(FailingRenderer)).unwrap();

        let _ = registry.dispatch("mermaid", "x");
        let _ = registry.dispatch("missing", "x");

        assert_eq!(registry.languages(), vec!["mermaid".to_owned()]);
    }

    #[test]
    fn test_unregister() {
        let mut registry = RendererRegistry::new();
        registry
            .register("mermaid", Arc::new(StubRenderer::new("m")))
            .unwrap();

        assert!(registry.unregister("MERMAID"));
        assert!(!registry.unregister("mermaid"));
        assert!(!registry.supports("mermaid"));
    }

    #[test]
    fn test_clear_removes_builtins() {
        let mut registry = RendererRegistry::with_defaults("https://kroki.io");

        registry.clear();

        assert!(registry.languages().is_empty());
        assert!(!registry.supports("mermaid"));
    }

    #[test]
    fn test_get_without_side_effects() {
        let registry = RendererRegistry::with_defaults("https://kroki.io");

        assert!(registry.get("pikchr").is_some());
        assert!(registry.get("PIKCHR").is_some());
        assert!(registry.get("nope").is_none());
        assert_eq!(registry.languages().len(), 5);
    }
}
