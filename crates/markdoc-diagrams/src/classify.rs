//! Diagram block classification.
//!
//! Separates diagram code blocks from ordinary ones by their fence language
//! tag. The language set is sourced from a live [`RendererRegistry`] where
//! one is available, so the classifier and the dispatch table cannot drift
//! apart when renderers are registered at runtime; the built-in set is the
//! fallback for registry-free use.

use std::collections::HashSet;

use markdoc_extract::CodeBlock;

use crate::registry::RendererRegistry;

/// Built-in diagram language identifiers.
const DEFAULT_LANGUAGES: [&str; 5] = ["mermaid", "dot", "graphviz", "nomnoml", "pikchr"];

/// Membership test for diagram languages over extracted code blocks.
#[derive(Debug, Clone)]
pub struct BlockClassifier {
    languages: HashSet<String>,
}

impl BlockClassifier {
    /// Classifier over an explicit language set. Identifiers are normalized
    /// to lowercase.
    #[must_use]
    pub fn new<I, S>(languages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            languages: languages
                .into_iter()
                .map(|language| language.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Classifier over the registry's currently registered languages.
    ///
    /// Snapshots the key set; build a fresh classifier after changing the
    /// registry.
    #[must_use]
    pub fn from_registry(registry: &RendererRegistry) -> Self {
        Self::new(registry.languages())
    }

    /// Whether the language tag names a diagram language.
    ///
    /// Case-insensitive; false for an empty tag (an untagged fence is never
    /// a diagram).
    #[must_use]
    pub fn is_diagram_language(&self, language: &str) -> bool {
        if language.is_empty() {
            return false;
        }
        self.languages.contains(&language.to_lowercase())
    }

    /// The subsequence of blocks whose language is a diagram language,
    /// preserving source order.
    #[must_use]
    pub fn filter_diagram_blocks(&self, blocks: Vec<CodeBlock>) -> Vec<CodeBlock> {
        blocks
            .into_iter()
            .filter(|block| self.is_diagram_language(&block.language))
            .collect()
    }
}

impl Default for BlockClassifier {
    /// Classifier over the built-in language set.
    fn default() -> Self {
        Self::new(DEFAULT_LANGUAGES)
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use pretty_assertions::assert_eq;

    use markdoc_extract::extract_code_blocks;

    use super::*;
    use crate::artifact::{SvgArtifact, SvgElement};
    use crate::error::RenderError;
    use crate::renderer::DiagramRenderer;

    struct StubRenderer(AtomicUsize);

    impl DiagramRenderer for StubRenderer {
        fn initialize(&self) -> Result<(), RenderError> {
            Ok(())
        }

        fn render(&self, _code: &str) -> Result<SvgArtifact, RenderError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(SvgArtifact {
                root: SvgElement {
                    tag: "svg".to_owned(),
                    ..SvgElement::default()
                },
            })
        }
    }

    #[test]
    fn test_default_set_members() {
        let classifier = BlockClassifier::default();

        for language in ["mermaid", "dot", "graphviz", "nomnoml", "pikchr"] {
            assert!(classifier.is_diagram_language(language), "missing {language}");
        }
    }

    #[test]
    fn test_case_insensitive() {
        let classifier = BlockClassifier::default();

        assert!(classifier.is_diagram_language("MERMAID"));
        assert!(classifier.is_diagram_language("Mermaid"));
        assert!(classifier.is_diagram_language("DOT"));
        assert!(classifier.is_diagram_language("Dot"));
    }

    #[test]
    fn test_non_diagram_languages() {
        let classifier = BlockClassifier::default();

        assert!(!classifier.is_diagram_language(""));
        assert!(!classifier.is_diagram_language("javascript"));
        assert!(!classifier.is_diagram_language("python"));
        assert!(!classifier.is_diagram_language("java"));
    }

    #[test]
    fn test_filter_keeps_only_diagram_blocks() {
        let markdown =
            "```mermaid\ngraph TD\nA-->B\n```\n\n```javascript\nconsole.log(\"test\");\n```";
        let blocks = extract_code_blocks(markdown);

        let diagrams = BlockClassifier::default().filter_diagram_blocks(blocks);

        assert_eq!(diagrams.len(), 1);
        assert_eq!(diagrams[0].language, "mermaid");
    }

    #[test]
    fn test_filter_preserves_source_order() {
        let markdown = concat!(
            "```mermaid\nA-->B\n```\n\n",
            "```javascript\nconst x = 1;\n```\n\n",
            "```dot\nA->B\n```\n\n",
            "```nomnoml\n[A]->[B]\n```",
        );
        let blocks = extract_code_blocks(markdown);

        let diagrams = BlockClassifier::default().filter_diagram_blocks(blocks);

        let languages: Vec<_> = diagrams.iter().map(|b| b.language.as_str()).collect();
        assert_eq!(languages, vec!["mermaid", "dot", "nomnoml"]);
    }

    #[test]
    fn test_all_supported_languages_filtered_in() {
        let markdown = concat!(
            "```mermaid\nA-->B\n```\n\n",
            "```dot\nA->B\n```\n\n",
            "```graphviz\nA--B\n```\n\n",
            "```nomnoml\n[A]->[B]\n```\n\n",
            "```pikchr\nbox \"A\"\n```",
        );
        let blocks = extract_code_blocks(markdown);

        let diagrams = BlockClassifier::default().filter_diagram_blocks(blocks);

        assert_eq!(diagrams.len(), 5);
    }

    #[test]
    fn test_registry_sourced_classifier_tracks_registrations() {
        let mut registry = crate::RendererRegistry::new();
        registry
            .register("wavy", Arc::new(StubRenderer(AtomicUsize::new(0))))
            .unwrap();

        let classifier = BlockClassifier::from_registry(&registry);

        assert!(classifier.is_diagram_language("wavy"));
        assert!(!classifier.is_diagram_language("mermaid"));
    }
}
