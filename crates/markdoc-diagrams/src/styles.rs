//! Inline-style normalization for rendered artifacts.
//!
//! Export consumers (PDF/PNG rasterizers) see the artifact outside its
//! original stylesheet context, so cascaded values must be resolved into
//! literal per-element declarations or the output renders blank. This module
//! resolves the visual properties that matter for rasterization: `fill`,
//! `stroke`, `stroke-width`, `font-family` and `font-size`.
//!
//! Resolution order per element: inline `style` declaration, then the SVG
//! presentation attribute, then the value inherited from the nearest
//! ancestor. The pass is idempotent: a normalized artifact normalizes to
//! byte-identical output.

use crate::artifact::{SvgArtifact, SvgElement};

/// Properties resolved into literal per-element values, in the order they
/// are written back. The fixed order is what makes the pass idempotent.
const STYLE_PROPS: [&str; 5] = ["fill", "stroke", "stroke-width", "font-family", "font-size"];

/// Resolve effective visual properties into literal inline styles on every
/// element of the artifact.
///
/// # Example
///
/// ```
/// use markdoc_diagrams::{SvgArtifact, ensure_inline_styles};
///
/// let mut artifact =
///     SvgArtifact::parse(r#"<svg fill="red"><rect width="4"/></svg>"#).unwrap();
/// ensure_inline_styles(&mut artifact);
/// assert_eq!(artifact.root.children[0].attr("style"), Some("fill:red;"));
/// ```
pub fn ensure_inline_styles(artifact: &mut SvgArtifact) {
    let inherited: [Option<String>; 5] = Default::default();
    normalize_element(&mut artifact.root, &inherited);
}

fn normalize_element(element: &mut SvgElement, inherited: &[Option<String>; 5]) {
    let declarations = parse_style(element.attr("style").unwrap_or(""));

    // Effective value: own style declaration, else presentation attribute,
    // else the inherited value.
    let mut effective = inherited.clone();
    for (i, prop) in STYLE_PROPS.iter().enumerate() {
        let own = declarations
            .iter()
            .find(|(name, _)| name == prop)
            .map(|(_, value)| value.clone())
            .or_else(|| element.attr(prop).map(ToOwned::to_owned));
        if let Some(value) = own {
            effective[i] = Some(value);
        }
    }

    // Rebuild the style attribute: unmanaged declarations keep their source
    // order, managed properties follow in fixed order.
    let mut style = String::new();
    for (name, value) in &declarations {
        if !STYLE_PROPS.contains(&name.as_str()) {
            style.push_str(name);
            style.push(':');
            style.push_str(value);
            style.push(';');
        }
    }
    for (i, prop) in STYLE_PROPS.iter().enumerate() {
        if let Some(value) = &effective[i] {
            style.push_str(prop);
            style.push(':');
            style.push_str(value);
            style.push(';');
        }
    }
    if !style.is_empty() {
        element.set_attr("style", style);
    }

    for child in &mut element.children {
        normalize_element(child, &effective);
    }
}

/// Parse a `style` attribute into ordered (property, value) declarations.
fn parse_style(style: &str) -> Vec<(String, String)> {
    style
        .split(';')
        .filter_map(|declaration| {
            let (name, value) = declaration.split_once(':')?;
            let name = name.trim();
            let value = value.trim();
            if name.is_empty() || value.is_empty() {
                return None;
            }
            Some((name.to_owned(), value.to_owned()))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn normalized(svg: &str) -> SvgArtifact {
        let mut artifact = SvgArtifact::parse(svg).unwrap();
        ensure_inline_styles(&mut artifact);
        artifact
    }

    #[test]
    fn test_presentation_attribute_becomes_inline_style() {
        let artifact = normalized(r#"<svg><rect fill="blue"/></svg>"#);

        assert_eq!(artifact.root.children[0].attr("style"), Some("fill:blue;"));
    }

    #[test]
    fn test_inherited_values_propagate_to_descendants() {
        let artifact = normalized(r#"<svg font-family="monospace"><g><text>x</text></g></svg>"#);

        let g = &artifact.root.children[0];
        let text = &g.children[0];
        assert_eq!(g.attr("style"), Some("font-family:monospace;"));
        assert_eq!(text.attr("style"), Some("font-family:monospace;"));
    }

    #[test]
    fn test_inline_style_wins_over_attribute_and_inherited() {
        let artifact = normalized(
            r#"<svg fill="red"><rect fill="green" style="fill:black;stroke:white;"/></svg>"#,
        );

        assert_eq!(
            artifact.root.children[0].attr("style"),
            Some("fill:black;stroke:white;")
        );
    }

    #[test]
    fn test_unmanaged_declarations_preserved() {
        let artifact = normalized(r#"<svg><rect style="opacity: 0.5; fill: red"/></svg>"#);

        assert_eq!(
            artifact.root.children[0].attr("style"),
            Some("opacity:0.5;fill:red;")
        );
    }

    #[test]
    fn test_element_without_styles_untouched() {
        let artifact = normalized("<svg><rect/></svg>");

        assert_eq!(artifact.root.children[0].attr("style"), None);
    }

    #[test]
    fn test_idempotent_byte_identical() {
        let svg = concat!(
            r#"<svg fill="red" font-size="12px">"#,
            r#"<g style="stroke: blue"><rect stroke-width="2"/><text>t</text></g>"#,
            "</svg>",
        );

        let mut artifact = SvgArtifact::parse(svg).unwrap();
        ensure_inline_styles(&mut artifact);
        let once = artifact.to_svg_string();

        ensure_inline_styles(&mut artifact);
        let twice = artifact.to_svg_string();

        assert_eq!(once, twice);
    }

    #[test]
    fn test_parse_style_ignores_malformed_declarations() {
        let declarations = parse_style("fill:red;;broken;stroke: blue ;:bad;");

        assert_eq!(
            declarations,
            vec![
                ("fill".to_owned(), "red".to_owned()),
                ("stroke".to_owned(), "blue".to_owned()),
            ]
        );
    }
}
