//! Structured SVG artifact.
//!
//! Rendering backends produce serialized SVG text; this module parses it into
//! an element tree so downstream consumers get a document structure rather
//! than an opaque string. The tree round-trips back to SVG text and is the
//! unit that style normalization operates on.

use std::fmt;
use std::fmt::Write;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

/// Error produced when a backend's SVG output cannot be parsed.
#[derive(Debug, thiserror::Error)]
pub enum SvgParseError {
    #[error("invalid SVG markup: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("invalid SVG attribute: {0}")]
    Attr(#[from] quick_xml::events::attributes::AttrError),

    #[error("SVG encoding error: {0}")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    #[error("document contains no root element")]
    MissingRoot,

    #[error("unbalanced closing tag in SVG markup")]
    Unbalanced,
}

/// A single element in the SVG tree.
///
/// Text is stored ElementTree-style: `text` is the content before the first
/// child, `tail` is the content following this element inside its parent.
/// Attributes keep their source order so serialization is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SvgElement {
    pub tag: String,
    pub attrs: Vec<(String, String)>,
    pub text: String,
    pub tail: String,
    pub children: Vec<SvgElement>,
}

impl SvgElement {
    /// Value of the named attribute, if present.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing any existing value in place.
    pub fn set_attr(&mut self, name: &str, value: impl Into<String>) {
        let value = value.into();
        if let Some(slot) = self.attrs.iter_mut().find(|(key, _)| key == name) {
            slot.1 = value;
        } else {
            self.attrs.push((name.to_owned(), value));
        }
    }

    /// Depth-first iterator over this element and all descendants.
    pub fn descendants(&self) -> impl Iterator<Item = &SvgElement> {
        let mut queue = vec![self];
        std::iter::from_fn(move || {
            let next = queue.pop()?;
            queue.extend(next.children.iter().rev());
            Some(next)
        })
    }
}

/// Normalized output of a successful diagram render: an SVG document tree
/// suitable for DOM embedding or downstream rasterization.
///
/// The artifact carries no provenance metadata beyond what the rendering
/// engine itself embedded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SvgArtifact {
    pub root: SvgElement,
}

impl SvgArtifact {
    /// Parse serialized SVG text into a structured artifact.
    ///
    /// Shared helper for all backends: engines hand back strings, callers
    /// get a tree.
    ///
    /// # Errors
    ///
    /// Returns an error when the input is not well-formed XML or has no root
    /// element.
    pub fn parse(svg: &str) -> Result<Self, SvgParseError> {
        let mut reader = Reader::from_str(svg);
        reader.config_mut().trim_text(false);

        let mut stack: Vec<SvgElement> = Vec::new();
        let mut root: Option<SvgElement> = None;

        loop {
            match reader.read_event()? {
                Event::Start(e) => {
                    stack.push(element_from(&reader, &e)?);
                }
                Event::Empty(e) => {
                    let element = element_from(&reader, &e)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::End(_) => {
                    let element = stack.pop().ok_or(SvgParseError::Unbalanced)?;
                    attach(&mut stack, &mut root, element);
                }
                Event::Text(e) => {
                    let text = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut stack, &text);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?.into_owned();
                    append_text(&mut stack, &decode_entity(&entity));
                }
                Event::CData(e) => {
                    let text = String::from_utf8_lossy(&e).into_owned();
                    append_text(&mut stack, &text);
                }
                Event::Eof => break,
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
        }

        // An element left on the stack means its closing tag never arrived.
        if !stack.is_empty() {
            return Err(SvgParseError::Unbalanced);
        }
        root.map(|root| Self { root })
            .ok_or(SvgParseError::MissingRoot)
    }

    /// Serialize the artifact back to SVG text.
    #[must_use]
    pub fn to_svg_string(&self) -> String {
        let mut out = String::with_capacity(1024);
        serialize_element(&self.root, &mut out);
        out
    }
}

impl fmt::Display for SvgArtifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_svg_string())
    }
}

/// Build an [`SvgElement`] from a start or empty tag.
fn element_from(
    reader: &Reader<&[u8]>,
    event: &BytesStart<'_>,
) -> Result<SvgElement, SvgParseError> {
    let tag = reader.decoder().decode(event.name().as_ref())?.into_owned();

    let mut attrs = Vec::new();
    for attr in event.attributes() {
        let attr = attr?;
        let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
        let value = attr.unescape_value()?.into_owned();
        attrs.push((key, value));
    }

    Ok(SvgElement {
        tag,
        attrs,
        ..SvgElement::default()
    })
}

/// Attach a completed element to its parent, or install it as the root.
///
/// A second top-level element is ignored rather than rejected; engines only
/// ever emit one `<svg>` root and trailing junk should not fail the render.
fn attach(stack: &mut Vec<SvgElement>, root: &mut Option<SvgElement>, element: SvgElement) {
    if let Some(parent) = stack.last_mut() {
        parent.children.push(element);
    } else if root.is_none() {
        *root = Some(element);
    }
}

/// Append character data at the current parse position.
fn append_text(stack: &mut [SvgElement], text: &str) {
    let Some(current) = stack.last_mut() else {
        // Whitespace between the XML declaration and the root element.
        return;
    };
    if let Some(last_child) = current.children.last_mut() {
        last_child.tail.push_str(text);
    } else {
        current.text.push_str(text);
    }
}

/// Decode an XML entity reference to its character value.
fn decode_entity(entity: &str) -> String {
    match entity {
        "lt" => "<".to_owned(),
        "gt" => ">".to_owned(),
        "amp" => "&".to_owned(),
        "apos" => "'".to_owned(),
        "quot" => "\"".to_owned(),
        s if s.starts_with('#') => {
            let code = if let Some(hex) = s[1..].strip_prefix('x').or_else(|| s[1..].strip_prefix('X')) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32)
                .map_or_else(|| format!("&{entity};"), |c| c.to_string())
        }
        _ => format!("&{entity};"),
    }
}

fn serialize_element(element: &SvgElement, out: &mut String) {
    out.push('<');
    out.push_str(&element.tag);
    for (key, value) in &element.attrs {
        let _ = write!(out, r#" {}="{}""#, key, escape_xml(value, true));
    }

    if element.children.is_empty() && element.text.is_empty() {
        out.push_str("/>");
    } else {
        out.push('>');
        out.push_str(&escape_xml(&element.text, false));
        for child in &element.children {
            serialize_element(child, out);
        }
        let _ = write!(out, "</{}>", element.tag);
    }

    out.push_str(&escape_xml(&element.tail, false));
}

fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            _ => result.push(ch),
        }
    }
    result
}
