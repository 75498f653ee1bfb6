//! Read-only element tree over an XML interface document.
//!
//! The builders never touch XML events directly: the whole document is read
//! into an [`Element`] tree first, so that malformed input is rejected before
//! any model building begins.

use crate::error::ParseError;
use quick_xml::Reader;
use quick_xml::escape::{resolve_predefined_entity, unescape};
use quick_xml::events::{BytesRef, BytesStart, Event};
use std::path::Path;

/// A parsed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
}

impl Document {
    /// Parses a document from a string.
    ///
    /// # Errors
    /// Returns `ParseError::MalformedDocument` if the input is not a single
    /// well-formed XML element tree.
    pub fn parse_str(xml: &str) -> Result<Self, ParseError> {
        let mut reader = Reader::from_str(xml);
        let mut buf = Vec::new();
        let mut stack: Vec<Element> = Vec::new();
        let mut root: Option<Element> = None;

        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(ref e)) => stack.push(Element::open(e)?),
                Ok(Event::Empty(ref e)) => {
                    let element = Element::open(e)?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::End(_)) => {
                    let element = stack
                        .pop()
                        .ok_or_else(|| ParseError::malformed("closing tag without opening tag"))?;
                    attach(&mut stack, &mut root, element)?;
                }
                Ok(Event::Text(ref t)) => {
                    let raw = std::str::from_utf8(t.as_ref())?;
                    push_text(&mut stack, &unescape(raw)?)?;
                }
                Ok(Event::CData(ref c)) => {
                    push_text(&mut stack, std::str::from_utf8(c.as_ref())?)?;
                }
                Ok(Event::GeneralRef(ref r)) => {
                    push_text(&mut stack, &resolve_reference(r)?)?;
                }
                Ok(Event::Eof) => break,
                Err(e) => return Err(e.into()),
                _ => {}
            }
            buf.clear();
        }

        if let Some(open) = stack.last() {
            return Err(ParseError::malformed(format!(
                "unclosed element '{}'",
                open.tag
            )));
        }

        root.map(|root| Self { root })
            .ok_or_else(|| ParseError::malformed("document has no root element"))
    }

    /// Reads and parses a document from a file.
    ///
    /// # Errors
    /// Returns `ParseError::Io` if the file cannot be read and
    /// `ParseError::MalformedDocument` if its content is not well-formed.
    pub fn read(path: impl AsRef<Path>) -> Result<Self, ParseError> {
        let bytes = std::fs::read(path)?;
        Self::parse_str(std::str::from_utf8(&bytes)?)
    }

    /// Wraps an already built element tree.
    #[must_use]
    pub fn from_root(root: Element) -> Self {
        Self { root }
    }

    /// Returns the root element.
    #[must_use]
    pub fn root(&self) -> &Element {
        &self.root
    }
}

/// One element of the document tree.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
    text: String,
}

impl Element {
    /// Creates an empty element with the given tag.
    #[must_use]
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Self::default()
        }
    }

    /// Adds an attribute.
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Adds a child element, appending its text to this element's text.
    #[must_use]
    pub fn with_child(mut self, child: Element) -> Self {
        self.text.push_str(&child.text);
        self.children.push(child);
        self
    }

    /// Appends text content.
    #[must_use]
    pub fn with_text(mut self, text: impl AsRef<str>) -> Self {
        self.text.push_str(text.as_ref());
        self
    }

    /// Returns the tag name.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the attributes in document order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(name, value)| (name.as_str(), value.as_str()))
    }

    /// Looks up an attribute value by name.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Returns the child elements in document order.
    #[must_use]
    pub fn children(&self) -> &[Element] {
        &self.children
    }

    /// Returns the concatenated text of this element and its descendants,
    /// with surrounding whitespace trimmed.
    #[must_use]
    pub fn text(&self) -> &str {
        self.text.trim()
    }

    fn open(e: &BytesStart<'_>) -> Result<Self, ParseError> {
        let tag = std::str::from_utf8(e.name().as_ref())?.to_string();
        let mut attributes: Vec<(String, String)> = Vec::new();

        for attr in e.attributes() {
            let attr = attr?;
            let key = std::str::from_utf8(attr.key.as_ref())?;
            let raw = std::str::from_utf8(&attr.value)?;
            if attributes.iter().any(|(existing, _)| existing == key) {
                return Err(ParseError::malformed(format!(
                    "attribute '{key}' repeated on element '{tag}'"
                )));
            }
            attributes.push((key.to_string(), unescape(raw)?.into_owned()));
        }

        Ok(Self {
            tag,
            attributes,
            children: Vec::new(),
            text: String::new(),
        })
    }
}

/// Hands a closed element to its parent, or makes it the root.
fn attach(
    stack: &mut [Element],
    root: &mut Option<Element>,
    element: Element,
) -> Result<(), ParseError> {
    match stack.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(ParseError::malformed(format!(
                "second root element '{}'",
                element.tag
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

/// Appends text to every open element, so each one sees its descendants'
/// text in document order.
fn push_text(stack: &mut [Element], text: &str) -> Result<(), ParseError> {
    if stack.is_empty() {
        if text.trim().is_empty() {
            return Ok(());
        }
        return Err(ParseError::malformed("text outside the root element"));
    }
    for open in stack.iter_mut() {
        open.text.push_str(text);
    }
    Ok(())
}

fn resolve_reference(r: &BytesRef<'_>) -> Result<String, ParseError> {
    if let Some(ch) = r.resolve_char_ref()? {
        return Ok(ch.to_string());
    }
    let name = std::str::from_utf8(r.as_ref())?;
    resolve_predefined_entity(name)
        .map(str::to_string)
        .ok_or_else(|| ParseError::malformed(format!("unknown entity reference '&{name};'")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_tree() {
        let doc = Document::parse_str(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<!-- leading comment -->
<interfaces attr1="v1" attr2="v2">
    <interface name="interface1">
        <description>Tom &amp; Jerry</description>
        <description></description>
    </interface>
</interfaces>"#,
        )
        .expect("Failed to parse document");

        let root = doc.root();
        assert_eq!(root.tag(), "interfaces");
        assert_eq!(
            root.attributes().collect::<Vec<_>>(),
            vec![("attr1", "v1"), ("attr2", "v2")]
        );
        assert_eq!(root.children().len(), 1);

        let interface = &root.children()[0];
        assert_eq!(interface.attribute("name"), Some("interface1"));
        assert_eq!(interface.attribute("missing"), None);
        assert_eq!(interface.children()[0].text(), "Tom & Jerry");
        assert_eq!(interface.children()[1].text(), "");
    }

    #[test]
    fn test_text_includes_descendants_and_cdata() {
        let doc = Document::parse_str("<a>one <b>two</b> <![CDATA[<three>]]> &#65;</a>")
            .expect("Failed to parse document");
        assert_eq!(doc.root().text(), "one two <three> A");
    }

    #[test]
    fn test_attribute_unescaped() {
        let doc = Document::parse_str(r#"<a value="x &lt; y"/>"#).expect("Failed to parse");
        assert_eq!(doc.root().attribute("value"), Some("x < y"));
    }

    #[test]
    fn test_malformed_inputs() {
        for xml in [
            "",
            "<a>",
            "<a></b>",
            "<a/><b/>",
            "text only",
            r#"<a x="1" x="2"/>"#,
        ] {
            let result = Document::parse_str(xml);
            assert!(
                matches!(result, Err(ParseError::MalformedDocument { .. })),
                "expected malformed document for {xml:?}, got {result:?}"
            );
        }
    }

    #[test]
    fn test_read_missing_file_is_io() {
        let dir = tempfile::tempdir().expect("tempdir");
        let result = Document::read(dir.path().join("absent.xml"));
        assert!(matches!(result, Err(ParseError::Io(_))));
    }

    #[test]
    fn test_read_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("doc.xml");
        std::fs::write(&path, "<interfaces/>").expect("write");
        let doc = Document::read(&path).expect("Failed to read document");
        assert_eq!(doc.root().tag(), "interfaces");
    }

    #[test]
    fn test_built_tree_matches_parsed() {
        let built = Element::new("a")
            .with_attribute("name", "x")
            .with_child(Element::new("b").with_text("hi"));
        let parsed = Document::parse_str(r#"<a name="x"><b>hi</b></a>"#).expect("parse");
        assert_eq!(Document::from_root(built), parsed);
    }
}
