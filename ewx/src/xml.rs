//! Element tree and serializer for request documents.
//!
//! Requests are assembled as an [`Element`] tree and written out with
//! `quick-xml` by [`XmlWriter`]. The writer never indents, writes empty
//! leaves as a start/end pair, and by default copies values verbatim so the
//! output matches the legacy wire format exactly.

use std::borrow::Cow;

use quick_xml::Writer;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};

use crate::config::RenderOptions;
use crate::error::RenderError;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Content {
    Leaf(String),
    Children(Vec<Element>),
}

/// A single XML element: a leaf holding text, or a container of elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    name: &'static str,
    attributes: Vec<(&'static str, String)>,
    content: Content,
}

impl Element {
    /// Creates an empty container element.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            content: Content::Children(Vec::new()),
        }
    }

    /// Creates a leaf element holding `text`.
    #[must_use]
    pub fn text(name: &'static str, text: impl Into<String>) -> Self {
        Self {
            name,
            attributes: Vec::new(),
            content: Content::Leaf(text.into()),
        }
    }

    /// Returns the element name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Adds an attribute.
    #[must_use]
    pub fn attr(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.attributes.push((name, value.into()));
        self
    }

    /// Appends a child element. Turns a leaf into a container.
    #[must_use]
    pub fn child(mut self, child: Self) -> Self {
        match &mut self.content {
            Content::Children(children) => children.push(child),
            Content::Leaf(_) => self.content = Content::Children(vec![child]),
        }
        self
    }

    /// Appends a leaf child that is always part of the tree, even when empty.
    #[must_use]
    pub fn leaf(self, name: &'static str, value: impl Into<String>) -> Self {
        self.child(Self::text(name, value))
    }

    /// Appends a leaf child only when `value` is present.
    #[must_use]
    pub fn optional_leaf(self, name: &'static str, value: Option<&str>) -> Self {
        match value {
            Some(value) => self.leaf(name, value),
            None => self,
        }
    }

    /// Returns the child elements; empty for a leaf.
    #[must_use]
    pub fn children(&self) -> &[Self] {
        match &self.content {
            Content::Children(children) => children,
            Content::Leaf(_) => &[],
        }
    }

    /// Returns the leaf text, if this is a leaf.
    #[must_use]
    pub fn leaf_text(&self) -> Option<&str> {
        match &self.content {
            Content::Leaf(text) => Some(text),
            Content::Children(_) => None,
        }
    }

    fn is_empty_leaf(&self) -> bool {
        matches!(&self.content, Content::Leaf(text) if text.is_empty())
    }
}

/// Serializes [`Element`] trees into complete request documents.
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlWriter {
    options: RenderOptions,
}

impl XmlWriter {
    /// Creates a writer with the given rendering switches.
    #[must_use]
    pub const fn new(options: RenderOptions) -> Self {
        Self { options }
    }

    /// Writes the XML declaration followed by `root`.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError`] if the underlying writer fails.
    pub fn document(&self, root: &Element) -> Result<String, RenderError> {
        let mut writer = Writer::new(Vec::new());
        writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;
        self.write_element(&mut writer, root)?;
        Ok(String::from_utf8(writer.into_inner())?)
    }

    fn write_element(
        &self,
        writer: &mut Writer<Vec<u8>>,
        element: &Element,
    ) -> Result<(), RenderError> {
        let mut start = BytesStart::new(element.name);
        for (key, value) in &element.attributes {
            flag_markup(element.name, value, self.options);
            if self.options.escape_values {
                start.push_attribute((*key, value.as_str()));
            } else {
                start.push_attribute(Attribute::from((key.as_bytes(), value.as_bytes())));
            }
        }
        writer.write_event(Event::Start(start))?;

        match &element.content {
            Content::Leaf(text) => {
                flag_markup(element.name, text, self.options);
                if !text.is_empty() {
                    let event = if self.options.escape_values {
                        BytesText::new(text)
                    } else {
                        BytesText::from_escaped(Cow::Borrowed(text.as_str()))
                    };
                    writer.write_event(Event::Text(event))?;
                }
            }
            Content::Children(children) => {
                for child in children {
                    if child.is_empty_leaf() && !self.options.emit_empty_leaves {
                        continue;
                    }
                    self.write_element(writer, child)?;
                }
            }
        }

        writer.write_event(Event::End(BytesEnd::new(element.name)))?;
        Ok(())
    }
}

/// Returns `true` if `value` contains characters that change the meaning of
/// the document when written unescaped.
#[must_use]
pub fn contains_markup(value: &str) -> bool {
    value.contains(['<', '>', '&', '"'])
}

#[cfg(feature = "telemetry")]
fn flag_markup(element: &str, value: &str, options: RenderOptions) {
    if !options.escape_values && contains_markup(value) {
        tracing::warn!(
            element,
            "unescaped value contains XML markup and will corrupt the request"
        );
    }
}

#[cfg(not(feature = "telemetry"))]
const fn flag_markup(_element: &str, _value: &str, _options: RenderOptions) {}

#[cfg(test)]
mod tests {
    use super::*;

    fn legacy() -> XmlWriter {
        XmlWriter::new(RenderOptions::default())
    }

    #[test]
    fn test_document_starts_with_declaration() {
        let doc = legacy().document(&Element::new("gateways")).unwrap();
        assert_eq!(
            doc,
            r#"<?xml version="1.0" encoding="utf-8"?><gateways></gateways>"#
        );
    }

    #[test]
    fn test_empty_leaf_written_as_pair() {
        let root = Element::new("customer").leaf("locale", "");
        let doc = legacy().document(&root).unwrap();
        assert!(doc.ends_with("<customer><locale></locale></customer>"));
    }

    #[test]
    fn test_empty_leaf_dropped_when_disabled() {
        let writer = XmlWriter::new(RenderOptions {
            escape_values: false,
            emit_empty_leaves: false,
        });
        let root = Element::new("customer").leaf("locale", "").leaf("city", "Amsterdam");
        let doc = writer.document(&root).unwrap();
        assert!(doc.ends_with("<customer><city>Amsterdam</city></customer>"));
    }

    #[test]
    fn test_optional_leaf_skips_none() {
        let root = Element::new("customer")
            .optional_leaf("country", None)
            .optional_leaf("locale", Some("nl_NL"));
        assert_eq!(root.children().len(), 1);
        assert_eq!(root.children()[0].name(), "locale");
        assert_eq!(root.children()[0].leaf_text(), Some("nl_NL"));
    }

    #[test]
    fn test_values_written_verbatim_by_default() {
        let root = Element::new("transaction")
            .attr("ua", "a&b")
            .leaf("description", "Fish & <Chips>");
        let doc = legacy().document(&root).unwrap();
        assert!(doc.ends_with(
            r#"<transaction ua="a&b"><description>Fish & <Chips></description></transaction>"#
        ));
    }

    #[test]
    fn test_values_escaped_when_enabled() {
        let writer = XmlWriter::new(RenderOptions {
            escape_values: true,
            emit_empty_leaves: true,
        });
        let root = Element::new("transaction")
            .attr("ua", "a&b")
            .leaf("description", "Fish & <Chips>");
        let doc = writer.document(&root).unwrap();
        assert!(doc.ends_with(
            r#"<transaction ua="a&amp;b"><description>Fish &amp; &lt;Chips&gt;</description></transaction>"#
        ));
    }

    #[test]
    fn test_contains_markup() {
        assert!(contains_markup("a < b"));
        assert!(contains_markup("R&D"));
        assert!(!contains_markup("plain text"));
    }
}
