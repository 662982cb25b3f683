//! Generic XML response tree.
//!
//! EWX responses have an operation-specific shape that this crate does not
//! model. Bodies are instead decoded into an [`XmlNode`] tree using the
//! usual XML-to-object conventions:
//!
//! - the document decodes to a map holding the root element under its name
//! - child elements are grouped by name into ordered lists, even when a
//!   name occurs once
//! - attributes are collected in a map under the `"$"` key
//! - text next to attributes or child elements is stored under `"_"`
//! - an element with neither attributes nor children decodes to its text,
//!   which is empty for `<empty/>`
//! - whitespace-only text between elements is dropped
//!
//! ```rust
//! use ewx::XmlNode;
//!
//! let tree = XmlNode::parse(
//!     r#"<gateways result="ok"><gateway><id>IDEAL</id></gateway><gateway><id>VISA</id></gateway></gateways>"#,
//! )
//! .unwrap();
//!
//! let root = tree.get("gateways").unwrap();
//! let gateways = root.children("gateway");
//! assert_eq!(gateways.len(), 2);
//! assert_eq!(gateways[1].first("id").and_then(XmlNode::as_text), Some("VISA"));
//! assert_eq!(root.attribute("result"), Some("ok"));
//! ```

use std::collections::BTreeMap;

use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use serde::Serialize;

use crate::config::ResponseFormat;
use crate::error::DecodeError;

/// Map key holding an element's attributes.
pub const ATTRIBUTES_KEY: &str = "$";

/// Map key holding an element's text when it also has attributes or children.
pub const TEXT_KEY: &str = "_";

/// A node of a decoded XML document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum XmlNode {
    /// Text content.
    Text(String),
    /// Same-named sibling elements in document order.
    List(Vec<Self>),
    /// An element with attributes or children, keyed by name.
    Map(BTreeMap<String, Self>),
}

impl XmlNode {
    /// Decodes an XML document.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if the document is not well-formed. No
    /// partial tree is returned.
    pub fn parse(xml: &str) -> Result<Self, DecodeError> {
        let mut reader = Reader::from_str(xml);
        let mut stack: Vec<Frame> = Vec::new();
        let mut root: Option<(String, Self)> = None;

        loop {
            let event = reader.read_event().map_err(|source| DecodeError::Xml {
                position: reader.buffer_position(),
                source,
            })?;
            match event {
                Event::Start(start) => {
                    stack.push(Frame::open(&start, reader.buffer_position())?);
                }
                Event::Empty(start) => {
                    let (name, node) = Frame::open(&start, reader.buffer_position())?.close();
                    attach(&mut stack, &mut root, name, node)?;
                }
                Event::End(_) => {
                    // The reader verifies that end tags match their start tags.
                    if let Some(frame) = stack.pop() {
                        let (name, node) = frame.close();
                        attach(&mut stack, &mut root, name, node)?;
                    }
                }
                Event::Text(text) => {
                    let text = text.unescape().map_err(|source| DecodeError::Xml {
                        position: reader.buffer_position(),
                        source,
                    })?;
                    append_text(&mut stack, &text)?;
                }
                Event::CData(data) => {
                    append_text(&mut stack, &String::from_utf8_lossy(&data))?;
                }
                Event::Eof => break,
                Event::Decl(_) | Event::PI(_) | Event::Comment(_) | Event::DocType(_) => {}
            }
        }

        if let Some(frame) = stack.pop() {
            return Err(DecodeError::Unclosed(frame.name));
        }
        let (name, node) = root.ok_or(DecodeError::MissingRoot)?;
        Ok(Self::Map(BTreeMap::from([(name, node)])))
    }

    /// Looks up a key of a [`XmlNode::Map`].
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Self> {
        match self {
            Self::Map(map) => map.get(key),
            Self::Text(_) | Self::List(_) => None,
        }
    }

    /// Returns the child elements named `name`, in document order.
    #[must_use]
    pub fn children(&self, name: &str) -> &[Self] {
        match self.get(name) {
            Some(Self::List(items)) => items,
            Some(node) => std::slice::from_ref(node),
            None => &[],
        }
    }

    /// Returns the first child element named `name`.
    #[must_use]
    pub fn first(&self, name: &str) -> Option<&Self> {
        self.children(name).first()
    }

    /// Returns the text of this node: a [`XmlNode::Text`] value or the
    /// `"_"` entry of a map.
    #[must_use]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(text) => Some(text),
            Self::Map(_) => self.get(TEXT_KEY).and_then(Self::as_text),
            Self::List(_) => None,
        }
    }

    /// Returns the value of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.get(ATTRIBUTES_KEY)?.get(name)?.as_text()
    }
}

/// An element still being read.
#[derive(Debug)]
struct Frame {
    name: String,
    attributes: BTreeMap<String, XmlNode>,
    children: BTreeMap<String, Vec<XmlNode>>,
    text: String,
}

impl Frame {
    fn open(start: &BytesStart<'_>, position: u64) -> Result<Self, DecodeError> {
        let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
        let mut attributes = BTreeMap::new();
        for attribute in start.attributes() {
            let attribute = attribute?;
            let key = String::from_utf8_lossy(attribute.key.as_ref()).into_owned();
            let value = attribute
                .unescape_value()
                .map_err(|source| DecodeError::Xml { position, source })?
                .into_owned();
            attributes.insert(key, XmlNode::Text(value));
        }
        Ok(Self {
            name,
            attributes,
            children: BTreeMap::new(),
            text: String::new(),
        })
    }

    fn close(self) -> (String, XmlNode) {
        if self.attributes.is_empty() && self.children.is_empty() {
            return (self.name, XmlNode::Text(self.text));
        }
        let mut map: BTreeMap<String, XmlNode> = self
            .children
            .into_iter()
            .map(|(name, nodes)| (name, XmlNode::List(nodes)))
            .collect();
        if !self.attributes.is_empty() {
            map.insert(ATTRIBUTES_KEY.to_owned(), XmlNode::Map(self.attributes));
        }
        if !self.text.trim().is_empty() {
            map.insert(TEXT_KEY.to_owned(), XmlNode::Text(self.text));
        }
        (self.name, XmlNode::Map(map))
    }
}

fn attach(
    stack: &mut [Frame],
    root: &mut Option<(String, XmlNode)>,
    name: String,
    node: XmlNode,
) -> Result<(), DecodeError> {
    if let Some(parent) = stack.last_mut() {
        parent.children.entry(name).or_default().push(node);
        Ok(())
    } else if root.is_some() {
        Err(DecodeError::TrailingElement(name))
    } else {
        *root = Some((name, node));
        Ok(())
    }
}

/// Appends character data to the open element. Outside the root only
/// whitespace is allowed.
fn append_text(stack: &mut [Frame], text: &str) -> Result<(), DecodeError> {
    match stack.last_mut() {
        Some(frame) => {
            frame.text.push_str(text);
            Ok(())
        }
        None if text.trim().is_empty() => Ok(()),
        None => Err(DecodeError::TextOutsideRoot(text.trim().to_owned())),
    }
}

/// A response body as handed back to the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum GatewayResponse {
    /// The body text, unchanged.
    Raw(String),
    /// The decoded body.
    Parsed(XmlNode),
}

impl GatewayResponse {
    /// Converts a response body according to `format`.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError`] if `format` is [`ResponseFormat::ParsedObject`]
    /// and the body is not well-formed XML.
    pub fn from_body(body: String, format: ResponseFormat) -> Result<Self, DecodeError> {
        match format {
            ResponseFormat::RawXml => Ok(Self::Raw(body)),
            ResponseFormat::ParsedObject => XmlNode::parse(&body).map(Self::Parsed),
        }
    }

    /// Returns the raw body, if undecoded.
    #[must_use]
    pub fn as_raw(&self) -> Option<&str> {
        match self {
            Self::Raw(body) => Some(body),
            Self::Parsed(_) => None,
        }
    }

    /// Returns the decoded tree, if decoded.
    #[must_use]
    pub const fn as_parsed(&self) -> Option<&XmlNode> {
        match self {
            Self::Parsed(node) => Some(node),
            Self::Raw(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const GATEWAYS: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<gateways result="ok">
  <gateways>
    <gateway>
      <id>IDEAL</id>
      <description>iDEAL</description>
    </gateway>
    <gateway>
      <id>VISA</id>
      <description>Visa CreditCards</description>
    </gateway>
  </gateways>
</gateways>"#;

    #[test]
    fn test_gateway_listing_children_are_ordered() {
        let tree = XmlNode::parse(GATEWAYS).unwrap();
        let root = tree.get("gateways").unwrap();
        assert_eq!(root.attribute("result"), Some("ok"));

        let list = root.first("gateways").unwrap();
        let gateways = list.children("gateway");
        assert_eq!(gateways.len(), 2);
        assert_eq!(gateways[0].first("id").and_then(XmlNode::as_text), Some("IDEAL"));
        assert_eq!(gateways[1].first("id").and_then(XmlNode::as_text), Some("VISA"));
        assert_eq!(
            gateways[1].first("description").and_then(XmlNode::as_text),
            Some("Visa CreditCards")
        );
    }

    #[test]
    fn test_single_child_is_still_a_list() {
        let tree = XmlNode::parse("<a><b>1</b></a>").unwrap();
        assert_eq!(
            tree.get("a").unwrap().get("b"),
            Some(&XmlNode::List(vec![XmlNode::Text("1".into())]))
        );
    }

    #[test]
    fn test_empty_elements_decode_to_empty_text() {
        let tree = XmlNode::parse("<a><b/><c></c></a>").unwrap();
        let a = tree.get("a").unwrap();
        assert_eq!(a.first("b").and_then(XmlNode::as_text), Some(""));
        assert_eq!(a.first("c").and_then(XmlNode::as_text), Some(""));
    }

    #[test]
    fn test_text_with_attributes_uses_text_key() {
        let tree = XmlNode::parse(r#"<issuer code="0031">ABN AMRO</issuer>"#).unwrap();
        let issuer = tree.get("issuer").unwrap();
        assert_eq!(issuer.attribute("code"), Some("0031"));
        assert_eq!(issuer.as_text(), Some("ABN AMRO"));
        assert_eq!(issuer.get(TEXT_KEY), Some(&XmlNode::Text("ABN AMRO".into())));
    }

    #[test]
    fn test_entities_and_cdata_are_decoded() {
        let tree = XmlNode::parse("<a><b>R&amp;D</b><c><![CDATA[<raw>]]></c></a>").unwrap();
        let a = tree.get("a").unwrap();
        assert_eq!(a.first("b").and_then(XmlNode::as_text), Some("R&D"));
        assert_eq!(a.first("c").and_then(XmlNode::as_text), Some("<raw>"));
    }

    #[test]
    fn test_serializes_as_plain_json() {
        let tree = XmlNode::parse(r#"<a x="1"><b>2</b></a>"#).unwrap();
        assert_eq!(
            serde_json::to_value(&tree).unwrap(),
            serde_json::json!({ "a": { "$": { "x": "1" }, "b": ["2"] } })
        );
    }

    #[test]
    fn test_mismatched_end_tag_is_error() {
        assert!(XmlNode::parse("<a><b></a></b>").is_err());
    }

    #[test]
    fn test_unclosed_element_is_error() {
        assert!(XmlNode::parse("<a><b>text</b>").is_err());
    }

    #[test]
    fn test_missing_root_is_error() {
        assert!(matches!(XmlNode::parse(""), Err(DecodeError::MissingRoot)));
        assert!(matches!(XmlNode::parse(" \n\t"), Err(DecodeError::MissingRoot)));
    }

    #[test]
    fn test_text_before_root_is_error() {
        assert!(matches!(
            XmlNode::parse("garbage<a>1</a>"),
            Err(DecodeError::TextOutsideRoot(text)) if text == "garbage"
        ));
        assert!(matches!(
            XmlNode::parse("not xml at all"),
            Err(DecodeError::TextOutsideRoot(_))
        ));
    }

    #[test]
    fn test_text_after_root_is_error() {
        assert!(matches!(
            XmlNode::parse("<a>1</a>not xml"),
            Err(DecodeError::TextOutsideRoot(text)) if text == "not xml"
        ));
        assert!(matches!(
            XmlNode::parse("<a>1</a><![CDATA[tail]]>"),
            Err(DecodeError::TextOutsideRoot(_))
        ));
    }

    #[test]
    fn test_whitespace_around_root_is_allowed() {
        let tree = XmlNode::parse("\n  <a>1</a>\n\n").unwrap();
        assert_eq!(tree.get("a").and_then(XmlNode::as_text), Some("1"));
    }

    #[test]
    fn test_second_root_is_error() {
        assert!(matches!(
            XmlNode::parse("<a/><b/>"),
            Err(DecodeError::TrailingElement(name)) if name == "b"
        ));
    }

    #[test]
    fn test_from_body_respects_format() {
        let raw = GatewayResponse::from_body("<a>1</a>".into(), ResponseFormat::RawXml).unwrap();
        assert_eq!(raw.as_raw(), Some("<a>1</a>"));

        let parsed =
            GatewayResponse::from_body("<a>1</a>".into(), ResponseFormat::ParsedObject).unwrap();
        let tree = parsed.as_parsed().unwrap();
        assert_eq!(tree.get("a").and_then(XmlNode::as_text), Some("1"));

        assert!(GatewayResponse::from_body("<a>".into(), ResponseFormat::ParsedObject).is_err());
        assert!(GatewayResponse::from_body("<a>".into(), ResponseFormat::RawXml).is_ok());
    }
}
