//! Built XML tree and its serialization
//!
//! [`XmlNode`] is the generic output of `Element::build`. Serialization is a
//! plain traversal over quick-xml's `Writer`. Markup characters are escaped;
//! characters XML 1.0 cannot represent at all are rejected.

use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;

use crate::domain::error::{DomainError, DomainResult};

/// A generic built tree node.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct XmlNode {
    pub tag: String,
    /// Attributes in output order.
    pub attributes: Vec<(String, String)>,
    pub text: Option<String>,
    pub children: Vec<XmlNode>,
}

impl XmlNode {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            ..Default::default()
        }
    }

    /// Attach `child` as the last child and return it.
    pub fn push_child(&mut self, child: XmlNode) -> &mut XmlNode {
        let idx = self.children.len();
        self.children.push(child);
        &mut self.children[idx]
    }

    /// Value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    fn is_empty_element(&self) -> bool {
        self.text.is_none() && self.children.is_empty()
    }

    /// Serialize without an XML declaration.
    ///
    /// Fails with [`DomainError::Serialize`] when a text or attribute value
    /// holds a character outside the XML 1.0 `Char` production (control
    /// characters other than tab, newline and carriage return, `U+FFFE`,
    /// `U+FFFF`). Such characters cannot be escaped.
    pub fn to_xml_string(&self) -> DomainResult<String> {
        let mut writer = Writer::new(Vec::new());
        self.write(&mut writer)?;
        into_string(writer)
    }

    /// Serialize with a leading `<?xml version="1.0" encoding="UTF-8"?>`.
    pub fn to_xml_document(&self) -> DomainResult<String> {
        let mut writer = Writer::new(Vec::new());
        writer
            .write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)))
            .map_err(serialize_err)?;
        self.write(&mut writer)?;
        into_string(writer)
    }

    fn write(&self, writer: &mut Writer<Vec<u8>>) -> DomainResult<()> {
        let mut start = BytesStart::new(self.tag.as_str());
        for (name, value) in &self.attributes {
            check_chars(&self.tag, value)?;
            start.push_attribute((name.as_str(), value.as_str()));
        }

        if self.is_empty_element() {
            writer
                .write_event(Event::Empty(start))
                .map_err(serialize_err)?;
            return Ok(());
        }

        writer
            .write_event(Event::Start(start))
            .map_err(serialize_err)?;
        if let Some(text) = &self.text {
            check_chars(&self.tag, text)?;
            writer
                .write_event(Event::Text(BytesText::new(text)))
                .map_err(serialize_err)?;
        }
        for child in &self.children {
            child.write(writer)?;
        }
        writer
            .write_event(Event::End(BytesEnd::new(self.tag.as_str())))
            .map_err(serialize_err)?;
        Ok(())
    }
}

fn is_xml_char(c: char) -> bool {
    matches!(c, '\t' | '\n' | '\r') || (c >= ' ' && !matches!(c, '\u{FFFE}' | '\u{FFFF}'))
}

fn check_chars(tag: &str, value: &str) -> DomainResult<()> {
    match value.chars().find(|c| !is_xml_char(*c)) {
        Some(c) => Err(DomainError::Serialize(format!(
            "<{tag}> holds {c:?}, which XML 1.0 cannot represent"
        ))),
        None => Ok(()),
    }
}

fn serialize_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::Serialize(e.to_string())
}

fn into_string(writer: Writer<Vec<u8>>) -> DomainResult<String> {
    String::from_utf8(writer.into_inner()).map_err(serialize_err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_element_is_self_closing() {
        assert_eq!(XmlNode::new("item").to_xml_string().unwrap(), "<item/>");
    }

    #[test]
    fn test_text_and_attributes_are_escaped() {
        let mut node = XmlNode::new("title");
        node.attributes.push(("arg".into(), "a\"b&c".into()));
        node.text = Some("<Tom & Jerry>".into());
        assert_eq!(
            node.to_xml_string().unwrap(),
            r#"<title arg="a&quot;b&amp;c">&lt;Tom &amp; Jerry&gt;</title>"#
        );
    }

    #[test]
    fn test_children_keep_order() {
        let mut root = XmlNode::new("root");
        root.push_child(XmlNode::new("a"));
        root.push_child(XmlNode::new("b")).text = Some("x".into());
        assert_eq!(
            root.to_xml_string().unwrap(),
            "<root><a/><b>x</b></root>"
        );
    }

    #[test]
    fn test_document_has_declaration() {
        let xml = XmlNode::new("items").to_xml_document().unwrap();
        assert_eq!(xml, r#"<?xml version="1.0" encoding="UTF-8"?><items/>"#);
    }

    #[test]
    fn test_forbidden_control_characters_are_rejected() {
        let mut text = XmlNode::new("title");
        text.text = Some("bell\u{7}".into());
        assert!(matches!(
            text.to_xml_string(),
            Err(DomainError::Serialize(_))
        ));

        let mut attr = XmlNode::new("item");
        attr.attributes.push(("arg".into(), "\u{1}".into()));
        let mut root = XmlNode::new("items");
        root.push_child(attr);
        assert!(root.to_xml_document().is_err());
    }

    #[test]
    fn test_whitespace_controls_are_kept() {
        let mut node = XmlNode::new("title");
        node.text = Some("a\tb\nc".into());
        assert_eq!(node.to_xml_string().unwrap(), "<title>a\tb\nc</title>");
    }

    #[test]
    fn test_attribute_lookup() {
        let mut node = XmlNode::new("icon");
        node.attributes.push(("type".into(), "fileicon".into()));
        assert_eq!(node.attribute("type"), Some("fileicon"));
        assert_eq!(node.attribute("mod"), None);
    }
}
