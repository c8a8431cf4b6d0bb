//! Generic nested mapping for decoded XML documents.
//!
//! The SBC answers every REST call with a schemaless XML envelope, so
//! responses are decoded into [`XmlValue`] rather than typed structs.
//! The folding rules match the conventions callers of the REST API already
//! rely on: attributes become `@`-prefixed keys, repeated sibling elements
//! collapse into a list, and an empty element decodes as null.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use serde::Serialize;
use xmltree::{Element, XMLNode};

/// Key holding an element's character data when it also carries
/// attributes or child elements.
pub const TEXT_KEY: &str = "#text";

/// A decoded XML element tree.
///
/// # Example
///
/// ```
/// use ribbon_envelope::decode;
///
/// let doc = decode("<root><status><http_code>200</http_code></status></root>").unwrap();
/// let code = doc
///     .get("root")
///     .and_then(|root| root.get("status"))
///     .and_then(|status| status.get("http_code"))
///     .and_then(|code| code.as_text());
/// assert_eq!(code, Some("200"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum XmlValue {
    /// An element with no attributes, children, or text
    Null,
    /// Character data
    Text(String),
    /// Repeated sibling elements sharing one name, in document order
    List(Vec<XmlValue>),
    /// An element's attributes (`@name`), children, and mixed text (`#text`)
    Map(BTreeMap<String, XmlValue>),
}

impl XmlValue {
    /// Look up a key in a `Map` value. Returns `None` for every other
    /// variant, so lookups chain with `and_then` without shape checks.
    pub fn get(&self, key: &str) -> Option<&XmlValue> {
        match self {
            XmlValue::Map(entries) => entries.get(key),
            _ => None,
        }
    }

    /// Character data of a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            XmlValue::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Entries of a `Map` value.
    pub fn as_map(&self) -> Option<&BTreeMap<String, XmlValue>> {
        match self {
            XmlValue::Map(entries) => Some(entries),
            _ => None,
        }
    }

    /// Items of a `List` value.
    pub fn as_list(&self) -> Option<&[XmlValue]> {
        match self {
            XmlValue::List(items) => Some(items),
            _ => None,
        }
    }

    /// True for the `Null` variant.
    pub fn is_null(&self) -> bool {
        matches!(self, XmlValue::Null)
    }
}

impl From<&Element> for XmlValue {
    fn from(element: &Element) -> Self {
        let mut entries: BTreeMap<String, XmlValue> = BTreeMap::new();

        for (name, value) in &element.attributes {
            entries.insert(format!("@{}", name), XmlValue::Text(value.clone()));
        }

        let mut text = String::new();
        for node in &element.children {
            match node {
                XMLNode::Element(child) => {
                    insert_child(&mut entries, child.name.clone(), XmlValue::from(child));
                }
                XMLNode::Text(chunk) | XMLNode::CData(chunk) => text.push_str(chunk),
                _ => {}
            }
        }

        let text = text.trim();
        if entries.is_empty() {
            return if text.is_empty() {
                XmlValue::Null
            } else {
                XmlValue::Text(text.to_string())
            };
        }
        if !text.is_empty() {
            entries.insert(TEXT_KEY.to_string(), XmlValue::Text(text.to_string()));
        }
        XmlValue::Map(entries)
    }
}

/// Insert a decoded child element, promoting repeated names to a list.
fn insert_child(entries: &mut BTreeMap<String, XmlValue>, name: String, value: XmlValue) {
    match entries.entry(name) {
        Entry::Vacant(slot) => {
            slot.insert(value);
        }
        Entry::Occupied(mut slot) => match slot.get_mut() {
            XmlValue::List(items) => items.push(value),
            existing => {
                let first = std::mem::replace(existing, XmlValue::Null);
                *existing = XmlValue::List(vec![first, value]);
            }
        },
    }
}
