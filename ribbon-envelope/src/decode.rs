//! Decoding of raw response bodies into [`XmlValue`] documents.
//!
//! SBC response bodies are not always well-formed XML: free-text fields such
//! as SIP URIs can carry bare `&` characters that the device never escaped.
//! Decoding therefore repairs stray ampersands before handing the body to
//! the XML parser, leaving intact anything that already is a well-formed
//! escape.

use std::collections::BTreeMap;

use xmltree::Element;

use crate::error::{EnvelopeError, EnvelopeResult};
use crate::value::XmlValue;

/// Longest run of digits accepted in a character reference.
const MAX_REFERENCE_DIGITS: usize = 8;

/// Decode a response body into an [`XmlValue`] document.
///
/// The body is trimmed, repaired with [`escape_bare_ampersands`], and parsed
/// into a single-entry map keyed by the root element's name, so the envelope
/// is reachable as `document.get("root")`.
///
/// # Arguments
///
/// * `body` - The raw response body text
///
/// # Returns
///
/// The decoded document, or [`EnvelopeError::Parse`] when the repaired body
/// still is not well-formed XML.
pub fn decode(body: &str) -> EnvelopeResult<XmlValue> {
    let repaired = escape_bare_ampersands(body.trim());
    let root = Element::parse(repaired.as_bytes())
        .map_err(|e| EnvelopeError::Parse(e.to_string()))?;

    let mut document = BTreeMap::new();
    document.insert(root.name.clone(), XmlValue::from(&root));
    Ok(XmlValue::Map(document))
}

/// Replace every `&` that does not begin a well-formed XML escape with
/// `&amp;`.
///
/// # Example
///
/// Input: `<uri>sip:a&b@host?x=1&amp;y=2</uri>`
/// Output: `<uri>sip:a&amp;b@host?x=1&amp;y=2</uri>`
pub fn escape_bare_ampersands(xml: &str) -> String {
    let mut repaired = String::with_capacity(xml.len());
    let mut rest = xml;

    while let Some(pos) = rest.find('&') {
        repaired.push_str(&rest[..pos]);
        let tail = &rest[pos + 1..];
        if starts_escape(tail) {
            repaired.push('&');
        } else {
            repaired.push_str("&amp;");
        }
        rest = tail;
    }

    repaired.push_str(rest);
    repaired
}

/// True when `rest`, the text following a `&`, begins a well-formed XML
/// escape: one of the five predefined entities or a character reference.
fn starts_escape(rest: &str) -> bool {
    const NAMED: [&str; 5] = ["amp;", "lt;", "gt;", "apos;", "quot;"];
    if NAMED.iter().any(|entity| rest.starts_with(entity)) {
        return true;
    }

    // Character references: &#38; or &#x26;
    let digits = match rest.strip_prefix('#') {
        Some(tail) => tail,
        None => return false,
    };
    let (digits, radix) = match digits.strip_prefix('x').or_else(|| digits.strip_prefix('X')) {
        Some(tail) => (tail, 16),
        None => (digits, 10),
    };

    let mut seen = 0;
    for c in digits.chars() {
        if c == ';' {
            return seen > 0;
        }
        if !c.is_digit(radix) || seen == MAX_REFERENCE_DIGITS {
            return false;
        }
        seen += 1;
    }
    false
}
