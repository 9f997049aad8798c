//! Structural XML decoding for NameSilo replies.
//!
//! Every reply is an envelope shaped `<namesilo><reply>...</reply></namesilo>`.
//! The decoder turns the whole document into a generic [`Value`] tree:
//! leaf elements become strings, attributes become `@`-prefixed keys, text
//! next to attributes or children becomes a `#text` key, and repeated
//! sibling elements collapse into ordered arrays. The schema-naive decode
//! cannot distinguish "one element" from "a list of one" — callers
//! normalize that ambiguity when projecting fields.

use quick_xml::events::BytesStart;
use quick_xml::events::Event;
use quick_xml::Reader;
use serde_json::{Map, Value};

use crate::error::NameSiloError;

struct Frame {
    name: String,
    map: Map<String, Value>,
    text: String,
}

/// Decode a raw reply body into a value tree.
///
/// Fails with [`NameSiloError::MalformedReply`] on anything that is not a
/// well-formed single-rooted XML document.
pub fn decode(raw: &[u8]) -> Result<Value, NameSiloError> {
    let text = std::str::from_utf8(raw)
        .map_err(|e| NameSiloError::MalformedReply(format!("reply is not valid UTF-8: {e}")))?;
    let mut reader = Reader::from_str(text);
    reader.config_mut().trim_text(true);

    let mut stack: Vec<Frame> = Vec::new();
    let mut root: Option<(String, Value)> = None;

    loop {
        match reader.read_event() {
            Ok(Event::Start(start)) => stack.push(open_frame(&start)?),
            Ok(Event::Empty(start)) => {
                let (name, value) = close_frame(open_frame(&start)?);
                place(&mut stack, &mut root, name, value)?;
            }
            Ok(Event::Text(t)) => {
                let content = t.unescape().map_err(malformed)?;
                if let Some(frame) = stack.last_mut() {
                    frame.text.push_str(&content);
                }
            }
            Ok(Event::CData(t)) => {
                if let Some(frame) = stack.last_mut() {
                    frame
                        .text
                        .push_str(&String::from_utf8_lossy(&t.into_inner()));
                }
            }
            Ok(Event::End(end)) => {
                let frame = stack.pop().ok_or_else(|| {
                    NameSiloError::MalformedReply("unexpected closing tag".to_string())
                })?;
                let end_name = end.name();
                let closing = String::from_utf8_lossy(end_name.as_ref());
                if frame.name != closing {
                    return Err(NameSiloError::MalformedReply(format!(
                        "mismatched closing tag: {closing}"
                    )));
                }
                let (name, value) = close_frame(frame);
                place(&mut stack, &mut root, name, value)?;
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => return Err(malformed(e)),
        }
    }

    if !stack.is_empty() {
        return Err(NameSiloError::MalformedReply(
            "unexpected end of document".to_string(),
        ));
    }
    match root {
        Some((name, value)) => {
            let mut map = Map::new();
            map.insert(name, value);
            Ok(Value::Object(map))
        }
        None => Err(NameSiloError::MalformedReply("no root element".to_string())),
    }
}

/// Pull `(code, detail)` out of the reply envelope.
///
/// `code` must be present and numeric-coercible; `detail` defaults to the
/// empty string.
pub fn extract_code(tree: &Value) -> Result<(u32, String), NameSiloError> {
    let reply = &tree["namesilo"]["reply"];
    let code = match &reply["code"] {
        Value::String(s) => s.trim().parse::<u32>().ok(),
        Value::Number(n) => n.as_u64().map(|n| n as u32),
        _ => None,
    }
    .ok_or_else(|| {
        NameSiloError::MalformedReply("reply carries no numeric status code".to_string())
    })?;
    let detail = reply["detail"].as_str().unwrap_or("").to_string();
    Ok((code, detail))
}

/// Fold a field that may decode as one element or as a sequence into an
/// ordered list. `None` when the field is absent.
pub(crate) fn plural(value: &Value) -> Option<Vec<&Value>> {
    match value {
        Value::Array(items) => Some(items.iter().collect()),
        Value::Null => None,
        single => Some(vec![single]),
    }
}

fn open_frame(start: &BytesStart<'_>) -> Result<Frame, NameSiloError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    let mut map = Map::new();
    for attr in start.attributes() {
        let attr = attr.map_err(malformed)?;
        let key = format!("@{}", String::from_utf8_lossy(attr.key.as_ref()));
        let value = attr.unescape_value().map_err(malformed)?.into_owned();
        map.insert(key, Value::String(value));
    }
    Ok(Frame {
        name,
        map,
        text: String::new(),
    })
}

fn close_frame(frame: Frame) -> (String, Value) {
    let Frame {
        name,
        mut map,
        text,
    } = frame;
    let value = if map.is_empty() {
        Value::String(text)
    } else {
        if !text.is_empty() {
            map.insert("#text".to_string(), Value::String(text));
        }
        Value::Object(map)
    };
    (name, value)
}

fn place(
    stack: &mut [Frame],
    root: &mut Option<(String, Value)>,
    name: String,
    value: Value,
) -> Result<(), NameSiloError> {
    if let Some(parent) = stack.last_mut() {
        attach(&mut parent.map, name, value);
        return Ok(());
    }
    if root.is_some() {
        return Err(NameSiloError::MalformedReply(
            "multiple root elements".to_string(),
        ));
    }
    *root = Some((name, value));
    Ok(())
}

/// Repeated sibling elements fold into an ordered array.
fn attach(map: &mut Map<String, Value>, name: String, value: Value) {
    match map.get_mut(&name) {
        Some(Value::Array(items)) => items.push(value),
        Some(existing) => {
            let first = existing.take();
            *existing = Value::Array(vec![first, value]);
        }
        None => {
            map.insert(name, value);
        }
    }
}

fn malformed(err: impl std::fmt::Display) -> NameSiloError {
    NameSiloError::MalformedReply(err.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_nested_envelope() {
        let raw = br#"<?xml version="1.0" encoding="UTF-8"?>
            <namesilo>
                <request><operation>getAccountBalance</operation></request>
                <reply><code>300</code><detail>success</detail><balance>500</balance></reply>
            </namesilo>"#;
        let tree = decode(raw).expect("decode");
        assert_eq!(tree["namesilo"]["reply"]["code"], "300");
        assert_eq!(tree["namesilo"]["reply"]["balance"], "500");
        assert_eq!(tree["namesilo"]["request"]["operation"], "getAccountBalance");
    }

    #[test]
    fn repeated_siblings_become_ordered_arrays() {
        let raw = b"<namesilo><reply><domains><domain>a.com</domain><domain>b.com</domain></domains></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        let domains = tree["namesilo"]["reply"]["domains"]["domain"]
            .as_array()
            .expect("array of domains");
        assert_eq!(domains.len(), 2);
        assert_eq!(domains[0], "a.com");
        assert_eq!(domains[1], "b.com");
    }

    #[test]
    fn single_sibling_stays_scalar() {
        let raw = b"<namesilo><reply><domains><domain>a.com</domain></domains></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        assert_eq!(tree["namesilo"]["reply"]["domains"]["domain"], "a.com");
    }

    #[test]
    fn attributes_and_text_become_keyed_entries() {
        let raw = br#"<namesilo><reply><nameservers>
            <nameserver position="1">ns1.example.com</nameserver>
            <nameserver position="2">ns2.example.com</nameserver>
        </nameservers></reply></namesilo>"#;
        let tree = decode(raw).expect("decode");
        let servers = tree["namesilo"]["reply"]["nameservers"]["nameserver"]
            .as_array()
            .expect("array of nameservers");
        assert_eq!(servers[0]["@position"], "1");
        assert_eq!(servers[0]["#text"], "ns1.example.com");
        assert_eq!(servers[1]["#text"], "ns2.example.com");
    }

    #[test]
    fn empty_element_decodes_to_empty_string() {
        let raw = b"<namesilo><reply><code>300</code><detail/></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        assert_eq!(tree["namesilo"]["reply"]["detail"], "");
    }

    #[test]
    fn text_entities_are_unescaped() {
        let raw = b"<namesilo><reply><detail>one &amp; two</detail></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        assert_eq!(tree["namesilo"]["reply"]["detail"], "one & two");
    }

    #[test]
    fn rejects_mismatched_tags() {
        let raw = b"<namesilo><reply></namesilo></reply>";
        assert!(matches!(decode(raw), Err(NameSiloError::MalformedReply(_))));
    }

    #[test]
    fn rejects_truncated_document() {
        let raw = b"<namesilo><reply><code>300</code>";
        assert!(matches!(decode(raw), Err(NameSiloError::MalformedReply(_))));
    }

    #[test]
    fn rejects_empty_document() {
        assert!(matches!(decode(b""), Err(NameSiloError::MalformedReply(_))));
    }

    #[test]
    fn extract_code_reads_code_and_detail() {
        let raw = b"<namesilo><reply><code>301</code><detail>hosts replaced</detail></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        let (code, detail) = extract_code(&tree).expect("extract");
        assert_eq!(code, 301);
        assert_eq!(detail, "hosts replaced");
    }

    #[test]
    fn extract_code_defaults_missing_detail_to_empty() {
        let raw = b"<namesilo><reply><code>300</code></reply></namesilo>";
        let tree = decode(raw).expect("decode");
        let (code, detail) = extract_code(&tree).expect("extract");
        assert_eq!(code, 300);
        assert_eq!(detail, "");
    }

    #[test]
    fn extract_code_rejects_missing_or_non_numeric_code() {
        let missing = decode(b"<namesilo><reply><detail>x</detail></reply></namesilo>").unwrap();
        assert!(matches!(
            extract_code(&missing),
            Err(NameSiloError::MalformedReply(_))
        ));

        let garbled = decode(b"<namesilo><reply><code>abc</code></reply></namesilo>").unwrap();
        assert!(matches!(
            extract_code(&garbled),
            Err(NameSiloError::MalformedReply(_))
        ));
    }
}
