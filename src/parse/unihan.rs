//! Unihan flat XML parsing
//!
//! The export is one `<char .../>` element per line; attributes are read with
//! a pair of regexes rather than a full XML parser.

use crate::models::HanziEntry;
use regex::Regex;
use std::collections::HashMap;
use std::sync::OnceLock;
use tracing::debug;

fn char_element() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<char (.*?)/>").expect("valid char element regex"))
}

fn attribute() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r#"([a-zA-Z0-9_]*)="(.*?)""#).expect("valid attribute regex"))
}

fn comment() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<!--(.*?)-->").expect("valid comment regex"))
}

/// Convert a hex codepoint (`4E00`, optionally followed by `<source`) to its character
fn codepoint_to_char(token: &str) -> Option<char> {
    let hex = token.split('<').next().unwrap_or(token);
    u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
}

/// Convert `U+4E07 U+842C` to `万, 萬`; other values pass through
fn expand_codepoints(value: &str) -> String {
    if !value.starts_with("U+") {
        return value.to_string();
    }

    value
        .replace("U+", "")
        .split_whitespace()
        .filter_map(|token| {
            let ch = codepoint_to_char(token);
            if ch.is_none() {
                debug!(token, "Skipping unparseable Unihan codepoint");
            }
            ch
        })
        .map(String::from)
        .collect::<Vec<_>>()
        .join(", ")
}

fn non_empty(attrs: &HashMap<&str, &str>, key: &str) -> bool {
    attrs.get(key).is_some_and(|v| !v.is_empty())
}

/// Parse every character that has a Mandarin or Cantonese reading
pub fn parse_unihan(xml: &str) -> Vec<HanziEntry> {
    char_element()
        .captures_iter(xml)
        .filter_map(|element| {
            let body = element.get(1)?.as_str();
            let attrs: HashMap<&str, &str> = attribute()
                .captures_iter(body)
                .filter_map(|pair| Some((pair.get(1)?.as_str(), pair.get(2)?.as_str())))
                .collect();

            if !non_empty(&attrs, "kMandarin") && !non_empty(&attrs, "kCantonese") {
                return None;
            }

            let cp = attrs.get("cp").and_then(|cp| codepoint_to_char(cp))?;
            let field = |key: &str| attrs.get(key).map(|v| expand_codepoints(v));

            Some(HanziEntry {
                cp: cp.to_string(),
                mandarin: field("kMandarin"),
                cantonese: field("kCantonese"),
                simplified_variant: field("kSimplifiedVariant"),
                traditional_variant: field("kTraditionalVariant"),
            })
        })
        .collect()
}

/// Bodies of the XML comments, which carry the Unicode license text
pub fn license_comments(xml: &str) -> Vec<String> {
    comment()
        .captures_iter(xml)
        .filter_map(|c| c.get(1).map(|m| m.as_str().to_string()))
        .collect()
}
