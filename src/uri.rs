//! URI splitting, path hygiene and the query-string codec
//!
//! The only wire format in this crate is the URL string itself. This module
//! owns the pieces of it that are not pattern matching: collapsing repeated
//! slashes, splitting a URI at its `?`, and encoding/decoding the flat
//! `key=value&key2=value2` query representation.

use std::collections::BTreeMap;

/// Clean a path by collapsing any run of `/` into a single `/`.
///
/// Without this, route authors would have to be careful about when to write a
/// leading or trailing `/` in nested declarations.
///
/// Idempotent: `clean_path(clean_path(p)) == clean_path(p)`.
///
/// # Example
///
/// ```
/// use wayfinder::clean_path;
///
/// assert_eq!(clean_path("//a/b///c"), "/a/b/c");
/// ```
pub fn clean_path(path: &str) -> String {
    let mut out = String::with_capacity(path.len());
    let mut prev_slash = false;
    for c in path.chars() {
        if c == '/' {
            if !prev_slash {
                out.push(c);
            }
            prev_slash = true;
        } else {
            out.push(c);
            prev_slash = false;
        }
    }
    out
}

/// Split a URI at the first `?`.
///
/// Returns the path part and the raw query string (without the leading `?`).
/// A URI starting with `?` yields an empty path; a URI without `?` yields an
/// empty query string.
pub fn split_uri(uri: &str) -> (&str, &str) {
    match uri.split_once('?') {
        Some((path, query)) => (path, query),
        None => (uri, ""),
    }
}

/// A single query parameter value: scalar or array-style.
///
/// Array values come from the `key[]` bracket suffix convention and serialize
/// back to repeated `key[]=v` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// A single value. A key with no `=` or an empty value yields `One("")`.
    One(String),
    /// Multiple values collected from `key[]=a&key[]=b`, in order.
    Many(Vec<String>),
}

impl QueryValue {
    /// The scalar value, or the first element of an array value.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            QueryValue::One(value) => Some(value),
            QueryValue::Many(values) => values.first().map(|s| s.as_str()),
        }
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::One(value.to_string())
    }
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::One(value)
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Many(values)
    }
}

/// Flat query map.
///
/// Ordered so that `stringify_query` output is deterministic.
pub type QueryMap = BTreeMap<String, QueryValue>;

/// Parse a raw query string (without the leading `?`) into a [`QueryMap`].
///
/// Pairs are separated by `&`, each pair split at the first `=`. A pair with
/// no `=` or an empty value yields an empty string value, never omission.
/// Duplicate plain keys use last-wins; `key[]` collects values in order.
pub fn parse_query(raw: &str) -> QueryMap {
    let mut map = QueryMap::new();

    for pair in raw.split('&').filter(|p| !p.is_empty()) {
        let (key, value) = match pair.split_once('=') {
            Some((key, value)) => (key, value),
            None => (pair, ""),
        };
        let key = decode_component(key);
        let value = decode_component(value);

        if let Some(base) = key.strip_suffix("[]") {
            let entry = map
                .entry(base.to_string())
                .or_insert_with(|| QueryValue::Many(Vec::new()));
            match entry {
                QueryValue::Many(values) => values.push(value),
                QueryValue::One(existing) => {
                    // A plain key followed by a bracketed one promotes to an array.
                    *entry = QueryValue::Many(vec![std::mem::take(existing), value]);
                }
            }
        } else {
            map.insert(key, QueryValue::One(value));
        }
    }

    map
}

/// Serialize a [`QueryMap`] back into `key=value&...` form.
///
/// An empty map serializes to an empty string (no `?`).
pub fn stringify_query(query: &QueryMap) -> String {
    let mut pairs: Vec<String> = Vec::with_capacity(query.len());

    for (key, value) in query {
        match value {
            QueryValue::One(v) => {
                pairs.push(format!("{}={}", encode_component(key), encode_component(v)));
            }
            QueryValue::Many(values) => {
                for v in values {
                    pairs.push(format!(
                        "{}[]={}",
                        encode_component(key),
                        encode_component(v)
                    ));
                }
            }
        }
    }

    pairs.join("&")
}

/// Append a serialized query to a base URI.
///
/// Returns `base` unchanged when the query is empty.
///
/// # Example
///
/// ```
/// use wayfinder::{build_uri, QueryMap};
///
/// let mut query = QueryMap::new();
/// assert_eq!(build_uri("/list", &query), "/list");
///
/// query.insert("c".to_string(), "1".into());
/// assert_eq!(build_uri("/list", &query), "/list?c=1");
/// ```
pub fn build_uri(base: &str, query: &QueryMap) -> String {
    if query.is_empty() {
        base.to_string()
    } else {
        format!("{}?{}", base, stringify_query(query))
    }
}

/// Percent-encode a URI component, byte-wise over its UTF-8 form.
fn encode_component(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for &byte in s.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                out.push(byte as char);
            }
            _ => out.push_str(&format!("%{:02X}", byte)),
        }
    }
    out
}

/// Percent-decode a URI component. `+` decodes to a space.
///
/// Malformed escapes are passed through literally rather than rejected.
fn decode_component(s: &str) -> String {
    let mut bytes = Vec::with_capacity(s.len());
    let mut iter = s.bytes();

    while let Some(byte) = iter.next() {
        match byte {
            b'%' => {
                let hi = iter.next();
                let lo = iter.next();
                match (hi, lo) {
                    (Some(hi), Some(lo)) => {
                        let hex = [hi, lo];
                        match u8::from_str_radix(std::str::from_utf8(&hex).unwrap_or(""), 16) {
                            Ok(decoded) => bytes.push(decoded),
                            Err(_) => {
                                bytes.push(b'%');
                                bytes.push(hi);
                                bytes.push(lo);
                            }
                        }
                    }
                    (Some(hi), None) => {
                        bytes.push(b'%');
                        bytes.push(hi);
                    }
                    _ => bytes.push(b'%'),
                }
            }
            b'+' => bytes.push(b' '),
            _ => bytes.push(byte),
        }
    }

    String::from_utf8_lossy(&bytes).into_owned()
}
