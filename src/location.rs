//! Locations and navigation destinations
//!
//! A [`Location`] is one entry in a history stack: the URL pieces plus an
//! opaque state payload and a stack key. A [`To`] is where a navigation is
//! headed -- either a full URL string or partial path fields merged onto the
//! current location.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// An entry in a history stack.
///
/// Invariants: `pathname` begins with `/`; `search` and `hash` are either
/// empty or begin with `?` / `#` respectively.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    /// URL pathname, beginning with `/`.
    pub pathname: String,
    /// URL search string, beginning with `?`, or empty.
    pub search: String,
    /// URL fragment identifier, beginning with `#`, or empty.
    pub hash: String,
    /// Arbitrary data associated with this location. Does not appear in the
    /// URL.
    #[serde(default)]
    pub state: Option<Value>,
    /// A unique string for this entry. May be used to key data in some other
    /// storage. Always `"default"` on an initial location.
    pub key: String,
}

impl Default for Location {
    fn default() -> Self {
        Self {
            pathname: "/".to_string(),
            search: String::new(),
            hash: String::new(),
            state: None,
            key: "default".to_string(),
        }
    }
}

/// The pathname, search, and hash values of a URL, any of which may be
/// absent.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PartialPath {
    pub pathname: Option<String>,
    pub search: Option<String>,
    pub hash: Option<String>,
}

/// A navigation destination: a URL string or the pieces of one.
#[derive(Debug, Clone, PartialEq)]
pub enum To {
    /// A complete URL path, parsed on use.
    Path(String),
    /// Explicit path fields; absent fields inherit from the current
    /// location.
    Partial(PartialPath),
}

impl From<&str> for To {
    fn from(path: &str) -> Self {
        To::Path(path.to_string())
    }
}

impl From<String> for To {
    fn from(path: String) -> Self {
        To::Path(path)
    }
}

impl From<PartialPath> for To {
    fn from(partial: PartialPath) -> Self {
        To::Partial(partial)
    }
}

/// Parse a URL path string into its pathname, search, and hash components.
///
/// The hash is split off first, then the search, so a `?` inside the
/// fragment stays part of the fragment. Components absent from the string
/// are `None`.
pub fn parse_path(path: &str) -> PartialPath {
    let mut partial = PartialPath::default();
    let mut rest = path;

    if let Some(hash_index) = rest.find('#') {
        partial.hash = Some(rest[hash_index..].to_string());
        rest = &rest[..hash_index];
    }

    if let Some(search_index) = rest.find('?') {
        partial.search = Some(rest[search_index..].to_string());
        rest = &rest[..search_index];
    }

    if !rest.is_empty() {
        partial.pathname = Some(rest.to_string());
    }

    partial
}

/// Build a URL path string from pathname, search, and hash components.
pub fn create_path(partial: &PartialPath) -> String {
    format!(
        "{}{}{}",
        partial.pathname.as_deref().unwrap_or("/"),
        partial.search.as_deref().unwrap_or(""),
        partial.hash.as_deref().unwrap_or("")
    )
}

/// A valid href for the given destination, usable as a link target.
pub fn create_href(to: &To) -> String {
    match to {
        To::Path(path) => path.clone(),
        To::Partial(partial) => create_path(partial),
    }
}

/// The URL path of a location: `pathname + search + hash`.
pub fn location_path(location: &Location) -> String {
    format!("{}{}{}", location.pathname, location.search, location.hash)
}

/// Whether two locations point at the same URL, ignoring state and key.
pub fn locations_eq(a: &Location, b: &Location) -> bool {
    a.pathname == b.pathname && a.search == b.search && a.hash == b.hash
}

/// A compact `pathname?query` rendering, dropping the hash and the `?` when
/// there is no query.
pub fn location_to_string(location: &Location) -> String {
    let search = location.search.strip_prefix('?').unwrap_or(&location.search);
    [location.pathname.as_str(), search]
        .iter()
        .filter(|part| !part.is_empty())
        .copied()
        .collect::<Vec<_>>()
        .join("?")
}

/// Compute the location a navigation lands on: merge `to` onto the current
/// location, override the state, and stamp the given key.
pub fn next_location(current: &Location, to: &To, state: Option<Value>, key: String) -> Location {
    let partial = match to {
        To::Path(path) => parse_path(path),
        To::Partial(partial) => partial.clone(),
    };

    Location {
        pathname: partial.pathname.unwrap_or_else(|| current.pathname.clone()),
        search: partial.search.unwrap_or_else(|| current.search.clone()),
        hash: partial.hash.unwrap_or_else(|| current.hash.clone()),
        state,
        key,
    }
}

/// Per-instance stack key generator.
///
/// Keys only need to be unique within one history instance; a counter keeps
/// them deterministic.
pub(crate) fn next_key(counter: &mut u64) -> String {
    *counter += 1;
    format!("{:08x}", *counter)
}
