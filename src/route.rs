//! Route declarations
//!
//! A route tree is authored as nested [`Route`] values and compiled once by
//! the route table. A declaration is either a renderable leaf (it carries a
//! render reference) or a pure namespace (it only lends its path prefix to
//! its children); the two are distinct constructors so a dead entry cannot be
//! declared by accident.
//!
//! The render reference type `R` is opaque to this crate: the engine stores
//! it per route and hands it back inside a match without ever invoking it.

use serde_json::Value;

/// Static metadata attached to a route and surfaced on every match.
pub type Props = serde_json::Map<String, Value>;

/// A user-authored, possibly nested route declaration.
///
/// # Example
///
/// ```
/// use wayfinder::Route;
///
/// let routes = vec![
///     Route::view("/list", "list-view").name("list"),
///     Route::namespace("/blog")
///         .child(Route::view("/:post_id", "post-view").name("post")),
///     Route::view("(.*)", "not-found-view"),
/// ];
/// # let _ = routes;
/// ```
#[derive(Debug, Clone)]
pub struct Route<R> {
    pub(crate) name: Option<String>,
    pub(crate) path: Option<String>,
    pub(crate) render: Option<R>,
    pub(crate) props: Props,
    pub(crate) children: Vec<Route<R>>,
}

impl<R> Route<R> {
    /// A renderable route at `path`, relative to its parent.
    pub fn view(path: impl Into<String>, render: R) -> Self {
        Self {
            name: None,
            path: Some(path.into()),
            render: Some(render),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// A renderable route with no path of its own.
    ///
    /// Inherits the parent's resolved path unchanged, acting as the
    /// parent's default entry.
    pub fn index(render: R) -> Self {
        Self {
            name: None,
            path: None,
            render: Some(render),
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// A namespace-only node: contributes its path prefix to descendants and
    /// is never itself matchable.
    ///
    /// A namespace without children is rejected when the table is built.
    pub fn namespace(path: impl Into<String>) -> Self {
        Self {
            name: None,
            path: Some(path.into()),
            render: None,
            props: Props::new(),
            children: Vec::new(),
        }
    }

    /// Set the route name, for reverse resolution via `url_for`.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attach one static prop.
    pub fn prop(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.props.insert(key.into(), value.into());
        self
    }

    /// Replace the whole props map.
    pub fn props(mut self, props: Props) -> Self {
        self.props = props;
        self
    }

    /// Add a child declaration.
    pub fn child(mut self, child: Route<R>) -> Self {
        self.children.push(child);
        self
    }

    /// Add several child declarations.
    pub fn children(mut self, children: Vec<Route<R>>) -> Self {
        self.children.extend(children);
        self
    }
}
