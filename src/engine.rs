//! The routing engine
//!
//! Owns the compiled route list and exposes the two pure, synchronous
//! operations the outside world consumes: `match_uri` (URL in, best route
//! plus extracted data out) and `url_for` (route name in, concrete URL out).
//!
//! Matching is first-match-wins over the flattened list; declaration order
//! (children before their parent, per the table) is the sole tie-break. There
//! is no scoring or specificity heuristic.

use crate::error::RouterError;
use crate::params::Params;
use crate::route::{Props, Route};
use crate::table::{build_routes, CompiledRoute};
use crate::uri::{build_uri, parse_query, split_uri, QueryMap};
use crate::{debug_log, trace_log};

/// The result of a successful match.
///
/// Produced fresh per `match_uri` call; never cached.
#[derive(Debug, Clone)]
pub struct RouteMatch<R> {
    /// Name of the matched route, if it has one.
    pub name: Option<String>,
    /// The matched route's render reference.
    pub render: R,
    /// Values captured from the pathname, raw strings.
    pub params: Params,
    /// Parsed query component of the URI.
    pub query: QueryMap,
    /// The matched route's static props.
    pub props: Props,
}

/// Route matcher and reverse resolver over an immutable compiled route list.
///
/// Declarations are supplied once at construction and compiled immediately;
/// there is no add/remove-route operation afterwards. Malformed declarations
/// fail construction eagerly rather than surfacing at first use.
///
/// # Example
///
/// ```
/// use wayfinder::{Params, Route, RouterEngine};
///
/// let engine = RouterEngine::new(vec![
///     Route::view("/list", "list-view").name("list"),
///     Route::view("/view/:id", "item-view").name("view"),
/// ])
/// .unwrap();
///
/// let m = engine.match_uri("/view/1?foo=bar").unwrap();
/// assert_eq!(m.name.as_deref(), Some("view"));
/// assert_eq!(m.params.get("id"), Some("1"));
///
/// let url = engine
///     .url_for("view", &Params::new().with("id", 1), &Default::default())
///     .unwrap();
/// assert_eq!(url, "/view/1");
/// ```
#[derive(Debug, Clone)]
pub struct RouterEngine<R> {
    routes: Vec<CompiledRoute<R>>,
}

impl<R: Clone> RouterEngine<R> {
    /// Compile a declaration tree into an engine.
    pub fn new(routes: Vec<Route<R>>) -> Result<Self, RouterError> {
        let routes = build_routes(routes, "/")?;
        debug_log!("router engine built with {} compiled routes", routes.len());
        Ok(Self { routes })
    }

    /// The compiled route list, in match order.
    pub fn routes(&self) -> &[CompiledRoute<R>] {
        &self.routes
    }

    /// Resolve a URI to the first matching route.
    ///
    /// Splits the URI into path and query, scans the compiled list in order
    /// and returns the first entry whose pattern accepts the path, merging
    /// captured params, the parsed query, the entry's static props and its
    /// render reference.
    ///
    /// `None` means no route matched. That is a normal outcome, not a
    /// failure; declare a trailing `(.*)` route for a guaranteed fallback.
    pub fn match_uri(&self, uri: &str) -> Option<RouteMatch<R>> {
        let (path, raw_query) = split_uri(uri);

        for route in &self.routes {
            if let Some(params) = route.pattern.test(path) {
                debug_log!("'{}' matched route '{}'", uri, route.path);
                return Some(RouteMatch {
                    name: route.name.clone(),
                    render: route.render.clone(),
                    params,
                    query: parse_query(raw_query),
                    props: route.props.clone(),
                });
            }
        }

        trace_log!("no route matched '{}'", uri);
        None
    }

    /// Reverse-resolve a route name into a concrete URL.
    ///
    /// Looks the route up by exact name (first match in list order), checks
    /// every required placeholder up front -- collecting all missing names
    /// into a single [`RouterError::MissingParameters`] -- then builds the
    /// path and appends the serialized query.
    pub fn url_for(
        &self,
        name: &str,
        params: &Params,
        query: &QueryMap,
    ) -> Result<String, RouterError> {
        let route = self
            .find_route(name)
            .ok_or_else(|| RouterError::RouteNotFound {
                name: name.to_string(),
            })?;

        let missing: Vec<String> = route
            .pattern
            .tokens()
            .iter()
            .filter(|token| token.required && !params.contains(&token.name))
            .map(|token| token.name.clone())
            .collect();
        if !missing.is_empty() {
            return Err(RouterError::MissingParameters {
                name: name.to_string(),
                missing,
            });
        }

        let path = route.pattern.build(params)?;
        Ok(build_uri(&path, query))
    }

    fn find_route(&self, name: &str) -> Option<&CompiledRoute<R>> {
        self.routes
            .iter()
            .find(|route| route.name.as_deref() == Some(name))
    }
}
