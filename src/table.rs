//! Route table construction
//!
//! Flattens a nested declaration tree into the ordered list of compiled
//! routes the engine scans. The ordering rule is load-bearing: a node's
//! children are appended **before** the node's own entry, so a more specific
//! nested route is tried ahead of a catch-all ancestor and ahead of the
//! parent's own default entry. The engine preserves this order verbatim.

use crate::error::RouterError;
use crate::pattern::Pattern;
use crate::route::{Props, Route};
use crate::uri::clean_path;
use crate::trace_log;

/// A flattened, pattern-compiled, immutable route entry.
///
/// Owned exclusively by the engine that built it; never shared or mutated
/// after construction.
#[derive(Debug, Clone)]
pub struct CompiledRoute<R> {
    /// Route name, if the declaration carried one.
    pub name: Option<String>,
    /// Absolute, slash-cleaned path template.
    pub path: String,
    /// The render reference the view layer supplied.
    pub render: R,
    /// Static metadata from the declaration.
    pub props: Props,
    /// Compiled matcher/builder for `path`.
    pub pattern: Pattern,
}

/// Flatten a declaration tree into an ordered compiled route list.
///
/// Walks depth-first. Each node's absolute path is the parent's resolved path
/// joined with its own relative path and slash-cleaned; a node without a path
/// inherits the parent's resolved path unchanged. Only renderable nodes
/// produce entries.
///
/// Fails eagerly on the first structurally invalid declaration or
/// uncompilable pattern; a partially built table is never returned.
pub fn build_routes<R>(
    routes: Vec<Route<R>>,
    parent_path: &str,
) -> Result<Vec<CompiledRoute<R>>, RouterError> {
    let mut result = Vec::new();

    for route in routes {
        let Route {
            name,
            path,
            render,
            props,
            children,
        } = route;

        let resolved = match &path {
            Some(own) => clean_path(&format!("{}/{}", parent_path, own)),
            None => parent_path.to_string(),
        };

        if render.is_none() && children.is_empty() {
            return Err(RouterError::InvalidDeclaration {
                path: resolved,
                message: "declaration has neither a render reference nor children".to_string(),
            });
        }

        if !children.is_empty() {
            result.extend(build_routes(children, &resolved)?);
        }

        if let Some(render) = render {
            let pattern = Pattern::compile(&resolved)?;
            trace_log!(
                "compiled route '{}' ({})",
                resolved,
                name.as_deref().unwrap_or("unnamed")
            );
            result.push(CompiledRoute {
                name,
                path: resolved,
                render,
                props,
                pattern,
            });
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_declarations() {
        let routes = build_routes(
            vec![
                Route::view("/list", "list-view").name("list"),
                Route::view("/view/:id", "item-view").name("view"),
            ],
            "/",
        )
        .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/list");
        assert_eq!(routes[1].path, "/view/:id");
    }

    #[test]
    fn test_nested_namespace_flattens_to_child_only() {
        let routes = build_routes(
            vec![Route::namespace("/blog")
                .name("parent")
                .child(Route::view("/:post_id", "post-view").name("child1"))],
            "/",
        )
        .unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/blog/:post_id");
        assert_eq!(routes[0].name.as_deref(), Some("child1"));
    }

    #[test]
    fn test_children_come_before_parent_entry() {
        let routes = build_routes(
            vec![Route::view("/nested", "layout-view")
                .name("nested")
                .child(Route::view("/foobar", "foobar-view").name("foobar"))],
            "/",
        )
        .unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path, "/nested/foobar");
        assert_eq!(routes[1].path, "/nested");
    }

    #[test]
    fn test_pathless_child_inherits_parent_path() {
        let routes = build_routes(
            vec![Route::namespace("/dashboard")
                .child(Route::index("overview-view").name("dashboard.index"))],
            "/",
        )
        .unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/dashboard");
    }

    #[test]
    fn test_paths_are_slash_cleaned() {
        let routes = build_routes(
            vec![Route::namespace("/a/").child(Route::view("/b", "b-view"))],
            "/",
        )
        .unwrap();

        assert_eq!(routes[0].path, "/a/b");
    }

    #[test]
    fn test_dead_declaration_rejected() {
        let err = build_routes(vec![Route::<&str>::namespace("/empty")], "/").unwrap_err();
        match err {
            RouterError::InvalidDeclaration { path, .. } => assert_eq!(path, "/empty"),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_bad_pattern_fails_table_build() {
        let err = build_routes(vec![Route::view("/users/:", "users-view")], "/").unwrap_err();
        assert!(matches!(err, RouterError::InvalidPattern { .. }));
    }

    #[test]
    fn test_deeply_nested_paths() {
        let routes = build_routes(
            vec![Route::namespace("/api").child(
                Route::namespace("/v1")
                    .child(Route::view("/users/:id", "user-view").name("api.user")),
            )],
            "/",
        )
        .unwrap();

        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].path, "/api/v1/users/:id");
    }
}
