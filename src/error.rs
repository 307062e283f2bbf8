//! Error handling for the router
//!
//! All failures here are programmer errors surfaced synchronously at
//! construction time or on `url_for`. A URI that matches no route is not an
//! error: `RouterEngine::match_uri` returns `None` for that, and callers that
//! want a guaranteed match register a trailing `(.*)` fallback route.

use std::fmt;

/// Errors produced while building a route table or reverse-resolving a URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouterError {
    /// `url_for` was given a name no compiled route carries.
    RouteNotFound {
        /// The unknown route name.
        name: String,
    },

    /// `url_for` was given params missing one or more required placeholders.
    ///
    /// Every missing name is collected before failing, so a caller fixing
    /// the error sees the whole list at once rather than one name per call.
    MissingParameters {
        /// Route name (or pattern template when the route has no name).
        name: String,
        /// All placeholder names absent from the supplied params.
        missing: Vec<String>,
    },

    /// A path template could not be compiled into a pattern.
    InvalidPattern {
        /// The offending template.
        path: String,
        message: String,
    },

    /// A route declaration is structurally invalid (for example a node with
    /// neither a render reference nor children).
    InvalidDeclaration {
        /// Resolved path of the offending node.
        path: String,
        message: String,
    },
}

impl fmt::Display for RouterError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouterError::RouteNotFound { name } => {
                write!(f, "route {} not found", name)
            }
            RouterError::MissingParameters { name, missing } => {
                write!(
                    f,
                    "Missing required parameters for {}: {}",
                    name,
                    missing.join(", ")
                )
            }
            RouterError::InvalidPattern { path, message } => {
                write!(f, "Invalid route pattern '{}': {}", path, message)
            }
            RouterError::InvalidDeclaration { path, message } => {
                write!(f, "Invalid route declaration '{}': {}", path, message)
            }
        }
    }
}

impl std::error::Error for RouterError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_route_not_found_display() {
        let error = RouterError::RouteNotFound {
            name: "profile".to_string(),
        };
        assert_eq!(error.to_string(), "route profile not found");
    }

    #[test]
    fn test_missing_parameters_lists_every_name() {
        let error = RouterError::MissingParameters {
            name: "post.comment".to_string(),
            missing: vec!["post_id".to_string(), "comment_id".to_string()],
        };
        assert_eq!(
            error.to_string(),
            "Missing required parameters for post.comment: post_id, comment_id"
        );
    }

    #[test]
    fn test_invalid_pattern_display() {
        let error = RouterError::InvalidPattern {
            path: "/users/:".to_string(),
            message: "placeholder name cannot be empty".to_string(),
        };
        assert!(error.to_string().contains("/users/:"));
        assert!(error.to_string().contains("cannot be empty"));
    }
}
