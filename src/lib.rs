//! # wayfinder
//!
//! Declarative URL routing with reversible named routes and a navigation
//! history state machine.
//!
//! The crate has two halves that compose but do not depend on each other:
//!
//! - **Routing**: a [`RouterEngine`] compiled once from a nested [`Route`]
//!   declaration tree. [`RouterEngine::match_uri`] resolves a URL to the
//!   first matching route with its extracted path params and parsed query;
//!   [`RouterEngine::url_for`] goes the other way, from a route name plus
//!   params back to a concrete URL.
//! - **History**: the [`History`] trait over a location stack, with an
//!   in-memory implementation ([`MemoryHistory`]) and one backed by a native
//!   navigation stack through an injected adapter ([`PlatformHistory`]).
//!
//! Everything is synchronous and single-threaded; values are plain data and
//! the engine is `Clone` when its render references are.
//!
//! ## Quick start
//!
//! ```
//! use wayfinder::{Params, Route, RouterEngine};
//!
//! let engine = RouterEngine::new(vec![
//!     Route::view("/list", "list-view").name("list"),
//!     Route::namespace("/blog")
//!         .child(Route::view("/:post_id", "post-view").name("post")),
//!     Route::view("(.*)", "not-found-view"),
//! ])
//! .unwrap();
//!
//! let m = engine.match_uri("/blog/42?draft=1").unwrap();
//! assert_eq!(m.name.as_deref(), Some("post"));
//! assert_eq!(m.params.get("post_id"), Some("42"));
//!
//! let url = engine
//!     .url_for("post", &Params::new().with("post_id", 42), &Default::default())
//!     .unwrap();
//! assert_eq!(url, "/blog/42");
//! ```
//!
//! ## Driving navigation
//!
//! ```
//! use wayfinder::{Action, History, MemoryHistory};
//!
//! let mut history = MemoryHistory::new();
//! history.push("/list".into(), None);
//! history.push("/blog/42".into(), None);
//! history.back();
//!
//! assert_eq!(history.location().pathname, "/list");
//! assert_eq!(history.action(), Action::Pop);
//! ```
//!
//! ## Features
//!
//! - `log` (default) - route the crate's diagnostics through the `log` crate
//! - `tracing` - route them through `tracing` instead

pub mod engine;
pub mod error;
pub mod history;
pub mod location;
pub mod logging;
pub mod memory;
pub mod params;
pub mod pattern;
pub mod platform;
pub mod route;
pub mod table;
pub mod uri;

pub use engine::{RouteMatch, RouterEngine};
pub use error::RouterError;
pub use history::{Action, History, Listener, Listeners, Subscription, Update};
pub use location::{
    create_href, create_path, location_path, location_to_string, locations_eq, next_location,
    parse_path, Location, PartialPath, To,
};
pub use memory::MemoryHistory;
pub use params::Params;
pub use pattern::{Pattern, Token};
pub use platform::{
    ChangeHandler, ChangeKind, EntryState, FakePlatform, PlatformAdapter, PlatformChange,
    PlatformHistory,
};
pub use route::{Props, Route};
pub use table::{build_routes, CompiledRoute};
pub use uri::{build_uri, clean_path, parse_query, split_uri, stringify_query, QueryMap, QueryValue};
