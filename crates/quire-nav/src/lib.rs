//! Navigation model for quire.
//!
//! This crate holds the declarative nav bar and sidebar trees of a site:
//! - [`NavEntry`]: leaf/group tree nodes, deserialized from site config
//! - [`RoutePath`]: normalized route keys shared with the page registry
//! - [`validate`]: build-time checks, failing with [`ConfigError`]
//! - [`flatten`]: depth-first route listing for sidebar rendering
//! - [`match_active`]: the active trail for the current route
//!
//! # Example
//!
//! ```
//! use quire_nav::{NavEntry, RoutePath, flatten, match_active};
//!
//! let sidebar = vec![
//!     NavEntry::group(
//!         "Framework",
//!         vec![
//!             NavEntry::leaf("Routing", "/framework/routing"),
//!             NavEntry::leaf("Actions", "/framework/actions"),
//!         ],
//!     ),
//! ];
//!
//! let routes = flatten(&sidebar);
//! assert_eq!(routes.len(), 2);
//!
//! let trail = match_active(&sidebar, &RoutePath::normalize("/framework/routing/"));
//! assert_eq!(trail.len(), 2);
//! ```

mod entry;
mod route;
mod tree;
mod validate;

pub use entry::{ActiveMatch, NavEntry, NavGroup, NavLeaf};
pub use route::{RouteLink, RoutePath, Target};
pub use tree::{FlatRoute, flatten, match_active};
pub use validate::{ConfigError, RecordBinding, validate};
