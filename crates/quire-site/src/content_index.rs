//! Link → source file resolution used when validating navigation.

use std::collections::HashMap;

use quire_nav::{RecordBinding, RouteLink, RoutePath};

use crate::registry::PageRegistry;

/// Source file served for each route of a built registry.
///
/// Binds a navigation link to the record the registry would serve for it,
/// so `/guide` and `/guide/` always bind the same file. When `guide.md` and
/// `guide/index.md` both exist, only the one the registry kept is reachable.
#[derive(Debug, Default, Clone)]
pub struct ContentIndex {
    sources: HashMap<RoutePath, String>,
}

impl ContentIndex {
    /// Index the pages of `registry`.
    #[must_use]
    pub fn new(registry: &PageRegistry) -> Self {
        Self {
            sources: registry
                .entries()
                .into_iter()
                .map(|entry| (entry.route.clone(), entry.page_data.relative_path.clone()))
                .collect(),
        }
    }

    /// Relative path of the file served at `route`.
    #[must_use]
    pub fn source_for(&self, route: &RoutePath) -> Option<&str> {
        self.sources.get(route).map(String::as_str)
    }
}

impl RecordBinding for ContentIndex {
    fn record_for(&self, link: &RouteLink) -> Option<String> {
        self.source_for(link.path()).map(str::to_owned)
    }
}
