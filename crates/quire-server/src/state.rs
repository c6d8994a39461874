//! Application state.
//!
//! Shared state for all request handlers.

use quire_config::Config;
use quire_loader::{ChunkLoader, FsFetcher};
use quire_nav::RoutePath;
use quire_site::PageRegistry;

/// Application state shared across all handlers.
pub(crate) struct AppState {
    /// Site configuration (metadata, nav bar, sidebar).
    pub(crate) config: Config,
    /// Deployment base path.
    pub(crate) base: RoutePath,
    /// Registry loaded from the build manifest.
    pub(crate) registry: PageRegistry,
    /// Shared chunk cache.
    pub(crate) loader: ChunkLoader<FsFetcher>,
    /// Raw chunk access for `/assets`.
    pub(crate) assets: FsFetcher,
}

impl AppState {
    /// State over a built site.
    pub(crate) fn new(config: Config, registry: PageRegistry) -> Self {
        let assets = FsFetcher::new(config.paths.assets_dir());
        Self {
            base: config.site.base_route(),
            loader: ChunkLoader::new(assets.clone()),
            assets,
            registry,
            config,
        }
    }

    /// Site route for a request path, with the deployment base removed.
    ///
    /// Returns the normalized path as `Err` when it lies outside the base.
    pub(crate) fn site_route(&self, raw: &str) -> Result<RoutePath, RoutePath> {
        let route = RoutePath::normalize(raw);
        route.strip_base(&self.base).ok_or(route)
    }
}
