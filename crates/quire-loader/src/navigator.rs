//! Navigation events: resolve, load, render.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use quire_nav::RoutePath;
use quire_site::{ChunkReference, LookupError, PageDataRecord, PageRegistry};

use crate::error::ChunkLoadError;
use crate::fetcher::ChunkFetcher;
use crate::loader::ChunkLoader;
use crate::view::ViewTree;

/// A page ready to display.
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedPage {
    /// Normalized route.
    pub route: RoutePath,
    /// Chunk the view came from.
    pub chunk: ChunkReference,
    /// Page-data record from the registry.
    pub page_data: Arc<PageDataRecord>,
    /// Rendered view.
    pub view: ViewTree,
}

/// Result of one navigation event.
#[derive(Debug, Clone)]
pub enum NavigationOutcome {
    /// The page was rendered.
    Rendered(RenderedPage),
    /// No page for the route.
    NotFound(RoutePath),
    /// The page's chunk could not be loaded. Navigating again retries.
    Failed {
        /// Route being navigated to.
        route: RoutePath,
        /// Load failure.
        error: ChunkLoadError,
    },
    /// A later navigation started before this one finished. The chunk still
    /// lands in the cache.
    Superseded,
}

/// Drives navigation for one client.
///
/// The last navigation started wins: when events overlap, only the most
/// recent one renders and earlier ones resolve to
/// [`NavigationOutcome::Superseded`].
pub struct Navigator<F> {
    registry: Arc<PageRegistry>,
    loader: Arc<ChunkLoader<F>>,
    generation: AtomicU64,
}

impl<F: ChunkFetcher> Navigator<F> {
    /// Create a navigator over a registry and a shared loader.
    pub fn new(registry: Arc<PageRegistry>, loader: Arc<ChunkLoader<F>>) -> Self {
        Self {
            registry,
            loader,
            generation: AtomicU64::new(0),
        }
    }

    /// Handle a navigation event for `route`.
    pub async fn navigate(&self, route: &str) -> NavigationOutcome {
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;

        let entry = match self.registry.resolve(route) {
            Ok(entry) => entry,
            Err(LookupError::RouteNotFound(route)) => {
                tracing::debug!(%route, "Navigation to unknown route");
                return NavigationOutcome::NotFound(route);
            }
        };

        let loaded = self.loader.load(&entry.chunk).await;

        if self.generation.load(Ordering::SeqCst) != generation {
            tracing::debug!(route = %entry.route, "Navigation superseded");
            return NavigationOutcome::Superseded;
        }

        match loaded {
            Ok(module) => NavigationOutcome::Rendered(RenderedPage {
                route: entry.route.clone(),
                chunk: entry.chunk.clone(),
                page_data: Arc::clone(&entry.page_data),
                view: module.render(&entry.page_data),
            }),
            Err(error) => NavigationOutcome::Failed {
                route: entry.route.clone(),
                error,
            },
        }
    }

    /// The shared loader.
    #[must_use]
    pub fn loader(&self) -> &ChunkLoader<F> {
        &self.loader
    }
}
