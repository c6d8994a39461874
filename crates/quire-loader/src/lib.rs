//! Lazy page loading for quire.
//!
//! Pages live in content-addressed chunks that are fetched the first time a
//! route is visited:
//!
//! - [`ChunkLoader`]: single-flight cache of decoded chunks. One fetch per
//!   chunk however many callers wait; failures are never cached.
//! - [`LoadedModule::render`]: pure render of a page's [`ViewTree`].
//! - [`Navigator`]: resolve → load → render for one client, last route wins.
//! - [`ChunkFetcher`]: the transport seam, with [`FsFetcher`] reading a build's
//!   assets directory.
//!
//! # Example
//!
//! ```no_run
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! use std::path::{Path, PathBuf};
//! use std::sync::Arc;
//!
//! use quire_loader::{ChunkLoader, FsFetcher, NavigationOutcome, Navigator};
//! use quire_site::PageRegistry;
//!
//! let registry = Arc::new(PageRegistry::load_manifest(Path::new("dist/manifest.json"))?);
//! let loader = Arc::new(ChunkLoader::new(FsFetcher::new(PathBuf::from("dist/assets"))));
//! let navigator = Navigator::new(registry, loader);
//!
//! if let NavigationOutcome::Rendered(page) = navigator.navigate("/guide/").await {
//!     println!("{}", page.view.to_html());
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod fetcher;
mod loader;
mod navigator;
mod view;

pub use error::ChunkLoadError;
pub use fetcher::{ChunkFetcher, FetchError, FsFetcher};
pub use loader::{ChunkLoader, ChunkState};
pub use navigator::{NavigationOutcome, Navigator, RenderedPage};
pub use view::{LoadedModule, ViewNode, ViewTree};
