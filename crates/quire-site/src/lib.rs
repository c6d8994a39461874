//! Page registry and site build for quire.
//!
//! This crate provides:
//! - [`PageRegistry`]: read-only route → page lookup with [`PageRegistry::resolve`]
//! - [`ChunkReference`] and [`ChunkModule`]: content-addressed page chunks
//! - [`SiteBuilder`]: turns a content directory into chunks and a manifest
//!
//! # Quick Start
//!
//! ```no_run
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! use quire_config::Config;
//! use quire_site::SiteBuilder;
//!
//! let config = Config::load(None, None)?;
//! let report = SiteBuilder::new(&config).build()?;
//!
//! let entry = report.registry.resolve("/framework/routing/")?;
//! println!("{} -> {}", entry.route, entry.chunk);
//! # Ok(())
//! # }
//! ```

mod builder;
mod chunk;
mod content_index;
mod frontmatter;
mod markdown;
mod page;
mod registry;
mod scanner;

pub use builder::{BuildError, BuildReport, DeadLink, SiteBuilder};
pub use chunk::{CHUNK_HASH_LEN, ChunkModule, ChunkReference, InvalidChunkName, StaticView};
pub use content_index::ContentIndex;
pub use frontmatter::{FrontMatter, FrontMatterError};
pub use markdown::{ContentRenderer, MarkdownRenderer, RenderedContent, slugify};
pub use page::{PageDataRecord, PageHeader};
pub use registry::{
    LookupError, Manifest, ManifestError, ManifestPage, PageRegistry, PageRegistryBuilder,
    PageRegistryEntry, RouteTaken,
};
pub use scanner::{ContentUnit, Scanner, route_for};
