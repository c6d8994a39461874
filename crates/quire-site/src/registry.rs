//! Page registry: route → (page data, chunk).
//!
//! Built once by the site build, then read-only. The runtime loads it back
//! from the manifest written next to the chunks.

use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use quire_nav::RoutePath;
use serde::{Deserialize, Serialize};

use crate::chunk::ChunkReference;
use crate::page::PageDataRecord;

/// Manifest format version.
const MANIFEST_VERSION: u32 = 1;

/// One resolvable page.
#[derive(Clone, Debug, PartialEq)]
pub struct PageRegistryEntry {
    /// Normalized route of the page.
    pub route: RoutePath,
    /// Page-data record, shared and immutable.
    pub page_data: Arc<PageDataRecord>,
    /// Chunk holding the page's view.
    pub chunk: ChunkReference,
}

/// Route lookup failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LookupError {
    /// No page is registered under the normalized route.
    #[error("page not found: {0}")]
    RouteNotFound(RoutePath),
}

/// Error reading or writing a manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed manifest.
    #[error("invalid manifest: {0}")]
    Json(#[from] serde_json::Error),
    /// Manifest written by an incompatible build.
    #[error("unsupported manifest version {0} (expected {MANIFEST_VERSION})")]
    UnsupportedVersion(u32),
    /// Two manifest pages claim the same route.
    #[error("manifest lists route {0} twice")]
    DuplicateRoute(RoutePath),
}

/// Serialized registry.
#[derive(Debug, Serialize, Deserialize)]
pub struct Manifest {
    /// Format version.
    pub version: u32,
    /// Pages sorted by route.
    pub pages: Vec<ManifestPage>,
}

/// One manifest page.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ManifestPage {
    /// Normalized route.
    pub route: RoutePath,
    /// Chunk name.
    pub chunk: ChunkReference,
    /// Page-data record.
    pub page_data: PageDataRecord,
}

/// Read-only mapping from routes to pages.
#[derive(Debug, Default)]
pub struct PageRegistry {
    entries: HashMap<RoutePath, PageRegistryEntry>,
}

impl PageRegistry {
    /// Start building a registry.
    #[must_use]
    pub fn builder() -> PageRegistryBuilder {
        PageRegistryBuilder::default()
    }

    /// Resolve a raw route to its page.
    ///
    /// The route is normalized first (percent-decoding, slash collapsing,
    /// trailing slash removal except for `/`); matching is case-sensitive.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::RouteNotFound`] if no page matches.
    pub fn resolve(&self, route: &str) -> Result<&PageRegistryEntry, LookupError> {
        let route = RoutePath::normalize(route);
        match self.entries.get(&route) {
            Some(entry) => Ok(entry),
            None => Err(LookupError::RouteNotFound(route)),
        }
    }

    /// Look up an already normalized route.
    #[must_use]
    pub fn get(&self, route: &RoutePath) -> Option<&PageRegistryEntry> {
        self.entries.get(route)
    }

    /// Whether a page exists for `route`.
    #[must_use]
    pub fn contains(&self, route: &RoutePath) -> bool {
        self.entries.contains_key(route)
    }

    /// Number of registered routes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries sorted by route.
    #[must_use]
    pub fn entries(&self) -> Vec<&PageRegistryEntry> {
        let mut entries: Vec<_> = self.entries.values().collect();
        entries.sort_by(|a, b| a.route.cmp(&b.route));
        entries
    }

    /// Convert to the serializable manifest form.
    #[must_use]
    pub fn to_manifest(&self) -> Manifest {
        let pages = self
            .entries()
            .into_iter()
            .map(|entry| ManifestPage {
                route: entry.route.clone(),
                chunk: entry.chunk.clone(),
                page_data: PageDataRecord::clone(&entry.page_data),
            })
            .collect();
        Manifest {
            version: MANIFEST_VERSION,
            pages,
        }
    }

    /// Rebuild a registry from its manifest.
    ///
    /// # Errors
    ///
    /// Returns an error for unsupported versions or duplicate routes.
    pub fn from_manifest(manifest: Manifest) -> Result<Self, ManifestError> {
        if manifest.version != MANIFEST_VERSION {
            return Err(ManifestError::UnsupportedVersion(manifest.version));
        }
        let mut builder = Self::builder();
        for page in manifest.pages {
            let route = page.route.clone();
            if builder.insert(page.route, page.page_data, page.chunk).is_err() {
                return Err(ManifestError::DuplicateRoute(route));
            }
        }
        Ok(builder.build())
    }

    /// Write the manifest as JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or writing fails.
    pub fn write_manifest(&self, path: &Path) -> Result<(), ManifestError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_vec_pretty(&self.to_manifest())?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Read a registry from a JSON manifest file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or is invalid.
    pub fn load_manifest(path: &Path) -> Result<Self, ManifestError> {
        let bytes = fs::read(path)?;
        let manifest: Manifest = serde_json::from_slice(&bytes)?;
        let registry = Self::from_manifest(manifest)?;
        tracing::debug!(path = %path.display(), pages = registry.len(), "Loaded manifest");
        Ok(registry)
    }
}

/// A route was registered twice.
#[derive(Debug)]
pub struct RouteTaken<'a> {
    /// The entry that keeps the route.
    pub existing: &'a PageRegistryEntry,
}

/// Builder for [`PageRegistry`]. First registration of a route wins.
#[derive(Debug, Default)]
pub struct PageRegistryBuilder {
    entries: HashMap<RoutePath, PageRegistryEntry>,
}

impl PageRegistryBuilder {
    /// Register a page under `route`.
    ///
    /// # Errors
    ///
    /// Returns [`RouteTaken`] with the existing entry if `route` is already
    /// registered; the registry is left unchanged.
    pub fn insert(
        &mut self,
        route: RoutePath,
        page_data: PageDataRecord,
        chunk: ChunkReference,
    ) -> Result<&PageRegistryEntry, RouteTaken<'_>> {
        match self.entries.entry(route) {
            Entry::Occupied(slot) => Err(RouteTaken {
                existing: slot.into_mut(),
            }),
            Entry::Vacant(slot) => {
                let route = slot.key().clone();
                Ok(slot.insert(PageRegistryEntry {
                    route,
                    page_data: Arc::new(page_data),
                    chunk,
                }))
            }
        }
    }

    /// Finish building.
    #[must_use]
    pub fn build(self) -> PageRegistry {
        PageRegistry {
            entries: self.entries,
        }
    }
}
