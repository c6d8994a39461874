use std::sync::Arc;

use quire_site::ChunkReference;

use crate::fetcher::FetchError;

/// A chunk could not be loaded.
///
/// Never cached: the next load of the same chunk fetches again. Cloneable so
/// every caller waiting on one fetch receives the same error.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ChunkLoadError {
    /// The fetch failed.
    #[error("failed to fetch {chunk}: {source}")]
    Fetch {
        /// Chunk being loaded.
        chunk: ChunkReference,
        /// Transport error.
        source: Arc<FetchError>,
    },
    /// Fetched bytes do not hash to the chunk's name.
    #[error("chunk {chunk} failed its integrity check")]
    Integrity {
        /// Chunk being loaded.
        chunk: ChunkReference,
    },
    /// Fetched bytes are not a chunk module.
    #[error("malformed chunk {chunk}: {source}")]
    Malformed {
        /// Chunk being loaded.
        chunk: ChunkReference,
        /// Decode error.
        source: Arc<serde_json::Error>,
    },
    /// The fetch task ended without a result.
    #[error("loading {chunk} was interrupted")]
    Interrupted {
        /// Chunk being loaded.
        chunk: ChunkReference,
    },
}

impl ChunkLoadError {
    /// The chunk that failed.
    #[must_use]
    pub fn chunk(&self) -> &ChunkReference {
        match self {
            Self::Fetch { chunk, .. }
            | Self::Integrity { chunk }
            | Self::Malformed { chunk, .. }
            | Self::Interrupted { chunk } => chunk,
        }
    }
}
