//! Chunk transport.

use std::future::Future;
use std::io;
use std::path::PathBuf;

use quire_site::ChunkReference;

/// Error retrieving chunk bytes.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The chunk does not exist at the source.
    #[error("chunk not found: {0}")]
    NotFound(ChunkReference),
    /// Transport failure.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Retrieves the raw bytes of a chunk.
///
/// Implementations may be slow and may fail; the loader never assumes a
/// fetch completes.
pub trait ChunkFetcher: Send + Sync + 'static {
    /// Fetch the bytes of `chunk`.
    fn fetch(
        &self,
        chunk: &ChunkReference,
    ) -> impl Future<Output = Result<Vec<u8>, FetchError>> + Send;
}

/// Reads chunks from a build's assets directory.
#[derive(Debug, Clone)]
pub struct FsFetcher {
    assets_dir: PathBuf,
}

impl FsFetcher {
    /// Fetcher rooted at `assets_dir`.
    #[must_use]
    pub fn new(assets_dir: PathBuf) -> Self {
        Self { assets_dir }
    }
}

impl ChunkFetcher for FsFetcher {
    async fn fetch(&self, chunk: &ChunkReference) -> Result<Vec<u8>, FetchError> {
        // Chunk names never contain separators, so the join stays inside assets_dir
        let path = self.assets_dir.join(chunk.as_str());
        match tokio::fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(FetchError::NotFound(chunk.clone()))
            }
            Err(e) => Err(FetchError::Io(e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fs_fetcher_reads_chunk() {
        let temp = tempfile::tempdir().unwrap();
        let chunk = ChunkReference::for_content("guide.md", b"{}");
        std::fs::write(temp.path().join(chunk.as_str()), b"{}").unwrap();

        let fetcher = FsFetcher::new(temp.path().to_path_buf());

        assert_eq!(fetcher.fetch(&chunk).await.unwrap(), b"{}");
    }

    #[tokio::test]
    async fn test_fs_fetcher_missing_chunk() {
        let temp = tempfile::tempdir().unwrap();
        let chunk = ChunkReference::for_content("guide.md", b"{}");

        let err = FsFetcher::new(temp.path().to_path_buf())
            .fetch(&chunk)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::NotFound(c) if c == chunk));
    }
}
