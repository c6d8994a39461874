//! Single-flight chunk cache.
//!
//! Each chunk moves `Unloaded → Loading → Loaded`, or back to `Unloaded` when
//! its fetch fails. At most one fetch per chunk is in flight: concurrent
//! callers for a `Loading` chunk wait on the same result. The fetch runs as
//! its own task, so it finishes and populates the cache even when every
//! caller has stopped waiting.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use quire_site::{ChunkModule, ChunkReference};
use tokio::sync::watch;

use crate::error::ChunkLoadError;
use crate::fetcher::ChunkFetcher;
use crate::view::LoadedModule;

type LoadResult = Result<Arc<LoadedModule>, ChunkLoadError>;

/// Observable state of one chunk.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkState {
    /// Not cached and not being fetched.
    Unloaded,
    /// A fetch is in flight.
    Loading,
    /// Cached.
    Loaded,
}

enum Slot {
    Loading(watch::Receiver<Option<LoadResult>>),
    Loaded(Arc<LoadedModule>),
}

#[derive(Default)]
struct Slots {
    /// Bumped by `clear`; fetches started under an older epoch don't write back.
    epoch: u64,
    by_chunk: HashMap<ChunkReference, Slot>,
}

/// Loads page chunks on demand and caches them for the loader's lifetime.
///
/// Successful loads are cached; failures are not. Must be used from within a
/// tokio runtime.
pub struct ChunkLoader<F> {
    fetcher: Arc<F>,
    slots: Arc<Mutex<Slots>>,
}

impl<F: ChunkFetcher> ChunkLoader<F> {
    /// Create a loader with an empty cache.
    pub fn new(fetcher: F) -> Self {
        Self {
            fetcher: Arc::new(fetcher),
            slots: Arc::new(Mutex::new(Slots::default())),
        }
    }

    /// Load a chunk, fetching it at most once however many callers ask.
    ///
    /// # Errors
    ///
    /// Returns [`ChunkLoadError`] if the fetch fails, the bytes fail the
    /// integrity check or don't decode. The failure leaves the chunk
    /// `Unloaded`, so a later call retries.
    pub async fn load(&self, chunk: &ChunkReference) -> LoadResult {
        let mut rx = {
            let mut slots = self.slots.lock().unwrap();
            match slots.by_chunk.get(chunk) {
                Some(Slot::Loaded(module)) => {
                    tracing::debug!(%chunk, "Chunk cache hit");
                    return Ok(Arc::clone(module));
                }
                Some(Slot::Loading(rx)) => {
                    tracing::debug!(%chunk, "Joining in-flight fetch");
                    rx.clone()
                }
                None => {
                    let rx = self.spawn_fetch(chunk.clone(), slots.epoch);
                    slots
                        .by_chunk
                        .insert(chunk.clone(), Slot::Loading(rx.clone()));
                    rx
                }
            }
        };

        let interrupted = || ChunkLoadError::Interrupted {
            chunk: chunk.clone(),
        };
        match rx.wait_for(Option::is_some).await {
            Ok(result) => result.clone().unwrap_or_else(|| Err(interrupted())),
            Err(_) => Err(interrupted()),
        }
    }

    /// Current state of `chunk`.
    #[must_use]
    pub fn state(&self, chunk: &ChunkReference) -> ChunkState {
        match self.slots.lock().unwrap().by_chunk.get(chunk) {
            None => ChunkState::Unloaded,
            Some(Slot::Loading(_)) => ChunkState::Loading,
            Some(Slot::Loaded(_)) => ChunkState::Loaded,
        }
    }

    /// Number of cached chunks.
    #[must_use]
    pub fn loaded_count(&self) -> usize {
        self.slots
            .lock()
            .unwrap()
            .by_chunk
            .values()
            .filter(|slot| matches!(slot, Slot::Loaded(_)))
            .count()
    }

    /// Drop every cached chunk.
    ///
    /// Fetches already in flight still answer their callers but no longer
    /// write to the cache.
    pub fn clear(&self) {
        let mut slots = self.slots.lock().unwrap();
        slots.epoch += 1;
        slots.by_chunk.clear();
        tracing::debug!(epoch = slots.epoch, "Chunk cache cleared");
    }

    /// Start the fetch task. It is the only writer of the chunk's slot.
    fn spawn_fetch(&self, chunk: ChunkReference, epoch: u64) -> watch::Receiver<Option<LoadResult>> {
        let (tx, rx) = watch::channel(None);
        let fetcher = Arc::clone(&self.fetcher);
        let slots = Arc::clone(&self.slots);

        tokio::spawn(async move {
            let mut guard = LoadingGuard {
                slots,
                chunk,
                epoch,
                armed: true,
            };
            let result = fetch_module(&*fetcher, &guard.chunk).await;
            guard.settle(&result);
            tx.send_replace(Some(result));
        });
        rx
    }
}

/// Fetch, verify and decode one chunk.
async fn fetch_module<F: ChunkFetcher>(fetcher: &F, chunk: &ChunkReference) -> LoadResult {
    let bytes = fetcher
        .fetch(chunk)
        .await
        .map_err(|e| ChunkLoadError::Fetch {
            chunk: chunk.clone(),
            source: Arc::new(e),
        })?;
    if !chunk.matches(&bytes) {
        return Err(ChunkLoadError::Integrity {
            chunk: chunk.clone(),
        });
    }
    let module = ChunkModule::from_bytes(&bytes).map_err(|e| ChunkLoadError::Malformed {
        chunk: chunk.clone(),
        source: Arc::new(e),
    })?;
    Ok(Arc::new(LoadedModule::new(chunk.clone(), module)))
}

/// Owns a `Loading` slot for the fetch task's lifetime.
///
/// If the task ends without settling (panic, runtime shutdown) the slot is
/// released so the next load starts over.
struct LoadingGuard {
    slots: Arc<Mutex<Slots>>,
    chunk: ChunkReference,
    epoch: u64,
    armed: bool,
}

impl LoadingGuard {
    fn settle(&mut self, result: &LoadResult) {
        self.armed = false;
        let mut slots = self.slots.lock().unwrap();
        if slots.epoch != self.epoch {
            return;
        }
        match result {
            Ok(module) => {
                tracing::debug!(chunk = %self.chunk, "Chunk loaded");
                slots
                    .by_chunk
                    .insert(self.chunk.clone(), Slot::Loaded(Arc::clone(module)));
            }
            Err(error) => {
                tracing::warn!(chunk = %self.chunk, %error, "Chunk load failed");
                slots.by_chunk.remove(&self.chunk);
            }
        }
    }
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        if !self.armed {
            return;
        }
        if let Ok(mut slots) = self.slots.lock()
            && slots.epoch == self.epoch
        {
            slots.by_chunk.remove(&self.chunk);
        }
    }
}
