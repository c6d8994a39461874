//! Content-addressed page chunks.
//!
//! Every page is emitted as one chunk file whose name embeds a hash of its
//! bytes:
//!
//! ```text
//! framework_rendering-strategies.md.CIDXmC7h.json
//! └──────── source path ──────────┘ └ hash ┘
//! ```
//!
//! Identical bytes always give the same name and any change gives a new
//! one, so a chunk name can be cached forever.

use std::fmt;

use base64::Engine;
use base64::prelude::BASE64_URL_SAFE_NO_PAD;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::page::PageDataRecord;

/// Number of hash characters embedded in a chunk name.
pub const CHUNK_HASH_LEN: usize = 8;

/// File extension of chunk files.
const CHUNK_EXTENSION: &str = "json";

/// Opaque identifier of a lazily-loadable page chunk.
///
/// Shaped `<stem>.<hash>.json` where `<hash>` is [`CHUNK_HASH_LEN`]
/// characters of URL-safe base64 SHA-256 over the chunk bytes.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ChunkReference(String);

/// Error for a string that is not a valid chunk name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid chunk name: {0}")]
pub struct InvalidChunkName(String);

impl ChunkReference {
    /// Name the chunk holding `bytes` for the content unit at `relative_path`.
    #[must_use]
    pub fn for_content(relative_path: &str, bytes: &[u8]) -> Self {
        let stem = relative_path.replace(['/', '\\'], "_");
        Self(format!("{stem}.{}.{CHUNK_EXTENSION}", content_hash(bytes)))
    }

    /// Parse a chunk name, e.g. from a manifest or a request path.
    ///
    /// # Errors
    ///
    /// Returns [`InvalidChunkName`] if the name has no stem, a malformed hash,
    /// the wrong extension, or contains path separators.
    pub fn parse(name: &str) -> Result<Self, InvalidChunkName> {
        let invalid = || InvalidChunkName(name.to_owned());

        if name.contains(['/', '\\']) || name.starts_with('.') {
            return Err(invalid());
        }
        let mut parts = name.rsplitn(3, '.');
        let (Some(extension), Some(hash), Some(stem)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(invalid());
        };
        let hash_ok = hash.len() == CHUNK_HASH_LEN
            && hash
                .bytes()
                .all(|b| b.is_ascii_alphanumeric() || b == b'-' || b == b'_');
        if extension != CHUNK_EXTENSION || stem.is_empty() || !hash_ok {
            return Err(invalid());
        }
        Ok(Self(name.to_owned()))
    }

    /// The chunk file name.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The embedded content hash.
    #[must_use]
    pub fn hash(&self) -> &str {
        self.0.rsplit('.').nth(1).unwrap_or_default()
    }

    /// Whether `bytes` hash to the embedded content hash.
    #[must_use]
    pub fn matches(&self, bytes: &[u8]) -> bool {
        content_hash(bytes) == self.hash()
    }
}

impl TryFrom<String> for ChunkReference {
    type Error = InvalidChunkName;

    fn try_from(name: String) -> Result<Self, Self::Error> {
        Self::parse(&name)
    }
}

impl From<ChunkReference> for String {
    fn from(chunk: ChunkReference) -> Self {
        chunk.0
    }
}

impl fmt::Display for ChunkReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Short content hash used in chunk names.
fn content_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    let digest = hasher.finalize();
    let mut encoded = BASE64_URL_SAFE_NO_PAD.encode(digest);
    encoded.truncate(CHUNK_HASH_LEN);
    encoded
}

/// On-disk form of a page chunk.
///
/// Carries the page-data record next to the page's static view: one
/// pre-rendered HTML fragment of `nodes` top-level nodes, wrapped in `tag`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChunkModule {
    /// Page-data record exported by the chunk.
    pub page_data: PageDataRecord,
    /// Static view of the page.
    pub view: StaticView,
}

/// Pre-rendered body of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StaticView {
    /// Wrapper element.
    pub tag: String,
    /// HTML fragment.
    #[serde(rename = "static")]
    pub html: String,
    /// Number of top-level nodes in `html`.
    pub nodes: usize,
}

impl ChunkModule {
    /// Serialize to chunk bytes.
    ///
    /// Output is deterministic: equal modules give equal bytes.
    ///
    /// # Errors
    ///
    /// Returns a serialization error (only possible for non-string map keys
    /// in front matter).
    pub fn to_bytes(&self) -> Result<Vec<u8>, serde_json::Error> {
        serde_json::to_vec(self)
    }

    /// Decode chunk bytes.
    ///
    /// # Errors
    ///
    /// Returns the JSON error for malformed chunks.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, serde_json::Error> {
        serde_json::from_slice(bytes)
    }
}
