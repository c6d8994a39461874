//! Raw chunk files.
//!
//! Chunk names embed their content hash, so responses are cacheable forever.

use std::sync::Arc;

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use quire_loader::{ChunkFetcher, FetchError};
use quire_site::ChunkReference;

use crate::error::ServerError;
use crate::state::AppState;

const IMMUTABLE: &str = "public, max-age=31536000, immutable";

/// Handle GET /assets/{file}.
pub(crate) async fn get_asset(
    Path(file): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, ServerError> {
    let chunk = ChunkReference::parse(&file).map_err(|_| ServerError::ChunkNotFound(file))?;
    let bytes = match state.assets.fetch(&chunk).await {
        Ok(bytes) => bytes,
        Err(FetchError::NotFound(_)) => {
            return Err(ServerError::ChunkNotFound(chunk.to_string()));
        }
        Err(FetchError::Io(e)) => return Err(ServerError::Io(e)),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "application/json"),
            (header::CACHE_CONTROL, IMMUTABLE),
        ],
        bytes,
    )
        .into_response())
}
