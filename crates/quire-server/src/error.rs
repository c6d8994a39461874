//! Error types for the HTTP server.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use quire_loader::ChunkLoadError;
use quire_nav::RoutePath;
use quire_site::LookupError;
use serde_json::json;

/// Request error.
#[derive(Debug, thiserror::Error)]
pub(crate) enum ServerError {
    /// Route lies outside the deployment base.
    #[error("Route outside base: {0}")]
    OutsideBase(RoutePath),

    /// No page for the route.
    #[error(transparent)]
    Lookup(#[from] LookupError),

    /// Unknown or malformed chunk name.
    #[error("Chunk not found: {0}")]
    ChunkNotFound(String),

    /// The page's chunk failed to load.
    #[error(transparent)]
    ChunkLoad(#[from] ChunkLoadError),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, body) = match &self {
            Self::OutsideBase(route) | Self::Lookup(LookupError::RouteNotFound(route)) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Page not found", "route": route}),
            ),
            Self::ChunkNotFound(name) => (
                StatusCode::NOT_FOUND,
                json!({"error": "Chunk not found", "chunk": name}),
            ),
            Self::ChunkLoad(e) => {
                tracing::warn!(chunk = %e.chunk(), error = %e, "Serving page failed");
                (
                    StatusCode::BAD_GATEWAY,
                    json!({"error": e.to_string(), "chunk": e.chunk(), "retryable": true}),
                )
            }
            Self::Io(e) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({"error": e.to_string()}),
            ),
        };

        (status, axum::Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use quire_site::ChunkReference;

    use super::*;

    #[test]
    fn test_not_found_status() {
        let err = ServerError::Lookup(LookupError::RouteNotFound(RoutePath::normalize("/x")));
        assert_eq!(err.into_response().status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn test_chunk_load_is_bad_gateway() {
        let err = ServerError::ChunkLoad(ChunkLoadError::Integrity {
            chunk: ChunkReference::for_content("x.md", b"x"),
        });
        assert_eq!(err.into_response().status(), StatusCode::BAD_GATEWAY);
    }
}
