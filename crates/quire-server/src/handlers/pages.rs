//! Pages API endpoint.
//!
//! Resolves a route, loads its chunk through the shared loader and returns
//! the page metadata with its rendered view.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Response};
use quire_loader::ViewTree;
use quire_nav::RoutePath;
use quire_site::{ChunkReference, PageHeader};
use serde::Serialize;
use serde_json::{Map, Value};

use crate::error::ServerError;
use crate::state::AppState;

/// Response for GET /api/pages/{path}.
#[derive(Serialize)]
struct PageResponse {
    meta: PageMeta,
    view: ViewTree,
    /// `view` serialized to HTML.
    html: String,
}

/// Page metadata.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PageMeta {
    title: String,
    #[serde(skip_serializing_if = "String::is_empty")]
    description: String,
    /// Route without the deployment base.
    route: RoutePath,
    relative_path: String,
    chunk: ChunkReference,
    headers: Vec<PageHeader>,
    #[serde(skip_serializing_if = "Map::is_empty")]
    frontmatter: Map<String, Value>,
}

/// Handle GET /api/pages/ (root page).
pub(crate) async fn get_root_page(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl("/", &state, &headers).await
}

/// Handle GET /api/pages/{path}.
pub(crate) async fn get_page(
    Path(path): Path<String>,
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
) -> Result<Response, ServerError> {
    get_page_impl(&path, &state, &headers).await
}

async fn get_page_impl(
    path: &str,
    state: &AppState,
    headers: &HeaderMap,
) -> Result<Response, ServerError> {
    let route = state.site_route(path).map_err(ServerError::OutsideBase)?;
    let entry = state.registry.resolve(route.as_str())?;

    // Chunk names may hold non-ASCII path characters, the hash never does
    let etag = format!("\"{}\"", entry.chunk.hash());
    if let Some(if_none_match) = headers.get(header::IF_NONE_MATCH)
        && if_none_match.as_bytes() == etag.as_bytes()
    {
        return Ok(StatusCode::NOT_MODIFIED.into_response());
    }

    let module = state.loader.load(&entry.chunk).await?;
    let view = module.render(&entry.page_data);
    let page_data = &entry.page_data;

    let response = PageResponse {
        meta: PageMeta {
            title: page_data.title.clone(),
            description: page_data.description.clone(),
            route: entry.route.clone(),
            relative_path: page_data.relative_path.clone(),
            chunk: entry.chunk.clone(),
            headers: page_data.headers.clone(),
            frontmatter: page_data.frontmatter.clone(),
        },
        html: view.to_html(),
        view,
    };

    let mut response = Json(response).into_response();
    let response_headers = response.headers_mut();
    if let Ok(value) = HeaderValue::from_str(&etag) {
        response_headers.insert(header::ETAG, value);
    }
    response_headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("no-cache"));
    Ok(response)
}
