//! Site metadata endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use serde::Serialize;

use crate::state::AppState;

/// Response for GET /api/site.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SiteResponse {
    title: String,
    description: String,
    base: String,
    social_links: Vec<SocialLinkResponse>,
    #[serde(skip_serializing_if = "Option::is_none")]
    footer: Option<FooterResponse>,
}

#[derive(Serialize)]
struct SocialLinkResponse {
    icon: String,
    link: String,
}

#[derive(Serialize)]
struct FooterResponse {
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    copyright: Option<String>,
}

/// Handle GET /api/site.
pub(crate) async fn get_site(State(state): State<Arc<AppState>>) -> Json<SiteResponse> {
    let config = &state.config;
    Json(SiteResponse {
        title: config.site.title.clone(),
        description: config.site.description.clone(),
        base: state.base.to_string(),
        social_links: config
            .social_links
            .iter()
            .map(|s| SocialLinkResponse {
                icon: s.icon.clone(),
                link: s.link.clone(),
            })
            .collect(),
        footer: config.footer.as_ref().map(|f| FooterResponse {
            message: f.message.clone(),
            copyright: f.copyright.clone(),
        }),
    })
}
