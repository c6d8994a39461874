//! Navigation API endpoint.
//!
//! Returns the nav bar and sidebar with the active trail marked for a route,
//! plus the sidebar in reading order with previous/next neighbours.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Query, State};
use quire_nav::{FlatRoute, NavEntry, RoutePath, Target, flatten, match_active};
use serde::{Deserialize, Serialize};

use crate::state::AppState;

/// Query for GET /api/navigation.
#[derive(Deserialize)]
pub(crate) struct NavigationQuery {
    /// Current route, including the deployment base. Defaults to the root.
    route: Option<String>,
}

/// Response for GET /api/navigation.
#[derive(Serialize)]
pub(crate) struct NavigationResponse {
    /// Current route without the base.
    route: RoutePath,
    nav: Vec<NavItem>,
    sidebar: Vec<NavItem>,
    /// Sidebar routes in reading order.
    flat: Vec<FlatRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    prev: Option<FlatRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    next: Option<FlatRoute>,
}

/// Navigation entry for serialization.
#[derive(Serialize, Debug, PartialEq)]
struct NavItem {
    text: String,
    /// Href with the base applied for site routes, as written for external links.
    #[serde(skip_serializing_if = "Option::is_none")]
    link: Option<String>,
    external: bool,
    active: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    collapsed: Option<bool>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    items: Vec<NavItem>,
}

/// Handle GET /api/navigation.
pub(crate) async fn get_navigation(
    State(state): State<Arc<AppState>>,
    Query(query): Query<NavigationQuery>,
) -> Json<NavigationResponse> {
    let raw = query.route.unwrap_or_else(|| state.base.to_string());
    // Outside the base nothing is active
    let route = state.site_route(&raw).unwrap_or_else(|outside| outside);

    let config = &state.config;
    let flat = flatten(&config.sidebar);
    let position = flat.iter().position(|f| f.route == route);
    let prev = position
        .and_then(|i| i.checked_sub(1))
        .and_then(|i| flat.get(i))
        .cloned();
    let next = position.and_then(|i| flat.get(i + 1)).cloned();

    Json(NavigationResponse {
        nav: nav_items(&config.nav, &route, &state.base),
        sidebar: nav_items(&config.sidebar, &route, &state.base),
        route,
        flat,
        prev,
        next,
    })
}

/// Convert a tree, marking entries on the active trail for `route`.
fn nav_items(tree: &[NavEntry], route: &RoutePath, base: &RoutePath) -> Vec<NavItem> {
    let active = match_active(tree, route);
    convert(tree, &active, base)
}

fn convert(entries: &[NavEntry], active: &[&NavEntry], base: &RoutePath) -> Vec<NavItem> {
    entries
        .iter()
        .map(|entry| NavItem {
            text: entry.label().to_owned(),
            link: entry.target().map(|target| match target {
                Target::Route(link) => link.path().with_base(base).to_string(),
                Target::External(url) => url.clone(),
            }),
            external: entry.target().is_some_and(Target::is_external),
            active: active.iter().any(|a| std::ptr::eq(*a, entry)),
            collapsed: match entry {
                NavEntry::Group(group) => group.collapsed,
                NavEntry::Leaf(_) => None,
            },
            items: convert(entry.children(), active, base),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn tree() -> Vec<NavEntry> {
        vec![
            NavEntry::group(
                "Framework",
                vec![
                    NavEntry::leaf("Routing", "/framework/routing"),
                    NavEntry::leaf("Rendering", "/framework/rendering-strategies"),
                ],
            )
            .with_target("/framework/"),
            NavEntry::leaf("API", "https://api.reactrouter.com/v7/"),
        ]
    }

    #[test]
    fn test_active_trail_marked() {
        let items = nav_items(
            &tree(),
            &RoutePath::normalize("/framework/routing"),
            &RoutePath::root(),
        );

        assert!(items[0].active);
        assert!(items[0].items[0].active);
        assert!(!items[0].items[1].active);
        assert!(!items[1].active);
    }

    #[test]
    fn test_links_get_base_external_untouched() {
        let items = nav_items(
            &tree(),
            &RoutePath::root(),
            &RoutePath::normalize("/react-router7-doc/"),
        );

        assert_eq!(items[0].link.as_deref(), Some("/react-router7-doc/framework"));
        assert_eq!(
            items[0].items[0].link.as_deref(),
            Some("/react-router7-doc/framework/routing")
        );
        assert_eq!(
            items[1].link.as_deref(),
            Some("https://api.reactrouter.com/v7/")
        );
        assert!(items[1].external);
    }

    #[test]
    fn test_nav_item_serialization() {
        let items = nav_items(&tree(), &RoutePath::root(), &RoutePath::root());
        let json = serde_json::to_value(&items).unwrap();

        assert_eq!(json[0]["text"], "Framework");
        assert_eq!(json[0]["items"][1]["link"], "/framework/rendering-strategies");
        assert!(json[1].get("items").is_none());
        assert!(json[1].get("collapsed").is_none());
    }
}
