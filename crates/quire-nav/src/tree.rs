//! Tree traversals: flattening and active-trail matching.

use serde::Serialize;

use crate::entry::NavEntry;
use crate::route::RoutePath;

/// One row of a flattened navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FlatRoute {
    /// Route of the entry.
    pub route: RoutePath,
    /// Nesting depth, top-level entries are at depth 0.
    pub depth: usize,
    /// Display text.
    pub label: String,
}

/// List every routed entry depth-first, in display order.
///
/// Groups with a landing page appear before their children. External and
/// missing targets are skipped. A route linked from several places appears
/// once per occurrence.
#[must_use]
pub fn flatten(tree: &[NavEntry]) -> Vec<FlatRoute> {
    fn walk(entries: &[NavEntry], depth: usize, out: &mut Vec<FlatRoute>) {
        for entry in entries {
            if let Some(route) = entry.route() {
                out.push(FlatRoute {
                    route: route.clone(),
                    depth,
                    label: entry.label().to_owned(),
                });
            }
            walk(entry.children(), depth + 1, out);
        }
    }

    let mut out = Vec::new();
    walk(tree, 0, &mut out);
    out
}

/// Collect the active trail for `current`.
///
/// An entry is directly active when
/// - it is a leaf whose route equals `current`,
/// - it is a group whose route is the longest segment-prefix of `current`
///   among all group routes of the tree, or
/// - its `active_match` pattern matches `current`.
///
/// The trail is every directly active entry plus all of its ancestors, in
/// depth-first pre-order.
#[must_use]
pub fn match_active<'a>(tree: &'a [NavEntry], current: &RoutePath) -> Vec<&'a NavEntry> {
    let longest = longest_group_prefix(tree, current);
    let mut trail = Vec::new();
    collect_active(tree, current, longest, &mut trail);
    trail
}

/// Length of the longest group route that prefixes `current`.
fn longest_group_prefix(entries: &[NavEntry], current: &RoutePath) -> Option<usize> {
    entries
        .iter()
        .filter_map(|entry| {
            let own = match entry {
                NavEntry::Group(_) => entry
                    .route()
                    .filter(|route| route.is_prefix_of(current))
                    .map(|route| route.as_str().len()),
                NavEntry::Leaf(_) => None,
            };
            own.max(longest_group_prefix(entry.children(), current))
        })
        .max()
}

fn is_directly_active(entry: &NavEntry, current: &RoutePath, longest: Option<usize>) -> bool {
    if entry.active_match().is_some_and(|m| m.is_match(current)) {
        return true;
    }
    match entry {
        NavEntry::Leaf(_) => entry.route() == Some(current),
        NavEntry::Group(_) => entry.route().is_some_and(|route| {
            route.is_prefix_of(current) && Some(route.as_str().len()) == longest
        }),
    }
}

/// Push the active entries of `entries` into `trail`, returning whether any
/// was found.
fn collect_active<'a>(
    entries: &'a [NavEntry],
    current: &RoutePath,
    longest: Option<usize>,
    trail: &mut Vec<&'a NavEntry>,
) -> bool {
    let mut found = false;
    for entry in entries {
        let at = trail.len();
        let below = collect_active(entry.children(), current, longest, trail);
        if below || is_directly_active(entry, current, longest) {
            // Ancestors go before their descendants
            trail.insert(at, entry);
            found = true;
        }
    }
    found
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn route(raw: &str) -> RoutePath {
        RoutePath::normalize(raw)
    }

    fn labels(trail: &[&NavEntry]) -> Vec<String> {
        trail.iter().map(|e| e.label().to_owned()).collect()
    }

    fn sample_tree() -> Vec<NavEntry> {
        vec![
            NavEntry::group(
                "指南",
                vec![
                    NavEntry::group(
                        "框架",
                        vec![
                            NavEntry::leaf("安装", "/framework/installation"),
                            NavEntry::leaf("路由", "/framework/routing"),
                        ],
                    ),
                    NavEntry::group("库", vec![NavEntry::leaf("安装", "/library/installation")]),
                ],
            ),
            NavEntry::group(
                "团队",
                vec![NavEntry::leaf(
                    "贡献",
                    "https://github.com/gongph/react-router7-doc/pulls",
                )],
            ),
        ]
    }

    #[test]
    fn test_flatten_is_depth_first_in_display_order() {
        let flat = flatten(&sample_tree());
        let rows: Vec<(&str, usize)> = flat.iter().map(|r| (r.route.as_str(), r.depth)).collect();
        assert_eq!(
            rows,
            vec![
                ("/framework/installation", 2),
                ("/framework/routing", 2),
                ("/library/installation", 2),
            ]
        );
    }

    #[test]
    fn test_flatten_skips_external_links() {
        let flat = flatten(&sample_tree());
        assert!(flat.iter().all(|r| !r.label.contains("贡献")));
    }

    #[test]
    fn test_flatten_lists_group_target_before_children() {
        let tree = vec![
            NavEntry::group(
                "A",
                vec![NavEntry::leaf("B", "/a/b"), NavEntry::leaf("C", "/a/c")],
            )
            .with_target("/a"),
        ];
        let flat = flatten(&tree);
        let rows: Vec<(&str, usize)> = flat.iter().map(|r| (r.route.as_str(), r.depth)).collect();
        assert_eq!(rows, vec![("/a", 0), ("/a/b", 1), ("/a/c", 1)]);
    }

    #[test]
    fn test_flatten_keeps_every_occurrence() {
        let tree = vec![
            NavEntry::leaf("X", "/x"),
            NavEntry::group("G", vec![NavEntry::leaf("X again", "/x/")]),
        ];
        let flat = flatten(&tree);
        let xs = flat.iter().filter(|r| r.route == route("/x")).count();
        assert_eq!(xs, 2);
    }

    #[test]
    fn test_flatten_then_rebuild_reproduces_routes() {
        let tree = sample_tree();
        let flat = flatten(&tree);

        let mut expected = Vec::new();
        fn walk(entries: &[NavEntry], out: &mut Vec<RoutePath>) {
            for entry in entries {
                if let Some(route) = entry.route() {
                    out.push(route.clone());
                }
                walk(entry.children(), out);
            }
        }
        walk(&tree, &mut expected);

        let rebuilt: Vec<RoutePath> = flat.iter().map(|r| r.route.clone()).collect();
        assert_eq!(rebuilt, expected);

        // Flattening the flattened listing again is a fixpoint
        let reflat_tree: Vec<NavEntry> = flat
            .iter()
            .map(|r| NavEntry::leaf(r.label.clone(), r.route.as_str()))
            .collect();
        let reflat: Vec<RoutePath> = flatten(&reflat_tree).into_iter().map(|r| r.route).collect();
        assert_eq!(reflat, rebuilt);
    }

    #[test]
    fn test_match_active_group_and_exact_leaf() {
        let tree = vec![
            NavEntry::group(
                "A",
                vec![NavEntry::leaf("B", "/a/b"), NavEntry::leaf("C", "/a/c")],
            )
            .with_target("/a"),
        ];
        let trail = match_active(&tree, &route("/a/b"));
        let routes: Vec<&str> = trail
            .iter()
            .filter_map(|e| e.route())
            .map(RoutePath::as_str)
            .collect();
        assert_eq!(routes, vec!["/a", "/a/b"]);
    }

    #[test]
    fn test_match_active_includes_untargeted_ancestors() {
        let tree = sample_tree();
        let trail = match_active(&tree, &route("/framework/routing"));
        assert_eq!(labels(&trail), vec!["指南", "框架", "路由"]);
    }

    #[test]
    fn test_match_active_leaf_requires_exact_match() {
        let tree = vec![NavEntry::leaf("Routing", "/framework/routing")];
        assert!(match_active(&tree, &route("/framework/routing/nested")).is_empty());
        assert_eq!(match_active(&tree, &route("/framework/routing/")).len(), 1);
    }

    #[test]
    fn test_match_active_longest_group_prefix_wins() {
        let tree = vec![
            NavEntry::group("Framework", vec![NavEntry::leaf("Intro", "/framework/intro")])
                .with_target("/framework"),
            NavEntry::group("Advanced", vec![NavEntry::leaf("HMR", "/framework/advanced/hmr")])
                .with_target("/framework/advanced"),
        ];
        let trail = match_active(&tree, &route("/framework/advanced/streaming"));
        assert_eq!(labels(&trail), vec!["Advanced"]);
    }

    #[test]
    fn test_match_active_group_prefix_is_segment_wise() {
        let tree = vec![
            NavEntry::group("Guide", vec![NavEntry::leaf("Intro", "/guide/intro")])
                .with_target("/guide"),
        ];
        assert!(match_active(&tree, &route("/guidelines")).is_empty());
    }

    #[test]
    fn test_match_active_uses_active_match_pattern() {
        let tree = vec![
            NavEntry::leaf("指南", "/home")
                .with_active_match("/(home|framework|library)/")
                .unwrap(),
            NavEntry::leaf("API", "https://api.reactrouter.com/v7/"),
        ];
        let trail = match_active(&tree, &route("/framework/routing"));
        assert_eq!(labels(&trail), vec!["指南"]);
    }

    #[test]
    fn test_match_active_no_match() {
        let tree = sample_tree();
        assert!(match_active(&tree, &route("/nowhere")).is_empty());
    }
}
