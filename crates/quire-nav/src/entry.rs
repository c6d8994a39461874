//! Navigation tree entries.
//!
//! The nav bar and the sidebar are both ordered trees of [`NavEntry`].
//! Leaves point somewhere; groups hold children and may also point at a
//! section landing page.

use std::fmt;

use regex::Regex;
use serde::Deserialize;

use crate::route::{RoutePath, Target};

/// One node of a navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(try_from = "NavEntrySpec")]
pub enum NavEntry {
    /// A link without children.
    Leaf(NavLeaf),
    /// A labelled group of entries.
    Group(NavGroup),
}

/// Leaf entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavLeaf {
    /// Display text.
    pub label: String,
    /// Link target. `None` is a configuration error reported by `validate`.
    pub target: Option<Target>,
    /// Extra pattern marking this entry active.
    pub active_match: Option<ActiveMatch>,
}

/// Group entry.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavGroup {
    /// Display text.
    pub label: String,
    /// Optional section landing page.
    pub target: Option<Target>,
    /// Child entries in display order.
    pub children: Vec<NavEntry>,
    /// UI hint: `None` = not collapsible, `Some(true)` = collapsed initially.
    pub collapsed: Option<bool>,
    /// Extra pattern marking this entry active.
    pub active_match: Option<ActiveMatch>,
}

impl NavEntry {
    /// Create a leaf pointing at `link`.
    #[must_use]
    pub fn leaf(label: impl Into<String>, link: &str) -> Self {
        Self::Leaf(NavLeaf {
            label: label.into(),
            target: Target::parse(link),
            active_match: None,
        })
    }

    /// Create a group without a landing page.
    #[must_use]
    pub fn group(label: impl Into<String>, children: Vec<NavEntry>) -> Self {
        Self::Group(NavGroup {
            label: label.into(),
            target: None,
            children,
            collapsed: None,
            active_match: None,
        })
    }

    /// Set the target of this entry.
    #[must_use]
    pub fn with_target(mut self, link: &str) -> Self {
        let target = Target::parse(link);
        match &mut self {
            Self::Leaf(leaf) => leaf.target = target,
            Self::Group(group) => group.target = target,
        }
        self
    }

    /// Set the `active_match` pattern of this entry.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn with_active_match(mut self, pattern: &str) -> Result<Self, regex::Error> {
        let active = Some(ActiveMatch::new(pattern)?);
        match &mut self {
            Self::Leaf(leaf) => leaf.active_match = active,
            Self::Group(group) => group.active_match = active,
        }
        Ok(self)
    }

    /// Display text.
    #[must_use]
    pub fn label(&self) -> &str {
        match self {
            Self::Leaf(leaf) => &leaf.label,
            Self::Group(group) => &group.label,
        }
    }

    /// Link target, if any.
    #[must_use]
    pub fn target(&self) -> Option<&Target> {
        match self {
            Self::Leaf(leaf) => leaf.target.as_ref(),
            Self::Group(group) => group.target.as_ref(),
        }
    }

    /// Route of the target, `None` for external or missing targets.
    #[must_use]
    pub fn route(&self) -> Option<&RoutePath> {
        self.target().and_then(Target::route)
    }

    /// Children in display order (empty for leaves).
    #[must_use]
    pub fn children(&self) -> &[NavEntry] {
        match self {
            Self::Leaf(_) => &[],
            Self::Group(group) => &group.children,
        }
    }

    /// Whether this is a group node.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self, Self::Group(_))
    }

    /// The `active_match` pattern, if any.
    #[must_use]
    pub fn active_match(&self) -> Option<&ActiveMatch> {
        match self {
            Self::Leaf(leaf) => leaf.active_match.as_ref(),
            Self::Group(group) => group.active_match.as_ref(),
        }
    }
}

/// Regular expression that marks an entry active for matching routes.
///
/// Used by top-bar entries that stand for a whole area of the site, e.g.
/// `/(framework|library)/`.
#[derive(Clone)]
pub struct ActiveMatch(Regex);

impl ActiveMatch {
    /// Compile a pattern.
    ///
    /// # Errors
    ///
    /// Returns the regex compile error for an invalid pattern.
    pub fn new(pattern: &str) -> Result<Self, regex::Error> {
        Regex::new(pattern).map(Self)
    }

    /// Whether the pattern matches anywhere in `route`.
    #[must_use]
    pub fn is_match(&self, route: &RoutePath) -> bool {
        self.0.is_match(route.as_str())
    }

    /// The source pattern.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

impl PartialEq for ActiveMatch {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for ActiveMatch {}

impl fmt::Debug for ActiveMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("ActiveMatch").field(&self.as_str()).finish()
    }
}

/// Configuration form of an entry.
///
/// Presence of `items` decides the variant, so `items = []` still yields a
/// group and is reported as empty by validation.
#[derive(Deserialize)]
struct NavEntrySpec {
    #[serde(alias = "label")]
    text: String,
    #[serde(default)]
    link: Option<String>,
    #[serde(default)]
    items: Option<Vec<NavEntry>>,
    #[serde(default)]
    collapsed: Option<bool>,
    #[serde(default, alias = "activeMatch")]
    active_match: Option<String>,
}

impl TryFrom<NavEntrySpec> for NavEntry {
    type Error = regex::Error;

    fn try_from(raw: NavEntrySpec) -> Result<Self, Self::Error> {
        let target = raw.link.as_deref().and_then(Target::parse);
        let active_match = raw
            .active_match
            .as_deref()
            .map(ActiveMatch::new)
            .transpose()?;

        Ok(match raw.items {
            Some(children) => Self::Group(NavGroup {
                label: raw.text,
                target,
                children,
                collapsed: raw.collapsed,
                active_match,
            }),
            None => Self::Leaf(NavLeaf {
                label: raw.text,
                target,
                active_match,
            }),
        })
    }
}
