//! Route paths and navigation link targets.
//!
//! A [`RoutePath`] is the lookup key of the page registry. Every route
//! entering the system goes through [`RoutePath::normalize`], so two
//! spellings of the same page (`/guide/`, `//guide`, `/gu%69de`) compare equal.

use std::fmt;

use percent_encoding::percent_decode_str;
use serde::{Deserialize, Serialize, Serializer};

/// Normalized absolute path identifying one page.
///
/// Invariants:
/// - starts with `/`
/// - contains no empty segments (`//`)
/// - ends with `/` only when it is the root route
/// - a literal `%` is kept encoded as `%25`, so normalizing twice is a no-op
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct RoutePath(String);

impl RoutePath {
    /// Normalize a raw route string.
    ///
    /// Percent-decodes (lossy UTF-8), ensures a leading slash, collapses
    /// repeated slashes and strips the trailing slash of non-root routes.
    /// Matching stays case-sensitive.
    ///
    /// # Examples
    ///
    /// ```
    /// use quire_nav::RoutePath;
    ///
    /// assert_eq!(RoutePath::normalize("/framework/routing/").as_str(), "/framework/routing");
    /// assert_eq!(RoutePath::normalize("//framework///routing").as_str(), "/framework/routing");
    /// assert_eq!(RoutePath::normalize("/").as_str(), "/");
    /// assert_eq!(RoutePath::normalize("").as_str(), "/");
    /// ```
    #[must_use]
    pub fn normalize(raw: &str) -> Self {
        let decoded = percent_decode_str(raw).decode_utf8_lossy();
        let mut path = String::with_capacity(decoded.len() + 1);
        for segment in decoded.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            if segment.contains('%') {
                path.push_str(&segment.replace('%', "%25"));
            } else {
                path.push_str(segment);
            }
        }
        if path.is_empty() {
            path.push('/');
        }
        Self(path)
    }

    /// The root route `/`.
    #[must_use]
    pub fn root() -> Self {
        Self("/".to_owned())
    }

    /// The normalized path as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the root route.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.0 == "/"
    }

    /// Path segments, root has none.
    pub fn segments(&self) -> impl Iterator<Item = &str> {
        self.0.split('/').filter(|s| !s.is_empty())
    }

    /// Segment-wise prefix test.
    ///
    /// `/a` is a prefix of `/a` and `/a/b` but not of `/ab`. The root route
    /// is a prefix of every route.
    #[must_use]
    pub fn is_prefix_of(&self, other: &RoutePath) -> bool {
        if self.is_root() || self.0 == other.0 {
            return true;
        }
        other.0.starts_with(&self.0) && other.0.as_bytes().get(self.0.len()) == Some(&b'/')
    }

    /// Remove a deployment base path (e.g. `/docs/`) from this route.
    ///
    /// Returns `None` when the route lies outside `base`.
    #[must_use]
    pub fn strip_base(&self, base: &RoutePath) -> Option<RoutePath> {
        if base.is_root() {
            return Some(self.clone());
        }
        if !base.is_prefix_of(self) {
            return None;
        }
        let rest = &self.0[base.0.len()..];
        if rest.is_empty() {
            Some(Self::root())
        } else {
            Some(Self(rest.to_owned()))
        }
    }

    /// Prefix this route with a deployment base path.
    #[must_use]
    pub fn with_base(&self, base: &RoutePath) -> RoutePath {
        if base.is_root() {
            self.clone()
        } else if self.is_root() {
            base.clone()
        } else {
            Self(format!("{}{}", base.0, self.0))
        }
    }
}

impl From<String> for RoutePath {
    fn from(raw: String) -> Self {
        Self::normalize(&raw)
    }
}

impl From<&str> for RoutePath {
    fn from(raw: &str) -> Self {
        Self::normalize(raw)
    }
}

impl From<RoutePath> for String {
    fn from(route: RoutePath) -> Self {
        route.0
    }
}

impl AsRef<str> for RoutePath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RoutePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A link into the site's own route space.
///
/// Keeps the link as written alongside its normalized route. The raw form
/// matters at build time: `/guide/` binds `guide/index.md` first while
/// `/guide` binds `guide.md` first, even though both normalize to `/guide`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RouteLink {
    path: RoutePath,
    link: String,
}

impl RouteLink {
    /// Create a route link from its written form.
    #[must_use]
    pub fn new(link: impl Into<String>) -> Self {
        let link = link.into();
        Self {
            path: RoutePath::normalize(&link),
            link,
        }
    }

    /// Normalized route.
    #[must_use]
    pub fn path(&self) -> &RoutePath {
        &self.path
    }

    /// Link exactly as written in the configuration.
    #[must_use]
    pub fn link(&self) -> &str {
        &self.link
    }

    /// Whether the link was written with a trailing slash (directory form).
    #[must_use]
    pub fn is_directory_form(&self) -> bool {
        self.link.ends_with('/')
    }
}

/// Where a navigation entry points.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Target {
    /// A page of this site, resolved through the page registry.
    Route(RouteLink),
    /// Anything outside the site's route space. Passed through untouched and
    /// never entered into the page registry.
    External(String),
}

impl Target {
    /// Classify a link string.
    ///
    /// Returns `None` for empty links. Links carrying a URI scheme
    /// (`https:`, `mailto:`) or a protocol-relative host (`//cdn`) are
    /// external, anything else is a site route.
    #[must_use]
    pub fn parse(link: &str) -> Option<Self> {
        let link = link.trim();
        if link.is_empty() {
            return None;
        }
        if link.starts_with("//") || has_scheme(link) {
            Some(Self::External(link.to_owned()))
        } else {
            Some(Self::Route(RouteLink::new(link)))
        }
    }

    /// The route of a site link, `None` for external links.
    #[must_use]
    pub fn route(&self) -> Option<&RoutePath> {
        match self {
            Self::Route(link) => Some(link.path()),
            Self::External(_) => None,
        }
    }

    /// The link as written.
    #[must_use]
    pub fn link(&self) -> &str {
        match self {
            Self::Route(link) => link.link(),
            Self::External(url) => url,
        }
    }

    /// Whether this target leaves the site.
    #[must_use]
    pub fn is_external(&self) -> bool {
        matches!(self, Self::External(_))
    }
}

impl Serialize for Target {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.link())
    }
}

/// RFC 3986 scheme check: `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." ) ":"`
/// appearing before any path, query or fragment delimiter.
fn has_scheme(link: &str) -> bool {
    let Some(colon) = link.find(':') else {
        return false;
    };
    let scheme = &link[..colon];
    let mut chars = scheme.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
