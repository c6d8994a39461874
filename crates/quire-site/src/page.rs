//! Page-data records.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Build-time metadata of one page, independent of its prose.
///
/// Produced once per content unit by the build and never mutated afterwards.
/// Serialized with the same keys as the generated page modules
/// (`title`, `description`, `frontmatter`, `headers`, `relativePath`).
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageDataRecord {
    /// Page title (front matter `title`, first H1, or file stem).
    pub title: String,
    /// Page description (front matter `description`).
    #[serde(default)]
    pub description: String,
    /// Open-ended front matter mapping.
    #[serde(default)]
    pub frontmatter: Map<String, Value>,
    /// Outline headings within the configured level range.
    #[serde(default)]
    pub headers: Vec<PageHeader>,
    /// Source path relative to the content directory (e.g. `framework/routing.md`).
    pub relative_path: String,
}

/// One outline heading of a page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageHeader {
    /// Heading level (1-6).
    pub level: u8,
    /// Heading text.
    pub title: String,
    /// Anchor slug.
    pub slug: String,
}
