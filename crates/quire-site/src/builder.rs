//! Site build: content units → chunks, registry and manifest.

use std::collections::HashSet;
use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use quire_config::Config;
use quire_nav::{ConfigError, NavEntry, RoutePath, validate};

use crate::chunk::{ChunkModule, ChunkReference, StaticView};
use crate::content_index::ContentIndex;
use crate::frontmatter::{self, FrontMatterError};
use crate::markdown::{ContentRenderer, MarkdownRenderer};
use crate::page::PageDataRecord;
use crate::registry::{ManifestError, PageRegistry};
use crate::scanner::{ContentUnit, Scanner};

/// Wrapper element of every page view.
const VIEW_TAG: &str = "div";

/// A navigation link whose route has no page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeadLink {
    /// Label of the navigation entry.
    pub label: String,
    /// Route it points to.
    pub route: RoutePath,
}

impl fmt::Display for DeadLink {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "\"{}\" -> {}", self.label, self.route)
    }
}

/// Site build failure. Any of these aborts the build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    /// Content directory does not exist.
    #[error("content directory not found: {}", .0.display())]
    MissingSource(PathBuf),
    /// I/O error on a specific path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        /// Path being read or written.
        path: PathBuf,
        /// Underlying error.
        source: io::Error,
    },
    /// Invalid front matter.
    #[error("{path}: {source}")]
    FrontMatter {
        /// Relative path of the content unit.
        path: String,
        /// Parse error.
        source: FrontMatterError,
    },
    /// Chunk serialization failed.
    #[error("{path}: cannot serialize chunk: {source}")]
    Chunk {
        /// Relative path of the content unit.
        path: String,
        /// Serialization error.
        source: serde_json::Error,
    },
    /// Invalid navigation tree.
    #[error("invalid {section}: {source}")]
    Navigation {
        /// `nav` or `sidebar`.
        section: &'static str,
        /// Validation error.
        source: ConfigError,
    },
    /// Navigation links to routes without pages.
    #[error("dead links: {}", format_dead_links(.0))]
    DeadLinks(Vec<DeadLink>),
    /// Manifest could not be written.
    #[error(transparent)]
    Manifest(#[from] ManifestError),
}

fn format_dead_links(links: &[DeadLink]) -> String {
    links
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Result of a successful build.
#[derive(Debug)]
pub struct BuildReport {
    /// Registry of every built page.
    pub registry: PageRegistry,
    /// Chunks written in this build.
    pub chunks_written: usize,
    /// Chunks already present with identical content.
    pub chunks_unchanged: usize,
    /// Stale chunks removed from the assets directory.
    pub chunks_removed: usize,
    /// Content units hidden by another unit on the same route.
    pub shadowed: Vec<String>,
    /// Dead links tolerated because `ignore_dead_links` is set.
    pub dead_links: Vec<DeadLink>,
    /// Output directory.
    pub out_dir: PathBuf,
}

/// Builds a site from its configuration.
pub struct SiteBuilder<'a> {
    config: &'a Config,
    out_dir: PathBuf,
    renderer: Box<dyn ContentRenderer>,
}

impl<'a> SiteBuilder<'a> {
    /// Builder writing to the configured output directory with the default
    /// markdown renderer.
    #[must_use]
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            out_dir: config.paths.out_dir.clone(),
            renderer: Box::new(MarkdownRenderer::new().with_outline(config.site.outline)),
        }
    }

    /// Write output somewhere other than the configured directory.
    #[must_use]
    pub fn with_out_dir(mut self, out_dir: PathBuf) -> Self {
        self.out_dir = out_dir;
        self
    }

    /// Use a different content renderer.
    #[must_use]
    pub fn with_renderer(mut self, renderer: impl ContentRenderer + 'static) -> Self {
        self.renderer = Box::new(renderer);
        self
    }

    /// Run the build.
    ///
    /// Scans the content directory, renders every unit into a chunk under
    /// `<out>/assets/`, validates `nav` and `sidebar`, checks for dead links
    /// and writes `<out>/manifest.json`. Nothing is written to the manifest
    /// unless every step succeeds.
    ///
    /// # Errors
    ///
    /// Returns the first [`BuildError`] encountered.
    pub fn build(&self) -> Result<BuildReport, BuildError> {
        let src_dir = &self.config.paths.src_dir;
        if !src_dir.is_dir() {
            return Err(BuildError::MissingSource(src_dir.clone()));
        }

        let units = Scanner::new(src_dir.clone()).scan();
        tracing::info!(src = %src_dir.display(), units = units.len(), "Scanned content");

        let assets_dir = self.out_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|source| BuildError::Io {
            path: assets_dir.clone(),
            source,
        })?;

        let mut builder = PageRegistry::builder();
        let mut report = BuildReport {
            registry: PageRegistry::default(),
            chunks_written: 0,
            chunks_unchanged: 0,
            chunks_removed: 0,
            shadowed: Vec::new(),
            dead_links: Vec::new(),
            out_dir: self.out_dir.clone(),
        };

        for unit in &units {
            let (page_data, bytes) = self.render_unit(unit)?;
            let chunk = ChunkReference::for_content(&unit.relative_path, &bytes);

            match builder.insert(unit.route.clone(), page_data, chunk.clone()) {
                Ok(_) => {
                    if write_chunk(&assets_dir, &chunk, &bytes)? {
                        report.chunks_written += 1;
                    } else {
                        report.chunks_unchanged += 1;
                    }
                }
                Err(taken) => {
                    tracing::warn!(
                        route = %unit.route,
                        kept = %taken.existing.page_data.relative_path,
                        shadowed = %unit.relative_path,
                        "Content units share a route, keeping the first"
                    );
                    report.shadowed.push(unit.relative_path.clone());
                }
            }
        }
        let registry = builder.build();

        let index = ContentIndex::new(&registry);
        for (section, tree) in [("nav", &self.config.nav), ("sidebar", &self.config.sidebar)] {
            validate(tree, &index).map_err(|source| BuildError::Navigation { section, source })?;
        }

        let mut dead_links = Vec::new();
        collect_dead_links(&self.config.nav, &registry, &mut dead_links);
        collect_dead_links(&self.config.sidebar, &registry, &mut dead_links);
        if !dead_links.is_empty() {
            if !self.config.site.ignore_dead_links {
                return Err(BuildError::DeadLinks(dead_links));
            }
            for link in &dead_links {
                tracing::warn!(label = %link.label, route = %link.route, "Ignoring dead link");
            }
        }
        report.dead_links = dead_links;

        report.chunks_removed = remove_stale_chunks(&assets_dir, &registry)?;

        let manifest_path = self.out_dir.join("manifest.json");
        registry.write_manifest(&manifest_path)?;

        tracing::info!(
            pages = registry.len(),
            written = report.chunks_written,
            unchanged = report.chunks_unchanged,
            removed = report.chunks_removed,
            out = %self.out_dir.display(),
            "Site built"
        );
        report.registry = registry;
        Ok(report)
    }

    /// Produce the page-data record and chunk bytes of one unit.
    fn render_unit(&self, unit: &ContentUnit) -> Result<(PageDataRecord, Vec<u8>), BuildError> {
        let content = fs::read_to_string(&unit.path).map_err(|source| BuildError::Io {
            path: unit.path.clone(),
            source,
        })?;
        let (front, body) =
            frontmatter::split(&content).map_err(|source| BuildError::FrontMatter {
                path: unit.relative_path.clone(),
                source,
            })?;
        let rendered = self.renderer.render(body);

        let title = front
            .title
            .or(rendered.title)
            .unwrap_or_else(|| file_stem(&unit.relative_path));
        let page_data = PageDataRecord {
            title,
            description: front.description.unwrap_or_default(),
            frontmatter: front.fields,
            headers: rendered.headers,
            relative_path: unit.relative_path.clone(),
        };
        let module = ChunkModule {
            page_data,
            view: StaticView {
                tag: VIEW_TAG.to_owned(),
                html: rendered.html,
                nodes: rendered.nodes,
            },
        };
        let bytes = module.to_bytes().map_err(|source| BuildError::Chunk {
            path: unit.relative_path.clone(),
            source,
        })?;

        tracing::debug!(path = %unit.relative_path, bytes = bytes.len(), "Rendered content unit");
        Ok((module.page_data, bytes))
    }
}

fn file_stem(relative_path: &str) -> String {
    Path::new(relative_path)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Write a chunk unless an identical one exists. Returns whether it was written.
fn write_chunk(assets_dir: &Path, chunk: &ChunkReference, bytes: &[u8]) -> Result<bool, BuildError> {
    let path = assets_dir.join(chunk.as_str());
    if path.is_file() {
        return Ok(false);
    }
    fs::write(&path, bytes).map_err(|source| BuildError::Io { path, source })?;
    Ok(true)
}

/// Delete chunk files no registry entry references.
fn remove_stale_chunks(assets_dir: &Path, registry: &PageRegistry) -> Result<usize, BuildError> {
    let io_error = |source: io::Error| BuildError::Io {
        path: assets_dir.to_path_buf(),
        source,
    };
    let live: HashSet<&str> = registry
        .entries()
        .into_iter()
        .map(|entry| entry.chunk.as_str())
        .collect();

    let mut removed = 0;
    for entry in fs::read_dir(assets_dir).map_err(io_error)? {
        let entry = entry.map_err(io_error)?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if ChunkReference::parse(&name).is_err() || live.contains(name.as_str()) {
            continue;
        }
        fs::remove_file(entry.path()).map_err(io_error)?;
        tracing::debug!(chunk = %name, "Removed stale chunk");
        removed += 1;
    }
    Ok(removed)
}

/// Route targets without a page, in depth-first order.
fn collect_dead_links(tree: &[NavEntry], registry: &PageRegistry, out: &mut Vec<DeadLink>) {
    for entry in tree {
        if let Some(route) = entry.route()
            && !registry.contains(route)
        {
            out.push(DeadLink {
                label: entry.label().to_owned(),
                route: route.clone(),
            });
        }
        collect_dead_links(entry.children(), registry, out);
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use quire_config::Config;
    use quire_nav::{RecordBinding, RouteLink};

    use super::*;
    use crate::markdown::RenderedContent;

    fn write(root: &Path, relative: &str, content: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, content).unwrap();
    }

    fn site(toml: &str) -> (tempfile::TempDir, Config) {
        let temp = tempfile::tempdir().unwrap();
        write(temp.path(), "src/index.md", "# React Router7 中文文档\n\nWelcome.\n");
        write(
            temp.path(),
            "src/framework/rendering-strategies.md",
            "---\ndescription: SSR, SPA and pre-rendering\n---\n# 渲染策略\n\n## 服务端渲染\n\nText.\n",
        );
        write(temp.path(), "src/start/installation.md", "Install it.\n");
        let config = Config::from_toml_str(toml, temp.path()).unwrap();
        (temp, config)
    }

    const NAV: &str = r#"
[site]
title = "Docs"

[[sidebar]]
text = "Framework"
items = [
  { text = "渲染策略", link = "/framework/rendering-strategies" },
  { text = "Installation", link = "/start/installation/" },
]
"#;

    #[test]
    fn test_build_writes_chunks_and_manifest() {
        let (_temp, config) = site(NAV);
        let report = SiteBuilder::new(&config).build().unwrap();

        assert_eq!(report.registry.len(), 3);
        assert_eq!(report.chunks_written, 3);
        assert!(config.paths.manifest_path().is_file());

        let entry = report
            .registry
            .resolve("/framework/rendering-strategies/")
            .unwrap();
        assert_eq!(entry.page_data.title, "渲染策略");
        assert_eq!(entry.page_data.description, "SSR, SPA and pre-rendering");
        assert_eq!(entry.page_data.headers[0].slug, "服务端渲染");

        let bytes = fs::read(config.paths.assets_dir().join(entry.chunk.as_str())).unwrap();
        assert!(entry.chunk.matches(&bytes));
        let module = ChunkModule::from_bytes(&bytes).unwrap();
        assert_eq!(module.view.tag, "div");
        assert_eq!(module.view.nodes, 3);
        assert_eq!(module.page_data, *entry.page_data);
    }

    #[test]
    fn test_title_falls_back_to_file_stem() {
        let (_temp, config) = site(NAV);
        let report = SiteBuilder::new(&config).build().unwrap();
        let entry = report.registry.resolve("/start/installation").unwrap();
        assert_eq!(entry.page_data.title, "installation");
    }

    #[test]
    fn test_rebuild_is_stable() {
        let (_temp, config) = site(NAV);
        let first = SiteBuilder::new(&config).build().unwrap();
        let second = SiteBuilder::new(&config).build().unwrap();

        assert_eq!(second.chunks_written, 0);
        assert_eq!(second.chunks_unchanged, 3);
        for entry in first.registry.entries() {
            assert_eq!(second.registry.get(&entry.route).unwrap().chunk, entry.chunk);
        }
    }

    #[test]
    fn test_changed_content_gets_new_chunk() {
        let (temp, config) = site(NAV);
        let before = SiteBuilder::new(&config).build().unwrap();
        write(temp.path(), "src/start/installation.md", "Install it differently.\n");
        let after = SiteBuilder::new(&config).build().unwrap();

        let route = RoutePath::normalize("/start/installation");
        let old = &before.registry.get(&route).unwrap().chunk;
        let new = &after.registry.get(&route).unwrap().chunk;
        assert_ne!(old, new);
        assert_eq!(after.chunks_removed, 1);
        assert!(!config.paths.assets_dir().join(old.as_str()).exists());
    }

    #[test]
    fn test_shadowed_unit_keeps_first() {
        let (temp, config) = site(NAV);
        write(temp.path(), "src/start.md", "# Start page\n");
        write(temp.path(), "src/start/index.md", "# Start index\n");

        let report = SiteBuilder::new(&config).build().unwrap();

        assert_eq!(report.shadowed, vec!["start/index.md".to_owned()]);
        let entry = report.registry.resolve("/start").unwrap();
        assert_eq!(entry.page_data.relative_path, "start.md");
    }

    #[test]
    fn test_shadowed_route_link_forms_are_aliases() {
        let toml = r#"
[[sidebar]]
text = "Start"
items = [
  { text = "Start", link = "/start" },
  { text = "Start again", link = "/start/" },
]
"#;
        let (temp, config) = site(toml);
        write(temp.path(), "src/start.md", "# Start page\n");
        write(temp.path(), "src/start/index.md", "# Start index\n");

        let report = SiteBuilder::new(&config).build().unwrap();

        let entry = report.registry.resolve("/start/").unwrap();
        assert_eq!(entry.page_data.relative_path, "start.md");
        assert_eq!(report.shadowed, vec!["start/index.md".to_owned()]);
    }

    #[test]
    fn test_directory_link_binds_served_unit() {
        let toml = r#"
[[sidebar]]
text = "Start"
link = "/start/"
"#;
        let (temp, config) = site(toml);
        write(temp.path(), "src/start.md", "# Start page\n");
        write(temp.path(), "src/start/index.md", "# Start index\n");

        let report = SiteBuilder::new(&config).build().unwrap();
        let index = ContentIndex::new(&report.registry);
        let served = &report.registry.resolve("/start/").unwrap().page_data.relative_path;

        assert_eq!(
            index.record_for(&RouteLink::new("/start/")).as_deref(),
            Some(served.as_str())
        );
        assert_eq!(served, "start.md");
    }

    #[test]
    fn test_dead_link_fails_build() {
        let toml = r#"
[[nav]]
text = "Missing"
link = "/nowhere"
"#;
        let (_temp, config) = site(toml);
        let err = SiteBuilder::new(&config).build().unwrap_err();
        match err {
            BuildError::DeadLinks(links) => assert_eq!(
                links,
                vec![DeadLink {
                    label: "Missing".to_owned(),
                    route: RoutePath::normalize("/nowhere"),
                }]
            ),
            other => panic!("unexpected error: {other}"),
        }
        assert!(!config.paths.manifest_path().exists());
    }

    #[test]
    fn test_dead_links_ignored_when_configured() {
        let toml = r#"
[site]
ignore_dead_links = true

[[nav]]
text = "Missing"
link = "/nowhere"

[[nav]]
text = "GitHub"
link = "https://github.com/remix-run/react-router"
"#;
        let (_temp, config) = site(toml);
        let report = SiteBuilder::new(&config).build().unwrap();
        assert_eq!(report.dead_links.len(), 1);
    }

    #[test]
    fn test_empty_group_fails_build() {
        let toml = r#"
[[sidebar]]
text = "Empty"
items = []
"#;
        let (_temp, config) = site(toml);
        assert!(matches!(
            SiteBuilder::new(&config).build(),
            Err(BuildError::Navigation {
                section: "sidebar",
                source: ConfigError::EmptyGroup { .. },
            })
        ));
    }

    #[test]
    fn test_missing_source_dir() {
        let temp = tempfile::tempdir().unwrap();
        let config = Config::from_toml_str("", temp.path()).unwrap();
        assert!(matches!(
            SiteBuilder::new(&config).build(),
            Err(BuildError::MissingSource(_))
        ));
    }

    #[test]
    fn test_out_dir_override() {
        let (temp, config) = site(NAV);
        let out = temp.path().join("check-out");
        let report = SiteBuilder::new(&config)
            .with_out_dir(out.clone())
            .build()
            .unwrap();
        assert_eq!(report.out_dir, out);
        assert!(out.join("manifest.json").is_file());
        assert!(!config.paths.manifest_path().exists());
    }

    struct Upper;

    impl ContentRenderer for Upper {
        fn render(&self, markdown: &str) -> RenderedContent {
            RenderedContent {
                html: markdown.to_uppercase(),
                nodes: 1,
                ..Default::default()
            }
        }
    }

    #[test]
    fn test_custom_renderer() {
        let (_temp, config) = site(NAV);
        let report = SiteBuilder::new(&config).with_renderer(Upper).build().unwrap();
        let entry = report.registry.resolve("/").unwrap();
        let bytes = fs::read(config.paths.assets_dir().join(entry.chunk.as_str())).unwrap();
        let module = ChunkModule::from_bytes(&bytes).unwrap();
        assert!(module.view.html.starts_with("# REACT ROUTER7"));
        assert_eq!(module.page_data.title, "index");
    }
}
