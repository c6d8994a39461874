//! Site configuration for quire.
//!
//! Parses `quire.toml` with serde and provides auto-discovery of the config
//! file in parent directories. CLI settings can be applied during load via
//! [`CliSettings`].
//!
//! The navigation trees (`nav`, `sidebar`) are deserialized straight into
//! [`quire_nav::NavEntry`]. Structural problems in them (empty groups, missing
//! links, duplicate routes) are reported by the build, not here.
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.base`
//! - `server.host`

mod expand;

use std::path::{Path, PathBuf};

use quire_nav::{NavEntry, RoutePath};
use serde::{Deserialize, Serialize};

/// CLI settings that override configuration file values.
///
/// All fields are optional. Only non-None values override the loaded config.
#[derive(Debug, Default)]
pub struct CliSettings {
    /// Override server host.
    pub host: Option<String>,
    /// Override server port.
    pub port: Option<u16>,
    /// Override content source directory.
    pub src_dir: Option<PathBuf>,
    /// Override build output directory.
    pub out_dir: Option<PathBuf>,
    /// Override deployment base path.
    pub base: Option<String>,
}

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "quire.toml";

/// Application configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site metadata and build options.
    pub site: SiteConfig,
    /// Preview server configuration.
    pub server: ServerConfig,
    /// Top navigation bar.
    pub nav: Vec<NavEntry>,
    /// Sidebar tree.
    pub sidebar: Vec<NavEntry>,
    /// Social links shown in the header.
    pub social_links: Vec<SocialLink>,
    /// Footer text.
    pub footer: Option<FooterConfig>,

    /// Resolved paths (set after loading).
    #[serde(skip)]
    pub paths: PathsConfig,
    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self::default_with_base(Path::new("."))
    }
}

/// Site metadata and build options.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// Site title.
    pub title: String,
    /// Site description.
    pub description: String,
    /// Deployment base path, must start and end with `/`.
    pub base: String,
    /// Skip the dead link check during build.
    pub ignore_dead_links: bool,
    /// Lowest and highest heading level recorded as page headers.
    pub outline: [u8; 2],
    /// Content directory, relative to the config file.
    src_dir: Option<String>,
    /// Build output directory, relative to the config file.
    out_dir: Option<String>,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            base: "/".to_owned(),
            ignore_dead_links: false,
            outline: [2, 3],
            src_dir: None,
            out_dir: None,
        }
    }
}

impl SiteConfig {
    /// The base path as a route.
    #[must_use]
    pub fn base_route(&self) -> RoutePath {
        RoutePath::normalize(&self.base)
    }
}

/// Preview server configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server host address.
    pub host: String,
    /// Server port.
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_owned(),
            port: 5173,
        }
    }
}

/// Social link shown in the site header.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct SocialLink {
    /// Icon name (e.g. "github").
    pub icon: String,
    /// Link URL.
    pub link: String,
}

/// Footer text.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default)]
pub struct FooterConfig {
    /// Footer message.
    pub message: Option<String>,
    /// Copyright line.
    pub copyright: Option<String>,
}

/// Resolved directories with absolute paths.
#[derive(Debug, Default)]
pub struct PathsConfig {
    /// Directory containing the markdown content units.
    pub src_dir: PathBuf,
    /// Directory receiving chunks and the manifest.
    pub out_dir: PathBuf,
}

impl PathsConfig {
    /// Directory holding the content-addressed chunks.
    #[must_use]
    pub fn assets_dir(&self) -> PathBuf {
        self.out_dir.join("assets")
    }

    /// Path of the route manifest.
    #[must_use]
    pub fn manifest_path(&self) -> PathBuf {
        self.out_dir.join("manifest.json")
    }
}

/// Configuration loading error.
#[derive(Debug, thiserror::Error)]
pub enum SettingsError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.base`").
        field: String,
        /// Error message (e.g., "${`DEPLOY_BASE`} not set").
        message: String,
    },
}

/// Require a string field to be non-empty.
fn require_non_empty(value: &str, field: &str) -> Result<(), SettingsError> {
    if value.is_empty() {
        return Err(SettingsError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

impl Config {
    /// Load configuration from file with optional CLI settings.
    ///
    /// If `config_path` is provided, loads from that file.
    /// Otherwise, searches for `quire.toml` in current directory and parents.
    ///
    /// CLI settings are applied after loading and path resolution, allowing CLI
    /// arguments to take precedence over config file values.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, parsing fails,
    /// or the result is invalid.
    pub fn load(
        config_path: Option<&Path>,
        cli_settings: Option<&CliSettings>,
    ) -> Result<Self, SettingsError> {
        let mut config = if let Some(path) = config_path {
            if !path.exists() {
                return Err(SettingsError::NotFound(path.to_path_buf()));
            }
            Self::load_from_file(path)?
        } else if let Some(discovered) = Self::discover_config() {
            Self::load_from_file(&discovered)?
        } else {
            Self::default_with_cwd()
        };

        if let Some(settings) = cli_settings {
            config.apply_cli_settings(settings);
            config.validate()?;
        }

        Ok(config)
    }

    /// Parse configuration from TOML text, resolving paths against `base_dir`.
    ///
    /// # Errors
    ///
    /// Returns error if parsing, expansion or validation fails.
    pub fn from_toml_str(content: &str, base_dir: &Path) -> Result<Self, SettingsError> {
        let mut config: Self = toml::from_str(content)?;
        config.expand_env_vars()?;
        config.resolve_paths(base_dir);
        config.validate()?;
        Ok(config)
    }

    /// Apply CLI settings to the configuration.
    fn apply_cli_settings(&mut self, settings: &CliSettings) {
        if let Some(host) = &settings.host {
            self.server.host.clone_from(host);
        }
        if let Some(port) = settings.port {
            self.server.port = port;
        }
        if let Some(src_dir) = &settings.src_dir {
            self.paths.src_dir.clone_from(src_dir);
        }
        if let Some(out_dir) = &settings.out_dir {
            self.paths.out_dir.clone_from(out_dir);
        }
        if let Some(base) = &settings.base {
            self.site.base.clone_from(base);
        }
    }

    /// Search for config file in current directory and parents.
    fn discover_config() -> Option<PathBuf> {
        let mut current = std::env::current_dir().ok()?;
        loop {
            let candidate = current.join(CONFIG_FILENAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                return None;
            }
        }
    }

    /// Create default config with paths relative to current working directory.
    fn default_with_cwd() -> Self {
        let cwd = std::env::current_dir().unwrap_or_default();
        Self::default_with_base(&cwd)
    }

    /// Create default config with paths relative to given base directory.
    fn default_with_base(base: &Path) -> Self {
        Self {
            site: SiteConfig::default(),
            server: ServerConfig::default(),
            nav: Vec::new(),
            sidebar: Vec::new(),
            social_links: Vec::new(),
            footer: None,
            paths: PathsConfig {
                src_dir: base.join("src"),
                out_dir: base.join(".quire").join("dist"),
            },
            config_path: None,
        }
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, SettingsError> {
        let content = std::fs::read_to_string(path)?;
        let config_dir = path.parent().unwrap_or(Path::new("."));
        let mut config = Self::from_toml_str(&content, config_dir)?;
        config.config_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Returns `SettingsError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), SettingsError> {
        self.validate_server()?;
        self.validate_site()?;
        Ok(())
    }

    /// Validate server configuration.
    fn validate_server(&self) -> Result<(), SettingsError> {
        require_non_empty(&self.server.host, "server.host")?;

        if self.server.port == 0 {
            return Err(SettingsError::Validation(
                "server.port cannot be 0".to_owned(),
            ));
        }

        Ok(())
    }

    /// Validate site configuration.
    fn validate_site(&self) -> Result<(), SettingsError> {
        let base = &self.site.base;
        if !base.starts_with('/') || !base.ends_with('/') {
            return Err(SettingsError::Validation(format!(
                "site.base must start and end with '/', got {base:?}"
            )));
        }

        let [low, high] = self.site.outline;
        if !(1..=6).contains(&low) || !(1..=6).contains(&high) || low > high {
            return Err(SettingsError::Validation(format!(
                "site.outline must be two heading levels between 1 and 6 in order, got [{low}, {high}]"
            )));
        }

        Ok(())
    }

    /// Expand environment variable references in configuration strings.
    fn expand_env_vars(&mut self) -> Result<(), SettingsError> {
        self.site.base = expand::expand_env(&self.site.base, "site.base")?;
        self.server.host = expand::expand_env(&self.server.host, "server.host")?;
        Ok(())
    }

    /// Resolve relative paths to absolute paths based on config directory.
    fn resolve_paths(&mut self, config_dir: &Path) {
        let resolve = |path: Option<&str>, default: &str| config_dir.join(path.unwrap_or(default));

        self.paths = PathsConfig {
            src_dir: resolve(self.site.src_dir.as_deref(), "src"),
            out_dir: resolve(self.site.out_dir.as_deref(), ".quire/dist"),
        };
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const SITE_TOML: &str = r#"
[site]
title = "React Router7 中文文档"
description = "React Router v7 中文文档"
base = "/react-router7-doc/"
src_dir = "src"
ignore_dead_links = true

[[nav]]
text = "指南"
link = "/home"
active_match = "/(home|framework|library)/"

[[nav]]
text = "API"
link = "https://api.reactrouter.com/v7/"

[[sidebar]]
text = "指南"
collapsed = false

[[sidebar.items]]
text = "安装"
link = "/framework/installation"

[[sidebar.items]]
text = "路由"
link = "/framework/routing"

[[social_links]]
icon = "github"
link = "https://github.com/gongph/react-router7-doc"

[footer]
message = "Released under the MIT License."
"#;

    #[test]
    fn test_default_config() {
        let config = Config::default_with_base(Path::new("/test"));
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 5173);
        assert_eq!(config.site.base, "/");
        assert_eq!(config.site.outline, [2, 3]);
        assert!(!config.site.ignore_dead_links);
        assert_eq!(config.paths.src_dir, PathBuf::from("/test/src"));
        assert_eq!(config.paths.out_dir, PathBuf::from("/test/.quire/dist"));
        assert_eq!(
            config.paths.assets_dir(),
            PathBuf::from("/test/.quire/dist/assets")
        );
        assert_eq!(
            config.paths.manifest_path(),
            PathBuf::from("/test/.quire/dist/manifest.json")
        );
    }

    #[test]
    fn test_parse_minimal_config() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.server.port, 5173);
        assert!(config.nav.is_empty());
        assert!(config.sidebar.is_empty());
    }

    #[test]
    fn test_parse_full_site_config() {
        let config = Config::from_toml_str(SITE_TOML, Path::new("/project")).unwrap();

        assert_eq!(config.site.title, "React Router7 中文文档");
        assert_eq!(config.site.base_route().as_str(), "/react-router7-doc");
        assert!(config.site.ignore_dead_links);
        assert_eq!(config.nav.len(), 2);
        assert!(config.nav[0].active_match().is_some());
        assert!(config.nav[1].target().unwrap().is_external());
        assert_eq!(config.sidebar[0].children().len(), 2);
        assert_eq!(
            config.social_links,
            vec![SocialLink {
                icon: "github".to_owned(),
                link: "https://github.com/gongph/react-router7-doc".to_owned(),
            }]
        );
        assert_eq!(
            config.footer.unwrap().message.as_deref(),
            Some("Released under the MIT License.")
        );
    }

    #[test]
    fn test_resolve_paths() {
        let toml = r#"
[site]
src_dir = "content"
out_dir = "public"
"#;
        let config = Config::from_toml_str(toml, Path::new("/project")).unwrap();
        assert_eq!(config.paths.src_dir, PathBuf::from("/project/content"));
        assert_eq!(config.paths.out_dir, PathBuf::from("/project/public"));
    }

    #[test]
    fn test_invalid_nav_pattern_is_parse_error() {
        let toml = r#"
[[nav]]
text = "Bad"
link = "/x"
active_match = "(unclosed"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, SettingsError::Parse(_)), "got {err:?}");
    }

    #[test]
    fn test_validate_base_requires_slashes() {
        let toml = r#"
[site]
base = "/docs"
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(matches!(err, SettingsError::Validation(_)));
        assert!(err.to_string().contains("site.base"));
    }

    #[test]
    fn test_validate_outline_range() {
        let toml = r#"
[site]
outline = [3, 2]
"#;
        let err = Config::from_toml_str(toml, Path::new("/project")).unwrap_err();
        assert!(err.to_string().contains("site.outline"));

        let toml = r#"
[site]
outline = [0, 7]
"#;
        assert!(Config::from_toml_str(toml, Path::new("/project")).is_err());
    }

    #[test]
    fn test_validate_server_host_empty() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.host = String::new();
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.host"));
    }

    #[test]
    fn test_validate_server_port_zero() {
        let mut config = Config::default_with_base(Path::new("/test"));
        config.server.port = 0;
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("server.port"));
    }

    #[test]
    fn test_apply_cli_settings() {
        let mut config = Config::default_with_base(Path::new("/test"));
        let overrides = CliSettings {
            port: Some(8080),
            out_dir: Some(PathBuf::from("/tmp/out")),
            base: Some("/preview/".to_owned()),
            ..Default::default()
        };

        config.apply_cli_settings(&overrides);

        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.host, "127.0.0.1"); // Unchanged
        assert_eq!(config.paths.out_dir, PathBuf::from("/tmp/out"));
        assert_eq!(config.paths.src_dir, PathBuf::from("/test/src")); // Unchanged
        assert_eq!(config.site.base, "/preview/");
    }

    #[test]
    fn test_load_explicit_missing_file() {
        let err = Config::load(Some(Path::new("/nonexistent/quire.toml")), None).unwrap_err();
        assert!(matches!(err, SettingsError::NotFound(_)));
    }

    #[test]
    fn test_load_from_file_records_path() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, SITE_TOML).unwrap();

        let config = Config::load(Some(&path), None).unwrap();

        assert_eq!(config.config_path.as_deref(), Some(path.as_path()));
        assert_eq!(config.paths.src_dir, temp.path().join("src"));
    }

    #[test]
    fn test_load_rejects_invalid_cli_base() {
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join(CONFIG_FILENAME);
        std::fs::write(&path, "").unwrap();

        let overrides = CliSettings {
            base: Some("no-slashes".to_owned()),
            ..Default::default()
        };
        let err = Config::load(Some(&path), Some(&overrides)).unwrap_err();
        assert!(matches!(err, SettingsError::Validation(_)));
    }
}
