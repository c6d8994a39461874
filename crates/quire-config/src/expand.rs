//! Environment variable expansion for configuration strings.
//!
//! Supports:
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default

use crate::SettingsError;

/// Expand environment variable references in a string.
///
/// Returns the original string unchanged if no `${}` patterns are present.
/// Bare `$VAR` syntax is not expanded (only `${VAR}` with braces).
pub(crate) fn expand_env(value: &str, field: &str) -> Result<String, SettingsError> {
    if !value.contains("${") {
        return Ok(value.to_owned());
    }

    shellexpand::env_with_context(value, |var| -> Result<Option<String>, UnsetVar> {
        std::env::var(var).map(Some).map_err(|_| UnsetVar {
            name: var.to_owned(),
        })
    })
    .map(std::borrow::Cow::into_owned)
    .map_err(|e| SettingsError::EnvVar {
        field: field.to_owned(),
        message: format!("${{{}}} not set", e.cause.name),
    })
}

/// A referenced variable that is not set.
struct UnsetVar {
    name: String,
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use pretty_assertions::assert_eq;

    use super::*;
    use crate::{CliSettings, Config};

    // SAFETY (all `set_var`/`remove_var` below): each test owns its
    // variable names, no other test reads them.

    #[test]
    fn test_site_base_from_env() {
        unsafe {
            std::env::set_var("QUIRE_DEPLOY_REPO", "react-router7-doc");
        }
        let config = Config::from_toml_str(
            "[site]\nbase = \"/${QUIRE_DEPLOY_REPO}/\"\n",
            Path::new("/site"),
        )
        .unwrap();
        unsafe {
            std::env::remove_var("QUIRE_DEPLOY_REPO");
        }

        assert_eq!(config.site.base, "/react-router7-doc/");
        assert_eq!(config.site.base_route().as_str(), "/react-router7-doc");
    }

    #[test]
    fn test_server_host_default_when_unset() {
        unsafe {
            std::env::remove_var("QUIRE_PREVIEW_HOST");
        }
        let config = Config::from_toml_str(
            "[server]\nhost = \"${QUIRE_PREVIEW_HOST:-0.0.0.0}\"\n",
            Path::new("/site"),
        )
        .unwrap();
        assert_eq!(config.server.host, "0.0.0.0");
    }

    #[test]
    fn test_unset_server_host_names_field() {
        unsafe {
            std::env::remove_var("QUIRE_MISSING_HOST");
        }
        let err = Config::from_toml_str(
            "[server]\nhost = \"${QUIRE_MISSING_HOST}\"\n",
            Path::new("/site"),
        )
        .unwrap_err();

        let SettingsError::EnvVar { field, message } = err else {
            panic!("expected EnvVar error, got {err:?}");
        };
        assert_eq!(field, "server.host");
        assert_eq!(message, "${QUIRE_MISSING_HOST} not set");
    }

    #[test]
    fn test_expanded_base_is_validated() {
        unsafe {
            std::env::set_var("QUIRE_BAD_BASE", "docs");
        }
        let err = Config::from_toml_str(
            "[site]\nbase = \"${QUIRE_BAD_BASE}\"\n",
            Path::new("/site"),
        )
        .unwrap_err();
        unsafe {
            std::env::remove_var("QUIRE_BAD_BASE");
        }
        assert!(matches!(err, SettingsError::Validation(_)));
    }

    #[test]
    fn test_cli_base_replaces_expanded_base_verbatim() {
        unsafe {
            std::env::set_var("QUIRE_CONFIG_REPO", "from-config");
        }
        let temp = tempfile::tempdir().unwrap();
        let path = temp.path().join("quire.toml");
        std::fs::write(&path, "[site]\nbase = \"/${QUIRE_CONFIG_REPO}/\"\n").unwrap();

        let overrides = CliSettings {
            base: Some("/${QUIRE_CONFIG_REPO}-preview/".to_owned()),
            ..Default::default()
        };
        let config = Config::load(Some(&path), Some(&overrides)).unwrap();
        unsafe {
            std::env::remove_var("QUIRE_CONFIG_REPO");
        }

        // Command-line values are taken as given, only the file is expanded
        assert_eq!(config.site.base, "/${QUIRE_CONFIG_REPO}-preview/");
    }

    #[test]
    fn test_bare_dollar_in_base_kept() {
        assert_eq!(expand_env("/$docs/", "site.base").unwrap(), "/$docs/");
    }
}
