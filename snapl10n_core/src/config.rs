/*============================================================
  Synavera Project: Snap-L10n
  Module: snapl10n_core::config
  Etiquette: Synavera Script Etiquette — Rust Profile v1.1.1
  ------------------------------------------------------------
  Purpose:
    Load operator configuration for Snap-L10n: the snapd socket,
    the snap mount root, locale probe locations, and output
    paths.

  Security / Safety Notes:
    Locale probe locations are validated to stay relative to the
    snap mount root; absolute paths and `..` are refused.

  Dependencies:
    toml and serde for parsing, dirs for XDG base directories.

  Operational Scope:
    Read once at startup by the binary entry point.

  Revision History:
    2026-10-18 COD  Authored configuration loader.
  ------------------------------------------------------------
  SSE Principles Observed:
    - Explicit defaults for every field
    - Missing default file is not an error; missing explicit
      file is
    - Validation before use
============================================================*/

use std::path::{Component, Path, PathBuf};

use serde::Deserialize;

use crate::error::{Result, SnapL10nError};

const APP_DIR: &str = "snap-l10n";

/// Root configuration document.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapL10nConfig {
    pub snapd: SnapdConfig,
    pub inspect: InspectConfig,
    pub paths: PathsConfig,
}

/// Connection settings for the snapd REST API.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SnapdConfig {
    pub socket_path: PathBuf,
    pub endpoint: String,
}

impl Default for SnapdConfig {
    fn default() -> Self {
        Self {
            socket_path: PathBuf::from("/run/snapd.socket"),
            endpoint: "/v2/snaps".to_string(),
        }
    }
}

/// Filesystem probe settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InspectConfig {
    pub snap_root: PathBuf,
    /// Locale tree candidates, relative to `<snap_root>/<name>/current`.
    pub locale_dirs: Vec<PathBuf>,
}

impl Default for InspectConfig {
    fn default() -> Self {
        Self {
            snap_root: PathBuf::from("/snap"),
            locale_dirs: vec![
                PathBuf::from("usr/share/locale"),
                PathBuf::from("share/locale"),
                PathBuf::from("usr/local/share/locale"),
            ],
        }
    }
}

/// Output locations; unset fields fall back to XDG directories.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PathsConfig {
    pub report_path: Option<PathBuf>,
    pub log_dir: Option<PathBuf>,
}

impl SnapL10nConfig {
    /// Load from an explicit path, or from the default location if present.
    pub fn load_from_optional_path(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(explicit) => {
                if !explicit.exists() {
                    return Err(SnapL10nError::Config(format!(
                        "Configuration file {} does not exist",
                        explicit.display()
                    )));
                }
                Self::load_from_path(explicit)?
            }
            None => match default_config_path() {
                Some(default) if default.exists() => Self::load_from_path(&default)?,
                _ => Self::default(),
            },
        };
        config.validate()?;
        Ok(config)
    }

    fn load_from_path(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|err| {
            SnapL10nError::Config(format!(
                "Failed to read configuration {}: {err}",
                path.display()
            ))
        })?;
        Self::from_toml_str(&raw).map_err(|err| match err {
            SnapL10nError::Config(message) => {
                SnapL10nError::Config(format!("{}: {message}", path.display()))
            }
            other => other,
        })
    }

    /// Parse a TOML document.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        toml::from_str(raw)
            .map_err(|err| SnapL10nError::Config(format!("Invalid configuration: {err}")))
    }

    /// Reject settings that would make probing or the socket request unsafe.
    pub fn validate(&self) -> Result<()> {
        if self.snapd.socket_path.as_os_str().is_empty() {
            return Err(SnapL10nError::Config("snapd.socket_path is empty".into()));
        }
        if !self.snapd.endpoint.starts_with('/') {
            return Err(SnapL10nError::Config(format!(
                "snapd.endpoint `{}` must start with `/`",
                self.snapd.endpoint
            )));
        }
        for dir in &self.inspect.locale_dirs {
            let escapes = dir
                .components()
                .any(|component| !matches!(component, Component::Normal(_) | Component::CurDir));
            if dir.as_os_str().is_empty() || escapes {
                return Err(SnapL10nError::Config(format!(
                    "inspect.locale_dirs entry {} must be a relative path without `..`",
                    dir.display()
                )));
            }
        }
        Ok(())
    }

    pub fn report_path(&self) -> PathBuf {
        self.paths.report_path.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("report.json")
        })
    }

    pub fn log_dir(&self) -> PathBuf {
        self.paths.log_dir.clone().unwrap_or_else(|| {
            dirs::state_dir()
                .or_else(dirs::cache_dir)
                .unwrap_or_else(std::env::temp_dir)
                .join(APP_DIR)
                .join("logs")
        })
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR).join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = SnapL10nConfig::from_toml_str("").unwrap();
        assert_eq!(config.snapd.socket_path, PathBuf::from("/run/snapd.socket"));
        assert_eq!(config.snapd.endpoint, "/v2/snaps");
        assert_eq!(config.inspect.snap_root, PathBuf::from("/snap"));
        assert_eq!(config.inspect.locale_dirs.len(), 3);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn sections_override_defaults() {
        let config = SnapL10nConfig::from_toml_str(
            r#"
            [snapd]
            socket_path = "/tmp/fake.socket"

            [inspect]
            snap_root = "/var/lib/snapd/snap"
            locale_dirs = ["usr/share/locale"]

            [paths]
            report_path = "/tmp/report.json"
            "#,
        )
        .unwrap();
        assert_eq!(config.snapd.socket_path, PathBuf::from("/tmp/fake.socket"));
        assert_eq!(config.snapd.endpoint, "/v2/snaps");
        assert_eq!(config.inspect.snap_root, PathBuf::from("/var/lib/snapd/snap"));
        assert_eq!(config.inspect.locale_dirs, vec![PathBuf::from("usr/share/locale")]);
        assert_eq!(config.report_path(), PathBuf::from("/tmp/report.json"));
    }

    #[test]
    fn escaping_locale_dirs_are_rejected() {
        for bad in ["../locale", "/usr/share/locale", "usr/../../etc"] {
            let raw = format!("[inspect]\nlocale_dirs = [\"{bad}\"]\n");
            let config = SnapL10nConfig::from_toml_str(&raw).unwrap();
            assert!(config.validate().is_err(), "{bad} should be rejected");
        }
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let err = SnapL10nConfig::from_toml_str("[snapd]\nsokcet = \"x\"\n").unwrap_err();
        assert!(matches!(err, SnapL10nError::Config(_)));
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let err = SnapL10nConfig::load_from_optional_path(Some(&dir.path().join("nope.toml")))
            .unwrap_err();
        assert!(matches!(err, SnapL10nError::Config(_)));
    }
}
