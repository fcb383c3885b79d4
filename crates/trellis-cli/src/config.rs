//! Application configuration.
//!
//! [`AppConfig`] is loaded once at startup and passed down by value. The
//! core crate never sees it; commands translate it into request fields.
//!
//! # Resolution order (lowest priority first)
//!
//! 1. Built-in defaults
//! 2. `--config FILE` if given, otherwise the platform config file and then
//!    `.trellis.toml` in the current directory (both optional)
//! 3. `TRELLIS__<SECTION>__<KEY>` environment variables
//! 4. CLI flags (applied by the commands)

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Name of the per-directory configuration file.
pub const LOCAL_CONFIG_FILE: &str = ".trellis.toml";

const ENV_PREFIX: &str = "TRELLIS";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub defaults: Defaults,
    pub output: OutputConfig,
    pub blueprints: BlueprintsConfig,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Defaults {
    /// Blueprint used by `trellis new` without `--blueprint` or `--from`.
    pub blueprint: String,
    /// Offered as the `autoInstall` answer when the user gives none.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub package_manager: Option<String>,
    pub skip_install: bool,
}

impl Default for Defaults {
    fn default() -> Self {
        Self {
            blueprint: "vue-starter".into(),
            package_manager: None,
            skip_install: false,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub no_color: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BlueprintsConfig {
    /// Extra directory of on-disk blueprints, searched before the others.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub local_path: Option<PathBuf>,
}

impl AppConfig {
    /// Merge every source and deserialize.
    ///
    /// An explicit `config_file` must exist; the implicit locations may not.
    pub fn load(config_file: Option<&PathBuf>) -> anyhow::Result<Self> {
        let mut builder = Config::builder().add_source(
            Config::try_from(&Self::default()).context("Failed to build default configuration")?,
        );

        match config_file {
            Some(path) => {
                debug!(path = %path.display(), "Using explicit config file");
                builder = builder.add_source(toml_file(path, true));
            }
            None => {
                builder = builder
                    .add_source(toml_file(&Self::config_path(), false))
                    .add_source(toml_file(Path::new(LOCAL_CONFIG_FILE), false));
            }
        }

        builder
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("__")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .context("Failed to read configuration")?
            .try_deserialize()
            .context("Invalid configuration")
    }

    /// Path to the user configuration file.
    ///
    /// Falls back to `.trellis.toml` when the platform has no config
    /// directory.
    pub fn config_path() -> PathBuf {
        directories::ProjectDirs::from("com", "trellis", "trellis")
            .map(|d| d.config_dir().join("config.toml"))
            .unwrap_or_else(|| PathBuf::from(LOCAL_CONFIG_FILE))
    }

    /// Pretty TOML, as written by `trellis init`.
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }
}

fn toml_file(path: &Path, required: bool) -> File<config::FileSourceFile, FileFormat> {
    File::from(path).format(FileFormat::Toml).required(required)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.defaults.blueprint, "vue-starter");
        assert_eq!(cfg.defaults.package_manager, None);
        assert!(!cfg.defaults.skip_install);
        assert!(!cfg.output.no_color);
        assert_eq!(cfg.blueprints.local_path, None);
    }

    #[test]
    fn explicit_file_overrides_defaults() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(
            &path,
            "[defaults]\npackage_manager = \"yarn\"\nskip_install = true\n",
        )
        .unwrap();

        let cfg = AppConfig::load(Some(&path)).unwrap();
        assert_eq!(cfg.defaults.package_manager.as_deref(), Some("yarn"));
        assert!(cfg.defaults.skip_install);
        assert_eq!(cfg.defaults.blueprint, "vue-starter");
    }

    #[test]
    fn missing_explicit_file_is_an_error() {
        let missing = PathBuf::from("/definitely/not/here/trellis.toml");
        assert!(AppConfig::load(Some(&missing)).is_err());
    }

    #[test]
    fn serialised_defaults_load_back() {
        let tmp = tempfile::TempDir::new().unwrap();
        let path = tmp.path().join("config.toml");
        std::fs::write(&path, AppConfig::default().to_toml().unwrap()).unwrap();
        assert_eq!(AppConfig::load(Some(&path)).unwrap(), AppConfig::default());
    }

    #[test]
    fn config_path_is_not_empty() {
        assert!(!AppConfig::config_path().as_os_str().is_empty());
    }
}
