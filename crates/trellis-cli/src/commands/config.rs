//! `trellis config`: inspect configuration values.

use serde_json::Value;

use crate::{
    cli::ConfigCommands,
    config::AppConfig,
    error::{CliError, CliResult, IntoCli},
    output::OutputManager,
};

pub fn execute(cmd: ConfigCommands, config: AppConfig, output: OutputManager) -> CliResult<()> {
    match cmd {
        ConfigCommands::Get { key } => {
            output.data(&get_config_value(&config, &key)?)?;
        }
        ConfigCommands::List => {
            let serialised = config
                .to_toml()
                .with_cli_context(|| "Failed to serialise config")?;
            output.data(serialised.trim_end())?;
        }
        ConfigCommands::Path => {
            output.data(&AppConfig::config_path().display().to_string())?;
        }
    }
    Ok(())
}

/// Look up a dotted key such as `defaults.package_manager`.
///
/// Unset optional keys print as an empty string.
fn get_config_value(config: &AppConfig, key: &str) -> CliResult<String> {
    let unknown = || CliError::ConfigError {
        message: format!("Unknown config key: '{key}'"),
        source: None,
    };
    let tree = serde_json::to_value(config).map_err(|e| CliError::ConfigError {
        message: "Failed to serialise config".into(),
        source: Some(Box::new(e)),
    })?;

    let (section, field) = key.split_once('.').ok_or_else(unknown)?;
    let table = tree.get(section).ok_or_else(unknown)?;
    match table.get(field) {
        Some(Value::String(s)) => Ok(s.clone()),
        Some(Value::Null) => Ok(String::new()),
        None if is_optional(section, field) => Ok(String::new()),
        Some(Value::Object(_)) | None => Err(unknown()),
        Some(other) => Ok(other.to_string()),
    }
}

/// Keys that are omitted from the serialised form when unset.
fn is_optional(section: &str, field: &str) -> bool {
    matches!(
        (section, field),
        ("defaults", "package_manager") | ("blueprints", "local_path")
    )
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    #[test]
    fn get_default_blueprint() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.blueprint").unwrap(), "vue-starter");
    }

    #[test]
    fn get_boolean_key() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "output.no_color").unwrap(), "false");
        assert_eq!(get_config_value(&cfg, "defaults.skip_install").unwrap(), "false");
    }

    #[test]
    fn unset_optional_key_is_empty() {
        let cfg = AppConfig::default();
        assert_eq!(get_config_value(&cfg, "defaults.package_manager").unwrap(), "");
        assert_eq!(get_config_value(&cfg, "blueprints.local_path").unwrap(), "");
    }

    #[test]
    fn set_optional_key_is_printed() {
        let mut cfg = AppConfig::default();
        cfg.blueprints.local_path = Some(PathBuf::from("/srv/blueprints"));
        assert_eq!(get_config_value(&cfg, "blueprints.local_path").unwrap(), "/srv/blueprints");
    }

    #[test]
    fn unknown_keys_are_config_errors() {
        let cfg = AppConfig::default();
        for key in ["does.not.exist", "defaults", "defaults.nope", "output"] {
            assert!(
                matches!(get_config_value(&cfg, key), Err(CliError::ConfigError { .. })),
                "{key}"
            );
        }
    }
}
