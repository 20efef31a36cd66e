//! Global hausdir configuration.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File};
use serde::Deserialize;

use super::Modifier;
use crate::error::{HausdirError, HausdirResult};

static DEFAULT_TASK_DIR: &str = "~/tasks";
static DEFAULT_DATASET_PATH: &str = "~/tasks/stammdaten.json";
static DEFAULT_AREA_FIELD: &str = "bereich";

fn default_task_dir() -> PathBuf {
    PathBuf::from(DEFAULT_TASK_DIR)
}

fn default_dataset_path() -> PathBuf {
    PathBuf::from(DEFAULT_DATASET_PATH)
}

fn default_area_field() -> String {
    DEFAULT_AREA_FIELD.to_string()
}

/// Global configuration at ~/.config/hausdir/config.toml
///
/// Every value can be overridden from the environment with the `HAUSDIR_`
/// prefix, nested tables separated by `__` (e.g. `HAUSDIR_MODIFIER__HINT_SEPARATOR`).
#[derive(Debug, Deserialize, Clone)]
pub struct HausdirConfig {
    #[serde(default = "default_task_dir")]
    pub task_dir: PathBuf,

    #[serde(default = "default_dataset_path")]
    pub dataset: PathBuf,

    /// Summary field holding the free-text area label
    #[serde(default = "default_area_field")]
    pub area_field: String,

    #[serde(default)]
    pub modifier: Modifier,
}

impl Default for HausdirConfig {
    fn default() -> Self {
        HausdirConfig {
            task_dir: default_task_dir(),
            dataset: default_dataset_path(),
            area_field: default_area_field(),
            modifier: Modifier::default(),
        }
    }
}

impl HausdirConfig {
    pub fn config_path() -> HausdirResult<PathBuf> {
        let config_dir = dirs::config_dir()
            .ok_or_else(|| HausdirError::Config("Could not determine config directory".into()))?
            .join("hausdir");

        Ok(config_dir.join("config.toml"))
    }

    /// Load the global config, writing a commented default file on first use.
    pub fn load() -> HausdirResult<Self> {
        let config_path = Self::config_path()?;

        if !config_path.exists() {
            Self::create_default_config(&config_path)?;
        }

        Self::load_from(&config_path)
    }

    /// Load config from an explicit file. The modifier is validated here once
    /// so task operations never have to re-check it.
    pub fn load_from(path: &Path) -> HausdirResult<Self> {
        let config: HausdirConfig = Config::builder()
            .add_source(File::from(path.to_path_buf()).required(false))
            .add_source(
                Environment::with_prefix("HAUSDIR")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(|e| HausdirError::Config(e.to_string()))?
            .try_deserialize()
            .map_err(|e| HausdirError::Config(e.to_string()))?;

        config.modifier.validate()?;

        Ok(config)
    }

    pub fn task_path(&self) -> PathBuf {
        expand(&self.task_dir)
    }

    pub fn dataset_path(&self) -> PathBuf {
        expand(&self.dataset)
    }

    /// Create a default config file with all options commented out.
    pub fn create_default_config(path: &Path) -> HausdirResult<()> {
        let contents = format!(
            "\
# hausdir configuration

# Directory holding one .ics file per task:
# task_dir = \"{DEFAULT_TASK_DIR}\"

# Buildings, units and tenants (.json or .toml):
# dataset = \"{DEFAULT_DATASET_PATH}\"

# Summary field that names the unit a task belongs to:
# area_field = \"{DEFAULT_AREA_FIELD}\"

# [modifier]
# description_delimiter = \"\\n\"
# hint_separator = \"##\"
# summary_delimiter = \"//\"
# summary_fields = [\"bereich\", \"titel\"]
#
# [modifier.symbols]
# open_locked = \".*\"
# done_locked = \".✓\"
# open = \"*\"
# done = \"✓\"
"
        );

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| {
                HausdirError::Config(format!("Could not create config directory: {e}"))
            })?;
        }

        std::fs::write(path, contents)
            .map_err(|e| HausdirError::Config(format!("Could not write config file: {e}")))?;

        Ok(())
    }
}

fn expand(path: &Path) -> PathBuf {
    PathBuf::from(shellexpand::tilde(&path.to_string_lossy()).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = HausdirConfig::load_from(&dir.path().join("nope.toml")).unwrap();

        assert_eq!(config.task_dir, PathBuf::from("~/tasks"));
        assert_eq!(config.area_field, "bereich");
        assert_eq!(config.modifier, Modifier::default());
    }

    #[test]
    fn test_load_modifier_table() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
task_dir = "/srv/tasks"

[modifier]
hint_separator = "::"
summary_fields = ["bereich", "titel"]

[modifier.symbols]
done = "[x]"
"#,
        )
        .unwrap();

        let config = HausdirConfig::load_from(&path).unwrap();

        assert_eq!(config.task_path(), PathBuf::from("/srv/tasks"));
        assert_eq!(config.modifier.hint_separator, "::");
        assert_eq!(config.modifier.summary_fields, vec!["bereich", "titel"]);
        assert_eq!(config.modifier.symbols.done, "[x]");
        // Untouched keys keep their defaults
        assert_eq!(config.modifier.symbols.open, "*");
        assert_eq!(config.modifier.summary_delimiter, "//");
    }

    #[test]
    fn test_invalid_modifier_is_rejected_at_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.toml");
        std::fs::write(&path, "[modifier.symbols]\nopen = \"✓\"\n").unwrap();

        let err = HausdirConfig::load_from(&path).unwrap_err();
        assert!(matches!(err, HausdirError::Config(_)), "got {err:?}");
    }

    #[test]
    fn test_create_default_config_parses_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/config.toml");

        HausdirConfig::create_default_config(&path).unwrap();
        let config = HausdirConfig::load_from(&path).unwrap();

        assert_eq!(config.dataset, PathBuf::from("~/tasks/stammdaten.json"));
    }
}
