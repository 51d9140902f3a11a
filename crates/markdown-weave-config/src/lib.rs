use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },
}

/// User settings for the `markdown-weave` tools.
///
/// Every field has a default, so an empty file (or no file) is valid.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Let `<script>` tags through when the page also allows them.
    pub allow_script_tags: bool,
    /// Keep unchanged content in diff output instead of only the changes.
    pub keep_unchanged: bool,
    /// Emoji shorthand (`:smile:`, `:)`) to emoji id.
    pub emoji: BTreeMap<String, String>,
    /// Extra TOML file of shorthand/id pairs, merged under `emoji`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub emoji_file: Option<PathBuf>,
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let mut config: Config = read_toml(config_path)?;

        // Expand shell variables and tilde in the loaded emoji path
        config.emoji_file = config
            .emoji_file
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/markdown-weave");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The emoji table with `emoji_file` merged in. Entries written directly
    /// in the config win over the file.
    pub fn emoji_table(&self) -> Result<BTreeMap<String, String>, ConfigError> {
        let mut table = match &self.emoji_file {
            Some(path) => read_toml(path)?,
            None => BTreeMap::new(),
        };
        table.extend(self.emoji.iter().map(|(k, v)| (k.clone(), v.clone())));
        Ok(table)
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}

fn read_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ConfigReadError {
        config_path: path.to_path_buf(),
        source,
    })?;
    toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
        config_path: path.to_path_buf(),
        source,
    })
}
