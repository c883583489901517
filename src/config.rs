use crate::error::{Error, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_DIALOGUE_KEY: &str = "Section_Dialogue";

#[derive(Deserialize, Debug, Clone, PartialEq)]
pub struct Config {
    /// JSON array of quest objects from the wiki extraction step.
    pub input_path: PathBuf,
    /// Where the quests decorated with `Structured_Dialogue` are written.
    pub output_path: PathBuf,
    /// Optional flattened one-row-per-segment export.
    #[serde(default)]
    pub rows_output_path: Option<PathBuf>,
    #[serde(default = "default_dialogue_key")]
    pub dialogue_key: String,
    #[serde(default = "default_pretty")]
    pub pretty: bool,
}

fn default_dialogue_key() -> String {
    DEFAULT_DIALOGUE_KEY.to_string()
}

fn default_pretty() -> bool {
    true
}

impl Config {
    pub fn new(input_path: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Config {
            input_path: input_path.into(),
            output_path: output_path.into(),
            rows_output_path: None,
            dialogue_key: default_dialogue_key(),
            pretty: default_pretty(),
        }
    }

    pub fn from_toml_str(contents: &str) -> Result<Self> {
        let config: Config = toml::from_str(contents)?;
        if config.dialogue_key.trim().is_empty() {
            return Err(Error::Config("dialogue_key must not be empty".to_string()));
        }
        Ok(config)
    }
}

pub fn load_config_from_file(file_path: &Path) -> Result<Config> {
    let contents = fs::read_to_string(file_path).map_err(|e| {
        Error::Config(format!(
            "failed to read {}: {}. Please ensure it exists.",
            file_path.display(),
            e
        ))
    })?;
    Config::from_toml_str(&contents)
}
