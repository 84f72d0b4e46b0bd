use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const DEFAULT_CONFIG_NAME: &str = "tagscrape.config.json";

/// Tagscrape configuration file format
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Schema used when none is given on the command line
    #[serde(default = "default_schema")]
    pub schema: String,

    /// Pretty print decoded JSON
    #[serde(default)]
    pub pretty: bool,
}

fn default_schema() -> String {
    "schema.json".to_string()
}

impl Config {
    /// Load config from a directory
    pub fn load(cwd: &str) -> anyhow::Result<Self> {
        let config_path = PathBuf::from(cwd).join(DEFAULT_CONFIG_NAME);

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    /// Get absolute path to the schema file
    pub fn get_schema_path(&self, cwd: &str) -> PathBuf {
        PathBuf::from(cwd).join(&self.schema)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            schema: default_schema(),
            pretty: false,
        }
    }
}
