//! Persistent defaults for collection runs

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::collection::OutputFormat;

/// Saved defaults applied when the caller does not override them
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Default collection name for file-based runs
    pub collection_name: String,
    /// Directory output files are placed in
    pub output_dir: PathBuf,
    /// Default output encoding
    pub output_format: OutputFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            collection_name: "collection".to_string(),
            output_dir: PathBuf::from("."),
            output_format: OutputFormat::default(),
        }
    }
}

impl Config {
    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("osu-collect").join("config.json"))
    }

    /// Load config from disk, falling back to defaults if not found
    pub fn load() -> Self {
        Self::config_path()
            .and_then(|path| std::fs::read_to_string(path).ok())
            .and_then(|content| serde_json::from_str(&content).ok())
            .unwrap_or_default()
    }

    /// Save config to disk
    pub fn save(&self) -> std::io::Result<()> {
        if let Some(path) = Self::config_path() {
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            let content = serde_json::to_string_pretty(self)
                .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;
            std::fs::write(&path, content)?;
        }
        Ok(())
    }

    /// Default output path for a collection `name` in `format`
    pub fn output_path(&self, name: &str, format: OutputFormat) -> PathBuf {
        self.output_dir.join(format!("{}.{}", name, format.extension()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();
        assert_eq!(config.collection_name, "collection");
        assert_eq!(config.output_dir, PathBuf::from("."));
        assert_eq!(config.output_format, OutputFormat::CollectionDb);
    }

    #[test]
    fn serde_round_trip() {
        let config = Config {
            collection_name: "tech maps".to_string(),
            output_dir: PathBuf::from("/tmp/collections"),
            output_format: OutputFormat::Text,
        };
        let json = serde_json::to_string(&config).unwrap();
        let back: Config = serde_json::from_str(&json).unwrap();
        assert_eq!(back.collection_name, "tech maps");
        assert_eq!(back.output_dir, PathBuf::from("/tmp/collections"));
        assert_eq!(back.output_format, OutputFormat::Text);
    }

    #[test]
    fn output_path_uses_format_extension() {
        let config = Config::default();
        assert_eq!(
            config.output_path("12345", OutputFormat::CollectionDb),
            PathBuf::from("./12345.db")
        );
        assert_eq!(
            config.output_path("maps", OutputFormat::Text),
            PathBuf::from("./maps.txt")
        );
    }
}
