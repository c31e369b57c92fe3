//! Configuration for the envelope tooling
//!
//! The codec itself takes no configuration; this is read by the CLI.
//! Sources, later ones overriding earlier ones:
//! - Default values
//! - Config file (envelope.toml)
//! - Environment variables (ENVELOPE__*)
//!
//! ## Example config file (envelope.toml):
//! ```toml
//! [schemas]
//! dir = "./schemas"
//! extension = "avsc"
//! recursive = true
//!
//! [output]
//! format = "raw"
//! ```

use std::path::PathBuf;

use config_crate::{Config, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};

/// Main configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EnvelopeConfig {
    /// Where schema files live
    #[serde(default)]
    pub schemas: SchemaSourceConfig,

    /// How encoded envelopes are written
    #[serde(default)]
    pub output: OutputConfig,
}

/// Schema directory settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SchemaSourceConfig {
    /// Directory holding schema files
    #[serde(default = "default_schema_dir")]
    pub dir: PathBuf,

    /// File extension of schema files
    #[serde(default = "default_extension")]
    pub extension: String,

    /// Descend into subdirectories
    #[serde(default = "default_true")]
    pub recursive: bool,
}

/// Output settings
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
}

/// Encoding of envelope bytes written by the CLI
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Lowercase hex text
    #[default]
    Hex,
    /// Raw bytes
    Raw,
}

fn default_schema_dir() -> PathBuf {
    PathBuf::from("schemas")
}

fn default_extension() -> String {
    "avsc".to_string()
}

fn default_true() -> bool {
    true
}

impl Default for SchemaSourceConfig {
    fn default() -> Self {
        Self {
            dir: default_schema_dir(),
            extension: default_extension(),
            recursive: true,
        }
    }
}

impl EnvelopeConfig {
    /// Load configuration from default locations
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(None)
    }

    /// Load configuration, adding a required file on top of the defaults
    pub fn load_from(config_path: Option<&str>) -> Result<Self, ConfigError> {
        let mut builder = Config::builder();

        let config_locations = ["envelope.toml", ".envelope.toml", "config/envelope.toml"];

        for location in config_locations {
            builder = builder.add_source(File::with_name(location).required(false));
        }

        if let Some(config_dir) = directories::ProjectDirs::from("dev", "datastream", "envelope") {
            let xdg_config = config_dir.config_dir().join("envelope.toml");
            if xdg_config.exists() {
                builder = builder.add_source(File::from(xdg_config).required(false));
            }
        }

        if let Some(path) = config_path {
            builder = builder.add_source(File::with_name(path).required(true));
        }

        // ENVELOPE__OUTPUT__FORMAT=raw
        builder = builder.add_source(
            Environment::with_prefix("ENVELOPE")
                .prefix_separator("__")
                .separator("__")
                .try_parsing(true),
        );

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Save configuration to a file
    pub fn save(&self, path: &str) -> std::io::Result<()> {
        let content = toml::to_string_pretty(self)
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidData, e))?;
        std::fs::write(path, content)
    }

    /// Schema directory, resolved against the working directory
    pub fn schema_dir(&self) -> PathBuf {
        if self.schemas.dir.is_absolute() {
            self.schemas.dir.clone()
        } else {
            std::env::current_dir()
                .unwrap_or_default()
                .join(&self.schemas.dir)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = EnvelopeConfig::default();
        assert_eq!(config.schemas.extension, "avsc");
        assert!(config.schemas.recursive);
        assert_eq!(config.output.format, OutputFormat::Hex);
    }

    #[test]
    fn test_serialize_config() {
        let config = EnvelopeConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert!(toml_str.contains("[schemas]"));
        assert!(toml_str.contains("[output]"));
        assert!(toml_str.contains(r#"format = "hex""#));
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.toml");
        std::fs::write(
            &path,
            "[schemas]\ndir = \"/srv/schemas\"\nrecursive = false\n\n[output]\nformat = \"raw\"\n",
        )
        .unwrap();

        let config = EnvelopeConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(config.schemas.dir, PathBuf::from("/srv/schemas"));
        assert!(!config.schemas.recursive);
        assert_eq!(config.schemas.extension, "avsc");
        assert_eq!(config.output.format, OutputFormat::Raw);
        assert_eq!(config.schema_dir(), PathBuf::from("/srv/schemas"));
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("saved.toml");
        let mut config = EnvelopeConfig::default();
        config.output.format = OutputFormat::Raw;
        config.save(path.to_str().unwrap()).unwrap();

        let loaded = EnvelopeConfig::load_from(Some(path.to_str().unwrap())).unwrap();
        assert_eq!(loaded.output.format, OutputFormat::Raw);
    }
}
