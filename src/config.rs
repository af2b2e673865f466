//! Configuration: TOML file, environment overrides, validation.
//!
//! Every field has a default, so an empty file (or none at all) is a valid
//! configuration.
//!
//! ```toml
//! [export]
//! default_mastery_score = 80
//! compression_level = 6
//! locale = "fr"
//!
//! [storage]
//! root = "./storage"
//! prefix = "scorm-exports"
//! signed_url_ttl_secs = 3600
//!
//! [logging]
//! level = "info"
//! json = false
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::export::{ExporterConfig, Locale};
use crate::model::{DEFAULT_MASTERY_SCORE, MasteryScore};

/// Top-level configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ScormConfig {
    pub export: ExportConfig,
    pub storage: StorageConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ExportConfig {
    /// Mastery score used when a request does not carry one.
    pub default_mastery_score: u8,
    pub compression_level: u32,
    pub locale: Locale,
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            default_mastery_score: DEFAULT_MASTERY_SCORE,
            compression_level: 6,
            locale: Locale::default(),
        }
    }
}

impl ExportConfig {
    pub fn exporter_config(&self) -> ExporterConfig {
        ExporterConfig {
            compression_level: self.compression_level,
            locale: self.locale,
        }
    }

    pub fn mastery_score(&self) -> MasteryScore {
        MasteryScore::new(i64::from(self.default_mastery_score))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StorageConfig {
    /// Directory backing local storage.
    pub root: PathBuf,
    /// First path segment of every stored package.
    pub prefix: String,
    pub signed_url_ttl_secs: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("./storage"),
            prefix: "scorm-exports".to_string(),
            signed_url_ttl_secs: 3600,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LoggingConfig {
    /// trace, debug, info, warn or error.
    pub level: String,
    /// Emit JSON lines instead of human-readable output.
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl ScormConfig {
    /// Parse configuration from TOML text and validate it.
    pub fn from_toml(contents: &str) -> Result<Self> {
        let config: ScormConfig = toml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.export.default_mastery_score > 100 {
            return Err(Error::Config(format!(
                "export.default_mastery_score must be between 0 and 100, got {}",
                self.export.default_mastery_score
            )));
        }
        if self.export.compression_level > 9 {
            return Err(Error::Config(format!(
                "export.compression_level must be between 0 and 9, got {}",
                self.export.compression_level
            )));
        }
        let prefix = self.storage.prefix.trim_matches('/');
        if prefix.is_empty() || prefix.split('/').any(|s| s == ".." || s == ".") {
            return Err(Error::Config(format!(
                "storage.prefix must be a non-empty relative path, got {:?}",
                self.storage.prefix
            )));
        }
        if self.storage.signed_url_ttl_secs == 0 {
            return Err(Error::Config(
                "storage.signed_url_ttl_secs must be positive".into(),
            ));
        }
        if !matches!(
            self.logging.level.to_ascii_lowercase().as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(Error::Config(format!(
                "logging.level must be one of trace, debug, info, warn, error; got {:?}",
                self.logging.level
            )));
        }
        Ok(())
    }

    /// Apply `SCORMKIT_*` environment variables on top of the file values.
    ///
    /// Values that do not parse are ignored.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    fn apply_overrides(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(v) = var("SCORMKIT_STORAGE_ROOT") {
            self.storage.root = PathBuf::from(v);
        }
        if let Some(v) = var("SCORMKIT_STORAGE_PREFIX") {
            self.storage.prefix = v;
        }
        if let Some(v) = var("SCORMKIT_SIGNED_URL_TTL_SECS").and_then(|v| v.parse().ok()) {
            self.storage.signed_url_ttl_secs = v;
        }
        if let Some(v) = var("SCORMKIT_LOG_LEVEL") {
            self.logging.level = v;
        }
        if let Some(v) = var("SCORMKIT_LOG_JSON").and_then(|v| v.parse().ok()) {
            self.logging.json = v;
        }
    }
}

/// Load configuration from a TOML file, apply environment overrides and
/// validate.
pub fn load_config(path: impl AsRef<Path>) -> Result<ScormConfig> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path).map_err(|e| {
        Error::Config(format!(
            "Failed to read configuration file {}: {e}",
            path.display()
        ))
    })?;
    let mut config: ScormConfig = toml::from_str(&contents)
        .map_err(|e| Error::Config(format!("Failed to parse TOML: {e}")))?;
    config.apply_env_overrides();
    config.validate()?;
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = ScormConfig::from_toml("").unwrap();
        assert_eq!(config, ScormConfig::default());
        assert_eq!(config.export.default_mastery_score, 80);
        assert_eq!(config.export.compression_level, 6);
        assert_eq!(config.storage.prefix, "scorm-exports");
        assert_eq!(config.storage.signed_url_ttl_secs, 3600);
    }

    #[test]
    fn test_partial_config() {
        let config = ScormConfig::from_toml(
            r#"
            [export]
            locale = "en"
            default_mastery_score = 70

            [logging]
            json = true
            "#,
        )
        .unwrap();
        assert_eq!(config.export.locale, Locale::En);
        assert_eq!(config.export.mastery_score().get(), 70);
        assert_eq!(config.export.compression_level, 6);
        assert!(config.logging.json);
    }

    #[test]
    fn test_validation() {
        for bad in [
            "[export]\ncompression_level = 10",
            "[export]\ndefault_mastery_score = 101",
            "[storage]\nprefix = \"\"",
            "[storage]\nprefix = \"../escape\"",
            "[storage]\nsigned_url_ttl_secs = 0",
            "[logging]\nlevel = \"loud\"",
            "[unknown]\nx = 1",
        ] {
            assert!(
                matches!(ScormConfig::from_toml(bad), Err(Error::Config(_))),
                "accepted: {bad}"
            );
        }
    }

    #[test]
    fn test_overrides() {
        let env: HashMap<&str, &str> = [
            ("SCORMKIT_STORAGE_PREFIX", "exports"),
            ("SCORMKIT_SIGNED_URL_TTL_SECS", "60"),
            ("SCORMKIT_LOG_JSON", "nope"),
        ]
        .into_iter()
        .collect();
        let mut config = ScormConfig::default();
        config.apply_overrides(|k| env.get(k).map(|v| v.to_string()));
        assert_eq!(config.storage.prefix, "exports");
        assert_eq!(config.storage.signed_url_ttl_secs, 60);
        assert!(!config.logging.json);
    }

    #[test]
    fn test_load_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[storage]\nroot = \"/tmp/scorm\"").unwrap();
        let config = load_config(file.path()).unwrap();
        assert_eq!(config.storage.root, PathBuf::from("/tmp/scorm"));
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            load_config("/nonexistent/scormkit.toml"),
            Err(Error::Config(_))
        ));
    }
}
