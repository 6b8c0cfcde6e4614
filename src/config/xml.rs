//! XML configuration support.
//! - Loads copy defaults and logging settings from config.xml (quick_xml).
//! - A missing default file means "use built-in defaults"; a missing file named
//!   explicitly through $ZCP_CONFIG is an error.
//!
//! Example:
//! ```xml
//! <config>
//!   <buffer_size>4194304</buffer_size>
//!   <preserve>true</preserve>
//!   <log_level>info</log_level>
//! </config>
//! ```

use anyhow::{Context, Result};
use quick_xml::de::from_str as from_xml_str;
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use super::paths::config_location;
use super::types::{Config, LogLevel};
use super::validate::validate_buffer_size;
use crate::errors::CopyError;
use crate::fs_ops::DurabilityMode;

/// Struct mirroring the XML config for deserialization.
/// Every field is optional; unset fields leave the current value alone.
#[derive(Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename = "config")]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    #[serde(default, deserialize_with = "de_i64_trimmed_opt")]
    pub buffer_size: Option<i64>,
    pub force: Option<bool>,
    pub preserve: Option<bool>,
    pub quiet: Option<bool>,
    pub fsync: Option<bool>,
    pub log_level: Option<String>,
    pub log_file: Option<String>,
}

// Numbers often arrive padded with whitespace/newlines in hand-edited XML.
fn de_i64_trimmed_opt<'de, D>(deserializer: D) -> Result<Option<i64>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let opt: Option<String> = Option::deserialize(deserializer)?;
    match opt {
        None => Ok(None),
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map(Some)
            .map_err(|e| serde::de::Error::custom(format!("invalid buffer_size '{}': {e}", s.trim()))),
    }
}

impl FileConfig {
    /// Parse an XML document.
    pub fn parse(contents: &str) -> Result<Self> {
        let parsed: FileConfig = from_xml_str(contents).context("parse config xml")?;
        Ok(parsed)
    }

    /// Overlay the values present in this file onto `cfg`.
    pub fn apply_to(&self, cfg: &mut Config) -> Result<(), CopyError> {
        if let Some(raw) = self.buffer_size {
            cfg.options.buffer_size = validate_buffer_size(raw)?;
        }
        if let Some(force) = self.force {
            cfg.options.force = force;
        }
        if let Some(preserve) = self.preserve {
            cfg.options.preserve = preserve;
        }
        if let Some(quiet) = self.quiet {
            cfg.options.quiet = quiet;
        }
        if let Some(fsync) = self.fsync {
            cfg.options.durability = if fsync {
                DurabilityMode::Full
            } else {
                DurabilityMode::Data
            };
        }
        if let Some(s) = self.log_level.as_deref() {
            cfg.log_level = s
                .parse::<LogLevel>()
                .map_err(|e| CopyError::Config(format!("config: {e}")))?;
        }
        if let Some(s) = self.log_file.as_deref() {
            let trimmed = s.trim();
            if !trimmed.is_empty() {
                cfg.log_file = Some(PathBuf::from(trimmed));
            }
        }
        Ok(())
    }
}

/// Load a FileConfig from a specific XML file path.
pub fn load_config_from_xml_path(path: &Path) -> Result<FileConfig> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("read config xml '{}'", path.display()))?;
    FileConfig::parse(&contents).with_context(|| format!("config file '{}'", path.display()))
}

/// Load the config file from $ZCP_CONFIG or the default location.
/// Returns Ok(None) when no file applies.
pub fn load_config() -> Result<Option<(PathBuf, FileConfig)>> {
    let Some(loc) = config_location() else {
        return Ok(None);
    };
    if !loc.path.exists() {
        if loc.explicit {
            return Err(CopyError::Config(format!(
                "config file '{}' (from {}) does not exist",
                loc.path.display(),
                super::CONFIG_ENV
            ))
            .into());
        }
        debug!(path = %loc.path.display(), "no config file; using defaults");
        return Ok(None);
    }
    let parsed = load_config_from_xml_path(&loc.path)?;
    debug!(path = %loc.path.display(), ?parsed, "loaded config file");
    Ok(Some((loc.path, parsed)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_all_fields_with_whitespace() {
        let xml = r#"<config>
  <buffer_size>
    4096
  </buffer_size>
  <force>true</force>
  <preserve>false</preserve>
  <quiet>true</quiet>
  <fsync>true</fsync>
  <log_level>debug</log_level>
  <log_file>/var/log/zcp.log</log_file>
</config>"#;
        let parsed = FileConfig::parse(xml).unwrap();
        assert_eq!(parsed.buffer_size, Some(4096));

        let mut cfg = Config::default();
        parsed.apply_to(&mut cfg).unwrap();
        assert_eq!(cfg.options.buffer_size, 4096);
        assert!(cfg.options.force);
        assert!(!cfg.options.preserve);
        assert!(cfg.options.quiet);
        assert_eq!(cfg.options.durability, DurabilityMode::Full);
        assert_eq!(cfg.log_level, LogLevel::Debug);
        assert_eq!(cfg.log_file, Some(PathBuf::from("/var/log/zcp.log")));
    }

    #[test]
    fn unknown_field_is_rejected() {
        let err = FileConfig::parse("<config><download_base>/x</download_base></config>").unwrap_err();
        assert!(format!("{err:#}").contains("unknown field"), "got: {err:#}");
    }

    #[test]
    fn zero_buffer_size_in_file_is_a_config_error() {
        let parsed = FileConfig::parse("<config><buffer_size>0</buffer_size></config>").unwrap();
        let mut cfg = Config::default();
        let err = parsed.apply_to(&mut cfg).unwrap_err();
        assert_eq!(err.to_string(), "buffer-size must be greater than 0");
    }

    #[test]
    fn empty_config_changes_nothing() {
        let parsed = FileConfig::parse("<config></config>").unwrap();
        assert_eq!(parsed, FileConfig::default());
        let mut cfg = Config::default();
        parsed.apply_to(&mut cfg).unwrap();
        assert_eq!(cfg.options, crate::config::Options::default());
    }
}
