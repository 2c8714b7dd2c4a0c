//! Rule configuration.
//!
//! Mirrors the options a build host can set on the test-class rule. Loaded
//! from TOML (`testclasses.toml`) or assembled field by field by the host;
//! either way it is fixed before scanning starts.

use crate::Severity;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Errors from loading a configuration file.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Invalid config: {0}")]
    ParseError(#[from] toml::de::Error),
}

/// Options recognized by the test-class rule.
///
/// All toggles default to `false`: only fqcn patterns and the inline
/// `NOTESTCLASS` marker exclude a class unless explicitly enabled.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CheckConfig {
    /// Skip files declaring `@interface <Name>`.
    pub ignore_annotations: bool,
    /// Skip files declaring `interface <Name>`.
    pub ignore_interfaces: bool,
    /// Skip files declaring `enum <Name>`.
    pub ignore_enums: bool,
    /// Skip files declaring `abstract class <Name>`.
    pub ignore_abstracts: bool,
    /// Regexes matched in full against the fqcn, in order.
    pub exclude_patterns: Vec<String>,
    pub severity: Severity,
}

impl CheckConfig {
    /// Parses a TOML document.
    ///
    /// # Examples
    /// ```
    /// # use common::CheckConfig;
    /// let cfg = CheckConfig::from_toml_str("ignore_enums = true").unwrap();
    /// assert!(cfg.ignore_enums);
    /// assert!(!cfg.ignore_interfaces);
    /// ```
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads and parses a TOML configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    /// Appends patterns from a comma-separated list (`"a.*, b\\.C"`).
    ///
    /// Every piece is trimmed, the first and last included. Empty pieces are dropped.
    pub fn set_exclude_patterns(&mut self, list: &str) {
        self.exclude_patterns.extend(
            list.split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
        );
    }
}
