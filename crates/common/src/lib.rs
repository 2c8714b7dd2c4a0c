pub mod config;

pub use config::{CheckConfig, ConfigError};

use serde::{Deserialize, Serialize};
use std::fmt;

/// Severity stamped on every violation raised by the test-class rule.
///
/// Ordered from least to most severe so hosts can compare against a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Reported nowhere; the host is expected to drop these.
    Ignore,
    Info,
    /// Default: a missing test class is a warning-level finding.
    #[default]
    Warning,
    /// Fails the gate.
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Ignore => "ignore",
            Severity::Info => "info",
            Severity::Warning => "warning",
            Severity::Error => "error",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single finding handed to the reporting sink.
///
/// The rule reports against a whole file, so `line` is always `1`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    pub severity: Severity,
    /// Path of the file the offending class was read from, as supplied by the host.
    pub path: String,
    pub line: u32,
    pub message: String,
}

impl Violation {
    /// Builds the missing-test violation for `fqcn`.
    ///
    /// # Examples
    /// ```
    /// # use common::{Severity, Violation};
    /// let v = Violation::missing_test("com.acme.Widget", "src/com/acme/Widget.java", Severity::Warning);
    /// assert_eq!(v.message, "class com.acme.Widget has no test class(es)");
    /// assert_eq!(v.line, 1);
    /// ```
    pub fn missing_test(fqcn: &str, path: impl Into<String>, severity: Severity) -> Self {
        Self {
            severity,
            path: path.into(),
            line: 1,
            message: format!("class {fqcn} has no test class(es)"),
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}:{}: [{}] {}",
            self.path, self.line, self.severity, self.message
        )
    }
}
