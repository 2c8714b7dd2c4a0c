//! # The Anatomist: Per-File Class Classification
//!
//! **Role**: Dissects one Java source file at a time into a [`Verdict`]: a test
//! class, a tracked source class, or an ignored file.
//!
//! **Core Types**:
//! - `SourceFile`: path + already-decoded lines, supplied by the host.
//! - `Verdict`: outcome of classification, carrying the fqcn where relevant.
//! - `ExclusionEngine`: ordered exclusion rules compiled once from `CheckConfig`.
//!
//! **Design**:
//! - No parsing. Package and declaration shape are recovered with single-line
//!   regexes; multi-line declarations and commented-out code are deliberately
//!   not special-cased.
//! - First match wins everywhere: test naming beats exclusion, and exclusion
//!   rules short-circuit in configuration order.

pub mod classifier;
pub mod exclusion;
pub mod path_util;

pub use classifier::Classifier;
pub use exclusion::{DeclarationKind, ExclusionEngine, ExclusionRule};

use std::path::{Path, PathBuf};

/// A file handed over by the host: its path and decoded lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    pub path: PathBuf,
    pub lines: Vec<String>,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, lines: Vec<String>) -> Self {
        Self {
            path: path.into(),
            lines,
        }
    }

    /// Splits decoded text into lines (`\n` or `\r\n`).
    ///
    /// # Example
    /// ```
    /// # use anatomist::SourceFile;
    /// let file = SourceFile::from_text("Foo.java", "package a;\r\nclass Foo {}\n");
    /// assert_eq!(file.lines, vec!["package a;", "class Foo {}"]);
    /// ```
    pub fn from_text(path: impl Into<PathBuf>, text: &str) -> Self {
        Self::new(path, text.lines().map(str::to_string).collect())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Outcome of classifying one file.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Simple name starts with `Test` or ends with `Test`.
    Test(String),
    /// A production class that needs a test counterpart.
    Source(String),
    /// Matched an exclusion rule; not tracked.
    Ignored,
}

impl Verdict {
    pub fn fqcn(&self) -> Option<&str> {
        match self {
            Verdict::Test(fqcn) | Verdict::Source(fqcn) => Some(fqcn),
            Verdict::Ignored => None,
        }
    }
}

/// Errors produced by the Anatomist crate.
#[derive(Debug, thiserror::Error)]
pub enum AnatomistError {
    /// An `exclude_patterns` entry is not a valid regex.
    #[error("Invalid exclude pattern `{pattern}`: {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// I/O error (path canonicalization).
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),

    /// Path is not valid UTF-8.
    #[error("Non-UTF-8 path: {0}")]
    NonUtf8Path(String),
}
