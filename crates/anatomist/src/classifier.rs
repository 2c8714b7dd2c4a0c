//! File classification: test class, source class, or ignored.
//!
//! # Detection Rules
//! 1. Only `*.java` files are considered; `package-info` files are skipped.
//! 2. The package comes from the first line that looks like `package a.b.c;`.
//!    A declaration split across lines is not recognized and the file falls
//!    into the default package.
//! 3. The simple name is the file name up to the first `.java`.
//! 4. A simple name starting or ending with `Test` is a test class. This is
//!    checked before any exclusion rule.
//! 5. Anything else is a source class unless the [`ExclusionEngine`] drops it.

use crate::exclusion::ExclusionEngine;
use crate::path_util::file_name;
use crate::{SourceFile, Verdict};
use once_cell::sync::Lazy;
use regex::Regex;

const SOURCE_EXTENSION: &str = ".java";
const PACKAGE_METADATA: &str = "package-info";
const TEST_AFFIX: &str = "Test";

static PACKAGE_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?-u:\s)*package(?-u:\s)+([^;]+);").unwrap());

/// Classifies files against a fixed set of exclusion rules.
#[derive(Debug, Clone, Default)]
pub struct Classifier {
    engine: ExclusionEngine,
}

impl Classifier {
    pub fn new(engine: ExclusionEngine) -> Self {
        Self { engine }
    }

    /// Classifies one file.
    ///
    /// Returns `None` for files that are not Java sources or are package
    /// metadata; those never reach the corpus.
    ///
    /// # Example
    /// ```
    /// # use anatomist::{Classifier, SourceFile, Verdict};
    /// let classifier = Classifier::default();
    /// let file = SourceFile::from_text("src/com/acme/Widget.java", "package com.acme;\nclass Widget {}");
    /// assert_eq!(classifier.classify(&file), Some(Verdict::Source("com.acme.Widget".into())));
    /// ```
    pub fn classify(&self, file: &SourceFile) -> Option<Verdict> {
        let name = file_name(file.path())?;
        let simple_name = simple_class_name(name)?;

        let package = locate_package(&file.lines);
        let fqcn = qualify(package, simple_name);

        let verdict = if is_test_name(simple_name) {
            Verdict::Test(fqcn)
        } else if self.engine.excludes(&fqcn, simple_name, &file.lines) {
            Verdict::Ignored
        } else {
            Verdict::Source(fqcn)
        };

        tracing::debug!(path = %file.path().display(), ?verdict, "classified");
        Some(verdict)
    }
}

/// Simple class name for a Java file name, `None` if the file is not a
/// classifiable source.
///
/// # Example
/// ```
/// # use anatomist::classifier::simple_class_name;
/// assert_eq!(simple_class_name("Widget.java"), Some("Widget"));
/// assert_eq!(simple_class_name("package-info.java"), None);
/// assert_eq!(simple_class_name("Widget.kt"), None);
/// ```
pub fn simple_class_name(file_name: &str) -> Option<&str> {
    if !file_name.ends_with(SOURCE_EXTENSION) || file_name.contains(PACKAGE_METADATA) {
        return None;
    }
    file_name
        .find(SOURCE_EXTENSION)
        .map(|idx| &file_name[..idx])
}

/// Package from the first line that declares one; `""` for the default package.
pub fn locate_package<S: AsRef<str>>(lines: &[S]) -> &str {
    lines
        .iter()
        .find_map(|line| PACKAGE_DECL.captures(line.as_ref()).and_then(|c| c.get(1)))
        .map(|m| m.as_str().trim())
        .unwrap_or_default()
}

/// `package.Simple`, or bare `Simple` in the default package.
pub fn qualify(package: &str, simple_name: &str) -> String {
    if package.is_empty() {
        simple_name.to_string()
    } else {
        format!("{package}.{simple_name}")
    }
}

/// Case-sensitive `Test` prefix or suffix.
pub fn is_test_name(simple_name: &str) -> bool {
    simple_name.starts_with(TEST_AFFIX) || simple_name.ends_with(TEST_AFFIX)
}
