//! The test-class check: one scan pass, then one match pass.

use crate::corpus::Corpus;
use crate::{matcher, OracleError};
use anatomist::path_util::display_path;
use anatomist::{Classifier, ExclusionEngine, SourceFile, Verdict};
use common::{CheckConfig, Severity, Violation};

/// Owns the corpus for a single run.
///
/// Lifecycle: [`begin`](Self::begin) → [`process`](Self::process) per file →
/// [`finish`](Self::finish). `finish` consumes the corpus, so a second call
/// without an intervening `begin`/`process` reports nothing.
#[derive(Debug, Default)]
pub struct TestClassesCheck {
    classifier: Classifier,
    severity: Severity,
    corpus: Corpus,
}

impl TestClassesCheck {
    pub fn new(classifier: Classifier, severity: Severity) -> Self {
        Self {
            classifier,
            severity,
            corpus: Corpus::new(),
        }
    }

    /// Compiles the configuration's exclusion rules.
    ///
    /// # Errors
    /// Fails on the first malformed `exclude_patterns` entry.
    pub fn from_config(config: &CheckConfig) -> Result<Self, OracleError> {
        let engine = ExclusionEngine::compile(config)?;
        Ok(Self::new(Classifier::new(engine), config.severity))
    }

    /// Starts a fresh run; anything recorded so far is dropped.
    pub fn begin(&mut self) {
        self.corpus = Corpus::new();
    }

    /// Classifies one file and records the result.
    ///
    /// Returns `None` for files the classifier skips.
    pub fn process(&mut self, file: &SourceFile) -> Option<Verdict> {
        let verdict = self.classifier.classify(file)?;
        let path = display_path(file.path());
        if let Some(previous) = self.corpus.record(&verdict, &path) {
            tracing::warn!(
                fqcn = verdict.fqcn().unwrap_or_default(),
                previous = %previous,
                current = %path,
                "duplicate class; reporting against the later file"
            );
        }
        Some(verdict)
    }

    /// Matches every source class against the collected test classes.
    pub fn finish(&mut self) -> Vec<Violation> {
        let corpus = std::mem::take(&mut self.corpus);
        let violations = matcher::find_untested(&corpus, self.severity);
        tracing::info!(
            sources = corpus.source_classes().len(),
            tests = corpus.test_classes().len(),
            violations = violations.len(),
            "test class check finished"
        );
        violations
    }

    /// Runs a complete check over `files`.
    pub fn run<'a, I>(&mut self, files: I) -> Vec<Violation>
    where
        I: IntoIterator<Item = &'a SourceFile>,
    {
        self.begin();
        for file in files {
            self.process(file);
        }
        self.finish()
    }

    /// Corpus as accumulated so far.
    pub fn corpus(&self) -> &Corpus {
        &self.corpus
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn java(path: &str, text: &str) -> SourceFile {
        SourceFile::from_text(path, text)
    }

    #[test]
    fn test_process_skips_non_sources() {
        let mut check = TestClassesCheck::default();
        assert_eq!(check.process(&java("pom.xml", "<project/>")), None);
        assert!(check.corpus().is_empty());
    }

    #[test]
    fn test_finish_consumes_corpus() {
        let mut check = TestClassesCheck::default();
        check.process(&java("Foo.java", "class Foo {}"));
        assert_eq!(check.finish().len(), 1);
        assert!(check.finish().is_empty());
    }

    #[test]
    fn test_begin_resets_state() {
        let mut check = TestClassesCheck::default();
        check.process(&java("Foo.java", "class Foo {}"));
        check.begin();
        assert!(check.corpus().is_empty());
        assert!(check.finish().is_empty());
    }

    #[test]
    fn test_severity_from_config() {
        let config = CheckConfig {
            severity: Severity::Error,
            ..Default::default()
        };
        let mut check = TestClassesCheck::from_config(&config).unwrap();
        let violations = check.run(&[java("Foo.java", "class Foo {}")]);
        assert_eq!(violations[0].severity, Severity::Error);
    }

    #[test]
    fn test_from_config_rejects_bad_pattern() {
        let mut config = CheckConfig::default();
        config.set_exclude_patterns("[unclosed");
        let err = TestClassesCheck::from_config(&config).unwrap_err();
        assert!(matches!(err, OracleError::Rules(_)));
    }

    #[test]
    fn test_from_config_rejects_unbalanced_pattern() {
        let mut config = CheckConfig::default();
        config.set_exclude_patterns("com\\.acme)|(Dto");
        assert!(TestClassesCheck::from_config(&config).is_err());
    }

    #[test]
    fn test_duplicate_class_reported_against_later_file() {
        let mut check = TestClassesCheck::default();
        let violations = check.run(&[
            java("module-a/src/a/Foo.java", "package a;"),
            java("module-b/src/a/Foo.java", "package a;"),
        ]);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].path, "module-b/src/a/Foo.java");
    }
}
