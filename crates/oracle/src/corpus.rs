//! Scan-phase accumulator.
//!
//! Filled one verdict at a time while files stream in, then handed read-only
//! to the matcher. Nothing is ever removed.

use anatomist::Verdict;
use std::collections::{HashMap, HashSet};

/// Source classes, test classes, and where each source class came from.
///
/// Every fqcn in `source_classes` has an entry in `source_to_file`.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Corpus {
    source_classes: HashSet<String>,
    test_classes: HashSet<String>,
    source_to_file: HashMap<String, String>,
}

impl Corpus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one classification verdict. `Ignored` is a no-op.
    ///
    /// Returns the previously attributed path when a source fqcn is registered
    /// a second time; the new path replaces it.
    pub fn record(&mut self, verdict: &Verdict, path: &str) -> Option<String> {
        match verdict {
            Verdict::Test(fqcn) => {
                self.add_test(fqcn);
                None
            }
            Verdict::Source(fqcn) => self.add_source(fqcn, path),
            Verdict::Ignored => None,
        }
    }

    pub fn add_test(&mut self, fqcn: &str) {
        self.test_classes.insert(fqcn.to_string());
    }

    /// Registers a source class. Last write wins on the file attribution.
    pub fn add_source(&mut self, fqcn: &str, path: &str) -> Option<String> {
        self.source_classes.insert(fqcn.to_string());
        self.source_to_file
            .insert(fqcn.to_string(), path.to_string())
            .filter(|previous| previous != path)
    }

    pub fn source_classes(&self) -> &HashSet<String> {
        &self.source_classes
    }

    pub fn test_classes(&self) -> &HashSet<String> {
        &self.test_classes
    }

    pub fn is_test_class(&self, fqcn: &str) -> bool {
        self.test_classes.contains(fqcn)
    }

    /// File a source class was attributed to.
    pub fn file_of(&self, fqcn: &str) -> Option<&str> {
        self.source_to_file.get(fqcn).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        self.source_classes.is_empty() && self.test_classes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_routes_verdicts() {
        let mut corpus = Corpus::new();
        corpus.record(&Verdict::Source("a.Foo".into()), "a/Foo.java");
        corpus.record(&Verdict::Test("a.FooTest".into()), "a/FooTest.java");
        corpus.record(&Verdict::Ignored, "a/Bar.java");

        assert!(corpus.source_classes().contains("a.Foo"));
        assert!(corpus.is_test_class("a.FooTest"));
        assert_eq!(corpus.source_classes().len(), 1);
        assert_eq!(corpus.test_classes().len(), 1);
        assert_eq!(corpus.file_of("a.Foo"), Some("a/Foo.java"));
        assert_eq!(corpus.file_of("a.FooTest"), None);
    }

    #[test]
    fn test_duplicate_source_last_write_wins() {
        let mut corpus = Corpus::new();
        assert_eq!(corpus.add_source("a.Foo", "one/a/Foo.java"), None);
        assert_eq!(
            corpus.add_source("a.Foo", "two/a/Foo.java"),
            Some("one/a/Foo.java".to_string())
        );
        assert_eq!(corpus.source_classes().len(), 1);
        assert_eq!(corpus.file_of("a.Foo"), Some("two/a/Foo.java"));
    }

    #[test]
    fn test_same_file_twice_is_not_a_duplicate() {
        let mut corpus = Corpus::new();
        corpus.add_source("a.Foo", "a/Foo.java");
        assert_eq!(corpus.add_source("a.Foo", "a/Foo.java"), None);
    }

    #[test]
    fn test_every_source_has_a_file() {
        let mut corpus = Corpus::new();
        corpus.add_source("A", "A.java");
        corpus.add_source("b.B", "b/B.java");
        for fqcn in corpus.source_classes() {
            assert!(corpus.file_of(fqcn).is_some());
        }
    }

    #[test]
    fn test_empty() {
        let mut corpus = Corpus::new();
        assert!(corpus.is_empty());
        corpus.record(&Verdict::Ignored, "X.java");
        assert!(corpus.is_empty());
    }
}
