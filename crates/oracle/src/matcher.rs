//! Finalize-phase matching of source classes against the completed test set.
//!
//! # Algorithm
//! For every source fqcn `p.S`, the candidates are `p.TestS` and `p.STest`
//! (`TestS` / `STest` in the default package). The class is covered if either
//! candidate is a known test class; otherwise one violation is raised against
//! the file the class was read from.
//!
//! Runs only after every file has been classified, so the order in which the
//! host fed files has no influence on the result.

use crate::corpus::Corpus;
use common::{Severity, Violation};

/// Splits `a.b.C` into (`a.b`, `C`); no separator means the default package.
pub fn split_fqcn(fqcn: &str) -> (&str, &str) {
    match fqcn.rfind('.') {
        Some(idx) => (&fqcn[..idx], &fqcn[idx + 1..]),
        None => ("", fqcn),
    }
}

/// The two naming-convention test names for a source class.
///
/// # Example
/// ```
/// # use oracle::matcher::candidate_test_names;
/// assert_eq!(
///     candidate_test_names("com.acme.Widget"),
///     ["com.acme.TestWidget".to_string(), "com.acme.WidgetTest".to_string()]
/// );
/// assert_eq!(
///     candidate_test_names("Standalone"),
///     ["TestStandalone".to_string(), "StandaloneTest".to_string()]
/// );
/// ```
pub fn candidate_test_names(fqcn: &str) -> [String; 2] {
    let (package, simple) = split_fqcn(fqcn);
    if package.is_empty() {
        [format!("Test{simple}"), format!("{simple}Test")]
    } else {
        [
            format!("{package}.Test{simple}"),
            format!("{package}.{simple}Test"),
        ]
    }
}

/// Returns `true` if either candidate test class was seen.
pub fn has_test_class(corpus: &Corpus, fqcn: &str) -> bool {
    candidate_test_names(fqcn)
        .iter()
        .any(|candidate| corpus.is_test_class(candidate))
}

/// One violation per source class with no test counterpart, ordered by fqcn.
pub fn find_untested(corpus: &Corpus, severity: Severity) -> Vec<Violation> {
    let mut untested: Vec<&String> = corpus
        .source_classes()
        .iter()
        .filter(|fqcn| !has_test_class(corpus, fqcn))
        .collect();
    untested.sort();

    untested
        .into_iter()
        .map(|fqcn| {
            let path = corpus.file_of(fqcn).unwrap_or_default();
            Violation::missing_test(fqcn, path, severity)
        })
        .collect()
}
