//! Exclusion rules: decide whether a would-be source class is dropped from tracking.
//!
//! Rules are evaluated as an ordered list, first match wins:
//! 1. fqcn patterns, in configuration order (full match).
//! 2. One pass over the file's lines. Per line: the enabled declaration rules in
//!    fixed order (annotation, interface, enum, abstract class), then the
//!    unconditional `// NOTESTCLASS` marker.
//!
//! Declaration detection is a regex over a single line. It does not know about
//! comments or multi-line declarations, and `interface Widget` also matches a
//! class named `WidgetFactory` declared as `interface WidgetFactory`.

use crate::AnatomistError;
use common::CheckConfig;
use once_cell::sync::Lazy;
use regex::Regex;

// Each captures whatever follows the keyword and its trailing whitespace; the
// caller checks that the remainder starts with the simple class name.
// Whitespace is ASCII-only (`(?-u:\s)`): a no-break space does not count.
static ANNOTATION_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\s)*(?:public)?(?-u:\s)*@interface(?-u:\s)+(.*)").unwrap()
});
static INTERFACE_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\s)*(?:public)?(?-u:\s)*interface(?-u:\s)+(.*)").unwrap()
});
static ENUM_DECL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?-u:\s)*(?:public)?(?-u:\s)*enum(?-u:\s)+(.*)").unwrap());
static ABSTRACT_DECL: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?-u:\s)*(?:public)?(?-u:\s)*abstract(?-u:\s)*class(?-u:\s)+(.*)").unwrap()
});

static NO_TEST_MARKER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(?-u:\s)*//(?-u:\s)*NOTESTCLASS(?-u:\s)*$").unwrap());

/// Declaration shapes that can be individually toggled off.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DeclarationKind {
    /// `@interface Name`
    Annotation,
    /// `interface Name`
    Interface,
    /// `enum Name`
    Enum,
    /// `abstract class Name`
    Abstract,
}

impl DeclarationKind {
    /// Fixed per-line evaluation order.
    pub const ALL: [DeclarationKind; 4] = [
        DeclarationKind::Annotation,
        DeclarationKind::Interface,
        DeclarationKind::Enum,
        DeclarationKind::Abstract,
    ];

    fn pattern(&self) -> &'static Regex {
        match self {
            DeclarationKind::Annotation => &ANNOTATION_DECL,
            DeclarationKind::Interface => &INTERFACE_DECL,
            DeclarationKind::Enum => &ENUM_DECL,
            DeclarationKind::Abstract => &ABSTRACT_DECL,
        }
    }

    fn enabled(&self, config: &CheckConfig) -> bool {
        match self {
            DeclarationKind::Annotation => config.ignore_annotations,
            DeclarationKind::Interface => config.ignore_interfaces,
            DeclarationKind::Enum => config.ignore_enums,
            DeclarationKind::Abstract => config.ignore_abstracts,
        }
    }

    /// Returns `true` if `line` declares `simple_name` with this shape.
    ///
    /// # Example
    /// ```
    /// # use anatomist::DeclarationKind;
    /// assert!(DeclarationKind::Interface.declares("public interface Widget {", "Widget"));
    /// assert!(!DeclarationKind::Interface.declares("public class Widget {", "Widget"));
    /// ```
    pub fn declares(&self, line: &str, simple_name: &str) -> bool {
        self.pattern()
            .captures(line)
            .and_then(|caps| caps.get(1))
            .is_some_and(|rest| rest.as_str().starts_with(simple_name))
    }
}

/// A single compiled exclusion rule.
#[derive(Debug, Clone)]
pub enum ExclusionRule {
    /// Full match against the fqcn.
    Fqcn(Regex),
    /// A line declares the simple class name with the given shape.
    Declaration(DeclarationKind),
    /// A line consisting solely of `// NOTESTCLASS`. Always active.
    Marker,
}

impl ExclusionRule {
    fn matches_line(&self, line: &str, simple_name: &str) -> bool {
        match self {
            ExclusionRule::Declaration(kind) => kind.declares(line, simple_name),
            ExclusionRule::Marker => NO_TEST_MARKER.is_match(line),
            ExclusionRule::Fqcn(_) => false,
        }
    }
}

/// Ordered exclusion rules, built once per run and immutable afterwards.
#[derive(Debug, Clone)]
pub struct ExclusionEngine {
    fqcn_rules: Vec<ExclusionRule>,
    line_rules: Vec<ExclusionRule>,
}

impl ExclusionEngine {
    /// Compiles every configured pattern.
    ///
    /// # Errors
    /// Returns `AnatomistError::InvalidPattern` for the first pattern that
    /// fails to compile; no engine is produced.
    pub fn compile(config: &CheckConfig) -> Result<Self, AnatomistError> {
        let fqcn_rules = config
            .exclude_patterns
            .iter()
            .map(|pattern| compile_full_match(pattern).map(ExclusionRule::Fqcn))
            .collect::<Result<Vec<_>, _>>()?;

        let mut line_rules: Vec<ExclusionRule> = DeclarationKind::ALL
            .iter()
            .filter(|kind| kind.enabled(config))
            .map(|kind| ExclusionRule::Declaration(*kind))
            .collect();
        line_rules.push(ExclusionRule::Marker);

        tracing::debug!(
            fqcn_rules = fqcn_rules.len(),
            line_rules = line_rules.len(),
            "compiled exclusion rules"
        );

        Ok(Self {
            fqcn_rules,
            line_rules,
        })
    }

    /// Returns the rule that excludes this class, if any.
    pub fn first_match<S: AsRef<str>>(
        &self,
        fqcn: &str,
        simple_name: &str,
        lines: &[S],
    ) -> Option<&ExclusionRule> {
        let by_name = self.fqcn_rules.iter().find(|rule| match rule {
            ExclusionRule::Fqcn(re) => re.is_match(fqcn),
            _ => false,
        });
        if by_name.is_some() {
            return by_name;
        }

        for line in lines {
            let line = line.as_ref();
            if let Some(rule) = self
                .line_rules
                .iter()
                .find(|rule| rule.matches_line(line, simple_name))
            {
                return Some(rule);
            }
        }
        None
    }

    /// Returns `true` if the class should not be tracked as a source class.
    pub fn excludes<S: AsRef<str>>(&self, fqcn: &str, simple_name: &str, lines: &[S]) -> bool {
        self.first_match(fqcn, simple_name, lines).is_some()
    }
}

/// Compiles `pattern` anchored at both ends.
///
/// The pattern is compiled on its own first: wrapping an unbalanced pattern
/// such as `a)|(b` would otherwise yield a valid regex with a different meaning.
fn compile_full_match(pattern: &str) -> Result<Regex, AnatomistError> {
    let invalid = |source| AnatomistError::InvalidPattern {
        pattern: pattern.to_string(),
        source,
    };
    Regex::new(pattern).map_err(invalid)?;
    Regex::new(&format!("^(?:{pattern})$")).map_err(invalid)
}

impl Default for ExclusionEngine {
    /// No patterns, no toggles: only the marker rule is active.
    fn default() -> Self {
        Self {
            fqcn_rules: Vec::new(),
            line_rules: vec![ExclusionRule::Marker],
        }
    }
}
