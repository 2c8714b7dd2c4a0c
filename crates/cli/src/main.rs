use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use common::{CheckConfig, Severity, Violation};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

/// Config file picked up from the scanned root when `--config` is not given.
const DEFAULT_CONFIG_FILE: &str = "testclasses.toml";

/// Directories never descended into.
const SKIP_DIRS: &[&str] = &[".git", "node_modules"];

/// Build output directories, skipped only outside of a `src` tree so that
/// packages such as `com.acme.build` are still scanned.
const BUILD_DIRS: &[&str] = &["target", "build", "out"];

#[derive(Parser)]
#[command(name = "testclasses")]
#[command(about = "Every class has a test: flags Java classes without a test class", long_about = None)]
struct Cli {
    /// Log classification decisions to stderr.
    #[arg(long, global = true)]
    verbose: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Scan a source tree and report classes with no test class.
    Check {
        /// Project root to scan.
        path: PathBuf,
        /// TOML config (defaults to `<path>/testclasses.toml` if present).
        #[arg(long)]
        config: Option<PathBuf>,
        /// Skip annotation types (`@interface`).
        #[arg(long)]
        ignore_annotations: bool,
        /// Skip interfaces.
        #[arg(long)]
        ignore_interfaces: bool,
        /// Skip enums.
        #[arg(long)]
        ignore_enums: bool,
        /// Skip abstract classes.
        #[arg(long)]
        ignore_abstracts: bool,
        /// Comma-separated fqcn regexes to exclude (full match).
        #[arg(long)]
        exclude_patterns: Option<String>,
        /// Severity of reported violations.
        #[arg(long, value_enum)]
        severity: Option<SeverityArg>,
        /// Output format.
        #[arg(long, value_enum, default_value_t = Format::Text)]
        format: Format,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum SeverityArg {
    Ignore,
    Info,
    Warning,
    Error,
}

impl From<SeverityArg> for Severity {
    fn from(arg: SeverityArg) -> Self {
        match arg {
            SeverityArg::Ignore => Severity::Ignore,
            SeverityArg::Info => Severity::Info,
            SeverityArg::Warning => Severity::Warning,
            SeverityArg::Error => Severity::Error,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
}

/// Command-line overrides layered on top of the config file.
#[derive(Default)]
struct Overrides {
    ignore_annotations: bool,
    ignore_interfaces: bool,
    ignore_enums: bool,
    ignore_abstracts: bool,
    exclude_patterns: Option<String>,
    severity: Option<Severity>,
}

fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "warn" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Commands::Check {
            path,
            config,
            ignore_annotations,
            ignore_interfaces,
            ignore_enums,
            ignore_abstracts,
            exclude_patterns,
            severity,
            format,
        } => {
            let overrides = Overrides {
                ignore_annotations,
                ignore_interfaces,
                ignore_enums,
                ignore_abstracts,
                exclude_patterns,
                severity: severity.map(Severity::from),
            };
            cmd_check(&path, config.as_deref(), overrides, format)
        }
    }
}

// ---------------------------------------------------------------------------
// check
// ---------------------------------------------------------------------------

fn cmd_check(
    root: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
    format: Format,
) -> anyhow::Result<ExitCode> {
    let root_display = anatomist::path_util::normalize_path(root)
        .with_context(|| format!("cannot open {}", root.display()))?;
    let config = resolve_config(root, config_path, overrides)?;
    let mut check = oracle::TestClassesCheck::from_config(&config)?;

    let files = collect_files(root)?;
    tracing::info!(root = %root_display, files = files.len(), "scanning");

    check.begin();
    for path in &files {
        match load_source(path) {
            Ok(file) => {
                check.process(&file);
            }
            Err(e) => tracing::warn!("skipping {}: {:#}", path.display(), e),
        }
    }
    let violations: Vec<Violation> = check
        .finish()
        .into_iter()
        .filter(|v| v.severity != Severity::Ignore)
        .collect();

    match format {
        Format::Text => {
            for v in &violations {
                println!("{v}");
            }
        }
        Format::Json => println!("{}", serde_json::to_string_pretty(&violations)?),
    }

    Ok(if has_failures(&violations) {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    })
}

/// Loads the config file (explicit, or the default one under `root`) and
/// applies command-line overrides.
fn resolve_config(
    root: &Path,
    config_path: Option<&Path>,
    overrides: Overrides,
) -> anyhow::Result<CheckConfig> {
    let mut config = match config_path {
        Some(path) => CheckConfig::load(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => {
            let default = root.join(DEFAULT_CONFIG_FILE);
            if default.is_file() {
                CheckConfig::load(&default)
                    .with_context(|| format!("loading config {}", default.display()))?
            } else {
                CheckConfig::default()
            }
        }
    };

    config.ignore_annotations |= overrides.ignore_annotations;
    config.ignore_interfaces |= overrides.ignore_interfaces;
    config.ignore_enums |= overrides.ignore_enums;
    config.ignore_abstracts |= overrides.ignore_abstracts;
    if let Some(list) = overrides.exclude_patterns.as_deref() {
        config.set_exclude_patterns(list);
    }
    if let Some(severity) = overrides.severity {
        config.severity = severity;
    }
    Ok(config)
}

/// The gate fails only on error-level violations.
fn has_failures(violations: &[Violation]) -> bool {
    violations.iter().any(|v| v.severity == Severity::Error)
}

// ---------------------------------------------------------------------------
// Shared helpers
// ---------------------------------------------------------------------------

/// Every regular file under `root`, sorted, outside of [`SKIP_DIRS`] and
/// [`BUILD_DIRS`].
fn collect_files(root: &Path) -> anyhow::Result<Vec<PathBuf>> {
    use walkdir::WalkDir;
    if root.is_file() {
        return Ok(vec![root.to_path_buf()]);
    }
    let mut files = Vec::new();
    for entry in WalkDir::new(root)
        .follow_links(false)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|e| !is_skipped_dir(root, e))
    {
        let entry = entry.with_context(|| format!("walking {}", root.display()))?;
        if entry.file_type().is_file() {
            files.push(entry.into_path());
        }
    }
    Ok(files)
}

fn is_skipped_dir(root: &Path, entry: &walkdir::DirEntry) -> bool {
    if entry.depth() == 0 || !entry.file_type().is_dir() {
        return false;
    }
    let Some(name) = entry.file_name().to_str() else {
        return false;
    };
    if SKIP_DIRS.contains(&name) {
        return true;
    }
    BUILD_DIRS.contains(&name) && !inside_src(root, entry.path())
}

/// True when some directory between `root` and `path` is named `src`.
fn inside_src(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .ok()
        .and_then(Path::parent)
        .is_some_and(|dirs| dirs.components().any(|c| c.as_os_str() == "src"))
}

/// Reads a file and decodes it as UTF-8, replacing invalid sequences.
fn load_source(path: &Path) -> anyhow::Result<anatomist::SourceFile> {
    let bytes = std::fs::read(path)?;
    let text = String::from_utf8_lossy(&bytes);
    Ok(anatomist::SourceFile::from_text(path, &text))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn write(root: &Path, rel: &str, text: &str) {
        let path = root.join(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    #[test]
    fn test_collect_files_skips_build_dirs() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/a/Foo.java", "package a;");
        write(tmp.path(), "target/classes/a/Gen.java", "package a;");
        write(tmp.path(), ".git/HEAD", "ref");

        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(files, vec![tmp.path().join("src/a/Foo.java")]);
    }

    #[test]
    fn test_collect_files_keeps_build_named_packages() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/main/java/com/acme/build/Builder.java", "package com.acme.build;");
        write(tmp.path(), "src/main/java/com/acme/out/Printer.java", "package com.acme.out;");
        write(tmp.path(), "module/target/classes/Gen.java", "");
        write(tmp.path(), "target/Gen.java", "");
        write(tmp.path(), "src/main/node_modules/x.java", "");

        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(
            files,
            vec![
                tmp.path().join("src/main/java/com/acme/build/Builder.java"),
                tmp.path().join("src/main/java/com/acme/out/Printer.java"),
            ]
        );
    }

    #[test]
    fn test_collect_files_sorted() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "b/B.java", "");
        write(tmp.path(), "a/A.java", "");
        let files = collect_files(tmp.path()).unwrap();
        assert_eq!(
            files,
            vec![tmp.path().join("a/A.java"), tmp.path().join("b/B.java")]
        );
    }

    #[test]
    fn test_load_source_lossy() {
        let tmp = tempfile::tempdir().unwrap();
        let path = tmp.path().join("Foo.java");
        fs::write(&path, b"package a;\n// caf\xe9\nclass Foo {}\n").unwrap();
        let file = load_source(&path).unwrap();
        assert_eq!(file.lines.len(), 3);
        assert_eq!(file.lines[0], "package a;");
    }

    #[test]
    fn test_resolve_config_defaults_without_file() {
        let tmp = tempfile::tempdir().unwrap();
        let config = resolve_config(tmp.path(), None, Overrides::default()).unwrap();
        assert_eq!(config, CheckConfig::default());
    }

    #[test]
    fn test_resolve_config_reads_default_file_and_overrides() {
        let tmp = tempfile::tempdir().unwrap();
        write(
            tmp.path(),
            DEFAULT_CONFIG_FILE,
            "ignore_enums = true\nexclude_patterns = [\".*Dto\"]\n",
        );
        let overrides = Overrides {
            ignore_interfaces: true,
            exclude_patterns: Some("a\\..*, b\\..*".into()),
            severity: Some(Severity::Error),
            ..Default::default()
        };
        let config = resolve_config(tmp.path(), None, overrides).unwrap();
        assert!(config.ignore_enums);
        assert!(config.ignore_interfaces);
        assert!(!config.ignore_abstracts);
        assert_eq!(config.exclude_patterns, vec![".*Dto", "a\\..*", "b\\..*"]);
        assert_eq!(config.severity, Severity::Error);
    }

    #[test]
    fn test_resolve_config_missing_explicit_file() {
        let tmp = tempfile::tempdir().unwrap();
        let missing = tmp.path().join("nope.toml");
        assert!(resolve_config(tmp.path(), Some(&missing), Overrides::default()).is_err());
    }

    #[test]
    fn test_fails_only_on_error() {
        let warn = Violation::missing_test("A", "A.java", Severity::Warning);
        let err = Violation::missing_test("B", "B.java", Severity::Error);
        assert!(!has_failures(&[]));
        assert!(!has_failures(&[warn.clone()]));
        assert!(has_failures(&[warn, err]));
    }

    #[test]
    fn test_end_to_end_tree() {
        let tmp = tempfile::tempdir().unwrap();
        write(tmp.path(), "src/main/java/com/acme/Widget.java", "package com.acme;\npublic class Widget {}\n");
        write(tmp.path(), "src/main/java/com/acme/Gadget.java", "package com.acme;\npublic class Gadget {}\n");
        write(tmp.path(), "src/test/java/com/acme/WidgetTest.java", "package com.acme;\nclass WidgetTest {}\n");
        write(tmp.path(), "src/main/java/com/acme/package-info.java", "package com.acme;\n");

        let mut check = oracle::TestClassesCheck::default();
        let sources: Vec<_> = collect_files(tmp.path())
            .unwrap()
            .iter()
            .map(|p| load_source(p).unwrap())
            .collect();
        let violations = check.run(&sources);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "class com.acme.Gadget has no test class(es)");
        assert!(violations[0].path.ends_with("src/main/java/com/acme/Gadget.java"));
    }
}
