//! `xtask`: workspace automation for the project.
//!
//! Keeps the simulation crate free of I/O and presentation dependencies, and guards the
//! clippy suppression policy.
use anyhow::Result as AnyhowResult;
use clap::{Parser, Subcommand};
use color_eyre::Result;
use color_eyre::eyre::{bail, eyre};
use ra_ap_rustc_lexer::{FrontmatterAllowed, TokenKind};
use regex::Regex;
use serde::Deserialize;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

const CORE_SOURCE_DIR: &str = "crates/core/src";
const CORE_MANIFEST: &str = "crates/core/Cargo.toml";
const SOURCE_ROOTS: &[&str] = &["crates", "xtask"];

/// Macros that write to the terminal. The simulation reports through `tracing` only.
const CORE_DENIED_MACROS: &[&str] = &["println", "eprintln", "print", "eprint", "dbg"];
/// `std` modules that reach outside the process or the wall clock.
const CORE_DENIED_STD_MODULES: &[&str] = &["fs", "net", "process", "thread", "time", "env"];
/// Crates the simulation must never depend on.
const CORE_DENIED_DEPENDENCIES: &[&str] =
    &["macroquad", "taffy", "directories", "tracing-subscriber", "clap", "anyhow"];

/// Exact clippy lints that repository policy forbids suppressing with `allow`/`expect`.
const SUPPRESSION_DENYLIST_CLIPPY_LINTS: &[&str] = &[
    "clippy::cognitive_complexity",
    "clippy::type_complexity",
    "clippy::too_many_arguments",
    "clippy::too_many_lines",
    "clippy::large_enum_variant",
    "clippy::struct_excessive_bools",
];
const SUPPRESSION_DENYLIST_CLIPPY_GROUPS: &[&str] = &["complexity", "perf", "pedantic"];

/// Matches `#[allow(...)]` / `#[expect(...)]`. Nested parentheses may end the capture early,
/// which can miss a hit but never invents one.
const LINT_ATTRIBUTE_PATTERN: &str = r"(?s)#\s*!?\s*\[\s*(allow|expect)\s*\((.*?)\)\s*]";
const CLIPPY_LINT_TOKEN_PATTERN: &str = r"clippy::[a-z_]+";

#[derive(Parser)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run all checks
    Check,
    /// Check that the simulation crate does no I/O and pulls in no shell crates.
    CheckCorePurity,
    /// Check for suppressions of clippy lints denied by workspace policy.
    CheckClippySuppressions,
}

fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = Cli::parse();
    let root = env::current_dir()?;
    match cli.command {
        Commands::Check => {
            check_core_purity(&root)?;
            check_clippy_suppressions(&root)
        }
        Commands::CheckCorePurity => check_core_purity(&root),
        Commands::CheckClippySuppressions => check_clippy_suppressions(&root),
    }
}

#[derive(Deserialize, Default)]
struct Manifest {
    #[serde(default)]
    dependencies: toml::Table,
}

/// One forbidden construct found in a simulation source file.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PurityHit {
    what: String,
    line: usize,
}

fn check_core_purity(root: &Path) -> Result<()> {
    let manifest_text = fs::read_to_string(root.join(CORE_MANIFEST))?;
    let manifest: Manifest = toml::from_str(&manifest_text)
        .map_err(|e| eyre!("Failed to parse {}: {}", CORE_MANIFEST, e))?;
    let denied_deps = denied_dependencies(&manifest);

    let mut violations = Vec::new();
    for path in rust_files(&root.join(CORE_SOURCE_DIR))? {
        let source = fs::read_to_string(&path)?;
        let hits = find_impure_tokens(&source)
            .map_err(|e| eyre!("Failed to scan {}: {}", path.display(), e))?;
        for hit in hits {
            violations.push((relative(root, &path), hit));
        }
    }

    if !denied_deps.is_empty() || !violations.is_empty() {
        println!("SIMULATION CRATE PURITY VIOLATED");
        for dep in &denied_deps {
            println!("{CORE_MANIFEST} -> depends on {dep}");
        }
        for (file, hit) in &violations {
            println!("{}:{} -> {}", file, hit.line, hit.what);
        }
        bail!("The simulation crate must stay free of I/O and shell dependencies.");
    }

    println!("Simulation crate is free of I/O and shell dependencies.");
    Ok(())
}

fn denied_dependencies(manifest: &Manifest) -> Vec<String> {
    manifest
        .dependencies
        .keys()
        .filter(|name| CORE_DENIED_DEPENDENCIES.contains(&name.as_str()))
        .cloned()
        .collect()
}

/// Scans Rust source for terminal macros and `std` I/O module paths, skipping comments
/// and string literals.
fn find_impure_tokens(source: &str) -> AnyhowResult<Vec<PurityHit>> {
    let mut tokens = Vec::new();
    let mut offset = 0usize;
    for token in ra_ap_rustc_lexer::tokenize(source, FrontmatterAllowed::Yes) {
        let len = token.len as usize;
        let text = source
            .get(offset..offset + len)
            .ok_or_else(|| anyhow::anyhow!("token at byte {offset} is out of range"))?;
        if !matches!(
            token.kind,
            TokenKind::LineComment { .. } | TokenKind::BlockComment { .. } | TokenKind::Whitespace
        ) {
            tokens.push((token.kind, text, offset));
        }
        offset += len;
    }

    let line_of = |byte: usize| source[..byte].bytes().filter(|b| *b == b'\n').count() + 1;
    let mut hits = Vec::new();
    for (index, &(kind, text, start)) in tokens.iter().enumerate() {
        if kind != TokenKind::Ident {
            continue;
        }
        let next = tokens.get(index + 1).map(|token| token.0);
        if CORE_DENIED_MACROS.contains(&text) && next == Some(TokenKind::Bang) {
            hits.push(PurityHit { what: format!("{text}!"), line: line_of(start) });
        }
        let path_follows = next == Some(TokenKind::Colon)
            && tokens.get(index + 2).map(|token| token.0) == Some(TokenKind::Colon);
        if text == "std"
            && path_follows
            && let Some(&(TokenKind::Ident, module, _)) = tokens.get(index + 3)
            && CORE_DENIED_STD_MODULES.contains(&module)
        {
            hits.push(PurityHit { what: format!("std::{module}"), line: line_of(start) });
        }
    }
    Ok(hits)
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct ClippySuppressionHit {
    kind: String,
    lint: String,
    line: usize,
}

fn check_clippy_suppressions(root: &Path) -> Result<()> {
    let lint_attr_re = Regex::new(LINT_ATTRIBUTE_PATTERN)?;
    let clippy_lint_re = Regex::new(CLIPPY_LINT_TOKEN_PATTERN)?;
    let mut violations: Vec<(String, ClippySuppressionHit)> = Vec::new();

    for source_root in SOURCE_ROOTS {
        for path in rust_files(&root.join(source_root))? {
            let source = fs::read_to_string(&path)?;
            for hit in find_denied_clippy_suppressions(&source, &lint_attr_re, &clippy_lint_re)? {
                violations.push((relative(root, &path), hit));
            }
        }
    }

    if !violations.is_empty() {
        violations.sort_by(|left, right| {
            left.0.cmp(&right.0).then_with(|| left.1.line.cmp(&right.1.line))
        });
        println!("DISALLOWED CLIPPY SUPPRESSIONS FOUND");
        for (file, hit) in violations {
            println!("{}:{} -> {}({})", file, hit.line, hit.kind, hit.lint);
        }
        bail!("Found suppressions of clippy lints denied by workspace policy.");
    }

    println!("No suppressions found for clippy lints denied by workspace policy.");
    Ok(())
}

fn find_denied_clippy_suppressions(
    source: &str,
    lint_attr_re: &Regex,
    clippy_lint_re: &Regex,
) -> Result<Vec<ClippySuppressionHit>> {
    let mut hits = Vec::new();
    for captures in lint_attr_re.captures_iter(source) {
        let kind = captures
            .get(1)
            .ok_or_else(|| eyre!("capture group 1 missing in lint attribute match"))?
            .as_str();
        let args = captures
            .get(2)
            .ok_or_else(|| eyre!("capture group 2 missing in lint attribute match"))?;

        for lint_match in clippy_lint_re.find_iter(args.as_str()) {
            let lint = lint_match.as_str();
            if !is_denied_clippy_suppression(lint) {
                continue;
            }
            let byte_index = args.start() + lint_match.start();
            let line = source[..byte_index].bytes().filter(|byte| *byte == b'\n').count() + 1;
            hits.push(ClippySuppressionHit {
                kind: kind.to_string(),
                lint: lint.to_string(),
                line,
            });
        }
    }
    Ok(hits)
}

fn is_denied_clippy_suppression(lint: &str) -> bool {
    if SUPPRESSION_DENYLIST_CLIPPY_LINTS.contains(&lint) {
        return true;
    }
    lint.strip_prefix("clippy::")
        .is_some_and(|group| SUPPRESSION_DENYLIST_CLIPPY_GROUPS.contains(&group))
}

/// Every `.rs` file below `dir`, sorted, skipping `target` directories.
fn rust_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    let mut pending = vec![dir.to_path_buf()];
    while let Some(current) = pending.pop() {
        for entry in fs::read_dir(&current)? {
            let path = entry?.path();
            if path.is_dir() {
                if path.file_name().is_some_and(|name| name != "target") {
                    pending.push(path);
                }
            } else if path.extension().and_then(|ext| ext.to_str()) == Some("rs") {
                files.push(path);
            }
        }
    }
    files.sort();
    Ok(files)
}

fn relative(root: &Path, path: &Path) -> String {
    path.strip_prefix(root).unwrap_or(path).display().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_macros_and_io_paths_are_flagged() -> Result<()> {
        let source = r#"
            use std::fs;
            use std::fmt;
            fn leak() {
                // println!("in a comment");
                let s = "eprintln!(inside a string)";
                println!("{s}");
                let _ = std::time::Instant::now();
            }
        "#;
        let hits = find_impure_tokens(source).map_err(|e| eyre!(e))?;
        let found: Vec<&str> = hits.iter().map(|hit| hit.what.as_str()).collect();
        assert_eq!(found, vec!["std::fs", "println!", "std::time"]);
        assert_eq!(hits[1].line, 7);
        Ok(())
    }

    #[test]
    fn tracing_macros_pass() -> Result<()> {
        let source = "fn quiet() { tracing::debug!(tick = 3, \"stepped\"); let print = 1; }";
        assert!(find_impure_tokens(source).map_err(|e| eyre!(e))?.is_empty());
        Ok(())
    }

    #[test]
    fn shell_dependencies_are_reported() -> Result<()> {
        let manifest: Manifest = toml::from_str(
            r#"
            [package]
            name = "labyrinth"

            [dependencies]
            serde = { workspace = true }
            macroquad = "0.4"
            "#,
        )?;
        assert_eq!(denied_dependencies(&manifest), vec!["macroquad".to_string()]);
        Ok(())
    }

    #[test]
    fn denied_clippy_suppressions_are_detected() -> Result<()> {
        let lint_attr_re = Regex::new(LINT_ATTRIBUTE_PATTERN)?;
        let clippy_lint_re = Regex::new(CLIPPY_LINT_TOKEN_PATTERN)?;
        let source = format!(
            "#[allow(clippy::{})]\nfn heavy() {{}}\n#[allow(dead_code)]\nfn quiet() {{}}\n",
            "too_many_lines"
        );
        let hits = find_denied_clippy_suppressions(&source, &lint_attr_re, &clippy_lint_re)?;
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].lint, "clippy::too_many_lines");
        assert_eq!(hits[0].line, 1);
        Ok(())
    }
}
