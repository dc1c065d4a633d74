//! Project linting.
//!
//! Checks run in a fixed order and report under stable ids (`general-1` to
//! `general-7`). A missing or broken `templet.toml` stops the run early
//! since most checks depend on it.

use crate::changelog;
use crate::config::{self, Config, CONFIG_FILE, META_FILE};
use crate::domain::SemanticVersion;
use crate::rewrite;
use log::debug;
use regex::Regex;
use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::OnceLock;
use walkdir::{DirEntry, WalkDir};

/// Each inner list passes when any one of its files exists
const FILES_REQUIRED: &[&[&str]] = &[
    &["README.rst", "README.md"],
    &["LICENSE", "LICENSE.md", "LICENCE", "LICENCE.md"],
    &[META_FILE],
];

const FILES_RECOMMENDED: &[&[&str]] = &[
    &[".gitignore"],
    &[".github/pull_request_template.md"],
    &[".github/ISSUE_TEMPLATE/bug_report.md"],
    &[".github/ISSUE_TEMPLATE/feature_request.md"],
];

const TODO_MARKER: &str = "TODO TEMPLET:";

const SKIPPED_DIRS: &[&str] = &[".git", "target"];

fn placeholder() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"\{\{\s*[A-Za-z_][A-Za-z0-9_.]*\s*\}\}").expect("placeholder regex is valid")
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LintResult {
    pub id: &'static str,
    pub message: String,
}

impl fmt::Display for LintResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.id, self.message)
    }
}

/// Outcome of linting a project
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LintReport {
    pub passed: Vec<LintResult>,
    pub warned: Vec<LintResult>,
    pub failed: Vec<LintResult>,
    /// Set when a critical failure stopped the remaining checks
    pub halted: bool,
}

impl LintReport {
    fn pass(&mut self, id: &'static str, message: impl Into<String>) {
        self.passed.push(LintResult { id, message: message.into() });
    }

    fn warn(&mut self, id: &'static str, message: impl Into<String>) {
        self.warned.push(LintResult { id, message: message.into() });
    }

    fn fail(&mut self, id: &'static str, message: impl Into<String>) {
        self.failed.push(LintResult { id, message: message.into() });
    }

    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    fn has_failed(&self, id: &str) -> bool {
        self.failed.iter().any(|r| r.id == id)
    }
}

/// Lint the project rooted at `project_dir`
pub fn lint_project(project_dir: &Path) -> LintReport {
    let mut report = LintReport::default();

    let config = match config::load_config(project_dir, None) {
        Ok(config) => config,
        Err(e) => {
            report.fail("general-1", e.to_string());
            report.halted = true;
            return report;
        }
    };

    check_files_exist(project_dir, &mut report);
    check_dockerfile(project_dir, &mut report);

    let files = text_files(project_dir);
    check_todos(&files, &mut report);
    check_placeholders(&files, &mut report);

    check_version_consistency(project_dir, &config, &mut report);
    check_changelog(project_dir, &config, &mut report);
    check_config(&config, &mut report);

    debug!(
        "Lint finished: {} passed, {} warned, {} failed",
        report.passed.len(),
        report.warned.len(),
        report.failed.len()
    );
    report
}

fn check_files_exist(project_dir: &Path, report: &mut LintReport) {
    let any_exists = |group: &[&str]| group.iter().any(|f| project_dir.join(f).is_file());

    for group in FILES_REQUIRED {
        if any_exists(group) {
            report.pass("general-1", format!("File found: {}", group.join(" or ")));
        } else {
            report.fail("general-1", format!("File not found: {}", group.join(" or ")));
        }
    }
    for group in FILES_RECOMMENDED {
        if any_exists(group) {
            report.pass("general-1", format!("File found: {}", group.join(" or ")));
        } else {
            report.warn("general-1", format!("File should be present: {}", group.join(" or ")));
        }
    }
}

fn check_dockerfile(project_dir: &Path, report: &mut LintReport) {
    let path = project_dir.join("Dockerfile");
    let Ok(content) = fs::read_to_string(&path) else {
        return;
    };
    if content.contains("FROM ") {
        report.pass("general-2", "Dockerfile check passed");
    } else {
        report.fail("general-2", "Dockerfile has no FROM instruction");
    }
}

fn is_skipped(entry: &DirEntry) -> bool {
    entry.file_type().is_dir()
        && entry
            .file_name()
            .to_str()
            .map(|name| SKIPPED_DIRS.contains(&name))
            .unwrap_or(false)
}

/// Every regular file below `root` as `(relative path, lossy text)`
fn text_files(root: &Path) -> Vec<(String, String)> {
    let mut files = Vec::new();
    for entry in WalkDir::new(root).into_iter().filter_entry(|e| !is_skipped(e)) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                debug!("Skipping unreadable entry: {}", e);
                continue;
            }
        };
        if !entry.file_type().is_file() {
            continue;
        }
        let Ok(bytes) = fs::read(entry.path()) else {
            continue;
        };
        let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
        files.push((
            relative.display().to_string(),
            String::from_utf8_lossy(&bytes).into_owned(),
        ));
    }
    files.sort();
    files
}

fn check_todos(files: &[(String, String)], report: &mut LintReport) {
    for (name, text) in files {
        for line in text.lines() {
            if let Some(idx) = line.find(TODO_MARKER) {
                let note = line[idx + TODO_MARKER.len()..].trim().trim_end_matches("-->").trim();
                report.warn("general-3", format!("TODO string found in '{}': {}", name, note));
            }
        }
    }
}

/// `{{ name }}` not preceded by `$`
fn find_placeholder(line: &str) -> Option<&str> {
    placeholder()
        .find_iter(line)
        .find(|m| !line[..m.start()].ends_with('$'))
        .map(|m| m.as_str())
}

fn check_placeholders(files: &[(String, String)], report: &mut LintReport) {
    for (name, text) in files {
        for (idx, line) in text.lines().enumerate() {
            if let Some(found) = find_placeholder(line) {
                report.warn(
                    "general-4",
                    format!("Unrendered placeholder in '{}' line {}: {}", name, idx + 1, found),
                );
            }
        }
    }
}

fn check_version_consistency(project_dir: &Path, config: &Config, report: &mut LintReport) {
    let current = &config.bumpversion.current_version;
    if SemanticVersion::parse(current).is_err() {
        report.fail(
            "general-5",
            format!("Cannot check versions: current_version '{}' is malformed", current),
        );
        return;
    }

    let mut existing = Vec::new();
    for (path, policy) in config.tracked_files(project_dir) {
        if path.is_file() {
            existing.push((path, policy));
        } else {
            report.fail("general-5", format!("Tracked file {} does not exist", path.display()));
        }
    }

    match rewrite::check_consistency(current, &existing) {
        Ok(mismatches) => {
            for m in &mismatches {
                let name = m.path.strip_prefix(project_dir).unwrap_or(&m.path);
                report.fail(
                    "general-5",
                    format!(
                        "Version {} in {} line {} does not match {}: {}",
                        m.found,
                        name.display(),
                        m.line_number,
                        m.expected,
                        m.line_text
                    ),
                );
            }
        }
        Err(e) => report.fail("general-5", e.to_string()),
    }

    if !report.has_failed("general-5") {
        report.pass("general-5", "Versions were consistent over all files");
    }
}

fn check_changelog(project_dir: &Path, config: &Config, report: &mut LintReport) {
    let path = config.changelog_path(project_dir);
    let text = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(_) => {
            report.warn("general-6", format!("No changelog found at {}", config.changelog.path));
            return;
        }
    };

    match changelog::validate_str(&text) {
        Ok(()) => report.pass("general-6", "Changelog follows the section format"),
        Err(e) => report.fail("general-6", format!("{}: {}", config.changelog.path, e)),
    }
}

fn check_config(config: &Config, report: &mut LintReport) {
    if let Err(e) = config.current_version() {
        report.fail("general-7", format!("{}: {}", CONFIG_FILE, e));
    }

    let meta_tracked = config
        .bumpversion
        .files_whitelisted
        .values()
        .any(|p| Path::new(p) == Path::new(META_FILE));
    if !meta_tracked {
        report.fail(
            "general-7",
            format!("{} must be listed in [bumpversion.files_whitelisted]", META_FILE),
        );
    }

    if !report.has_failed("general-7") {
        report.pass("general-7", format!("{} passed linting", CONFIG_FILE));
    }
}
