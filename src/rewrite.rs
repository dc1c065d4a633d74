//! Line-oriented version substitution.
//!
//! Every tracked file belongs to one of two policies. Whitelisted files have
//! all their versions bumped except on lines tagged `<<NO_BUMP>>`;
//! blacklisted files are left alone except on lines tagged `<<FORCE_BUMP>>`.

use crate::error::Result;
use log::debug;
use regex::Regex;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

/// Marker that keeps a line of a whitelisted file untouched
pub const NO_BUMP_MARKER: &str = "<<NO_BUMP>>";

/// Marker that opts a line of a blacklisted file into bumping
pub const FORCE_BUMP_MARKER: &str = "<<FORCE_BUMP>>";

fn version_candidates() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d+\.\d+\.\d+(?:-SNAPSHOT)?").expect("version regex is valid"))
}

/// Substitution policy of a tracked file
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FilePolicy {
    Whitelist,
    Blacklist,
}

impl FilePolicy {
    /// Whether versions on `line` may be rewritten under this policy
    pub fn is_eligible(&self, line: &str) -> bool {
        match self {
            FilePolicy::Whitelist => !line.contains(NO_BUMP_MARKER),
            FilePolicy::Blacklist => line.contains(FORCE_BUMP_MARKER),
        }
    }
}

/// Byte ranges of every standalone version in `line`.
///
/// A candidate directly preceded or followed by a `.` is part of a longer
/// dotted sequence (`1.2.3.4`, `10.0.0.1`) and is skipped.
pub fn find_versions(line: &str) -> Vec<Range<usize>> {
    version_candidates()
        .find_iter(line)
        .filter(|m| {
            let before = line[..m.start()].chars().next_back();
            let after = line[m.end()..].chars().next();
            before != Some('.') && after != Some('.')
        })
        .map(|m| m.range())
        .collect()
}

/// One line altered by a rewrite, 1-based
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineChange {
    pub line_number: usize,
    pub before: String,
    pub after: String,
}

/// Result of rewriting a text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewrite {
    pub text: String,
    pub changes: Vec<LineChange>,
}

impl Rewrite {
    pub fn changed(&self) -> bool {
        !self.changes.is_empty()
    }
}

/// Rewrite `text`, replacing the first standalone version on every
/// eligible line with `new_version`. Line endings are preserved.
pub fn rewrite_text(text: &str, new_version: &str, policy: FilePolicy) -> Rewrite {
    let mut out = String::with_capacity(text.len());
    let mut changes = Vec::new();

    for (idx, line) in text.split_inclusive('\n').enumerate() {
        let replaced = if policy.is_eligible(line) {
            find_versions(line).first().map(|range| {
                let mut updated = String::with_capacity(line.len());
                updated.push_str(&line[..range.start]);
                updated.push_str(new_version);
                updated.push_str(&line[range.end..]);
                updated
            })
        } else {
            None
        };

        match replaced {
            Some(updated) if updated != line => {
                changes.push(LineChange {
                    line_number: idx + 1,
                    before: line.trim_end().to_string(),
                    after: updated.trim_end().to_string(),
                });
                out.push_str(&updated);
            }
            _ => out.push_str(line),
        }
    }

    Rewrite { text: out, changes }
}

/// Rewrite versions in `text`; returns the new text and whether any line changed.
pub fn rewrite_versions(text: &str, new_version: &str, policy: FilePolicy) -> (String, bool) {
    let rewrite = rewrite_text(text, new_version, policy);
    let changed = rewrite.changed();
    (rewrite.text, changed)
}

/// A version in a tracked file that disagrees with the project version
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mismatch {
    pub path: PathBuf,
    pub line_number: usize,
    pub line_text: String,
    pub found: String,
    pub expected: String,
}

/// Report every eligible version in `text` that differs from `current_version`.
pub fn check_text(
    current_version: &str,
    path: &Path,
    text: &str,
    policy: FilePolicy,
) -> Vec<Mismatch> {
    let mut mismatches = Vec::new();

    for (idx, line) in text.lines().enumerate() {
        if !policy.is_eligible(line) {
            continue;
        }
        for range in find_versions(line) {
            let found = &line[range];
            if found != current_version {
                mismatches.push(Mismatch {
                    path: path.to_path_buf(),
                    line_number: idx + 1,
                    line_text: line.trim().to_string(),
                    found: found.to_string(),
                    expected: current_version.to_string(),
                });
            }
        }
    }

    mismatches
}

/// Scan each `(path, policy)` entry for versions that disagree with
/// `current_version`. Read-only; unreadable files are reported as errors.
pub fn check_consistency(
    current_version: &str,
    file_entries: &[(PathBuf, FilePolicy)],
) -> Result<Vec<Mismatch>> {
    let mut mismatches = Vec::new();
    for (path, policy) in file_entries {
        debug!("Checking versions in {} ({:?})", path.display(), policy);
        let text = fs::read_to_string(path)?;
        mismatches.extend(check_text(current_version, path, &text, *policy));
    }
    Ok(mismatches)
}
