//! Applying a version bump to a project on disk.

use crate::changelog;
use crate::config::{self, Config, CONFIG_FILE};
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::guard;
use crate::rewrite::{self, FilePolicy, LineChange};
use crate::warning::TempletWarning;
use chrono::NaiveDate;
use log::{debug, info};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Parameters of a bump
#[derive(Debug, Clone, PartialEq)]
pub struct BumpRequest {
    pub new_version: String,
    pub allow_downgrade: bool,
    /// Compute the changes without writing anything
    pub dry_run: bool,
    /// Date recorded in the changelog
    pub date: NaiveDate,
}

/// Changes made (or, in a dry run, planned) in one file
#[derive(Debug, Clone, PartialEq)]
pub struct FileRewrite {
    pub path: PathBuf,
    pub policy: FilePolicy,
    pub changes: Vec<LineChange>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BumpOutcome {
    pub previous_version: String,
    pub new_version: String,
    pub files: Vec<FileRewrite>,
    pub changelog_updated: bool,
    pub warnings: Vec<TempletWarning>,
}

/// Replace `path` with `content` through a temporary file in the same
/// directory, keeping the existing permissions.
///
/// A crash between writing and renaming can leave the temporary file behind.
pub fn write_atomically(path: &Path, content: &str) -> Result<()> {
    let dir = path.parent().filter(|p| !p.as_os_str().is_empty()).unwrap_or(Path::new("."));
    let permissions = fs::metadata(path)?.permissions();

    let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
    tmp.write_all(content.as_bytes())?;
    tmp.flush()?;
    fs::set_permissions(tmp.path(), permissions)?;
    tmp.persist(path).map_err(|e| e.error)?;
    Ok(())
}

/// Rewrite the versions of one tracked file
pub fn rewrite_file(
    path: &Path,
    new_version: &str,
    policy: FilePolicy,
    dry_run: bool,
) -> Result<FileRewrite> {
    let text = fs::read_to_string(path)?;
    let rewrite = rewrite::rewrite_text(&text, new_version, policy);

    if rewrite.changed() && !dry_run {
        debug!("Writing {} changed lines to {}", rewrite.changes.len(), path.display());
        write_atomically(path, &rewrite.text)?;
    }

    Ok(FileRewrite {
        path: path.to_path_buf(),
        policy,
        changes: rewrite.changes,
    })
}

/// Bump the project in `project_dir` to `request.new_version`.
///
/// Validates the transition, rewrites every tracked file, stores the new
/// `current_version` and records the bump in the changelog when one exists.
///
/// Every tracked file must exist before anything is written. A file that
/// fails to read or write later on still leaves the earlier ones rewritten.
pub fn bump_project(project_dir: &Path, config: &Config, request: &BumpRequest) -> Result<BumpOutcome> {
    let current = &config.bumpversion.current_version;
    guard::validate_transition(current, &request.new_version, request.allow_downgrade)?;
    let new_version = SemanticVersion::parse(&request.new_version)?;

    let tracked = config.tracked_files(project_dir);
    for (path, _) in &tracked {
        fs::metadata(path)?;
    }

    info!("Bumping version from {} to {}", current, new_version);

    let mut warnings = Vec::new();
    let mut files = Vec::new();
    for (path, policy) in tracked {
        let file = rewrite_file(&path, &request.new_version, policy, request.dry_run)?;
        if file.changes.is_empty() {
            warnings.push(TempletWarning::FileUnchanged { path: file.path.clone() });
        }
        files.push(file);
    }

    if !request.dry_run {
        config::save_current_version(&project_dir.join(CONFIG_FILE), &request.new_version)?;
    }

    let changelog_path = config.changelog_path(project_dir);
    let mut changelog_updated = false;
    if changelog_path.is_file() {
        let text = fs::read_to_string(&changelog_path)?;
        match changelog::record_bump(&text, &new_version, request.date) {
            Some(updated) => {
                if !request.dry_run && updated != text {
                    write_atomically(&changelog_path, &updated)?;
                }
                changelog_updated = updated != text;
            }
            None => {
                let latest = changelog::latest_section(&text)
                    .map(|s| s.version.to_string())
                    .unwrap_or_default();
                warnings.push(TempletWarning::ChangelogNotUpdated {
                    version: request.new_version.clone(),
                    latest,
                });
            }
        }
    } else {
        debug!("No changelog at {}", changelog_path.display());
        warnings.push(TempletWarning::ChangelogMissing { path: changelog_path });
    }

    Ok(BumpOutcome {
        previous_version: current.clone(),
        new_version: request.new_version.clone(),
        files,
        changelog_updated,
        warnings,
    })
}
