use std::fmt;
use std::path::PathBuf;

/// Non-fatal conditions met while bumping or checking a project.
/// These are reported to the user but do not stop the command.
#[derive(Debug, Clone, PartialEq)]
pub enum TempletWarning {
    /// The proposed version skips numbers or resets components unusually
    UnusualBumpSize { current: String, proposed: String },
    /// A tracked file had no eligible version to rewrite
    FileUnchanged { path: PathBuf },
    /// No changelog at the configured location
    ChangelogMissing { path: PathBuf },
    /// The changelog already has a section at or above the new version
    ChangelogNotUpdated { version: String, latest: String },
    /// `[sync] enabled = false` in the project config
    SyncDisabled,
}

impl fmt::Display for TempletWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TempletWarning::UnusualBumpSize { current, proposed } => {
                write!(
                    f,
                    "Bumping from {} to {} is not a plain major, minor or patch step",
                    current, proposed
                )
            }
            TempletWarning::FileUnchanged { path } => {
                write!(f, "No version was changed in {}", path.display())
            }
            TempletWarning::ChangelogMissing { path } => {
                write!(f, "No changelog at {}, nothing recorded", path.display())
            }
            TempletWarning::ChangelogNotUpdated { version, latest } => {
                write!(
                    f,
                    "Changelog not updated: {} is not newer than its latest section {}",
                    version, latest
                )
            }
            TempletWarning::SyncDisabled => {
                write!(f, "Syncing is disabled for this project")
            }
        }
    }
}
