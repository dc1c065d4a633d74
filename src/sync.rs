//! Decides whether a generated project should be re-synced with its template.
//!
//! Only the decision lives here. Checking out the template branch, diffing
//! and opening a pull request are left to git tooling.

use crate::config::{self, Config};
pub use crate::config::SyncLevel;
use crate::domain::SemanticVersion;
use crate::error::Result;
use crate::registry::Registry;
use log::debug;
use std::path::Path;

/// How the template moved since the project last synced
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TemplateUpdate {
    None,
    Patch,
    Minor,
    Major,
}

/// Compare the template version the project last synced with against the
/// current template version. Snapshot flags are ignored; a lower current
/// version counts as no update.
pub fn template_update(last: &SemanticVersion, current: &SemanticVersion) -> TemplateUpdate {
    let (last, current) = (last.release(), current.release());
    if current.major > last.major {
        TemplateUpdate::Major
    } else if current.major == last.major && current.minor > last.minor {
        TemplateUpdate::Minor
    } else if current.major == last.major
        && current.minor == last.minor
        && current.patch > last.patch
    {
        TemplateUpdate::Patch
    } else {
        TemplateUpdate::None
    }
}

/// Whether an update of this size reaches the configured level.
///
/// `major` syncs on major updates only, `minor` on major and minor,
/// `patch` on any increase.
pub fn should_sync(level: SyncLevel, last: &SemanticVersion, current: &SemanticVersion) -> bool {
    match (level, template_update(last, current)) {
        (_, TemplateUpdate::None) => false,
        (SyncLevel::Patch, _) => true,
        (SyncLevel::Minor, update) => update != TemplateUpdate::Patch,
        (SyncLevel::Major, update) => update == TemplateUpdate::Major,
    }
}

/// Outcome of checking a project against the catalogue
#[derive(Debug, Clone, PartialEq)]
pub struct SyncDecision {
    pub handle: String,
    pub last_synced: SemanticVersion,
    pub available: SemanticVersion,
    pub update: TemplateUpdate,
    pub level: SyncLevel,
    pub enabled: bool,
    pub should_sync: bool,
}

/// Check the project in `project_dir` against the template catalogue
pub fn check_project(project_dir: &Path, config: &Config, registry: &Registry) -> Result<SyncDecision> {
    let meta = config::load_project_meta(project_dir)?;
    let last_synced = meta.template_version()?;
    let available = registry.template_version(&meta.template_handle)?;
    let level = config.sync.level;

    debug!(
        "Template {}: last synced {}, available {}, level {}",
        meta.template_handle, last_synced, available, level
    );

    Ok(SyncDecision {
        handle: meta.template_handle,
        update: template_update(&last_synced, &available),
        should_sync: config.sync.enabled && should_sync(level, &last_synced, &available),
        last_synced,
        available,
        level,
        enabled: config.sync.enabled,
    })
}
