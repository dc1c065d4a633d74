use crate::bump;
use crate::domain::SemanticVersion;
use crate::error::{Result, TempletError};
use crate::rewrite::FilePolicy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// Name of the per-project configuration file
pub const CONFIG_FILE: &str = "templet.toml";

/// Name of the project metadata file written when a project is generated
pub const META_FILE: &str = ".templet.toml";

/// Changelog location used when `[changelog]` does not name one
pub const DEFAULT_CHANGELOG: &str = "CHANGELOG.rst";

/// Represents the complete configuration of a generated project.
///
/// Holds the version bookkeeping, sync behaviour and changelog location.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Config {
    pub bumpversion: BumpVersionConfig,

    #[serde(default)]
    pub sync: SyncConfig,

    #[serde(default)]
    pub changelog: ChangelogConfig,
}

/// The `[bumpversion]` table.
///
/// Tracked files are keyed by a free-form label; values are paths relative
/// to the project root.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BumpVersionConfig {
    pub current_version: String,

    #[serde(default)]
    pub files_whitelisted: BTreeMap<String, String>,

    #[serde(default)]
    pub files_blacklisted: BTreeMap<String, String>,
}

/// How far a template must have moved before a sync is proposed.
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SyncLevel {
    Patch,
    #[default]
    Minor,
    Major,
}

impl fmt::Display for SyncLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            SyncLevel::Patch => "patch",
            SyncLevel::Minor => "minor",
            SyncLevel::Major => "major",
        };
        write!(f, "{}", name)
    }
}

fn default_sync_enabled() -> bool {
    true
}

/// The `[sync]` table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct SyncConfig {
    #[serde(default = "default_sync_enabled")]
    pub enabled: bool,

    #[serde(default)]
    pub level: SyncLevel,
}

impl Default for SyncConfig {
    fn default() -> Self {
        SyncConfig {
            enabled: default_sync_enabled(),
            level: SyncLevel::default(),
        }
    }
}

fn default_changelog_path() -> String {
    DEFAULT_CHANGELOG.to_string()
}

/// The `[changelog]` table
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ChangelogConfig {
    #[serde(default = "default_changelog_path")]
    pub path: String,
}

impl Default for ChangelogConfig {
    fn default() -> Self {
        ChangelogConfig {
            path: default_changelog_path(),
        }
    }
}

impl Config {
    /// Parse the configured current version
    pub fn current_version(&self) -> Result<SemanticVersion> {
        Ok(SemanticVersion::parse(&self.bumpversion.current_version)?)
    }

    /// Every tracked file resolved against `project_dir`, whitelisted first
    pub fn tracked_files(&self, project_dir: &Path) -> Vec<(PathBuf, FilePolicy)> {
        let whitelisted = self
            .bumpversion
            .files_whitelisted
            .values()
            .map(|p| (project_dir.join(p), FilePolicy::Whitelist));
        let blacklisted = self
            .bumpversion
            .files_blacklisted
            .values()
            .map(|p| (project_dir.join(p), FilePolicy::Blacklist));
        whitelisted.chain(blacklisted).collect()
    }

    pub fn changelog_path(&self, project_dir: &Path) -> PathBuf {
        project_dir.join(&self.changelog.path)
    }
}

/// Loads the project configuration.
///
/// Resolution order:
/// 1. `config_path`, when given
/// 2. `templet.toml` in `project_dir`
///
/// # Returns
/// * `Ok(Config)` - Parsed configuration
/// * `Err` - If no file is found, or it cannot be read or parsed
pub fn load_config(project_dir: &Path, config_path: Option<&Path>) -> Result<Config> {
    let path = match config_path {
        Some(path) => path.to_path_buf(),
        None => project_dir.join(CONFIG_FILE),
    };

    if !path.is_file() {
        return Err(TempletError::config(format!(
            "{} not found. Is this a templet project?",
            path.display()
        )));
    }

    let config_str = fs::read_to_string(&path)?;
    let config: Config = toml::from_str(&config_str)?;
    Ok(config)
}

/// Rewrites `current_version` in `templet.toml`, leaving the rest of the
/// file (comments and key order included) as it is. The file is replaced
/// through a temporary file like every other project file.
pub fn save_current_version(config_path: &Path, new_version: &str) -> Result<()> {
    let content = fs::read_to_string(config_path)?;
    let re = Regex::new(r#"(?m)^(\s*current_version\s*=\s*)"[^"]*""#)
        .map_err(|e| TempletError::config(e.to_string()))?;

    if !re.is_match(&content) {
        return Err(TempletError::config(format!(
            "no current_version entry in {}",
            config_path.display()
        )));
    }

    let updated = re.replacen(&content, 1, |caps: &regex::Captures| {
        format!("{}\"{}\"", &caps[1], new_version)
    });
    bump::write_atomically(config_path, &updated)
}

/// Contents of `.templet.toml`: which template produced the project.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct ProjectMeta {
    pub template_handle: String,

    /// Template version the project was created with or last synced to
    pub template_version: String,

    #[serde(default)]
    pub project_name: Option<String>,

    /// Project version, kept in step by `bump-version`
    #[serde(default)]
    pub project_version: Option<String>,
}

impl ProjectMeta {
    pub fn template_version(&self) -> Result<SemanticVersion> {
        Ok(SemanticVersion::parse(self.template_version.trim())?)
    }
}

/// Loads `.templet.toml` from the project root
pub fn load_project_meta(project_dir: &Path) -> Result<ProjectMeta> {
    let path = project_dir.join(META_FILE);
    if !path.is_file() {
        return Err(TempletError::project(format!(
            "No {} found at {}. Is this a templet project?",
            META_FILE,
            project_dir.display()
        )));
    }
    let meta: ProjectMeta = toml::from_str(&fs::read_to_string(path)?)?;
    Ok(meta)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
# project settings
[bumpversion]
current_version = "0.1.0"

[bumpversion.files_whitelisted]
dot_templet = ".templet.toml"
init = "src/demo/__init__.py"

[bumpversion.files_blacklisted]
pyproject = "pyproject.toml"

[sync]
enabled = false
level = "major"
"#;

    #[test]
    fn test_parse_config() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(config.bumpversion.current_version, "0.1.0");
        assert_eq!(config.bumpversion.files_whitelisted.len(), 2);
        assert!(!config.sync.enabled);
        assert_eq!(config.sync.level, SyncLevel::Major);
        assert_eq!(config.changelog.path, DEFAULT_CHANGELOG);
    }

    #[test]
    fn test_sync_defaults() {
        let config: Config =
            toml::from_str("[bumpversion]\ncurrent_version = \"1.0.0\"\n").unwrap();
        assert!(config.sync.enabled);
        assert_eq!(config.sync.level, SyncLevel::Minor);
        assert!(config.bumpversion.files_blacklisted.is_empty());
    }

    #[test]
    fn test_invalid_sync_level_rejected() {
        let result: std::result::Result<Config, _> = toml::from_str(
            "[bumpversion]\ncurrent_version = \"1.0.0\"\n[sync]\nlevel = \"micro\"\n",
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_tracked_files_policies() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        let files = config.tracked_files(Path::new("/p"));
        assert_eq!(files.len(), 3);
        assert_eq!(
            files
                .iter()
                .filter(|(_, policy)| *policy == FilePolicy::Blacklist)
                .count(),
            1
        );
        assert!(files.contains(&(PathBuf::from("/p/pyproject.toml"), FilePolicy::Blacklist)));
    }

    #[test]
    fn test_current_version_parsed() {
        let config: Config = toml::from_str(SAMPLE).unwrap();
        assert_eq!(
            config.current_version().unwrap(),
            SemanticVersion::new(0, 1, 0)
        );
    }

    #[test]
    fn test_sync_level_display() {
        assert_eq!(SyncLevel::Patch.to_string(), "patch");
        assert_eq!(SyncLevel::Major.to_string(), "major");
    }
}
