use thiserror::Error;

/// Rejections produced while checking a proposed version change.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VersionError {
    #[error("'{input}' is not a valid version (expected X.Y.Z or X.Y.Z-SNAPSHOT)")]
    MalformedVersion { input: String },

    #[error("the new version {version} is equal to the current version")]
    NoOpVersion { version: String },

    #[error("snapshot {current} can only be released as {release}, not {proposed}")]
    IllegalSnapshotResolution {
        current: String,
        proposed: String,
        release: String,
    },

    #[error("{proposed} is lower than {current}; pass --downgrade to force it")]
    IllegalDowngrade { current: String, proposed: String },
}

/// Structural problems found in a changelog document.
///
/// Line numbers are 1-based.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChangelogError {
    #[error("no CHANGELOG title line found")]
    MissingTitle,

    #[error("line {line}: title must be over- and underlined with {expected} '=' characters")]
    HeaderUnderlineMismatch { line: usize, expected: usize },

    #[error("line {line}: section '{section}' must be underlined with {expected} '-' characters")]
    SectionUnderlineMismatch {
        line: usize,
        section: String,
        expected: usize,
    },

    #[error("section {version} is missing the {marker} subsection")]
    SubsectionMissing { version: String, marker: String },

    #[error("section {version}: {marker} must come after {previous}")]
    SubsectionOrderViolation {
        version: String,
        marker: String,
        previous: String,
    },

    #[error("line {line}: section {version} is not older than the section above it ({previous})")]
    NonMonotonicVersionOrder {
        line: usize,
        version: String,
        previous: String,
    },

    #[error("changelog contains no version sections")]
    NoSectionsFound,
}

/// Unified error type for templet operations
#[derive(Error, Debug)]
pub enum TempletError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Template registry error: {0}")]
    Registry(String),

    #[error("Project error: {0}")]
    Project(String),

    #[error("Version error: {0}")]
    Version(#[from] VersionError),

    #[error("Changelog error: {0}")]
    Changelog(#[from] ChangelogError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),
}

/// Convenience type alias for Results in templet
pub type Result<T> = std::result::Result<T, TempletError>;

impl TempletError {
    /// Create a configuration error with context
    pub fn config(msg: impl Into<String>) -> Self {
        TempletError::Config(msg.into())
    }

    /// Create a registry error with context
    pub fn registry(msg: impl Into<String>) -> Self {
        TempletError::Registry(msg.into())
    }

    /// Create a project error with context
    pub fn project(msg: impl Into<String>) -> Self {
        TempletError::Project(msg.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = TempletError::config("missing templet.toml");
        assert_eq!(
            err.to_string(),
            "Configuration error: missing templet.toml"
        );
    }

    #[test]
    fn test_error_from_io() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: TempletError = io_err.into();
        assert!(err.to_string().contains("I/O error"));
    }

    #[test]
    fn test_version_error_wraps() {
        let err: TempletError = VersionError::NoOpVersion {
            version: "1.0.0".to_string(),
        }
        .into();
        assert!(err.to_string().starts_with("Version error"));
        assert!(err.to_string().contains("1.0.0"));
    }

    #[test]
    fn test_changelog_error_mentions_line() {
        let err = ChangelogError::SectionUnderlineMismatch {
            line: 6,
            section: "1.0.0 (2020-01-01)".to_string(),
            expected: 18,
        };
        let msg = err.to_string();
        assert!(msg.contains("line 6"));
        assert!(msg.contains("18"));
    }

    #[test]
    fn test_error_messages_are_descriptive() {
        let error_pairs = vec![
            (TempletError::config("x"), "Configuration error"),
            (TempletError::registry("x"), "Template registry error"),
            (TempletError::project("x"), "Project error"),
        ];

        for (err, expected_prefix) in error_pairs {
            let msg = err.to_string();
            assert!(
                msg.starts_with(expected_prefix),
                "Error message should start with '{}', but got '{}'",
                expected_prefix,
                msg
            );
        }
    }
}
