use crate::error::{TempletError, VersionError};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Suffix marking a pre-release that can only be resolved to its own release.
pub const SNAPSHOT_SUFFIX: &str = "-SNAPSHOT";

/// A project version of the form `major.minor.patch[-SNAPSHOT]`.
///
/// Ordering follows semver precedence, so a snapshot sorts directly below
/// its release (`1.0.0-SNAPSHOT < 1.0.0 < 1.0.1-SNAPSHOT`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SemanticVersion {
    pub major: u64,
    pub minor: u64,
    pub patch: u64,
    pub is_snapshot: bool,
}

impl SemanticVersion {
    /// Create a release version
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            major,
            minor,
            patch,
            is_snapshot: false,
        }
    }

    /// Create the snapshot of a version
    pub fn snapshot(major: u64, minor: u64, patch: u64) -> Self {
        SemanticVersion {
            is_snapshot: true,
            ..SemanticVersion::new(major, minor, patch)
        }
    }

    /// Parse a version string. Only the exact `X.Y.Z` and `X.Y.Z-SNAPSHOT`
    /// forms are accepted; prefixes, surrounding whitespace and extra
    /// components are rejected rather than coerced.
    pub fn parse(input: &str) -> Result<Self, VersionError> {
        let malformed = || VersionError::MalformedVersion {
            input: input.to_string(),
        };

        let (core, is_snapshot) = match input.strip_suffix(SNAPSHOT_SUFFIX) {
            Some(core) => (core, true),
            None => (input, false),
        };

        let parts: Vec<&str> = core.split('.').collect();
        if parts.len() != 3 {
            return Err(malformed());
        }

        let number = |part: &str| -> Result<u64, VersionError> {
            if part.is_empty() || !part.chars().all(|c| c.is_ascii_digit()) {
                return Err(malformed());
            }
            part.parse::<u64>().map_err(|_| malformed())
        };

        Ok(SemanticVersion {
            major: number(parts[0])?,
            minor: number(parts[1])?,
            patch: number(parts[2])?,
            is_snapshot,
        })
    }

    /// The same version with the snapshot flag cleared
    pub fn release(&self) -> Self {
        SemanticVersion {
            is_snapshot: false,
            ..*self
        }
    }

    /// The numeric `(major, minor, patch)` triple
    pub fn core(&self) -> (u64, u64, u64) {
        (self.major, self.minor, self.patch)
    }

    /// Convert into a `semver::Version`, mapping the snapshot flag to a
    /// `SNAPSHOT` pre-release identifier.
    pub fn to_semver(&self) -> semver::Version {
        let mut version = semver::Version::new(self.major, self.minor, self.patch);
        if self.is_snapshot {
            version.pre = semver::Prerelease::new("SNAPSHOT").unwrap_or(semver::Prerelease::EMPTY);
        }
        version
    }
}

impl Ord for SemanticVersion {
    fn cmp(&self, other: &Self) -> Ordering {
        self.to_semver().cmp(&other.to_semver())
    }
}

impl PartialOrd for SemanticVersion {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for SemanticVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.patch)?;
        if self.is_snapshot {
            write!(f, "{}", SNAPSHOT_SUFFIX)?;
        }
        Ok(())
    }
}

impl FromStr for SemanticVersion {
    type Err = TempletError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(SemanticVersion::parse(s)?)
    }
}
