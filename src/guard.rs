//! Version transition rules.
//!
//! Decides whether moving a project from one version to another is legal,
//! and how large the step is. Both checks are pure.

use crate::domain::SemanticVersion;
use crate::error::VersionError;
use std::fmt;

/// Size of a version step, used to warn about unusual bumps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BumpKind {
    Major,
    Minor,
    Patch,
    SnapshotResolve,
    Unknown,
}

impl fmt::Display for BumpKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            BumpKind::Major => "major",
            BumpKind::Minor => "minor",
            BumpKind::Patch => "patch",
            BumpKind::SnapshotResolve => "snapshot release",
            BumpKind::Unknown => "unusual",
        };
        write!(f, "{}", name)
    }
}

/// Check that `proposed` may replace `current`.
///
/// Rules, applied in order:
/// 1. both strings must be valid versions;
/// 2. the versions must differ, textually and numerically;
/// 3. a snapshot may only become its own release (`1.0.0-SNAPSHOT` -> `1.0.0`);
/// 4. without `allow_downgrade`, the new version must be higher than the
///    current one. Turning a release into its own snapshot
///    (`1.0.0` -> `1.0.0-SNAPSHOT`) counts as a downgrade.
pub fn validate_transition(
    current: &str,
    proposed: &str,
    allow_downgrade: bool,
) -> Result<(), VersionError> {
    let from = SemanticVersion::parse(current)?;
    let to = SemanticVersion::parse(proposed)?;

    // `1.0.0` and `1.0.00` are the same version spelled differently.
    if current == proposed || from == to {
        return Err(VersionError::NoOpVersion {
            version: proposed.to_string(),
        });
    }

    if from.is_snapshot && to != from.release() {
        return Err(VersionError::IllegalSnapshotResolution {
            current: current.to_string(),
            proposed: proposed.to_string(),
            release: from.release().to_string(),
        });
    }

    // Snapshots sort below their release, so `1.0.0 -> 1.0.0-SNAPSHOT` lands here too.
    if !allow_downgrade && to < from {
        return Err(VersionError::IllegalDowngrade {
            current: current.to_string(),
            proposed: proposed.to_string(),
        });
    }

    Ok(())
}

/// Classify the step from `current` to `proposed`.
///
/// Advisory only: `Unknown` means the caller should ask for confirmation,
/// not that the step is illegal. Malformed input classifies as `Unknown`.
pub fn classify_bump_size(current: &str, proposed: &str) -> BumpKind {
    let (from, to) = match (
        SemanticVersion::parse(current),
        SemanticVersion::parse(proposed),
    ) {
        (Ok(from), Ok(to)) => (from, to),
        _ => return BumpKind::Unknown,
    };

    if from.core() == to.core() && from.is_snapshot != to.is_snapshot {
        return BumpKind::SnapshotResolve;
    }

    let next = |n: u64| n.checked_add(1);

    if Some(to.major) == next(from.major) && to.minor == 0 && to.patch == 0 {
        BumpKind::Major
    } else if to.major == from.major && Some(to.minor) == next(from.minor) && to.patch == 0 {
        BumpKind::Minor
    } else if to.major == from.major
        && to.minor == from.minor
        && Some(to.patch) == next(from.patch)
    {
        BumpKind::Patch
    } else {
        BumpKind::Unknown
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transition_accepts_increase() {
        assert!(validate_transition("1.2.3", "1.2.4", false).is_ok());
        assert!(validate_transition("1.2.3", "1.3.0", false).is_ok());
        assert!(validate_transition("1.2.3", "2.0.0", false).is_ok());
        assert!(validate_transition("1.2.3", "1.2.10", false).is_ok());
    }

    #[test]
    fn test_transition_rejects_malformed() {
        assert!(matches!(
            validate_transition("1.2", "1.2.4", false),
            Err(VersionError::MalformedVersion { .. })
        ));
        assert!(matches!(
            validate_transition("1.2.3", "1.2.3.4", true),
            Err(VersionError::MalformedVersion { .. })
        ));
    }

    #[test]
    fn test_transition_rejects_noop() {
        for v in ["0.0.0", "1.2.3", "1.2.3-SNAPSHOT"] {
            assert!(matches!(
                validate_transition(v, v, false),
                Err(VersionError::NoOpVersion { .. })
            ));
            assert!(matches!(
                validate_transition(v, v, true),
                Err(VersionError::NoOpVersion { .. })
            ));
        }
    }

    #[test]
    fn test_transition_rejects_numerically_equal() {
        assert!(matches!(
            validate_transition("1.0.0", "1.0.00", true),
            Err(VersionError::NoOpVersion { .. })
        ));
    }

    #[test]
    fn test_snapshot_resolves_to_own_release() {
        assert!(validate_transition("1.0.0-SNAPSHOT", "1.0.0", false).is_ok());
    }

    #[test]
    fn test_snapshot_cannot_jump() {
        assert!(matches!(
            validate_transition("1.0.0-SNAPSHOT", "2.0.0", false),
            Err(VersionError::IllegalSnapshotResolution { .. })
        ));
        assert!(matches!(
            validate_transition("1.0.0-SNAPSHOT", "0.9.0", true),
            Err(VersionError::IllegalSnapshotResolution { .. })
        ));
        assert!(matches!(
            validate_transition("1.0.0-SNAPSHOT", "1.0.1-SNAPSHOT", false),
            Err(VersionError::IllegalSnapshotResolution { .. })
        ));
    }

    #[test]
    fn test_downgrade_needs_flag() {
        assert!(matches!(
            validate_transition("1.2.3", "1.2.2", false),
            Err(VersionError::IllegalDowngrade { .. })
        ));
        assert!(validate_transition("1.2.3", "1.2.2", true).is_ok());
    }

    #[test]
    fn test_release_to_own_snapshot_needs_flag() {
        assert!(matches!(
            validate_transition("1.0.0", "1.0.0-SNAPSHOT", false),
            Err(VersionError::IllegalDowngrade { .. })
        ));
        assert!(validate_transition("1.0.0", "1.0.0-SNAPSHOT", true).is_ok());
    }

    #[test]
    fn test_release_to_next_snapshot_allowed() {
        assert!(validate_transition("1.0.0", "1.1.0-SNAPSHOT", false).is_ok());
        assert!(validate_transition("1.0.0", "1.0.1-SNAPSHOT", false).is_ok());
    }

    #[test]
    fn test_classify_bump_size() {
        assert_eq!(classify_bump_size("1.2.3", "2.0.0"), BumpKind::Major);
        assert_eq!(classify_bump_size("1.2.3", "1.3.0"), BumpKind::Minor);
        assert_eq!(classify_bump_size("1.2.3", "1.2.4"), BumpKind::Patch);
        assert_eq!(
            classify_bump_size("1.2.3-SNAPSHOT", "1.2.3"),
            BumpKind::SnapshotResolve
        );
        assert_eq!(classify_bump_size("1.2.3", "1.2.5"), BumpKind::Unknown);
        assert_eq!(classify_bump_size("1.2.3", "3.0.0"), BumpKind::Unknown);
        assert_eq!(classify_bump_size("1.2.3", "2.0.1"), BumpKind::Unknown);
        assert_eq!(classify_bump_size("garbage", "1.0.0"), BumpKind::Unknown);
    }

    #[test]
    fn test_classify_ignores_snapshot_flag_of_target() {
        assert_eq!(
            classify_bump_size("1.2.3", "1.3.0-SNAPSHOT"),
            BumpKind::Minor
        );
    }
}
