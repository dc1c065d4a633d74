//! Domain types - versions and template handles, independent of the filesystem

pub mod handle;
pub mod version;

pub use handle::{Domain, Handle};
pub use version::{SemanticVersion, SNAPSHOT_SUFFIX};
