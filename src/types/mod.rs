//! Core domain types: hashes, version tags, and target specifications.

pub mod hash;
pub mod target;
pub mod version;

pub use hash::{Sha1Hash, Sha256Hash};
pub use target::{BinaryName, RepositorySlug, TargetRelease, parse_target_releases};
pub use version::{ExactSemanticVersion, SemanticVersion};
