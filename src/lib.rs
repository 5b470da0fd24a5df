//! grab - pinned installs of single-binary tools from GitHub releases.
//!
//! # Overview
//!
//! `grab` takes target specifications of the form
//! `owner/repo[/binary]@tag[:sha256-<checksum>]`, resolves each one to the
//! concrete release asset for the running machine, and installs the
//! binary under `~/.grab/bin`.
//!
//! # Architecture
//!
//! - **Pure resolution core**: parsing ([`types::target`]), version
//!   pinning ([`resolver`]), and asset selection ([`assets`]) are
//!   synchronous, deterministic functions; all network access sits behind
//!   the [`registry`] traits.
//! - **Newtypes**: `SemanticVersion`/`ExactSemanticVersion`, `Sha1Hash`,
//!   `Sha256Hash`, and `BinaryName` make malformed values unrepresentable
//!   past their constructors.
//! - **Closed platform enums**: `TargetTriple` and `TargetDuple` are
//!   enumerations, so platform branches are exhaustiveness-checked.
//!
//! # Directory Layout
//!
//! ```text
//! ~/.grab/
//! ├── bin/        # Installed binaries
//! └── cache/      # Download staging area
//! ```

pub mod assets;
pub mod io;
pub mod ops;
pub mod platform;
pub mod registry;
pub mod resolver;
pub mod types;

use dirs::home_dir;
use std::path::PathBuf;

/// Returns the primary configuration directory, or None if the user's home cannot be resolved.
pub fn try_grab_home() -> Option<PathBuf> {
    if let Ok(val) = std::env::var("GRAB_HOME") {
        return Some(PathBuf::from(val));
    }
    home_dir().map(|h| h.join(".grab"))
}

/// Returns the canonical grab home directory (`~/.grab`).
///
/// # Panics
/// Panics if the home directory cannot be determined.
pub fn grab_home() -> PathBuf {
    try_grab_home().expect("Could not determine home directory")
}

/// Binary installation target: ~/.grab/bin
pub fn bin_path() -> PathBuf {
    grab_home().join("bin")
}

/// Download staging area: ~/.grab/cache
pub fn cache_path() -> PathBuf {
    grab_home().join("cache")
}

/// Extract the filename from a URL.
///
/// # Example
///
/// ```
/// use grab::filename_from_url;
///
/// assert_eq!(filename_from_url("https://example.com/path/to/tool.zip"), "tool.zip");
/// assert_eq!(filename_from_url(""), "");
/// ```
pub fn filename_from_url(url: &str) -> &str {
    url.split('/').next_back().unwrap_or("")
}

/// User Agent string
pub const USER_AGENT: &str = concat!("grab/", env!("CARGO_PKG_VERSION"));
