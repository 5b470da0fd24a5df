//! Platform identifiers for release assets.
//!
//! Release assets name their platform in one of two styles: a target
//! triple (`aarch64-apple-darwin`) or a duple (`darwin-arm64` /
//! `darwin_arm64`). Both are closed enumerations here so platform-specific
//! branches get exhaustiveness checking instead of string comparisons.

use serde::Serialize;
use thiserror::Error;

/// Unrecognized OS or architecture; nothing can be installed for it.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PlatformError {
    #[error("Unsupported architecture: {0}")]
    UnsupportedArch(String),

    #[error("Unsupported operating system: {0}")]
    UnsupportedOs(String),
}

/// `<arch>-<vendor>-<os>` style platform identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetTriple {
    Aarch64AppleDarwin,
    Aarch64UnknownLinuxMusl,
    X8664AppleDarwin,
    X8664UnknownLinuxMusl,
}

impl TargetTriple {
    /// Every supported triple, in the order suffix stripping tries them.
    pub const ALL: [Self; 4] = [
        Self::Aarch64AppleDarwin,
        Self::Aarch64UnknownLinuxMusl,
        Self::X8664AppleDarwin,
        Self::X8664UnknownLinuxMusl,
    ];

    /// Build the triple for an architecture (`arm64`/`x64`) and operating
    /// system (`darwin`/`linux`) pair.
    pub fn build(architecture: &str, operating_system: &str) -> Result<Self, PlatformError> {
        let arm = match architecture {
            "arm64" => true,
            "x64" => false,
            other => return Err(PlatformError::UnsupportedArch(other.to_string())),
        };
        match operating_system {
            "darwin" => Ok(if arm {
                Self::Aarch64AppleDarwin
            } else {
                Self::X8664AppleDarwin
            }),
            "linux" => Ok(if arm {
                Self::Aarch64UnknownLinuxMusl
            } else {
                Self::X8664UnknownLinuxMusl
            }),
            other => Err(PlatformError::UnsupportedOs(other.to_string())),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Aarch64AppleDarwin => "aarch64-apple-darwin",
            Self::Aarch64UnknownLinuxMusl => "aarch64-unknown-linux-musl",
            Self::X8664AppleDarwin => "x86_64-apple-darwin",
            Self::X8664UnknownLinuxMusl => "x86_64-unknown-linux-musl",
        }
    }
}

impl std::fmt::Display for TargetTriple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `<os>-<arch>` style platform identifier, spelled with a hyphen or an
/// underscore depending on the asset's naming convention.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TargetDuple {
    DarwinArm64,
    DarwinAmd64,
    LinuxArm64,
    LinuxAmd64,
}

impl TargetDuple {
    /// Every supported duple, in the order suffix stripping tries them.
    pub const ALL: [Self; 4] = [
        Self::DarwinArm64,
        Self::DarwinAmd64,
        Self::LinuxArm64,
        Self::LinuxAmd64,
    ];

    /// Build the duple for an architecture (`arm64`/`x64`) and operating
    /// system (`darwin`/`linux`) pair.
    pub fn build(architecture: &str, operating_system: &str) -> Result<Self, PlatformError> {
        let arm = match architecture {
            "arm64" => true,
            "x64" => false,
            other => return Err(PlatformError::UnsupportedArch(other.to_string())),
        };
        match operating_system {
            "darwin" => Ok(if arm { Self::DarwinArm64 } else { Self::DarwinAmd64 }),
            "linux" => Ok(if arm { Self::LinuxArm64 } else { Self::LinuxAmd64 }),
            other => Err(PlatformError::UnsupportedOs(other.to_string())),
        }
    }

    /// `os-arch` spelling.
    pub fn hyphenated(self) -> &'static str {
        match self {
            Self::DarwinArm64 => "darwin-arm64",
            Self::DarwinAmd64 => "darwin-amd64",
            Self::LinuxArm64 => "linux-arm64",
            Self::LinuxAmd64 => "linux-amd64",
        }
    }

    /// `os_arch` spelling.
    pub fn underscored(self) -> &'static str {
        match self {
            Self::DarwinArm64 => "darwin_arm64",
            Self::DarwinAmd64 => "darwin_amd64",
            Self::LinuxArm64 => "linux_arm64",
            Self::LinuxAmd64 => "linux_amd64",
        }
    }
}

impl std::fmt::Display for TargetDuple {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.hyphenated())
    }
}

/// Architecture name of the running machine in the builder vocabulary.
pub fn current_architecture() -> &'static str {
    match std::env::consts::ARCH {
        "aarch64" => "arm64",
        "x86_64" => "x64",
        other => other,
    }
}

/// Operating system name of the running machine.
pub fn current_operating_system() -> &'static str {
    std::env::consts::OS
}

/// Remove a recognized platform suffix from an asset filename.
///
/// Returns `None` when the whole input is itself a platform identifier
/// (no usable name remains). Otherwise tries `-<triple>` suffixes first,
/// then `-<duple>` / `_<duple>` suffixes, first match wins; if nothing
/// matches the input comes back unchanged.
pub fn strip_platform_suffix(value: &str) -> Option<&str> {
    let is_identifier = TargetTriple::ALL.iter().any(|t| value == t.as_str())
        || TargetDuple::ALL
            .iter()
            .any(|d| value == d.hyphenated() || value == d.underscored());
    if is_identifier {
        return None;
    }

    for triple in TargetTriple::ALL {
        if let Some(rest) = value
            .strip_suffix(triple.as_str())
            .and_then(|r| r.strip_suffix('-'))
        {
            return Some(rest);
        }
    }

    for duple in TargetDuple::ALL {
        if let Some(rest) = value
            .strip_suffix(duple.hyphenated())
            .and_then(|r| r.strip_suffix('-'))
        {
            return Some(rest);
        }
        if let Some(rest) = value
            .strip_suffix(duple.underscored())
            .and_then(|r| r.strip_suffix('_'))
        {
            return Some(rest);
        }
    }

    Some(value)
}
