//! Domain-specific errors for install operations.

use thiserror::Error;

use crate::assets::MatchError;
use crate::io::download::DownloadError;
use crate::io::extract::ExtractError;
use crate::platform::PlatformError;
use crate::registry::RegistryError;
use crate::resolver::ResolveError;
use crate::types::version::ExactSemanticVersion;
use crate::types::RepositorySlug;

/// Anything that can stop a target from installing. Nothing here is
/// retried; each failure propagates to the caller as-is.
#[derive(Error, Debug)]
pub enum InstallError {
    #[error(transparent)]
    Platform(#[from] PlatformError),

    #[error(transparent)]
    Resolve(#[from] ResolveError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error(transparent)]
    Match(#[from] MatchError),

    #[error("Download failed: {0}")]
    Download(#[from] DownloadError),

    #[error("Extraction failed: {0}")]
    Extract(#[from] ExtractError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(
        "No binary name could be derived for {slug}@{tag}; \
         specify one with the target format {slug}/<binary-name>@{tag}"
    )]
    NoBinaryName {
        slug: RepositorySlug,
        tag: ExactSemanticVersion,
    },
}
