//! The per-target install pipeline.
//!
//! Each requested target runs the same sequence: pin the version
//! reference to an exact tag, fetch the release metadata, select the one
//! asset for this platform, download it into the cache, then place the
//! binary. Targets share nothing mutable, so a batch runs them
//! concurrently.

use std::path::{Path, PathBuf};

use reqwest::Client;

use crate::assets::match_release_asset;
use crate::filename_from_url;
use crate::io::download::download_and_verify;
use crate::io::extract::extract_single_zip_entry;
use crate::ops::InstallError;
use crate::platform::{
    TargetDuple, TargetTriple, current_architecture, current_operating_system,
};
use crate::registry::{ReleaseSource, TagSource};
use crate::resolver::resolve_exact_version;
use crate::types::{BinaryName, TargetRelease};

/// One successfully installed binary.
#[derive(Debug, Clone)]
pub struct InstallOutcome {
    pub binary_name: BinaryName,
    pub path: PathBuf,
    pub url: String,
}

/// Install every target into `bin_dir`, staging downloads under
/// `cache_dir`. Targets are independent and run concurrently; the first
/// failure aborts the batch.
pub async fn install_targets<R>(
    client: &Client,
    registry: &R,
    targets: &[TargetRelease],
    bin_dir: &Path,
    cache_dir: &Path,
) -> Result<Vec<InstallOutcome>, InstallError>
where
    R: TagSource + ReleaseSource + Sync,
{
    let arch = current_architecture();
    let os = current_operating_system();
    let triple = TargetTriple::build(arch, os)?;
    let duple = TargetDuple::build(arch, os)?;

    tokio::fs::create_dir_all(bin_dir).await?;
    tokio::fs::create_dir_all(cache_dir).await?;

    futures::future::try_join_all(targets.iter().map(|target| {
        install_one(client, registry, target, triple, duple, bin_dir, cache_dir)
    }))
    .await
}

async fn install_one<R>(
    client: &Client,
    registry: &R,
    target: &TargetRelease,
    triple: TargetTriple,
    duple: TargetDuple,
    bin_dir: &Path,
    cache_dir: &Path,
) -> Result<InstallOutcome, InstallError>
where
    R: TagSource + ReleaseSource + Sync,
{
    let tag = resolve_exact_version(registry, &target.slug, &target.tag).await?;
    let release = registry.release_by_tag(&target.slug, &tag).await?;

    let asset = match_release_asset(
        &release,
        &target.slug,
        target.binary_name.as_ref(),
        &tag,
        triple,
        duple,
        Some(duple),
    )?;

    let binary_name = asset.binary_name.ok_or_else(|| InstallError::NoBinaryName {
        slug: target.slug.clone(),
        tag: tag.clone(),
    })?;

    tracing::info!(repo = %target.slug, %tag, binary = %binary_name, url = %asset.url, "installing");

    let staged = tempfile::Builder::new()
        .prefix(binary_name.as_str())
        .tempfile_in(cache_dir)?;
    download_and_verify(client, &asset.url, staged.path(), target.checksum.as_ref()).await?;

    let dest = bin_dir.join(binary_name.as_str());
    let filename = asset.name.as_deref().unwrap_or(filename_from_url(&asset.url));
    if filename.ends_with(".zip") {
        extract_single_zip_entry(staged.path(), &dest)?;
    } else {
        tokio::fs::copy(staged.path(), &dest).await?;
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        tokio::fs::set_permissions(&dest, std::fs::Permissions::from_mode(0o755)).await?;
    }

    Ok(InstallOutcome {
        binary_name,
        path: dest,
        url: asset.url,
    })
}
