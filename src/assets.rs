//! Release asset selection.
//!
//! Given a release's asset list and the platform identifiers for the
//! running machine, pick exactly one asset. Pure and deterministic: the
//! whole module is a function of its inputs, which is what keeps the most
//! intricate matching rules unit-testable without any network.

use thiserror::Error;

use crate::platform::{TargetDuple, TargetTriple, strip_platform_suffix};
use crate::registry::{Release, ReleaseAsset};
use crate::types::version::ExactSemanticVersion;
use crate::types::{BinaryName, RepositorySlug};

/// The asset chosen for installation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAsset {
    /// Requested binary name, or one recovered from the asset filename.
    pub binary_name: Option<BinaryName>,
    pub url: String,
    pub name: Option<String>,
}

/// Asset selection failure. Message text is part of the contract; callers
/// surface it verbatim.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    #[error("Expected to find asset in release {slug}@{tag} with label or name {}", .candidates.join(" or "))]
    AssetNotFound {
        slug: RepositorySlug,
        tag: ExactSemanticVersion,
        candidates: Vec<String>,
    },

    #[error("Expected to find asset in release {slug}@{tag} containing platform identifier {} at the end of the filename (before the extension)", .identifiers.join(" or "))]
    SuffixNotFound {
        slug: RepositorySlug,
        tag: ExactSemanticVersion,
        identifiers: Vec<String>,
    },

    #[error(
        "Ambiguous targets: expected to find a single asset in release {slug}@{tag} containing platform identifier {} at the end of the filename (before the extension), but found {found}.\n\nTo resolve, specify the desired binary with the target format {slug}/<binary-name>@{tag}",
        .identifiers.join(" or ")
    )]
    AmbiguousAsset {
        slug: RepositorySlug,
        tag: ExactSemanticVersion,
        identifiers: Vec<String>,
        found: usize,
    },
}

/// Select the single release asset for this platform.
///
/// With a requested binary name, candidate strings `<name>-<triple>`,
/// `<name>-<duple>` and (when the underscore duple is supplied)
/// `<name>_<duple>` are tried in that order against each asset's label and
/// name; the first exact hit wins. Without one, assets whose label or name
/// ends with a platform identifier (ignoring a final `.ext`) are
/// collected: exactly one must remain, and the binary name is recovered
/// by stripping the platform suffix from the matched field.
pub fn match_release_asset(
    release: &Release,
    slug: &RepositorySlug,
    binary_name: Option<&BinaryName>,
    tag: &ExactSemanticVersion,
    triple: TargetTriple,
    duple: TargetDuple,
    underscore_duple: Option<TargetDuple>,
) -> Result<ResolvedAsset, MatchError> {
    match binary_name {
        Some(name) => match_named(release, slug, name, tag, triple, duple, underscore_duple),
        None => match_unnamed(release, slug, tag, triple, duple, underscore_duple),
    }
}

fn match_named(
    release: &Release,
    slug: &RepositorySlug,
    name: &BinaryName,
    tag: &ExactSemanticVersion,
    triple: TargetTriple,
    duple: TargetDuple,
    underscore_duple: Option<TargetDuple>,
) -> Result<ResolvedAsset, MatchError> {
    let mut candidates = vec![
        format!("{name}-{triple}"),
        format!("{name}-{}", duple.hyphenated()),
    ];
    if let Some(underscore) = underscore_duple {
        candidates.push(format!("{name}_{}", underscore.underscored()));
    }

    for candidate in &candidates {
        let hit = release.assets.iter().find(|asset| {
            asset.label.as_deref() == Some(candidate) || asset.name.as_deref() == Some(candidate)
        });
        if let Some(asset) = hit {
            return Ok(ResolvedAsset {
                binary_name: Some(name.clone()),
                url: asset.url.clone(),
                name: asset.name.clone(),
            });
        }
    }

    Err(MatchError::AssetNotFound {
        slug: slug.clone(),
        tag: tag.clone(),
        candidates,
    })
}

/// Filename with a final `.ext` suffix removed, if any.
fn stem(value: &str) -> &str {
    value.rsplit_once('.').map_or(value, |(before, _)| before)
}

fn match_unnamed(
    release: &Release,
    slug: &RepositorySlug,
    tag: &ExactSemanticVersion,
    triple: TargetTriple,
    duple: TargetDuple,
    underscore_duple: Option<TargetDuple>,
) -> Result<ResolvedAsset, MatchError> {
    let mut identifiers = vec![triple.as_str().to_string(), duple.hyphenated().to_string()];
    if let Some(underscore) = underscore_duple {
        identifiers.push(underscore.underscored().to_string());
    }

    // Label is preferred over name when both carry the suffix.
    let matched_field = |asset: &ReleaseAsset| -> Option<String> {
        [asset.label.as_deref(), asset.name.as_deref()]
            .into_iter()
            .flatten()
            .find(|field| identifiers.iter().any(|id| stem(field).ends_with(id)))
            .map(str::to_string)
    };

    let matches: Vec<(&ReleaseAsset, String)> = release
        .assets
        .iter()
        .filter_map(|asset| matched_field(asset).map(|field| (asset, field)))
        .collect();

    match matches.as_slice() {
        [] => Err(MatchError::SuffixNotFound {
            slug: slug.clone(),
            tag: tag.clone(),
            identifiers,
        }),
        [(asset, field)] => {
            let binary_name = strip_platform_suffix(field).and_then(BinaryName::new);
            Ok(ResolvedAsset {
                binary_name,
                url: asset.url.clone(),
                name: asset.name.clone(),
            })
        }
        found => Err(MatchError::AmbiguousAsset {
            slug: slug.clone(),
            tag: tag.clone(),
            identifiers,
            found: found.len(),
        }),
    }
}
