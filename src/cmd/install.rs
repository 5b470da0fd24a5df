//! `grab install` - resolve and install the requested targets.

use std::path::PathBuf;

use anyhow::Result;

use grab::ops::install_targets;
use grab::registry::github::GithubClient;
use grab::registry::build_github_client;
use grab::types::parse_target_releases;
use grab::{bin_path, cache_path};

pub async fn install(targets: &[String], bin_dir: Option<PathBuf>) -> Result<()> {
    let text = targets.join(" ");
    let parsed = parse_target_releases(&text)?;

    let token = std::env::var("GITHUB_TOKEN").ok();
    let client = build_github_client(token.as_deref())?;
    let registry = GithubClient::new(client.clone());

    let bin_dir = bin_dir.unwrap_or_else(bin_path);
    let outcomes = install_targets(&client, &registry, &parsed, &bin_dir, &cache_path()).await?;

    for outcome in outcomes {
        println!(
            "Installed {} -> {}",
            outcome.binary_name,
            outcome.path.display()
        );
    }
    Ok(())
}
