//! Compute the AllowedIPs list of a WireGuard peer.
//!
//! Takes CIDR lists to route through the tunnel and CIDR lists to route
//! around it, and returns the fewest aligned CIDR blocks covering exactly
//! "allowed minus blocked". See [`processing::compute_allowed_ranges`].

pub mod config;
pub mod error;
pub mod models;
pub mod output;
pub mod processing;
pub mod subnets;

pub use error::{ConfigError, ParseError, SourceError};
pub use processing::{compute_allowed_cidrs, compute_allowed_ranges};

use config::Settings;
use models::Cidr;
use std::error::Error;
use subnets::{resolve_peer_policy, PeerPolicy, PreferenceStore, SubnetCatalog};

/// Build the allow/block lists described by `settings`.
pub async fn get_peer_policy(settings: &Settings) -> Result<PeerPolicy, Box<dyn Error>> {
    let Some(catalog_path) = &settings.catalog else {
        return Ok(PeerPolicy::from_lists(
            settings.allow.clone(),
            settings.block.clone(),
        ));
    };

    let user = settings.user.ok_or(ConfigError::MissingOption("user"))?;
    let catalog = SubnetCatalog::read(catalog_path)?;
    let prefs = match &settings.preferences {
        Some(path) => PreferenceStore::read(path)?,
        None => {
            log::warn!("No preferences file given, user {user} has no subnet choices");
            PreferenceStore::new()
        }
    };

    let client = reqwest::Client::new();
    let mut policy = resolve_peer_policy(&catalog, &prefs, user, &client).await?;
    policy.extend(&settings.allow, &settings.block);
    Ok(policy)
}

/// Resolve everything in `settings` down to the final list of blocks.
pub async fn get_allowed_cidrs(settings: &Settings) -> Result<Vec<Cidr>, Box<dyn Error>> {
    let policy = get_peer_policy(settings).await?;
    let cidrs = policy.allowed_cidrs()?;
    log::info!(
        "{} allow entries, {} block entries -> {} AllowedIPs blocks",
        policy.effective_allow().len(),
        policy.block.len(),
        cidrs.len()
    );
    Ok(cidrs)
}
