//! Assembly of one user's allow/block lists from their subnet choices.

use super::catalog::{ResolvedSubnets, SubnetCatalog, SubnetId};
use super::preference::{Preference, PreferenceStore, UserId};
use crate::config::UNIVERSAL_RANGE;
use crate::error::{ParseError, SourceError};
use crate::models::Cidr;
use crate::processing::{compute_allowed_cidrs, compute_allowed_ranges};

/// Allow and block CIDR lists for one peer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PeerPolicy {
    pub allow: Vec<String>,
    pub block: Vec<String>,
    /// The allow list came out empty, so everything not blocked is routed.
    pub route_all: bool,
}

impl PeerPolicy {
    /// Policy from explicit lists. An empty `allow` routes everything.
    pub fn from_lists(allow: Vec<String>, block: Vec<String>) -> PeerPolicy {
        let route_all = allow.is_empty();
        PeerPolicy {
            allow,
            block,
            route_all,
        }
    }

    /// Append extra entries. Any extra allow entry turns `route_all` off.
    pub fn extend(&mut self, allow: &[String], block: &[String]) {
        if !allow.is_empty() {
            self.route_all = false;
        }
        self.allow.extend_from_slice(allow);
        self.block.extend_from_slice(block);
    }

    /// The allow list handed to the range pipeline.
    pub fn effective_allow(&self) -> Vec<String> {
        if self.route_all {
            vec![UNIVERSAL_RANGE.to_string()]
        } else {
            self.allow.clone()
        }
    }

    pub fn allowed_cidrs(&self) -> Result<Vec<Cidr>, ParseError> {
        compute_allowed_cidrs(&self.effective_allow(), &self.block)
    }

    pub fn allowed_ips(&self) -> Result<Vec<String>, ParseError> {
        compute_allowed_ranges(&self.effective_allow(), &self.block)
    }
}

/// Build the policy for `user` from already resolved subnets.
///
/// Subnets marked Allow feed the allow list and Block the block list. A
/// chosen subnet missing from `resolved` is skipped with a warning. If no
/// allow entry is left after that, everything not blocked is routed.
pub fn build_peer_policy(
    resolved: &ResolvedSubnets,
    prefs: &PreferenceStore,
    user: UserId,
) -> PeerPolicy {
    let allow_ids = prefs.subnets_with(user, Preference::Allow);
    let block_ids = prefs.subnets_with(user, Preference::Block);

    let collect = |ids: &[SubnetId]| -> Vec<String> {
        ids.iter()
            .filter_map(|id| {
                let cidrs = resolved.get(id);
                if cidrs.is_none() {
                    log::warn!("User {user}: subnet '{id}' has no resolved addresses, skipping");
                }
                cidrs
            })
            .flatten()
            .map(Cidr::to_string)
            .collect()
    };

    let policy = PeerPolicy::from_lists(collect(&allow_ids[..]), collect(&block_ids[..]));
    log::debug!(
        "User {user}: {} allowed subnets ({} entries), {} blocked subnets ({} entries), route_all={}",
        allow_ids.len(),
        policy.allow.len(),
        block_ids.len(),
        policy.block.len(),
        policy.route_all
    );
    policy
}

/// Resolve the subnets `user` picked and build their policy.
pub async fn resolve_peer_policy(
    catalog: &SubnetCatalog,
    prefs: &PreferenceStore,
    user: UserId,
    client: &reqwest::Client,
) -> Result<PeerPolicy, SourceError> {
    let mut wanted = prefs.subnets_with(user, Preference::Allow);
    wanted.extend(prefs.subnets_with(user, Preference::Block));

    let resolved = catalog.resolve(&wanted, client).await?;
    Ok(build_peer_policy(&resolved, prefs, user))
}
