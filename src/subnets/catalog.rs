//! Named subnet definitions and their resolution.

use super::source::SubnetSource;
use super::read_json_file;
use crate::error::{ConfigError, SourceError};
use crate::models::Cidr;
use chrono::{DateTime, Utc};
use futures::future::join_all;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;

pub type SubnetId = String;

/// Resolved blocks per subnet id.
pub type ResolvedSubnets = BTreeMap<SubnetId, Vec<Cidr>>;

/// A named group of addresses users can route through or around the tunnel.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct SubnetDef {
    /// Display name.
    pub name: String,
    /// Id of the admin who created the subnet.
    pub creator: i64,
    /// Creation time, stored as milliseconds since the epoch.
    #[serde(with = "chrono::serde::ts_milliseconds")]
    pub created_at: DateTime<Utc>,
    pub source: SubnetSource,
}

impl SubnetDef {
    pub fn new(name: &str, creator: i64, source: SubnetSource) -> SubnetDef {
        SubnetDef {
            name: name.to_string(),
            creator,
            created_at: Utc::now(),
            source,
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
pub struct SubnetCatalog {
    pub subnets: BTreeMap<SubnetId, SubnetDef>,
}

impl SubnetCatalog {
    /// Read a catalog from a JSON file.
    pub fn read(path: &Path) -> Result<SubnetCatalog, ConfigError> {
        let catalog: SubnetCatalog = read_json_file(path)?;
        log::info!(
            "Loaded {} subnets from {}",
            catalog.subnets.len(),
            path.display()
        );
        Ok(catalog)
    }

    pub fn get(&self, id: &str) -> Option<&SubnetDef> {
        self.subnets.get(id)
    }

    /// Add or replace a subnet, returning the previous definition.
    pub fn insert(&mut self, id: &str, def: SubnetDef) -> Option<SubnetDef> {
        self.subnets.insert(id.to_string(), def)
    }

    pub fn remove(&mut self, id: &str) -> Option<SubnetDef> {
        self.subnets.remove(id)
    }

    pub fn len(&self) -> usize {
        self.subnets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subnets.is_empty()
    }

    /// Resolve the given subnets concurrently.
    ///
    /// Ids missing from the catalog are skipped. A failure in any source fails
    /// the whole call, so a block list is never silently left out.
    pub async fn resolve<'a, I>(
        &self,
        ids: I,
        client: &reqwest::Client,
    ) -> Result<ResolvedSubnets, SourceError>
    where
        I: IntoIterator<Item = &'a SubnetId>,
    {
        let mut pending = Vec::new();
        for id in ids {
            match self.subnets.get(id) {
                Some(def) => pending.push(async move {
                    let cidrs = def
                        .source
                        .resolve(client)
                        .await
                        .map_err(|e| e.for_subnet(id))?;
                    Ok::<_, SourceError>((id.clone(), cidrs))
                }),
                None => log::warn!("Subnet '{id}' is not in the catalog, skipping"),
            }
        }

        let mut resolved = ResolvedSubnets::new();
        for result in join_all(pending).await {
            let (id, cidrs) = result?;
            log::debug!("Resolved subnet '{id}' to {} blocks", cidrs.len());
            resolved.insert(id, cidrs);
        }
        Ok(resolved)
    }
}
