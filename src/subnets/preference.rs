//! Per-user routing choice for each named subnet.

use super::catalog::SubnetId;
use super::read_json_file;
use crate::error::ConfigError;
use itertools::Itertools;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

pub type UserId = i64;

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Preference {
    /// Subnet plays no part in the user's policy.
    #[default]
    Unset,
    /// Routed through the tunnel.
    Allow,
    /// Routed around the tunnel.
    Block,
}

impl Preference {
    /// Next state of the settings toggle: Unset -> Allow -> Block -> Unset.
    pub fn next(self) -> Preference {
        match self {
            Preference::Unset => Preference::Allow,
            Preference::Allow => Preference::Block,
            Preference::Block => Preference::Unset,
        }
    }
}

/// One stored choice, the on-disk form of [`PreferenceStore`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct PreferenceRecord {
    pub user: UserId,
    pub subnet: SubnetId,
    pub preference: Preference,
}

/// Choices keyed by (user, subnet). Missing keys read as [`Preference::Unset`].
#[derive(Serialize, Deserialize, Debug, Clone, Default, PartialEq, Eq)]
#[serde(from = "Vec<PreferenceRecord>", into = "Vec<PreferenceRecord>")]
pub struct PreferenceStore {
    entries: HashMap<(UserId, SubnetId), Preference>,
}

impl PreferenceStore {
    pub fn new() -> PreferenceStore {
        PreferenceStore::default()
    }

    /// Read preferences from a JSON file.
    pub fn read(path: &Path) -> Result<PreferenceStore, ConfigError> {
        let store: PreferenceStore = read_json_file(path)?;
        log::info!(
            "Loaded {} subnet preferences from {}",
            store.entries.len(),
            path.display()
        );
        Ok(store)
    }

    pub fn get(&self, user: UserId, subnet: &str) -> Preference {
        self.entries
            .get(&(user, subnet.to_string()))
            .copied()
            .unwrap_or_default()
    }

    /// Store a choice. Setting [`Preference::Unset`] removes the entry.
    pub fn set(&mut self, user: UserId, subnet: &str, preference: Preference) {
        let key = (user, subnet.to_string());
        if preference == Preference::Unset {
            self.entries.remove(&key);
        } else {
            self.entries.insert(key, preference);
        }
    }

    /// Advance the choice to its next state and return it.
    pub fn cycle(&mut self, user: UserId, subnet: &str) -> Preference {
        let next = self.get(user, subnet).next();
        self.set(user, subnet, next);
        next
    }

    /// Subnet ids the user marked with `preference`, sorted.
    pub fn subnets_with(&self, user: UserId, preference: Preference) -> Vec<SubnetId> {
        self.entries
            .iter()
            .filter(|((u, _), p)| *u == user && **p == preference)
            .map(|((_, subnet), _)| subnet.clone())
            .sorted()
            .collect()
    }

    /// Forget every user's choice for a subnet that was deleted.
    pub fn remove_subnet(&mut self, subnet: &str) {
        self.entries.retain(|(_, s), _| s != subnet);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl From<Vec<PreferenceRecord>> for PreferenceStore {
    fn from(records: Vec<PreferenceRecord>) -> Self {
        let mut store = PreferenceStore::new();
        for record in records {
            store.set(record.user, &record.subnet, record.preference);
        }
        store
    }
}

impl From<PreferenceStore> for Vec<PreferenceRecord> {
    fn from(store: PreferenceStore) -> Self {
        store
            .entries
            .into_iter()
            .map(|((user, subnet), preference)| PreferenceRecord {
                user,
                subnet,
                preference,
            })
            .sorted_by(|a, b| (a.user, &a.subnet).cmp(&(b.user, &b.subnet)))
            .collect()
    }
}
