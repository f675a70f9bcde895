//! Named subnets and per-user choices that feed the allow/block lists.
//!
//! - [`catalog`] - subnet definitions and concurrent resolution
//! - [`source`] - the closed set of address sources
//! - [`preference`] - per-user Unset/Allow/Block choices
//! - [`peer`] - turning choices into a [`PeerPolicy`]

mod catalog;
mod peer;
mod preference;
mod source;
#[cfg(test)]
mod test_http;

use crate::error::ConfigError;
use serde::de::DeserializeOwned;
use std::path::Path;

// Re-export public types and functions
pub use catalog::{ResolvedSubnets, SubnetCatalog, SubnetDef, SubnetId};
pub use peer::{build_peer_policy, resolve_peer_policy, PeerPolicy};
pub use preference::{Preference, PreferenceRecord, PreferenceStore, UserId};
pub use source::{entries_from_json, normalize_entries, normalize_entry, select_path, SubnetSource};

/// Read and decode a JSON file, naming the failing JSON path on error.
fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let file = path.display().to_string();
    if !path.exists() {
        return Err(ConfigError::NotFound(file));
    }

    let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        file: file.clone(),
        source,
    })?;
    let mut deserializer = serde_json::Deserializer::from_str(&json);
    serde_path_to_error::deserialize(&mut deserializer).map_err(|e| ConfigError::Decode {
        file,
        path: e.path().to_string(),
        message: e.inner().to_string(),
    })
}
