//! Crate constants and runtime settings.

use crate::subnets::UserId;
use std::path::PathBuf;

/// Range passed as the allow list when a user has not picked anything to allow.
pub const UNIVERSAL_RANGE: &str = "0.0.0.0/0";

/// Timeout for a remote JSON subnet source.
pub const REMOTE_FETCH_TIMEOUT_MSEC: u64 = 10_000;

/// Largest remote JSON body accepted for a subnet source.
pub const MAX_RESPONSE_BYTES: usize = 500_000;

pub const LOG_CONFIG_FILE: &str = "log4rs.yml";

pub const ENV_CATALOG: &str = "WG_ALLOWED_IPS_CATALOG";
pub const ENV_PREFERENCES: &str = "WG_ALLOWED_IPS_PREFERENCES";
pub const ENV_USER: &str = "WG_ALLOWED_IPS_USER";

/// Inputs for one AllowedIPs computation.
///
/// With a `catalog` the user's subnet preferences decide allow and block, and
/// `allow`/`block` are added on top. Without one only `allow`/`block` are used.
#[derive(Debug, Default, Clone)]
pub struct Settings {
    pub catalog: Option<PathBuf>,
    pub preferences: Option<PathBuf>,
    pub user: Option<UserId>,
    pub allow: Vec<String>,
    pub block: Vec<String>,
}
