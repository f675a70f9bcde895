//! Error types.
//!
//! [`ParseError`] is the only error the range pipeline can produce. Subnet
//! resolution and file handling wrap it in [`SourceError`] and [`ConfigError`].

use std::io;
use thiserror::Error;

/// A CIDR string that could not be turned into an address range.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    /// Not exactly `address/prefix`.
    #[error("invalid CIDR format: '{0}'")]
    Format(String),

    /// Not a dotted quad, or an octet outside 0..=255.
    #[error("invalid IPv4 address: '{0}'")]
    Address(String),

    /// Not a number, or larger than 32.
    #[error("invalid prefix length: '{0}'")]
    Prefix(String),
}

/// Failure to turn a named subnet into a list of CIDR blocks.
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("subnet '{subnet}': {source}")]
    Subnet {
        subnet: String,
        #[source]
        source: Box<SourceError>,
    },

    #[error("resolved entry is not a valid CIDR: {0}")]
    Parse(#[from] ParseError),

    #[error("DNS lookup failed for '{host}': {source}")]
    Dns {
        host: String,
        #[source]
        source: io::Error,
    },

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("response too large: {size} bytes from {url}")]
    ResponseTooLarge { url: String, size: usize },

    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unexpected JSON shape at '{path}': {reason}")]
    JsonShape { path: String, reason: String },
}

impl SourceError {
    /// Attach the id of the subnet being resolved.
    pub fn for_subnet(self, subnet: &str) -> SourceError {
        SourceError::Subnet {
            subnet: subnet.to_string(),
            source: Box::new(self),
        }
    }
}

/// Problems with the files and options that feed a policy computation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("file does not exist: {0}")]
    NotFound(String),

    #[error("I/O error on {file}: {source}")]
    Io {
        file: String,
        #[source]
        source: io::Error,
    },

    #[error("error parsing {file}: path={path} error={message}")]
    Decode {
        file: String,
        path: String,
        message: String,
    },

    #[error("no 'AllowedIPs =' line found in WireGuard config")]
    MissingAllowedIps,

    #[error("missing required option: {0}")]
    MissingOption(&'static str),
}
