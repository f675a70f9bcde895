//! Where the addresses of a named subnet come from.
//!
//! A closed set of source kinds; none of them runs code supplied by the
//! catalog author.

use crate::config;
use crate::error::{ParseError, SourceError};
use crate::models::{parse_ipv4, Cidr, MAX_LENGTH};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::net::IpAddr;
use std::time::Duration;

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SubnetSource {
    /// Addresses listed in the catalog.
    Static { ips: Vec<String> },
    /// IPv4 A records of each host, as /32 blocks.
    Dns { hosts: Vec<String> },
    /// A JSON document fetched with GET; `path` leads to an array of strings.
    RemoteJson {
        url: String,
        #[serde(default)]
        path: Vec<String>,
    },
}

impl SubnetSource {
    /// Resolve to CIDR blocks. Any entry that does not parse fails the whole source.
    pub async fn resolve(&self, client: &reqwest::Client) -> Result<Vec<Cidr>, SourceError> {
        match self {
            SubnetSource::Static { ips } => normalize_entries(ips),
            SubnetSource::Dns { hosts } => resolve_dns(hosts).await,
            SubnetSource::RemoteJson { url, path } => {
                let entries = fetch_remote_json(client, url, path).await?;
                normalize_entries(&entries)
            }
        }
    }
}

/// Parse one resolved entry. A bare address becomes a /32, blanks are skipped.
pub fn normalize_entry(entry: &str) -> Result<Option<Cidr>, ParseError> {
    let entry = entry.trim();
    if entry.is_empty() {
        return Ok(None);
    }
    if entry.contains('/') {
        return Cidr::new(entry).map(Some);
    }
    let addr = parse_ipv4(entry).ok_or_else(|| ParseError::Address(entry.to_string()))?;
    Ok(Some(Cidr {
        addr,
        mask: MAX_LENGTH,
    }))
}

pub fn normalize_entries<S: AsRef<str>>(entries: &[S]) -> Result<Vec<Cidr>, SourceError> {
    let mut cidrs = Vec::with_capacity(entries.len());
    for entry in entries {
        if let Some(cidr) = normalize_entry(entry.as_ref())? {
            cidrs.push(cidr);
        }
    }
    Ok(cidrs)
}

async fn resolve_dns(hosts: &[String]) -> Result<Vec<Cidr>, SourceError> {
    let mut cidrs = Vec::new();
    for host in hosts {
        let addrs = tokio::net::lookup_host((host.as_str(), 0))
            .await
            .map_err(|source| SourceError::Dns {
                host: host.clone(),
                source,
            })?;
        let before = cidrs.len();
        for addr in addrs {
            if let IpAddr::V4(v4) = addr.ip() {
                let cidr = Cidr {
                    addr: v4,
                    mask: MAX_LENGTH,
                };
                if !cidrs.contains(&cidr) {
                    cidrs.push(cidr);
                }
            }
        }
        log::debug!("dns {host}: {} IPv4 addresses", cidrs.len() - before);
    }
    Ok(cidrs)
}

async fn fetch_remote_json(
    client: &reqwest::Client,
    url: &str,
    path: &[String],
) -> Result<Vec<String>, SourceError> {
    log::info!("Fetching subnet source {url}");
    let mut response = client
        .get(url)
        .timeout(Duration::from_millis(config::REMOTE_FETCH_TIMEOUT_MSEC))
        .send()
        .await?
        .error_for_status()?;

    let too_large = |size: usize| SourceError::ResponseTooLarge {
        url: url.to_string(),
        size,
    };
    if let Some(declared) = response.content_length() {
        if declared > config::MAX_RESPONSE_BYTES as u64 {
            return Err(too_large(usize::try_from(declared).unwrap_or(usize::MAX)));
        }
    }

    // Stop reading as soon as the cap is passed, the body may be unbounded.
    let mut body = Vec::new();
    while let Some(chunk) = response.chunk().await? {
        body.extend_from_slice(&chunk);
        if body.len() > config::MAX_RESPONSE_BYTES {
            return Err(too_large(body.len()));
        }
    }
    log::debug!("Fetched {} bytes from {url}", body.len());

    let body = String::from_utf8_lossy(&body);
    entries_from_json(&body, path)
}

/// Pull the string array at `path` out of a JSON document.
pub fn entries_from_json(body: &str, path: &[String]) -> Result<Vec<String>, SourceError> {
    let value: Value = serde_json::from_str(body)?;
    let shape_error = |reason: &str| SourceError::JsonShape {
        path: path.join("."),
        reason: reason.to_string(),
    };

    let items = select_path(&value, path)?
        .as_array()
        .ok_or_else(|| shape_error("expected an array"))?;
    items
        .iter()
        .map(|item| {
            item.as_str()
                .map(str::to_string)
                .ok_or_else(|| shape_error("expected an array of strings"))
        })
        .collect()
}

/// Walk object keys (or array indexes for numeric segments) from `value`.
pub fn select_path<'a>(value: &'a Value, path: &[String]) -> Result<&'a Value, SourceError> {
    let mut current = value;
    for (i, segment) in path.iter().enumerate() {
        let next = match current {
            Value::Object(map) => map.get(segment),
            Value::Array(items) => segment.parse::<usize>().ok().and_then(|idx| items.get(idx)),
            _ => None,
        };
        current = next.ok_or_else(|| SourceError::JsonShape {
            path: path[..=i].join("."),
            reason: "no such key".to_string(),
        })?;
    }
    Ok(current)
}
