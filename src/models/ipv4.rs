//! IPv4 addresses and CIDR notation.
//!
//! Addresses are carried as [`Address`] (`u64`) rather than `u32` so that
//! `end + 1` at 255.255.255.255 and a /0 block size of 2^32 are representable.
//! [`Cidr`] keeps the parsed [`Ipv4Addr`] and prefix length as written.

use super::IpRange;
use crate::error::ParseError;
use serde::de;
use serde::{Deserialize, Deserializer, Serialize};
use std::net::Ipv4Addr;
use std::str::FromStr;

/// An IPv4 address as an integer in `0..=MAX_ADDRESS`.
pub type Address = u64;

/// Maximum length for an IPv4 prefix (32 bits).
pub const MAX_LENGTH: u8 = 32;

/// Number of addresses in the IPv4 space, 2^32.
pub const ADDRESS_SPACE: Address = 1 << MAX_LENGTH;

/// 255.255.255.255
pub const MAX_ADDRESS: Address = ADDRESS_SPACE - 1;

/// Number of addresses in a block with prefix length `len`.
///
/// `len` values above 32 are treated as 32.
///
/// # Examples
/// ```
/// use wg_allowed_ips::models::block_size;
/// assert_eq!(block_size(0), 1 << 32);
/// assert_eq!(block_size(24), 256);
/// ```
pub fn block_size(len: u8) -> Address {
    1 << (MAX_LENGTH - len.min(MAX_LENGTH))
}

/// Floor `addr` to the start of its enclosing block of prefix length `len`.
pub fn cut_addr(addr: Address, len: u8) -> Address {
    let size = block_size(len);
    addr / size * size
}

/// Smallest prefix length `addr` is aligned to, based on trailing zeros.
///
/// 0.0.0.0 is aligned to every block, including /0.
pub fn lo_mask(addr: Address) -> u8 {
    if addr == 0 {
        return 0;
    }
    let trailing_zeros = addr.trailing_zeros().min(MAX_LENGTH as u32) as u8;
    MAX_LENGTH - trailing_zeros
}

/// Prefix length of the largest block that fits in `count` addresses.
///
/// `count` must be at least 1.
pub fn fit_mask(count: Address) -> u8 {
    debug_assert!(count > 0, "fit_mask of an empty span");
    let floor_log2 = (Address::BITS - 1 - count.leading_zeros()) as u8;
    MAX_LENGTH.saturating_sub(floor_log2)
}

pub fn ipv4_to_addr(ip: Ipv4Addr) -> Address {
    u32::from(ip) as Address
}

/// Parse a dotted quad of decimal octets.
///
/// Unlike [`Ipv4Addr`]'s `FromStr`, octets may carry leading zeros, so
/// `010.0.0.1` reads as `10.0.0.1`.
pub fn parse_ipv4(text: &str) -> Option<Ipv4Addr> {
    let mut octets = [0u8; 4];
    let mut parts = text.split('.');
    for octet in octets.iter_mut() {
        let part = parts.next()?;
        if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let digits = part.trim_start_matches('0');
        *octet = if digits.is_empty() { 0 } else { digits.parse().ok()? };
    }
    if parts.next().is_some() {
        return None;
    }
    Some(Ipv4Addr::from(octets))
}

/// Only meaningful for addresses inside the IPv4 space; higher bits are dropped.
pub fn addr_to_ipv4(addr: Address) -> Ipv4Addr {
    Ipv4Addr::from(addr as u32)
}

/// IPv4 block in CIDR notation.
///
/// The address is kept as written, so `10.1.2.3/8` is accepted and covers
/// `10.0.0.0 - 10.255.255.255`. Use [`Cidr::is_aligned`] to check whether
/// the address is already the network address.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Cidr {
    /// The IPv4 address.
    pub addr: Ipv4Addr,
    /// The prefix length (0-32).
    pub mask: u8,
}

impl Cidr {
    /// Parse a CIDR string (e.g., "10.0.0.0/24").
    pub fn new(addr_cidr: &str) -> Result<Cidr, ParseError> {
        let addr_cidr = addr_cidr.trim();
        let (addr, mask) = addr_cidr
            .split_once('/')
            .ok_or_else(|| ParseError::Format(addr_cidr.to_string()))?;
        if mask.contains('/') {
            return Err(ParseError::Format(addr_cidr.to_string()));
        }

        let addr = addr.trim();
        let addr = parse_ipv4(addr).ok_or_else(|| ParseError::Address(addr.to_string()))?;
        let mask = mask.trim();
        let mask: u8 = mask
            .parse()
            .map_err(|_| ParseError::Prefix(mask.to_string()))?;
        if mask > MAX_LENGTH {
            return Err(ParseError::Prefix(mask.to_string()));
        }

        Ok(Cidr { addr, mask })
    }

    /// Build a block from an integer address. Only the low 32 bits are used.
    pub fn from_addr(addr: Address, mask: u8) -> Cidr {
        Cidr {
            addr: addr_to_ipv4(addr),
            mask: mask.min(MAX_LENGTH),
        }
    }

    /// Number of addresses in the block.
    pub fn size(&self) -> Address {
        block_size(self.mask)
    }

    /// Lowest (network) address of the block.
    pub fn lo(&self) -> Address {
        cut_addr(ipv4_to_addr(self.addr), self.mask)
    }

    /// Highest (broadcast) address of the block.
    pub fn hi(&self) -> Address {
        self.lo() + self.size() - 1
    }

    /// True when the written address is the network address.
    pub fn is_aligned(&self) -> bool {
        ipv4_to_addr(self.addr) % self.size() == 0
    }

    pub fn to_range(&self) -> IpRange {
        IpRange::new(self.lo(), self.hi())
    }
}

/// Parse a CIDR string straight into the closed range it covers.
pub fn parse_cidr_range(addr_cidr: &str) -> Result<IpRange, ParseError> {
    Ok(Cidr::new(addr_cidr)?.to_range())
}

impl FromStr for Cidr {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Cidr::new(s)
    }
}

impl std::fmt::Display for Cidr {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(f, "{}/{}", self.addr, self.mask)
    }
}

impl Serialize for Cidr {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::ser::Serializer,
    {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Cidr {
    fn deserialize<D>(deserializer: D) -> Result<Cidr, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Cidr::new(&s).map_err(de::Error::custom)
    }
}
