//! Address models.
//!
//! - [`Cidr`] - IPv4 block in CIDR notation
//! - [`IpRange`] - closed address interval
//! - [`RangeSet`] - sorted, disjoint, non-adjacent ranges

mod ipv4;
mod range;

// Re-export public types
pub use ipv4::{
    addr_to_ipv4, block_size, cut_addr, fit_mask, ipv4_to_addr, lo_mask, parse_cidr_range,
    parse_ipv4, Address, Cidr, ADDRESS_SPACE, MAX_ADDRESS, MAX_LENGTH,
};
pub use range::{is_canonical, IpRange, RangeSet};
