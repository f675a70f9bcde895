//! Range algebra.
//!
//! The pipeline from CIDR lists to an AllowedIPs list:
//! - [`compact`] - merge overlapping and adjacent ranges
//! - [`subtract`] - cut blocked ranges out of allowed ranges
//! - [`clamp`] - restrict ranges to the IPv4 address space
//! - [`decompose`] - turn a range back into CIDR blocks
//! - [`policy`] - all of the above for a pair of CIDR string lists

mod clamp;
mod compact;
mod decompose;
mod policy;
mod subtract;

// Re-export public functions
pub use clamp::{clamp_range, clamp_ranges};
pub use compact::compact_ranges;
pub use decompose::decompose_range;
pub use policy::{compute_allowed_cidrs, compute_allowed_ranges};
pub use subtract::subtract_ranges;
