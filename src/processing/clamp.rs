//! Restriction of ranges to the IPv4 address space.

use crate::models::{IpRange, RangeSet, MAX_ADDRESS};

/// Clip one range to `0..=MAX_ADDRESS`, or `None` if nothing is left.
///
/// Addresses are unsigned, so only the upper bound can be exceeded.
pub fn clamp_range(range: IpRange) -> Option<IpRange> {
    let start = range.start;
    let end = range.end.min(MAX_ADDRESS);
    (start <= end).then(|| IpRange::new(start, end))
}

/// Clip every range to the address space and drop the empty ones.
pub fn clamp_ranges(ranges: RangeSet) -> RangeSet {
    let before = ranges.len();
    let clamped: Vec<IpRange> = ranges.into_iter().filter_map(clamp_range).collect();
    if clamped.len() != before {
        log::debug!(
            "clamp_ranges: dropped {} ranges outside the address space",
            before - clamped.len()
        );
    }
    RangeSet::from_canonical(clamped)
}
