//! Closed address ranges and their canonical sorted form.

use super::ipv4::{addr_to_ipv4, Address, MAX_ADDRESS};
use crate::processing::compact_ranges;
use std::fmt;

/// Closed interval `[start, end]` of addresses, `start <= end`.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct IpRange {
    pub start: Address,
    pub end: Address,
}

impl IpRange {
    pub fn new(start: Address, end: Address) -> IpRange {
        debug_assert!(start <= end, "IpRange start {start} > end {end}");
        IpRange { start, end }
    }

    /// Number of addresses covered.
    pub fn len(&self) -> Address {
        self.end - self.start + 1
    }

    pub fn contains(&self, addr: Address) -> bool {
        self.start <= addr && addr <= self.end
    }

    /// True when the two ranges share at least one address.
    pub fn overlaps(&self, other: &IpRange) -> bool {
        !(self.end < other.start || self.start > other.end)
    }
}

impl fmt::Display for IpRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.end <= MAX_ADDRESS {
            write!(f, "{} - {}", addr_to_ipv4(self.start), addr_to_ipv4(self.end))
        } else {
            write!(f, "{} - {}", self.start, self.end)
        }
    }
}

/// Ranges sorted by start with a gap of at least one address between
/// neighbours. This is the form passed between pipeline stages.
///
/// Build one with [`compact_ranges`] or by collecting an iterator of
/// [`IpRange`], which compacts as well.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RangeSet {
    ranges: Vec<IpRange>,
}

impl RangeSet {
    pub fn new() -> RangeSet {
        RangeSet { ranges: Vec::new() }
    }

    /// Caller guarantees the ranges are already canonical.
    pub(crate) fn from_canonical(ranges: Vec<IpRange>) -> RangeSet {
        debug_assert!(
            is_canonical(&ranges),
            "ranges are not sorted and disjoint: {ranges:?}"
        );
        RangeSet { ranges }
    }

    pub fn ranges(&self) -> &[IpRange] {
        &self.ranges
    }

    pub fn iter(&self) -> std::slice::Iter<'_, IpRange> {
        self.ranges.iter()
    }

    pub fn len(&self) -> usize {
        self.ranges.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ranges.is_empty()
    }

    /// Total number of addresses covered by all ranges.
    pub fn address_count(&self) -> Address {
        self.ranges.iter().map(IpRange::len).sum()
    }

    pub fn contains(&self, addr: Address) -> bool {
        let idx = self.ranges.partition_point(|r| r.end < addr);
        self.ranges.get(idx).is_some_and(|r| r.contains(addr))
    }
}

/// Sorted ascending, no overlap and no adjacency between neighbours.
pub fn is_canonical(ranges: &[IpRange]) -> bool {
    ranges.iter().all(|r| r.start <= r.end)
        && ranges.windows(2).all(|w| w[0].end + 1 < w[1].start)
}

impl FromIterator<IpRange> for RangeSet {
    fn from_iter<I: IntoIterator<Item = IpRange>>(iter: I) -> Self {
        compact_ranges(iter)
    }
}

impl IntoIterator for RangeSet {
    type Item = IpRange;
    type IntoIter = std::vec::IntoIter<IpRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.into_iter()
    }
}

impl<'a> IntoIterator for &'a RangeSet {
    type Item = &'a IpRange;
    type IntoIter = std::slice::Iter<'a, IpRange>;

    fn into_iter(self) -> Self::IntoIter {
        self.ranges.iter()
    }
}

impl fmt::Display for RangeSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let ranges: Vec<String> = self.ranges.iter().map(|r| r.to_string()).collect();
        write!(f, "[{}]", ranges.join(", "))
    }
}
