//! Set difference between two range sets.

use crate::models::{IpRange, RangeSet};

/// Every address in `allowed` that is not in `blocked`.
///
/// Each blocked range is cut out of the working list in turn; a working range
/// that straddles it leaves at most a lower and an upper remainder.
pub fn subtract_ranges(allowed: &RangeSet, blocked: &RangeSet) -> RangeSet {
    let mut working: Vec<IpRange> = allowed.ranges().to_vec();

    for hole in blocked {
        if working.is_empty() {
            break;
        }
        let mut next = Vec::with_capacity(working.len() + 1);
        for range in working {
            if !range.overlaps(hole) {
                next.push(range);
                continue;
            }
            if range.start < hole.start {
                next.push(IpRange::new(range.start, hole.start - 1));
            }
            if range.end > hole.end {
                next.push(IpRange::new(hole.end + 1, range.end));
            }
        }
        working = next;
    }

    log::trace!(
        "subtract_ranges: {} allowed - {} blocked -> {} ranges",
        allowed.len(),
        blocked.len(),
        working.len()
    );
    RangeSet::from_canonical(working)
}
