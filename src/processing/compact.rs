//! Merging of overlapping and adjacent ranges.

use crate::models::{IpRange, RangeSet};

/// Sort and merge ranges into a [`RangeSet`].
///
/// Ranges that overlap or sit right next to each other
/// (`current.end + 1 >= next.start`) become one range.
pub fn compact_ranges<I>(ranges: I) -> RangeSet
where
    I: IntoIterator<Item = IpRange>,
{
    let mut ranges: Vec<IpRange> = ranges.into_iter().collect();
    let input_count = ranges.len();
    ranges.sort_by_key(|r| r.start);

    let mut iter = ranges.into_iter();
    let Some(mut current) = iter.next() else {
        return RangeSet::new();
    };

    let mut merged = Vec::new();
    for next in iter {
        if current.end + 1 >= next.start {
            current.end = current.end.max(next.end);
        } else {
            merged.push(current);
            current = next;
        }
    }
    merged.push(current);

    log::trace!("compact_ranges: {input_count} -> {} ranges", merged.len());
    RangeSet::from_canonical(merged)
}
