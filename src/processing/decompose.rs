//! Decomposition of an address range into CIDR blocks.
//!
//! Walks the range from its low end, each time emitting the biggest block that
//! both starts on a boundary of its own size and fits in what is left.

use crate::models::{fit_mask, lo_mask, Address, Cidr, IpRange};

/// Cover `range` exactly with aligned, non-overlapping CIDR blocks, lowest first.
///
/// `range` must lie inside the address space; see [`clamp_range`](super::clamp_range).
/// The block count is at most 62 for any range inside the address space.
pub fn decompose_range(range: IpRange) -> Vec<Cidr> {
    let mut blocks = Vec::new();
    let mut current = range.start;

    while current <= range.end {
        let block = Cidr::from_addr(current, find_biggest_block(current, range.end));
        blocks.push(block);

        let Some(next) = current.checked_add(block.size()) else {
            break;
        };
        current = next;
    }

    log::trace!("decompose_range({range}) -> {} blocks", blocks.len());
    blocks
}

/// Prefix length of the biggest block starting at `start` that ends at or before `end`.
///
/// The returned mask is constrained by:
/// 1. The alignment of `start` (trailing zero bits); 0.0.0.0 aligns to /0
/// 2. The number of addresses left in `start..=end`
fn find_biggest_block(start: Address, end: Address) -> u8 {
    let min_mask_for_alignment = lo_mask(start);
    let min_mask_for_remaining = fit_mask(end - start + 1);
    min_mask_for_alignment.max(min_mask_for_remaining)
}
