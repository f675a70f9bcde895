//! Allow/block CIDR lists to the final AllowedIPs list.

use super::{clamp_ranges, compact_ranges, decompose_range, subtract_ranges};
use crate::error::ParseError;
use crate::models::{parse_cidr_range, Cidr, IpRange};

/// Minimal CIDR list covering `allow` minus `block`, as strings.
///
/// Fails on the first malformed entry in either list; nothing is returned for
/// the entries that did parse. An empty `allow` gives an empty result, pass
/// `0.0.0.0/0` to route everything.
///
/// # Examples
/// ```
/// use wg_allowed_ips::processing::compute_allowed_ranges;
/// let ips = compute_allowed_ranges(&["192.168.0.0/24"], &["192.168.0.128/25"]).unwrap();
/// assert_eq!(ips, vec!["192.168.0.0/25"]);
/// ```
pub fn compute_allowed_ranges<A, B>(allow: &[A], block: &[B]) -> Result<Vec<String>, ParseError>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    Ok(compute_allowed_cidrs(allow, block)?
        .iter()
        .map(Cidr::to_string)
        .collect())
}

/// Same as [`compute_allowed_ranges`] but returns the blocks as [`Cidr`].
pub fn compute_allowed_cidrs<A, B>(allow: &[A], block: &[B]) -> Result<Vec<Cidr>, ParseError>
where
    A: AsRef<str>,
    B: AsRef<str>,
{
    let allowed = compact_ranges(parse_ranges(allow)?);
    let blocked = compact_ranges(parse_ranges(block)?);

    let remaining = clamp_ranges(subtract_ranges(&allowed, &blocked));
    let cidrs: Vec<Cidr> = remaining.into_iter().flat_map(decompose_range).collect();

    log::debug!(
        "compute_allowed_cidrs: allow={} block={} -> {} blocks",
        allow.len(),
        block.len(),
        cidrs.len()
    );
    Ok(cidrs)
}

fn parse_ranges<S: AsRef<str>>(cidrs: &[S]) -> Result<Vec<IpRange>, ParseError> {
    cidrs
        .iter()
        .map(|cidr| parse_cidr_range(cidr.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const NONE: &[&str] = &[];

    #[test]
    fn test_allow_only() {
        assert_eq!(
            compute_allowed_ranges(&["10.0.0.0/8"], NONE).unwrap(),
            vec!["10.0.0.0/8"]
        );
    }

    #[test]
    fn test_everything_but_ten() {
        assert_eq!(
            compute_allowed_ranges(&["0.0.0.0/0"], &["10.0.0.0/8"]).unwrap(),
            vec![
                "0.0.0.0/5",
                "8.0.0.0/7",
                "11.0.0.0/8",
                "12.0.0.0/6",
                "16.0.0.0/4",
                "32.0.0.0/3",
                "64.0.0.0/2",
                "128.0.0.0/1",
            ]
        );
    }

    #[test]
    fn test_adjacent_allow_merged() {
        assert_eq!(
            compute_allowed_ranges(&["192.168.0.0/24", "192.168.1.0/24"], NONE).unwrap(),
            vec!["192.168.0.0/23"]
        );
    }

    #[test]
    fn test_unaligned_input_floored() {
        assert_eq!(
            compute_allowed_ranges(&["10.1.2.3/16"], NONE).unwrap(),
            vec!["10.1.0.0/16"]
        );
    }

    #[test]
    fn test_parse_error_is_atomic() {
        assert_eq!(
            compute_allowed_ranges(&["10.0.0.0/33"], NONE),
            Err(ParseError::Prefix("33".to_string()))
        );
        assert_eq!(
            compute_allowed_ranges(&["0.0.0.0/0"], &["10.0.0.0/8", "bogus"]),
            Err(ParseError::Format("bogus".to_string()))
        );
    }

    #[test]
    fn test_empty_allow() {
        assert!(compute_allowed_ranges(NONE, &["10.0.0.0/8"]).unwrap().is_empty());
        assert!(compute_allowed_ranges(NONE, NONE).unwrap().is_empty());
    }

    #[test]
    fn test_block_everything() {
        assert!(compute_allowed_ranges(&["10.0.0.0/8"], &["0.0.0.0/0"])
            .unwrap()
            .is_empty());
    }

    #[test]
    fn test_owned_strings() {
        let allow = vec!["172.16.0.0/12".to_string()];
        let block = vec!["172.16.0.0/13".to_string()];
        assert_eq!(
            compute_allowed_ranges(&allow, &block).unwrap(),
            vec!["172.24.0.0/13"]
        );
    }
}
