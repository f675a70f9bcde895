//! Integration tests for wg-allowed-ips
//!
//! These tests go from CIDR strings or fixture files to the final AllowedIPs list.

use std::path::PathBuf;
use wg_allowed_ips::config::Settings;
use wg_allowed_ips::models::{parse_cidr_range, Address, Cidr, MAX_ADDRESS};
use wg_allowed_ips::output::splice_allowed_ips_file;
use wg_allowed_ips::processing::{compact_ranges, subtract_ranges};
use wg_allowed_ips::{compute_allowed_cidrs, compute_allowed_ranges, get_allowed_cidrs, ParseError};

const NONE: &[&str] = &[];

/// Check the output blocks against a direct membership test at every input
/// boundary, plus the structural invariants on the blocks themselves.
fn assert_exact_cover(allow: &[&str], block: &[&str]) {
    let cidrs = compute_allowed_cidrs(allow, block).expect("valid input");

    for pair in cidrs.windows(2) {
        assert!(pair[0].hi() < pair[1].lo(), "{} and {} overlap or are unsorted", pair[0], pair[1]);
    }
    for cidr in &cidrs {
        assert!(cidr.is_aligned(), "{cidr} is not aligned");
        assert!(cidr.hi() <= MAX_ADDRESS);
    }

    let inside = |addr: Address, list: &[&str]| {
        list.iter()
            .map(|c| parse_cidr_range(c).unwrap())
            .any(|r| r.contains(addr))
    };
    let covered = |addr: Address| cidrs.iter().any(|c| c.lo() <= addr && addr <= c.hi());

    let mut edges = vec![0, MAX_ADDRESS];
    for cidr in allow.iter().chain(block) {
        let range = parse_cidr_range(cidr).unwrap();
        edges.extend([range.start, range.end]);
        edges.extend(range.start.checked_sub(1));
        if range.end < MAX_ADDRESS {
            edges.push(range.end + 1);
        }
    }
    for addr in edges {
        assert_eq!(
            covered(addr),
            inside(addr, allow) && !inside(addr, block),
            "address {addr} for allow={allow:?} block={block:?}"
        );
    }
}

#[test]
fn test_allow_only() {
    assert_eq!(
        compute_allowed_ranges(&["10.0.0.0/8"], NONE).unwrap(),
        vec!["10.0.0.0/8"]
    );
}

#[test]
fn test_everything_except_ten() {
    let ips = compute_allowed_ranges(&["0.0.0.0/0"], &["10.0.0.0/8"]).unwrap();
    assert!(ips.contains(&"0.0.0.0/5".to_string()));
    assert!(ips.contains(&"11.0.0.0/8".to_string()));
    assert!(!ips.iter().any(|ip| ip.starts_with("10.")));
    assert_exact_cover(&["0.0.0.0/0"], &["10.0.0.0/8"]);
}

#[test]
fn test_adjacent_allow_merges() {
    assert_eq!(
        compute_allowed_ranges(&["192.168.0.0/24", "192.168.1.0/24"], NONE).unwrap(),
        vec!["192.168.0.0/23"]
    );
}

#[test]
fn test_block_upper_half() {
    assert_eq!(
        compute_allowed_ranges(&["192.168.0.0/24"], &["192.168.0.128/25"]).unwrap(),
        vec!["192.168.0.0/25"]
    );
}

#[test]
fn test_bad_prefix_fails() {
    assert_eq!(
        compute_allowed_ranges(&["10.0.0.0/33"], NONE),
        Err(ParseError::Prefix("33".to_string()))
    );
}

#[test]
fn test_leading_zero_octets() {
    assert_eq!(
        compute_allowed_ranges(&["010.0.0.0/8"], &["010.000.0.0/9"]).unwrap(),
        vec!["10.128.0.0/9"]
    );
}

#[test]
fn test_empty_allow_gives_empty() {
    assert!(compute_allowed_ranges(NONE, &["10.0.0.0/8"]).unwrap().is_empty());
}

#[test]
fn test_exact_cover_cases() {
    assert_exact_cover(&["0.0.0.0/0"], &["0.0.0.0/32", "255.255.255.255/32"]);
    assert_exact_cover(&["0.0.0.0/0"], &["10.0.0.0/8", "172.16.0.0/12", "192.168.0.0/16"]);
    assert_exact_cover(
        &["10.0.0.0/8", "10.1.2.3/16", "11.0.0.0/24"],
        &["10.0.0.0/16", "10.128.0.0/9", "10.5.5.5/32"],
    );
    assert_exact_cover(&["1.2.3.4/30", "1.2.3.9/31", "1.2.3.12/32"], &["1.2.3.5/32"]);
    assert_exact_cover(&["128.0.0.0/1"], &["128.0.0.0/2", "224.0.0.0/3", "255.255.255.0/24"]);
    assert_exact_cover(&["100.64.0.0/10"], &["100.64.0.0/10"]);
}

#[test]
fn test_round_trip_single_block() {
    for cidr in ["0.0.0.0/0", "10.0.0.0/8", "100.64.0.0/10", "203.0.113.7/32"] {
        assert_eq!(compute_allowed_ranges(&[cidr], NONE).unwrap(), vec![cidr]);
    }
}

#[test]
fn test_compaction_idempotent_and_subtraction_identities() {
    let ranges: Vec<_> = ["10.0.0.0/9", "10.128.0.0/9", "10.0.0.0/24", "172.16.0.0/12"]
        .iter()
        .map(|c| parse_cidr_range(c).unwrap())
        .collect();
    let compacted = compact_ranges(ranges.clone());
    assert_eq!(compact_ranges(compacted.clone()), compacted);
    assert_eq!(subtract_ranges(&compacted, &compact_ranges(Vec::new())), compacted);
    assert!(subtract_ranges(&compacted, &compacted).is_empty());
}

fn fixture(name: &str) -> Option<PathBuf> {
    Some(PathBuf::from("src/tests/test_data").join(name))
}

#[tokio::test]
async fn test_catalog_allow_and_block() {
    let settings = Settings {
        catalog: fixture("catalog.json"),
        preferences: fixture("preferences.json"),
        user: Some(1001),
        ..Default::default()
    };
    let cidrs: Vec<String> = get_allowed_cidrs(&settings)
        .await
        .expect("Failed to compute AllowedIPs")
        .iter()
        .map(Cidr::to_string)
        .collect();
    assert_eq!(cidrs, vec!["10.20.0.0/17", "10.21.0.0/16", "172.16.4.0/22"]);
}

#[tokio::test]
async fn test_catalog_block_only_routes_everything_else() {
    let settings = Settings {
        catalog: fixture("catalog.json"),
        preferences: fixture("preferences.json"),
        user: Some(1002),
        ..Default::default()
    };
    let cidrs = get_allowed_cidrs(&settings).await.expect("Failed to compute AllowedIPs");

    let total: Address = cidrs.iter().map(Cidr::size).sum();
    assert_eq!(total, (1 << 32) - (1 << 15) - 3);

    let covered = |ip: &str| {
        let addr = parse_cidr_range(&format!("{ip}/32")).unwrap().start;
        cidrs.iter().any(|c| c.lo() <= addr && addr <= c.hi())
    };
    assert!(!covered("127.0.0.1"));
    assert!(!covered("203.0.113.7"));
    assert!(!covered("203.0.113.8"));
    assert!(!covered("10.20.200.1"));
    assert!(covered("203.0.113.6"));
    assert!(covered("203.0.113.9"));
    assert!(covered("8.8.8.8"));
}

#[tokio::test]
async fn test_catalog_extra_flags() {
    let settings = Settings {
        catalog: fixture("catalog.json"),
        preferences: fixture("preferences.json"),
        user: Some(1001),
        allow: vec!["192.168.10.0/24".to_string()],
        block: vec!["10.21.0.0/17".to_string()],
    };
    let cidrs: Vec<String> = get_allowed_cidrs(&settings)
        .await
        .unwrap()
        .iter()
        .map(Cidr::to_string)
        .collect();
    assert_eq!(
        cidrs,
        vec!["10.20.0.0/17", "10.21.128.0/17", "172.16.4.0/22", "192.168.10.0/24"]
    );
}

#[tokio::test]
async fn test_catalog_requires_user() {
    let settings = Settings {
        catalog: fixture("catalog.json"),
        ..Default::default()
    };
    let err = get_allowed_cidrs(&settings).await.unwrap_err();
    assert_eq!(err.to_string(), "missing required option: user");
}

#[tokio::test]
async fn test_flags_only_empty_allow_routes_all() {
    let settings = Settings {
        block: vec!["10.0.0.0/8".to_string()],
        ..Default::default()
    };
    let cidrs = get_allowed_cidrs(&settings).await.unwrap();
    assert_eq!(cidrs.len(), 8);
    assert_eq!(cidrs[0].to_string(), "0.0.0.0/5");
    assert_eq!(cidrs[7].to_string(), "128.0.0.0/1");
}

#[test]
fn test_splice_fixture_config() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("wg0.conf");
    std::fs::copy("src/tests/test_data/wg0.conf", &path).unwrap();

    let ips = compute_allowed_ranges(&["0.0.0.0/0"], &["192.168.0.0/16"]).unwrap();
    let spliced = splice_allowed_ips_file(&path, &ips).unwrap();

    let line = spliced
        .lines()
        .find(|l| l.starts_with("AllowedIPs"))
        .unwrap();
    assert!(line.starts_with("AllowedIPs = 0.0.0.0/1, 128.0.0.0/2, "));
    assert!(!line.contains("::/0"));
    assert!(spliced.contains("Endpoint = vpn.example.org:51820"));
}
