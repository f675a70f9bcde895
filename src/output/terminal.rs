//! Terminal output utilities.

use crate::models::{addr_to_ipv4, Cidr};
use colored::Colorize;

/// Format a value as a quoted, right-aligned field.
///
/// # Arguments
/// * `value` - The value to format
/// * `width` - The minimum width of the field
///
/// # Returns
/// A quoted, right-aligned string
pub fn format_field<T: ToString>(value: T, width: usize) -> String {
    let value_str = value.to_string();
    let quoted = format!("\"{value_str}\"");
    let quoted_len = quoted.len();

    if quoted_len >= width {
        quoted
    } else {
        format!("{quoted:>width$}")
    }
}

/// One table row: index, block, first and last address, address count.
pub fn format_cidr_row(i: usize, cidr: &Cidr) -> String {
    format!(
        "{cnt},{cidr},{first},{last},{size}",
        cnt = format_field(i + 1, 6),
        cidr = format_field(cidr, 20),
        first = format_field(addr_to_ipv4(cidr.lo()), 17),
        last = format_field(addr_to_ipv4(cidr.hi()), 17),
        size = format_field(cidr.size(), 12),
    )
}

/// Print blocks as a table to stdout.
pub fn print_cidr_table(cidrs: &[Cidr]) {
    println!(
        r#" "cnt",         "cidr",          "first",           "last",       "addresses""#
    );
    for (i, cidr) in cidrs.iter().enumerate() {
        println!("{}", format_cidr_row(i, cidr));
    }

    let total: u64 = cidrs.iter().map(Cidr::size).sum();
    println!(
        "#{}# {} blocks covering {} addresses",
        "TOTAL".on_blue(),
        cidrs.len(),
        total
    );
}
