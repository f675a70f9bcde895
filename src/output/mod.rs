//! Output formatting for AllowedIPs lists.
//!
//! - [`wireguard`] - splicing the list into WireGuard config text
//! - [`terminal`] - table output for the terminal

mod terminal;
mod wireguard;

pub use terminal::{format_cidr_row, format_field, print_cidr_table};
pub use wireguard::{
    render_allowed_ips, render_allowed_ips_line, splice_allowed_ips, splice_allowed_ips_file,
};
