//! Writing an AllowedIPs list into WireGuard configuration text.

use crate::error::ConfigError;
use itertools::Itertools;
use regex::{Captures, Regex};
use std::path::Path;
use std::sync::OnceLock;

/// Matches the key part of an `AllowedIPs = ...` line; the value runs to end of line.
static ALLOWED_IPS_REGEX: OnceLock<Regex> = OnceLock::new();

fn get_allowed_ips_regex() -> &'static Regex {
    ALLOWED_IPS_REGEX.get_or_init(|| {
        Regex::new(r"(?im)^([ \t]*AllowedIPs[ \t]*=)[^\r\n]*").expect("Invalid Regex")
    })
}

/// Comma-join CIDR blocks the way WireGuard configs list them.
pub fn render_allowed_ips<S: AsRef<str>>(cidrs: &[S]) -> String {
    cidrs.iter().map(|c| c.as_ref()).join(", ")
}

pub fn render_allowed_ips_line<S: AsRef<str>>(cidrs: &[S]) -> String {
    format!("AllowedIPs = {}", render_allowed_ips(cidrs))
}

/// Replace the value of every `AllowedIPs =` line in `config_text`.
///
/// Everything else, including line endings, is left as it was.
pub fn splice_allowed_ips<S: AsRef<str>>(
    config_text: &str,
    cidrs: &[S],
) -> Result<String, ConfigError> {
    let re = get_allowed_ips_regex();
    if !re.is_match(config_text) {
        return Err(ConfigError::MissingAllowedIps);
    }

    let value = render_allowed_ips(cidrs);
    let spliced = re.replace_all(config_text, |caps: &Captures| {
        if value.is_empty() {
            caps[1].to_string()
        } else {
            format!("{} {}", &caps[1], value)
        }
    });
    log::debug!("Spliced {} blocks into AllowedIPs", cidrs.len());
    Ok(spliced.into_owned())
}

/// Splice into a config file in place and return the new text.
pub fn splice_allowed_ips_file<S: AsRef<str>>(
    path: &Path,
    cidrs: &[S],
) -> Result<String, ConfigError> {
    let file = path.display().to_string();
    let io_error = |source: std::io::Error| ConfigError::Io {
        file: file.clone(),
        source,
    };

    let config_text = std::fs::read_to_string(path).map_err(io_error)?;
    let spliced = splice_allowed_ips(&config_text, cidrs)?;
    std::fs::write(path, &spliced).map_err(io_error)?;
    log::info!("Updated AllowedIPs in {file}");
    Ok(spliced)
}
