use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Field;
use crate::{Error, Result};

pub const DEFAULT_COLOR: &str = "#ffffff";

pub const PALETTE: &[&str] = &[
    "default", "red", "orange", "yellow", "green", "teal", "blue", "purple", "pink", "brown",
    "gray",
];

static HEX_COLOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^#(?:[0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// Accept a 3/6-digit hex code or a palette name; hex codes are lowercased
pub fn normalize(color: &str) -> Result<String> {
    let trimmed = color.trim();
    if HEX_COLOR.is_match(trimmed) {
        return Ok(trimmed.to_lowercase());
    }
    let lower = trimmed.to_lowercase();
    if PALETTE.contains(&lower.as_str()) {
        return Ok(lower);
    }
    Err(Error::validation(
        Field::Color,
        format!("'{}' is neither a hex code nor a palette color", trimmed),
    ))
}
