use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::Field;
use crate::{Error, Result};

pub const MAX_SHARED_WITH: usize = 100;

static EMAIL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").unwrap());

pub fn is_valid(email: &str) -> bool {
    EMAIL.is_match(email.trim())
}

/// Canonical form used for storage and comparison
pub fn normalize(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Validate, lowercase and de-duplicate a collaborator list
pub fn normalize_list(emails: &[String]) -> Result<Vec<String>> {
    let mut out: Vec<String> = Vec::with_capacity(emails.len());
    for raw in emails {
        if !is_valid(raw) {
            return Err(Error::validation(
                Field::Email,
                format!("'{}' is not a valid email address", raw.trim()),
            ));
        }
        let email = normalize(raw);
        if !out.contains(&email) {
            out.push(email);
        }
    }
    validate_list(&out)?;
    Ok(out)
}

pub fn validate_list(emails: &[String]) -> Result<()> {
    if emails.len() > MAX_SHARED_WITH {
        return Err(Error::validation(
            Field::SharedWith,
            format!("a note cannot be shared with more than {} people", MAX_SHARED_WITH),
        ));
    }
    if let Some(bad) = emails.iter().find(|e| !is_valid(e)) {
        return Err(Error::validation(
            Field::SharedWith,
            format!("'{}' is not a valid email address", bad),
        ));
    }
    Ok(())
}
