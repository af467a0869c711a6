use crate::error::Field;
use crate::{Error, Result};

pub const MAX_TAGS: usize = 50;
pub const MAX_TAG_CHARS: usize = 20;

/// Trim every tag and drop blank entries, keeping the caller's order
pub fn normalize_list(tags: &[String]) -> Result<Vec<String>> {
    let tags: Vec<String> = tags
        .iter()
        .map(|t| t.trim())
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect();
    validate_list(&tags)?;
    Ok(tags)
}

pub fn validate_list(tags: &[String]) -> Result<()> {
    if tags.len() > MAX_TAGS {
        return Err(Error::validation(
            Field::Tags,
            format!("a note cannot have more than {} tags", MAX_TAGS),
        ));
    }
    for tag in tags {
        if !is_valid_name(tag) {
            return Err(Error::validation(
                Field::Tags,
                format!("tag '{}' must be 1-{} characters", tag, MAX_TAG_CHARS),
            ));
        }
    }
    Ok(())
}

/// Validate tag name
pub fn is_valid_name(name: &str) -> bool {
    let len = name.trim().chars().count();
    (1..=MAX_TAG_CHARS).contains(&len)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_name() {
        assert!(is_valid_name("work"));
        assert!(is_valid_name("  work  "));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("   "));
        assert!(!is_valid_name(&"t".repeat(21)));
    }

    #[test]
    fn test_normalize_list_trims_and_drops_blank() {
        let tags = vec![" work ".to_string(), "".to_string(), "ideas".to_string()];
        assert_eq!(normalize_list(&tags).unwrap(), vec!["work", "ideas"]);
    }

    #[test]
    fn test_too_many_tags() {
        let tags: Vec<String> = (0..51).map(|i| format!("t{}", i)).collect();
        assert!(matches!(
            normalize_list(&tags),
            Err(Error::Validation { field: Field::Tags, .. })
        ));
    }
}
