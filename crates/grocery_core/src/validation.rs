//! Pure name checks run before any create or rename.

use crate::error::NameError;
use crate::model::GroceryList;

pub const MIN_LIST_NAME_LEN: usize = 3;
pub const MAX_LIST_NAME_LEN: usize = 50;
pub const MAX_LISTS: usize = 20;
pub const MIN_ITEM_NAME_LEN: usize = 2;

/// Checks a candidate list name against length, capacity and uniqueness rules.
///
/// Lengths count characters of the trimmed name. Uniqueness is checked
/// case-insensitively against every existing list, including the one being
/// renamed.
pub fn validate_list_name(candidate: &str, existing: &[GroceryList]) -> Result<(), NameError> {
    let trimmed = candidate.trim();
    let len = trimmed.chars().count();
    if len < MIN_LIST_NAME_LEN {
        return Err(NameError::TooShort {
            min: MIN_LIST_NAME_LEN,
        });
    }
    if len > MAX_LIST_NAME_LEN {
        return Err(NameError::TooLong {
            max: MAX_LIST_NAME_LEN,
        });
    }
    if existing.len() >= MAX_LISTS {
        return Err(NameError::LimitReached { max: MAX_LISTS });
    }
    let wanted = trimmed.to_lowercase();
    if existing
        .iter()
        .any(|list| list.name.trim().to_lowercase() == wanted)
    {
        return Err(NameError::DuplicateName);
    }
    Ok(())
}

pub fn validate_item_name(candidate: &str) -> Result<(), NameError> {
    if candidate.trim().chars().count() < MIN_ITEM_NAME_LEN {
        return Err(NameError::TooShort {
            min: MIN_ITEM_NAME_LEN,
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lists(names: &[&str]) -> Vec<GroceryList> {
        names
            .iter()
            .enumerate()
            .map(|(i, name)| GroceryList::new(*name, i as i64))
            .collect()
    }

    #[test]
    fn list_name_bounds() {
        let existing = lists(&["Weekly"]);
        assert_eq!(
            validate_list_name("ab", &existing),
            Err(NameError::TooShort { min: 3 })
        );
        assert_eq!(
            validate_list_name("   abc   ", &existing),
            Ok(())
        );
        assert_eq!(
            validate_list_name(&"x".repeat(51), &existing),
            Err(NameError::TooLong { max: 50 })
        );
        assert_eq!(validate_list_name(&"x".repeat(50), &existing), Ok(()));
    }

    #[test]
    fn duplicate_is_case_insensitive() {
        let existing = lists(&["Weekly"]);
        assert_eq!(
            validate_list_name(" WEEKLY ", &existing),
            Err(NameError::DuplicateName)
        );
    }

    #[test]
    fn limit_checked_before_duplicates() {
        let names: Vec<String> = (0..MAX_LISTS).map(|i| format!("List {i}")).collect();
        let refs: Vec<&str> = names.iter().map(String::as_str).collect();
        let existing = lists(&refs);
        assert_eq!(
            validate_list_name("List 0", &existing),
            Err(NameError::LimitReached { max: MAX_LISTS })
        );
    }

    #[test]
    fn item_name_needs_two_chars() {
        assert!(validate_item_name(" a ").is_err());
        assert!(validate_item_name("ab").is_ok());
    }
}
