//! Nomination rules: everything between the HTTP routes and the store.

pub mod commissions;
pub mod finalization;
pub mod link_code;
pub mod members;
pub mod ranking;
pub mod roles;
pub mod sessions;
pub mod submission;
pub mod surveys;
pub mod tally;
pub mod tenants;

use crate::error::{Error, Result};

/// Trim a required text field, rejecting blank values.
pub(crate) fn required(value: &str, what: &str) -> Result<String> {
    let value = value.trim();
    if value.is_empty() {
        Err(Error::invalid(format!("{what} must not be empty")))
    } else {
        Ok(value.to_string())
    }
}

/// Trim optional free text, treating blank values as absent.
pub(crate) fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn text_fields_are_trimmed() {
        assert_eq!(required("  Elders ", "Role name").unwrap(), "Elders");
        assert!(matches!(required("   ", "Role name"), Err(Error::Validation(_))));
        assert_eq!(optional(Some("  ".to_string())), None);
        assert_eq!(optional(Some(" x ".to_string())).as_deref(), Some("x"));
    }
}
