//! Admin Allow-List
//!
//! Static set of email addresses authorized to use the admin area.
//! Loaded once from configuration; membership is case-insensitive
//! equality, not pattern matching.

use crate::domain::session::AuthUser;

/// Admin email allow-list
#[derive(Debug, Clone, Default)]
pub struct AdminAllowList {
    /// Lowercased, trimmed entries
    emails: Vec<String>,
}

impl AdminAllowList {
    /// Parse a comma-separated email list (the `ADMIN_ALLOWED_EMAILS` format)
    ///
    /// Entries are whitespace-trimmed and lowercased; empty entries are
    /// dropped, so `"a@x.com, ,B@Y.com"` yields two entries.
    pub fn from_csv(raw: &str) -> Self {
        let emails = raw
            .split(',')
            .map(|entry| entry.trim().to_lowercase())
            .filter(|entry| !entry.is_empty())
            .collect();

        Self { emails }
    }

    pub fn is_empty(&self) -> bool {
        self.emails.is_empty()
    }

    pub fn len(&self) -> usize {
        self.emails.len()
    }

    /// Case-insensitive membership test
    pub fn contains(&self, email: &str) -> bool {
        let email = email.trim().to_lowercase();
        self.emails.iter().any(|entry| *entry == email)
    }

    /// Whether a user may enter the admin area
    ///
    /// A user with no email is never an admin.
    pub fn permits(&self, user: &AuthUser) -> bool {
        user.email
            .as_deref()
            .is_some_and(|email| self.contains(email))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_csv_trims_and_lowercases() {
        let list = AdminAllowList::from_csv(" Admin@Example.com ,, other@site.io ");
        assert_eq!(list.len(), 2);
        assert!(list.contains("admin@example.com"));
        assert!(list.contains("other@site.io"));
    }

    #[test]
    fn test_contains_is_case_insensitive() {
        let list = AdminAllowList::from_csv("Admin@Example.com");
        assert!(list.contains("admin@example.com"));
        assert!(list.contains("ADMIN@EXAMPLE.COM"));
        assert!(!list.contains("someone@example.com"));
    }

    #[test]
    fn test_empty_input() {
        let list = AdminAllowList::from_csv("");
        assert!(list.is_empty());
        assert!(!list.contains("admin@example.com"));
    }

    #[test]
    fn test_permits_requires_email() {
        let list = AdminAllowList::from_csv("admin@example.com");

        let no_email = AuthUser {
            id: "u1".to_string(),
            email: None,
            factors: vec![],
        };
        assert!(!list.permits(&no_email));

        let admin = AuthUser {
            id: "u2".to_string(),
            email: Some("Admin@Example.com".to_string()),
            factors: vec![],
        };
        assert!(list.permits(&admin));
    }
}
