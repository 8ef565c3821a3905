//! Credential Store
//! Mission: Answer "does this (email, password, role) triple log in?"

use crate::auth::models::{Credential, Role};

/// Lookup seam for login credentials.
///
/// Handlers only see this trait, so a table-backed or hashing store can
/// replace the static list without touching the guard or the login route.
pub trait CredentialStore: Send + Sync {
    fn find_match(&self, email: &str, password: &str, role: Role) -> Option<Credential>;
}

/// Fixed, in-memory credential list. Read-only after construction.
#[derive(Debug, Clone)]
pub struct StaticCredentialStore {
    credentials: Vec<Credential>,
}

impl StaticCredentialStore {
    pub fn new(credentials: Vec<Credential>) -> Self {
        Self { credentials }
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.credentials.len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.credentials.is_empty()
    }
}

impl Default for StaticCredentialStore {
    /// The demo accounts shipped with the board.
    fn default() -> Self {
        Self::new(vec![
            Credential::new("admin@college.com", "admin123", Role::Admin),
            Credential::new("student@college.com", "student123", Role::Student),
        ])
    }
}

impl CredentialStore for StaticCredentialStore {
    fn find_match(&self, email: &str, password: &str, role: Role) -> Option<Credential> {
        // Plaintext comparison; no normalisation of case or whitespace.
        self.credentials
            .iter()
            .find(|c| c.email == email && c.password == password && c.role == role)
            .cloned()
    }
}
