//! Authentication Models
//! Mission: Define the credential, role and token payload structures

use serde::{Deserialize, Serialize};

/// Roles known to the notice board
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    #[serde(rename = "admin")]
    Admin, // May create, update and delete notices
    #[serde(rename = "student")]
    Student, // Read-only
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Student => "student",
        }
    }

    /// Exact, case-sensitive match against the wire names.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "admin" => Some(Role::Admin),
            "student" => Some(Role::Student),
            _ => None,
        }
    }
}

/// A fixed login entry. Passwords are compared as plaintext.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credential {
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl Credential {
    pub fn new(email: &str, password: &str, role: Role) -> Self {
        Self {
            email: email.to_string(),
            password: password.to_string(),
            role,
        }
    }
}

/// JWT Claims payload
///
/// `role` stays a raw string so that a token carrying any other value still
/// decodes and is simply treated as non-admin.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    pub email: String,
    pub role: String,
    pub iat: i64, // issued at, unix seconds
    pub exp: i64, // expiry, unix seconds
}

impl Claims {
    pub fn role(&self) -> Option<Role> {
        Role::parse(&self.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role() == Some(Role::Admin)
    }
}

/// Login request body
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
    pub role: String,
}

/// Login response
#[derive(Debug, Serialize, Deserialize)]
pub struct LoginResponse {
    pub success: bool,
    pub role: Role,
    pub token: String,
}
