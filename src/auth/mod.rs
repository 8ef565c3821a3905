//! Authentication Module
//! Mission: Fixed-credential login, stateless JWT sessions, admin gating

pub mod api;
pub mod credentials;
pub mod jwt;
pub mod middleware;
pub mod models;

pub use api::{auth_router, AuthState};
pub use credentials::{CredentialStore, StaticCredentialStore};
pub use jwt::{InvalidToken, JwtHandler};
pub use middleware::{admin_only, auth_middleware};
pub use models::{Claims, Credential, Role};
