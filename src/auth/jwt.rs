//! JWT Token Handler
//! Mission: Issue and verify short-lived session tokens

use crate::auth::models::{Claims, Role};
use anyhow::{Context, Result};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use tracing::debug;

/// Signing secret used when none is configured. Only fit for tests.
pub const INSECURE_DEFAULT_SECRET: &str = "supersecretkey";

/// Session lifetime from issuance.
pub const TOKEN_TTL_HOURS: i64 = 2;

/// Token rejected: bad signature, malformed payload, or expired.
///
/// The causes are deliberately collapsed into one value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidToken;

impl std::fmt::Display for InvalidToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Token is not valid")
    }
}

impl std::error::Error for InvalidToken {}

/// JWT Handler for token operations
pub struct JwtHandler {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    ttl: Duration,
}

impl JwtHandler {
    /// Create a new JWT handler with secret key
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::default();
        // Expiry is checked by hand so the boundary is exclusive and clock-injectable.
        validation.validate_exp = false;
        validation.leeway = 0;

        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            ttl: Duration::hours(TOKEN_TTL_HOURS),
        }
    }

    /// Issue a token for `email`/`role`, valid for two hours from now.
    pub fn issue(&self, email: &str, role: Role) -> Result<String> {
        self.issue_at(email, role, Utc::now())
    }

    pub fn issue_at(&self, email: &str, role: Role, now: DateTime<Utc>) -> Result<String> {
        let expiration = now
            .checked_add_signed(self.ttl)
            .context("Invalid timestamp")?;

        let claims = Claims {
            email: email.to_string(),
            role: role.as_str().to_string(),
            iat: now.timestamp(),
            exp: expiration.timestamp(),
        };

        debug!(
            "Issuing JWT for {} ({}), expires at {}",
            email,
            role.as_str(),
            expiration.to_rfc3339()
        );

        encode(&Header::default(), &claims, &self.encoding_key).context("Failed to generate JWT")
    }

    /// Verify signature and expiry against the current clock.
    pub fn verify(&self, token: &str) -> Result<Claims, InvalidToken> {
        self.verify_at(token, Utc::now())
    }

    /// Accepted while `now < exp`; rejected at or after expiry.
    pub fn verify_at(&self, token: &str, now: DateTime<Utc>) -> Result<Claims, InvalidToken> {
        let decoded = decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
            debug!("JWT rejected: {}", e);
            InvalidToken
        })?;

        if now.timestamp() >= decoded.claims.exp {
            debug!("JWT expired for {}", decoded.claims.email);
            return Err(InvalidToken);
        }

        Ok(decoded.claims)
    }
}
