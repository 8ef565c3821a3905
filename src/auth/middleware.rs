//! Authentication Middleware
//! Mission: Gate mutating endpoints behind a valid token and the admin role

use crate::auth::{jwt::JwtHandler, models::Claims};
use axum::{
    extract::{Request, State},
    http::{header, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{debug, warn};

/// Auth middleware that validates JWT tokens
///
/// Layer this before [`admin_only`]; it attaches the decoded [`Claims`] to
/// the request extensions.
pub async fn auth_middleware(
    State(jwt_handler): State<Arc<JwtHandler>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let token = bearer_token(&req)?.to_string();

    let claims = jwt_handler
        .verify(&token)
        .map_err(|_| AuthError::InvalidToken)?;

    debug!("Authenticated {} ({})", claims.email, claims.role);

    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}

/// Role check, run after [`auth_middleware`].
pub async fn admin_only(req: Request, next: Next) -> Result<Response, AuthError> {
    let claims = extract_claims(&req).ok_or(AuthError::MissingToken)?;

    if !claims.is_admin() {
        warn!("Non-admin {} ({}) denied", claims.email, claims.role);
        return Err(AuthError::AdminOnly);
    }

    Ok(next.run(req).await)
}

/// Pull the token out of `Authorization: <scheme> <token>`.
fn bearer_token(req: &Request) -> Result<&str, AuthError> {
    let value = req
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or(AuthError::MissingToken)?;

    value
        .to_str()
        .ok()
        .and_then(|s| s.split(' ').nth(1))
        .filter(|t| !t.is_empty())
        .ok_or(AuthError::InvalidFormat)
}

/// Extract claims from request (use after auth middleware)
pub fn extract_claims(req: &Request) -> Option<&Claims> {
    req.extensions().get::<Claims>()
}

/// Auth error types
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthError {
    MissingToken,
    InvalidFormat,
    InvalidToken,
    AdminOnly,
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::MissingToken | AuthError::InvalidFormat => StatusCode::UNAUTHORIZED,
            AuthError::InvalidToken | AuthError::AdminOnly => StatusCode::FORBIDDEN,
        }
    }

    pub fn message(&self) -> &'static str {
        match self {
            AuthError::MissingToken => "No token provided",
            AuthError::InvalidFormat => "Invalid token format",
            AuthError::InvalidToken => "Token is not valid",
            AuthError::AdminOnly => "Admins only!",
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "message": self.message() }))).into_response()
    }
}
