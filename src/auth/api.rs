//! Authentication API Endpoints
//! Mission: Exchange a fixed credential for a session token

use crate::auth::{
    credentials::CredentialStore,
    jwt::JwtHandler,
    models::{LoginRequest, LoginResponse, Role},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Shared auth state
#[derive(Clone)]
pub struct AuthState {
    pub credentials: Arc<dyn CredentialStore>,
    pub jwt_handler: Arc<JwtHandler>,
}

impl AuthState {
    pub fn new(credentials: Arc<dyn CredentialStore>, jwt_handler: Arc<JwtHandler>) -> Self {
        Self {
            credentials,
            jwt_handler,
        }
    }
}

/// Create the auth router (public, no token required).
pub fn auth_router() -> Router<AuthState> {
    Router::new().route("/api/login", post(login))
}

/// Login endpoint - POST /api/login
pub async fn login(
    State(state): State<AuthState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthApiError> {
    let payload = match payload {
        Ok(Json(p)) => p,
        Err(e) => {
            warn!("Unreadable login body: {}", e);
            LoginRequest::default()
        }
    };

    info!("🔐 Login attempt: {}", payload.email);

    let credential = Role::parse(&payload.role)
        .and_then(|role| {
            state
                .credentials
                .find_match(&payload.email, &payload.password, role)
        })
        .ok_or_else(|| {
            warn!("❌ Failed login attempt: {}", payload.email);
            AuthApiError::InvalidCredentials
        })?;

    let token = state
        .jwt_handler
        .issue(&credential.email, credential.role)
        .map_err(|e| {
            error!("Failed to issue token for {}: {:#}", credential.email, e);
            AuthApiError::InternalError
        })?;

    info!(
        "✅ Login successful: {} ({})",
        credential.email,
        credential.role.as_str()
    );

    Ok(Json(LoginResponse {
        success: true,
        role: credential.role,
        token,
    }))
}

/// Auth API errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthApiError {
    InvalidCredentials,
    InternalError,
}

impl IntoResponse for AuthApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AuthApiError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "Invalid credentials"),
            AuthApiError::InternalError => {
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal server error")
            }
        };

        (status, Json(json!({ "success": false, "message": message }))).into_response()
    }
}
