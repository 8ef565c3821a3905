//! Application context and router assembly.

use crate::{
    auth::{auth_router, AuthState, CredentialStore, JwtHandler, StaticCredentialStore},
    config::Config,
    middleware::request_logging,
    notices::{notices_admin_router, notices_public_router, NoticeStore},
};
use anyhow::Result;
use axum::{middleware, Router};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Everything a request handler may touch, built once at startup.
#[derive(Clone)]
pub struct AppState {
    pub credentials: Arc<dyn CredentialStore>,
    pub jwt_handler: Arc<JwtHandler>,
    pub notices: Arc<NoticeStore>,
}

impl AppState {
    pub fn new(
        credentials: Arc<dyn CredentialStore>,
        jwt_handler: Arc<JwtHandler>,
        notices: Arc<NoticeStore>,
    ) -> Self {
        Self {
            credentials,
            jwt_handler,
            notices,
        }
    }

    /// Default credential list, configured secret, store opened at the configured path.
    pub fn from_config(config: &Config) -> Result<Self> {
        let notices = if config.database_path == ":memory:" {
            NoticeStore::in_memory()?
        } else {
            NoticeStore::new(&config.database_path)?
        };

        Ok(Self::new(
            Arc::new(StaticCredentialStore::default()),
            Arc::new(JwtHandler::new(config.signing_secret())),
            Arc::new(notices),
        ))
    }
}

/// Full HTTP surface: login, public listing, admin mutations.
pub fn build_router(state: AppState) -> Router {
    let auth_routes = auth_router().with_state(AuthState::new(
        state.credentials.clone(),
        state.jwt_handler.clone(),
    ));

    let notice_routes = notices_public_router()
        .merge(notices_admin_router(state.jwt_handler.clone()))
        .with_state(state.notices);

    Router::new()
        .merge(auth_routes)
        .merge(notice_routes)
        .layer(middleware::from_fn(request_logging))
        .layer(CorsLayer::permissive())
}
