//! Notice API Endpoints
//! Mission: Public notice listing, admin-only create/update/delete

use crate::auth::{admin_only, auth_middleware, JwtHandler};
use crate::notices::{
    models::{Notice, NoticeFields},
    store::NoticeStore,
};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    middleware,
    response::{IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::sync::Arc;
use tracing::{error, warn};

/// `{message, notice}` envelope for create and update.
#[derive(Debug, Serialize, Deserialize)]
pub struct NoticeResponse {
    pub message: String,
    pub notice: Option<Notice>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct MessageResponse {
    pub message: String,
}

/// GET /api/notices (public)
pub fn notices_public_router() -> Router<Arc<NoticeStore>> {
    Router::new().route("/api/notices", get(list_notices))
}

/// Mutating notice routes, behind token + admin checks.
pub fn notices_admin_router(jwt_handler: Arc<JwtHandler>) -> Router<Arc<NoticeStore>> {
    Router::new()
        .route("/api/notices", post(create_notice))
        .route("/api/notices/:id", put(update_notice).delete(delete_notice))
        .route_layer(middleware::from_fn(admin_only))
        .route_layer(middleware::from_fn_with_state(jwt_handler, auth_middleware))
}

/// List notices - GET /api/notices
pub async fn list_notices(
    State(store): State<Arc<NoticeStore>>,
) -> Result<Json<Vec<Notice>>, NoticeApiError> {
    let notices = store.list_sorted().await.map_err(|e| {
        error!("Failed to list notices: {:#}", e);
        NoticeApiError::Fetch
    })?;

    Ok(Json(notices))
}

/// Create notice - POST /api/notices (Admin only)
pub async fn create_notice(
    State(store): State<Arc<NoticeStore>>,
    payload: Result<Json<NoticeFields>, JsonRejection>,
) -> Result<Json<NoticeResponse>, NoticeApiError> {
    let fields = notice_fields(payload).map_err(|_| NoticeApiError::Create)?;

    let notice = store.insert(fields).await.map_err(|e| {
        error!("Failed to create notice: {:#}", e);
        NoticeApiError::Create
    })?;

    Ok(Json(NoticeResponse {
        message: "Notice created successfully".to_string(),
        notice: Some(notice),
    }))
}

/// Update notice - PUT /api/notices/:id (Admin only)
///
/// An unknown id is not an error; the response carries `notice: null`.
pub async fn update_notice(
    State(store): State<Arc<NoticeStore>>,
    Path(id): Path<String>,
    payload: Result<Json<NoticeFields>, JsonRejection>,
) -> Result<Json<NoticeResponse>, NoticeApiError> {
    let fields = notice_fields(payload).map_err(|_| NoticeApiError::Update)?;

    let notice = store.update_by_id(&id, fields).await.map_err(|e| {
        error!("Failed to update notice {}: {:#}", id, e);
        NoticeApiError::Update
    })?;

    Ok(Json(NoticeResponse {
        message: "Notice updated".to_string(),
        notice,
    }))
}

/// Delete notice - DELETE /api/notices/:id (Admin only)
pub async fn delete_notice(
    State(store): State<Arc<NoticeStore>>,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, NoticeApiError> {
    store.delete_by_id(&id).await.map_err(|e| {
        error!("Failed to delete notice {}: {:#}", id, e);
        NoticeApiError::Delete
    })?;

    Ok(Json(MessageResponse {
        message: "Notice deleted".to_string(),
    }))
}

/// A request with no JSON content type carries no fields; anything that
/// fails to decode is rejected.
fn notice_fields(
    payload: Result<Json<NoticeFields>, JsonRejection>,
) -> Result<NoticeFields, JsonRejection> {
    match payload {
        Ok(Json(fields)) => Ok(fields),
        Err(JsonRejection::MissingJsonContentType(_)) => Ok(NoticeFields::default()),
        Err(e) => {
            warn!("Unusable notice body: {}", e);
            Err(e)
        }
    }
}

/// Notice API errors. Storage detail is logged, never returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeApiError {
    Fetch,
    Create,
    Update,
    Delete,
}

impl IntoResponse for NoticeApiError {
    fn into_response(self) -> Response {
        let message = match self {
            NoticeApiError::Fetch => "Failed to fetch notices",
            NoticeApiError::Create => "Failed to create notice",
            NoticeApiError::Update => "Failed to update notice",
            NoticeApiError::Delete => "Failed to delete notice",
        };

        (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({ "message": message })),
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::Role;
    use axum::{
        body::{to_bytes, Body},
        http::{header, Request},
    };
    use serde_json::Value;
    use tower::ServiceExt;

    const SECRET: &str = "notice-api-secret";

    fn app(store: Arc<NoticeStore>) -> Router {
        let jwt = Arc::new(JwtHandler::new(SECRET));
        notices_public_router()
            .merge(notices_admin_router(jwt))
            .with_state(store)
    }

    fn bearer(role: Role) -> String {
        let token = JwtHandler::new(SECRET)
            .issue("someone@college.com", role)
            .unwrap();
        format!("Bearer {}", token)
    }

    async fn send(
        store: Arc<NoticeStore>,
        method: &str,
        uri: &str,
        auth: Option<String>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(value) = auth {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        let body = match body {
            Some(json) => {
                builder = builder.header(header::CONTENT_TYPE, "application/json");
                Body::from(json.to_string())
            }
            None => Body::empty(),
        };

        let response = app(store)
            .oneshot(builder.body(body).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap()
        };
        (status, json)
    }

    #[tokio::test]
    async fn test_list_is_public() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        store.insert(NoticeFields::titled("open day")).await.unwrap();

        let (status, json) = send(store, "GET", "/api/notices", None, None).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json.as_array().unwrap().len(), 1);
        assert_eq!(json[0]["title"], "open day");
    }

    #[tokio::test]
    async fn test_admin_create_returns_record() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let (status, json) = send(
            store.clone(),
            "POST",
            "/api/notices",
            Some(bearer(Role::Admin)),
            Some(json!({ "title": "Exams", "category": "academic", "postedBy": "Dean" })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Notice created successfully");
        assert_eq!(json["notice"]["title"], "Exams");
        assert_eq!(json["notice"]["postedBy"], "Dean");
        assert_eq!(json["notice"]["pinned"], false);
        assert!(json["notice"]["id"].is_string());
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_create_without_content_type_uses_defaults() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let (status, json) = send(
            store.clone(),
            "POST",
            "/api/notices",
            Some(bearer(Role::Admin)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["notice"]["title"].is_null());
        assert_eq!(json["notice"]["pinned"], false);
    }

    #[tokio::test]
    async fn test_create_with_uncastable_field_is_500() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let (status, json) = send(
            store.clone(),
            "POST",
            "/api/notices",
            Some(bearer(Role::Admin)),
            Some(json!({ "title": "x", "pinned": "sometimes" })),
        )
        .await;

        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(json["message"], "Failed to create notice");
        assert_eq!(store.count().await.unwrap(), 0);
    }

    async fn create_as_admin(body: Value) -> (StatusCode, Value) {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        send(store, "POST", "/api/notices", Some(bearer(Role::Admin)), Some(body)).await
    }

    #[tokio::test]
    async fn test_create_accepts_date_only_string() {
        let (status, json) = create_as_admin(json!({ "date": "2025-03-01" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notice"]["date"], "2025-03-01T00:00:00Z");
    }

    #[tokio::test]
    async fn test_create_accepts_epoch_millis_date() {
        let (status, json) = create_as_admin(json!({ "date": 1700000000000_i64 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notice"]["date"], "2023-11-14T22:13:20Z");
    }

    #[tokio::test]
    async fn test_create_accepts_string_flag() {
        let (status, json) = create_as_admin(json!({ "pinned": "true" })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notice"]["pinned"], true);
    }

    #[tokio::test]
    async fn test_create_casts_number_to_text() {
        let (status, json) = create_as_admin(json!({ "title": 5 })).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["notice"]["title"], "5");
    }

    #[tokio::test]
    async fn test_update_null_clears_field() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let existing = store
            .insert(NoticeFields::titled("t").with_body("old"))
            .await
            .unwrap();

        let (status, json) = send(
            store.clone(),
            "PUT",
            &format!("/api/notices/{}", existing.id),
            Some(bearer(Role::Admin)),
            Some(json!({ "body": null })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert!(json["notice"]["body"].is_null());
        assert_eq!(json["notice"]["title"], "t");

        let stored = store.list_sorted().await.unwrap();
        assert_eq!(stored[0].body, None);
        assert_eq!(stored[0].title.as_deref(), Some("t"));
    }

    #[tokio::test]
    async fn test_mutations_rejected_without_admin() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let existing = store.insert(NoticeFields::titled("keep")).await.unwrap();
        let item_uri = format!("/api/notices/{}", existing.id);

        let cases: Vec<(&str, &str, Option<String>, StatusCode)> = vec![
            ("POST", "/api/notices", None, StatusCode::UNAUTHORIZED),
            ("POST", "/api/notices", Some(bearer(Role::Student)), StatusCode::FORBIDDEN),
            ("PUT", item_uri.as_str(), None, StatusCode::UNAUTHORIZED),
            ("PUT", item_uri.as_str(), Some(bearer(Role::Student)), StatusCode::FORBIDDEN),
            ("PUT", item_uri.as_str(), Some("Bearer garbage".to_string()), StatusCode::FORBIDDEN),
            ("DELETE", item_uri.as_str(), None, StatusCode::UNAUTHORIZED),
            ("DELETE", item_uri.as_str(), Some(bearer(Role::Student)), StatusCode::FORBIDDEN),
        ];

        for (method, uri, auth, expected) in cases {
            let (status, json) = send(
                store.clone(),
                method,
                uri,
                auth,
                Some(json!({ "title": "changed", "pinned": true })),
            )
            .await;
            assert_eq!(status, expected, "{} {}", method, uri);
            assert!(json["message"].is_string());
        }

        let notices = store.list_sorted().await.unwrap();
        assert_eq!(notices, vec![existing]);
    }

    #[tokio::test]
    async fn test_update_unknown_id_returns_null_notice() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let (status, json) = send(
            store.clone(),
            "PUT",
            "/api/notices/does-not-exist",
            Some(bearer(Role::Admin)),
            Some(json!({ "pinned": true })),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Notice updated");
        assert!(json["notice"].is_null());
        assert_eq!(store.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_delete_unknown_id_is_ok() {
        let store = Arc::new(NoticeStore::in_memory().unwrap());
        let (status, json) = send(
            store,
            "DELETE",
            "/api/notices/does-not-exist",
            Some(bearer(Role::Admin)),
            None,
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["message"], "Notice deleted");
    }

    #[test]
    fn test_notice_api_error_responses() {
        for err in [
            NoticeApiError::Fetch,
            NoticeApiError::Create,
            NoticeApiError::Update,
            NoticeApiError::Delete,
        ] {
            assert_eq!(
                err.into_response().status(),
                StatusCode::INTERNAL_SERVER_ERROR
            );
        }
    }
}
