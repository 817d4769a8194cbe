//! Admin login/logout (cookie based)

use axum::{
    Json, Router,
    extract::State,
    response::{AppendHeaders, IntoResponse},
    routing::post,
};
use serde::Deserialize;
use shared::error::{ApiResponse, AppError};

use crate::auth::admin_auth::{login_cookies, logout_cookies};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/admin/login", post(login))
        .route("/api/admin/logout", post(logout))
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

/// POST /api/admin/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<impl IntoResponse, AppError> {
    if state.admin.authorize(&req.username, &req.password).is_none() {
        tracing::warn!(username = %req.username, "Admin login failed");
        return Err(AppError::invalid_credentials());
    }
    tracing::info!(username = %req.username, "Admin logged in");
    Ok((
        AppendHeaders(login_cookies(&req.username, &req.password)),
        ApiResponse::ok(),
    ))
}

/// POST /api/admin/logout
pub async fn logout() -> impl IntoResponse {
    (AppendHeaders(logout_cookies()), ApiResponse::ok())
}

#[cfg(test)]
mod tests {
    use http::StatusCode;
    use http::header::SET_COOKIE;
    use serde_json::json;

    use crate::api::test_support::*;

    #[tokio::test]
    async fn login_sets_both_cookies() {
        let response = send(json(
            "POST",
            "/api/admin/login",
            json!({ "username": "admin", "password": "hunter2" }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response
            .headers()
            .get_all(SET_COOKIE)
            .iter()
            .map(|v| v.to_str().unwrap().to_string())
            .collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies[0].starts_with("roster_admin_user=admin;"));
        assert!(cookies[1].starts_with("roster_admin_pass=hunter2;"));
    }

    #[tokio::test]
    async fn wrong_password_is_401() {
        let response = send(json(
            "POST",
            "/api/admin/login",
            json!({ "username": "admin", "password": "hunter3" }),
        ))
        .await;
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
        assert!(response.headers().get(SET_COOKIE).is_none());
    }

    #[tokio::test]
    async fn logout_clears_cookies() {
        let response = send(json("POST", "/api/admin/logout", json!({}))).await;
        assert_eq!(response.status(), StatusCode::OK);
        let cookies: Vec<_> = response.headers().get_all(SET_COOKIE).iter().collect();
        assert_eq!(cookies.len(), 2);
        assert!(cookies.iter().all(|c| c.to_str().unwrap().contains("Max-Age=0")));
    }
}
