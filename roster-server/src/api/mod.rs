//! HTTP API
//!
//! Public routes (event pages, check-in, registration) and admin routes
//! behind the cookie gate, all JSON.

pub mod admin;
pub mod auth;
pub mod events;
pub mod health;
pub mod members;
pub mod rest;
pub mod semesters;

use axum::{Json, Router, middleware};
use http::{HeaderName, HeaderValue};
use tower_http::compression::CompressionLayer;
use tower_http::cors::CorsLayer;
use tower_http::request_id::{MakeRequestId, PropagateRequestIdLayer, RequestId, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use uuid::Uuid;

use crate::auth::admin_auth_middleware;
use crate::error::ServiceError;
use crate::state::AppState;

pub type ApiResult<T> = Result<Json<T>, ServiceError>;

const REQUEST_ID_HEADER: &str = "x-request-id";

/// Request id generator (uuid v4)
#[derive(Clone)]
struct XRequestId;

impl MakeRequestId for XRequestId {
    fn make_request_id<B>(&mut self, _request: &http::Request<B>) -> Option<RequestId> {
        HeaderValue::from_str(&Uuid::new_v4().to_string())
            .ok()
            .map(RequestId::new)
    }
}

/// Build the application with all routes, middleware and state
pub fn build_app(state: AppState) -> Router {
    let admin = admin::router().route_layer(middleware::from_fn_with_state(
        state.clone(),
        admin_auth_middleware,
    ));

    Router::new()
        .merge(health::router())
        .merge(events::router())
        .merge(semesters::router())
        .merge(members::router())
        .merge(auth::router())
        .merge(rest::router())
        .merge(admin)
        // CORS - Handle cross-origin requests
        .layer(CorsLayer::permissive())
        // Compression - Gzip compress responses
        .layer(CompressionLayer::new())
        // Trace - Request tracing (logs at INFO level)
        .layer(TraceLayer::new_for_http())
        // Request ID - Generate unique ID for each request
        .layer(SetRequestIdLayer::new(
            HeaderName::from_static(REQUEST_ID_HEADER),
            XRequestId,
        ))
        // Propagate request ID to response
        .layer(PropagateRequestIdLayer::new(HeaderName::from_static(
            REQUEST_ID_HEADER,
        )))
        .with_state(state)
}
