//! Admin credential gate
//!
//! Credentials are checked once at the transport boundary. A successful check
//! yields an [`AdminCapability`], which every admin-only service function
//! takes as a parameter.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use http::HeaderMap;
use http::header::{COOKIE, SET_COOKIE};
use shared::error::AppError;

use crate::state::AppState;

pub const USER_COOKIE: &str = "roster_admin_user";
pub const PASS_COOKIE: &str = "roster_admin_pass";

/// Configured admin credential pair
#[derive(Clone)]
pub struct AdminCredentials {
    username: String,
    password: String,
}

impl std::fmt::Debug for AdminCredentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdminCredentials")
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

/// Proof that the caller presented valid admin credentials.
///
/// Only [`AdminCredentials::authorize`] can construct one.
#[derive(Debug, Clone)]
pub struct AdminCapability {
    _private: (),
}

impl AdminCredentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    /// Exact match on both values.
    pub fn authorize(&self, username: &str, password: &str) -> Option<AdminCapability> {
        (username == self.username && password == self.password)
            .then_some(AdminCapability { _private: () })
    }

    /// Authorize from the admin cookies on a request
    pub fn authorize_cookies(&self, headers: &HeaderMap) -> Option<AdminCapability> {
        let username = cookie_value(headers, USER_COOKIE)?;
        let password = cookie_value(headers, PASS_COOKIE)?;
        self.authorize(&username, &password)
    }
}

/// Middleware that requires the admin cookies and injects [`AdminCapability`].
pub async fn admin_auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, Response> {
    let capability = state
        .admin
        .authorize_cookies(request.headers())
        .ok_or_else(|| {
            tracing::debug!(path = %request.uri().path(), "Admin cookie check failed");
            AppError::unauthorized().into_response()
        })?;

    request.extensions_mut().insert(capability);

    Ok(next.run(request).await)
}

/// Find a cookie by name across all `Cookie` headers.
pub fn cookie_value(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|v| v.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(k, _)| *k == name)
        .map(|(_, v)| {
            urlencoding::decode(v)
                .map(|decoded| decoded.into_owned())
                .unwrap_or_else(|_| v.to_string())
        })
}

/// `Set-Cookie` headers that store the credential pair.
pub fn login_cookies(username: &str, password: &str) -> [(http::HeaderName, String); 2] {
    [
        (SET_COOKIE, session_cookie(USER_COOKIE, username)),
        (SET_COOKIE, session_cookie(PASS_COOKIE, password)),
    ]
}

/// `Set-Cookie` headers that clear the credential pair.
pub fn logout_cookies() -> [(http::HeaderName, String); 2] {
    [
        (SET_COOKIE, format!("{USER_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")),
        (SET_COOKIE, format!("{PASS_COOKIE}=; Path=/; HttpOnly; SameSite=Lax; Max-Age=0")),
    ]
}

fn session_cookie(name: &str, value: &str) -> String {
    format!("{name}={}; Path=/; HttpOnly; SameSite=Lax", urlencoding::encode(value))
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;

    fn creds() -> AdminCredentials {
        AdminCredentials::new("admin", "p@ss word;1")
    }

    #[test]
    fn authorize_requires_exact_match() {
        let creds = creds();
        assert!(creds.authorize("admin", "p@ss word;1").is_some());
        assert!(creds.authorize("Admin", "p@ss word;1").is_none());
        assert!(creds.authorize("admin", "p@ss word;").is_none());
        assert!(creds.authorize("", "").is_none());
    }

    #[test]
    fn cookies_round_trip_through_encoding() {
        let creds = creds();
        let mut headers = HeaderMap::new();
        let pairs: Vec<String> = login_cookies("admin", "p@ss word;1")
            .into_iter()
            .map(|(_, v)| v.split(';').next().unwrap_or_default().to_string())
            .collect();
        headers.insert(COOKIE, HeaderValue::from_str(&pairs.join("; ")).unwrap());
        assert!(creds.authorize_cookies(&headers).is_some());
    }

    #[test]
    fn missing_or_wrong_cookie_is_rejected() {
        let creds = creds();
        let mut headers = HeaderMap::new();
        assert!(creds.authorize_cookies(&headers).is_none());

        headers.insert(
            COOKIE,
            HeaderValue::from_static("roster_admin_user=admin; roster_admin_pass=nope"),
        );
        assert!(creds.authorize_cookies(&headers).is_none());
    }

    #[test]
    fn cookie_lookup_ignores_other_cookies() {
        let mut headers = HeaderMap::new();
        headers.append(COOKIE, HeaderValue::from_static("theme=dark; roster_admin_user=ada"));
        headers.append(COOKIE, HeaderValue::from_static("roster_admin_pass=x%20y"));
        assert_eq!(cookie_value(&headers, USER_COOKIE).as_deref(), Some("ada"));
        assert_eq!(cookie_value(&headers, PASS_COOKIE).as_deref(), Some("x y"));
        assert_eq!(cookie_value(&headers, "missing"), None);
    }

    #[test]
    fn cookie_values_are_url_encoded() {
        let [(_, user), (_, pass)] = login_cookies("admin", "p@ss word;ü");
        assert!(user.starts_with("roster_admin_user=admin;"));
        assert!(pass.starts_with("roster_admin_pass=p%40ss%20word%3B%C3%BC;"));

        let mut headers = HeaderMap::new();
        headers.insert(
            COOKIE,
            HeaderValue::from_static("roster_admin_pass=p%40ss%20word%3B%C3%BC"),
        );
        assert_eq!(
            cookie_value(&headers, PASS_COOKIE).as_deref(),
            Some("p@ss word;ü")
        );
    }

    #[test]
    fn undecodable_cookie_falls_back_to_raw_value() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("roster_admin_pass=%FF%FE"));
        assert_eq!(cookie_value(&headers, PASS_COOKIE).as_deref(), Some("%FF%FE"));
    }

    #[test]
    fn debug_hides_password() {
        let rendered = format!("{:?}", creds());
        assert!(!rendered.contains("p@ss"));
    }
}
