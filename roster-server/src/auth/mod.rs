//! Authentication for admin routes

pub mod admin_auth;

pub use admin_auth::{AdminCapability, AdminCredentials, admin_auth_middleware};
