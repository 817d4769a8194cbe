//! Shared types for the Roster service
//!
//! Domain models, error codes, response structures and small utilities used
//! by the server and by API consumers.

pub mod error;
pub mod models;
pub mod util;
pub mod validation;

// Re-exports
pub use axum::Json;
pub use error::{ApiResponse, AppError, ErrorCode};
pub use http;
pub use serde::{Deserialize, Serialize};
