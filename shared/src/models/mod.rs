//! Data models
//!
//! Shared between roster-server and API consumers.
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! Timestamps are `i64` Unix milliseconds.

pub mod checkin;
pub mod event;
pub mod filter;
pub mod member;
pub mod member_data;
pub mod semester;

// Re-exports
pub use checkin::*;
pub use event::*;
pub use filter::*;
pub use member::*;
pub use member_data::*;
pub use semester::*;
