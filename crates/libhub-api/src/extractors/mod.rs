//! Custom Axum extractors.

pub mod auth;
pub mod json;
pub mod path;

pub use auth::AuthUser;
pub use json::{OptionalJson, ValidatedJson};
pub use path::parse_uuid;
