//! # libhub-auth
//!
//! Verification of the bearer tokens issued by the external auth service.
//!
//! - `jwt`: claims layout, HS256 decoding and encoding for fixtures

pub mod jwt;

pub use jwt::{Claims, JwtDecoder, JwtEncoder};
