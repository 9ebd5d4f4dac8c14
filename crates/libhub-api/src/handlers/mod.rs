//! HTTP request handlers, one module per resource.

pub mod activity;
pub mod analytics;
pub mod borrow;
pub mod health;
pub mod resource;
pub mod student;
