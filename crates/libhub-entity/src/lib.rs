//! # libhub-entity
//!
//! Domain entity models for LibHub. Every struct maps 1:1 to a database
//! table and serializes to the camelCase JSON shape used on the wire.

pub mod activity;
pub mod book;
pub mod borrow;
pub mod resource;
pub mod user;
