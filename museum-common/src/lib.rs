//! # Museum Common Library
//!
//! Shared code for the museum services including:
//! - Database schema and row models
//! - Password hashing and bearer token signing
//! - Edit-log event bus and SSE helpers
//! - Configuration loading
//! - Input validation

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod events;
pub mod sse;
pub mod time;
pub mod validate;

pub use error::{Error, Result};
