//! API module for shared HTTP API functionality
//!
//! Contains ONLY pure functions, database operations and shared types.
//! The service crate wraps these with axum extractors and middleware.

pub mod auth;
pub mod types;

pub use auth::{
    hash_password, issue_token, load_signing_secret, verify_password, verify_token, AuthError,
    PasswordHash, TokenClaims, TokenKind,
};
pub use types::{MessageResponse, Role};
