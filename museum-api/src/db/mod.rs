//! Database access layer for museum-api
//!
//! One module per record family. Functions take the pool (or a connection
//! inside a transaction) and return `museum_common::Result`.

pub mod accounts;
pub mod artifacts;
pub mod artists;
pub mod edit_logs;
pub mod events;
pub mod exhibits;
pub mod museums;
pub mod reviews;
