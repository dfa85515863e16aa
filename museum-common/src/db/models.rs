//! Database models
//!
//! Row types double as JSON response bodies, so field names follow the keys
//! the browser client reads (mostly snake_case, camelCase for account data).

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Museum {
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    pub email: String,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub username: String,
    pub year_of_birth: Option<i64>,
}

/// Stored credentials for a login check
#[derive(Debug, Clone, FromRow)]
pub struct Credentials {
    pub password_hash: String,
    pub password_salt: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeSummary {
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub username: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct EmployeeInfo {
    pub username: String,
    pub museum_name: Option<String>,
    pub museum_address: Option<String>,
    pub supervisor_email: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SupervisorInfo {
    pub username: String,
    pub museum: String,
    pub museum_address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Exhibit {
    pub exid: i64,
    pub name: String,
    pub address: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Artifact {
    pub artid: i64,
    pub name: String,
    pub description: String,
    pub year_made: Option<i64>,
    pub display_status: String,
    pub exid: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct ArtifactRef {
    pub artid: i64,
    pub name: String,
}

/// Artist with the artifacts credited to them
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Artist {
    pub aid: i64,
    pub first_name: String,
    pub middle_name: String,
    pub last_name: String,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    pub artifacts: Vec<String>,
    pub artifacts_ids: Vec<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Event {
    pub evid: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub address: Option<String>,
    pub exid: Option<i64>,
}

/// Public event listing joined with exhibit and museum names
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EventListing {
    pub eid: i64,
    pub name: String,
    pub start_date: String,
    pub end_date: String,
    pub exhibit_name: Option<String>,
    pub museum_name: Option<String>,
    pub location: Option<String>,
}

/// A review as shown under an artifact or event
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct Review {
    pub email: String,
    pub username: String,
    pub rating: i64,
    pub review_desc: String,
    pub created_at: String,
}

/// A visitor's own artifact review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct VisitorArtifactReview {
    pub artid: i64,
    pub artifact_name: String,
    pub rating: i64,
    pub review_desc: String,
    pub created_at: String,
}

/// A visitor's own event review
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct VisitorEventReview {
    pub evid: i64,
    pub event_name: String,
    pub rating: i64,
    pub review_desc: String,
    pub created_at: String,
}

/// One row of the edit audit trail
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, PartialEq)]
pub struct EditLogEntry {
    pub edit_id: i64,
    pub eemail: String,
    pub semail: String,
    #[serde(rename = "type")]
    pub edit_type: String,
    pub target_id: i64,
    pub edit_time: String,
}
