//! HTTP API handlers for museum-api

pub mod accounts;
pub mod artifacts;
pub mod artists;
pub mod auth;
pub mod edit_logs;
pub mod employees;
pub mod events;
pub mod exhibits;
pub mod extract;
pub mod health;
pub mod museums;
pub mod reviews;

pub use accounts::{
    get_profile, login_supervisor_employee, login_visitor, obtain_token, refresh_token,
    register_supervisor, register_visitor, update_username,
};
pub use artifacts::{
    add_artifact, delete_artifact, get_all_artifacts, get_artifacts, get_artifacts_for_artist,
    update_artifact,
};
pub use artists::{add_artist, delete_artist, get_artists, update_artist};
pub use auth::auth_middleware;
pub use edit_logs::{
    edit_log_stream, get_edit_logs, record_edit_artifact, record_edit_event, record_edit_exhibit,
};
pub use employees::{
    delete_employee, get_employee_info, get_supervisor_employees, get_supervisor_info,
    register_employee, update_employee,
};
pub use events::{add_event, delete_event, get_all_events, get_events, update_event};
pub use exhibits::{add_exhibit, delete_exhibit, get_exhibits, update_exhibit};
pub use extract::{ApiJson, ApiQuery};
pub use health::health_routes;
pub use museums::{
    add_visited_museum, browse_visited_museums, delete_visited_museum, get_all_museums,
    get_visited_museums,
};
pub use reviews::{
    delete_artifact_review, delete_event_review, get_artifact_reviews, get_event_reviews,
    get_visitor_artifact_reviews, get_visitor_event_reviews, submit_artifact_review,
    submit_event_review,
};

use museum_common::api::MessageResponse;

/// Query parameter naming an account
#[derive(Debug, serde::Deserialize)]
pub struct EmailQuery {
    pub email: Option<String>,
}

impl EmailQuery {
    /// The email, or 400 when absent
    pub fn required(&self) -> crate::ApiResult<&str> {
        Ok(museum_common::validate::require("email", self.email.as_deref())?)
    }
}

/// `{"message": ...}` body for successful writes
pub(crate) fn message(msg: impl Into<String>) -> axum::Json<MessageResponse> {
    axum::Json(MessageResponse::new(msg))
}

/// Trimmed text, `None` when absent or blank
pub(crate) fn non_blank(value: Option<&str>) -> Option<String> {
    value.map(str::trim).filter(|v| !v.is_empty()).map(str::to_string)
}

/// Optional whole number sent as a JSON number or numeric string
///
/// `null` and blank strings count as absent.
pub(crate) fn optional_int(field: &str, value: Option<&serde_json::Value>) -> crate::ApiResult<Option<i64>> {
    use serde_json::Value;

    let invalid = || crate::ApiError::bad_request(format!("{} must be a whole number", field));
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_i64().map(Some).ok_or_else(invalid),
        Some(Value::String(s)) if s.trim().is_empty() => Ok(None),
        Some(Value::String(s)) => s.trim().parse::<i64>().map(Some).map_err(|_| invalid()),
        Some(_) => Err(invalid()),
    }
}

/// Required whole number, 400 `Missing field: <field>` when absent
pub(crate) fn require_int(field: &str, value: Option<&serde_json::Value>) -> crate::ApiResult<i64> {
    optional_int(field, value)?
        .ok_or_else(|| crate::ApiError::bad_request(format!("Missing field: {}", field)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_ints_accept_numbers_and_numeric_strings() {
        assert_eq!(optional_int("exid", Some(&json!(4))).unwrap(), Some(4));
        assert_eq!(optional_int("exid", Some(&json!(" 12 "))).unwrap(), Some(12));
        assert_eq!(optional_int("exid", Some(&json!(""))).unwrap(), None);
        assert_eq!(optional_int("exid", Some(&json!(null))).unwrap(), None);
        assert!(optional_int("exid", Some(&json!("four"))).is_err());
        assert!(optional_int("exid", Some(&json!(1.5))).is_err());
    }

    #[test]
    fn test_non_blank_trims_and_drops_empty_text() {
        assert_eq!(non_blank(Some("  On Loan ")), Some("On Loan".to_string()));
        assert_eq!(non_blank(Some("   ")), None);
        assert_eq!(non_blank(None), None);
    }

    #[test]
    fn test_require_int_names_the_field() {
        let err = require_int("artid", None).unwrap_err();
        assert_eq!(err.0.to_string(), "Invalid input: Missing field: artid");
        assert_eq!(require_int("artid", Some(&json!("9"))).unwrap(), 9);
    }
}
