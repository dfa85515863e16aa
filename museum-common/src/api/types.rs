//! Shared API request/response types

use serde::{Deserialize, Serialize};

/// Plain `{"message": ...}` body used for acknowledgements and errors
///
/// # Examples
///
/// ```
/// use museum_common::api::types::MessageResponse;
///
/// let body = MessageResponse::new("Account created successfully");
/// assert_eq!(
///     serde_json::to_string(&body).unwrap(),
///     r#"{"message":"Account created successfully"}"#
/// );
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Account roles
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Visitor,
    Supervisor,
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Visitor => "visitor",
            Role::Supervisor => "supervisor",
            Role::Employee => "employee",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
