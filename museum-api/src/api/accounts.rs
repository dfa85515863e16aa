//! Registration, login, tokens and profile endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{issue_token, verify_password, verify_token, MessageResponse, Role, TokenKind};
use museum_common::db::Profile;
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{info, warn};

use super::auth::{ensure_acting_as, Caller};
use super::{message, optional_int, ApiJson, ApiQuery, EmailQuery};
use crate::db::accounts::{self, NewUser};
use crate::{ApiError, ApiResult, AppState};

/// Body shared by the three registration endpoints
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationRequest {
    pub email: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    /// Number or numeric string
    pub year_of_birth: Option<Value>,
    pub museum_name: Option<String>,
    pub museum_address: Option<String>,
    pub supervisor_email: Option<String>,
}

impl RegistrationRequest {
    /// Validate the account fields, reporting the first missing one
    pub(crate) fn new_user(&self, year_required: bool) -> ApiResult<NewUser> {
        let email = require("email", self.email.as_deref())?;
        let username = require("username", self.username.as_deref())?;
        let first_name = require("firstName", self.first_name.as_deref())?;
        let last_name = require("lastName", self.last_name.as_deref())?;
        let password = self
            .password
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or_else(|| ApiError::bad_request("Missing field: password"))?;

        let year_of_birth = optional_int("yearOfBirth", self.year_of_birth.as_ref())?;
        if year_required && year_of_birth.is_none() {
            return Err(ApiError::bad_request("Missing field: yearOfBirth"));
        }

        Ok(NewUser {
            email: email.to_string(),
            first_name: first_name.to_string(),
            middle_name: self.middle_name.as_deref().unwrap_or("").trim().to_string(),
            last_name: last_name.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            year_of_birth,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct StaffLoginResponse {
    pub message: String,
    pub role: Role,
}

#[derive(Debug, Serialize)]
pub struct TokenPair {
    pub access: String,
    pub refresh: String,
    pub email: String,
}

#[derive(Debug, Deserialize)]
pub struct RefreshRequest {
    pub refresh: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AccessToken {
    pub access: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateUsernameRequest {
    pub email: Option<String>,
    pub username: Option<String>,
}

/// Check an email/password pair, returning the email on success
async fn check_credentials(state: &AppState, request: &LoginRequest) -> ApiResult<String> {
    let email = require("email", request.email.as_deref())?;
    let password = request
        .password
        .as_deref()
        .ok_or_else(|| ApiError::bad_request("Missing field: password"))?;

    let creds = accounts::credentials(&state.db, email).await?;
    match creds {
        Some(c) if verify_password(password, &c.password_salt, &c.password_hash) => Ok(email.to_string()),
        _ => {
            warn!("Failed login for {}", email);
            Err(ApiError::unauthorized("Invalid email or password"))
        }
    }
}

/// POST /api/register-visitor/
pub async fn register_visitor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user = request.new_user(false)?;
    accounts::register_visitor(&state.db, &user).await?;
    info!("Registered visitor {}", user.email);
    Ok((StatusCode::CREATED, message("Visitor registered successfully")))
}

/// POST /api/login-visitor/
pub async fn login_visitor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = check_credentials(&state, &request).await?;
    let roles = accounts::roles(&state.db, &email).await?;
    if !roles.visitor {
        return Err(ApiError::forbidden("Account is not a visitor"));
    }
    info!("Visitor {} logged in", email);
    Ok(message("Login successful"))
}

/// POST /api/register-supervisor/
pub async fn register_supervisor(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user = request.new_user(false)?;
    let museum_name = require("museumName", request.museum_name.as_deref())?;
    let museum_address = require("museumAddress", request.museum_address.as_deref())?;

    accounts::register_supervisor(&state.db, &user, museum_name, museum_address).await?;
    info!("Registered supervisor {} for {}", user.email, museum_address);
    Ok((StatusCode::CREATED, message("Supervisor registered successfully")))
}

/// POST /api/login-supervisor-employee/
pub async fn login_supervisor_employee(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<StaffLoginResponse>> {
    let email = check_credentials(&state, &request).await?;
    let role = accounts::roles(&state.db, &email)
        .await?
        .staff_role()
        .ok_or_else(|| ApiError::forbidden("Account is neither a supervisor nor an employee"))?;

    info!("{} {} logged in", role, email);
    Ok(Json(StaffLoginResponse {
        message: "Login successful".to_string(),
        role,
    }))
}

/// POST /api/token/
pub async fn obtain_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<LoginRequest>,
) -> ApiResult<Json<TokenPair>> {
    let email = check_credentials(&state, &request).await?;
    let access = issue_token(
        &email,
        TokenKind::Access,
        state.config.access_token_minutes,
        state.signing_secret,
    );
    let refresh = issue_token(
        &email,
        TokenKind::Refresh,
        state.config.refresh_token_minutes,
        state.signing_secret,
    );
    Ok(Json(TokenPair { access, refresh, email }))
}

/// POST /api/token/refresh/
pub async fn refresh_token(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<RefreshRequest>,
) -> ApiResult<Json<AccessToken>> {
    let refresh = require("refresh", request.refresh.as_deref())?;
    let claims = verify_token(refresh, TokenKind::Refresh, state.signing_secret)?;
    let access = issue_token(
        &claims.email,
        TokenKind::Access,
        state.config.access_token_minutes,
        state.signing_secret,
    );
    Ok(Json(AccessToken { access }))
}

/// GET /api/get-profile/?email=
pub async fn get_profile(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<Profile>> {
    let email = query.required()?;
    let profile = accounts::profile(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", email)))?;
    Ok(Json(profile))
}

/// POST /api/update-username/
pub async fn update_username(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<UpdateUsernameRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = require("email", request.email.as_deref())?;
    let username = require("username", request.username.as_deref())?;
    ensure_acting_as(caller.as_deref(), email)?;

    if !accounts::update_username(&state.db, email, username).await? {
        return Err(ApiError::not_found(format!("User {} not found", email)));
    }
    info!("Updated username for {}", email);
    Ok(message("Username updated successfully"))
}
