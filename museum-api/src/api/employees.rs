//! Supervisor-side employee management

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{MessageResponse, Role};
use museum_common::db::{EmployeeInfo, EmployeeSummary, SupervisorInfo};
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::accounts::RegistrationRequest;
use super::auth::{ensure_acting_as, ensure_role, Caller};
use super::{message, ApiJson, ApiQuery, EmailQuery};
use crate::db::accounts;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct EmployeeList {
    pub employees: Vec<EmployeeSummary>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmployeeRequest {
    pub email: Option<String>,
    pub new_username: Option<String>,
    pub new_password: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEmployeeRequest {
    pub email: Option<String>,
}

/// 404 unless `email` is an employee; 403 unless the caller supervises them
async fn ensure_supervised_employee(state: &AppState, caller: Option<&Caller>, email: &str) -> ApiResult<()> {
    ensure_role(state, caller, &[Role::Supervisor]).await?;

    let mut conn = state.db.acquire().await?;
    let supervisor = accounts::supervisor_of(&mut *conn, email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Employee {} not found", email)))?;

    match caller {
        Some(caller) if caller.email() != supervisor => {
            warn!("{} attempted to manage {}, who reports to {}", caller.email(), email, supervisor);
            Err(ApiError::forbidden(format!("{} does not report to {}", email, caller.email())))
        }
        _ => Ok(()),
    }
}

/// GET /api/get-supervisor-info/?email=
pub async fn get_supervisor_info(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<SupervisorInfo>> {
    let email = query.required()?;
    let info = accounts::supervisor_info(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Supervisor {} not found", email)))?;
    Ok(Json(info))
}

/// GET /api/get-supervisor-employees/?email=
pub async fn get_supervisor_employees(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<EmployeeList>> {
    let email = query.required()?;
    let employees = accounts::supervisor_employees(&state.db, email).await?;
    Ok(Json(EmployeeList { employees }))
}

/// POST /api/register-employee/
pub async fn register_employee(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<RegistrationRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let user = request.new_user(true)?;
    let supervisor_email = require("supervisorEmail", request.supervisor_email.as_deref())?;
    let museum_address = require("museumAddress", request.museum_address.as_deref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    ensure_acting_as(caller.as_deref(), supervisor_email)?;

    accounts::register_employee(&state.db, &user, supervisor_email, museum_address).await?;
    info!("Registered employee {} under {}", user.email, supervisor_email);
    Ok((StatusCode::CREATED, message("Employee registered successfully")))
}

/// POST /api/update-employee/
pub async fn update_employee(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<UpdateEmployeeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = require("email", request.email.as_deref())?;
    let new_username = request.new_username.as_deref().map(str::trim).filter(|s| !s.is_empty());
    let new_password = request.new_password.as_deref().filter(|s| !s.is_empty());
    if new_username.is_none() && new_password.is_none() {
        return Err(ApiError::bad_request("Provide newUsername or newPassword"));
    }

    ensure_supervised_employee(&state, caller.as_deref(), email).await?;
    if !accounts::update_credentials(&state.db, email, new_username, new_password).await? {
        return Err(ApiError::not_found(format!("Employee {} not found", email)));
    }

    info!("Updated employee {}", email);
    Ok(message("Employee updated successfully"))
}

/// POST /api/delete-employee/
pub async fn delete_employee(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteEmployeeRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = require("email", request.email.as_deref())?;
    ensure_supervised_employee(&state, caller.as_deref(), email).await?;
    if !accounts::delete_user(&state.db, email).await? {
        return Err(ApiError::not_found(format!("Employee {} not found", email)));
    }
    info!("Deleted employee {}", email);
    Ok(message("Employee deleted successfully"))
}

/// GET /api/get-employee-info/?email=
pub async fn get_employee_info(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<EmployeeInfo>> {
    let email = query.required()?;
    let info = accounts::employee_info(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("Employee {} not found", email)))?;
    Ok(Json(info))
}
