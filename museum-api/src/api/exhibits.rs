//! Exhibit endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{MessageResponse, Role};
use museum_common::db::Exhibit;
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::edit_logs::publish;
use super::auth::{ensure_acting_as, ensure_role, Caller};
use super::{message, require_int, ApiJson, ApiQuery};
use crate::db::exhibits;
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct AddressQuery {
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExhibitList {
    pub exhibits: Vec<Exhibit>,
}

#[derive(Debug, Deserialize)]
pub struct AddExhibitRequest {
    pub name: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExhibitCreated {
    pub message: String,
    pub exid: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateExhibitRequest {
    pub exid: Option<Value>,
    pub new_name: Option<String>,
    /// Employee making the edit; logged when present
    pub eemail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteExhibitRequest {
    pub exid: Option<Value>,
}

/// GET /api/get-exhibits/?address=
pub async fn get_exhibits(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AddressQuery>,
) -> ApiResult<Json<ExhibitList>> {
    let address = query.address.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let exhibits = exhibits::list(&state.db, address).await?;
    Ok(Json(ExhibitList { exhibits }))
}

/// POST /api/add-exhibit/
pub async fn add_exhibit(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<AddExhibitRequest>,
) -> ApiResult<(StatusCode, Json<ExhibitCreated>)> {
    let name = require("name", request.name.as_deref())?;
    let address = require("address", request.address.as_deref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;

    let exid = exhibits::add(&state.db, name, address).await?;
    info!("Added exhibit {} ({}) at {}", exid, name, address);
    Ok((
        StatusCode::CREATED,
        Json(ExhibitCreated {
            message: "Exhibit added successfully".to_string(),
            exid,
        }),
    ))
}

/// POST /api/update-exhibit/
pub async fn update_exhibit(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<UpdateExhibitRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let exid = require_int("exid", request.exid.as_ref())?;
    let name = require("newName", request.new_name.as_deref())?;
    let editor = request.eemail.as_deref().map(str::trim).filter(|e| !e.is_empty());
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor, Role::Employee]).await?;
    if let Some(editor) = editor {
        ensure_acting_as(caller.as_deref(), editor)?;
    }

    let entry = exhibits::rename(&state.db, exid, name, editor).await?;
    publish(&state, entry);
    info!("Renamed exhibit {} to {}", exid, name);
    Ok(message("Exhibit updated successfully"))
}

/// POST /api/delete-exhibit/
pub async fn delete_exhibit(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteExhibitRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let exid = require_int("exid", request.exid.as_ref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    if !exhibits::delete(&state.db, exid).await? {
        return Err(ApiError::not_found(format!("Exhibit {} not found", exid)));
    }
    info!("Deleted exhibit {}", exid);
    Ok(message("Exhibit deleted successfully"))
}
