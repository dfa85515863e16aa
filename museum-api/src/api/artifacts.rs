//! Artifact endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{MessageResponse, Role};
use museum_common::db::{Artifact, ArtifactRef};
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::edit_logs::publish;
use super::auth::{ensure_acting_as, ensure_role, Caller};
use super::{message, non_blank, optional_int, require_int, ApiJson, ApiQuery};
use crate::db::artifacts::{self, ArtifactChanges, NewArtifact};
use crate::search::{self, SearchQuery};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SupervisorQuery {
    pub semail: Option<String>,
}

impl SupervisorQuery {
    fn email(&self) -> Option<&str> {
        self.semail.as_deref().map(str::trim).filter(|s| !s.is_empty())
    }
}

#[derive(Debug, Serialize)]
pub struct ArtifactList {
    pub artifacts: Vec<Artifact>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactRefList {
    pub artifacts: Vec<ArtifactRef>,
}

#[derive(Debug, Deserialize)]
pub struct AddArtifactRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub year_made: Option<Value>,
    pub display_status: Option<String>,
    pub exid: Option<Value>,
    pub semail: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ArtifactCreated {
    pub message: String,
    pub artid: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateArtifactRequest {
    pub artid: Option<Value>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub year_made: Option<Value>,
    pub display_status: Option<String>,
    pub exid: Option<Value>,
    /// Employee making the edit; logged when present
    pub eemail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteArtifactRequest {
    pub artid: Option<Value>,
}

/// GET /api/get-all-artifacts/?q=
pub async fn get_all_artifacts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<ArtifactList>> {
    let all = artifacts::all(&state.db).await?;
    let artifacts = search::filter(all, &query, |a| {
        vec![a.artid.to_string(), a.name.clone(), a.description.clone()]
    });
    Ok(Json(ArtifactList { artifacts }))
}

/// GET /api/get-artifacts/?semail=
///
/// Every artifact when `semail` is absent.
pub async fn get_artifacts(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SupervisorQuery>,
) -> ApiResult<Json<ArtifactList>> {
    let artifacts = match query.email() {
        Some(semail) => artifacts::for_supervisor(&state.db, semail).await?,
        None => artifacts::all(&state.db).await?,
    };
    Ok(Json(ArtifactList { artifacts }))
}

/// GET /api/get-artifacts-for-artist/?semail=
pub async fn get_artifacts_for_artist(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SupervisorQuery>,
) -> ApiResult<Json<ArtifactRefList>> {
    let semail = require("semail", query.email())?;
    let artifacts = artifacts::refs_for_supervisor(&state.db, semail).await?;
    Ok(Json(ArtifactRefList { artifacts }))
}

/// POST /api/add-artifact/
pub async fn add_artifact(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<AddArtifactRequest>,
) -> ApiResult<(StatusCode, Json<ArtifactCreated>)> {
    let name = require("name", request.name.as_deref())?;
    let exid = require_int("exid", request.exid.as_ref())?;
    let semail = require("semail", request.semail.as_deref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    ensure_acting_as(caller.as_deref(), semail)?;

    let artifact = NewArtifact {
        name: name.to_string(),
        description: request.description.as_deref().unwrap_or("").trim().to_string(),
        year_made: optional_int("year_made", request.year_made.as_ref())?,
        display_status: non_blank(request.display_status.as_deref()),
        exid,
        supervisor_email: semail.to_string(),
    };

    let artid = artifacts::add(&state.db, &artifact).await?;
    info!("Added artifact {} ({}) to exhibit {}", artid, name, exid);
    Ok((
        StatusCode::CREATED,
        Json(ArtifactCreated {
            message: "Artifact added successfully".to_string(),
            artid,
        }),
    ))
}

/// POST /api/update-artifact/
///
/// Absent fields keep their stored value.
pub async fn update_artifact(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<UpdateArtifactRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let artid = require_int("artid", request.artid.as_ref())?;
    let changes = ArtifactChanges {
        name: non_blank(request.name.as_deref()),
        description: request.description.as_deref().map(|d| d.trim().to_string()),
        year_made: optional_int("year_made", request.year_made.as_ref())?,
        display_status: non_blank(request.display_status.as_deref()),
        exid: optional_int("exid", request.exid.as_ref())?,
    };
    let editor = request.eemail.as_deref().map(str::trim).filter(|e| !e.is_empty());
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor, Role::Employee]).await?;
    if let Some(editor) = editor {
        ensure_acting_as(caller.as_deref(), editor)?;
    }

    let entry = artifacts::update(&state.db, artid, &changes, editor).await?;
    publish(&state, entry);
    info!("Updated artifact {}", artid);
    Ok(message("Artifact updated successfully"))
}

/// POST /api/delete-artifact/
pub async fn delete_artifact(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteArtifactRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let artid = require_int("artid", request.artid.as_ref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    if !artifacts::delete(&state.db, artid).await? {
        return Err(ApiError::not_found(format!("Artifact {} not found", artid)));
    }
    info!("Deleted artifact {}", artid);
    Ok(message("Artifact deleted successfully"))
}
