//! Edit audit trail endpoints and live stream

use std::convert::Infallible;

use axum::{
    extract::State,
    http::StatusCode,
    response::sse::{Event, Sse},
    Extension, Json,
};
use futures::Stream;
use museum_common::api::Role;
use museum_common::db::EditLogEntry;
use museum_common::events::{EditType, MuseumEvent};
use museum_common::sse::supervisor_event_stream;
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::auth::{ensure_acting_as, ensure_role, Caller};
use super::{require_int, ApiJson, ApiQuery, EmailQuery};
use crate::db::edit_logs;
use crate::{ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct RecordArtifactEdit {
    pub eemail: Option<String>,
    pub artid: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RecordEventEdit {
    pub eemail: Option<String>,
    pub evid: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct RecordExhibitEdit {
    pub eemail: Option<String>,
    pub exid: Option<Value>,
}

#[derive(Debug, Serialize)]
pub struct RecordedEdit {
    pub edit_id: i64,
}

#[derive(Debug, Serialize)]
pub struct EditLogList {
    pub logs: Vec<EditLogEntry>,
}

/// Broadcast a committed log row to stream subscribers
pub(crate) fn publish(state: &AppState, entry: Option<EditLogEntry>) {
    if let Some(entry) = entry {
        state.events.emit_lossy(MuseumEvent::EditRecorded { entry });
    }
}

async fn record(
    state: &AppState,
    caller: Option<&Caller>,
    eemail: Option<&str>,
    edit_type: EditType,
    target_id: i64,
) -> ApiResult<(StatusCode, Json<RecordedEdit>)> {
    let eemail = require("eemail", eemail)?;
    ensure_role(state, caller, &[Role::Employee]).await?;
    ensure_acting_as(caller, eemail)?;
    let entry = edit_logs::record(&state.db, eemail, edit_type, target_id).await?;
    let edit_id = entry.edit_id;
    publish(state, Some(entry));
    Ok((StatusCode::CREATED, Json(RecordedEdit { edit_id })))
}

/// POST /api/record-edit-artifact/
pub async fn record_edit_artifact(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<RecordArtifactEdit>,
) -> ApiResult<(StatusCode, Json<RecordedEdit>)> {
    let artid = require_int("artid", request.artid.as_ref())?;
    record(&state, caller.as_deref(), request.eemail.as_deref(), EditType::Artifact, artid).await
}

/// POST /api/record-edit-event/
pub async fn record_edit_event(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<RecordEventEdit>,
) -> ApiResult<(StatusCode, Json<RecordedEdit>)> {
    let evid = require_int("evid", request.evid.as_ref())?;
    record(&state, caller.as_deref(), request.eemail.as_deref(), EditType::Event, evid).await
}

/// POST /api/record-edit-exhibit/
pub async fn record_edit_exhibit(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<RecordExhibitEdit>,
) -> ApiResult<(StatusCode, Json<RecordedEdit>)> {
    let exid = require_int("exid", request.exid.as_ref())?;
    record(&state, caller.as_deref(), request.eemail.as_deref(), EditType::Exhibit, exid).await
}

/// GET /api/get-edit-logs/?email=
///
/// Newest first.
pub async fn get_edit_logs(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<EditLogList>> {
    let email = query.required()?;
    let logs = edit_logs::for_supervisor(&state.db, email).await?;
    Ok(Json(EditLogList { logs }))
}

/// GET /api/edit-logs/stream?email=
pub async fn edit_log_stream(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Sse<impl Stream<Item = Result<Event, Infallible>>>> {
    let email = query.required()?.to_string();
    Ok(supervisor_event_stream(state.events.subscribe(), email))
}
