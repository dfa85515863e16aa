//! Event endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{MessageResponse, Role};
use museum_common::db::{Event, EventListing};
use museum_common::validate::{require, validate_date_range};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::edit_logs::publish;
use super::exhibits::AddressQuery;
use super::auth::{ensure_acting_as, ensure_role, Caller};
use super::{message, non_blank, optional_int, require_int, ApiJson, ApiQuery};
use crate::db::events::{self, EventChanges, NewEvent};
use crate::search::{self, SearchQuery};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct EventList {
    pub events: Vec<Event>,
}

#[derive(Debug, Serialize)]
pub struct EventListingList {
    pub events: Vec<EventListing>,
}

#[derive(Debug, Deserialize)]
pub struct AddEventRequest {
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exid: Option<Value>,
    pub address: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct EventCreated {
    pub message: String,
    pub evid: i64,
}

#[derive(Debug, Deserialize)]
pub struct UpdateEventRequest {
    pub evid: Option<Value>,
    pub name: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub exid: Option<Value>,
    /// Employee making the edit; logged when present
    pub eemail: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteEventRequest {
    pub evid: Option<Value>,
}

/// GET /api/get-events/?address=
///
/// All events when `address` is absent.
pub async fn get_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<AddressQuery>,
) -> ApiResult<Json<EventList>> {
    let address = query.address.as_deref().map(str::trim).filter(|a| !a.is_empty());
    let events = events::list(&state.db, address).await?;
    Ok(Json(EventList { events }))
}

/// GET /api/get-all-events/?q=
pub async fn get_all_events(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<EventListingList>> {
    let all = events::listings(&state.db).await?;
    let events = search::filter(all, &query, |e| {
        vec![
            e.eid.to_string(),
            e.name.clone(),
            e.exhibit_name.clone().unwrap_or_default(),
            e.museum_name.clone().unwrap_or_default(),
        ]
    });
    Ok(Json(EventListingList { events }))
}

/// POST /api/add-event/
pub async fn add_event(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<AddEventRequest>,
) -> ApiResult<(StatusCode, Json<EventCreated>)> {
    let name = require("name", request.name.as_deref())?;
    let start_date = require("start_date", request.start_date.as_deref())?;
    let end_date = require("end_date", request.end_date.as_deref())?;
    let address = require("address", request.address.as_deref())?;
    validate_date_range(start_date, end_date)?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;

    let event = NewEvent {
        name: name.to_string(),
        start_date: start_date.to_string(),
        end_date: end_date.to_string(),
        address: Some(address.to_string()),
        exid: optional_int("exid", request.exid.as_ref())?,
    };

    let evid = events::add(&state.db, &event).await?;
    info!("Scheduled event {} ({}) {} to {}", evid, name, start_date, end_date);
    Ok((
        StatusCode::CREATED,
        Json(EventCreated {
            message: "Event added successfully".to_string(),
            evid,
        }),
    ))
}

/// POST /api/update-event/
///
/// Absent fields keep their stored value; the merged date range is
/// revalidated.
pub async fn update_event(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<UpdateEventRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let evid = require_int("evid", request.evid.as_ref())?;
    let changes = EventChanges {
        name: non_blank(request.name.as_deref()),
        start_date: non_blank(request.start_date.as_deref()),
        end_date: non_blank(request.end_date.as_deref()),
        exid: optional_int("exid", request.exid.as_ref())?,
    };
    let editor = request.eemail.as_deref().map(str::trim).filter(|e| !e.is_empty());
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor, Role::Employee]).await?;
    if let Some(editor) = editor {
        ensure_acting_as(caller.as_deref(), editor)?;
    }

    let entry = events::update(&state.db, evid, &changes, editor).await?;
    publish(&state, entry);
    info!("Updated event {}", evid);
    Ok(message("Event updated successfully"))
}

/// POST /api/delete-event/
pub async fn delete_event(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteEventRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let evid = require_int("evid", request.evid.as_ref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    if !events::delete(&state.db, evid).await? {
        return Err(ApiError::not_found(format!("Event {} not found", evid)));
    }
    info!("Deleted event {}", evid);
    Ok(message("Event deleted successfully"))
}
