//! Museum listing and visitor visit history

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::MessageResponse;
use museum_common::db::Museum;
use museum_common::validate::require;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::auth::{ensure_acting_as, Caller};
use super::{message, ApiJson, ApiQuery, EmailQuery};
use crate::db::{accounts, museums};
use crate::search::{self, SearchQuery};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct MuseumList {
    pub museums: Vec<Museum>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VisitedMuseums {
    pub username: String,
    pub visited_museums: Vec<Museum>,
}

#[derive(Debug, Serialize)]
pub struct Visit {
    pub address: String,
}

#[derive(Debug, Serialize)]
pub struct VisitList {
    pub visits: Vec<Visit>,
}

#[derive(Debug, Deserialize)]
pub struct AddVisitRequest {
    pub email: Option<String>,
    pub address: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteVisitRequest {
    pub visitor_email: Option<String>,
    pub museum_address: Option<String>,
}

/// GET /api/get-all-museums/?q=
pub async fn get_all_museums(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<MuseumList>> {
    let all = museums::all(&state.db).await?;
    let museums = search::filter(all, &query, |m| vec![m.address.clone(), m.name.clone()]);
    Ok(Json(MuseumList { museums }))
}

/// GET /api/browse-visited-museums/?email=
pub async fn browse_visited_museums(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<VisitedMuseums>> {
    let email = query.required()?;
    let profile = accounts::profile(&state.db, email)
        .await?
        .ok_or_else(|| ApiError::not_found(format!("User {} not found", email)))?;
    let visited_museums = museums::visited(&state.db, email).await?;
    Ok(Json(VisitedMuseums {
        username: profile.username,
        visited_museums,
    }))
}

/// GET /api/get-visited-museums/?email=
pub async fn get_visited_museums(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<VisitList>> {
    let email = query.required()?;
    let visits = museums::visited(&state.db, email)
        .await?
        .into_iter()
        .map(|m| Visit { address: m.address })
        .collect();
    Ok(Json(VisitList { visits }))
}

/// POST /api/add-visited-museum/
pub async fn add_visited_museum(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<AddVisitRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let email = require("email", request.email.as_deref())?;
    let address = require("address", request.address.as_deref())?;
    ensure_acting_as(caller.as_deref(), email)?;

    if !accounts::roles(&state.db, email).await?.visitor {
        return Err(ApiError::forbidden("Only visitors can record museum visits"));
    }
    if !museums::exists(&state.db, address).await? {
        return Err(ApiError::not_found(format!("Museum {} not found", address)));
    }

    museums::add_visit(&state.db, email, address).await?;
    info!("Visitor {} visited {}", email, address);
    Ok((StatusCode::CREATED, message("Museum visit added")))
}

/// POST /api/delete-visited-museum/
pub async fn delete_visited_museum(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteVisitRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let email = require("visitor_email", request.visitor_email.as_deref())?;
    let address = require("museum_address", request.museum_address.as_deref())?;
    ensure_acting_as(caller.as_deref(), email)?;

    if !museums::delete_visit(&state.db, email, address).await? {
        return Err(ApiError::not_found("Visit not found"));
    }
    info!("Removed visit of {} to {}", email, address);
    Ok(message("Museum visit deleted"))
}
