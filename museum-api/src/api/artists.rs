//! Artist endpoints

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::{MessageResponse, Role};
use museum_common::db::Artist;
use museum_common::validate::{require, validate_lifespan};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::auth::{ensure_role, Caller};
use super::{message, non_blank, require_int, ApiJson, ApiQuery};
use crate::db::artists::{self, ArtistFields};
use crate::search::{self, SearchQuery};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Serialize)]
pub struct ArtistList {
    pub artists: Vec<Artist>,
}

/// Body of add-artist and update-artist (`aid` only on update)
#[derive(Debug, Default, Deserialize)]
pub struct ArtistRequest {
    pub aid: Option<Value>,
    pub first_name: Option<String>,
    pub middle_name: Option<String>,
    pub last_name: Option<String>,
    pub date_of_birth: Option<String>,
    pub date_of_death: Option<String>,
    #[serde(rename = "selectedArtifacts", default)]
    pub selected_artifacts: Vec<Value>,
}

impl ArtistRequest {
    fn fields(&self) -> ApiResult<ArtistFields> {
        let first_name = require("first_name", self.first_name.as_deref())?;
        let last_name = require("last_name", self.last_name.as_deref())?;

        let date_of_birth = non_blank(self.date_of_birth.as_deref());
        let date_of_death = non_blank(self.date_of_death.as_deref());
        validate_lifespan(date_of_birth.as_deref(), date_of_death.as_deref())?;

        let artifact_ids = self
            .selected_artifacts
            .iter()
            .map(|v| require_int("selectedArtifacts", Some(v)))
            .collect::<ApiResult<Vec<i64>>>()?;

        Ok(ArtistFields {
            first_name: first_name.to_string(),
            middle_name: self.middle_name.as_deref().unwrap_or("").trim().to_string(),
            last_name: last_name.to_string(),
            date_of_birth,
            date_of_death,
            artifact_ids,
        })
    }
}

#[derive(Debug, Serialize)]
pub struct ArtistCreated {
    pub message: String,
    pub aid: i64,
}

#[derive(Debug, Deserialize)]
pub struct DeleteArtistRequest {
    pub aid: Option<Value>,
}

/// GET /api/get-artists/?q=
pub async fn get_artists(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<SearchQuery>,
) -> ApiResult<Json<ArtistList>> {
    let all = artists::all(&state.db).await?;
    let artists = search::filter(all, &query, |a| {
        vec![a.aid.to_string(), a.first_name.clone(), a.last_name.clone()]
    });
    Ok(Json(ArtistList { artists }))
}

/// POST /api/add-artist/
pub async fn add_artist(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<ArtistRequest>,
) -> ApiResult<(StatusCode, Json<ArtistCreated>)> {
    let fields = request.fields()?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    let aid = artists::add(&state.db, &fields).await?;
    info!(
        "Added artist {} ({} {}) with {} artifact(s)",
        aid,
        fields.first_name,
        fields.last_name,
        fields.artifact_ids.len()
    );
    Ok((
        StatusCode::CREATED,
        Json(ArtistCreated {
            message: "Artist added successfully".to_string(),
            aid,
        }),
    ))
}

/// POST /api/update-artist/
///
/// Replaces the artist's fields and credited artifacts.
pub async fn update_artist(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<ArtistRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let aid = require_int("aid", request.aid.as_ref())?;
    let fields = request.fields()?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    if !artists::update(&state.db, aid, &fields).await? {
        return Err(ApiError::not_found(format!("Artist {} not found", aid)));
    }
    info!("Updated artist {}", aid);
    Ok(message("Artist updated successfully"))
}

/// POST /api/delete-artist/
pub async fn delete_artist(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteArtistRequest>,
) -> ApiResult<Json<MessageResponse>> {
    let aid = require_int("aid", request.aid.as_ref())?;
    ensure_role(&state, caller.as_deref(), &[Role::Supervisor]).await?;
    if !artists::delete(&state.db, aid).await? {
        return Err(ApiError::not_found(format!("Artist {} not found", aid)));
    }
    info!("Deleted artist {}", aid);
    Ok(message("Artist deleted successfully"))
}
