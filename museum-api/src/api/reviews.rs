//! Visitor star reviews of artifacts and events

use axum::{extract::State, http::StatusCode, Extension, Json};
use museum_common::api::MessageResponse;
use museum_common::db::{Review, VisitorArtifactReview, VisitorEventReview};
use museum_common::validate::{average_rating, require, validate_rating};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use super::auth::{ensure_acting_as, Caller};
use super::{message, require_int, ApiJson, ApiQuery, EmailQuery};
use crate::db::accounts;
use crate::db::reviews::{self, ReviewTarget};
use crate::{ApiError, ApiResult, AppState};

#[derive(Debug, Deserialize)]
pub struct SubmitReviewRequest {
    pub email: Option<String>,
    pub artid: Option<Value>,
    pub evid: Option<Value>,
    pub rating: Option<Value>,
    pub review_desc: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct DeleteReviewRequest {
    pub email: Option<String>,
    pub artid: Option<Value>,
    pub evid: Option<Value>,
}

#[derive(Debug, Deserialize)]
pub struct ArtifactIdQuery {
    pub artid: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct EventIdQuery {
    pub evid: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewSummary {
    pub reviews: Vec<Review>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct VisitorArtifactReviews {
    pub reviews: Vec<VisitorArtifactReview>,
}

#[derive(Debug, Serialize)]
pub struct VisitorEventReviews {
    pub reviews: Vec<VisitorEventReview>,
}

fn target_id(target: ReviewTarget, artid: Option<&Value>, evid: Option<&Value>) -> ApiResult<i64> {
    match target {
        ReviewTarget::Artifact => require_int("artid", artid),
        ReviewTarget::Event => require_int("evid", evid),
    }
}

fn query_id(field: &str, value: Option<&String>) -> ApiResult<i64> {
    require_int(field, value.map(|v| Value::String(v.clone())).as_ref())
}

async fn submit(
    state: &AppState,
    caller: Option<&Caller>,
    target: ReviewTarget,
    request: SubmitReviewRequest,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    let email = require("email", request.email.as_deref())?;
    let id = target_id(target, request.artid.as_ref(), request.evid.as_ref())?;
    let rating = require_int("rating", request.rating.as_ref())?;
    validate_rating(rating)?;
    let review_desc = request.review_desc.as_deref().unwrap_or("").trim();
    ensure_acting_as(caller, email)?;

    if !accounts::roles(&state.db, email).await?.visitor {
        return Err(ApiError::forbidden("Only visitors can write reviews"));
    }

    reviews::submit(&state.db, target, email, id, rating, review_desc).await?;
    info!("Review of {} {} by {} ({} stars)", target.label(), id, email, rating);
    Ok((StatusCode::CREATED, message("Review submitted successfully")))
}

async fn summary(state: &AppState, target: ReviewTarget, id: i64) -> ApiResult<Json<ReviewSummary>> {
    let reviews = reviews::for_target(&state.db, target, id).await?;
    let ratings: Vec<i64> = reviews.iter().map(|r| r.rating).collect();
    Ok(Json(ReviewSummary {
        average_rating: average_rating(&ratings),
        reviews,
    }))
}

async fn delete(
    state: &AppState,
    caller: Option<&Caller>,
    target: ReviewTarget,
    request: DeleteReviewRequest,
) -> ApiResult<Json<MessageResponse>> {
    let email = require("email", request.email.as_deref())?;
    let id = target_id(target, request.artid.as_ref(), request.evid.as_ref())?;
    ensure_acting_as(caller, email)?;

    if !reviews::delete(&state.db, target, email, id).await? {
        return Err(ApiError::not_found("Review not found"));
    }
    info!("Deleted {} review of {} by {}", target.label(), id, email);
    Ok(message("Review deleted successfully"))
}

/// POST /api/submit-artifact-review/ and /api/add-artifact-review/
pub async fn submit_artifact_review(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<SubmitReviewRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    submit(&state, caller.as_deref(), ReviewTarget::Artifact, request).await
}

/// GET /api/get-artifact-reviews/?artid=
pub async fn get_artifact_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<ArtifactIdQuery>,
) -> ApiResult<Json<ReviewSummary>> {
    let artid = query_id("artid", query.artid.as_ref())?;
    summary(&state, ReviewTarget::Artifact, artid).await
}

/// GET /api/get-visitor-artifact-reviews/?email=
pub async fn get_visitor_artifact_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<VisitorArtifactReviews>> {
    let email = query.required()?;
    let reviews = reviews::artifact_reviews_by(&state.db, email).await?;
    Ok(Json(VisitorArtifactReviews { reviews }))
}

/// POST /api/delete-artifact-review/
pub async fn delete_artifact_review(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteReviewRequest>,
) -> ApiResult<Json<MessageResponse>> {
    delete(&state, caller.as_deref(), ReviewTarget::Artifact, request).await
}

/// POST /api/submit-event-review/ and /api/add-event-review/
pub async fn submit_event_review(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<SubmitReviewRequest>,
) -> ApiResult<(StatusCode, Json<MessageResponse>)> {
    submit(&state, caller.as_deref(), ReviewTarget::Event, request).await
}

/// GET /api/get-event-reviews/?evid=
pub async fn get_event_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EventIdQuery>,
) -> ApiResult<Json<ReviewSummary>> {
    let evid = query_id("evid", query.evid.as_ref())?;
    summary(&state, ReviewTarget::Event, evid).await
}

/// GET /api/get-visitor-event-reviews/?email=
pub async fn get_visitor_event_reviews(
    State(state): State<AppState>,
    ApiQuery(query): ApiQuery<EmailQuery>,
) -> ApiResult<Json<VisitorEventReviews>> {
    let email = query.required()?;
    let reviews = reviews::event_reviews_by(&state.db, email).await?;
    Ok(Json(VisitorEventReviews { reviews }))
}

/// POST /api/delete-event-review/
pub async fn delete_event_review(
    State(state): State<AppState>,
    caller: Option<Extension<Caller>>,
    ApiJson(request): ApiJson<DeleteReviewRequest>,
) -> ApiResult<Json<MessageResponse>> {
    delete(&state, caller.as_deref(), ReviewTarget::Event, request).await
}
