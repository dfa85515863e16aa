//! museum-api library - museum management REST service
//!
//! Visitors browse and review museum records, supervisors manage their
//! museum and employees, and every employee edit lands in an audit trail.

use std::sync::Arc;

use axum::Router;
use museum_common::config::ServiceConfig;
use museum_common::events::EventBus;
use sqlx::SqlitePool;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod api;
pub mod db;
pub mod error;
pub mod search;

pub use error::{ApiError, ApiResult};

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool
    pub db: SqlitePool,
    /// Resolved service configuration
    pub config: Arc<ServiceConfig>,
    /// Secret used to sign bearer tokens
    pub signing_secret: i64,
    /// Edit-log broadcast for SSE subscribers
    pub events: Arc<EventBus>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, config: ServiceConfig, signing_secret: i64) -> Self {
        Self {
            db,
            config: Arc::new(config),
            signing_secret,
            events: Arc::new(EventBus::default()),
        }
    }
}

/// Build application router
///
/// Mutating routes sit behind the bearer-token middleware; reads, logins and
/// registrations stay public.
pub fn build_router(state: AppState) -> Router {
    use axum::middleware;
    use axum::routing::{get, post};

    let protected = Router::new()
        // Accounts
        .route("/api/update-username/", post(api::update_username))
        // Employees
        .route("/api/register-employee/", post(api::register_employee))
        .route("/api/update-employee/", post(api::update_employee))
        .route("/api/delete-employee/", post(api::delete_employee))
        // Visits
        .route("/api/add-visited-museum/", post(api::add_visited_museum))
        .route("/api/delete-visited-museum/", post(api::delete_visited_museum))
        // Exhibits
        .route("/api/add-exhibit/", post(api::add_exhibit))
        .route("/api/update-exhibit/", post(api::update_exhibit))
        .route("/api/delete-exhibit/", post(api::delete_exhibit))
        // Artifacts
        .route("/api/add-artifact/", post(api::add_artifact))
        .route("/api/update-artifact/", post(api::update_artifact))
        .route("/api/delete-artifact/", post(api::delete_artifact))
        // Artists
        .route("/api/add-artist/", post(api::add_artist))
        .route("/api/update-artist/", post(api::update_artist))
        .route("/api/delete-artist/", post(api::delete_artist))
        // Events
        .route("/api/add-event/", post(api::add_event))
        .route("/api/update-event/", post(api::update_event))
        .route("/api/delete-event/", post(api::delete_event))
        // Reviews
        .route("/api/submit-artifact-review/", post(api::submit_artifact_review))
        .route("/api/add-artifact-review/", post(api::submit_artifact_review))
        .route("/api/delete-artifact-review/", post(api::delete_artifact_review))
        .route("/api/submit-event-review/", post(api::submit_event_review))
        .route("/api/add-event-review/", post(api::submit_event_review))
        .route("/api/delete-event-review/", post(api::delete_event_review))
        // Edit log
        .route("/api/record-edit-artifact/", post(api::record_edit_artifact))
        .route("/api/record-edit-event/", post(api::record_edit_event))
        .route("/api/record-edit-exhibit/", post(api::record_edit_exhibit))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            api::auth_middleware,
        ));

    let public = Router::new()
        // Accounts
        .route("/api/register-visitor/", post(api::register_visitor))
        .route("/api/login-visitor/", post(api::login_visitor))
        .route("/api/register-supervisor/", post(api::register_supervisor))
        .route("/api/login-supervisor-employee/", post(api::login_supervisor_employee))
        .route("/api/token/", post(api::obtain_token))
        .route("/api/token/refresh/", post(api::refresh_token))
        .route("/api/get-profile/", get(api::get_profile))
        // Employees
        .route("/api/get-supervisor-info/", get(api::get_supervisor_info))
        .route("/api/get-supervisor-employees/", get(api::get_supervisor_employees))
        .route("/api/get-employee-info/", get(api::get_employee_info))
        // Museums
        .route("/api/get-all-museums/", get(api::get_all_museums))
        .route("/api/browse-visited-museums/", get(api::browse_visited_museums))
        .route("/api/get-visited-museums/", get(api::get_visited_museums))
        // Catalogue
        .route("/api/get-exhibits/", get(api::get_exhibits))
        .route("/api/get-all-artifacts/", get(api::get_all_artifacts))
        .route("/api/get-artifacts/", get(api::get_artifacts))
        .route("/api/get-artifacts-for-artist/", get(api::get_artifacts_for_artist))
        .route("/api/get-artists/", get(api::get_artists))
        .route("/api/get-events/", get(api::get_events))
        .route("/api/get-all-events/", get(api::get_all_events))
        // Reviews
        .route("/api/get-artifact-reviews/", get(api::get_artifact_reviews))
        .route("/api/get-visitor-artifact-reviews/", get(api::get_visitor_artifact_reviews))
        .route("/api/get-event-reviews/", get(api::get_event_reviews))
        .route("/api/get-visitor-event-reviews/", get(api::get_visitor_event_reviews))
        // Edit log
        .route("/api/get-edit-logs/", get(api::get_edit_logs))
        .route("/api/edit-logs/stream", get(api::edit_log_stream))
        .merge(api::health_routes());

    Router::new()
        .merge(protected)
        .merge(public)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}
