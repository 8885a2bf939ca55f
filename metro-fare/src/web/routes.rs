//! HTTP route handlers.

use askama::Template;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{Html, IntoResponse, Response},
    routing::get,
};
use tower_http::services::ServeDir;
use tracing::warn;

use crate::planner::{SearchError, reachable_stations};

use super::dto::*;
use super::state::AppState;
use super::templates::*;

/// Create the application router.
///
/// `static_dir` is the path to the static assets directory.
pub fn create_router(state: AppState, static_dir: &str) -> Router {
    Router::new()
        .route("/", get(index_page))
        .route("/health", get(health))
        .route("/api/stations/search", get(search_stations))
        .route("/reachable", get(reachable))
        .nest_service("/static", ServeDir::new(static_dir))
        .with_state(state)
}

/// Health check endpoint.
async fn health() -> &'static str {
    "ok"
}

/// Index page with the query form.
async fn index_page(State(state): State<AppState>) -> impl IntoResponse {
    let template = IndexTemplate {
        station_count: state.network.len(),
        line_count: state.network.lines().len(),
    };
    Html(
        template
            .render()
            .unwrap_or_else(|e| format!("Template error: {}", e)),
    )
}

/// Search stations by name.
async fn search_stations(
    State(state): State<AppState>,
    Query(req): Query<StationSearchRequest>,
) -> Json<StationSearchResponse> {
    let limit = req.limit.unwrap_or(10).min(50);
    let stations = state
        .network
        .search_names(&req.q, limit)
        .into_iter()
        .map(StationSummary::from_station)
        .collect();

    Json(StationSearchResponse { stations })
}

/// Check if request accepts HTML.
fn accepts_html(headers: &HeaderMap) -> bool {
    headers
        .get(header::ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("text/html"))
}

/// Stations reachable from an origin, optionally at an exact fare.
async fn reachable(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(req): Query<ReachableRequest>,
) -> Result<Response, AppError> {
    if req.from.trim().is_empty() {
        return Err(AppError::BadRequest {
            message: "Missing origin station".to_string(),
        });
    }

    let origin = state
        .network
        .station_id_by_name(&req.from)
        .ok_or_else(|| AppError::NotFound {
            message: format!("Unknown station: {}", req.from.trim()),
        })?;

    let reachability = state.search.reachability(origin).await?;
    let stations = reachable_stations(&state.network, origin, &reachability, req.fare);
    let origin_name = state.network.station_name(&origin).into_owned();

    if accepts_html(&headers) {
        let template = ReachableTemplate::new(origin_name, req.fare, &stations);
        let html = template.render().map_err(|e| AppError::Internal {
            message: format!("Template error: {}", e),
        })?;

        Ok(Html(html).into_response())
    } else {
        let results: Vec<ReachableResult> =
            stations.iter().map(ReachableResult::from_station).collect();

        Ok(Json(ReachableResponse {
            origin: origin_name,
            fare: req.fare,
            count: results.len(),
            stations: results,
        })
        .into_response())
    }
}

/// Application error type.
#[derive(Debug)]
pub enum AppError {
    BadRequest { message: String },
    NotFound { message: String },
    Internal { message: String },
}

impl From<SearchError> for AppError {
    fn from(e: SearchError) -> Self {
        match e {
            SearchError::UnknownOrigin(_) => AppError::NotFound {
                message: e.to_string(),
            },
            _ => AppError::Internal {
                message: e.to_string(),
            },
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status, message) = match &self {
            AppError::BadRequest { message } => (StatusCode::BAD_REQUEST, message.clone()),
            AppError::NotFound { message } => (StatusCode::NOT_FOUND, message.clone()),
            AppError::Internal { message } => (StatusCode::INTERNAL_SERVER_ERROR, message.clone()),
        };

        warn!(%status, %message, "Request failed");

        let body = Json(ErrorResponse { error: message });
        (status, body).into_response()
    }
}
