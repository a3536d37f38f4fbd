//! Daily stats API routes

use crate::error::{ApiError, ApiResult};
use crate::state::ServerState;
use axum::{
    body::Bytes,
    extract::{rejection::JsonRejection, Path, State},
    routing::{get, post, put},
    Json, Router,
};
use fitpulse_shared::models::{DailyStats, DailyStatsPatch};
use fitpulse_shared::types::AddWaterRequest;
use fitpulse_shared::validation::StatField;
use tracing::{debug, info};

/// Create daily stats routes
pub fn stats_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(list_stats))
        .route("/today", get(get_today).put(update_today))
        .route("/today/water", post(add_water))
        .route("/today/entry/:field", put(enter_stat))
}

/// GET /api/v1/stats - All daily records, newest first
async fn list_stats(State(state): State<ServerState>) -> Json<Vec<DailyStats>> {
    let snapshot = state.store.read().await.snapshot();
    Json(snapshot.daily_stats.clone())
}

/// GET /api/v1/stats/today - Today's record, `null` before anything is entered
async fn get_today(State(state): State<ServerState>) -> Json<Option<DailyStats>> {
    Json(state.store.read().await.today_stats())
}

/// PUT /api/v1/stats/today - Merge the supplied fields into today's record
async fn update_today(
    State(state): State<ServerState>,
    payload: Result<Json<DailyStatsPatch>, JsonRejection>,
) -> ApiResult<Json<DailyStats>> {
    let Json(patch) = payload?;
    let record = state.store.write().await.upsert_today_stats(&patch);
    debug!(date = %record.date, "Daily stats updated");
    Ok(Json(record))
}

/// POST /api/v1/stats/today/water - Add a glass of water (250 ml unless specified)
///
/// An empty body adds one glass. A body that is not a valid request is rejected.
async fn add_water(
    State(state): State<ServerState>,
    body: Bytes,
) -> ApiResult<Json<DailyStats>> {
    let req = if body.iter().all(u8::is_ascii_whitespace) {
        AddWaterRequest::default()
    } else {
        let Json(req) = Json::<AddWaterRequest>::from_bytes(&body)?;
        req
    };
    Ok(Json(state.store.write().await.add_water(req.amount_ml)))
}

/// PUT /api/v1/stats/today/entry/{field} - Enter one stat as raw text
///
/// Input that is not a valid number leaves the record untouched; the
/// response is then today's record as it was.
async fn enter_stat(
    State(state): State<ServerState>,
    Path(field): Path<String>,
    raw: String,
) -> ApiResult<Json<Option<DailyStats>>> {
    let field: StatField = field.parse().map_err(ApiError::NotFound)?;

    let mut store = state.store.write().await;
    match field.parse_entry(&raw) {
        Some(patch) => Ok(Json(Some(store.upsert_today_stats(&patch)))),
        None => {
            info!(field = ?field, "Ignoring non-numeric stat entry");
            Ok(Json(store.today_stats()))
        }
    }
}
