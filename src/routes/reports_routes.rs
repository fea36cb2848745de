// src/routes/reports_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    routing::post,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::ApiError,
    middleware::cookies::UpstreamCredentials,
    models::{ApiOk, AppState},
    reports::{self, ReportsPanel, MAX_DAYS, MIN_DAYS},
    view::Element,
};

const LOAD_FAILED: &str = "Could not load report data.";

#[derive(Debug, Serialize)]
pub struct ReportsView {
    pub session_id: Uuid,
    pub days: u32,
    pub generation: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    pub view: Element,
}

#[derive(Debug, Default, Deserialize)]
pub struct DaysBody {
    pub days: Option<u32>,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}/load", post(load))
}

fn checked_days(days: Option<u32>, default: u32) -> Result<u32, ApiError> {
    let days = days.unwrap_or(default);
    if reports::valid_days(days) {
        Ok(days)
    } else {
        Err(ApiError::BadRequest(
            "INVALID_DAYS",
            format!("days must be between {MIN_DAYS} and {MAX_DAYS}"),
        ))
    }
}

/// Fetches and (re)builds the charts. A failed fetch leaves the previous
/// charts untouched.
async fn load_into(state: &AppState, id: Uuid, days: u32, creds: &UpstreamCredentials) -> Result<Json<ApiOk<ReportsView>>, ApiError> {
    let fetched = state.upstream.reports_data(days, creds).await;
    state
        .reports
        .with_mut(id, |panel| {
            let warning = match fetched {
                Ok(data) => {
                    panel.load(days, data);
                    None
                }
                Err(e) => {
                    tracing::warn!(%id, days, error = %e, "reports fetch failed");
                    Some(LOAD_FAILED)
                }
            };
            ReportsView {
                session_id: id,
                days: panel.days,
                generation: panel.charts.generation(),
                warning,
                view: reports::render(panel),
            }
        })
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

pub async fn open_session(
    State(state): State<AppState>,
    creds: UpstreamCredentials,
    body: Option<Json<DaysBody>>,
) -> Result<Json<ApiOk<ReportsView>>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    let days = checked_days(body.days, state.reports_default_days)?;
    let id = state.reports.insert(ReportsPanel::new(days)).await;
    tracing::info!(%id, days, "reports panel opened");
    load_into(&state, id, days, &creds).await
}

pub async fn load(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    creds: UpstreamCredentials,
    body: Option<Json<DaysBody>>,
) -> Result<Json<ApiOk<ReportsView>>, ApiError> {
    let body = body.map(|Json(b)| b).unwrap_or_default();
    // without a new window the panel reloads the one it already shows
    let current = state
        .reports
        .with(id, |panel| panel.days)
        .await
        .ok_or_else(ApiError::session_not_found)?;
    let days = checked_days(body.days, current)?;
    load_into(&state, id, days, &creds).await
}
