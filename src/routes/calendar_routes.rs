// src/routes/calendar_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    response::Html,
    routing::{delete, get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    dashboard::{self, CalendarState, ClickTarget, Nav, ViewMode},
    error::ApiError,
    middleware::cookies::UpstreamCredentials,
    models::{ApiOk, AppState},
    view::Element,
};

#[derive(Debug, Serialize)]
pub struct CalendarView {
    pub session_id: Uuid,
    pub mode: ViewMode,
    pub offset: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<&'static str>,
    pub view: Element,
}

type ViewResult = Result<Json<ApiOk<CalendarView>>, ApiError>;

const REFRESH_FAILED: &str = "Could not refresh appointments; showing the last loaded list.";

#[derive(Debug, Deserialize)]
pub struct ModeBody {
    pub mode: ViewMode,
}

#[derive(Debug, Deserialize)]
pub struct NavBody {
    pub nav: Nav,
}

#[derive(Debug, Deserialize)]
pub struct ClickBody {
    pub target: ClickTarget,
}

#[derive(Debug, Deserialize)]
pub struct ServiceBody {
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub query: String,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(current_view))
        .route("/sessions/{id}/refresh", post(refresh))
        .route("/sessions/{id}/view", post(switch_view))
        .route("/sessions/{id}/nav", post(navigate))
        .route("/sessions/{id}/click", post(document_click))
        .route("/sessions/{id}/filters/reset", post(reset_filters))
        .route("/sessions/{id}/filter/open", post(filter_open))
        .route("/sessions/{id}/filter/toggle", post(filter_toggle))
        .route("/sessions/{id}/filter/search", post(filter_search))
        .route("/sessions/{id}/filter/clear", post(filter_clear))
        .route("/sessions/{id}/filter/apply", post(filter_apply))
        .route("/sessions/{id}/filter/discard", post(filter_discard))
        .route("/sessions/{id}/appointments/{appt}/select", post(select_appointment))
        .route("/sessions/{id}/detail", delete(close_detail))
        .route("/sessions/{id}/print", get(print))
}

/* -------------------------
   Helpers
--------------------------*/

fn snapshot(
    state: &AppState,
    id: Uuid,
    cal: &CalendarState,
    today: NaiveDate,
    warning: Option<&'static str>,
) -> CalendarView {
    CalendarView {
        session_id: id,
        mode: cal.mode,
        offset: cal.offset,
        warning,
        view: dashboard::render(cal, &state.services, today),
    }
}

async fn apply<F>(state: &AppState, id: Uuid, event: F) -> ViewResult
where
    F: FnOnce(&mut CalendarState) + Send,
{
    let today = (state.today)();
    state
        .calendars
        .with_mut(id, |cal| {
            event(cal);
            snapshot(state, id, cal, today, None)
        })
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

/* -------------------------
   Lifecycle
--------------------------*/

pub async fn open_session(State(state): State<AppState>, creds: UpstreamCredentials) -> ViewResult {
    let appointments = state.upstream.list_appointments(&creds).await?;
    tracing::info!(count = appointments.len(), "admin calendar opened");
    let id = state.calendars.insert(CalendarState::new(appointments)).await;
    apply(&state, id, |_| {}).await
}

pub async fn current_view(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |_| {}).await
}

/// A failed fetch keeps the previous list on screen.
pub async fn refresh(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    creds: UpstreamCredentials,
) -> ViewResult {
    let fetched = state.upstream.list_appointments(&creds).await;
    let today = (state.today)();
    state
        .calendars
        .with_mut(id, |cal| {
            let warning = match fetched {
                Ok(list) => {
                    cal.reload(list);
                    None
                }
                Err(e) => {
                    tracing::warn!(%id, error = %e, "appointment refresh failed");
                    Some(REFRESH_FAILED)
                }
            };
            snapshot(&state, id, cal, today, warning)
        })
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

/* -------------------------
   View & navigation
--------------------------*/

pub async fn switch_view(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ModeBody>,
) -> ViewResult {
    apply(&state, id, move |cal| cal.switch_view(body.mode)).await
}

pub async fn navigate(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<NavBody>,
) -> ViewResult {
    apply(&state, id, move |cal| cal.navigate(body.nav)).await
}

pub async fn document_click(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ClickBody>,
) -> ViewResult {
    apply(&state, id, move |cal| cal.document_click(body.target)).await
}

/* -------------------------
   Services filter
--------------------------*/

pub async fn reset_filters(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, CalendarState::reset_filters).await
}

pub async fn filter_open(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |cal| cal.filter.open_dropdown()).await
}

pub async fn filter_toggle(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ServiceBody>,
) -> ViewResult {
    apply(&state, id, move |cal| {
        cal.filter.toggle(&body.service);
    })
    .await
}

pub async fn filter_search(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchBody>,
) -> ViewResult {
    apply(&state, id, move |cal| cal.filter.search(&body.query)).await
}

pub async fn filter_clear(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |cal| cal.filter.clear_draft()).await
}

pub async fn filter_apply(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, CalendarState::apply_filter).await
}

pub async fn filter_discard(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |cal| cal.filter.discard()).await
}

/* -------------------------
   Detail panel
--------------------------*/

pub async fn select_appointment(
    State(state): State<AppState>,
    Path((id, appt)): Path<(Uuid, String)>,
) -> ViewResult {
    let found = state
        .calendars
        .with_mut(id, |cal| cal.select(&appt).is_some())
        .await
        .ok_or_else(ApiError::session_not_found)?;
    if !found {
        return Err(ApiError::appointment_not_found(&appt));
    }
    apply(&state, id, |_| {}).await
}

pub async fn close_detail(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, CalendarState::close_detail).await
}

/* -------------------------
   Print
--------------------------*/

pub async fn print(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>, ApiError> {
    let printed_at = chrono::Local::now().format("%d/%m/%Y, %H:%M:%S").to_string();
    let html = state
        .calendars
        .with_mut(id, |cal| {
            cal.force_list_view();
            let rows = cal.print_rows();
            tracing::info!(%id, rows = rows.len(), "print document generated");
            dashboard::print_document(&rows, &printed_at).into_string()
        })
        .await
        .ok_or_else(ApiError::session_not_found)?;
    Ok(Html(html))
}
