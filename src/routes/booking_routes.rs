// src/routes/booking_routes.rs

use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    response::Html,
    routing::{get, post},
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    booking::{self, Account, AccountOutcome, ContactForm, Step, Wizard},
    dates::parse_iso,
    error::ApiError,
    middleware::cookies::UpstreamCredentials,
    models::{ApiOk, AppState},
    upstream::CreateOutcome,
    view::Element,
};

#[derive(Debug, Serialize)]
pub struct BookingView {
    pub session_id: Uuid,
    pub step: Step,
    /// False when the event was refused; the view then carries a notice.
    pub accepted: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub login_required: bool,
    pub view: Element,
}

type ViewResult = Result<Json<ApiOk<BookingView>>, ApiError>;

#[derive(Debug, Deserialize)]
pub struct ServiceBody {
    pub service: String,
}

#[derive(Debug, Deserialize)]
pub struct SearchBody {
    #[serde(default)]
    pub query: String,
}

#[derive(Debug, Deserialize)]
pub struct DateBody {
    /// YYYY-MM-DD
    pub date: String,
}

#[derive(Debug, Deserialize)]
pub struct TimeBody {
    pub time: String,
}

#[derive(Debug, Deserialize)]
pub struct AccountBody {
    pub choice: Account,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sessions", post(open_session))
        .route("/sessions/{id}", get(current_view).delete(close_session))
        .route("/sessions/{id}/fragment", get(fragment))
        .route("/sessions/{id}/services/toggle", post(toggle_service))
        .route("/sessions/{id}/services/search", post(search_services))
        .route("/sessions/{id}/calendar/prev", post(calendar_prev))
        .route("/sessions/{id}/calendar/next", post(calendar_next))
        .route("/sessions/{id}/date", post(pick_date))
        .route("/sessions/{id}/time", post(pick_time))
        .route("/sessions/{id}/next", post(next_step))
        .route("/sessions/{id}/back", post(back_step))
        .route("/sessions/{id}/account", post(choose_account))
        .route("/sessions/{id}/submit", post(submit))
        .route("/sessions/{id}/reset", post(reset))
}

/* -------------------------
   Helpers
--------------------------*/

fn snapshot(id: Uuid, w: &Wizard, today: NaiveDate, accepted: bool, login_required: bool) -> BookingView {
    BookingView {
        session_id: id,
        step: w.step,
        accepted,
        login_required,
        view: booking::render(w, today),
    }
}

async fn view(state: &AppState, id: Uuid, accepted: bool) -> ViewResult {
    let today = (state.today)();
    state
        .wizards
        .with(id, |w| snapshot(id, w, today, accepted, false))
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

/// Runs a synchronous wizard event and answers with the new view.
async fn apply<F>(state: &AppState, id: Uuid, event: F) -> ViewResult
where
    F: FnOnce(&mut Wizard, NaiveDate) -> bool + Send,
{
    let today = (state.today)();
    state
        .wizards
        .with_mut(id, |w| {
            let accepted = event(w, today);
            snapshot(id, w, today, accepted, false)
        })
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

/// Fetches booked times for `date`. Results for a date that is no longer
/// picked are dropped; a failed fetch leaves the (empty) cache as it is.
async fn refresh_booked_times(state: &AppState, id: Uuid, date: NaiveDate) {
    match state.upstream.booked_times(date).await {
        Ok(times) => {
            let applied = state.wizards.with_mut(id, |w| w.apply_booked_times(date, times)).await;
            if applied == Some(false) {
                tracing::debug!(%id, %date, "stale booked times discarded");
            }
        }
        Err(e) => tracing::warn!(%id, %date, error = %e, "could not load booked times"),
    }
}

/* -------------------------
   Lifecycle
--------------------------*/

pub async fn open_session(State(state): State<AppState>) -> ViewResult {
    let today = (state.today)();
    let id = state.wizards.insert(Wizard::open(state.services.clone(), today)).await;
    tracing::info!(%id, "booking wizard opened");
    view(&state, id, true).await
}

pub async fn current_view(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    view(&state, id, true).await
}

/// Server-rendered modal markup for shells that swap HTML instead of JSON.
pub async fn fragment(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<Html<String>, ApiError> {
    let today = (state.today)();
    state
        .wizards
        .with(id, |w| Html(booking::render(w, today).to_html()))
        .await
        .ok_or_else(ApiError::session_not_found)
}

pub async fn close_session(State(state): State<AppState>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    if state.wizards.remove(id).await {
        tracing::info!(%id, "booking wizard closed");
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(ApiError::session_not_found())
    }
}

pub async fn reset(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |w, today| {
        w.reset(today);
        true
    })
    .await
}

/* -------------------------
   Step 0: services
--------------------------*/

pub async fn toggle_service(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<ServiceBody>,
) -> ViewResult {
    apply(&state, id, move |w, _| w.toggle_service(&body.service).is_ok()).await
}

pub async fn search_services(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<SearchBody>,
) -> ViewResult {
    apply(&state, id, move |w, _| {
        w.search_services(&body.query);
        true
    })
    .await
}

/* -------------------------
   Step 1: date & time
--------------------------*/

pub async fn calendar_prev(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |w, _| {
        w.shift_month(-1);
        true
    })
    .await
}

pub async fn calendar_next(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |w, _| {
        w.shift_month(1);
        true
    })
    .await
}

pub async fn pick_date(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<DateBody>,
) -> ViewResult {
    let date = parse_iso(&body.date)
        .ok_or_else(|| ApiError::BadRequest("INVALID_DATE", "date must be YYYY-MM-DD".into()))?;
    let today = (state.today)();

    let picked = state
        .wizards
        .with_mut(id, |w| w.pick_date(date, today))
        .await
        .ok_or_else(ApiError::session_not_found)?;

    if picked.is_ok() {
        refresh_booked_times(&state, id, date).await;
    }
    view(&state, id, picked.is_ok()).await
}

pub async fn pick_time(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<TimeBody>,
) -> ViewResult {
    apply(&state, id, move |w, today| w.pick_time(&body.time, today).is_ok()).await
}

/* -------------------------
   Transitions
--------------------------*/

pub async fn next_step(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |w, today| w.next(today).is_ok()).await
}

pub async fn back_step(State(state): State<AppState>, Path(id): Path<Uuid>) -> ViewResult {
    apply(&state, id, |w, _| {
        w.back();
        true
    })
    .await
}

pub async fn choose_account(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<AccountBody>,
) -> ViewResult {
    let today = (state.today)();
    state
        .wizards
        .with_mut(id, |w| {
            let outcome = w.choose_account(body.choice);
            let login_required = matches!(outcome, Ok(AccountOutcome::LoginRequired));
            snapshot(id, w, today, outcome.is_ok(), login_required)
        })
        .await
        .map(|data| Json(ApiOk { data }))
        .ok_or_else(ApiError::session_not_found)
}

/* -------------------------
   Step 3: submission
--------------------------*/

pub async fn submit(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    creds: UpstreamCredentials,
    Json(form): Json<ContactForm>,
) -> ViewResult {
    let prepared = state
        .wizards
        .with_mut(id, |w| w.prepare_submission(form))
        .await
        .ok_or_else(ApiError::session_not_found)?;

    let Ok(request) = prepared else {
        return view(&state, id, false).await;
    };

    match state.upstream.create_appointment(&request, &creds).await {
        Ok(CreateOutcome::Created) => {
            tracing::info!(%id, date = %request.date, time = %request.time, "appointment booked");
            state.wizards.with_mut(id, |w| w.booking_confirmed(&request)).await;
            view(&state, id, true).await
        }
        Ok(CreateOutcome::Rejected(message)) => {
            tracing::info!(%id, ?message, "appointment rejected upstream");
            let date = state.wizards.with_mut(id, |w| w.booking_rejected(message)).await.flatten();
            if let Some(date) = date {
                refresh_booked_times(&state, id, date).await;
            }
            view(&state, id, false).await
        }
        Err(e) => {
            tracing::warn!(%id, error = %e, "appointment submission failed");
            state.wizards.with_mut(id, Wizard::booking_failed).await;
            view(&state, id, false).await
        }
    }
}
