// End-to-end route tests: a fake pharmacy site and the BFF both listen on
// ephemeral ports; requests go through reqwest like a browser shell would.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::{
    Form, Json, Router,
    extract::{Query, State},
    http::{HeaderMap, StatusCode, header},
    response::{IntoResponse, Response},
    routing::{get, post},
};
use chrono::NaiveDate;
use serde_json::{Value, json};

use crate::{
    models::{AppState, CreateAppointmentRequest},
    routes,
    services::ServiceCatalog,
    sessions::SessionStore,
    upstream::HttpPharmacyApi,
};

/* -------------------------
   Fake pharmacy site
--------------------------*/

const CONFLICT_TIME: &str = "09:05";
/// Answered with a 500 that still carries a `{status, message}` body.
const SERVER_ERROR_TIME: &str = "09:20";

#[derive(Default)]
struct Fake {
    created: Mutex<Vec<(Option<String>, CreateAppointmentRequest)>>,
    /// Times that only show up as booked after a conflicting create.
    revealed: Mutex<Vec<String>>,
    signups: Mutex<Vec<String>>,
    booked_fetches: Mutex<usize>,
}

async fn fake_appointments() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "appointments": [
            {
                "id": 1, "service": "MMR Vaccine", "date": "12-10-2026", "time": "09:15",
                "name": "Ada Lovelace", "dob": "10-12-1990", "nhs": "1234567890",
                "email": "ada@example.com", "phone": "07400123456"
            },
            {
                "id": 2, "service": "Earwax Removal + Blood Pressure Check", "date": "16-10-2026",
                "time": "14:00:00", "first_name": "Alan", "last_name": "Turing"
            },
            {
                "id": "3", "service": "Flu Vaccination (NHS)", "date": "03-11-2026",
                "time": "10:30", "name": "Grace Hopper"
            }
        ]
    }))
}

async fn fake_reports(Query(q): Query<HashMap<String, String>>) -> Json<Value> {
    let days: usize = q.get("days").and_then(|d| d.parse().ok()).unwrap_or(30);
    let labels: Vec<String> = (0..days).map(|i| format!("{:02}-10-2026", i % 28 + 1)).collect();
    Json(json!({
        "status": "ok",
        "labels": labels,
        "booked": vec![1; days],
        "open": vec![6; days],
        "total_slots_per_day": 7
    }))
}

async fn fake_booked(State(fake): State<Arc<Fake>>, Query(q): Query<HashMap<String, String>>) -> Response {
    if !q.contains_key("date") {
        return (StatusCode::BAD_REQUEST, Json(json!({"status": "error", "message": "date is required"})))
            .into_response();
    }
    *fake.booked_fetches.lock().unwrap() += 1;
    let mut times = vec!["09:10:00".to_string()];
    times.extend(fake.revealed.lock().unwrap().iter().cloned());
    Json(json!({"status": "ok", "times": times})).into_response()
}

async fn fake_create(
    State(fake): State<Arc<Fake>>,
    headers: HeaderMap,
    Json(req): Json<CreateAppointmentRequest>,
) -> Response {
    if req.time == CONFLICT_TIME {
        fake.revealed.lock().unwrap().push(format!("{CONFLICT_TIME}:00"));
        return (
            StatusCode::CONFLICT,
            Json(json!({
                "status": "error",
                "message": "This time slot is already booked. Please choose another time."
            })),
        )
            .into_response();
    }
    if req.time == SERVER_ERROR_TIME {
        fake.revealed.lock().unwrap().push(format!("{SERVER_ERROR_TIME}:00"));
        return (
            StatusCode::INTERNAL_SERVER_ERROR,
            Json(json!({"status": "error", "message": "Slot taken"})),
        )
            .into_response();
    }
    let csrf = headers
        .get("x-csrftoken")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    fake.created.lock().unwrap().push((csrf, req));
    Json(json!({"status": "ok", "id": 101})).into_response()
}

async fn fake_login(Form(form): Form<HashMap<String, String>>) -> Response {
    if form.get("password").map(String::as_str) == Some("secret") {
        (
            [(header::SET_COOKIE, "sessionid=abc123; Path=/")],
            Json(json!({"status": "ok", "message": "Login successful!"})),
        )
            .into_response()
    } else {
        Json(json!({"status": "error", "message": "Invalid email or password."})).into_response()
    }
}

async fn fake_signup(State(fake): State<Arc<Fake>>, Form(form): Form<HashMap<String, String>>) -> Json<Value> {
    let username = form.get("username").cloned().unwrap_or_default();
    fake.signups.lock().unwrap().push(username);
    Json(json!({"status": "ok", "message": "Account created successfully!"}))
}

fn fake_site(fake: Arc<Fake>) -> Router {
    Router::new()
        .route("/admin-dashboard/appointments/", get(fake_appointments))
        .route("/admin-dashboard/reports/data/", get(fake_reports))
        .route("/appointments/booked/", get(fake_booked))
        .route("/appointments/create/", post(fake_create))
        .route("/login/", post(fake_login))
        .route("/signup/", post(fake_signup))
        .with_state(fake)
}

/* -------------------------
   Harness
--------------------------*/

fn fixed_today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 16).unwrap()
}

async fn serve(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}")
}

fn bff_state(upstream_url: &str) -> AppState {
    AppState {
        upstream: Arc::new(HttpPharmacyApi::new(upstream_url, Duration::from_secs(5)).unwrap()),
        services: Arc::new(ServiceCatalog::default()),
        wizards: SessionStore::new(Duration::from_secs(600)),
        calendars: SessionStore::new(Duration::from_secs(600)),
        reports: SessionStore::new(Duration::from_secs(600)),
        reports_default_days: 30,
        today: fixed_today,
    }
}

struct Harness {
    base: String,
    http: reqwest::Client,
    fake: Arc<Fake>,
}

impl Harness {
    async fn start() -> Self {
        let fake = Arc::new(Fake::default());
        let upstream = serve(fake_site(fake.clone())).await;
        let base = serve(routes::router(bff_state(&upstream))).await;
        Self {
            base,
            http: reqwest::Client::new(),
            fake,
        }
    }

    async fn post(&self, path: &str, body: Value) -> (StatusCode, Value) {
        let res = self
            .http
            .post(format!("{}{}", self.base, path))
            .header(header::COOKIE, "csrftoken=tok123")
            .json(&body)
            .send()
            .await
            .unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }

    async fn get(&self, path: &str) -> (StatusCode, Value) {
        let res = self.http.get(format!("{}{}", self.base, path)).send().await.unwrap();
        let status = res.status();
        (status, res.json().await.unwrap_or(Value::Null))
    }
}

/* -------------------------
   View tree helpers
--------------------------*/

fn find_id<'a>(node: &'a Value, id: &str) -> Option<&'a Value> {
    if node.get("id").and_then(Value::as_str) == Some(id) {
        return Some(node);
    }
    node.get("children")?.as_array()?.iter().find_map(|c| find_id(c, id))
}

fn has_class(node: &Value, class: &str) -> bool {
    node.get("classes")
        .and_then(Value::as_array)
        .is_some_and(|cs| cs.iter().any(|c| c == class))
}

fn find_class<'a>(node: &'a Value, class: &str) -> Vec<&'a Value> {
    let mut out = Vec::new();
    let mut stack = vec![node];
    while let Some(n) = stack.pop() {
        if has_class(n, class) {
            out.push(n);
        }
        if let Some(children) = n.get("children").and_then(Value::as_array) {
            stack.extend(children.iter().rev());
        }
    }
    out
}

fn text(node: &Value) -> String {
    match node {
        Value::String(s) => s.clone(),
        _ => node
            .get("children")
            .and_then(Value::as_array)
            .map(|cs| cs.iter().map(text).collect())
            .unwrap_or_default(),
    }
}

fn attr<'a>(node: &'a Value, name: &str) -> Option<&'a str> {
    node.get("attrs")?.get(name)?.as_str()
}

fn valid_form(phone: &str) -> Value {
    json!({
        "first_name": "Ada",
        "last_name": "Lovelace",
        "dob": "10-12-1990",
        "postcode": "SW1A 1AA",
        "email": "ada@example.com",
        "phone": phone,
        "nhs": "123 456 7890",
        "note": "",
        "accept_terms": true
    })
}

/// Opens a wizard and walks it to the contact form with `time` on 20 Oct 2026.
async fn wizard_at_contact_form(h: &Harness, time: &str) -> String {
    let (status, body) = h.post("/booking/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["session_id"].as_str().unwrap().to_string();

    let (_, body) = h
        .post(&format!("/booking/sessions/{id}/services/toggle"), json!({"service": "MMR Vaccine"}))
        .await;
    assert_eq!(body["data"]["accepted"], true);
    let (_, body) = h.post(&format!("/booking/sessions/{id}/next"), json!({})).await;
    assert_eq!(body["data"]["step"], "date_time");

    let (_, body) = h.post(&format!("/booking/sessions/{id}/date"), json!({"date": "2026-10-20"})).await;
    assert_eq!(body["data"]["accepted"], true);
    let (_, body) = h.post(&format!("/booking/sessions/{id}/time"), json!({"time": time})).await;
    assert_eq!(body["data"]["accepted"], true);

    h.post(&format!("/booking/sessions/{id}/next"), json!({})).await;
    let (_, body) = h.post(&format!("/booking/sessions/{id}/account"), json!({"choice": "guest"})).await;
    assert_eq!(body["data"]["step"], "contact_form");
    id
}

/* -------------------------
   Tests
--------------------------*/

#[tokio::test]
async fn health_and_health_a_z() {
    let h = Harness::start().await;
    let (status, body) = h.get("/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["status"], "ok");

    let (_, body) = h.get("/health-a-z?q=adhd&letter=all").await;
    assert_eq!(body["data"]["topics"].as_array().unwrap().len(), 2);
    assert_eq!(body["data"]["empty"], false);

    let (_, body) = h.get("/health-a-z?q=adhd&letter=z").await;
    assert_eq!(body["data"]["empty"], true);
}

#[tokio::test]
async fn booking_happy_path_confirms_and_forwards_csrf() {
    let h = Harness::start().await;
    let (status, body) = h.post("/booking/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["session_id"].as_str().unwrap().to_string();

    // date pick loads the booked times of that day
    h.post(&format!("/booking/sessions/{id}/services/toggle"), json!({"service": "MMR Vaccine"}))
        .await;
    h.post(&format!("/booking/sessions/{id}/next"), json!({})).await;
    let (_, body) = h.post(&format!("/booking/sessions/{id}/date"), json!({"date": "2026-10-20"})).await;
    let booked: Vec<_> = find_class(&body["data"]["view"], "booked")
        .into_iter()
        .filter_map(|s| attr(s, "data-time"))
        .collect();
    assert_eq!(booked, vec!["09:10"]);

    let (_, body) = h.post(&format!("/booking/sessions/{id}/time"), json!({"time": "09:10"})).await;
    assert_eq!(body["data"]["accepted"], false);

    let (_, body) = h.post(&format!("/booking/sessions/{id}/time"), json!({"time": "09:15"})).await;
    assert_eq!(body["data"]["accepted"], true);
    let chip = find_id(&body["data"]["view"], "chipDateTime").unwrap();
    assert_eq!(text(chip), "20 Oct, 09:15");

    h.post(&format!("/booking/sessions/{id}/next"), json!({})).await;
    h.post(&format!("/booking/sessions/{id}/account"), json!({"choice": "guest"})).await;
    let (_, body) = h.post(&format!("/booking/sessions/{id}/submit"), valid_form("07400 123456")).await;

    assert_eq!(body["data"]["step"], "confirmation");
    let view = &body["data"]["view"];
    assert_eq!(
        text(find_id(view, "confirmText").unwrap()),
        "Your 'MMR Vaccine' appointment has been confirmed for Ada Lovelace"
    );
    assert_eq!(text(find_id(view, "confirmBig").unwrap()), "20 Oct, 2026 @ 9:15am");

    let created = h.fake.created.lock().unwrap().clone();
    assert_eq!(created.len(), 1);
    let (csrf, req) = &created[0];
    assert_eq!(csrf.as_deref(), Some("tok123"));
    assert_eq!(req.date, "2026-10-20");
    assert_eq!(req.phone, "07400123456");
    assert_eq!(req.nhs_number, "1234567890");
}

#[tokio::test]
async fn invalid_form_is_never_sent() {
    let h = Harness::start().await;
    let id = wizard_at_contact_form(&h, "10:00").await;

    let (_, body) = h.post(&format!("/booking/sessions/{id}/submit"), valid_form("08400123456")).await;
    assert_eq!(body["data"]["accepted"], false);
    assert_eq!(body["data"]["step"], "contact_form");
    let notice = find_id(&body["data"]["view"], "bookingNotice").unwrap();
    assert!(text(notice).starts_with("Invalid Phone Number"));
    assert!(h.fake.created.lock().unwrap().is_empty());
}

#[tokio::test]
async fn conflict_refreshes_booked_times_and_stays_on_form() {
    let h = Harness::start().await;
    let id = wizard_at_contact_form(&h, CONFLICT_TIME).await;

    let (_, body) = h.post(&format!("/booking/sessions/{id}/submit"), valid_form("+447400123456")).await;
    assert_eq!(body["data"]["accepted"], false);
    assert_eq!(body["data"]["step"], "contact_form");
    let notice = find_id(&body["data"]["view"], "bookingNotice").unwrap();
    assert!(text(notice).contains("This time slot is already booked"));

    // the refreshed cache made the chosen slot invalid
    h.post(&format!("/booking/sessions/{id}/back"), json!({})).await;
    let (_, body) = h.post(&format!("/booking/sessions/{id}/back"), json!({})).await;
    assert_eq!(body["data"]["step"], "date_time");
    let view = &body["data"]["view"];
    let mut booked: Vec<_> = find_class(view, "booked").into_iter().filter_map(|s| attr(s, "data-time")).collect();
    booked.sort_unstable();
    assert_eq!(booked, vec![CONFLICT_TIME, "09:10"]);
    assert!(find_class(view, "slot").iter().all(|s| !has_class(s, "selected")));
}

#[tokio::test]
async fn server_error_with_a_message_is_a_rejection() {
    let h = Harness::start().await;
    let id = wizard_at_contact_form(&h, SERVER_ERROR_TIME).await;
    let fetches_before = *h.fake.booked_fetches.lock().unwrap();

    let (status, body) = h.post(&format!("/booking/sessions/{id}/submit"), valid_form("07400123456")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["accepted"], false);
    assert_eq!(body["data"]["step"], "contact_form");
    let notice = find_id(&body["data"]["view"], "bookingNotice").unwrap();
    assert!(text(notice).contains("Slot taken"));
    assert!(!text(notice).contains("Network error"));

    assert_eq!(*h.fake.booked_fetches.lock().unwrap(), fetches_before + 1);
    assert!(h.fake.created.lock().unwrap().is_empty());

    h.post(&format!("/booking/sessions/{id}/back"), json!({})).await;
    let (_, body) = h.post(&format!("/booking/sessions/{id}/back"), json!({})).await;
    let view = &body["data"]["view"];
    let booked: Vec<_> = find_class(view, "booked").into_iter().filter_map(|s| attr(s, "data-time")).collect();
    assert!(booked.contains(&SERVER_ERROR_TIME));
}

#[tokio::test]
async fn booking_rejects_bad_input_and_unknown_sessions() {
    let h = Harness::start().await;
    let (_, body) = h.post("/booking/sessions", json!({})).await;
    let id = body["data"]["session_id"].as_str().unwrap().to_string();

    let (_, body) = h.post(&format!("/booking/sessions/{id}/next"), json!({})).await;
    assert_eq!(body["data"]["accepted"], false);
    let notice = find_id(&body["data"]["view"], "bookingNotice").unwrap();
    assert!(text(notice).contains("Please complete this step first."));

    let (status, body) = h.post(&format!("/booking/sessions/{id}/date"), json!({"date": "20/10/2026"})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DATE");

    let html = h
        .http
        .get(format!("{}/booking/sessions/{id}/fragment", h.base))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();
    assert!(html.starts_with(r#"<div id="bookingModal""#));
    assert!(html.contains("Please complete this step first."));

    let res = h
        .http
        .delete(format!("{}/booking/sessions/{id}", h.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::NO_CONTENT);
    let (status, body) = h.get(&format!("/booking/sessions/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "SESSION_NOT_FOUND");
}

#[tokio::test]
async fn admin_calendar_filters_selects_and_prints() {
    let h = Harness::start().await;
    let (status, body) = h.post("/admin/calendar/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["session_id"].as_str().unwrap().to_string();
    let view = &body["data"]["view"];
    assert_eq!(text(find_id(view, "dateRangeText").unwrap()), "Oct 11 - Oct 17, 2026");
    assert_eq!(find_class(view, "ap-apt").len(), 2);

    h.post(&format!("/admin/calendar/sessions/{id}/filter/open"), json!({})).await;
    let (_, body) = h
        .post(&format!("/admin/calendar/sessions/{id}/filter/toggle"), json!({"service": "MMR Vaccine"}))
        .await;
    // draft only: still two cards
    assert_eq!(find_class(&body["data"]["view"], "ap-apt").len(), 2);
    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/filter/apply"), json!({})).await;
    let view = &body["data"]["view"];
    assert_eq!(find_class(view, "ap-apt").len(), 1);
    assert_eq!(text(find_id(view, "servicesFilterLabel").unwrap()), "Selected (1)");

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/appointments/1/select"), json!({})).await;
    let panel = find_id(&body["data"]["view"], "apDetailPanel").unwrap();
    assert!(has_class(panel, "open"));
    assert_eq!(text(find_id(panel, "apDetailNhs").unwrap()), "1234567890");

    let (status, _) = h.post(&format!("/admin/calendar/sessions/{id}/appointments/99/select"), json!({})).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/click"), json!({"target": "elsewhere"})).await;
    assert!(!has_class(find_id(&body["data"]["view"], "apDetailPanel").unwrap(), "open"));

    let res = h
        .http
        .get(format!("{}/admin/calendar/sessions/{id}/print", h.base))
        .send()
        .await
        .unwrap();
    assert_eq!(res.status(), StatusCode::OK);
    let content_type = res.headers()[header::CONTENT_TYPE].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/html"));
    let html = res.text().await.unwrap();
    assert!(html.contains("Appointments List (1)"));
    assert!(html.contains("Ada Lovelace"));

    // printing switched the dashboard to the list
    let (_, body) = h.get(&format!("/admin/calendar/sessions/{id}")).await;
    assert_eq!(body["data"]["mode"], "list");

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/filters/reset"), json!({})).await;
    assert_eq!(find_class(&body["data"]["view"], "ap-list-row").len(), 3);
}

#[tokio::test]
async fn admin_calendar_month_and_day_views() {
    let h = Harness::start().await;
    let (_, body) = h.post("/admin/calendar/sessions", json!({})).await;
    let id = body["data"]["session_id"].as_str().unwrap().to_string();

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/view"), json!({"mode": "month"})).await;
    let view = &body["data"]["view"];
    assert_eq!(find_class(view, "ap-month-day").len(), 42);
    assert_eq!(find_class(view, "ap-month-item").len(), 2);

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/nav"), json!({"nav": "next"})).await;
    let view = &body["data"]["view"];
    assert_eq!(text(find_id(view, "dateRangeText").unwrap()), "November 2026");
    assert_eq!(find_class(view, "ap-month-item").len(), 1);

    let (_, body) = h.post(&format!("/admin/calendar/sessions/{id}/view"), json!({"mode": "day"})).await;
    assert_eq!(body["data"]["offset"], 0);
    assert_eq!(text(find_id(&body["data"]["view"], "dateRangeText").unwrap()), "16 Oct, 2026");
    assert_eq!(find_class(&body["data"]["view"], "ap-apt").len(), 1);
}

#[tokio::test]
async fn reports_panel_loads_and_validates_days() {
    let h = Harness::start().await;
    let (status, body) = h.post("/admin/reports/sessions", json!({})).await;
    assert_eq!(status, StatusCode::OK);
    let id = body["data"]["session_id"].as_str().unwrap().to_string();
    assert_eq!(body["data"]["days"], 30);
    assert_eq!(body["data"]["generation"], 1);
    let view = &body["data"]["view"];
    assert_eq!(text(find_id(view, "rpMeta1").unwrap()), "Total: 30 • Avg/day: 1.0");
    assert_eq!(text(find_id(view, "rpMeta2").unwrap()), "Slots/day: 7 • Last 30 days");

    let (status, body) = h.post(&format!("/admin/reports/sessions/{id}/load"), json!({"days": 0})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"]["code"], "INVALID_DAYS");

    let (_, body) = h.post(&format!("/admin/reports/sessions/{id}/load"), json!({"days": 7})).await;
    assert_eq!(body["data"]["generation"], 2);
    assert_eq!(
        text(find_id(&body["data"]["view"], "rpMeta3").unwrap()),
        "Booked: 7 • Open: 42"
    );

    // a reload without days keeps the chosen window
    let (status, body) = h.post(&format!("/admin/reports/sessions/{id}/load"), json!({})).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"]["days"], 7);
    assert_eq!(body["data"]["generation"], 3);
    assert_eq!(
        text(find_id(&body["data"]["view"], "rpMeta2").unwrap()),
        "Slots/day: 7 • Last 7 days"
    );
}

#[tokio::test]
async fn account_relay_messages_and_cookies() {
    let h = Harness::start().await;

    let (_, body) = h.post("/account/login", json!({"email": "", "password": "x"})).await;
    assert_eq!(body["data"]["title"], "Missing Info");

    let (_, body) = h.post("/account/login", json!({"email": "ada@example.com", "password": "nope"})).await;
    assert_eq!(body["data"]["ok"], false);
    assert_eq!(body["data"]["message"], "Invalid email or password.");

    let res = h
        .http
        .post(format!("{}/account/login", h.base))
        .json(&json!({"email": "ada@example.com", "password": "secret"}))
        .send()
        .await
        .unwrap();
    let cookie = res.headers().get(header::SET_COOKIE).map(|v| v.to_str().unwrap().to_string());
    assert_eq!(cookie.as_deref(), Some("sessionid=abc123; Path=/"));
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["data"]["title"], "Welcome Back!");

    let (_, body) = h
        .post(
            "/account/signup",
            json!({"email": "ada@example.com", "password": "a", "confirm_password": "b"}),
        )
        .await;
    assert_eq!(body["data"]["title"], "Password Mismatch");

    let (_, body) = h
        .post(
            "/account/signup",
            json!({"email": "ada@example.com", "password": "a", "confirm_password": "a"}),
        )
        .await;
    assert_eq!(body["data"]["title"], "Account Created!");
    assert_eq!(h.fake.signups.lock().unwrap().as_slice(), ["ada".to_string()]);
}

#[tokio::test]
async fn unreachable_upstream() {
    // grab a free port and close it again
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let dead = format!("http://{}", listener.local_addr().unwrap());
    drop(listener);

    let base = serve(routes::router(bff_state(&dead))).await;
    let http = reqwest::Client::new();

    let res = http.post(format!("{base}/admin/calendar/sessions")).send().await.unwrap();
    assert_eq!(res.status(), StatusCode::BAD_GATEWAY);
    let body: Value = res.json().await.unwrap();
    assert_eq!(body["error"]["code"], "UPSTREAM_UNAVAILABLE");

    // a failed booked-times fetch still lets the date through with nothing booked
    let body: Value = http
        .post(format!("{base}/booking/sessions"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let id = body["data"]["session_id"].as_str().unwrap().to_string();
    http.post(format!("{base}/booking/sessions/{id}/services/toggle"))
        .json(&json!({"service": "MenB Vaccine"}))
        .send()
        .await
        .unwrap();
    http.post(format!("{base}/booking/sessions/{id}/next")).send().await.unwrap();
    let body: Value = http
        .post(format!("{base}/booking/sessions/{id}/date"))
        .json(&json!({"date": "2026-10-21"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(body["data"]["accepted"], true);
    assert!(find_class(&body["data"]["view"], "booked").is_empty());
}
