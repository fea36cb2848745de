use axum::{Json, Router, extract::Query, routing::get};

use crate::health_az::{self, HealthQuery, HealthResults, TOPICS};
use crate::models::{ApiOk, AppState};
use crate::view::Element;

#[derive(serde::Serialize)]
pub struct HealthStatus {
    pub status: &'static str,
}

#[derive(serde::Serialize)]
pub struct HealthAzView {
    #[serde(flatten)]
    pub results: HealthResults,
    pub view: Element,
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/health", get(health))
        .route("/health-a-z", get(health_a_z))
}

pub async fn health() -> Json<ApiOk<HealthStatus>> {
    Json(ApiOk {
        data: HealthStatus { status: "ok" },
    })
}

pub async fn health_a_z(Query(query): Query<HealthQuery>) -> Json<ApiOk<HealthAzView>> {
    let results = health_az::filter(TOPICS, &query);
    let view = health_az::render(&query, &results);
    Json(ApiOk {
        data: HealthAzView { results, view },
    })
}
