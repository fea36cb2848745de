use crate::models::AppState;
use axum::Router;

pub mod account_routes;
pub mod booking_routes;
pub mod calendar_routes;
pub mod home_routes;
pub mod reports_routes;

#[cfg(test)]
mod tests;

pub fn router(state: AppState) -> Router {
    Router::new()
        .nest("/booking", booking_routes::router())
        .nest("/admin/calendar", calendar_routes::router())
        .nest("/admin/reports", reports_routes::router())
        .nest("/account", account_routes::router())
        .merge(home_routes::router())
        .with_state(state)
}
