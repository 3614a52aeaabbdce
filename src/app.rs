use crate::handlers;
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/api/years", get(handlers::get_years))
        .route("/api/months", get(handlers::get_months))
        .route("/api/weekly", get(handlers::get_weekly))
        .route("/api/reviews", get(handlers::get_reviews))
        .with_state(state)
}
