pub mod health;

use axum::{
    response::Html,
    routing::{get, post},
    Router,
};

use crate::state::AppState;
use crate::trivia::handlers;

const INDEX_HTML: &str = include_str!("../../static/index.html");

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health::health_handler))
        // Round API
        .route("/api/v1/round", get(handlers::handle_get_round))
        .route("/api/v1/round/select", post(handlers::handle_select))
        .route("/api/v1/round/advance", post(handlers::handle_advance))
        .route("/api/v1/round/restart", post(handlers::handle_restart))
        .with_state(state)
}
