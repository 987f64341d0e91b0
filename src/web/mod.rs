pub mod auth;
pub mod chat;
pub mod moods;
pub mod resources;
pub mod session;
pub mod wellness;

use crate::state::SharedState;
use axum::{routing::get, Router};

async fn health() -> &'static str {
    "OK"
}

pub fn routes(state: SharedState) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/auth", auth::router(state.clone()))
        .nest("/moods", moods::router(state.clone()))
        .nest("/chat", chat::router(state.clone()))
        .nest("/wellness", wellness::router(state))
        .nest("/resources", resources::router())
}
