use crate::db::{self, StoredPlan};
use crate::services::wellness::generate_wellness_plan;
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use serde::Serialize;

#[derive(Serialize)]
pub struct PlanResponse {
    pub plan: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/plan", get(get_plan))
        .route("/history", get(plan_history))
        .with_state(state)
}

async fn get_plan(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<PlanResponse>, StatusCode> {
    let history = state.store.history(user_id).await.map_err(|e| {
        tracing::error!("Failed to load mood history: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;

    let plan = generate_wellness_plan(&history, &state.catalog, &mut rand::thread_rng());

    // The sentinel is returned but not stored; only real plans go in history.
    if !history.is_empty() {
        db::insert_wellness_plan(&state.pool, user_id, &plan)
            .await
            .map_err(|e| {
                tracing::error!("Failed to store wellness plan: {}", e);
                StatusCode::INTERNAL_SERVER_ERROR
            })?;
    }

    Ok(Json(PlanResponse { plan }))
}

async fn plan_history(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<Vec<StoredPlan>>, StatusCode> {
    let plans = db::recent_wellness_plans(&state.pool, user_id, 10)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    Ok(Json(plans))
}
