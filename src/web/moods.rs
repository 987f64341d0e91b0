use crate::db;
use crate::domain::mood::{Mood, MoodEntry, DEFAULT_INTENSITY};
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;

const MAX_DESCRIPTION_LEN: usize = 2000;

#[derive(Deserialize)]
pub struct RecordMoodRequest {
    pub mood: String,
    pub intensity: Option<i16>,
    pub description: Option<String>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(record_mood))
        .route("/", get(mood_history))
        .route("/", delete(delete_my_data))
        .with_state(state)
}

async fn record_mood(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<RecordMoodRequest>,
) -> Result<(StatusCode, Json<MoodEntry>), StatusCode> {
    // Unknown labels are rejected here so stored history always resolves
    // against the activity catalog.
    let mood: Mood = payload.mood.parse().map_err(|e| {
        tracing::warn!("Rejected mood entry: {}", e);
        StatusCode::BAD_REQUEST
    })?;

    let description = payload
        .description
        .filter(|d| !d.trim().is_empty());
    if description.as_ref().map_or(false, |d| d.len() > MAX_DESCRIPTION_LEN) {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let intensity = payload.intensity.unwrap_or(DEFAULT_INTENSITY);

    let entry = state
        .store
        .record(user_id, mood, intensity, description)
        .await
        .map_err(|e| {
            tracing::error!("Failed to record mood: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok((StatusCode::CREATED, Json(entry)))
}

async fn mood_history(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<Vec<MoodEntry>>, StatusCode> {
    let history = state.store.history(user_id).await.map_err(|e| {
        tracing::error!("Failed to load mood history: {}", e);
        StatusCode::INTERNAL_SERVER_ERROR
    })?;
    Ok(Json(history))
}

/// Bulk "delete all my data": mood entries plus the chat history and stored
/// plans derived from them.
async fn delete_my_data(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<StatusCode, StatusCode> {
    let deleted = db::purge_user_data(&state.pool, user_id)
        .await
        .map_err(|e| {
            tracing::error!("Failed to purge user data: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;
    tracing::info!("Purged {} mood entries for user {}", deleted, user_id);
    Ok(StatusCode::NO_CONTENT)
}
