use crate::db;
use crate::services::ai::ChatTurn;
use crate::state::SharedState;
use crate::web::session::UserSession;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

/// Exchanges carried to the model as short-term context.
const CONTEXT_TURNS: i64 = 6;

const MAX_MESSAGE_LEN: usize = 4000;

#[derive(Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Serialize)]
pub struct ChatResponse {
    pub response: String,
}

#[derive(Serialize)]
pub struct ChatExchange {
    pub user_message: String,
    pub ai_response: String,
    pub created_at: chrono::DateTime<chrono::Utc>,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/", post(send_message))
        .route("/", get(chat_history))
        .with_state(state)
}

async fn send_message(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
    Json(payload): Json<ChatRequest>,
) -> Result<Json<ChatResponse>, StatusCode> {
    let message = payload.message.trim();
    if message.is_empty() {
        return Err(StatusCode::BAD_REQUEST);
    }
    if message.len() > MAX_MESSAGE_LEN {
        return Err(StatusCode::PAYLOAD_TOO_LARGE);
    }

    let context = load_context(&state, user_id).await?;
    let response = state.ai.respond(message, &context).await.map_err(|e| {
        tracing::error!("Chat completion failed for user {}: {}", user_id, e);
        StatusCode::BAD_GATEWAY
    })?;

    let enc_user_message = state
        .crypto
        .seal(message)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    let enc_ai_response = state
        .crypto
        .seal(&response)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;
    db::insert_chat_exchange(&state.pool, user_id, &enc_user_message, &enc_ai_response)
        .await
        .map_err(|e| {
            tracing::error!("Failed to store chat exchange: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?;

    Ok(Json(ChatResponse { response }))
}

async fn chat_history(
    UserSession(user_id): UserSession,
    State(state): State<SharedState>,
) -> Result<Json<Vec<ChatExchange>>, StatusCode> {
    let rows = db::recent_chat_exchanges(&state.pool, user_id, 50)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let exchanges = rows
        .into_iter()
        .filter_map(|row| {
            let user_message = state.crypto.open(&row.enc_user_message);
            let ai_response = state.crypto.open(&row.enc_ai_response);
            match (user_message, ai_response) {
                (Ok(user_message), Ok(ai_response)) => Some(ChatExchange {
                    user_message,
                    ai_response,
                    created_at: row.created_at,
                }),
                _ => {
                    tracing::warn!("Skipping undecryptable chat row {}", row.id);
                    None
                }
            }
        })
        .collect();

    Ok(Json(exchanges))
}

async fn load_context(
    state: &SharedState,
    user_id: uuid::Uuid,
) -> Result<Vec<ChatTurn>, StatusCode> {
    let rows = db::recent_chat_exchanges(&state.pool, user_id, CONTEXT_TURNS)
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    Ok(rows
        .into_iter()
        .filter_map(|row| {
            match (
                state.crypto.open(&row.enc_user_message),
                state.crypto.open(&row.enc_ai_response),
            ) {
                (Ok(user_message), Ok(ai_response)) => Some(ChatTurn {
                    user_message,
                    ai_response,
                }),
                _ => None,
            }
        })
        .collect())
}
