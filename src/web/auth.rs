use crate::db;
use crate::middleware::RateLimiter;
use crate::state::SharedState;
use crate::web::session;
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, SaltString},
    Argon2, PasswordVerifier,
};
use axum::{
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
    routing::post,
    Json, Router,
};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

static REGISTER_RATE_LIMITER: Lazy<RateLimiter> = Lazy::new(|| RateLimiter::new(5, 300));
static LOGIN_RATE_LIMITER: Lazy<RateLimiter> = Lazy::new(|| RateLimiter::new(5, 60));

#[derive(Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub password: String,
}

#[derive(Deserialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct AuthResponse {
    pub user_id: Uuid,
    pub username: String,
}

pub fn router(state: SharedState) -> Router {
    Router::new()
        .route("/register", post(register))
        .route("/login", post(login))
        .route("/logout", post(logout))
        .with_state(state)
}

/// Client address from the proxy header; all of one proxy's traffic shares a
/// bucket when the header is absent.
fn client_ip(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|s| s.split(',').next())
        .unwrap_or("unknown")
        .trim()
        .to_string()
}

async fn register(
    headers: HeaderMap,
    State(state): State<SharedState>,
    Json(payload): Json<RegisterRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let ip = client_ip(&headers);
    if !REGISTER_RATE_LIMITER.allow(&ip).await {
        tracing::warn!("Registration rate limit exceeded for IP: {}", ip);
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    let username = payload.username.trim();
    if username.len() < 3 || username.len() > 64 || payload.password.len() < 8 {
        return Err(StatusCode::BAD_REQUEST);
    }

    let salt = SaltString::generate(rand_core::OsRng);
    let hash = Argon2::default()
        .hash_password(payload.password.as_bytes(), &salt)
        .map_err(|e| {
            tracing::error!("Failed to hash password: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .to_string();

    let user = db::create_user(&state.pool, username, &hash)
        .await
        .map_err(|e| {
            tracing::error!("Failed to create user: {}", e);
            StatusCode::INTERNAL_SERVER_ERROR
        })?
        .ok_or(StatusCode::CONFLICT)?;

    tracing::info!("Registered user {}", user.id);
    Ok((
        StatusCode::CREATED,
        Json(AuthResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

async fn login(
    headers: HeaderMap,
    State(state): State<SharedState>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, StatusCode> {
    let ip = client_ip(&headers);
    if !LOGIN_RATE_LIMITER.allow(&ip).await {
        tracing::warn!("Login rate limit exceeded for IP: {}", ip);
        return Err(StatusCode::TOO_MANY_REQUESTS);
    }

    let user = db::find_user_by_username(&state.pool, payload.username.trim())
        .await
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?
        .ok_or(StatusCode::UNAUTHORIZED)?;

    let parsed_hash = PasswordHash::new(&user.hash).map_err(|_| StatusCode::UNAUTHORIZED)?;
    Argon2::default()
        .verify_password(payload.password.as_bytes(), &parsed_hash)
        .map_err(|_| StatusCode::UNAUTHORIZED)?;

    let token = session::sign_session(user.id, &state.session_key)
        .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?;

    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        session::session_cookie(&token)
            .parse()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    );

    Ok((
        headers,
        Json(AuthResponse {
            user_id: user.id,
            username: user.username,
        }),
    ))
}

async fn logout() -> Result<impl IntoResponse, StatusCode> {
    let mut headers = HeaderMap::new();
    headers.insert(
        axum::http::header::SET_COOKIE,
        session::clear_session_cookie()
            .parse()
            .map_err(|_| StatusCode::INTERNAL_SERVER_ERROR)?,
    );
    Ok((headers, StatusCode::NO_CONTENT))
}
