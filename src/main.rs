mod crypto;
mod db;
mod domain;
mod middleware;
mod services;
mod state;
mod web;

use crate::db::mood_store::PgMoodStore;
use crate::services::ai::TherapistAi;
use crate::services::catalog::ActivityCatalog;
use crate::state::SharedState;
use axum::{routing::get_service, Router};
use base64::{engine::general_purpose, Engine as _};
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use tower_http::{
    cors::CorsLayer,
    services::{ServeDir, ServeFile},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL missing");
    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(10)
        .connect(&database_url)
        .await
        .map_err(|e| {
            tracing::error!("Failed to connect to database: {}", e);
            e
        })?;

    tracing::info!("Running database migrations...");
    sqlx::migrate!("./migrations").run(&pool).await.map_err(|e| {
        tracing::error!("Failed to run database migrations: {}", e);
        e
    })?;

    // An invalid catalog is a boot failure, never a per-request one.
    let catalog = Arc::new(ActivityCatalog::from_env()?);
    tracing::info!("Activity catalog ready: {} moods", catalog.len());

    let session_key_b64 = std::env::var("SESSION_KEY").expect("SESSION_KEY missing");
    let session_key = general_purpose::STANDARD
        .decode(session_key_b64)
        .expect("SESSION_KEY must be base64");

    let crypto = Arc::new(crypto::Crypto::from_env()?);
    let ai = Arc::new(TherapistAi::new(
        std::env::var("OPENAI_API_KEY").expect("OPENAI_API_KEY missing"),
    ));
    let store: Arc<dyn db::mood_store::MoodStore> = Arc::new(PgMoodStore::new(pool.clone()));

    let shared: SharedState = Arc::new(state::AppState {
        pool,
        store,
        ai,
        catalog,
        crypto,
        session_key,
    });

    let static_handler = ServeDir::new("static").not_found_service(ServeFile::new("static/index.html"));

    let app = Router::new()
        .merge(web::routes(shared))
        .fallback_service(get_service(static_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr = std::env::var("BIND_ADDR").unwrap_or_else(|_| {
        let port = std::env::var("PORT").unwrap_or_else(|_| "3000".to_string());
        format!("0.0.0.0:{}", port)
    });
    tracing::info!("Listening on {addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}
