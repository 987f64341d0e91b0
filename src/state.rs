use crate::crypto::Crypto;
use crate::db::mood_store::MoodStore;
use crate::services::ai::TherapistAi;
use crate::services::catalog::ActivityCatalog;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub store: Arc<dyn MoodStore>,
    pub ai: Arc<TherapistAi>,
    pub catalog: Arc<ActivityCatalog>,
    pub crypto: Arc<Crypto>,
    pub session_key: Vec<u8>,
}

pub type SharedState = Arc<AppState>;
