pub mod mood_store;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub struct DbUser {
    pub id: Uuid,
    pub username: String,
    pub hash: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
pub struct ChatRow {
    pub id: Uuid,
    pub enc_user_message: Vec<u8>,
    pub enc_ai_response: Vec<u8>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct StoredPlan {
    pub id: Uuid,
    pub plan_text: String,
    pub created_at: DateTime<Utc>,
}

/// Insert a new user; `None` when the username is already taken.
pub async fn create_user(pool: &PgPool, username: &str, hash: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        INSERT INTO users (username, hash)
        VALUES ($1, $2)
        ON CONFLICT (username) DO NOTHING
        RETURNING id, username, hash, created_at
        "#,
    )
    .bind(username)
    .bind(hash)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_username(pool: &PgPool, username: &str) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, hash, created_at
        FROM users
        WHERE username = $1
        "#,
    )
    .bind(username)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn find_user_by_id(pool: &PgPool, user_id: Uuid) -> Result<Option<DbUser>> {
    let user = sqlx::query_as::<_, DbUser>(
        r#"
        SELECT id, username, hash, created_at
        FROM users
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?;
    Ok(user)
}

pub async fn insert_chat_exchange(
    pool: &PgPool,
    user_id: Uuid,
    enc_user_message: &[u8],
    enc_ai_response: &[u8],
) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO chat_history (user_id, enc_user_message, enc_ai_response)
        VALUES ($1, $2, $3)
        "#,
    )
    .bind(user_id)
    .bind(enc_user_message)
    .bind(enc_ai_response)
    .execute(pool)
    .await?;
    Ok(())
}

/// The user's most recent exchanges, oldest first.
pub async fn recent_chat_exchanges(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<ChatRow>> {
    let rows = sqlx::query_as::<_, ChatRow>(
        r#"
        SELECT id, enc_user_message, enc_ai_response, created_at
        FROM (
            SELECT id, enc_user_message, enc_ai_response, created_at
            FROM chat_history
            WHERE user_id = $1
            ORDER BY created_at DESC
            LIMIT $2
        ) recent
        ORDER BY created_at ASC
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(rows)
}

pub async fn insert_wellness_plan(
    pool: &PgPool,
    user_id: Uuid,
    plan_text: &str,
) -> Result<StoredPlan> {
    let plan = sqlx::query_as::<_, StoredPlan>(
        r#"
        INSERT INTO wellness_plans (user_id, plan_text)
        VALUES ($1, $2)
        RETURNING id, plan_text, created_at
        "#,
    )
    .bind(user_id)
    .bind(plan_text)
    .fetch_one(pool)
    .await?;
    Ok(plan)
}

pub async fn recent_wellness_plans(
    pool: &PgPool,
    user_id: Uuid,
    limit: i64,
) -> Result<Vec<StoredPlan>> {
    let plans = sqlx::query_as::<_, StoredPlan>(
        r#"
        SELECT id, plan_text, created_at
        FROM wellness_plans
        WHERE user_id = $1
        ORDER BY created_at DESC
        LIMIT $2
        "#,
    )
    .bind(user_id)
    .bind(limit)
    .fetch_all(pool)
    .await?;
    Ok(plans)
}

/// Bulk "delete all my data": moods, chat history and stored plans in one
/// transaction. Returns the number of mood entries removed.
pub async fn purge_user_data(pool: &PgPool, user_id: Uuid) -> Result<u64> {
    let mut tx = pool.begin().await?;

    let moods = sqlx::query("DELETE FROM moods WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?
        .rows_affected();
    sqlx::query("DELETE FROM chat_history WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;
    sqlx::query("DELETE FROM wellness_plans WHERE user_id = $1")
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

    tx.commit().await?;
    Ok(moods)
}
