use crate::domain::mood::{Mood, MoodEntry};
use anyhow::Result;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

/// Storage contract for mood entries. Any backend that appends with the
/// current timestamp and returns history in chronological order satisfies it.
#[async_trait]
pub trait MoodStore: Send + Sync {
    async fn record(
        &self,
        user_id: Uuid,
        mood: Mood,
        intensity: i16,
        description: Option<String>,
    ) -> Result<MoodEntry>;

    /// All entries for the user, ascending by `created_at`. Empty when the
    /// user has recorded nothing; never an error.
    async fn history(&self, user_id: Uuid) -> Result<Vec<MoodEntry>>;
}

#[derive(Debug, FromRow)]
struct MoodRow {
    id: Uuid,
    user_id: Uuid,
    mood: String,
    intensity: i16,
    description: Option<String>,
    created_at: DateTime<Utc>,
}

impl TryFrom<MoodRow> for MoodEntry {
    type Error = anyhow::Error;

    fn try_from(row: MoodRow) -> Result<Self> {
        let mood: Mood = row.mood.parse()?;
        Ok(MoodEntry {
            id: row.id,
            user_id: row.user_id,
            mood,
            intensity: row.intensity,
            description: row.description,
            created_at: row.created_at,
        })
    }
}

pub struct PgMoodStore {
    pool: PgPool,
}

impl PgMoodStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MoodStore for PgMoodStore {
    async fn record(
        &self,
        user_id: Uuid,
        mood: Mood,
        intensity: i16,
        description: Option<String>,
    ) -> Result<MoodEntry> {
        let row = sqlx::query_as::<_, MoodRow>(
            r#"
            INSERT INTO moods (user_id, mood, intensity, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, user_id, mood, intensity, description, created_at
            "#,
        )
        .bind(user_id)
        .bind(mood.as_str())
        .bind(intensity)
        .bind(description)
        .fetch_one(&self.pool)
        .await?;
        row.try_into()
    }

    async fn history(&self, user_id: Uuid) -> Result<Vec<MoodEntry>> {
        let rows = sqlx::query_as::<_, MoodRow>(
            r#"
            SELECT id, user_id, mood, intensity, description, created_at
            FROM moods
            WHERE user_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;
        rows.into_iter().map(MoodEntry::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use tokio::sync::Mutex;

    /// In-memory stand-in used to exercise the contract semantics.
    #[derive(Default)]
    struct MemoryMoodStore {
        entries: Mutex<HashMap<Uuid, Vec<MoodEntry>>>,
    }

    #[async_trait]
    impl MoodStore for MemoryMoodStore {
        async fn record(
            &self,
            user_id: Uuid,
            mood: Mood,
            intensity: i16,
            description: Option<String>,
        ) -> Result<MoodEntry> {
            let entry = MoodEntry {
                id: Uuid::new_v4(),
                user_id,
                mood,
                intensity,
                description,
                created_at: Utc::now(),
            };
            let mut entries = self.entries.lock().await;
            entries.entry(user_id).or_default().push(entry.clone());
            Ok(entry)
        }

        async fn history(&self, user_id: Uuid) -> Result<Vec<MoodEntry>> {
            let entries = self.entries.lock().await;
            Ok(entries.get(&user_id).cloned().unwrap_or_default())
        }
    }

    #[tokio::test]
    async fn history_preserves_insertion_order_with_monotonic_timestamps() {
        let store = MemoryMoodStore::default();
        let user_id = Uuid::new_v4();

        let moods = [Mood::Happy, Mood::Tired, Mood::Calm, Mood::Happy];
        for mood in moods {
            store.record(user_id, mood, 5, None).await.unwrap();
        }

        let history = store.history(user_id).await.unwrap();
        assert_eq!(history.len(), moods.len());
        for (entry, expected) in history.iter().zip(moods) {
            assert_eq!(entry.mood, expected);
        }
        for pair in history.windows(2) {
            assert!(pair[0].created_at <= pair[1].created_at);
        }
    }

    #[tokio::test]
    async fn empty_history_is_an_empty_vec() {
        let store = MemoryMoodStore::default();
        let history = store.history(Uuid::new_v4()).await.unwrap();
        assert!(history.is_empty());
    }

    #[tokio::test]
    async fn entries_are_scoped_per_user() {
        let store = MemoryMoodStore::default();
        let alice = Uuid::new_v4();
        let bob = Uuid::new_v4();

        store.record(alice, Mood::Happy, 8, None).await.unwrap();
        store
            .record(bob, Mood::Stressed, 6, Some("deadline week".to_string()))
            .await
            .unwrap();

        assert_eq!(store.history(alice).await.unwrap().len(), 1);
        let bobs = store.history(bob).await.unwrap();
        assert_eq!(bobs.len(), 1);
        assert_eq!(bobs[0].mood, Mood::Stressed);
        assert_eq!(bobs[0].description.as_deref(), Some("deadline week"));
    }
}
