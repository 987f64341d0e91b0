use crate::domain::mood::Mood;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Every mood pool must be able to fill one day of the plan.
pub const MIN_POOL_SIZE: usize = 3;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("no activities configured for mood '{0}'")]
    MissingMood(Mood),
    #[error("mood '{mood}' has {got} activities, at least {MIN_POOL_SIZE} required")]
    PoolTooSmall { mood: Mood, got: usize },
    #[error("catalog file lists unknown mood label '{0}'")]
    UnknownLabel(String),
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    #[error("failed to parse catalog file: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Read-only mapping from mood to candidate self-care activities.
///
/// Built once at startup and shared through app state so the plan generator
/// never owns the data it selects from. Validation runs before the server
/// binds; an undersized pool is a boot failure, not a request failure.
#[derive(Debug, Clone)]
pub struct ActivityCatalog {
    entries: BTreeMap<Mood, Vec<String>>,
}

impl ActivityCatalog {
    /// Default activity table shipped with the application.
    pub fn builtin() -> Self {
        let table: [(Mood, [&str; 3]); 9] = [
            (
                Mood::Happy,
                [
                    "Go for a walk in nature",
                    "Share your joy with someone",
                    "Start a gratitude journal",
                ],
            ),
            (
                Mood::Sad,
                [
                    "Practice self-compassion",
                    "Listen to uplifting music",
                    "Reach out to a friend",
                ],
            ),
            (
                Mood::Angry,
                [
                    "Try deep breathing exercises",
                    "Go for a run",
                    "Write down your feelings",
                ],
            ),
            (
                Mood::Anxious,
                [
                    "Practice 4-7-8 breathing",
                    "Do a grounding exercise",
                    "Try progressive muscle relaxation",
                ],
            ),
            (
                Mood::Stressed,
                [
                    "Take a warm bath",
                    "Do some yoga",
                    "Practice mindfulness meditation",
                ],
            ),
            (
                Mood::Calm,
                [
                    "Enjoy a cup of tea",
                    "Read a book",
                    "Do some light stretching",
                ],
            ),
            (
                Mood::Excited,
                [
                    "Channel energy into a creative project",
                    "Plan something fun",
                    "Share your excitement with others",
                ],
            ),
            (
                Mood::Tired,
                [
                    "Take a power nap",
                    "Drink some water",
                    "Do some gentle movement",
                ],
            ),
            (
                Mood::Neutral,
                [
                    "Try something new",
                    "Check in with yourself",
                    "Plan your next wellness activity",
                ],
            ),
        ];

        let entries = table
            .into_iter()
            .map(|(mood, activities)| {
                (mood, activities.iter().map(|a| a.to_string()).collect())
            })
            .collect();
        Self { entries }
    }

    /// Load an override table from a JSON file: `{"Happy": ["...", ...], ...}`.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)?;
        let parsed: BTreeMap<String, Vec<String>> = serde_json::from_str(&raw)?;

        let mut entries = BTreeMap::new();
        for (label, activities) in parsed {
            let mood: Mood = label
                .parse()
                .map_err(|_| CatalogError::UnknownLabel(label))?;
            entries.insert(mood, activities);
        }
        let catalog = Self { entries };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Catalog from `ACTIVITY_CATALOG_PATH` when set, otherwise the builtin
    /// table. Either way the result is validated.
    pub fn from_env() -> Result<Self, CatalogError> {
        match std::env::var("ACTIVITY_CATALOG_PATH") {
            Ok(path) => {
                tracing::info!("Loading activity catalog from {}", path);
                Self::from_json_file(path)
            }
            Err(_) => {
                let catalog = Self::builtin();
                catalog.validate()?;
                Ok(catalog)
            }
        }
    }

    pub fn validate(&self) -> Result<(), CatalogError> {
        for mood in Mood::ALL {
            let pool = self
                .entries
                .get(&mood)
                .ok_or(CatalogError::MissingMood(mood))?;
            if pool.len() < MIN_POOL_SIZE {
                return Err(CatalogError::PoolTooSmall {
                    mood,
                    got: pool.len(),
                });
            }
        }
        Ok(())
    }

    pub fn activities(&self, mood: Mood) -> &[String] {
        self.entries.get(&mood).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn moods(&self) -> impl Iterator<Item = Mood> + '_ {
        self.entries.keys().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
