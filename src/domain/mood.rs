use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Closed set of mood labels. Anything outside this set is rejected at
/// ingestion so stored history always resolves against the activity catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mood {
    Happy,
    Sad,
    Angry,
    Anxious,
    Stressed,
    Calm,
    Excited,
    Tired,
    Neutral,
}

impl Mood {
    pub const ALL: [Mood; 9] = [
        Mood::Happy,
        Mood::Sad,
        Mood::Angry,
        Mood::Anxious,
        Mood::Stressed,
        Mood::Calm,
        Mood::Excited,
        Mood::Tired,
        Mood::Neutral,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Happy => "Happy",
            Mood::Sad => "Sad",
            Mood::Angry => "Angry",
            Mood::Anxious => "Anxious",
            Mood::Stressed => "Stressed",
            Mood::Calm => "Calm",
            Mood::Excited => "Excited",
            Mood::Tired => "Tired",
            Mood::Neutral => "Neutral",
        }
    }
}

impl fmt::Display for Mood {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, thiserror::Error)]
#[error("unknown mood label: {0}")]
pub struct ParseMoodError(pub String);

impl FromStr for Mood {
    type Err = ParseMoodError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        Mood::ALL
            .iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(raw.trim()))
            .copied()
            .ok_or_else(|| ParseMoodError(raw.to_string()))
    }
}

/// One journal entry. Immutable once recorded; the only deletion path is the
/// bulk "delete all my data" operation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MoodEntry {
    pub id: Uuid,
    pub user_id: Uuid,
    pub mood: Mood,
    pub intensity: i16,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

pub const DEFAULT_INTENSITY: i16 = 5;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_labels_case_insensitively() {
        assert_eq!("Happy".parse::<Mood>().unwrap(), Mood::Happy);
        assert_eq!("anxious".parse::<Mood>().unwrap(), Mood::Anxious);
        assert_eq!("  CALM ".parse::<Mood>().unwrap(), Mood::Calm);
    }

    #[test]
    fn rejects_unknown_labels() {
        let err = "Melancholy".parse::<Mood>().unwrap_err();
        assert_eq!(err.0, "Melancholy");
    }

    #[test]
    fn display_round_trips() {
        for mood in Mood::ALL {
            assert_eq!(mood.to_string().parse::<Mood>().unwrap(), mood);
        }
    }
}
