use crate::domain::mood::{Mood, MoodEntry};
use crate::services::catalog::{ActivityCatalog, MIN_POOL_SIZE};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

pub const PLAN_DAYS: usize = 7;

/// Most recent entries considered when weighting focus selection.
pub const SAMPLE_WINDOW: usize = 7;

pub const EMPTY_HISTORY_MESSAGE: &str =
    "Track your moods for a few days to generate a personalized wellness plan.";

#[derive(Debug, Clone, Serialize)]
pub struct DayPlan {
    pub day: u8,
    pub focus: Mood,
    pub activities: Vec<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct WellnessPlan {
    pub days: Vec<DayPlan>,
}

impl fmt::Display for WellnessPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Your Personalized 7-Day Wellness Plan:\n\n")?;
        for day in &self.days {
            writeln!(f, "Day {} - Focus: {}", day.day, day.focus)?;
            for (i, activity) in day.activities.iter().enumerate() {
                writeln!(f, "{}. {}", i + 1, activity)?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// Build a 7-day plan from mood history, or `None` when there is nothing to
/// work from. The RNG is injected so selection sequences can be pinned in
/// tests; production callers pass `rand::thread_rng()`.
pub fn build_plan<R: Rng>(
    history: &[MoodEntry],
    catalog: &ActivityCatalog,
    rng: &mut R,
) -> Option<WellnessPlan> {
    if history.is_empty() {
        return None;
    }

    let window = &history[history.len().saturating_sub(SAMPLE_WINDOW)..];
    let mut counts: BTreeMap<Mood, u32> = BTreeMap::new();
    for entry in window {
        *counts.entry(entry.mood).or_insert(0) += 1;
    }
    // Frequency within the window doubles as the selection weight.
    let weighted: Vec<(Mood, u32)> = counts.into_iter().collect();

    let mut days = Vec::with_capacity(PLAN_DAYS);
    let mut previous: Option<Mood> = None;
    for day in 1..=PLAN_DAYS as u8 {
        let focus = pick_focus(&weighted, previous, catalog, rng);
        let activities: Vec<String> = catalog
            .activities(focus)
            .choose_multiple(rng, MIN_POOL_SIZE)
            .cloned()
            .collect();
        days.push(DayPlan {
            day,
            focus,
            activities,
        });
        previous = Some(focus);
    }

    Some(WellnessPlan { days })
}

/// Weighted draw over the window's moods, excluding yesterday's focus.
/// A single-mood window keeps its focus; the no-repeat rule is waived there.
fn pick_focus<R: Rng>(
    weighted: &[(Mood, u32)],
    previous: Option<Mood>,
    catalog: &ActivityCatalog,
    rng: &mut R,
) -> Mood {
    let candidates: Vec<(Mood, u32)> = weighted
        .iter()
        .copied()
        .filter(|&(mood, _)| Some(mood) != previous)
        .collect();

    if let Ok(&(mood, _)) = candidates.choose_weighted(rng, |&(_, count)| count) {
        return mood;
    }

    if let Some(prev) = previous {
        if weighted.iter().any(|&(mood, _)| mood == prev) {
            return prev;
        }
    }

    // No usable counts at all: fall back to a uniform draw over the catalog.
    let moods: Vec<Mood> = catalog.moods().collect();
    moods.choose(rng).copied().unwrap_or(Mood::Neutral)
}

/// The operation the presentation layer renders verbatim: a full plan, or the
/// sentinel text when the user has no history yet.
pub fn generate_wellness_plan<R: Rng>(
    history: &[MoodEntry],
    catalog: &ActivityCatalog,
    rng: &mut R,
) -> String {
    match build_plan(history, catalog, rng) {
        Some(plan) => plan.to_string(),
        None => EMPTY_HISTORY_MESSAGE.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use uuid::Uuid;

    fn entries(moods: &[Mood]) -> Vec<MoodEntry> {
        let user_id = Uuid::new_v4();
        let start = Utc::now() - Duration::days(moods.len() as i64);
        moods
            .iter()
            .enumerate()
            .map(|(i, &mood)| MoodEntry {
                id: Uuid::new_v4(),
                user_id,
                mood,
                intensity: 5,
                description: None,
                created_at: start + Duration::days(i as i64),
            })
            .collect()
    }

    #[test]
    fn empty_history_returns_sentinel() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(1);
        let text = generate_wellness_plan(&[], &catalog, &mut rng);
        assert_eq!(text, EMPTY_HISTORY_MESSAGE);
        assert!(!text.contains("Day "));
    }

    #[test]
    fn plan_has_seven_day_blocks_with_three_numbered_lines() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(2);
        let history = entries(&[Mood::Happy, Mood::Sad, Mood::Calm]);
        let text = generate_wellness_plan(&history, &catalog, &mut rng);

        assert!(text.starts_with("Your Personalized 7-Day Wellness Plan:\n\n"));
        let blocks: Vec<&str> = text
            .split("\n\n")
            .filter(|b| b.starts_with("Day "))
            .collect();
        assert_eq!(blocks.len(), PLAN_DAYS);
        for (i, block) in blocks.iter().enumerate() {
            let lines: Vec<&str> = block.lines().collect();
            assert_eq!(lines.len(), 4);
            assert!(lines[0].starts_with(&format!("Day {} - Focus: ", i + 1)));
            assert!(lines[1].starts_with("1. "));
            assert!(lines[2].starts_with("2. "));
            assert!(lines[3].starts_with("3. "));
        }
    }

    #[test]
    fn activities_are_distinct_and_drawn_from_focus_pool() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(3);
        let history = entries(&[Mood::Anxious, Mood::Tired, Mood::Anxious, Mood::Happy]);

        for _ in 0..50 {
            let plan = build_plan(&history, &catalog, &mut rng).unwrap();
            for day in &plan.days {
                assert_eq!(day.activities.len(), 3);
                let pool = catalog.activities(day.focus);
                for activity in &day.activities {
                    assert!(pool.contains(activity));
                }
                let mut deduped = day.activities.clone();
                deduped.sort();
                deduped.dedup();
                assert_eq!(deduped.len(), 3);
            }
        }
    }

    #[test]
    fn consecutive_days_never_share_focus_with_multiple_moods() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(4);
        let history = entries(&[
            Mood::Happy,
            Mood::Happy,
            Mood::Sad,
            Mood::Stressed,
            Mood::Happy,
        ]);

        for _ in 0..100 {
            let plan = build_plan(&history, &catalog, &mut rng).unwrap();
            for pair in plan.days.windows(2) {
                assert_ne!(pair[0].focus, pair[1].focus);
            }
        }
    }

    #[test]
    fn single_mood_window_repeats_its_focus() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(5);
        let history = entries(&[Mood::Calm; 7]);

        let plan = build_plan(&history, &catalog, &mut rng).unwrap();
        assert!(plan.days.iter().all(|d| d.focus == Mood::Calm));
    }

    #[test]
    fn sample_window_ignores_entries_older_than_seven() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(6);
        // Three old Sad entries pushed out of the window by seven Happy ones.
        let mut moods = vec![Mood::Sad, Mood::Sad, Mood::Sad];
        moods.extend([Mood::Happy; 7]);
        let history = entries(&moods);

        for _ in 0..20 {
            let plan = build_plan(&history, &catalog, &mut rng).unwrap();
            assert!(plan.days.iter().all(|d| d.focus == Mood::Happy));
        }
    }

    #[test]
    fn focus_selection_is_weighted_by_frequency() {
        let catalog = ActivityCatalog::builtin();
        let mut rng = StdRng::seed_from_u64(7);
        let mut moods = vec![Mood::Happy; 5];
        moods.extend([Mood::Sad; 2]);
        let history = entries(&moods);

        let mut happy = 0;
        let mut sad = 0;
        for _ in 0..500 {
            let plan = build_plan(&history, &catalog, &mut rng).unwrap();
            match plan.days[0].focus {
                Mood::Happy => happy += 1,
                Mood::Sad => sad += 1,
                other => panic!("unexpected focus {other}"),
            }
        }
        // Expected split is 5:2; allow plenty of slack but demand a clear bias.
        assert!(
            happy > sad + 100,
            "weighting too weak: happy={happy} sad={sad}"
        );
    }

    #[test]
    fn seeded_rng_reproduces_the_same_plan() {
        let catalog = ActivityCatalog::builtin();
        let history = entries(&[Mood::Excited, Mood::Neutral, Mood::Excited, Mood::Angry]);

        let mut first = StdRng::seed_from_u64(42);
        let mut second = StdRng::seed_from_u64(42);
        let a = generate_wellness_plan(&history, &catalog, &mut first);
        let b = generate_wellness_plan(&history, &catalog, &mut second);
        assert_eq!(a, b);
    }
}
