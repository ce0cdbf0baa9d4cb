use std::collections::{BTreeMap, BTreeSet};

use chrono::{NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::content::{Level, WordId};
use crate::session::result::{SessionSummary, accuracy_pct};
use crate::stats::achievements;

pub const SCHEMA_VERSION: u32 = 1;

const DATE_FORMAT: &str = "%Y-%m-%d";

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct LevelStats {
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: f64,
    pub completed: bool,
}

#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DailyStats {
    pub quizzes: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub accuracy: f64,
}

/// Cross-session learning history for one user. Accuracy fields are
/// always recomputed from their counters on mutation, never trusted as
/// stored; `level_stats` holds an entry for every defined level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StatsProfile {
    pub schema_version: u32,
    pub words_learned: BTreeSet<WordId>,
    pub total_quizzes: u32,
    pub total_correct: u32,
    pub total_incorrect: u32,
    pub level_stats: BTreeMap<String, LevelStats>,
    pub daily_stats: BTreeMap<String, DailyStats>,
    pub study_streak: u32,
    pub best_streak: u32,
    pub last_study_date: Option<String>,
    pub achievements: BTreeSet<String>,
    pub total_time_spent_secs: f64,
}

impl Default for StatsProfile {
    fn default() -> Self {
        let mut profile = Self {
            schema_version: SCHEMA_VERSION,
            words_learned: BTreeSet::new(),
            total_quizzes: 0,
            total_correct: 0,
            total_incorrect: 0,
            level_stats: BTreeMap::new(),
            daily_stats: BTreeMap::new(),
            study_streak: 0,
            best_streak: 0,
            last_study_date: None,
            achievements: BTreeSet::new(),
            total_time_spent_secs: 0.0,
        };
        profile.backfill_levels();
        profile
    }
}

impl StatsProfile {
    /// Check if loaded data has a stale schema version and needs reset.
    pub fn needs_reset(&self) -> bool {
        self.schema_version != SCHEMA_VERSION
    }

    /// Ensure every defined level has a (possibly zeroed) entry. Runs on
    /// construction and after every load.
    pub fn backfill_levels(&mut self) {
        for level in Level::all() {
            self.level_stats.entry(level.key()).or_default();
        }
    }

    pub fn overall_accuracy(&self) -> f64 {
        accuracy_pct(self.total_correct, self.total_incorrect)
    }

    pub fn level(&self, level: Level) -> Option<&LevelStats> {
        self.level_stats.get(&level.key())
    }

    pub fn mark_level_completed(&mut self, level: Level) {
        self.level_stats.entry(level.key()).or_default().completed = true;
    }

    /// Fold one finished session into the profile and return any newly
    /// unlocked achievement ids. Pure in-memory mutation; the caller
    /// persists afterward.
    pub fn record_session(&mut self, summary: &SessionSummary) -> Vec<String> {
        self.record_session_at(Utc::now().date_naive(), summary)
    }

    pub fn record_session_at(&mut self, today: NaiveDate, summary: &SessionSummary) -> Vec<String> {
        self.total_quizzes += 1;
        self.total_correct += summary.correct;
        self.total_incorrect += summary.incorrect;
        self.total_time_spent_secs += summary.elapsed_secs;

        for (level, delta) in &summary.level_breakdown {
            let entry = self.level_stats.entry(level.key()).or_default();
            entry.correct += delta.correct;
            entry.incorrect += delta.incorrect;
            entry.accuracy = accuracy_pct(entry.correct, entry.incorrect);
        }

        self.words_learned.extend(summary.learned.iter().copied());

        let today_key = today.format(DATE_FORMAT).to_string();
        let day = self.daily_stats.entry(today_key).or_default();
        day.quizzes += 1;
        day.correct += summary.correct;
        day.incorrect += summary.incorrect;
        day.accuracy = accuracy_pct(day.correct, day.incorrect);

        self.update_streak(today);

        let mut newly_unlocked = Vec::new();
        for id in achievements::evaluate(self) {
            if self.achievements.insert(id.to_string()) {
                newly_unlocked.push(id.to_string());
            }
        }
        newly_unlocked
    }

    /// Calendar-day streak: a second session on the same day changes
    /// nothing, a session the day after the last one extends the streak,
    /// any gap restarts it at 1.
    fn update_streak(&mut self, today: NaiveDate) {
        let today_key = today.format(DATE_FORMAT).to_string();
        if self.last_study_date.as_deref() == Some(today_key.as_str()) {
            return;
        }

        let yesterday = (today - chrono::Duration::days(1))
            .format(DATE_FORMAT)
            .to_string();
        if self.last_study_date.as_deref() == Some(yesterday.as_str()) {
            self.study_streak += 1;
        } else {
            self.study_streak = 1;
        }
        self.best_streak = self.best_streak.max(self.study_streak);
        self.last_study_date = Some(today_key);
    }
}
