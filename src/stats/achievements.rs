use crate::stats::profile::StatsProfile;

const INTERMEDIATE_WORDS: usize = 25;
const MASTER_WORDS: usize = 60;
const DEDICATED_STREAK: u32 = 7;
const SPEED_DEMON_DAILY_QUIZZES: u32 = 10;

/// One unlock rule: a badge id plus a predicate over the profile.
pub struct AchievementRule {
    pub id: &'static str,
    pub name: &'static str,
    pub check: fn(&StatsProfile) -> bool,
}

pub const RULES: &[AchievementRule] = &[
    AchievementRule {
        id: "beginner",
        name: "Beginner",
        check: first_session,
    },
    AchievementRule {
        id: "intermediate",
        name: "Intermediate",
        check: intermediate_words,
    },
    AchievementRule {
        id: "master",
        name: "Master",
        check: full_catalog,
    },
    AchievementRule {
        id: "dedicated",
        name: "Dedicated Learner",
        check: week_streak,
    },
    AchievementRule {
        id: "speed_demon",
        name: "Speed Demon",
        check: busy_day,
    },
];

fn first_session(profile: &StatsProfile) -> bool {
    profile.total_quizzes >= 1
}

fn intermediate_words(profile: &StatsProfile) -> bool {
    profile.words_learned.len() >= INTERMEDIATE_WORDS
}

fn full_catalog(profile: &StatsProfile) -> bool {
    profile.words_learned.len() >= MASTER_WORDS
}

fn week_streak(profile: &StatsProfile) -> bool {
    profile.study_streak >= DEDICATED_STREAK
}

fn busy_day(profile: &StatsProfile) -> bool {
    profile
        .daily_stats
        .values()
        .any(|day| day.quizzes >= SPEED_DEMON_DAILY_QUIZZES)
}

/// Rule ids that are satisfied but not yet held. The caller inserts them
/// into the profile, so each badge unlocks at most once.
pub fn evaluate(profile: &StatsProfile) -> Vec<&'static str> {
    RULES
        .iter()
        .filter(|rule| !profile.achievements.contains(rule.id) && (rule.check)(profile))
        .map(|rule| rule.id)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Level, WordId};
    use crate::stats::profile::DailyStats;

    fn learned(profile: &mut StatsProfile, count: usize) {
        let level = Level::new(1).unwrap();
        for i in 0..count {
            profile.words_learned.insert(WordId {
                level,
                id: i as u32 + 1,
            });
        }
    }

    #[test]
    fn test_fresh_profile_unlocks_nothing() {
        let profile = StatsProfile::default();
        assert!(evaluate(&profile).is_empty());
    }

    #[test]
    fn test_first_session_unlocks_beginner() {
        let mut profile = StatsProfile::default();
        profile.total_quizzes = 1;
        assert_eq!(evaluate(&profile), vec!["beginner"]);
    }

    #[test]
    fn test_word_thresholds() {
        let mut profile = StatsProfile::default();
        learned(&mut profile, INTERMEDIATE_WORDS - 1);
        assert!(!evaluate(&profile).contains(&"intermediate"));
        learned(&mut profile, INTERMEDIATE_WORDS);
        assert!(evaluate(&profile).contains(&"intermediate"));
        assert!(!evaluate(&profile).contains(&"master"));
        learned(&mut profile, MASTER_WORDS);
        assert!(evaluate(&profile).contains(&"master"));
    }

    #[test]
    fn test_week_streak_unlocks_dedicated() {
        let mut profile = StatsProfile::default();
        profile.study_streak = DEDICATED_STREAK;
        assert!(evaluate(&profile).contains(&"dedicated"));
    }

    #[test]
    fn test_busy_day_unlocks_speed_demon() {
        let mut profile = StatsProfile::default();
        profile.daily_stats.insert(
            "2026-08-06".to_string(),
            DailyStats {
                quizzes: SPEED_DEMON_DAILY_QUIZZES,
                ..DailyStats::default()
            },
        );
        assert!(evaluate(&profile).contains(&"speed_demon"));
    }

    #[test]
    fn test_held_badges_are_not_reported_again() {
        let mut profile = StatsProfile::default();
        profile.total_quizzes = 5;
        profile.achievements.insert("beginner".to_string());
        assert!(!evaluate(&profile).contains(&"beginner"));
    }
}
