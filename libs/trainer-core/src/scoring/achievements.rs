//! Achievement catalog.
//!
//! Each achievement is a one-time unlock guarded by a predicate over the
//! cumulative [`UserStats`]. Once unlocked an id is never emitted again and
//! never revoked.

use std::collections::BTreeSet;

use serde::Serialize;

use crate::types::UserStats;

/// Condition that unlocks an achievement.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AchievementRule {
    QuestionsAnswered { at_least: u32 },
    CorrectAnswers { at_least: u32 },
    FastAnswers { at_least: u32 },
    LongestStreak { at_least: u32 },
    DailyGoals { at_least: u32 },
    StudyDaysStreak { at_least: u32 },
    PerfectSessions { at_least: u32 },
    /// Accuracy in percent on a single topic.
    TopicAccuracy { topic: &'static str, min_percent: f64 },
}

impl AchievementRule {
    pub fn is_met(&self, stats: &UserStats) -> bool {
        match *self {
            Self::QuestionsAnswered { at_least } => stats.total_questions_answered >= at_least,
            Self::CorrectAnswers { at_least } => stats.correct_answers >= at_least,
            Self::FastAnswers { at_least } => stats.fast_answers >= at_least,
            Self::LongestStreak { at_least } => stats.longest_streak >= at_least,
            Self::DailyGoals { at_least } => stats.daily_goals_achieved >= at_least,
            Self::StudyDaysStreak { at_least } => stats.study_days_streak >= at_least,
            Self::PerfectSessions { at_least } => stats.perfect_sessions >= at_least,
            Self::TopicAccuracy { topic, min_percent } => {
                stats.topic_accuracy(topic) >= min_percent
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Achievement {
    pub id: &'static str,
    pub xp_reward: u32,
    pub rule: AchievementRule,
}

pub const TOPIC_LAW: &str = "Recht";
pub const TOPIC_BUSINESS: &str = "Kaufmännische & finanzielle Führung";

pub const CATALOG: &[Achievement] = &[
    Achievement {
        id: "first_question",
        xp_reward: 50,
        rule: AchievementRule::QuestionsAnswered { at_least: 1 },
    },
    Achievement {
        id: "first_correct",
        xp_reward: 100,
        rule: AchievementRule::CorrectAnswers { at_least: 1 },
    },
    Achievement {
        id: "speed_demon",
        xp_reward: 200,
        rule: AchievementRule::FastAnswers { at_least: 10 },
    },
    Achievement {
        id: "streak_5",
        xp_reward: 150,
        rule: AchievementRule::LongestStreak { at_least: 5 },
    },
    Achievement {
        id: "streak_20",
        xp_reward: 500,
        rule: AchievementRule::LongestStreak { at_least: 20 },
    },
    Achievement {
        id: "daily_goal",
        xp_reward: 100,
        rule: AchievementRule::DailyGoals { at_least: 1 },
    },
    Achievement {
        id: "week_warrior",
        xp_reward: 300,
        rule: AchievementRule::StudyDaysStreak { at_least: 7 },
    },
    Achievement {
        id: "perfectionist",
        xp_reward: 400,
        rule: AchievementRule::PerfectSessions { at_least: 1 },
    },
    Achievement {
        id: "topic_master_law",
        xp_reward: 250,
        rule: AchievementRule::TopicAccuracy { topic: TOPIC_LAW, min_percent: 90.0 },
    },
    Achievement {
        id: "topic_master_business",
        xp_reward: 250,
        rule: AchievementRule::TopicAccuracy { topic: TOPIC_BUSINESS, min_percent: 90.0 },
    },
    Achievement {
        id: "century_club",
        xp_reward: 300,
        rule: AchievementRule::QuestionsAnswered { at_least: 100 },
    },
    Achievement {
        id: "knowledge_seeker",
        xp_reward: 800,
        rule: AchievementRule::QuestionsAnswered { at_least: 500 },
    },
];

/// Look up a catalog entry by id.
pub fn find(id: &str) -> Option<&'static Achievement> {
    CATALOG.iter().find(|achievement| achievement.id == id)
}

/// Achievements whose rule now holds and that are not yet unlocked, in
/// catalog order.
pub fn check_achievements(
    stats: &UserStats,
    already_unlocked: &BTreeSet<String>,
) -> Vec<&'static Achievement> {
    CATALOG
        .iter()
        .filter(|achievement| !already_unlocked.contains(achievement.id))
        .filter(|achievement| achievement.rule.is_met(stats))
        .collect()
}
