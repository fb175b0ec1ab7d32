//! Daily challenges.
//!
//! One challenge per user per calendar day, picked from a fixed catalog by
//! `(day_of_year + level) mod catalog_size`. The pick depends only on the
//! date and the user's level, never on earlier history.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::scoring::level::calculate_level;
use crate::types::UserStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChallengeKind {
    Streak,
    Topic,
    Speed,
    Accuracy,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeReward {
    pub xp: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub badge: Option<String>,
}

struct ChallengeTemplate {
    id: &'static str,
    kind: ChallengeKind,
    target: u32,
    reward_xp: u32,
    reward_badge: Option<&'static str>,
}

const TEMPLATES: [ChallengeTemplate; 4] = [
    ChallengeTemplate {
        id: "answer_streak",
        kind: ChallengeKind::Streak,
        target: 5,
        reward_xp: 100,
        reward_badge: None,
    },
    ChallengeTemplate {
        id: "topic_focus",
        kind: ChallengeKind::Topic,
        target: 10,
        reward_xp: 150,
        reward_badge: None,
    },
    ChallengeTemplate {
        id: "speed_challenge",
        kind: ChallengeKind::Speed,
        target: 20,
        reward_xp: 200,
        reward_badge: Some("speed_demon"),
    },
    ChallengeTemplate {
        id: "accuracy_test",
        kind: ChallengeKind::Accuracy,
        target: 15,
        reward_xp: 180,
        reward_badge: None,
    },
];

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyChallenge {
    pub id: String,
    pub kind: ChallengeKind,
    pub target: u32,
    pub progress: u32,
    pub completed: bool,
    pub reward: ChallengeReward,
    pub date: NaiveDate,
}

impl DailyChallenge {
    /// Whether this challenge governs `date`.
    pub fn is_for(&self, date: NaiveDate) -> bool {
        self.date == date
    }

    /// Count one answer toward the challenge.
    ///
    /// `current_streak` is the streak after this answer. Progress never
    /// decreases and never passes the target. Returns `true` only on the
    /// answer that completes the challenge.
    pub fn record_answer(&mut self, is_correct: bool, current_streak: u32) -> bool {
        let candidate = match self.kind {
            ChallengeKind::Streak if is_correct => current_streak,
            ChallengeKind::Accuracy if is_correct => self.progress.saturating_add(1),
            ChallengeKind::Streak | ChallengeKind::Accuracy => self.progress,
            ChallengeKind::Topic | ChallengeKind::Speed => self.progress.saturating_add(1),
        };
        self.progress = self.progress.max(candidate.min(self.target));

        if !self.completed && self.progress >= self.target {
            self.completed = true;
            return true;
        }
        false
    }
}

/// Today's challenge for a user. Starts with no progress.
pub fn generate_daily_challenge(stats: &UserStats, date: NaiveDate) -> DailyChallenge {
    let xp = i64::try_from(stats.total_xp).unwrap_or(i64::MAX);
    let level = calculate_level(xp).current_level as usize;
    let index = (date.ordinal() as usize + level) % TEMPLATES.len();
    let template = &TEMPLATES[index];

    DailyChallenge {
        id: template.id.to_string(),
        kind: template.kind,
        target: template.target,
        progress: 0,
        completed: false,
        reward: ChallengeReward {
            xp: template.reward_xp,
            badge: template.reward_badge.map(str::to_string),
        },
        date,
    }
}
