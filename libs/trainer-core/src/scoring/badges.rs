//! Time-of-day badges.
//!
//! Badges are repeatable, at most once per calendar day each. They are
//! evaluated against the user's local time, which the caller supplies.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike, Weekday};
use serde::{Deserialize, Serialize};

/// Studying before this hour earns the early bird badge.
const EARLY_BIRD_BEFORE_HOUR: u32 = 8;
/// Studying from this hour on earns the night owl badge.
const NIGHT_OWL_FROM_HOUR: u32 = 22;
/// Days away after which returning counts as a comeback.
const COMEBACK_AFTER_DAYS: i64 = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Badge {
    EarlyBird,
    NightOwl,
    WeekendWarrior,
    ComebackKing,
}

impl Badge {
    pub fn id(self) -> &'static str {
        match self {
            Self::EarlyBird => "early_bird",
            Self::NightOwl => "night_owl",
            Self::WeekendWarrior => "weekend_warrior",
            Self::ComebackKing => "comeback_king",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct EarnedBadge {
    pub badge: Badge,
    pub earned_at: NaiveDateTime,
}

fn earned_on(earned: &[EarnedBadge], badge: Badge, day: NaiveDate) -> bool {
    earned
        .iter()
        .any(|e| e.badge == badge && e.earned_at.date() == day)
}

/// Badges earned by studying at `local_now`.
///
/// `study_day` is the study day `local_now` counts toward and
/// `last_study_date` the previous one, if any. Both are shifted by the same
/// daily reset hour, so the comeback gap is measured in study days.
pub fn check_badges(
    earned: &[EarnedBadge],
    local_now: NaiveDateTime,
    study_day: NaiveDate,
    last_study_date: Option<NaiveDate>,
) -> Vec<EarnedBadge> {
    let today = local_now.date();
    let hour = local_now.hour();

    let mut candidates = Vec::new();
    if hour < EARLY_BIRD_BEFORE_HOUR {
        candidates.push(Badge::EarlyBird);
    }
    if hour >= NIGHT_OWL_FROM_HOUR {
        candidates.push(Badge::NightOwl);
    }
    if matches!(today.weekday(), Weekday::Sat | Weekday::Sun) {
        candidates.push(Badge::WeekendWarrior);
    }
    let away = last_study_date.map(|last| study_day - last);
    if away.is_some_and(|gap| gap >= Duration::days(COMEBACK_AFTER_DAYS)) {
        candidates.push(Badge::ComebackKing);
    }

    candidates
        .into_iter()
        .filter(|badge| !earned_on(earned, *badge, today))
        .map(|badge| EarnedBadge {
            badge,
            earned_at: local_now,
        })
        .collect()
}
