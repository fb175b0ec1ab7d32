//! Consecutive-correct streaks and milestone bonuses.

use serde::{Deserialize, Serialize};

/// XP per streak step at a milestone.
pub const XP_PER_STREAK: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdate {
    pub new_streak: u32,
    pub streak_bonus: u32,
}

/// Advance or reset a streak.
///
/// Every 10th answer in a row pays `streak * 5`; other multiples of 5 pay
/// `streak / 5 * 5`.
pub fn update_streak(current_streak: u32, is_correct: bool) -> StreakUpdate {
    if !is_correct {
        return StreakUpdate {
            new_streak: 0,
            streak_bonus: 0,
        };
    }

    let new_streak = current_streak.saturating_add(1);
    let streak_bonus = if new_streak % 10 == 0 {
        new_streak.saturating_mul(XP_PER_STREAK)
    } else if new_streak % 5 == 0 {
        (new_streak / 5).saturating_mul(XP_PER_STREAK)
    } else {
        0
    };

    StreakUpdate {
        new_streak,
        streak_bonus,
    }
}
