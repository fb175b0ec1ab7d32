//! Level table.
//!
//! Level `i` (1-100) requires `floor(100 * i^1.5)` total XP. Below level 1
//! the user is at level 0.

use serde::{Deserialize, Serialize};

pub const MAX_LEVEL: u32 = 100;

/// XP required to reach `level`.
///
/// Computed as `isqrt(10_000 * level^3)`, which equals
/// `floor(100 * level^1.5)` without float rounding.
pub fn xp_threshold(level: u32) -> u64 {
    let level = u64::from(level.min(MAX_LEVEL));
    isqrt(10_000 * level * level * level)
}

fn isqrt(value: u64) -> u64 {
    let mut root = (value as f64).sqrt() as u64;
    while root * root > value {
        root -= 1;
    }
    while (root + 1) * (root + 1) <= value {
        root += 1;
    }
    root
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelInfo {
    pub current_level: u32,
    /// Threshold of the current level (0 at level 0).
    pub current_level_xp: u64,
    /// Threshold of the next level; equals `current_level_xp` at the cap.
    pub next_level_xp: u64,
    /// XP earned since reaching the current level.
    pub progress_to_next: u64,
    pub xp_needed: u64,
}

/// Level for a total XP amount. Negative XP counts as zero.
pub fn calculate_level(total_xp: i64) -> LevelInfo {
    let total_xp = u64::try_from(total_xp).unwrap_or(0);

    for level in 1..=MAX_LEVEL {
        let next_level_xp = xp_threshold(level);
        if total_xp < next_level_xp {
            let current_level_xp = if level > 1 { xp_threshold(level - 1) } else { 0 };
            return LevelInfo {
                current_level: level - 1,
                current_level_xp,
                next_level_xp,
                progress_to_next: total_xp - current_level_xp,
                xp_needed: next_level_xp - total_xp,
            };
        }
    }

    let cap = xp_threshold(MAX_LEVEL);
    LevelInfo {
        current_level: MAX_LEVEL,
        current_level_xp: cap,
        next_level_xp: cap,
        progress_to_next: 0,
        xp_needed: 0,
    }
}

/// Rank name shown next to the level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelRank {
    Beginner,
    Learner,
    Advanced,
    Professional,
    Expert,
    Master,
}

pub fn level_rank(level: u32) -> LevelRank {
    match level {
        80.. => LevelRank::Master,
        60..=79 => LevelRank::Expert,
        40..=59 => LevelRank::Professional,
        20..=39 => LevelRank::Advanced,
        10..=19 => LevelRank::Learner,
        _ => LevelRank::Beginner,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LevelReward {
    SpecialBadge,
    XpBonus,
    NewStudyMode,
}

/// Rewards unlocked on reaching `level`.
pub fn level_rewards(level: u32) -> Vec<LevelReward> {
    let mut rewards = Vec::new();
    if level == 0 {
        return rewards;
    }
    if level % 10 == 0 {
        rewards.push(LevelReward::SpecialBadge);
    }
    if level % 5 == 0 {
        rewards.push(LevelReward::XpBonus);
    }
    if matches!(level, 25 | 50 | 75) {
        rewards.push(LevelReward::NewStudyMode);
    }
    rewards
}
