//! XP, streaks, levels, achievements, badges and ranking.

pub mod achievements;
pub mod badges;
pub mod level;
pub mod rank;
pub mod streak;
pub mod xp;

pub use achievements::{check_achievements, Achievement, AchievementRule};
pub use badges::{check_badges, Badge, EarnedBadge};
pub use level::{calculate_level, level_rank, level_rewards, LevelInfo, LevelRank, LevelReward};
pub use rank::{calculate_rank, RankInfo};
pub use streak::{update_streak, StreakUpdate};
pub use xp::{score_answer, BonusKind, XpAward, XpBonus};
