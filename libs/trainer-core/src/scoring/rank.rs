//! Position of a user among all users by total XP.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RankInfo {
    /// 1-based; users with equal XP share the best rank.
    pub rank: usize,
    pub total_users: usize,
    /// Share of users at or below this rank, in percent, one decimal.
    pub percentile: f64,
    pub is_top_ten: bool,
    pub is_top_percent: bool,
}

/// Rank `user_xp` within `all_xps`. `None` if the value is not present.
pub fn calculate_rank(user_xp: u64, all_xps: &[u64]) -> Option<RankInfo> {
    let mut sorted = all_xps.to_vec();
    sorted.sort_unstable_by(|a, b| b.cmp(a));

    let position = sorted.iter().position(|xp| *xp == user_xp)?;
    let rank = position + 1;
    let total_users = sorted.len();
    let raw = (total_users - rank + 1) as f64 / total_users as f64 * 100.0;
    let percentile = (raw * 10.0).round() / 10.0;

    Some(RankInfo {
        rank,
        total_users,
        percentile,
        is_top_ten: rank <= 10,
        is_top_percent: percentile >= 90.0,
    })
}
