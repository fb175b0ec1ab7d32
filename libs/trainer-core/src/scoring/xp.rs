//! Experience points for a single answer.

use serde::{Deserialize, Serialize};

/// Award for a correct answer before bonuses.
pub const CORRECT_XP: u32 = 10;
/// Award for an incorrect answer.
pub const PARTICIPATION_XP: u32 = 2;

/// Answers faster than this earn the speed bonus.
pub const FAST_ANSWER_SECS: i64 = 10;

// Multipliers in percent; integer math keeps floor(10 * 0.2) == 2.
const SPEED_MULTIPLIER_PCT: u32 = 120;
const DIFFICULTY_MULTIPLIER_PCT: u32 = 200;
const FIRST_TRY_MULTIPLIER_PCT: u32 = 150;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BonusKind {
    Correct,
    Speed,
    Difficulty,
    FirstTry,
    Participation,
}

/// One itemized line of an XP award.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpBonus {
    pub kind: BonusKind,
    pub amount: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct XpAward {
    pub total_xp: u32,
    /// Every component of `total_xp`, base award included.
    pub bonuses: Vec<XpBonus>,
}

impl XpAward {
    pub fn amount_for(&self, kind: BonusKind) -> Option<u32> {
        self.bonuses
            .iter()
            .find(|bonus| bonus.kind == kind)
            .map(|bonus| bonus.amount)
    }
}

/// floor(base * (multiplier - 1))
fn bonus_on(base: u32, multiplier_pct: u32) -> u32 {
    base * (multiplier_pct - 100) / 100
}

/// Score one answer.
///
/// Bonuses are computed from the base award independently and added up.
/// Negative `time_spent_secs` counts as zero.
pub fn score_answer(
    is_correct: bool,
    time_spent_secs: i64,
    is_first_try: bool,
    is_from_difficult_box: bool,
) -> XpAward {
    if !is_correct {
        return XpAward {
            total_xp: PARTICIPATION_XP,
            bonuses: vec![XpBonus {
                kind: BonusKind::Participation,
                amount: PARTICIPATION_XP,
            }],
        };
    }

    let time_spent_secs = time_spent_secs.max(0);
    let mut bonuses = vec![XpBonus {
        kind: BonusKind::Correct,
        amount: CORRECT_XP,
    }];

    if time_spent_secs < FAST_ANSWER_SECS {
        bonuses.push(XpBonus {
            kind: BonusKind::Speed,
            amount: bonus_on(CORRECT_XP, SPEED_MULTIPLIER_PCT),
        });
    }
    if is_from_difficult_box {
        bonuses.push(XpBonus {
            kind: BonusKind::Difficulty,
            amount: bonus_on(CORRECT_XP, DIFFICULTY_MULTIPLIER_PCT),
        });
    }
    if is_first_try {
        bonuses.push(XpBonus {
            kind: BonusKind::FirstTry,
            amount: bonus_on(CORRECT_XP, FIRST_TRY_MULTIPLIER_PCT),
        });
    }

    XpAward {
        total_xp: bonuses.iter().map(|bonus| bonus.amount).sum(),
        bonuses,
    }
}
