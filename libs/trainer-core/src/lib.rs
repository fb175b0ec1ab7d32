//! Core study engine for exam preparation.
//!
//! Provides:
//! - Leitner spaced repetition scheduling (due checks, box transitions, review queue)
//! - XP scoring with itemized bonuses, streaks and the level table
//! - Achievement, badge and rank evaluation
//! - Deterministic daily challenges
//! - Answer event processing that ties the above together
//!
//! Everything here is a pure function of its inputs. The current time is
//! always passed in by the caller.

pub mod answer;
pub mod challenge;
pub mod error;
pub mod scheduler;
pub mod scoring;
pub mod types;

pub use answer::{process_answer, AnswerEvent, AnswerOutcome, StudyContext};
pub use challenge::{generate_daily_challenge, ChallengeKind, ChallengeReward, DailyChallenge};
pub use error::{CoreError, Result};
pub use scheduler::{
    advance, is_due, record_answer, review_queue, select_due, DueQuestion, LeitnerBox,
};
pub use scoring::{
    calculate_level, check_achievements, score_answer, update_streak, LevelInfo, StreakUpdate,
    XpAward,
};
pub use types::{Difficulty, ProgressRecord, QuestionId, QuestionMeta, TopicStats, UserStats};
