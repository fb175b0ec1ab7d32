//! Storage traits for per-user progress and the question bank.

pub mod memory;

use thiserror::Error;
use trainer_core::scoring::EarnedBadge;
use trainer_core::{DailyChallenge, ProgressRecord, QuestionId, QuestionMeta, UserStats};

pub use memory::{MemoryQuestionBank, MemoryStore};

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),

    #[error("invalid data: {0}")]
    InvalidData(String),
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Per-user learning state.
///
/// Records are listed in the order they were first stored. An answer is
/// persisted as separate writes in the order stats, record, challenge,
/// badges; a store that needs them all-or-nothing must batch them itself.
pub trait ProgressStore: Send + Sync {
    fn get_record(
        &self,
        user_id: &str,
        question_id: &QuestionId,
    ) -> StoreResult<Option<ProgressRecord>>;
    fn put_record(&self, user_id: &str, record: ProgressRecord) -> StoreResult<()>;
    fn list_records(&self, user_id: &str) -> StoreResult<Vec<ProgressRecord>>;
    /// Drop every record of the user and store `records` instead.
    fn replace_records(&self, user_id: &str, records: Vec<ProgressRecord>) -> StoreResult<()>;

    fn get_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>>;
    fn put_stats(&self, user_id: &str, stats: UserStats) -> StoreResult<()>;

    fn get_challenge(&self, user_id: &str) -> StoreResult<Option<DailyChallenge>>;
    fn put_challenge(&self, user_id: &str, challenge: DailyChallenge) -> StoreResult<()>;

    fn list_badges(&self, user_id: &str) -> StoreResult<Vec<EarnedBadge>>;
    fn add_badges(&self, user_id: &str, badges: &[EarnedBadge]) -> StoreResult<()>;

    /// Total XP of every user with stored stats.
    fn all_total_xp(&self) -> StoreResult<Vec<u64>>;
}

/// Read access to question metadata.
pub trait QuestionRepository: Send + Sync {
    fn get_question(&self, question_id: &QuestionId) -> StoreResult<Option<QuestionMeta>>;
    /// All question ids in catalog order.
    fn list_question_ids(&self) -> StoreResult<Vec<QuestionId>>;
}
