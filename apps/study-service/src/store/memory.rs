//! In-memory store implementations.

use std::collections::{HashMap, HashSet};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use trainer_core::scoring::EarnedBadge;
use trainer_core::{DailyChallenge, ProgressRecord, QuestionId, QuestionMeta, UserStats};

use super::{ProgressStore, QuestionRepository, StoreError, StoreResult};

#[derive(Debug, Default)]
struct UserData {
    records: Vec<ProgressRecord>,
    stats: Option<UserStats>,
    challenge: Option<DailyChallenge>,
    badges: Vec<EarnedBadge>,
}

#[derive(Debug, Default)]
pub struct MemoryStore {
    users: RwLock<HashMap<String, UserData>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn read(&self) -> StoreResult<RwLockReadGuard<'_, HashMap<String, UserData>>> {
        self.users
            .read()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }

    fn write(&self) -> StoreResult<RwLockWriteGuard<'_, HashMap<String, UserData>>> {
        self.users
            .write()
            .map_err(|_| StoreError::Unavailable("memory store lock poisoned".to_string()))
    }
}

impl ProgressStore for MemoryStore {
    fn get_record(
        &self,
        user_id: &str,
        question_id: &QuestionId,
    ) -> StoreResult<Option<ProgressRecord>> {
        let users = self.read()?;
        Ok(users.get(user_id).and_then(|user| {
            user.records
                .iter()
                .find(|r| &r.question_id == question_id)
                .cloned()
        }))
    }

    fn put_record(&self, user_id: &str, record: ProgressRecord) -> StoreResult<()> {
        let mut users = self.write()?;
        let user = users.entry(user_id.to_string()).or_default();
        match user
            .records
            .iter_mut()
            .find(|r| r.question_id == record.question_id)
        {
            Some(existing) => *existing = record,
            None => user.records.push(record),
        }
        Ok(())
    }

    fn list_records(&self, user_id: &str) -> StoreResult<Vec<ProgressRecord>> {
        let users = self.read()?;
        Ok(users
            .get(user_id)
            .map(|user| user.records.clone())
            .unwrap_or_default())
    }

    fn replace_records(&self, user_id: &str, records: Vec<ProgressRecord>) -> StoreResult<()> {
        let mut seen = HashSet::new();
        if let Some(dup) = records.iter().find(|r| !seen.insert(r.question_id.clone())) {
            return Err(StoreError::InvalidData(format!(
                "duplicate record for question {}",
                dup.question_id
            )));
        }

        let mut users = self.write()?;
        users.entry(user_id.to_string()).or_default().records = records;
        Ok(())
    }

    fn get_stats(&self, user_id: &str) -> StoreResult<Option<UserStats>> {
        let users = self.read()?;
        Ok(users.get(user_id).and_then(|user| user.stats.clone()))
    }

    fn put_stats(&self, user_id: &str, stats: UserStats) -> StoreResult<()> {
        let mut users = self.write()?;
        users.entry(user_id.to_string()).or_default().stats = Some(stats);
        Ok(())
    }

    fn get_challenge(&self, user_id: &str) -> StoreResult<Option<DailyChallenge>> {
        let users = self.read()?;
        Ok(users.get(user_id).and_then(|user| user.challenge.clone()))
    }

    fn put_challenge(&self, user_id: &str, challenge: DailyChallenge) -> StoreResult<()> {
        let mut users = self.write()?;
        users.entry(user_id.to_string()).or_default().challenge = Some(challenge);
        Ok(())
    }

    fn list_badges(&self, user_id: &str) -> StoreResult<Vec<EarnedBadge>> {
        let users = self.read()?;
        Ok(users
            .get(user_id)
            .map(|user| user.badges.clone())
            .unwrap_or_default())
    }

    fn add_badges(&self, user_id: &str, badges: &[EarnedBadge]) -> StoreResult<()> {
        let mut users = self.write()?;
        users
            .entry(user_id.to_string())
            .or_default()
            .badges
            .extend_from_slice(badges);
        Ok(())
    }

    fn all_total_xp(&self) -> StoreResult<Vec<u64>> {
        let users = self.read()?;
        Ok(users
            .values()
            .filter_map(|user| user.stats.as_ref().map(|s| s.total_xp))
            .collect())
    }
}

/// A fixed question catalog.
#[derive(Debug, Default)]
pub struct MemoryQuestionBank {
    questions: Vec<QuestionMeta>,
}

impl MemoryQuestionBank {
    /// Fails on duplicate question ids.
    pub fn new(questions: Vec<QuestionMeta>) -> StoreResult<Self> {
        let mut seen = HashSet::new();
        if let Some(dup) = questions.iter().find(|q| !seen.insert(q.id.clone())) {
            return Err(StoreError::InvalidData(format!("duplicate question id {}", dup.id)));
        }
        Ok(Self { questions })
    }

    pub fn len(&self) -> usize {
        self.questions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.questions.is_empty()
    }
}

impl QuestionRepository for MemoryQuestionBank {
    fn get_question(&self, question_id: &QuestionId) -> StoreResult<Option<QuestionMeta>> {
        Ok(self.questions.iter().find(|q| &q.id == question_id).cloned())
    }

    fn list_question_ids(&self) -> StoreResult<Vec<QuestionId>> {
        Ok(self.questions.iter().map(|q| q.id.clone()).collect())
    }
}
