//! Core types for the exam trainer.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::scheduler::LeitnerBox;
use crate::scoring::level::calculate_level;

/// Stable identifier of a question in the external question repository.
///
/// Never empty: construction and deserialization reject blank ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionId(String);

impl QuestionId {
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(CoreError::invalid("question id must not be empty"));
        }
        Ok(Self(id))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for QuestionId {
    type Error = CoreError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<&str> for QuestionId {
    type Error = CoreError;

    fn try_from(value: &str) -> Result<Self> {
        Self::new(value)
    }
}

impl From<QuestionId> for String {
    fn from(id: QuestionId) -> Self {
        id.0
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-user, per-question attempt history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressRecord {
    pub question_id: QuestionId,
    /// Raw Leitner box as stored. Read through [`ProgressRecord::current_box`],
    /// which clamps corrupted values into 1..=6.
    #[serde(rename = "box", default = "default_box")]
    pub leitner_box: i32,
    #[serde(default)]
    pub attempts: u32,
    #[serde(default)]
    pub correct_attempts: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_review_date: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_attempt_date: Option<DateTime<Utc>>,
    /// Cumulative seconds spent answering.
    #[serde(default)]
    pub total_time_spent: u64,
}

fn default_box() -> i32 {
    1
}

impl ProgressRecord {
    /// Record for a question that has never been answered.
    pub fn new(question_id: QuestionId) -> Self {
        Self {
            question_id,
            leitner_box: 1,
            attempts: 0,
            correct_attempts: 0,
            last_review_date: None,
            first_attempt_date: None,
            total_time_spent: 0,
        }
    }

    /// Current box, clamped into the valid range.
    pub fn current_box(&self) -> LeitnerBox {
        LeitnerBox::clamped(self.leitner_box)
    }

    /// Whether the stored box was already inside 1..=6.
    pub fn box_in_range(&self) -> bool {
        LeitnerBox::new(self.leitner_box).is_some()
    }

    /// Share of correct attempts, 0.0 when never attempted.
    pub fn accuracy(&self) -> f64 {
        if self.attempts == 0 {
            return 0.0;
        }
        f64::from(self.correct_attempts) / f64::from(self.attempts)
    }

    pub fn is_learned(&self) -> bool {
        self.current_box().number() >= 5 && self.accuracy() >= 0.8
    }

    /// Reject records that violate `correct_attempts <= attempts`.
    pub fn validate(&self) -> Result<()> {
        if self.correct_attempts > self.attempts {
            return Err(CoreError::invalid(format!(
                "question {}: {} correct attempts exceed {} attempts",
                self.question_id, self.correct_attempts, self.attempts
            )));
        }
        Ok(())
    }
}

/// Per-topic answer counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicStats {
    pub answered: u32,
    pub correct: u32,
}

impl TopicStats {
    /// Accuracy in percent (0-100).
    pub fn accuracy(&self) -> f64 {
        if self.answered == 0 {
            return 0.0;
        }
        f64::from(self.correct) / f64::from(self.answered) * 100.0
    }

    pub fn record(&mut self, is_correct: bool) {
        self.answered += 1;
        if is_correct {
            self.correct += 1;
        }
    }
}

/// Cumulative per-user statistics.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct UserStats {
    pub total_questions_answered: u32,
    pub correct_answers: u32,
    pub total_xp: u64,
    pub current_streak: u32,
    pub longest_streak: u32,
    /// Derived from `total_xp`; refreshed on every update.
    pub current_level: u32,
    pub achievements: BTreeSet<String>,
    pub topic_stats: BTreeMap<String, TopicStats>,
    /// Correct answers given in under five seconds.
    pub fast_answers: u32,
    pub daily_goals_achieved: u32,
    /// Days where the daily goal was reached without a single miss.
    pub perfect_sessions: u32,
    pub study_days_streak: u32,
    pub answered_today: u32,
    pub correct_today: u32,
    pub last_study_date: Option<NaiveDate>,
}

impl UserStats {
    /// Roll the per-day counters over when `today` starts a new study day.
    pub fn begin_study_day(&mut self, today: NaiveDate) {
        match self.last_study_date {
            Some(last) if last == today => return,
            Some(last) if last + Duration::days(1) == today => self.study_days_streak += 1,
            Some(last) if last > today => return,
            _ => self.study_days_streak = 1,
        }
        self.answered_today = 0;
        self.correct_today = 0;
        self.last_study_date = Some(today);
    }

    /// Overall accuracy in percent.
    pub fn accuracy(&self) -> f64 {
        if self.total_questions_answered == 0 {
            return 0.0;
        }
        f64::from(self.correct_answers) / f64::from(self.total_questions_answered) * 100.0
    }

    pub fn topic_accuracy(&self, topic: &str) -> f64 {
        self.topic_stats
            .get(topic)
            .map(TopicStats::accuracy)
            .unwrap_or(0.0)
    }

    /// Reject counters that contradict each other.
    pub fn validate(&self) -> Result<()> {
        if self.correct_answers > self.total_questions_answered {
            return Err(CoreError::invalid(format!(
                "{} correct answers out of {} answered",
                self.correct_answers, self.total_questions_answered
            )));
        }
        if self.correct_today > self.answered_today {
            return Err(CoreError::invalid(format!(
                "{} correct today out of {} answered today",
                self.correct_today, self.answered_today
            )));
        }
        for (topic, stats) in &self.topic_stats {
            if stats.correct > stats.answered {
                return Err(CoreError::invalid(format!(
                    "topic {topic}: {} correct out of {} answered",
                    stats.correct, stats.answered
                )));
            }
        }
        Ok(())
    }

    /// Recompute the derived fields: the level from `total_xp`, and the
    /// longest streak so it is never below the current one.
    pub fn normalize(&mut self) {
        self.longest_streak = self.longest_streak.max(self.current_streak);
        let total_xp = i64::try_from(self.total_xp).unwrap_or(i64::MAX);
        self.current_level = calculate_level(total_xp).current_level;
    }
}

/// Authored difficulty of a question.
///
/// Carried for display by callers; no calculation reads it. The difficulty
/// XP bonus follows the Leitner box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Default for Difficulty {
    fn default() -> Self {
        Self::Medium
    }
}

/// The parts of a question the core needs: topic and answer key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionMeta {
    pub id: QuestionId,
    pub topic: String,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub correct_answers: Vec<usize>,
}

impl QuestionMeta {
    pub fn new(
        id: QuestionId,
        topic: impl Into<String>,
        correct_answers: Vec<usize>,
    ) -> Result<Self> {
        let topic = topic.into();
        if topic.trim().is_empty() {
            return Err(CoreError::invalid(format!("question {id} has no topic")));
        }
        if correct_answers.is_empty() {
            return Err(CoreError::invalid(format!("question {id} has no correct answer")));
        }
        Ok(Self {
            id,
            topic,
            difficulty: Difficulty::default(),
            correct_answers,
        })
    }

    pub fn with_difficulty(mut self, difficulty: Difficulty) -> Self {
        self.difficulty = difficulty;
        self
    }

    /// Selected option indices must match the answer key exactly, as sets.
    pub fn is_correct(&self, selected: &[usize]) -> bool {
        let expected: BTreeSet<usize> = self.correct_answers.iter().copied().collect();
        let given: BTreeSet<usize> = selected.iter().copied().collect();
        expected == given
    }
}
