//! Spaced repetition scheduling.

pub mod leitner;
pub mod stats;

pub use leitner::{advance, days_between, is_due, record_answer, LeitnerBox};
pub use stats::{
    recommendations, study_stats, Recommendation, RecommendationKind, RecommendationPriority,
    StudyStats,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::{ProgressRecord, QuestionId};

/// Days without review after which a question jumps ahead in the queue.
const OVERDUE_AFTER_DAYS: i64 = 30;
const OVERDUE_BOOST: i64 = -10;

/// A question that is due, with the data used to order the queue.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DueQuestion {
    pub question_id: QuestionId,
    pub leitner_box: LeitnerBox,
    /// Lower comes first.
    pub priority: i64,
    /// `None` for questions that were never reviewed.
    pub days_since_review: Option<i64>,
    pub attempts: u32,
    pub accuracy: f64,
}

/// Queue priority: the box number, boosted for long-neglected questions.
///
/// Never-reviewed questions count as neglected.
pub fn priority(record: &ProgressRecord, now: DateTime<Utc>) -> i64 {
    let overdue = match record.last_review_date {
        None => true,
        Some(last) => days_between(last, now) > OVERDUE_AFTER_DAYS,
    };
    let boost = if overdue { OVERDUE_BOOST } else { 0 };
    i64::from(record.current_box().number()) + boost
}

/// Every due question in ascending priority; ties keep input order.
pub fn review_queue(records: &[ProgressRecord], now: DateTime<Utc>) -> Vec<DueQuestion> {
    let mut queue: Vec<DueQuestion> = records
        .iter()
        .filter(|record| is_due(record, now))
        .map(|record| DueQuestion {
            question_id: record.question_id.clone(),
            leitner_box: record.current_box(),
            priority: priority(record, now),
            days_since_review: record.last_review_date.map(|last| days_between(last, now)),
            attempts: record.attempts,
            accuracy: record.accuracy(),
        })
        .collect();

    // sort_by_key is stable
    queue.sort_by_key(|due| due.priority);
    queue
}

/// Ids of every due question in review order.
pub fn select_due(records: &[ProgressRecord], now: DateTime<Utc>) -> Vec<QuestionId> {
    review_queue(records, now)
        .into_iter()
        .map(|due| due.question_id)
        .collect()
}
