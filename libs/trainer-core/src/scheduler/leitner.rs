//! Leitner box system.
//!
//! Six boxes with fixed review intervals. A correct answer promotes the
//! question by one box (up to box 6); any miss sends it back to box 1.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::types::ProgressRecord;

const SECONDS_PER_DAY: i64 = 86_400;

/// A valid Leitner box number in 1..=6.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct LeitnerBox(u8);

impl LeitnerBox {
    pub const FIRST: Self = Self(1);
    pub const LAST: Self = Self(6);

    /// Box for a raw number, `None` when outside 1..=6.
    pub fn new(number: i32) -> Option<Self> {
        (1..=6).contains(&number).then(|| Self(number as u8))
    }

    /// Box for a raw number, clamped into 1..=6.
    pub fn clamped(number: i32) -> Self {
        Self(number.clamp(1, 6) as u8)
    }

    pub fn number(self) -> u8 {
        self.0
    }

    /// Days that must pass before a question in this box is due again.
    pub fn interval_days(self) -> i64 {
        match self.0 {
            1 => 1,
            2 => 3,
            3 => 7,
            4 => 14,
            5 => 30,
            _ => 90,
        }
    }

    /// Boxes 1 and 2 hold the questions the user struggles with.
    pub fn is_difficult(self) -> bool {
        self.0 <= 2
    }

    fn promoted(self) -> Self {
        Self((self.0 + 1).min(Self::LAST.0))
    }
}

impl TryFrom<i32> for LeitnerBox {
    type Error = String;

    fn try_from(value: i32) -> Result<Self, Self::Error> {
        Self::new(value).ok_or_else(|| format!("box {value} outside 1..=6"))
    }
}

impl From<LeitnerBox> for i32 {
    fn from(value: LeitnerBox) -> Self {
        i32::from(value.0)
    }
}

/// Whole days elapsed between `last` and `now`, floored.
///
/// Negative when `last` lies in the future.
pub fn days_between(last: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    (now - last).num_seconds().div_euclid(SECONDS_PER_DAY)
}

/// Whether the question is due for review at `now`.
///
/// Never-reviewed questions are always due.
pub fn is_due(record: &ProgressRecord, now: DateTime<Utc>) -> bool {
    match record.last_review_date {
        None => true,
        Some(last) => days_between(last, now) >= record.current_box().interval_days(),
    }
}

/// Box after answering: one up on a correct answer, back to box 1 on a miss.
pub fn advance(record: &ProgressRecord, is_correct: bool) -> LeitnerBox {
    if is_correct {
        record.current_box().promoted()
    } else {
        LeitnerBox::FIRST
    }
}

/// Apply one answer event to a record.
///
/// Negative `time_spent_secs` counts as zero.
pub fn record_answer(
    record: &ProgressRecord,
    is_correct: bool,
    timestamp: DateTime<Utc>,
    time_spent_secs: i64,
) -> ProgressRecord {
    let time_spent = u64::try_from(time_spent_secs).unwrap_or(0);

    ProgressRecord {
        question_id: record.question_id.clone(),
        leitner_box: i32::from(advance(record, is_correct)),
        attempts: record.attempts.saturating_add(1),
        correct_attempts: record
            .correct_attempts
            .saturating_add(u32::from(is_correct)),
        last_review_date: Some(timestamp),
        first_attempt_date: record.first_attempt_date.or(Some(timestamp)),
        total_time_spent: record.total_time_spent.saturating_add(time_spent),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionId;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn record_in_box(number: i32) -> ProgressRecord {
        let mut record = ProgressRecord::new(QuestionId::new("q1").unwrap());
        record.leitner_box = number;
        record
    }

    #[test]
    fn interval_table() {
        let intervals: Vec<i64> = (1..=6)
            .map(|n| LeitnerBox::new(n).unwrap().interval_days())
            .collect();
        assert_eq!(intervals, vec![1, 3, 7, 14, 30, 90]);
    }

    #[test]
    fn never_reviewed_is_always_due() {
        for number in 1..=6 {
            assert!(is_due(&record_in_box(number), now()));
        }
    }

    #[test]
    fn box_three_due_after_seven_days() {
        let mut record = record_in_box(3);

        record.last_review_date = Some(now() - Duration::days(6));
        assert!(!is_due(&record, now()));

        record.last_review_date = Some(now() - Duration::days(7));
        assert!(is_due(&record, now()));
    }

    #[test]
    fn partial_days_are_floored() {
        let mut record = record_in_box(1);
        record.last_review_date = Some(now() - Duration::hours(23) - Duration::minutes(59));
        assert!(!is_due(&record, now()));

        record.last_review_date = Some(now() - Duration::hours(24));
        assert!(is_due(&record, now()));
    }

    #[test]
    fn review_in_the_future_is_not_due() {
        let mut record = record_in_box(1);
        record.last_review_date = Some(now() + Duration::hours(1));
        assert_eq!(days_between(now() + Duration::hours(1), now()), -1);
        assert!(!is_due(&record, now()));
    }

    #[test]
    fn correct_answer_promotes_by_one() {
        for number in 1..=5 {
            let record = record_in_box(number);
            assert_eq!(advance(&record, true).number() as i32, number + 1);
        }
    }

    #[test]
    fn promotion_caps_at_box_six() {
        assert_eq!(advance(&record_in_box(6), true), LeitnerBox::LAST);
    }

    #[test]
    fn miss_resets_to_box_one() {
        for number in 1..=6 {
            assert_eq!(advance(&record_in_box(number), false), LeitnerBox::FIRST);
        }
    }

    #[test]
    fn corrupted_box_is_clamped_before_advancing() {
        assert_eq!(advance(&record_in_box(0), true).number(), 2);
        assert_eq!(advance(&record_in_box(99), true).number(), 6);
    }

    #[test]
    fn record_answer_updates_counters() {
        let first = now() - Duration::days(3);
        let record = record_answer(&record_in_box(2), true, first, 12);

        assert_eq!(record.leitner_box, 3);
        assert_eq!(record.attempts, 1);
        assert_eq!(record.correct_attempts, 1);
        assert_eq!(record.first_attempt_date, Some(first));
        assert_eq!(record.last_review_date, Some(first));
        assert_eq!(record.total_time_spent, 12);

        let record = record_answer(&record, false, now(), 20);
        assert_eq!(record.leitner_box, 1);
        assert_eq!(record.attempts, 2);
        assert_eq!(record.correct_attempts, 1);
        assert_eq!(record.first_attempt_date, Some(first));
        assert_eq!(record.last_review_date, Some(now()));
        assert_eq!(record.total_time_spent, 32);
    }

    #[test]
    fn negative_time_counts_as_zero() {
        let record = record_answer(&record_in_box(1), true, now(), -30);
        assert_eq!(record.total_time_spent, 0);
    }
}
