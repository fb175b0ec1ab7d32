//! Study statistics and review recommendations over a user's progress.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::leitner::is_due;
use crate::types::ProgressRecord;

/// Aggregate view over all progress records of one user.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StudyStats {
    pub total_questions: usize,
    /// Box 5 or 6.
    pub learned_questions: usize,
    /// Box 3 or 4.
    pub reviewing_questions: usize,
    /// Box 1 or 2.
    pub difficult_questions: usize,
    /// Count per box, index 0 is box 1.
    pub box_distribution: [usize; 6],
    /// Mean per-question accuracy in percent, over attempted questions only.
    pub average_accuracy: f64,
    pub due_today: usize,
}

/// Compute study statistics at `now`.
pub fn study_stats(records: &[ProgressRecord], now: DateTime<Utc>) -> StudyStats {
    let mut stats = StudyStats::default();
    let mut accuracy_sum = 0.0;
    let mut attempted = 0usize;

    for record in records {
        let number = record.current_box().number();

        stats.total_questions += 1;
        stats.box_distribution[usize::from(number) - 1] += 1;

        match number {
            5..=6 => stats.learned_questions += 1,
            3..=4 => stats.reviewing_questions += 1,
            _ => stats.difficult_questions += 1,
        }

        if record.attempts > 0 {
            accuracy_sum += record.accuracy() * 100.0;
            attempted += 1;
        }

        if is_due(record, now) {
            stats.due_today += 1;
        }
    }

    if attempted > 0 {
        stats.average_accuracy = accuracy_sum / attempted as f64;
    }

    stats
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationKind {
    /// Work through the review backlog.
    Review,
    /// Concentrate on difficult questions.
    Focus,
    /// Start on unseen topics.
    Explore,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecommendationPriority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Recommendation {
    pub kind: RecommendationKind,
    pub priority: RecommendationPriority,
    pub count: usize,
}

/// Questions a user should have seen before exploring stops being suggested.
const EXPLORE_BELOW: usize = 100;

/// Suggest what to study next, highest priority first.
pub fn recommendations(stats: &StudyStats, daily_goal: u32) -> Vec<Recommendation> {
    let mut result = Vec::new();

    if stats.due_today >= daily_goal as usize {
        result.push(Recommendation {
            kind: RecommendationKind::Review,
            priority: RecommendationPriority::High,
            count: stats.due_today,
        });
    }

    if stats.difficult_questions > stats.learned_questions {
        result.push(Recommendation {
            kind: RecommendationKind::Focus,
            priority: RecommendationPriority::Medium,
            count: stats.difficult_questions,
        });
    }

    if stats.total_questions < EXPLORE_BELOW {
        result.push(Recommendation {
            kind: RecommendationKind::Explore,
            priority: RecommendationPriority::Low,
            count: EXPLORE_BELOW - stats.total_questions,
        });
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::QuestionId;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 15, 12, 0, 0).unwrap()
    }

    fn record(
        id: &str,
        number: i32,
        attempts: u32,
        correct: u32,
        days_ago: Option<i64>,
    ) -> ProgressRecord {
        let mut record = ProgressRecord::new(QuestionId::new(id).unwrap());
        record.leitner_box = number;
        record.attempts = attempts;
        record.correct_attempts = correct;
        record.last_review_date = days_ago.map(|d| now() - Duration::days(d));
        record
    }

    #[test]
    fn empty_progress() {
        let stats = study_stats(&[], now());
        assert_eq!(stats, StudyStats::default());
    }

    #[test]
    fn buckets_and_distribution() {
        let records = vec![
            record("a", 1, 2, 1, Some(1)),
            record("b", 2, 1, 0, Some(1)),
            record("c", 3, 4, 4, Some(1)),
            record("d", 5, 10, 9, Some(1)),
            record("e", 6, 0, 0, None),
        ];
        let stats = study_stats(&records, now());

        assert_eq!(stats.total_questions, 5);
        assert_eq!(stats.difficult_questions, 2);
        assert_eq!(stats.reviewing_questions, 1);
        assert_eq!(stats.learned_questions, 2);
        assert_eq!(stats.box_distribution, [1, 1, 1, 0, 1, 1]);
        // (50 + 0 + 100 + 90) / 4
        assert!((stats.average_accuracy - 60.0).abs() < 1e-9);
        // box 1 after a day and the never-reviewed record
        assert_eq!(stats.due_today, 2);
    }

    #[test]
    fn recommendations_follow_thresholds() {
        let stats = StudyStats {
            total_questions: 40,
            learned_questions: 5,
            difficult_questions: 20,
            due_today: 25,
            ..Default::default()
        };
        let recs = recommendations(&stats, 20);
        let kinds: Vec<_> = recs.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![
                RecommendationKind::Review,
                RecommendationKind::Focus,
                RecommendationKind::Explore
            ]
        );
        assert_eq!(recs[2].count, 60);
    }

    #[test]
    fn no_recommendations_for_settled_learner() {
        let stats = StudyStats {
            total_questions: 150,
            learned_questions: 100,
            difficult_questions: 10,
            due_today: 3,
            ..Default::default()
        };
        assert!(recommendations(&stats, 20).is_empty());
    }
}
