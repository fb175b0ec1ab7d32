//! Answer event processing.
//!
//! Feeds one answer through the scheduler and the scoring engine and
//! returns the updated record and stats. The caller persists both.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{CoreError, Result};
use crate::scheduler::record_answer;
use crate::scoring::achievements::{check_achievements, Achievement};
use crate::scoring::level::{calculate_level, LevelInfo};
use crate::scoring::streak::{update_streak, StreakUpdate};
use crate::scoring::xp::{score_answer, XpAward};
use crate::types::{ProgressRecord, QuestionId, UserStats};

/// Correct answers faster than this count toward the speed achievement.
pub const FAST_ANSWER_ACHIEVEMENT_SECS: i64 = 5;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerEvent {
    pub question_id: QuestionId,
    /// Topic of the question, when the repository knows it.
    pub topic: Option<String>,
    pub is_correct: bool,
    pub time_spent_secs: i64,
}

/// Time and per-user settings for one answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StudyContext {
    pub now: DateTime<Utc>,
    /// Calendar day the answer counts toward, after the daily reset hour.
    pub study_day: NaiveDate,
    /// Answers per day that complete the daily goal; 0 disables it.
    pub daily_goal: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct AnswerOutcome {
    pub record: ProgressRecord,
    pub stats: UserStats,
    pub award: XpAward,
    pub streak: StreakUpdate,
    pub level_before: u32,
    pub level: LevelInfo,
    pub new_achievements: Vec<&'static Achievement>,
    /// This answer completed today's goal.
    pub daily_goal_reached: bool,
}

impl AnswerOutcome {
    pub fn leveled_up(&self) -> bool {
        self.level.current_level > self.level_before
    }

    /// XP added to the user's total by this answer.
    pub fn xp_gained(&self) -> u32 {
        self.award.total_xp.saturating_add(self.streak.streak_bonus)
    }
}

fn xp_as_signed(total_xp: u64) -> i64 {
    i64::try_from(total_xp).unwrap_or(i64::MAX)
}

/// Apply one answer to a question's record and the user's stats.
///
/// `record` is `None` for a question the user has never answered.
pub fn process_answer(
    record: Option<&ProgressRecord>,
    stats: &UserStats,
    event: &AnswerEvent,
    ctx: &StudyContext,
) -> Result<AnswerOutcome> {
    if let Some(topic) = &event.topic {
        if topic.trim().is_empty() {
            return Err(CoreError::invalid(format!(
                "question {} has an empty topic",
                event.question_id
            )));
        }
    }

    let prior = match record {
        Some(record) if record.question_id != event.question_id => {
            return Err(CoreError::invalid(format!(
                "record for {} passed with answer to {}",
                record.question_id, event.question_id
            )));
        }
        Some(record) => {
            record.validate()?;
            record.clone()
        }
        None => ProgressRecord::new(event.question_id.clone()),
    };

    let is_first_try = prior.attempts == 0;
    let is_from_difficult_box = prior.current_box().is_difficult();

    let award = score_answer(
        event.is_correct,
        event.time_spent_secs,
        is_first_try,
        is_from_difficult_box,
    );
    let streak = update_streak(stats.current_streak, event.is_correct);
    let updated = record_answer(&prior, event.is_correct, ctx.now, event.time_spent_secs);

    let mut stats = stats.clone();
    let level_before = calculate_level(xp_as_signed(stats.total_xp)).current_level;

    stats.begin_study_day(ctx.study_day);
    stats.total_questions_answered = stats.total_questions_answered.saturating_add(1);
    stats.answered_today = stats.answered_today.saturating_add(1);
    if event.is_correct {
        stats.correct_answers = stats.correct_answers.saturating_add(1);
        stats.correct_today = stats.correct_today.saturating_add(1);
        if event.time_spent_secs.max(0) < FAST_ANSWER_ACHIEVEMENT_SECS {
            stats.fast_answers = stats.fast_answers.saturating_add(1);
        }
    }

    stats.current_streak = streak.new_streak;
    stats.longest_streak = stats.longest_streak.max(stats.current_streak);

    if let Some(topic) = &event.topic {
        stats
            .topic_stats
            .entry(topic.clone())
            .or_default()
            .record(event.is_correct);
    }

    let daily_goal_reached = ctx.daily_goal > 0 && stats.answered_today == ctx.daily_goal;
    if daily_goal_reached {
        stats.daily_goals_achieved = stats.daily_goals_achieved.saturating_add(1);
        if stats.correct_today == stats.answered_today {
            stats.perfect_sessions = stats.perfect_sessions.saturating_add(1);
        }
    }

    let gained = u64::from(award.total_xp) + u64::from(streak.streak_bonus);
    stats.total_xp = stats.total_xp.saturating_add(gained);
    let level = calculate_level(xp_as_signed(stats.total_xp));
    stats.current_level = level.current_level;

    let new_achievements = check_achievements(&stats, &stats.achievements);
    stats
        .achievements
        .extend(new_achievements.iter().map(|a| a.id.to_string()));

    Ok(AnswerOutcome {
        record: updated,
        stats,
        award,
        streak,
        level_before,
        level,
        new_achievements,
        daily_goal_reached,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use pretty_assertions::assert_eq;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 12, 9, 30, 0).unwrap()
    }

    fn ctx(daily_goal: u32) -> StudyContext {
        StudyContext {
            now: now(),
            study_day: now().date_naive(),
            daily_goal,
        }
    }

    fn event(id: &str, is_correct: bool, secs: i64) -> AnswerEvent {
        AnswerEvent {
            question_id: QuestionId::new(id).unwrap(),
            topic: Some("Recht".to_string()),
            is_correct,
            time_spent_secs: secs,
        }
    }

    #[test]
    fn first_correct_answer_on_new_question() {
        let outcome = process_answer(
            None,
            &UserStats::default(),
            &event("001", true, 4),
            &ctx(20),
        )
        .unwrap();

        // base 10 + speed 2 + difficult box 10 + first try 5
        assert_eq!(outcome.award.total_xp, 27);
        assert_eq!(outcome.xp_gained(), 27);
        assert_eq!(outcome.record.leitner_box, 2);
        assert_eq!(outcome.record.attempts, 1);
        assert_eq!(outcome.stats.total_xp, 27);
        assert_eq!(outcome.stats.current_streak, 1);
        assert_eq!(outcome.stats.longest_streak, 1);
        assert_eq!(outcome.stats.fast_answers, 1);
        assert_eq!(outcome.stats.topic_stats["Recht"].correct, 1);
        assert_eq!(outcome.stats.last_study_date, Some(now().date_naive()));

        let ids: Vec<_> = outcome.new_achievements.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec!["first_question", "first_correct", "topic_master_law"]);
        assert!(outcome.stats.achievements.contains("first_question"));
    }

    #[test]
    fn miss_resets_box_and_streak() {
        let mut record = ProgressRecord::new(QuestionId::new("001").unwrap());
        record.leitner_box = 5;
        record.attempts = 6;
        record.correct_attempts = 6;
        record.last_review_date = Some(now() - Duration::days(40));

        let stats = UserStats {
            current_streak: 7,
            longest_streak: 7,
            total_xp: 500,
            ..Default::default()
        };

        let outcome = process_answer(
            Some(&record),
            &stats,
            &event("001", false, 30),
            &ctx(20),
        )
        .unwrap();
        assert_eq!(outcome.record.leitner_box, 1);
        assert_eq!(outcome.award.total_xp, 2);
        assert_eq!(outcome.stats.current_streak, 0);
        assert_eq!(outcome.stats.longest_streak, 7);
        assert_eq!(outcome.stats.total_xp, 502);
    }

    #[test]
    fn longest_streak_is_repaired_when_behind() {
        let stats = UserStats {
            current_streak: 12,
            longest_streak: 3,
            ..Default::default()
        };
        let outcome = process_answer(None, &stats, &event("002", true, 20), &ctx(0)).unwrap();
        assert_eq!(outcome.stats.current_streak, 13);
        assert_eq!(outcome.stats.longest_streak, 13);
    }

    #[test]
    fn streak_milestone_adds_to_total() {
        let stats = UserStats {
            current_streak: 9,
            longest_streak: 9,
            ..Default::default()
        };
        let mut record = ProgressRecord::new(QuestionId::new("003").unwrap());
        record.leitner_box = 4;
        record.attempts = 3;
        record.correct_attempts = 3;

        let outcome = process_answer(
            Some(&record),
            &stats,
            &event("003", true, 30),
            &ctx(0),
        )
        .unwrap();
        assert_eq!(outcome.award.total_xp, 10);
        assert_eq!(outcome.streak.streak_bonus, 50);
        assert_eq!(outcome.stats.total_xp, 60);
    }

    #[test]
    fn level_up_is_reported() {
        let stats = UserStats {
            total_xp: 95,
            ..Default::default()
        };
        let outcome = process_answer(None, &stats, &event("004", true, 30), &ctx(0)).unwrap();
        assert_eq!(outcome.level_before, 0);
        assert_eq!(outcome.level.current_level, 1);
        assert_eq!(outcome.stats.current_level, 1);
        assert!(outcome.leveled_up());
    }

    #[test]
    fn daily_goal_and_perfect_day() {
        let mut stats = UserStats::default();
        let mut reached = Vec::new();
        for n in 0..3 {
            let outcome = process_answer(
                None,
                &stats,
                &event(&format!("q{n}"), true, 30),
                &ctx(3),
            )
            .unwrap();
            reached.push(outcome.daily_goal_reached);
            stats = outcome.stats;
        }
        assert_eq!(reached, vec![false, false, true]);
        assert_eq!(stats.daily_goals_achieved, 1);
        assert_eq!(stats.perfect_sessions, 1);
        assert!(stats.achievements.contains("daily_goal"));
        assert!(stats.achievements.contains("perfectionist"));

        // further answers the same day do not count the goal again
        let outcome = process_answer(None, &stats, &event("q9", false, 30), &ctx(3)).unwrap();
        assert!(!outcome.daily_goal_reached);
        assert_eq!(outcome.stats.daily_goals_achieved, 1);
    }

    #[test]
    fn achievements_are_not_reissued() {
        let first = process_answer(
            None,
            &UserStats::default(),
            &event("001", true, 30),
            &ctx(0),
        )
        .unwrap();
        let second = process_answer(None, &first.stats, &event("002", true, 30), &ctx(0)).unwrap();
        assert!(second
            .new_achievements
            .iter()
            .all(|a| !first.stats.achievements.contains(a.id)));
    }

    #[test]
    fn mismatched_record_is_rejected() {
        let record = ProgressRecord::new(QuestionId::new("other").unwrap());
        let result = process_answer(
            Some(&record),
            &UserStats::default(),
            &event("001", true, 3),
            &ctx(0),
        );
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn empty_topic_is_rejected() {
        let mut answer = event("001", true, 3);
        answer.topic = Some(" ".to_string());
        let result = process_answer(None, &UserStats::default(), &answer, &ctx(0));
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }

    #[test]
    fn inconsistent_counts_are_rejected() {
        let mut record = ProgressRecord::new(QuestionId::new("001").unwrap());
        record.attempts = 1;
        record.correct_attempts = 3;
        let result = process_answer(
            Some(&record),
            &UserStats::default(),
            &event("001", true, 3),
            &ctx(0),
        );
        assert!(matches!(result, Err(CoreError::InvalidArgument(_))));
    }
}
