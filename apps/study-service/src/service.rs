//! Study service: loads a user's state, runs it through the core and
//! persists the result.
//!
//! All read-modify-write cycles for one user run under that user's lock, so
//! concurrent answers from the same user are applied one after another.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex as AsyncMutex;
use tracing::{debug, info, warn};

use trainer_core::scheduler::{recommendations, study_stats, Recommendation, StudyStats};
use trainer_core::scoring::achievements::{self, Achievement};
use trainer_core::scoring::{
    calculate_rank, check_badges, level_rank, EarnedBadge, LevelRank, RankInfo,
};
use trainer_core::{
    calculate_level, generate_daily_challenge, process_answer, review_queue, AnswerEvent,
    DailyChallenge, DueQuestion, LevelInfo, ProgressRecord, QuestionId, StreakUpdate,
    StudyContext, UserStats, XpAward,
};

use crate::clock::{adjusted_today, local_time, Clock};
use crate::config::ServiceConfig;
use crate::error::{Result, ServiceError};
use crate::store::{ProgressStore, QuestionRepository};

/// One submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmitAnswer {
    pub question_id: QuestionId,
    /// Indices of the options the user picked.
    pub selected_answers: Vec<usize>,
    pub time_spent_secs: i64,
}

/// Everything that changed because of one answer.
#[derive(Debug, Clone, Serialize)]
pub struct AnswerReport {
    pub question_id: QuestionId,
    pub is_correct: bool,
    pub correct_answers: Vec<usize>,
    pub record: ProgressRecord,
    pub award: XpAward,
    pub streak: StreakUpdate,
    /// Answer XP, streak bonus and any challenge reward together.
    pub xp_gained: u64,
    pub total_xp: u64,
    pub level: LevelInfo,
    pub leveled_up: bool,
    pub new_achievements: Vec<&'static Achievement>,
    pub new_badges: Vec<EarnedBadge>,
    pub challenge: DailyChallenge,
    pub challenge_completed: bool,
    pub daily_goal_reached: bool,
}

/// Summary of a user's progress.
#[derive(Debug, Clone, Serialize)]
pub struct StudyOverview {
    pub stats: UserStats,
    pub study: StudyStats,
    pub level: LevelInfo,
    pub level_rank: LevelRank,
    /// `None` until the user has answered something.
    pub rank: Option<RankInfo>,
    pub recommendations: Vec<Recommendation>,
}

pub struct StudyService<S, Q, C> {
    pub(crate) store: Arc<S>,
    pub(crate) questions: Arc<Q>,
    pub(crate) clock: Arc<C>,
    pub(crate) config: ServiceConfig,
    user_locks: Mutex<HashMap<String, Arc<AsyncMutex<()>>>>,
}

pub(crate) fn xp_as_signed(total_xp: u64) -> i64 {
    i64::try_from(total_xp).unwrap_or(i64::MAX)
}

pub(crate) fn check_user_id(user_id: &str) -> Result<()> {
    if user_id.trim().is_empty() {
        return Err(ServiceError::BadRequest("user id must not be empty".to_string()));
    }
    Ok(())
}

impl<S, Q, C> StudyService<S, Q, C>
where
    S: ProgressStore,
    Q: QuestionRepository,
    C: Clock,
{
    pub fn new(store: Arc<S>, questions: Arc<Q>, clock: Arc<C>, config: ServiceConfig) -> Self {
        Self {
            store,
            questions,
            clock,
            config,
            user_locks: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// The lock serializing `user_id`'s updates.
    ///
    /// Entries nobody holds a handle to are dropped on the way, so the map
    /// only tracks users with an operation in flight.
    pub(crate) fn user_lock(&self, user_id: &str) -> Arc<AsyncMutex<()>> {
        let mut locks = self.user_locks.lock().unwrap_or_else(PoisonError::into_inner);
        locks.retain(|_, lock| Arc::strong_count(lock) > 1);
        locks.entry(user_id.to_string()).or_default().clone()
    }

    fn study_day(&self, now: DateTime<Utc>) -> NaiveDate {
        adjusted_today(now, self.config.utc_offset(), self.config.daily_reset_hour)
    }

    /// Stored challenge if it is today's, otherwise a fresh one.
    fn challenge_for(
        &self,
        user_id: &str,
        stats: &UserStats,
        day: NaiveDate,
    ) -> Result<DailyChallenge> {
        match self.store.get_challenge(user_id)? {
            Some(challenge) if challenge.is_for(day) => Ok(challenge),
            _ => {
                let challenge = generate_daily_challenge(stats, day);
                debug!(user_id, challenge = %challenge.id, %day, "Generated daily challenge");
                Ok(challenge)
            }
        }
    }

    /// Check an answer and apply it to the user's progress.
    pub async fn submit_answer(
        &self,
        user_id: &str,
        answer: SubmitAnswer,
    ) -> Result<AnswerReport> {
        check_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let question = self
            .questions
            .get_question(&answer.question_id)?
            .ok_or_else(|| ServiceError::QuestionNotFound(answer.question_id.to_string()))?;
        let is_correct = question.is_correct(&answer.selected_answers);

        let now = self.clock.now();
        let day = self.study_day(now);

        let record = self.store.get_record(user_id, &question.id)?;
        if let Some(record) = record.as_ref().filter(|r| !r.box_in_range()) {
            warn!(
                user_id,
                question_id = %record.question_id,
                leitner_box = record.leitner_box,
                "Stored box out of range, clamping"
            );
        }
        let stats = self.store.get_stats(user_id)?.unwrap_or_default();

        let event = AnswerEvent {
            question_id: question.id.clone(),
            topic: Some(question.topic.clone()),
            is_correct,
            time_spent_secs: answer.time_spent_secs,
        };
        let ctx = StudyContext {
            now,
            study_day: day,
            daily_goal: self.config.daily_goal,
        };
        let outcome = process_answer(record.as_ref(), &stats, &event, &ctx)?;

        let mut challenge = self.challenge_for(user_id, &stats, day)?;
        let challenge_completed =
            challenge.record_answer(is_correct, outcome.stats.current_streak);

        let mut updated_stats = outcome.stats.clone();
        let mut new_achievements = outcome.new_achievements.clone();
        let mut xp_gained = u64::from(outcome.xp_gained());

        if challenge_completed {
            let reward = &challenge.reward;
            updated_stats.total_xp = updated_stats.total_xp.saturating_add(u64::from(reward.xp));
            xp_gained += u64::from(reward.xp);

            if let Some(unlocked) = reward.badge.as_deref().and_then(achievements::find) {
                if updated_stats.achievements.insert(unlocked.id.to_string()) {
                    new_achievements.push(unlocked);
                }
            }
            info!(
                user_id,
                challenge = %challenge.id,
                reward_xp = reward.xp,
                "Daily challenge completed"
            );
        }

        let level = calculate_level(xp_as_signed(updated_stats.total_xp));
        updated_stats.current_level = level.current_level;

        let earned = self.store.list_badges(user_id)?;
        let local_now = local_time(now, self.config.utc_offset());
        let new_badges = check_badges(&earned, local_now, day, stats.last_study_date);

        // stats first: a failed stats write must leave nothing behind
        self.store.put_stats(user_id, updated_stats.clone())?;
        self.store.put_record(user_id, outcome.record.clone())?;
        self.store.put_challenge(user_id, challenge.clone())?;
        if !new_badges.is_empty() {
            self.store.add_badges(user_id, &new_badges)?;
        }

        info!(
            user_id,
            question_id = %question.id,
            is_correct,
            xp_gained,
            leitner_box = outcome.record.leitner_box,
            "Processed answer"
        );

        Ok(AnswerReport {
            question_id: question.id,
            is_correct,
            correct_answers: question.correct_answers,
            record: outcome.record,
            award: outcome.award,
            streak: outcome.streak,
            xp_gained,
            total_xp: updated_stats.total_xp,
            leveled_up: level.current_level > outcome.level_before,
            level,
            new_achievements,
            new_badges,
            challenge,
            challenge_completed,
            daily_goal_reached: outcome.daily_goal_reached,
        })
    }

    /// Questions due for review, most urgent first.
    ///
    /// Questions the user has never seen are included as fresh box 1
    /// records. Records for questions no longer in the catalog are ignored.
    pub async fn due_questions(
        &self,
        user_id: &str,
        limit: Option<usize>,
    ) -> Result<Vec<DueQuestion>> {
        check_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let mut stored: HashMap<QuestionId, ProgressRecord> = self
            .store
            .list_records(user_id)?
            .into_iter()
            .map(|r| (r.question_id.clone(), r))
            .collect();

        let records: Vec<ProgressRecord> = self
            .questions
            .list_question_ids()?
            .into_iter()
            .map(|id| stored.remove(&id).unwrap_or_else(|| ProgressRecord::new(id)))
            .collect();

        let mut queue = review_queue(&records, self.clock.now());
        debug!(user_id, catalog = records.len(), due = queue.len(), "Built review queue");

        if let Some(limit) = limit {
            queue.truncate(limit);
        }
        Ok(queue)
    }

    /// Today's challenge, generated and stored on first request of the day.
    pub async fn daily_challenge(&self, user_id: &str) -> Result<DailyChallenge> {
        check_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let day = self.study_day(self.clock.now());
        if let Some(challenge) = self.store.get_challenge(user_id)?.filter(|c| c.is_for(day)) {
            return Ok(challenge);
        }

        let stats = self.store.get_stats(user_id)?.unwrap_or_default();
        let challenge = generate_daily_challenge(&stats, day);
        debug!(user_id, challenge = %challenge.id, %day, "Generated daily challenge");
        self.store.put_challenge(user_id, challenge.clone())?;
        Ok(challenge)
    }

    pub async fn overview(&self, user_id: &str) -> Result<StudyOverview> {
        check_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let stored_stats = self.store.get_stats(user_id)?;
        let records = self.store.list_records(user_id)?;

        let study = study_stats(&records, self.clock.now());
        let recommendations = recommendations(&study, self.config.daily_goal);

        let rank = match &stored_stats {
            Some(stats) => calculate_rank(stats.total_xp, &self.store.all_total_xp()?),
            None => None,
        };
        let stats = stored_stats.unwrap_or_default();
        let level = calculate_level(xp_as_signed(stats.total_xp));

        Ok(StudyOverview {
            level_rank: level_rank(level.current_level),
            level,
            rank,
            recommendations,
            study,
            stats,
        })
    }
}
