//! Common test utilities for study service integration tests.
//!
//! Everything runs against the in-memory store and a fixed clock, so no
//! external services are needed.

pub mod fixtures;

use std::sync::Arc;

use chrono::{DateTime, Utc};

use trainer_core::{ProgressRecord, QuestionId, UserStats};
use trainer_study_service::{
    FixedClock, MemoryQuestionBank, MemoryStore, ProgressStore, ServiceConfig, StudyService,
};

pub type TestService = StudyService<MemoryStore, MemoryQuestionBank, FixedClock>;

pub struct TestContext {
    pub store: Arc<MemoryStore>,
    pub clock: Arc<FixedClock>,
    pub service: Arc<TestService>,
}

impl TestContext {
    /// Sample question bank, default config, clock at [`fixtures::start_time`].
    pub fn new() -> Self {
        Self::with_config(ServiceConfig::default())
    }

    pub fn with_config(config: ServiceConfig) -> Self {
        Self::at(fixtures::start_time(), config)
    }

    pub fn at(now: DateTime<Utc>, config: ServiceConfig) -> Self {
        let store = Arc::new(MemoryStore::new());
        let questions = Arc::new(
            MemoryQuestionBank::new(fixtures::sample_questions())
                .expect("Sample questions have unique ids"),
        );
        let clock = Arc::new(FixedClock::new(now));
        let service = Arc::new(StudyService::new(
            store.clone(),
            questions,
            clock.clone(),
            config,
        ));

        Self {
            store,
            clock,
            service,
        }
    }

    pub fn record(&self, user_id: &str, question_id: &str) -> Option<ProgressRecord> {
        let id = QuestionId::new(question_id).expect("Valid question id");
        self.store
            .get_record(user_id, &id)
            .expect("Failed to read record")
    }

    pub fn stats(&self, user_id: &str) -> UserStats {
        self.store
            .get_stats(user_id)
            .expect("Failed to read stats")
            .unwrap_or_default()
    }
}
