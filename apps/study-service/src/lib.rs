//! Study service for the exam trainer.
//!
//! Wires the pure `trainer-core` engine to storage, a clock and
//! configuration. Every operation is scoped to one user id.

pub mod backup;
pub mod clock;
pub mod config;
pub mod error;
pub mod service;
pub mod store;
pub mod telemetry;

use anyhow::Context;

pub use backup::{hash_content, ImportSummary, ProgressBackup, BACKUP_VERSION};
pub use clock::{adjusted_today, Clock, FixedClock, SystemClock};
pub use config::{ConfigError, ServiceConfig};
pub use error::{Result, ServiceError};
pub use service::{AnswerReport, StudyOverview, StudyService, SubmitAnswer};
pub use store::{
    MemoryQuestionBank, MemoryStore, ProgressStore, QuestionRepository, StoreError, StoreResult,
};

/// Load `.env`, install logging and read the configuration.
pub fn init() -> anyhow::Result<ServiceConfig> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = ServiceConfig::from_env().context("failed to load service configuration")?;
    tracing::info!(
        daily_goal = config.daily_goal,
        daily_reset_hour = config.daily_reset_hour,
        utc_offset_minutes = config.utc_offset_minutes,
        "Study service configured"
    );
    Ok(config)
}
