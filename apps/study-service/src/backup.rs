//! Progress backup export and import.
//!
//! A backup is a JSON document holding the user's progress records and
//! stats. The checksum is the SHA-256 of the serialized progress list, so
//! edited progress is rejected on import. Stats are not covered by the
//! checksum: contradictory counters are rejected and the derived fields
//! (level, longest streak) are recomputed before storing.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use tracing::{info, warn};

use trainer_core::{ProgressRecord, UserStats};

use crate::clock::Clock;
use crate::error::{Result, ServiceError};
use crate::service::{check_user_id, StudyService};
use crate::store::{ProgressStore, QuestionRepository};

pub const BACKUP_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressBackup {
    pub version: String,
    pub exported_at: DateTime<Utc>,
    pub progress: Vec<ProgressRecord>,
    pub stats: UserStats,
    pub checksum: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub records: usize,
    pub total_xp: u64,
}

#[derive(Deserialize)]
struct VersionHeader {
    version: String,
}

/// Hex-encoded SHA-256 of `content`.
pub fn hash_content(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    format!("{:x}", hasher.finalize())
}

fn progress_checksum(progress: &[ProgressRecord]) -> Result<String> {
    Ok(hash_content(&serde_json::to_string(progress)?))
}

impl<S, Q, C> StudyService<S, Q, C>
where
    S: ProgressStore,
    Q: QuestionRepository,
    C: Clock,
{
    /// Serialize the user's progress and stats into a backup document.
    pub async fn export_backup(&self, user_id: &str) -> Result<String> {
        check_user_id(user_id)?;
        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let progress = self.store.list_records(user_id)?;
        let stats = self.store.get_stats(user_id)?.unwrap_or_default();
        let backup = ProgressBackup {
            version: BACKUP_VERSION.to_string(),
            exported_at: self.clock.now(),
            checksum: progress_checksum(&progress)?,
            progress,
            stats,
        };

        info!(user_id, records = backup.progress.len(), "Exported progress backup");
        Ok(serde_json::to_string_pretty(&backup)?)
    }

    /// Replace the user's progress and stats with the backup's content.
    ///
    /// Nothing is written unless the whole document is valid.
    pub async fn import_backup(&self, user_id: &str, json: &str) -> Result<ImportSummary> {
        check_user_id(user_id)?;

        let header: VersionHeader = serde_json::from_str(json)?;
        if header.version != BACKUP_VERSION {
            return Err(ServiceError::UnsupportedBackupVersion(header.version));
        }

        let mut backup: ProgressBackup = serde_json::from_str(json)?;
        if progress_checksum(&backup.progress)? != backup.checksum {
            return Err(ServiceError::ChecksumMismatch);
        }
        for record in &backup.progress {
            record.validate()?;
        }
        backup.stats.validate()?;
        backup.stats.normalize();
        let clamped = backup.progress.iter().filter(|r| !r.box_in_range()).count();
        if clamped > 0 {
            warn!(user_id, clamped, "Backup contains boxes out of range");
        }

        let lock = self.user_lock(user_id);
        let _guard = lock.lock().await;

        let summary = ImportSummary {
            records: backup.progress.len(),
            total_xp: backup.stats.total_xp,
        };
        self.store.replace_records(user_id, backup.progress)?;
        self.store.put_stats(user_id, backup.stats)?;

        info!(
            user_id,
            records = summary.records,
            exported_at = %backup.exported_at,
            "Imported progress backup"
        );
        Ok(summary)
    }
}
