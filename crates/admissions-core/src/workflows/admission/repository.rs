use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::domain::{CandidateId, Case, CaseId, CaseStatus};

/// Storage abstraction so the coordinator can be exercised in isolation.
///
/// `update` is the only write path for existing cases and carries the
/// version the caller read; the store must refuse the commit when the
/// stored version differs.
pub trait CaseRepository: Send + Sync {
    fn insert(&self, case: Case) -> Result<Case, RepositoryError>;
    fn fetch(&self, id: &CaseId) -> Result<Option<Case>, RepositoryError>;
    fn update(&self, case: Case, expected_version: u64) -> Result<Case, RepositoryError>;
    /// Number of the candidate's cases whose status is in `statuses`,
    /// excluding the case named by `except`.
    fn count_in_statuses(
        &self,
        candidate: &CandidateId,
        statuses: &[CaseStatus],
        except: &CaseId,
    ) -> Result<usize, RepositoryError>;
}

/// Error enumeration for repository failures.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("case already exists")]
    Conflict,
    #[error("case not found")]
    NotFound,
    #[error("stale case: expected version {expected}, stored version {actual}")]
    VersionConflict { expected: u64, actual: u64 },
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}

/// A candidate-facing message produced from a template. Rendering is
/// separate from sending so a missing template can abort a decision command
/// before anything is committed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderedMessage {
    pub template: String,
    pub subject: String,
    pub body: String,
}

/// Outbound candidate notification hooks (e-mail adapters in production).
pub trait NotificationGateway: Send + Sync {
    fn render(&self, template: &str, case: &Case) -> Result<RenderedMessage, NotificationError>;
    fn send(&self, case: &CaseId, message: RenderedMessage) -> Result<(), NotificationError>;
}

#[derive(Debug, thiserror::Error)]
pub enum NotificationError {
    #[error("no notification template named {0}")]
    MissingTemplate(String),
    #[error("notification transport unavailable: {0}")]
    Transport(String),
}

/// One recorded workflow step, written before the case commit so a failed
/// trail write aborts the command.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AuditEntry {
    pub case: CaseId,
    pub command: &'static str,
    pub from: CaseStatus,
    pub to: CaseStatus,
    pub recorded_at: DateTime<Utc>,
}

pub trait AuditTrail: Send + Sync {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError>;
}

#[derive(Debug, thiserror::Error)]
pub enum AuditError {
    #[error("audit trail unavailable: {0}")]
    Unavailable(String),
}

/// Sanitized representation of a case's exposed status.
#[derive(Debug, Clone, Serialize)]
pub struct CaseStatusView {
    pub case_id: CaseId,
    pub reference: String,
    pub status: &'static str,
    pub version: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

impl CaseStatusView {
    pub fn of(case: &Case) -> Self {
        Self {
            case_id: case.id.clone(),
            reference: case.reference.clone(),
            status: case.status.label(),
            version: case.version,
            submitted_at: case.submitted_at,
        }
    }
}
