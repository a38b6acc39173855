use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};
use tracing::info;

use admissions_core::workflows::admission::{
    AcademicYear, AuditEntry, AuditError, AuditTrail, CandidateId, CandidateProfileProvider,
    CandidateSnapshot, Case, CaseId, CaseRepository, CaseStatus, Formation, FormationId,
    NotificationError, NotificationGateway, ProfileError, ReferenceData, RenderedMessage,
    RepositoryError, Scholarship, ScholarshipId,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Versioned in-memory case store. Commits only against the version the
/// caller read; the stored version is bumped on every successful write.
#[derive(Default, Clone)]
pub(crate) struct InMemoryCaseRepository {
    cases: Arc<Mutex<HashMap<CaseId, Case>>>,
}

impl CaseRepository for InMemoryCaseRepository {
    fn insert(&self, case: Case) -> Result<Case, RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        if guard.contains_key(&case.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn fetch(&self, id: &CaseId) -> Result<Option<Case>, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn update(&self, mut case: Case, expected_version: u64) -> Result<Case, RepositoryError> {
        let mut guard = self.cases.lock().expect("repository mutex poisoned");
        let stored = guard.get(&case.id).ok_or(RepositoryError::NotFound)?;
        if stored.version != expected_version {
            return Err(RepositoryError::VersionConflict {
                expected: expected_version,
                actual: stored.version,
            });
        }
        case.version = expected_version + 1;
        guard.insert(case.id.clone(), case.clone());
        Ok(case)
    }

    fn count_in_statuses(
        &self,
        candidate: &CandidateId,
        statuses: &[CaseStatus],
        except: &CaseId,
    ) -> Result<usize, RepositoryError> {
        let guard = self.cases.lock().expect("repository mutex poisoned");
        Ok(guard
            .values()
            .filter(|case| {
                &case.candidate == candidate
                    && &case.id != except
                    && statuses.contains(&case.status)
            })
            .count())
    }
}

/// Notification adapter backed by a static template table; dispatch is a
/// structured log line plus an in-memory record.
#[derive(Clone)]
pub(crate) struct InMemoryNotificationGateway {
    templates: HashMap<&'static str, &'static str>,
    sent: Arc<Mutex<Vec<RenderedMessage>>>,
}

impl Default for InMemoryNotificationGateway {
    fn default() -> Self {
        let mut templates = HashMap::new();
        templates.insert("case_submitted", "Your application has been received.");
        templates.insert("case_sent_to_fa", "Your application is under faculty review.");
        templates.insert("documents_requested", "Additional documents are required.");
        templates.insert("cao_approval", "Your application has been approved.");
        templates.insert("cao_refusal", "Your application has been refused.");
        Self {
            templates,
            sent: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl NotificationGateway for InMemoryNotificationGateway {
    fn render(&self, template: &str, case: &Case) -> Result<RenderedMessage, NotificationError> {
        let body = self
            .templates
            .get(template)
            .ok_or_else(|| NotificationError::MissingTemplate(template.to_string()))?;
        Ok(RenderedMessage {
            template: template.to_string(),
            subject: format!("[{}] application update", case.reference),
            body: (*body).to_string(),
        })
    }

    fn send(&self, case: &CaseId, message: RenderedMessage) -> Result<(), NotificationError> {
        info!(case = %case.0, template = %message.template, "candidate notified");
        self.sent
            .lock()
            .expect("notification mutex poisoned")
            .push(message);
        Ok(())
    }
}

/// Audit adapter writing the workflow trail to the log and keeping it in
/// memory for inspection.
#[derive(Default, Clone)]
pub(crate) struct InMemoryAuditTrail {
    entries: Arc<Mutex<Vec<AuditEntry>>>,
}

impl AuditTrail for InMemoryAuditTrail {
    fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
        info!(
            case = %entry.case.0,
            command = entry.command,
            from = entry.from.label(),
            to = entry.to.label(),
            "workflow step recorded"
        );
        self.entries
            .lock()
            .expect("audit mutex poisoned")
            .push(entry);
        Ok(())
    }
}

/// Candidate resumes registered over HTTP and served back to the engine.
#[derive(Default, Clone)]
pub(crate) struct InMemoryProfileProvider {
    snapshots: Arc<Mutex<HashMap<CaseId, CandidateSnapshot>>>,
}

impl InMemoryProfileProvider {
    pub(crate) fn put(&self, case: CaseId, snapshot: CandidateSnapshot) {
        self.snapshots
            .lock()
            .expect("profile mutex poisoned")
            .insert(case, snapshot);
    }
}

impl CandidateProfileProvider for InMemoryProfileProvider {
    fn resume(
        &self,
        case: &CaseId,
        _year: AcademicYear,
    ) -> Result<CandidateSnapshot, ProfileError> {
        self.snapshots
            .lock()
            .expect("profile mutex poisoned")
            .get(case)
            .cloned()
            .ok_or(ProfileError::NotFound)
    }
}

/// Program catalog: any acronym resolves, which keeps the service usable
/// without seeding reference data first.
pub(crate) struct CatalogReference;

impl ReferenceData for CatalogReference {
    fn current_academic_year(&self) -> AcademicYear {
        AcademicYear(2024)
    }

    fn formation(&self, id: &FormationId) -> Option<Formation> {
        Some(Formation {
            id: id.clone(),
            title: id.acronym.clone(),
            campus: "Main campus".to_string(),
        })
    }

    fn scholarships(&self, ids: &[ScholarshipId]) -> Vec<Scholarship> {
        ids.iter()
            .map(|id| Scholarship {
                id: id.clone(),
                short_name: id.0.clone(),
            })
            .collect()
    }
}
