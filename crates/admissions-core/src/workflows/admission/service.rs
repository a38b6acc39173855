use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use super::checklist::{
    CaoDecisionStatus, ChecklistDocument, ChecklistEntry, ExperienceStatus, FacultyDecisionStatus,
    UnknownExperience,
};
use super::domain::{
    CandidateId, Case, CaseId, CaseStatus, ExperienceId, ExperienceType, FacultyApprovalDetails,
    FormationId, RefusalReason,
};
use super::profile::{CandidateProfileProvider, ProfileError};
use super::reference::ReferenceData;
use super::repository::{
    AuditEntry, AuditError, AuditTrail, CaseRepository, CaseStatusView, NotificationError,
    NotificationGateway, RenderedMessage, RepositoryError,
};
use super::status;
use super::titles::AccessTitle;
use super::validation::{CompletenessValidator, ValidationContext, Violation};

/// Coordinator composing the repository, candidate profile reads, the
/// completeness validator, and the outbound gateways.
///
/// Every command follows the same shape: load, mutate a clone, call the
/// collaborators, then commit through the versioned repository write as the
/// last step. A collaborator failure therefore leaves nothing committed.
pub struct AdmissionCaseService<R, N, A, P> {
    repository: Arc<R>,
    notifications: Arc<N>,
    audit: Arc<A>,
    profiles: Arc<P>,
    reference: Arc<dyn ReferenceData>,
    validator: CompletenessValidator,
}

static CASE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_case_identity() -> (CaseId, u64) {
    let id = CASE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    (CaseId(format!("case-{id:06}")), id)
}

impl<R, N, A, P> AdmissionCaseService<R, N, A, P>
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    pub fn new(
        repository: Arc<R>,
        notifications: Arc<N>,
        audit: Arc<A>,
        profiles: Arc<P>,
        reference: Arc<dyn ReferenceData>,
        validator: CompletenessValidator,
    ) -> Self {
        Self {
            repository,
            notifications,
            audit,
            profiles,
            reference,
            validator,
        }
    }

    /// Open a new draft case for a candidate and program.
    pub fn initiate(
        &self,
        candidate: CandidateId,
        formation: FormationId,
    ) -> Result<Case, CaseServiceError> {
        let program = self
            .reference
            .formation(&formation)
            .ok_or(PreconditionFailure::UnknownFormation)?;

        let (id, sequence) = next_case_identity();
        let reference = format!(
            "{}-{}-{sequence:06}",
            formation.year.0, program.id.acronym
        );
        let case = Case::initiate(id, candidate, formation, reference);

        let stored = self.repository.insert(case)?;
        info!(case = %stored.id.0, reference = %stored.reference, "case initiated");
        Ok(stored)
    }

    /// Evaluate the completeness rule set without mutating anything.
    pub fn validate_for_submission(
        &self,
        id: &CaseId,
    ) -> Result<Vec<Violation>, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        let context = self.submission_context(&case)?;
        Ok(self.validator.validate(&case, &snapshot, &context))
    }

    /// Submit a draft case: the full rule set must pass, the checklist is
    /// seeded from the candidate resume, and the candidate is notified.
    pub fn submit(&self, id: &CaseId) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        let context = self.submission_context(&case)?;

        let violations = self.validator.validate(&case, &snapshot, &context);
        if !violations.is_empty() {
            return Err(CaseServiceError::Incomplete(violations));
        }

        let expected = case.version;
        let mut next = case;
        transition(&mut next, CaseStatus::Confirmed, "submit")?;
        next.checklist.reconcile(&snapshot);
        next.record_submission(Utc::now());

        let message = self.render(&next, "case_submitted")?;
        self.notifications.send(&next.id, message)?;
        self.trail(&next, "submit", CaseStatus::Draft)?;
        let stored = self.repository.update(next, expected)?;
        info!(case = %stored.id.0, "case submitted");
        Ok(stored)
    }

    /// Write one checklist tab, then re-derive the aggregate status. The
    /// derived move must be legal or the whole command fails unchanged.
    pub fn change_checklist_status(
        &self,
        id: &CaseId,
        entry: ChecklistEntry,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let from = case.status;

        let mut next = case;
        next.checklist.apply(entry);
        let derived = status::derive(&next.checklist, from);
        if derived != from {
            transition(&mut next, derived, "change_checklist_status")?;
            self.trail(&next, "change_checklist_status", from)?;
        }
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Update one prior-experience child entry. The checklist is reconciled
    /// against the current resume first so new experiences are addressable
    /// and stale children are dropped.
    pub fn change_experience_status(
        &self,
        id: &CaseId,
        experience: &ExperienceId,
        experience_status: ExperienceStatus,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;

        let mut next = case;
        next.checklist.reconcile(&snapshot);
        next.checklist
            .set_experience_status(experience, experience_status)
            .map_err(PreconditionFailure::from)?;
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Toggle one experience's access-title selection flag.
    pub fn modify_access_title_selection(
        &self,
        id: &CaseId,
        experience: ExperienceId,
        kind: ExperienceType,
        selected: bool,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        if !snapshot.contains_experience(&experience, kind) {
            return Err(PreconditionFailure::from(UnknownExperience(experience)).into());
        }

        let mut next = case;
        next.access_titles.select(experience, kind, selected);
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Hand the case over to the faculty authority for review. The case must
    /// still pass the submission-grade rule set: the profile may have changed
    /// since submission.
    pub fn send_to_fa(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        let context = self.submission_context(&case)?;
        let violations = self.validator.validate(&case, &snapshot, &context);
        if !violations.is_empty() {
            return Err(CaseServiceError::Incomplete(violations));
        }
        let from = case.status;

        let mut next = case;
        transition(&mut next, CaseStatus::TreatmentByFa, "send_to_fa")?;
        next.checklist
            .apply(ChecklistEntry::FacultyDecision(FacultyDecisionStatus::TakenInCharge));

        let message = self.render(&next, "case_sent_to_fa")?;
        self.notifications.send(&next.id, message)?;
        self.trail(&next, "send_to_fa", from)?;
        let stored = self.repository.update(next, expected_version)?;
        info!(case = %stored.id.0, "case handed to faculty");
        Ok(stored)
    }

    /// Replace the refusal reasons wholesale while the faculty holds the
    /// case.
    pub fn specify_refusal_reasons(
        &self,
        id: &CaseId,
        reasons: Vec<RefusalReason>,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByFa, "specify_refusal_reasons")?;

        let mut next = case;
        next.specify_refusal_reasons(reasons);
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Replace the faculty approval form wholesale. Completeness is only
    /// enforced when the approval verdict is recorded, not here.
    pub fn specify_faculty_approval(
        &self,
        id: &CaseId,
        details: FacultyApprovalDetails,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByFa, "specify_faculty_approval")?;

        let mut next = case;
        next.specify_faculty_approval(details);
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Record the faculty's refusal verdict. At least one refusal reason
    /// must be on file; custody does not change until the case is sent back.
    pub fn fa_refuse(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByFa, "fa_refuse")?;
        if case.refusal_reasons.is_empty() {
            return Err(PreconditionFailure::RefusalReasonsMissing.into());
        }

        let mut next = case;
        next.checklist
            .apply(ChecklistEntry::FacultyDecision(FacultyDecisionStatus::Refusal));
        self.trail(&next, "fa_refuse", CaseStatus::TreatmentByFa)?;
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Record the faculty's approval verdict. The approval form must be
    /// complete AND a live access title selected; both requirements are
    /// reported through one failure.
    pub fn fa_approve(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByFa, "fa_approve")?;
        self.check_approval_requirements(&case)?;

        let mut next = case;
        next.checklist
            .apply(ChecklistEntry::FacultyDecision(FacultyDecisionStatus::Approval));
        self.trail(&next, "fa_approve", CaseStatus::TreatmentByFa)?;
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Return the case from the faculty to the central authority, carrying
    /// the recorded verdict with it. An approval is re-checked against the
    /// live profile: a selected access title may have gone stale since the
    /// verdict was recorded.
    pub fn send_to_cao(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        match case.checklist.faculty_decision {
            FacultyDecisionStatus::Approval => self.check_approval_requirements(&case)?,
            FacultyDecisionStatus::Refusal => {}
            _ => return Err(PreconditionFailure::FacultyVerdictMissing.into()),
        }
        let from = case.status;

        let mut next = case;
        transition(&mut next, CaseStatus::ReturnedFromFa, "send_to_cao")?;
        self.trail(&next, "send_to_cao", from)?;
        let stored = self.repository.update(next, expected_version)?;
        info!(case = %stored.id.0, "case returned from faculty");
        Ok(stored)
    }

    /// Final refusal by the central authority. Writes the decision tab, lets
    /// the aggregate project from it, and notifies the candidate before the
    /// commit.
    pub fn cao_refuse(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByCao, "cao_refuse")?;
        if case.refusal_reasons.is_empty() {
            return Err(PreconditionFailure::RefusalReasonsMissing.into());
        }

        self.decide(case, CaoDecisionStatus::Refused, "cao_refuse", "cao_refusal", expected_version)
    }

    /// Final approval by the central authority.
    pub fn cao_approve(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        require_status(&case, CaseStatus::TreatmentByCao, "cao_approve")?;

        self.decide(case, CaoDecisionStatus::Approved, "cao_approve", "cao_approval", expected_version)
    }

    /// Ask the candidate for missing documents; the target pool depends on
    /// who holds the case.
    pub fn request_documents(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let from = case.status;
        let target = match from {
            CaseStatus::TreatmentByFa => CaseStatus::ToCompleteForFa,
            CaseStatus::Confirmed | CaseStatus::TreatmentByCao | CaseStatus::ReturnedFromFa => {
                CaseStatus::ToCompleteForCao
            }
            _ => {
                return Err(PreconditionFailure::TransitionNotAllowed {
                    from,
                    command: "request_documents",
                }
                .into())
            }
        };

        let mut next = case;
        transition(&mut next, target, "request_documents")?;
        let message = self.render(&next, "documents_requested")?;
        self.notifications.send(&next.id, message)?;
        self.trail(&next, "request_documents", from)?;
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Record that the candidate answered a completion request.
    pub fn receive_candidate_documents(
        &self,
        id: &CaseId,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let case = self.load(id)?;
        let from = case.status;
        let target = match from {
            CaseStatus::ToCompleteForFa => CaseStatus::CompletedForFa,
            CaseStatus::ToCompleteForCao => CaseStatus::CompletedForCao,
            _ => {
                return Err(PreconditionFailure::TransitionNotAllowed {
                    from,
                    command: "receive_candidate_documents",
                }
                .into())
            }
        };

        let mut next = case;
        transition(&mut next, target, "receive_candidate_documents")?;
        self.trail(&next, "receive_candidate_documents", from)?;
        Ok(self.repository.update(next, expected_version)?)
    }

    /// Fetch one case for API responses.
    pub fn get(&self, id: &CaseId) -> Result<Case, CaseServiceError> {
        self.load(id)
    }

    pub fn status_view(&self, id: &CaseId) -> Result<CaseStatusView, CaseServiceError> {
        Ok(CaseStatusView::of(&self.load(id)?))
    }

    pub fn checklist(&self, id: &CaseId) -> Result<ChecklistDocument, CaseServiceError> {
        Ok(self.load(id)?.checklist)
    }

    /// Every access title the candidate could designate right now, stale
    /// experiences excluded.
    pub fn selectable_access_titles(
        &self,
        id: &CaseId,
    ) -> Result<Vec<AccessTitle>, CaseServiceError> {
        let case = self.load(id)?;
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        Ok(case.access_titles.selectable_titles(&snapshot))
    }

    fn load(&self, id: &CaseId) -> Result<Case, CaseServiceError> {
        Ok(self.repository.fetch(id)?.ok_or(RepositoryError::NotFound)?)
    }

    /// Combined approval precondition: a complete approval form AND a live
    /// selected access title, evaluated against the current profile.
    fn check_approval_requirements(&self, case: &Case) -> Result<(), CaseServiceError> {
        let snapshot = self.profiles.resume(&case.id, case.formation.year)?;
        let missing_fields = match &case.faculty_approval {
            Some(details) => details.missing_fields(),
            None => FacultyApprovalDetails::default().missing_fields(),
        };
        let access_title_selected = case.access_titles.has_selection(&snapshot);
        if !missing_fields.is_empty() || !access_title_selected {
            return Err(PreconditionFailure::ApprovalRequirementsNotMet {
                missing_fields,
                access_title_selected,
            }
            .into());
        }
        Ok(())
    }

    /// Rules evaluate against the case's target academic year, not the year
    /// currently open for intake: a case keeps the year it was opened for.
    fn submission_context(&self, case: &Case) -> Result<ValidationContext, CaseServiceError> {
        let open_case_count = self.repository.count_in_statuses(
            &case.candidate,
            &self.validator.config().cap_counted_statuses,
            &case.id,
        )?;
        Ok(ValidationContext::for_submission(
            case.formation.year,
            open_case_count,
        ))
    }

    fn render(&self, case: &Case, template: &str) -> Result<RenderedMessage, CaseServiceError> {
        match self.notifications.render(template, case) {
            Ok(message) => Ok(message),
            Err(NotificationError::MissingTemplate(template)) => {
                Err(PreconditionFailure::CommunicationArtifactMissing { template }.into())
            }
            Err(other) => Err(other.into()),
        }
    }

    fn trail(&self, case: &Case, command: &'static str, from: CaseStatus) -> Result<(), CaseServiceError> {
        self.audit.record(AuditEntry {
            case: case.id.clone(),
            command,
            from,
            to: case.status,
            recorded_at: Utc::now(),
        })?;
        Ok(())
    }

    fn decide(
        &self,
        case: Case,
        verdict: CaoDecisionStatus,
        command: &'static str,
        template: &str,
        expected_version: u64,
    ) -> Result<Case, CaseServiceError> {
        let from = case.status;

        let mut next = case;
        next.checklist.apply(ChecklistEntry::CaoDecision(verdict));
        let derived = status::derive(&next.checklist, from);
        transition(&mut next, derived, command)?;

        let message = self.render(&next, template)?;
        self.notifications.send(&next.id, message)?;
        self.trail(&next, command, from)?;
        let stored = self.repository.update(next, expected_version)?;
        info!(case = %stored.id.0, status = stored.status.label(), "final decision recorded");
        Ok(stored)
    }
}

/// Guarded aggregate move: the target must be legal from the current status.
fn transition(
    case: &mut Case,
    to: CaseStatus,
    command: &'static str,
) -> Result<(), PreconditionFailure> {
    if !status::transition_allowed(case.status, to) {
        return Err(PreconditionFailure::TransitionNotAllowed {
            from: case.status,
            command,
        });
    }
    case.status = to;
    Ok(())
}

fn require_status(
    case: &Case,
    expected: CaseStatus,
    command: &'static str,
) -> Result<(), PreconditionFailure> {
    if case.status != expected {
        return Err(PreconditionFailure::TransitionNotAllowed {
            from: case.status,
            command,
        });
    }
    Ok(())
}

/// A command guard that did not hold. Distinct from `Violation`: these stop
/// one command, they are not data-completeness findings.
#[derive(Debug, thiserror::Error)]
pub enum PreconditionFailure {
    #[error("command {command} is not available from status {}", from.label())]
    TransitionNotAllowed {
        from: CaseStatus,
        command: &'static str,
    },
    #[error("the requested program does not exist in the catalog")]
    UnknownFormation,
    #[error("a refusal requires at least one refusal reason")]
    RefusalReasonsMissing,
    #[error("approval requirements not met (missing fields {missing_fields:?}, access title selected: {access_title_selected})")]
    ApprovalRequirementsNotMet {
        missing_fields: Vec<&'static str>,
        access_title_selected: bool,
    },
    #[error("the faculty verdict must be recorded before returning the case")]
    FacultyVerdictMissing,
    #[error("no communication template named {template}")]
    CommunicationArtifactMissing { template: String },
    #[error(transparent)]
    UnknownExperience(#[from] UnknownExperience),
}

/// Error raised by the coordinator.
#[derive(Debug, thiserror::Error)]
pub enum CaseServiceError {
    #[error("the case is incomplete: {0:?}")]
    Incomplete(Vec<Violation>),
    #[error(transparent)]
    Precondition(#[from] PreconditionFailure),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Notification(#[from] NotificationError),
    #[error(transparent)]
    Audit(#[from] AuditError),
    #[error(transparent)]
    Profile(#[from] ProfileError),
}
