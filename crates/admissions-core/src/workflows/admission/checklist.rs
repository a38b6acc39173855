use serde::{Deserialize, Serialize};

use super::domain::ExperienceId;
use super::profile::CandidateSnapshot;

/// Functional areas of case review, each tracked with its own sub-status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChecklistTab {
    PersonalData,
    Assimilation,
    Financeability,
    ApplicationFee,
    CourseChoice,
    PriorExperience,
    TrainingSpecificities,
    FacultyDecision,
    CaoDecision,
}

impl ChecklistTab {
    pub const fn ordered() -> [Self; 9] {
        [
            Self::PersonalData,
            Self::Assimilation,
            Self::Financeability,
            Self::ApplicationFee,
            Self::CourseChoice,
            Self::PriorExperience,
            Self::TrainingSpecificities,
            Self::FacultyDecision,
            Self::CaoDecision,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::PersonalData => "personal_data",
            Self::Assimilation => "assimilation",
            Self::Financeability => "financeability",
            Self::ApplicationFee => "application_fee",
            Self::CourseChoice => "course_choice",
            Self::PriorExperience => "prior_experience",
            Self::TrainingSpecificities => "training_specificities",
            Self::FacultyDecision => "faculty_decision",
            Self::CaoDecision => "cao_decision",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonalDataStatus {
    #[default]
    ToProcess,
    ToComplete {
        fraud: bool,
    },
    Validated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssimilationStatus {
    #[default]
    NotConcerned,
    DeclaredByCandidate,
    ToComplete,
    ExpertOpinion,
    ToCompleteAfterEnrolment,
    Validated,
}

/// Progress of a financeability dispensation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DispensationState {
    CandidateNotified,
    CandidateAbandoned,
    RefusedByFaculty,
    GrantedByFaculty,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceabilityBlockage {
    ToComplete,
    NotFinanceable,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FinanceabilityStatus {
    #[default]
    NotConcerned,
    ToProcess,
    ExpertOpinion,
    DispensationNeeded {
        state: DispensationState,
    },
    Blocked {
        reason: FinanceabilityBlockage,
    },
    DispensationGranted,
    Financeable,
}

/// Why the application-fee tab is blocked. `Closed` drives the aggregate
/// `Closed` projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FeeBlockage {
    MustPay,
    Closed,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationFeeStatus {
    #[default]
    ToProcess,
    Paid,
    Dispensed,
    Blocked {
        reason: FeeBlockage,
    },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CourseChoiceStatus {
    #[default]
    ToProcess,
    Validated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TrainingSpecificitiesStatus {
    #[default]
    ToProcess,
    Validated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PriorExperienceStatus {
    #[default]
    ToProcess,
    Insufficient,
    Sufficient,
}

/// Background verification of one experience's authenticity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthenticationState {
    Requested,
    InstitutionContacted,
    Confirmed,
    Forged,
}

/// Status of one prior-experience child entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceStatus {
    #[default]
    ToProcess,
    ToComplete,
    Authentication {
        state: AuthenticationState,
    },
    ExpertOpinion,
    ToCompleteAfterEnrolment,
    Validated,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FacultyDecisionStatus {
    #[default]
    ToProcess,
    TakenInCharge,
    ToCompleteByCao,
    Closed,
    Refusal,
    Approval,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaoDispensationState {
    Requested,
    Granted,
    Refused,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaoDecisionStatus {
    #[default]
    ToProcess,
    ToComplete,
    DispensationNeeded {
        state: CaoDispensationState,
    },
    RefusalToValidate,
    ApprovalToValidate,
    Closed,
    Refused,
    Approved,
}

/// Child entry of the prior-experience tab, keyed by the experience it
/// mirrors. A back-reference, not an ownership edge: the source experience
/// lives in the candidate profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceEntry {
    pub experience: ExperienceId,
    pub status: ExperienceStatus,
}

/// One checklist write, tagged by tab.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "tab", content = "status", rename_all = "snake_case")]
pub enum ChecklistEntry {
    PersonalData(PersonalDataStatus),
    Assimilation(AssimilationStatus),
    Financeability(FinanceabilityStatus),
    ApplicationFee(ApplicationFeeStatus),
    CourseChoice(CourseChoiceStatus),
    PriorExperience(PriorExperienceStatus),
    TrainingSpecificities(TrainingSpecificitiesStatus),
    FacultyDecision(FacultyDecisionStatus),
    CaoDecision(CaoDecisionStatus),
}

impl ChecklistEntry {
    pub const fn tab(&self) -> ChecklistTab {
        match self {
            ChecklistEntry::PersonalData(_) => ChecklistTab::PersonalData,
            ChecklistEntry::Assimilation(_) => ChecklistTab::Assimilation,
            ChecklistEntry::Financeability(_) => ChecklistTab::Financeability,
            ChecklistEntry::ApplicationFee(_) => ChecklistTab::ApplicationFee,
            ChecklistEntry::CourseChoice(_) => ChecklistTab::CourseChoice,
            ChecklistEntry::PriorExperience(_) => ChecklistTab::PriorExperience,
            ChecklistEntry::TrainingSpecificities(_) => ChecklistTab::TrainingSpecificities,
            ChecklistEntry::FacultyDecision(_) => ChecklistTab::FacultyDecision,
            ChecklistEntry::CaoDecision(_) => ChecklistTab::CaoDecision,
        }
    }
}

/// The per-case checklist: exactly one entry per tab at all times, plus the
/// ordered child entries of the prior-experience tab.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ChecklistDocument {
    pub personal_data: PersonalDataStatus,
    pub assimilation: AssimilationStatus,
    pub financeability: FinanceabilityStatus,
    pub application_fee: ApplicationFeeStatus,
    pub course_choice: CourseChoiceStatus,
    pub prior_experience: PriorExperienceStatus,
    pub experiences: Vec<ExperienceEntry>,
    pub training_specificities: TrainingSpecificitiesStatus,
    pub faculty_decision: FacultyDecisionStatus,
    pub cao_decision: CaoDecisionStatus,
}

impl ChecklistDocument {
    /// Apply one tab write. Idempotent: writing the same entry twice leaves
    /// the document identical to writing it once.
    pub fn apply(&mut self, entry: ChecklistEntry) {
        match entry {
            ChecklistEntry::PersonalData(status) => self.personal_data = status,
            ChecklistEntry::Assimilation(status) => self.assimilation = status,
            ChecklistEntry::Financeability(status) => self.financeability = status,
            ChecklistEntry::ApplicationFee(status) => self.application_fee = status,
            ChecklistEntry::CourseChoice(status) => self.course_choice = status,
            ChecklistEntry::PriorExperience(status) => self.prior_experience = status,
            ChecklistEntry::TrainingSpecificities(status) => self.training_specificities = status,
            ChecklistEntry::FacultyDecision(status) => self.faculty_decision = status,
            ChecklistEntry::CaoDecision(status) => self.cao_decision = status,
        }
    }

    pub fn experience(&self, id: &ExperienceId) -> Option<&ExperienceEntry> {
        self.experiences.iter().find(|entry| &entry.experience == id)
    }

    /// Update one child entry. The experience must exist in the checklist
    /// (reconcile first when the profile changed).
    pub fn set_experience_status(
        &mut self,
        id: &ExperienceId,
        status: ExperienceStatus,
    ) -> Result<(), UnknownExperience> {
        let entry = self
            .experiences
            .iter_mut()
            .find(|entry| &entry.experience == id)
            .ok_or_else(|| UnknownExperience(id.clone()))?;
        entry.status = status;
        Ok(())
    }

    /// Synchronize the prior-experience children against the candidate
    /// profile: new experiences get a default entry, entries whose source
    /// experience disappeared are dropped, surviving statuses are kept.
    /// Order follows the snapshot's experience chronology.
    pub fn reconcile(&mut self, snapshot: &CandidateSnapshot) {
        let mut reconciled = Vec::new();
        for id in snapshot.experience_ids_chronological() {
            let status = self
                .experience(&id)
                .map(|entry| entry.status)
                .unwrap_or_default();
            reconciled.push(ExperienceEntry {
                experience: id,
                status,
            });
        }
        self.experiences = reconciled;
    }
}

/// Raised when a checklist write targets an experience the case does not
/// track.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("experience {} is not part of this case's checklist", (self.0).0)]
pub struct UnknownExperience(pub ExperienceId);
