//! Admission case workflow: one candidate's application to one program,
//! reviewed tab by tab and decided through the faculty/central-authority
//! hand-off.

pub mod checklist;
pub mod domain;
pub mod profile;
pub mod reference;
pub mod repository;
pub mod router;
pub mod service;
pub mod status;
pub mod titles;
pub mod validation;

#[cfg(test)]
mod tests;

pub use checklist::{
    ApplicationFeeStatus, AssimilationStatus, AuthenticationState, CaoDecisionStatus,
    CaoDispensationState, ChecklistDocument, ChecklistEntry, ChecklistTab, CourseChoiceStatus,
    DispensationState, ExperienceEntry, ExperienceStatus, FacultyDecisionStatus, FeeBlockage,
    FinanceabilityBlockage, FinanceabilityStatus, PersonalDataStatus, PriorExperienceStatus,
    TrainingSpecificitiesStatus, UnknownExperience,
};
pub use domain::{
    AcademicYear, ApprovalCondition, CandidateId, Case, CaseId, CaseStatus, CountryCode,
    DocumentRef, ExperienceId, ExperienceType, FacultyApprovalDetails, FormationId, LanguageCode,
    QuestionId, RefusalReason, ScholarshipId,
};
pub use profile::{
    AcademicExperience, Accounting, ActivityType, AdmissionExam, AssimilationSituation,
    BankAccount, BankAccountKind, CandidateProfileProvider, CandidateSnapshot, DomesticDiploma,
    EvaluationSystem, ExperienceYear, ForeignDiploma, GotDiploma, Identification,
    NonAcademicExperience, ProfileError, QuestionTab, SecondaryDiploma, SecondaryStudies,
    SpecificQuestion, TranscriptMode,
};
pub use reference::{Formation, ReferenceData, Scholarship};
pub use repository::{
    AuditEntry, AuditError, AuditTrail, CaseRepository, CaseStatusView, NotificationError,
    NotificationGateway, RenderedMessage, RepositoryError,
};
pub use router::admission_router;
pub use service::{AdmissionCaseService, CaseServiceError, PreconditionFailure};
pub use titles::{AccessTitle, AccessTitleKey, AccessTitleSelector};
pub use validation::{
    CompletenessValidator, EngineConfig, RuleFamily, ValidationContext, Violation,
};
