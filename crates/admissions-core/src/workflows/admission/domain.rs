use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::checklist::ChecklistDocument;
use super::titles::AccessTitleSelector;

/// Identifier wrapper for admission cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CaseId(pub String);

/// Identifier of the candidate owning one or more cases.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CandidateId(pub String);

/// Identifier of a declared curriculum experience (academic or not).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExperienceId(pub String);

/// Identifier of a dynamically configured specific question.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct QuestionId(pub String);

/// Academic year designated by its starting civil year (2024 means 2024-25).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct AcademicYear(pub i32);

impl AcademicYear {
    pub fn label(self) -> String {
        format!("{}-{}", self.0, self.0 + 1)
    }
}

/// Program identity: acronym plus the academic year the case targets.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormationId {
    pub acronym: String,
    pub year: AcademicYear,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ScholarshipId(pub String);

/// ISO 3166-1 alpha-2 country code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CountryCode(pub String);

impl CountryCode {
    pub fn new(code: &str) -> Self {
        Self(code.to_ascii_uppercase())
    }
}

/// ISO 639-1 language code for linguistic regimes and instruction languages.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LanguageCode(pub String);

impl LanguageCode {
    pub fn new(code: &str) -> Self {
        Self(code.to_ascii_uppercase())
    }
}

/// Opaque token referencing a stored document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef(pub String);

/// Aggregate status of an admission case.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CaseStatus {
    Draft,
    Confirmed,
    ToCompleteForFa,
    CompletedForFa,
    ToCompleteForCao,
    CompletedForCao,
    TreatmentByFa,
    ReturnedFromFa,
    TreatmentByCao,
    Accepted,
    Refused,
    Closed,
    Cancelled,
}

impl CaseStatus {
    pub const fn label(self) -> &'static str {
        match self {
            CaseStatus::Draft => "draft",
            CaseStatus::Confirmed => "confirmed",
            CaseStatus::ToCompleteForFa => "to_complete_for_fa",
            CaseStatus::CompletedForFa => "completed_for_fa",
            CaseStatus::ToCompleteForCao => "to_complete_for_cao",
            CaseStatus::CompletedForCao => "completed_for_cao",
            CaseStatus::TreatmentByFa => "treatment_by_fa",
            CaseStatus::ReturnedFromFa => "returned_from_fa",
            CaseStatus::TreatmentByCao => "treatment_by_cao",
            CaseStatus::Accepted => "accepted",
            CaseStatus::Refused => "refused",
            CaseStatus::Closed => "closed",
            CaseStatus::Cancelled => "cancelled",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(
            self,
            CaseStatus::Accepted | CaseStatus::Refused | CaseStatus::Closed | CaseStatus::Cancelled
        )
    }
}

/// Kinds of curriculum entries that can serve as a legal basis of admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExperienceType {
    Academic,
    NonAcademic,
}

/// A reason given when refusing a case: a catalog entry or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RefusalReason {
    Predefined { code: String },
    Custom { text: String },
}

/// A condition attached to an approval: catalog entry or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalCondition {
    Predefined { code: String },
    Custom { text: String },
}

/// Form filled by the faculty authority when it approves a case.
///
/// `missing_fields` drives the combined approval precondition: approval may
/// only be recorded once every required field is populated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FacultyApprovalDetails {
    pub program_contact_name: String,
    pub program_contact_email: String,
    pub with_additional_conditions: bool,
    pub additional_conditions: Vec<ApprovalCondition>,
    pub with_prerequisite_courses: bool,
    pub prerequisite_courses: Vec<String>,
}

impl FacultyApprovalDetails {
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.program_contact_name.trim().is_empty() {
            missing.push("program_contact_name");
        }
        if self.program_contact_email.trim().is_empty() {
            missing.push("program_contact_email");
        }
        if self.with_additional_conditions && self.additional_conditions.is_empty() {
            missing.push("additional_conditions");
        }
        if self.with_prerequisite_courses && self.prerequisite_courses.is_empty() {
            missing.push("prerequisite_courses");
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

/// One candidate's application to one program for one academic year.
///
/// Mutated only through the named workflow commands of the coordinator;
/// never deleted, terminal states are retained for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Case {
    pub id: CaseId,
    pub candidate: CandidateId,
    pub formation: FormationId,
    pub status: CaseStatus,
    pub reference: String,
    pub submitted_at: Option<DateTime<Utc>>,
    pub checklist: ChecklistDocument,
    pub access_titles: AccessTitleSelector,
    pub refusal_reasons: Vec<RefusalReason>,
    pub faculty_approval: Option<FacultyApprovalDetails>,
    pub specific_answers: BTreeMap<QuestionId, String>,
    pub version: u64,
}

impl Case {
    pub fn initiate(
        id: CaseId,
        candidate: CandidateId,
        formation: FormationId,
        reference: String,
    ) -> Self {
        Self {
            id,
            candidate,
            formation,
            status: CaseStatus::Draft,
            reference,
            submitted_at: None,
            checklist: ChecklistDocument::default(),
            access_titles: AccessTitleSelector::default(),
            refusal_reasons: Vec::new(),
            faculty_approval: None,
            specific_answers: BTreeMap::new(),
            version: 0,
        }
    }

    /// Replace the refusal reasons wholesale; decision commands never patch
    /// the list incrementally.
    pub fn specify_refusal_reasons(&mut self, reasons: Vec<RefusalReason>) {
        self.refusal_reasons = reasons;
    }

    /// Replace the faculty approval form wholesale.
    pub fn specify_faculty_approval(&mut self, details: FacultyApprovalDetails) {
        self.faculty_approval = Some(details);
    }

    pub fn record_submission(&mut self, at: DateTime<Utc>) {
        self.submitted_at = Some(at);
    }
}
