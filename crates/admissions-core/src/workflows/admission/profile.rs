use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::domain::{
    AcademicYear, CandidateId, CaseId, CountryCode, DocumentRef, ExperienceId, ExperienceType,
    LanguageCode, QuestionId,
};

/// Nationality and residence facts the visa and assimilation rules consume.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identification {
    pub nationality: CountryCode,
    pub residence_country: CountryCode,
}

/// Whether the secondary-school diploma is already held.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GotDiploma {
    Yes,
    ThisYear,
    No,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomesticDiploma {
    pub institute: Option<String>,
    pub graduation_year: Option<AcademicYear>,
    pub certificate: Vec<DocumentRef>,
}

impl DomesticDiploma {
    pub fn is_blank(&self) -> bool {
        self.institute.is_none() && self.graduation_year.is_none() && self.certificate.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForeignDiploma {
    pub country: CountryCode,
    pub linguistic_regime: Option<LanguageCode>,
    pub certificate: Vec<DocumentRef>,
    pub transcript: Vec<DocumentRef>,
    pub certificate_translation: Vec<DocumentRef>,
    pub transcript_translation: Vec<DocumentRef>,
}

impl ForeignDiploma {
    pub fn is_blank(&self) -> bool {
        self.linguistic_regime.is_none()
            && self.certificate.is_empty()
            && self.transcript.is_empty()
            && self.certificate_translation.is_empty()
            && self.transcript_translation.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryDiploma {
    Domestic(DomesticDiploma),
    Foreign(ForeignDiploma),
}

/// First-cycle admission exam: the alternative equivalence path for
/// candidates without a secondary diploma.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AdmissionExam {
    pub certificate: Vec<DocumentRef>,
    pub year: Option<AcademicYear>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecondaryStudies {
    pub got_diploma: Option<GotDiploma>,
    pub diploma: Option<SecondaryDiploma>,
    pub admission_exam: Option<AdmissionExam>,
}

/// How transcripts were declared for an academic experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TranscriptMode {
    OnePerYear,
    Global,
}

/// Credit regime declared for a foreign academic experience.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationSystem {
    EctsCredits,
    NonEuropeanCredits,
    NoCredits,
}

/// One enrolled year inside an academic experience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExperienceYear {
    pub year: AcademicYear,
    pub transcript: Vec<DocumentRef>,
    pub transcript_translation: Vec<DocumentRef>,
    pub registered_credits: Option<u32>,
    pub acquired_credits: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicExperience {
    pub id: ExperienceId,
    pub institute: String,
    pub country: CountryCode,
    pub program: String,
    pub start_year: AcademicYear,
    pub end_year: AcademicYear,
    pub obtained_diploma: bool,
    pub transcript_mode: TranscriptMode,
    pub global_transcript: Vec<DocumentRef>,
    pub global_transcript_translation: Vec<DocumentRef>,
    pub evaluation_system: EvaluationSystem,
    pub instruction_language: LanguageCode,
    pub years: Vec<ExperienceYear>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActivityType {
    Work,
    Internship,
    Volunteering,
    Unemployment,
    LanguageTravel,
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NonAcademicExperience {
    pub id: ExperienceId,
    pub activity: ActivityType,
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub certificate: Vec<DocumentRef>,
}

/// Tuition-fee-reduction entitlement declared by the candidate, with the
/// proof documents specific to each sub-branch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssimilationSituation {
    LongTermResidence {
        resident_card: Vec<DocumentRef>,
    },
    RefugeeOrStateless {
        refugee_card: Vec<DocumentRef>,
        registration_certificate: Vec<DocumentRef>,
    },
    ProfessionalResidence {
        residence_permit: Vec<DocumentRef>,
        salary_slips: Vec<DocumentRef>,
    },
    CpasSupport {
        cpas_certificate: Vec<DocumentRef>,
    },
    ParentalTie {
        household_composition: Vec<DocumentRef>,
        parent_residence_proof: Vec<DocumentRef>,
    },
    ScholarshipHolder {
        scholarship_decision: Vec<DocumentRef>,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BankAccountKind {
    Iban,
    OtherFormat,
    NoAccount,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BankAccount {
    pub kind: Option<BankAccountKind>,
    pub iban: Option<String>,
    pub other_format_number: Option<String>,
    pub bic: Option<String>,
    pub holder_first_name: Option<String>,
    pub holder_last_name: Option<String>,
}

/// Accounting and assimilation facts for the fee-reduction rules.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Accounting {
    pub situation: Option<AssimilationSituation>,
    pub bank_account: BankAccount,
    pub recently_attended_domestic_institute: Option<bool>,
    pub institute_debt_certificate: Vec<DocumentRef>,
}

/// Checklist areas a specific question can be bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestionTab {
    CourseChoice,
    Curriculum,
    SecondaryStudies,
    AdditionalInformation,
}

/// A dynamically configured question bound to a case, tab, and academic year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecificQuestion {
    pub id: QuestionId,
    pub tab: QuestionTab,
    pub required: bool,
    pub label: String,
}

/// Read-only resume of the candidate for one case and academic year: the
/// single consistency point every validation pass evaluates against.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CandidateSnapshot {
    pub candidate: CandidateId,
    pub academic_year: AcademicYear,
    pub identification: Identification,
    pub secondary_studies: SecondaryStudies,
    pub academic_experiences: Vec<AcademicExperience>,
    pub non_academic_experiences: Vec<NonAcademicExperience>,
    pub accounting: Accounting,
    pub questions: Vec<SpecificQuestion>,
    pub diplomatic_post: Option<String>,
    pub answers: BTreeMap<QuestionId, String>,
}

impl CandidateSnapshot {
    /// Experience ids in the case's natural chronology, most recent first:
    /// academic experiences by last enrolled year, then non-academic
    /// experiences by end date.
    pub fn experience_ids_chronological(&self) -> Vec<ExperienceId> {
        let mut academic: Vec<&AcademicExperience> = self.academic_experiences.iter().collect();
        academic.sort_by(|a, b| b.end_year.cmp(&a.end_year));

        let mut non_academic: Vec<&NonAcademicExperience> =
            self.non_academic_experiences.iter().collect();
        non_academic.sort_by(|a, b| b.end.cmp(&a.end));

        academic
            .into_iter()
            .map(|experience| experience.id.clone())
            .chain(non_academic.into_iter().map(|experience| experience.id.clone()))
            .collect()
    }

    pub fn contains_experience(&self, id: &ExperienceId, kind: ExperienceType) -> bool {
        match kind {
            ExperienceType::Academic => self
                .academic_experiences
                .iter()
                .any(|experience| &experience.id == id),
            ExperienceType::NonAcademic => self
                .non_academic_experiences
                .iter()
                .any(|experience| &experience.id == id),
        }
    }

    /// Professional activity recognized as supporting the alternative
    /// secondary-studies equivalence path.
    pub fn has_supporting_professional_experience(&self) -> bool {
        self.non_academic_experiences
            .iter()
            .any(|experience| matches!(experience.activity, ActivityType::Work | ActivityType::Internship))
    }
}

/// Read access to candidate resumes.
pub trait CandidateProfileProvider: Send + Sync {
    fn resume(&self, case: &CaseId, year: AcademicYear) -> Result<CandidateSnapshot, ProfileError>;
}

#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("no resume found for this case")]
    NotFound,
    #[error("profile provider unavailable: {0}")]
    Unavailable(String),
}
