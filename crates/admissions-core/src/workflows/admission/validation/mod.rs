mod config;
mod rules;

pub use config::EngineConfig;

use serde::{Deserialize, Serialize};

use super::domain::{AcademicYear, Case, ExperienceId, LanguageCode, QuestionId};
use super::profile::{CandidateSnapshot, QuestionTab};

/// One reported instance of incomplete or invalid case data.
///
/// Returned, never thrown: a validation pass evaluates every rule and
/// collects every violation so the candidate sees all missing fields at
/// once. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, thiserror::Error)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Violation {
    // Assimilation / accounting family.
    #[error("the assimilation situation must be declared")]
    AssimilationSituationMissing,
    #[error("missing {document} for the {situation} assimilation situation")]
    AssimilationProofMissing {
        situation: &'static str,
        document: &'static str,
    },
    #[error("the bank account type must be specified")]
    BankAccountKindMissing,
    #[error("IBAN bank account details are incomplete: {missing:?}")]
    IbanDetailsIncomplete { missing: Vec<&'static str> },
    #[error("other-format bank account details are incomplete: {missing:?}")]
    OtherFormatDetailsIncomplete { missing: Vec<&'static str> },
    #[error("a certificate of absence of debt towards the attended institution is required")]
    InstituteDebtCertificateMissing,

    // Secondary-studies family.
    #[error("no secondary studies information was provided")]
    SecondaryStudiesMissing,
    #[error("the secondary diploma graduation state must be specified")]
    GraduationStateMissing,
    #[error("domestic secondary diploma data is incomplete: {missing:?}")]
    DomesticDiplomaIncomplete { missing: Vec<&'static str> },
    #[error("foreign secondary diploma data is incomplete: {missing:?}")]
    ForeignDiplomaIncomplete { missing: Vec<&'static str> },
    #[error("the linguistic regime of the foreign diploma must be specified")]
    LinguisticRegimeMissing,
    #[error("a translated diploma is required for the {} linguistic regime", language.0)]
    DiplomaTranslationMissing { language: LanguageCode },
    #[error("a translated transcript is required for the {} linguistic regime", language.0)]
    TranscriptTranslationMissing { language: LanguageCode },
    #[error("the admission exam certificate is required for the alternative equivalence path")]
    AdmissionExamCertificateMissing,

    // Curriculum / prior academic-experience family.
    #[error("a transcript is missing for experience {}", experience.0)]
    ExperienceTranscriptMissing {
        experience: ExperienceId,
        year: Option<AcademicYear>,
    },
    #[error("credit counts are missing for experience {} in {}", experience.0, year.0)]
    ExperienceCreditsMissing {
        experience: ExperienceId,
        year: AcademicYear,
    },
    #[error("a transcript translation is required for experience {} ({})", experience.0, language.0)]
    ExperienceTranslationMissing {
        experience: ExperienceId,
        language: LanguageCode,
    },

    // Specific-question family.
    #[error("required question {} is unanswered", question.0)]
    RequiredQuestionUnanswered {
        question: QuestionId,
        tab: QuestionTab,
    },

    // Visa family.
    #[error("a diplomatic post must be designated for the visa application")]
    VisaInformationMissing,

    // Submission-volume cap.
    #[error("the maximum of {limit} cases under way has been reached")]
    SubmissionCapReached { limit: usize },
}

impl Violation {
    /// Rule family a violation belongs to, used by exhaustiveness reporting.
    pub const fn family(&self) -> RuleFamily {
        match self {
            Violation::AssimilationSituationMissing
            | Violation::AssimilationProofMissing { .. }
            | Violation::BankAccountKindMissing
            | Violation::IbanDetailsIncomplete { .. }
            | Violation::OtherFormatDetailsIncomplete { .. }
            | Violation::InstituteDebtCertificateMissing => RuleFamily::Accounting,
            Violation::SecondaryStudiesMissing
            | Violation::GraduationStateMissing
            | Violation::DomesticDiplomaIncomplete { .. }
            | Violation::ForeignDiplomaIncomplete { .. }
            | Violation::LinguisticRegimeMissing
            | Violation::DiplomaTranslationMissing { .. }
            | Violation::TranscriptTranslationMissing { .. }
            | Violation::AdmissionExamCertificateMissing => RuleFamily::SecondaryStudies,
            Violation::ExperienceTranscriptMissing { .. }
            | Violation::ExperienceCreditsMissing { .. }
            | Violation::ExperienceTranslationMissing { .. } => RuleFamily::Curriculum,
            Violation::RequiredQuestionUnanswered { .. } => RuleFamily::SpecificQuestions,
            Violation::VisaInformationMissing => RuleFamily::Visa,
            Violation::SubmissionCapReached { .. } => RuleFamily::SubmissionCap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleFamily {
    Accounting,
    SecondaryStudies,
    Curriculum,
    SpecificQuestions,
    Visa,
    SubmissionCap,
}

/// Inputs a validation pass needs beyond the case and the snapshot. The
/// current academic year and the candidate's open-case count are injected so
/// every rule stays a pure function of its arguments.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationContext {
    pub academic_year: AcademicYear,
    pub question_tabs: Vec<QuestionTab>,
    pub open_case_count: usize,
}

impl ValidationContext {
    /// Submission-grade pass: every question tab in scope.
    pub fn for_submission(academic_year: AcademicYear, open_case_count: usize) -> Self {
        Self {
            academic_year,
            question_tabs: vec![
                QuestionTab::CourseChoice,
                QuestionTab::Curriculum,
                QuestionTab::SecondaryStudies,
                QuestionTab::AdditionalInformation,
            ],
            open_case_count,
        }
    }
}

/// Stateless rule engine evaluating the completeness rule set.
#[derive(Debug, Clone, Default)]
pub struct CompletenessValidator {
    config: EngineConfig,
}

impl CompletenessValidator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Evaluate every rule family and collect every violation; incomplete
    /// data is a return value here, never an error.
    pub fn validate(
        &self,
        case: &Case,
        snapshot: &CandidateSnapshot,
        context: &ValidationContext,
    ) -> Vec<Violation> {
        let mut violations = Vec::new();
        rules::accounting::check(&mut violations, snapshot, &self.config);
        rules::secondary::check(&mut violations, snapshot, &self.config);
        rules::curriculum::check(&mut violations, snapshot, &self.config);
        rules::questions::check(&mut violations, case, snapshot, context);
        rules::visa::check(&mut violations, snapshot, &self.config);
        rules::cap::check(&mut violations, context, &self.config);
        violations
    }
}
