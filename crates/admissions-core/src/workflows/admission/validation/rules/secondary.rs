use super::super::super::profile::{
    CandidateSnapshot, DomesticDiploma, ForeignDiploma, GotDiploma, SecondaryDiploma,
    SecondaryStudies,
};
use super::super::{EngineConfig, Violation};

/// Secondary-studies completeness. An entirely blank record yields one
/// aggregate violation instead of a field-by-field cascade; a started record
/// is checked field by field along the branch the candidate declared.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    snapshot: &CandidateSnapshot,
    config: &EngineConfig,
) {
    let studies = &snapshot.secondary_studies;

    match studies.got_diploma {
        None => {
            if is_untouched(studies) {
                violations.push(Violation::SecondaryStudiesMissing);
            } else {
                violations.push(Violation::GraduationStateMissing);
            }
        }
        Some(GotDiploma::Yes) | Some(GotDiploma::ThisYear) => match &studies.diploma {
            None => violations.push(Violation::SecondaryStudiesMissing),
            Some(SecondaryDiploma::Domestic(diploma)) => {
                check_domestic(violations, diploma);
            }
            Some(SecondaryDiploma::Foreign(diploma)) => {
                check_foreign(violations, diploma, config);
            }
        },
        Some(GotDiploma::No) => {
            // The alternative equivalence path: an admission exam, waived
            // when a recognized professional experience supports access.
            if snapshot.has_supporting_professional_experience() {
                return;
            }
            let exam_certified = studies
                .admission_exam
                .as_ref()
                .is_some_and(|exam| !exam.certificate.is_empty());
            if !exam_certified {
                violations.push(Violation::AdmissionExamCertificateMissing);
            }
        }
    }
}

fn is_untouched(studies: &SecondaryStudies) -> bool {
    let diploma_blank = match &studies.diploma {
        None => true,
        Some(SecondaryDiploma::Domestic(diploma)) => diploma.is_blank(),
        Some(SecondaryDiploma::Foreign(diploma)) => diploma.is_blank(),
    };
    let exam_blank = studies
        .admission_exam
        .as_ref()
        .is_none_or(|exam| exam.certificate.is_empty() && exam.year.is_none());
    diploma_blank && exam_blank
}

fn check_domestic(violations: &mut Vec<Violation>, diploma: &DomesticDiploma) {
    if diploma.is_blank() {
        violations.push(Violation::SecondaryStudiesMissing);
        return;
    }
    let mut missing = Vec::new();
    if diploma.institute.as_deref().map_or(true, str::is_empty) {
        missing.push("institute");
    }
    if diploma.graduation_year.is_none() {
        missing.push("graduation_year");
    }
    if diploma.certificate.is_empty() {
        missing.push("certificate");
    }
    if !missing.is_empty() {
        violations.push(Violation::DomesticDiplomaIncomplete { missing });
    }
}

fn check_foreign(violations: &mut Vec<Violation>, diploma: &ForeignDiploma, config: &EngineConfig) {
    if diploma.is_blank() {
        violations.push(Violation::SecondaryStudiesMissing);
        return;
    }

    let Some(regime) = &diploma.linguistic_regime else {
        violations.push(Violation::LinguisticRegimeMissing);
        return;
    };

    if config.translation_exempt(regime) {
        let mut missing = Vec::new();
        if diploma.certificate.is_empty() {
            missing.push("certificate");
        }
        if diploma.transcript.is_empty() {
            missing.push("transcript");
        }
        if !missing.is_empty() {
            violations.push(Violation::ForeignDiplomaIncomplete { missing });
        }
    } else {
        // Outside the exempt regimes the translated documents are the ones
        // the file is judged on.
        if diploma.certificate_translation.is_empty() {
            violations.push(Violation::DiplomaTranslationMissing {
                language: regime.clone(),
            });
        }
        if diploma.transcript_translation.is_empty() {
            violations.push(Violation::TranscriptTranslationMissing {
                language: regime.clone(),
            });
        }
    }
}
