use super::super::super::profile::{
    AcademicExperience, CandidateSnapshot, EvaluationSystem, TranscriptMode,
};
use super::super::{EngineConfig, Violation};

/// Prior academic-experience completeness: transcripts per the declared
/// transcript mode, translations for non-exempt instruction languages, and
/// credit counts from the year the credit regime became mandatory.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    snapshot: &CandidateSnapshot,
    config: &EngineConfig,
) {
    for experience in &snapshot.academic_experiences {
        check_transcripts(violations, experience, config);
        check_credits(violations, experience, config);
    }
}

fn check_transcripts(
    violations: &mut Vec<Violation>,
    experience: &AcademicExperience,
    config: &EngineConfig,
) {
    let translation_needed = !config.translation_exempt(&experience.instruction_language);

    match experience.transcript_mode {
        TranscriptMode::Global => {
            if experience.global_transcript.is_empty() {
                violations.push(Violation::ExperienceTranscriptMissing {
                    experience: experience.id.clone(),
                    year: None,
                });
            }
            if translation_needed && experience.global_transcript_translation.is_empty() {
                violations.push(Violation::ExperienceTranslationMissing {
                    experience: experience.id.clone(),
                    language: experience.instruction_language.clone(),
                });
            }
        }
        TranscriptMode::OnePerYear => {
            let mut translation_missing = false;
            for year in &experience.years {
                if year.transcript.is_empty() {
                    violations.push(Violation::ExperienceTranscriptMissing {
                        experience: experience.id.clone(),
                        year: Some(year.year),
                    });
                }
                if translation_needed && year.transcript_translation.is_empty() {
                    translation_missing = true;
                }
            }
            if translation_missing {
                violations.push(Violation::ExperienceTranslationMissing {
                    experience: experience.id.clone(),
                    language: experience.instruction_language.clone(),
                });
            }
        }
    }
}

fn check_credits(
    violations: &mut Vec<Violation>,
    experience: &AcademicExperience,
    config: &EngineConfig,
) {
    if matches!(experience.evaluation_system, EvaluationSystem::NoCredits) {
        return;
    }
    for year in &experience.years {
        if year.year < config.credits_required_from {
            continue;
        }
        if year.registered_credits.is_none() || year.acquired_credits.is_none() {
            violations.push(Violation::ExperienceCreditsMissing {
                experience: experience.id.clone(),
                year: year.year,
            });
        }
    }
}
