use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use super::super::domain::{AcademicYear, CaseStatus, CountryCode, LanguageCode};

/// Policy knobs backing the completeness rules.
///
/// The submission cap counts the candidate's other cases whose status is in
/// `cap_counted_statuses`; the exact membership of that set is deliberately
/// configurable rather than hard-coded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineConfig {
    pub max_open_cases: usize,
    pub cap_counted_statuses: Vec<CaseStatus>,
    pub domestic_country: CountryCode,
    pub eu_nationalities: BTreeSet<CountryCode>,
    /// Non-EU nationalities exempted from visa requirements on top of the
    /// EU set (the "EU+N" extension list).
    pub visa_exempt_extension: BTreeSet<CountryCode>,
    pub translation_exempt_languages: BTreeSet<LanguageCode>,
    /// First academic year from which credit counts are mandatory.
    pub credits_required_from: AcademicYear,
}

impl EngineConfig {
    /// Fee-reduction justification is required for candidates whose
    /// nationality is outside the EU set.
    pub fn assimilation_required(&self, nationality: &CountryCode) -> bool {
        nationality != &self.domestic_country && !self.eu_nationalities.contains(nationality)
    }

    /// Visa information is waived for domestic, EU, and extension-list
    /// nationalities.
    pub fn visa_exempt(&self, nationality: &CountryCode) -> bool {
        nationality == &self.domestic_country
            || self.eu_nationalities.contains(nationality)
            || self.visa_exempt_extension.contains(nationality)
    }

    pub fn translation_exempt(&self, language: &LanguageCode) -> bool {
        self.translation_exempt_languages.contains(language)
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        let eu = [
            "AT", "BE", "BG", "CY", "CZ", "DE", "DK", "EE", "ES", "FI", "FR", "GR", "HR", "HU",
            "IE", "IT", "LT", "LU", "LV", "MT", "NL", "PL", "PT", "RO", "SE", "SI", "SK",
        ];
        let extension = ["CH", "IS", "LI", "MC", "NO"];
        let languages = ["DE", "EN", "FR", "NL"];

        Self {
            max_open_cases: 2,
            cap_counted_statuses: vec![
                CaseStatus::Confirmed,
                CaseStatus::ToCompleteForFa,
                CaseStatus::CompletedForFa,
                CaseStatus::ToCompleteForCao,
                CaseStatus::CompletedForCao,
                CaseStatus::TreatmentByFa,
                CaseStatus::ReturnedFromFa,
                CaseStatus::TreatmentByCao,
            ],
            domestic_country: CountryCode::new("BE"),
            eu_nationalities: eu.iter().map(|code| CountryCode::new(code)).collect(),
            visa_exempt_extension: extension.iter().map(|code| CountryCode::new(code)).collect(),
            translation_exempt_languages: languages
                .iter()
                .map(|code| LanguageCode::new(code))
                .collect(),
            credits_required_from: AcademicYear(2004),
        }
    }
}
