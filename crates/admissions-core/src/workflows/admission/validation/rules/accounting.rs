use super::super::super::domain::DocumentRef;
use super::super::super::profile::{AssimilationSituation, BankAccountKind, CandidateSnapshot};
use super::super::{EngineConfig, Violation};

/// Assimilation and accounting completeness. The whole family applies only
/// when the candidate's nationality requires a justification of tuition-fee
/// reduction; each sub-branch then demands its own proofs and the bank
/// account must be populated per its declared type.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    snapshot: &CandidateSnapshot,
    config: &EngineConfig,
) {
    if !config.assimilation_required(&snapshot.identification.nationality) {
        return;
    }

    match &snapshot.accounting.situation {
        None => violations.push(Violation::AssimilationSituationMissing),
        Some(situation) => check_situation_proofs(violations, situation),
    }

    check_bank_account(violations, snapshot);

    if snapshot.accounting.recently_attended_domestic_institute == Some(true)
        && snapshot.accounting.institute_debt_certificate.is_empty()
    {
        violations.push(Violation::InstituteDebtCertificateMissing);
    }
}

fn check_situation_proofs(violations: &mut Vec<Violation>, situation: &AssimilationSituation) {
    let mut require = |situation: &'static str, document: &'static str, docs: &[DocumentRef]| {
        if docs.is_empty() {
            violations.push(Violation::AssimilationProofMissing {
                situation,
                document,
            });
        }
    };

    match situation {
        AssimilationSituation::LongTermResidence { resident_card } => {
            require("long_term_residence", "resident_card", resident_card);
        }
        AssimilationSituation::RefugeeOrStateless {
            refugee_card,
            registration_certificate,
        } => {
            require("refugee_or_stateless", "refugee_card", refugee_card);
            require(
                "refugee_or_stateless",
                "registration_certificate",
                registration_certificate,
            );
        }
        AssimilationSituation::ProfessionalResidence {
            residence_permit,
            salary_slips,
        } => {
            require("professional_residence", "residence_permit", residence_permit);
            require("professional_residence", "salary_slips", salary_slips);
        }
        AssimilationSituation::CpasSupport { cpas_certificate } => {
            require("cpas_support", "cpas_certificate", cpas_certificate);
        }
        AssimilationSituation::ParentalTie {
            household_composition,
            parent_residence_proof,
        } => {
            require("parental_tie", "household_composition", household_composition);
            require("parental_tie", "parent_residence_proof", parent_residence_proof);
        }
        AssimilationSituation::ScholarshipHolder {
            scholarship_decision,
        } => {
            require("scholarship_holder", "scholarship_decision", scholarship_decision);
        }
    }
}

fn check_bank_account(violations: &mut Vec<Violation>, snapshot: &CandidateSnapshot) {
    let account = &snapshot.accounting.bank_account;
    match account.kind {
        None => violations.push(Violation::BankAccountKindMissing),
        Some(BankAccountKind::Iban) => {
            let mut missing = Vec::new();
            if account.iban.as_deref().map_or(true, str::is_empty) {
                missing.push("iban");
            }
            if account.holder_first_name.as_deref().map_or(true, str::is_empty) {
                missing.push("holder_first_name");
            }
            if account.holder_last_name.as_deref().map_or(true, str::is_empty) {
                missing.push("holder_last_name");
            }
            if !missing.is_empty() {
                violations.push(Violation::IbanDetailsIncomplete { missing });
            }
        }
        Some(BankAccountKind::OtherFormat) => {
            let mut missing = Vec::new();
            if account.other_format_number.as_deref().map_or(true, str::is_empty) {
                missing.push("other_format_number");
            }
            if account.bic.as_deref().map_or(true, str::is_empty) {
                missing.push("bic");
            }
            if account.holder_first_name.as_deref().map_or(true, str::is_empty) {
                missing.push("holder_first_name");
            }
            if account.holder_last_name.as_deref().map_or(true, str::is_empty) {
                missing.push("holder_last_name");
            }
            if !missing.is_empty() {
                violations.push(Violation::OtherFormatDetailsIncomplete { missing });
            }
        }
        Some(BankAccountKind::NoAccount) => {}
    }
}
