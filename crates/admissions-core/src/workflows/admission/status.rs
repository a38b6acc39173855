use super::checklist::{
    ApplicationFeeStatus, CaoDecisionStatus, ChecklistDocument, FacultyDecisionStatus, FeeBlockage,
};
use super::domain::CaseStatus;

/// Targets legally reachable from a given aggregate status. A transition is
/// legal only when the target appears here and the command-specific guard
/// holds; anything else must fail without mutating the case.
pub fn legal_targets(from: CaseStatus) -> &'static [CaseStatus] {
    use CaseStatus::*;
    match from {
        Draft => &[Confirmed, Cancelled],
        Confirmed => &[
            ToCompleteForFa,
            ToCompleteForCao,
            TreatmentByFa,
            TreatmentByCao,
            Closed,
            Cancelled,
        ],
        ToCompleteForFa => &[CompletedForFa, Closed, Cancelled],
        CompletedForFa => &[TreatmentByFa, ToCompleteForFa, Closed, Cancelled],
        ToCompleteForCao => &[CompletedForCao, Closed, Cancelled],
        CompletedForCao => &[TreatmentByFa, TreatmentByCao, ToCompleteForCao, Closed, Cancelled],
        TreatmentByFa => &[ReturnedFromFa, ToCompleteForFa, ToCompleteForCao, Cancelled],
        ReturnedFromFa => &[TreatmentByCao, TreatmentByFa, ToCompleteForCao, Cancelled],
        TreatmentByCao => &[Accepted, Refused, Closed, ToCompleteForCao, Cancelled],
        Accepted | Refused | Closed | Cancelled => &[],
    }
}

pub fn transition_allowed(from: CaseStatus, to: CaseStatus) -> bool {
    legal_targets(from).contains(&to)
}

/// Project the aggregate status from the checklist document.
///
/// The aggregate is never hand-set when a tab changes: commands write the
/// tab, then recompute the aggregate here and run it through the legality
/// check. Returns `current` when no tab combination forces a move.
pub fn derive(checklist: &ChecklistDocument, current: CaseStatus) -> CaseStatus {
    if current.is_terminal() {
        return current;
    }

    // A closed application-fee blockage closes the whole case.
    if let ApplicationFeeStatus::Blocked {
        reason: FeeBlockage::Closed,
    } = checklist.application_fee
    {
        return CaseStatus::Closed;
    }

    match checklist.cao_decision {
        CaoDecisionStatus::Approved => return CaseStatus::Accepted,
        CaoDecisionStatus::Refused => return CaseStatus::Refused,
        CaoDecisionStatus::Closed => return CaseStatus::Closed,
        CaoDecisionStatus::ToComplete => return CaseStatus::ToCompleteForCao,
        CaoDecisionStatus::RefusalToValidate
        | CaoDecisionStatus::ApprovalToValidate
        | CaoDecisionStatus::DispensationNeeded { .. }
            if current == CaseStatus::ReturnedFromFa || current == CaseStatus::CompletedForCao =>
        {
            return CaseStatus::TreatmentByCao;
        }
        _ => {}
    }

    match checklist.faculty_decision {
        FacultyDecisionStatus::ToCompleteByCao => return CaseStatus::ToCompleteForCao,
        FacultyDecisionStatus::TakenInCharge
            if matches!(
                current,
                CaseStatus::Confirmed | CaseStatus::CompletedForFa | CaseStatus::CompletedForCao
            ) =>
        {
            return CaseStatus::TreatmentByFa;
        }
        _ => {}
    }

    current
}
