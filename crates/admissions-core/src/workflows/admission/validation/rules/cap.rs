use super::super::{EngineConfig, ValidationContext, Violation};

/// Submission-volume cap: the candidate may not push another case past the
/// configured ceiling of cases under way. The count of other cases in
/// counted statuses is injected by the caller.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    context: &ValidationContext,
    config: &EngineConfig,
) {
    if context.open_case_count >= config.max_open_cases {
        violations.push(Violation::SubmissionCapReached {
            limit: config.max_open_cases,
        });
    }
}
