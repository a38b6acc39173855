use super::super::super::domain::Case;
use super::super::super::profile::CandidateSnapshot;
use super::super::{ValidationContext, Violation};

/// Required specific questions must be answered for every tab in scope. An
/// answer may live on the case or on the candidate resume; a blank string
/// counts as unanswered either way.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    case: &Case,
    snapshot: &CandidateSnapshot,
    context: &ValidationContext,
) {
    for question in &snapshot.questions {
        if !question.required || !context.question_tabs.contains(&question.tab) {
            continue;
        }
        let answered = case
            .specific_answers
            .get(&question.id)
            .or_else(|| snapshot.answers.get(&question.id))
            .is_some_and(|answer| !answer.trim().is_empty());
        if !answered {
            violations.push(Violation::RequiredQuestionUnanswered {
                question: question.id.clone(),
                tab: question.tab,
            });
        }
    }
}
