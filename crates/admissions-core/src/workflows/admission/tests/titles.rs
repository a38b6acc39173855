use super::common::*;
use crate::workflows::admission::domain::{ExperienceId, ExperienceType};
use crate::workflows::admission::titles::AccessTitleSelector;

#[test]
fn selectable_titles_follow_the_experience_chronology() {
    let selector = AccessTitleSelector::default();
    let titles = selector.selectable_titles(&complete_snapshot());

    let ids: Vec<_> = titles.iter().map(|title| title.experience.0.as_str()).collect();
    assert_eq!(ids, vec!["exp-ac-1", "exp-na-1"]);
}

#[test]
fn diploma_and_professional_activity_make_titles_valid() {
    let selector = AccessTitleSelector::default();
    let titles = selector.selectable_titles(&complete_snapshot());
    assert!(titles.iter().all(|title| title.valid_for_admission));

    let mut snapshot = complete_snapshot();
    snapshot.academic_experiences[0].obtained_diploma = false;
    let titles = selector.selectable_titles(&snapshot);
    let academic = titles
        .iter()
        .find(|title| title.kind == ExperienceType::Academic)
        .expect("academic title listed");
    assert!(!academic.valid_for_admission);
}

#[test]
fn selection_is_idempotent() {
    let mut selector = AccessTitleSelector::default();
    selector.select(
        ExperienceId("exp-ac-1".to_string()),
        ExperienceType::Academic,
        true,
    );
    let once = selector.clone();
    selector.select(
        ExperienceId("exp-ac-1".to_string()),
        ExperienceType::Academic,
        true,
    );
    assert_eq!(selector, once);
}

#[test]
fn stale_selections_are_excluded_at_read_time() {
    let mut selector = AccessTitleSelector::default();
    selector.select(
        ExperienceId("exp-na-1".to_string()),
        ExperienceType::NonAcademic,
        true,
    );

    let snapshot = complete_snapshot();
    assert!(selector.has_selection(&snapshot));

    // The experience disappears from the profile: the selection record
    // stays but stops being visible.
    let mut shrunk = snapshot;
    shrunk.non_academic_experiences.clear();
    assert!(!selector.has_selection(&shrunk));
    assert!(selector.selected_titles(&shrunk).is_empty());
}
