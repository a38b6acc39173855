use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::domain::{ExperienceId, ExperienceType};
use super::profile::{ActivityType, CandidateSnapshot};

/// Key of one selectable access title.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AccessTitleKey {
    pub experience: ExperienceId,
    pub kind: ExperienceType,
}

/// A prior experience designated (or designatable) as the legal basis of
/// admission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessTitle {
    pub experience: ExperienceId,
    pub kind: ExperienceType,
    pub selected: bool,
    pub valid_for_admission: bool,
}

/// Selection state of the case's access titles.
///
/// Selection records are not pruned when an experience disappears from the
/// candidate profile; stale records are excluded at read time instead, so
/// deleting one aggregate never mutates another.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccessTitleSelector {
    selections: BTreeMap<AccessTitleKey, bool>,
}

impl AccessTitleSelector {
    /// Idempotent toggle of one experience's selection flag.
    pub fn select(&mut self, experience: ExperienceId, kind: ExperienceType, selected: bool) {
        self.selections
            .insert(AccessTitleKey { experience, kind }, selected);
    }

    fn is_selected(&self, experience: &ExperienceId, kind: ExperienceType) -> bool {
        self.selections
            .get(&AccessTitleKey {
                experience: experience.clone(),
                kind,
            })
            .copied()
            .unwrap_or(false)
    }

    /// Every title the candidate could designate, in the case's experience
    /// chronology (most recent first), with the current selection flags.
    /// Experiences no longer present in the snapshot are omitted even when a
    /// stale selection record remains.
    pub fn selectable_titles(&self, snapshot: &CandidateSnapshot) -> Vec<AccessTitle> {
        let mut academic: Vec<_> = snapshot.academic_experiences.iter().collect();
        academic.sort_by(|a, b| b.end_year.cmp(&a.end_year));

        let mut non_academic: Vec<_> = snapshot.non_academic_experiences.iter().collect();
        non_academic.sort_by(|a, b| b.end.cmp(&a.end));

        let mut titles = Vec::new();
        for experience in academic {
            titles.push(AccessTitle {
                experience: experience.id.clone(),
                kind: ExperienceType::Academic,
                selected: self.is_selected(&experience.id, ExperienceType::Academic),
                valid_for_admission: experience.obtained_diploma,
            });
        }
        for experience in non_academic {
            titles.push(AccessTitle {
                experience: experience.id.clone(),
                kind: ExperienceType::NonAcademic,
                selected: self.is_selected(&experience.id, ExperienceType::NonAcademic),
                valid_for_admission: matches!(
                    experience.activity,
                    ActivityType::Work | ActivityType::Internship
                ),
            });
        }
        titles
    }

    /// The currently selected titles, stale selections excluded.
    pub fn selected_titles(&self, snapshot: &CandidateSnapshot) -> Vec<AccessTitle> {
        self.selectable_titles(snapshot)
            .into_iter()
            .filter(|title| title.selected)
            .collect()
    }

    pub fn has_selection(&self, snapshot: &CandidateSnapshot) -> bool {
        !self.selected_titles(snapshot).is_empty()
    }
}
