use serde::{Deserialize, Serialize};

use super::domain::{AcademicYear, FormationId, ScholarshipId};

/// Program descriptor as exposed by the institution's catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formation {
    pub id: FormationId,
    pub title: String,
    pub campus: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scholarship {
    pub id: ScholarshipId,
    pub short_name: String,
}

/// Pure read services the engine queries for reference data.
pub trait ReferenceData: Send + Sync {
    /// The academic year currently open for intake. Validation deliberately
    /// keys off the case's formation year instead, so a case opened for one
    /// year is never re-judged against the next one.
    fn current_academic_year(&self) -> AcademicYear;
    fn formation(&self, id: &FormationId) -> Option<Formation>;
    fn scholarships(&self, ids: &[ScholarshipId]) -> Vec<Scholarship>;
}
