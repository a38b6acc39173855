use super::super::super::profile::CandidateSnapshot;
use super::super::{EngineConfig, Violation};

/// A student visa concerns candidates whose nationality is outside the
/// exempt lists AND who reside abroad. Both conditions must hold for the
/// diplomatic post to be required.
pub(crate) fn check(
    violations: &mut Vec<Violation>,
    snapshot: &CandidateSnapshot,
    config: &EngineConfig,
) {
    let identification = &snapshot.identification;
    let concerned = !config.visa_exempt(&identification.nationality)
        && identification.residence_country != config.domestic_country;
    if !concerned {
        return;
    }
    if snapshot
        .diplomatic_post
        .as_deref()
        .map_or(true, str::is_empty)
    {
        violations.push(Violation::VisaInformationMissing);
    }
}
