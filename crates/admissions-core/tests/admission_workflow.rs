//! Integration specifications for the admission case workflow.
//!
//! Scenarios exercise the public service facade end to end: intake,
//! completeness validation, checklist review, and the faculty/central
//! decision hand-off, without reaching into private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use chrono::NaiveDate;

    use admissions_core::workflows::admission::{
        AcademicExperience, AcademicYear, Accounting, ActivityType, AdmissionCaseService,
        AuditEntry, AuditError, AuditTrail, CandidateId, CandidateProfileProvider,
        CandidateSnapshot, Case, CaseId, CaseRepository, CaseStatus, CompletenessValidator,
        CountryCode, DocumentRef, DomesticDiploma, EngineConfig, EvaluationSystem, ExperienceId,
        ExperienceYear, Formation, FormationId, GotDiploma, Identification, LanguageCode,
        NonAcademicExperience, NotificationError, NotificationGateway, ProfileError, ReferenceData,
        RenderedMessage, RepositoryError, Scholarship, ScholarshipId, SecondaryDiploma,
        SecondaryStudies, TranscriptMode,
    };

    pub(super) fn formation() -> FormationId {
        FormationId {
            acronym: "DROI1BA".to_string(),
            year: AcademicYear(2024),
        }
    }

    pub(super) fn candidate() -> CandidateId {
        CandidateId("cand-001".to_string())
    }

    pub(super) fn snapshot() -> CandidateSnapshot {
        CandidateSnapshot {
            candidate: candidate(),
            academic_year: AcademicYear(2024),
            identification: Identification {
                nationality: CountryCode::new("BE"),
                residence_country: CountryCode::new("BE"),
            },
            secondary_studies: SecondaryStudies {
                got_diploma: Some(GotDiploma::Yes),
                diploma: Some(SecondaryDiploma::Domestic(DomesticDiploma {
                    institute: Some("Athénée Royal de Namur".to_string()),
                    graduation_year: Some(AcademicYear(2018)),
                    certificate: vec![DocumentRef("cess.pdf".to_string())],
                })),
                admission_exam: None,
            },
            academic_experiences: vec![AcademicExperience {
                id: ExperienceId("exp-ac-1".to_string()),
                institute: "Université de Liège".to_string(),
                country: CountryCode::new("BE"),
                program: "Bachelier en droit".to_string(),
                start_year: AcademicYear(2018),
                end_year: AcademicYear(2021),
                obtained_diploma: true,
                transcript_mode: TranscriptMode::Global,
                global_transcript: vec![DocumentRef("releve-global.pdf".to_string())],
                global_transcript_translation: Vec::new(),
                evaluation_system: EvaluationSystem::EctsCredits,
                instruction_language: LanguageCode::new("FR"),
                years: vec![ExperienceYear {
                    year: AcademicYear(2019),
                    transcript: Vec::new(),
                    transcript_translation: Vec::new(),
                    registered_credits: Some(60),
                    acquired_credits: Some(60),
                }],
            }],
            non_academic_experiences: vec![NonAcademicExperience {
                id: ExperienceId("exp-na-1".to_string()),
                activity: ActivityType::Work,
                start: NaiveDate::from_ymd_opt(2021, 9, 1).expect("valid date"),
                end: NaiveDate::from_ymd_opt(2023, 8, 31).expect("valid date"),
                certificate: vec![DocumentRef("attestation.pdf".to_string())],
            }],
            accounting: Accounting::default(),
            questions: Vec::new(),
            diplomatic_post: None,
            answers: Default::default(),
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryRepository {
        cases: Mutex<HashMap<CaseId, Case>>,
    }

    impl MemoryRepository {
        pub(super) fn seed(&self, case: Case) {
            self.cases
                .lock()
                .expect("repository mutex poisoned")
                .insert(case.id.clone(), case);
        }
    }

    impl CaseRepository for MemoryRepository {
        fn insert(&self, case: Case) -> Result<Case, RepositoryError> {
            let mut guard = self.cases.lock().expect("repository mutex poisoned");
            if guard.contains_key(&case.id) {
                return Err(RepositoryError::Conflict);
            }
            guard.insert(case.id.clone(), case.clone());
            Ok(case)
        }

        fn fetch(&self, id: &CaseId) -> Result<Option<Case>, RepositoryError> {
            let guard = self.cases.lock().expect("repository mutex poisoned");
            Ok(guard.get(id).cloned())
        }

        fn update(&self, mut case: Case, expected_version: u64) -> Result<Case, RepositoryError> {
            let mut guard = self.cases.lock().expect("repository mutex poisoned");
            let stored = guard.get(&case.id).ok_or(RepositoryError::NotFound)?;
            if stored.version != expected_version {
                return Err(RepositoryError::VersionConflict {
                    expected: expected_version,
                    actual: stored.version,
                });
            }
            case.version = expected_version + 1;
            guard.insert(case.id.clone(), case.clone());
            Ok(case)
        }

        fn count_in_statuses(
            &self,
            candidate: &CandidateId,
            statuses: &[CaseStatus],
            except: &CaseId,
        ) -> Result<usize, RepositoryError> {
            let guard = self.cases.lock().expect("repository mutex poisoned");
            Ok(guard
                .values()
                .filter(|case| {
                    &case.candidate == candidate
                        && &case.id != except
                        && statuses.contains(&case.status)
                })
                .count())
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryNotifications {
        sent: Mutex<Vec<RenderedMessage>>,
    }

    impl MemoryNotifications {
        pub(super) fn sent(&self) -> Vec<RenderedMessage> {
            self.sent.lock().expect("notification mutex poisoned").clone()
        }
    }

    impl NotificationGateway for MemoryNotifications {
        fn render(
            &self,
            template: &str,
            case: &Case,
        ) -> Result<RenderedMessage, NotificationError> {
            Ok(RenderedMessage {
                template: template.to_string(),
                subject: format!("[{}] {template}", case.reference),
                body: format!("case {} is now {}", case.id.0, case.status.label()),
            })
        }

        fn send(&self, _case: &CaseId, message: RenderedMessage) -> Result<(), NotificationError> {
            self.sent
                .lock()
                .expect("notification mutex poisoned")
                .push(message);
            Ok(())
        }
    }

    #[derive(Default)]
    pub(super) struct MemoryAudit {
        entries: Mutex<Vec<AuditEntry>>,
    }

    impl MemoryAudit {
        pub(super) fn entries(&self) -> Vec<AuditEntry> {
            self.entries.lock().expect("audit mutex poisoned").clone()
        }
    }

    impl AuditTrail for MemoryAudit {
        fn record(&self, entry: AuditEntry) -> Result<(), AuditError> {
            self.entries
                .lock()
                .expect("audit mutex poisoned")
                .push(entry);
            Ok(())
        }
    }

    pub(super) struct MemoryProfiles {
        snapshot: Mutex<CandidateSnapshot>,
    }

    impl MemoryProfiles {
        pub(super) fn serving(snapshot: CandidateSnapshot) -> Self {
            Self {
                snapshot: Mutex::new(snapshot),
            }
        }
    }

    impl CandidateProfileProvider for MemoryProfiles {
        fn resume(
            &self,
            _case: &CaseId,
            _year: AcademicYear,
        ) -> Result<CandidateSnapshot, ProfileError> {
            Ok(self.snapshot.lock().expect("profile mutex poisoned").clone())
        }
    }

    pub(super) struct StaticReference;

    impl ReferenceData for StaticReference {
        fn current_academic_year(&self) -> AcademicYear {
            AcademicYear(2024)
        }

        fn formation(&self, id: &FormationId) -> Option<Formation> {
            Some(Formation {
                id: id.clone(),
                title: "Bachelier en droit".to_string(),
                campus: "Louvain-la-Neuve".to_string(),
            })
        }

        fn scholarships(&self, ids: &[ScholarshipId]) -> Vec<Scholarship> {
            ids.iter()
                .map(|id| Scholarship {
                    id: id.clone(),
                    short_name: format!("bourse-{}", id.0),
                })
                .collect()
        }
    }

    pub(super) struct Harness {
        pub(super) service:
            AdmissionCaseService<MemoryRepository, MemoryNotifications, MemoryAudit, MemoryProfiles>,
        pub(super) repository: Arc<MemoryRepository>,
        pub(super) notifications: Arc<MemoryNotifications>,
        pub(super) audit: Arc<MemoryAudit>,
    }

    pub(super) fn harness(snapshot: CandidateSnapshot) -> Harness {
        let repository = Arc::new(MemoryRepository::default());
        let notifications = Arc::new(MemoryNotifications::default());
        let audit = Arc::new(MemoryAudit::default());
        let profiles = Arc::new(MemoryProfiles::serving(snapshot));
        let service = AdmissionCaseService::new(
            repository.clone(),
            notifications.clone(),
            audit.clone(),
            profiles,
            Arc::new(StaticReference),
            CompletenessValidator::new(EngineConfig::default()),
        );
        Harness {
            service,
            repository,
            notifications,
            audit,
        }
    }
}

use admissions_core::workflows::admission::{
    CaoDecisionStatus, Case, CaseServiceError, CaseStatus, ChecklistEntry, ExperienceId,
    ExperienceType, FacultyApprovalDetails, RefusalReason, Violation,
};
use common::{candidate, formation, harness, snapshot};

fn approval_details() -> FacultyApprovalDetails {
    FacultyApprovalDetails {
        program_contact_name: "Prof. Dupont".to_string(),
        program_contact_email: "dupont@example.org".to_string(),
        with_additional_conditions: false,
        additional_conditions: Vec::new(),
        with_prerequisite_courses: false,
        prerequisite_courses: Vec::new(),
    }
}

#[test]
fn full_lifecycle_from_draft_to_acceptance() {
    let fixture = harness(snapshot());

    let case = fixture
        .service
        .initiate(candidate(), formation())
        .expect("case initiates");
    assert_eq!(case.status, CaseStatus::Draft);

    let case = fixture.service.submit(&case.id).expect("case submits");
    assert_eq!(case.status, CaseStatus::Confirmed);

    let case = fixture
        .service
        .send_to_fa(&case.id, case.version)
        .expect("hand-off to faculty");
    let case = fixture
        .service
        .specify_faculty_approval(&case.id, approval_details(), case.version)
        .expect("approval form recorded");
    let case = fixture
        .service
        .modify_access_title_selection(
            &case.id,
            ExperienceId("exp-ac-1".to_string()),
            ExperienceType::Academic,
            true,
            case.version,
        )
        .expect("access title selected");
    let case = fixture
        .service
        .fa_approve(&case.id, case.version)
        .expect("faculty approves");
    let case = fixture
        .service
        .send_to_cao(&case.id, case.version)
        .expect("case returns to the central authority");
    let case = fixture
        .service
        .change_checklist_status(
            &case.id,
            ChecklistEntry::CaoDecision(CaoDecisionStatus::ApprovalToValidate),
            case.version,
        )
        .expect("central review starts");
    let case = fixture
        .service
        .cao_approve(&case.id, case.version)
        .expect("final approval");

    assert_eq!(case.status, CaseStatus::Accepted);

    let templates: Vec<_> = fixture
        .notifications
        .sent()
        .into_iter()
        .map(|message| message.template)
        .collect();
    assert_eq!(
        templates,
        vec!["case_submitted", "case_sent_to_fa", "cao_approval"]
    );

    let statuses: Vec<_> = fixture
        .audit
        .entries()
        .into_iter()
        .map(|entry| entry.to)
        .collect();
    assert_eq!(*statuses.last().expect("trail recorded"), CaseStatus::Accepted);
}

#[test]
fn refusal_lifecycle_records_reasons_and_notifies() {
    let fixture = harness(snapshot());

    let case = fixture
        .service
        .initiate(candidate(), formation())
        .expect("case initiates");
    let case = fixture.service.submit(&case.id).expect("case submits");
    let case = fixture
        .service
        .send_to_fa(&case.id, case.version)
        .expect("hand-off to faculty");
    let case = fixture
        .service
        .specify_refusal_reasons(
            &case.id,
            vec![RefusalReason::Custom {
                text: "Titre d'accès insuffisant".to_string(),
            }],
            case.version,
        )
        .expect("reasons recorded");
    let case = fixture
        .service
        .fa_refuse(&case.id, case.version)
        .expect("faculty refuses");
    let case = fixture
        .service
        .send_to_cao(&case.id, case.version)
        .expect("case returns");
    let case = fixture
        .service
        .change_checklist_status(
            &case.id,
            ChecklistEntry::CaoDecision(CaoDecisionStatus::RefusalToValidate),
            case.version,
        )
        .expect("central review starts");
    let case = fixture
        .service
        .cao_refuse(&case.id, case.version)
        .expect("final refusal");

    assert_eq!(case.status, CaseStatus::Refused);
    assert!(!case.refusal_reasons.is_empty());
    assert!(fixture
        .notifications
        .sent()
        .iter()
        .any(|message| message.template == "cao_refusal"));
}

#[test]
fn submission_below_the_cap_succeeds() {
    let fixture = harness(snapshot());

    // One other case under way: still below the two-case ceiling.
    let mut other = Case::initiate(
        admissions_core::workflows::admission::CaseId("case-open-0".to_string()),
        candidate(),
        formation(),
        "2024-DROI1BA-open-0".to_string(),
    );
    other.status = CaseStatus::Confirmed;
    fixture.repository.seed(other);

    let case = fixture
        .service
        .initiate(candidate(), formation())
        .expect("case initiates");
    let case = fixture
        .service
        .submit(&case.id)
        .expect("one open case stays under the cap");
    assert_eq!(case.status, CaseStatus::Confirmed);
}

#[test]
fn submission_cap_counts_the_candidate_other_open_cases() {
    let fixture = harness(snapshot());

    // Two cases already under way for the same candidate.
    for index in 0..2 {
        let mut other = Case::initiate(
            admissions_core::workflows::admission::CaseId(format!("case-open-{index}")),
            candidate(),
            formation(),
            format!("2024-DROI1BA-open-{index}"),
        );
        other.status = CaseStatus::Confirmed;
        fixture.repository.seed(other);
    }

    let case = fixture
        .service
        .initiate(candidate(), formation())
        .expect("case initiates");
    match fixture.service.submit(&case.id) {
        Err(CaseServiceError::Incomplete(violations)) => {
            assert_eq!(violations, vec![Violation::SubmissionCapReached { limit: 2 }]);
        }
        other => panic!("expected the submission cap, got {other:?}"),
    }
}
