use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::NaiveDate;

use crate::workflows::admission::domain::{
    AcademicYear, CandidateId, Case, CaseId, CaseStatus, CountryCode, DocumentRef, ExperienceId,
    FormationId, LanguageCode, QuestionId, ScholarshipId,
};
use crate::workflows::admission::profile::{
    AcademicExperience, Accounting, ActivityType, AssimilationSituation, BankAccount,
    BankAccountKind, CandidateProfileProvider, CandidateSnapshot, DomesticDiploma,
    EvaluationSystem, ExperienceYear, ForeignDiploma, GotDiploma, Identification,
    NonAcademicExperience, ProfileError, QuestionTab, SecondaryDiploma, SecondaryStudies,
    SpecificQuestion, TranscriptMode,
};
use crate::workflows::admission::reference::{Formation, ReferenceData, Scholarship};
use crate::workflows::admission::repository::{
    AuditEntry, AuditError, AuditTrail, CaseRepository, NotificationError, NotificationGateway,
    RenderedMessage, RepositoryError,
};
use crate::workflows::admission::validation::EngineConfig;
use crate::workflows::admission::{AdmissionCaseService, CompletenessValidator};

pub(super) fn doc(key: &str) -> DocumentRef {
    DocumentRef(key.to_string())
}

pub(super) fn formation() -> FormationId {
    FormationId {
        acronym: "DROI1BA".to_string(),
        year: AcademicYear(2024),
    }
}

pub(super) fn candidate() -> CandidateId {
    CandidateId("cand-001".to_string())
}

/// A domestic candidate whose file passes every completeness rule.
pub(super) fn complete_snapshot() -> CandidateSnapshot {
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
                certificate: vec![doc("cess.pdf")],
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
            global_transcript: vec![doc("releve-global.pdf")],
            global_transcript_translation: Vec::new(),
            evaluation_system: EvaluationSystem::EctsCredits,
            instruction_language: LanguageCode::new("FR"),
            years: vec![
                ExperienceYear {
                    year: AcademicYear(2018),
                    transcript: Vec::new(),
                    transcript_translation: Vec::new(),
                    registered_credits: Some(60),
                    acquired_credits: Some(55),
                },
                ExperienceYear {
                    year: AcademicYear(2019),
                    transcript: Vec::new(),
                    transcript_translation: Vec::new(),
                    registered_credits: Some(60),
                    acquired_credits: Some(60),
                },
            ],
        }],
        non_academic_experiences: vec![NonAcademicExperience {
            id: ExperienceId("exp-na-1".to_string()),
            activity: ActivityType::Work,
            start: NaiveDate::from_ymd_opt(2021, 9, 1).expect("valid date"),
            end: NaiveDate::from_ymd_opt(2023, 8, 31).expect("valid date"),
            certificate: vec![doc("attestation-travail.pdf")],
        }],
        accounting: Accounting::default(),
        questions: Vec::new(),
        diplomatic_post: None,
        answers: Default::default(),
    }
}

/// A non-EU candidate residing abroad with a foreign secondary diploma in a
/// non-exempt linguistic regime, complete including translations.
pub(super) fn foreign_snapshot() -> CandidateSnapshot {
    let mut snapshot = complete_snapshot();
    snapshot.identification = Identification {
        nationality: CountryCode::new("CM"),
        residence_country: CountryCode::new("CM"),
    };
    snapshot.secondary_studies.diploma = Some(SecondaryDiploma::Foreign(ForeignDiploma {
        country: CountryCode::new("CM"),
        linguistic_regime: Some(LanguageCode::new("AR")),
        certificate: vec![doc("diplome.pdf")],
        transcript: vec![doc("releve.pdf")],
        certificate_translation: vec![doc("diplome-traduit.pdf")],
        transcript_translation: vec![doc("releve-traduit.pdf")],
    }));
    snapshot.accounting = Accounting {
        situation: Some(AssimilationSituation::CpasSupport {
            cpas_certificate: vec![doc("cpas.pdf")],
        }),
        bank_account: BankAccount {
            kind: Some(BankAccountKind::NoAccount),
            ..BankAccount::default()
        },
        recently_attended_domestic_institute: Some(false),
        institute_debt_certificate: Vec::new(),
    };
    snapshot.diplomatic_post = Some("Yaoundé".to_string());
    snapshot
}

pub(super) fn required_question(id: &str, tab: QuestionTab) -> SpecificQuestion {
    SpecificQuestion {
        id: QuestionId(id.to_string()),
        tab,
        required: true,
        label: format!("question {id}"),
    }
}

#[derive(Default)]
pub(super) struct MemoryRepository {
    pub(super) cases: Mutex<HashMap<CaseId, Case>>,
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
    pub(super) missing_templates: Vec<String>,
    sent: Mutex<Vec<RenderedMessage>>,
}

impl MemoryNotifications {
    pub(super) fn without_template(template: &str) -> Self {
        Self {
            missing_templates: vec![template.to_string()],
            sent: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn sent(&self) -> Vec<RenderedMessage> {
        self.sent.lock().expect("notification mutex poisoned").clone()
    }
}

impl NotificationGateway for MemoryNotifications {
    fn render(&self, template: &str, case: &Case) -> Result<RenderedMessage, NotificationError> {
        if self.missing_templates.iter().any(|name| name == template) {
            return Err(NotificationError::MissingTemplate(template.to_string()));
        }
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
    snapshot: Mutex<Option<CandidateSnapshot>>,
}

impl MemoryProfiles {
    pub(super) fn serving(snapshot: CandidateSnapshot) -> Self {
        Self {
            snapshot: Mutex::new(Some(snapshot)),
        }
    }

    pub(super) fn set(&self, snapshot: CandidateSnapshot) {
        *self.snapshot.lock().expect("profile mutex poisoned") = Some(snapshot);
    }
}

impl CandidateProfileProvider for MemoryProfiles {
    fn resume(
        &self,
        _case: &CaseId,
        _year: AcademicYear,
    ) -> Result<CandidateSnapshot, ProfileError> {
        self.snapshot
            .lock()
            .expect("profile mutex poisoned")
            .clone()
            .ok_or(ProfileError::NotFound)
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

pub(super) type TestService =
    AdmissionCaseService<MemoryRepository, MemoryNotifications, MemoryAudit, MemoryProfiles>;

pub(super) struct Harness {
    pub(super) service: Arc<TestService>,
    pub(super) repository: Arc<MemoryRepository>,
    pub(super) notifications: Arc<MemoryNotifications>,
    pub(super) audit: Arc<MemoryAudit>,
    pub(super) profiles: Arc<MemoryProfiles>,
}

pub(super) fn build_harness(snapshot: CandidateSnapshot) -> Harness {
    build_harness_with(snapshot, MemoryNotifications::default())
}

pub(super) fn build_harness_with(
    snapshot: CandidateSnapshot,
    notifications: MemoryNotifications,
) -> Harness {
    let repository = Arc::new(MemoryRepository::default());
    let notifications = Arc::new(notifications);
    let audit = Arc::new(MemoryAudit::default());
    let profiles = Arc::new(MemoryProfiles::serving(snapshot));
    let service = Arc::new(AdmissionCaseService::new(
        repository.clone(),
        notifications.clone(),
        audit.clone(),
        profiles.clone(),
        Arc::new(StaticReference),
        CompletenessValidator::new(EngineConfig::default()),
    ));
    Harness {
        service,
        repository,
        notifications,
        audit,
        profiles,
    }
}
