use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::checklist::{ChecklistEntry, ExperienceStatus};
use super::domain::{
    CandidateId, CaseId, ExperienceId, ExperienceType, FacultyApprovalDetails, FormationId,
    RefusalReason,
};
use super::profile::{CandidateProfileProvider, ProfileError};
use super::repository::{
    AuditTrail, CaseRepository, CaseStatusView, NotificationGateway, RepositoryError,
};
use super::service::{AdmissionCaseService, CaseServiceError};

/// Router builder exposing HTTP endpoints for case intake, checklist
/// review, and decision hand-off.
pub fn admission_router<R, N, A, P>(service: Arc<AdmissionCaseService<R, N, A, P>>) -> Router
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    Router::new()
        .route("/api/v1/admission/cases", post(initiate_handler::<R, N, A, P>))
        .route(
            "/api/v1/admission/cases/:case_id",
            get(status_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/violations",
            get(violations_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/submit",
            post(submit_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/checklist",
            get(checklist_handler::<R, N, A, P>).post(checklist_write_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/experiences/:experience_id",
            post(experience_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/access-titles",
            get(titles_handler::<R, N, A, P>).post(title_selection_handler::<R, N, A, P>),
        )
        .route(
            "/api/v1/admission/cases/:case_id/commands/:command",
            post(command_handler::<R, N, A, P>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub struct InitiateRequest {
    pub candidate: CandidateId,
    pub formation: FormationId,
}

#[derive(Debug, Deserialize)]
pub struct ChecklistWriteRequest {
    pub entry: ChecklistEntry,
    pub version: u64,
}

#[derive(Debug, Deserialize)]
pub struct ExperienceWriteRequest {
    pub status: ExperienceStatus,
    pub version: u64,
}

#[derive(Debug, Deserialize)]
pub struct TitleSelectionRequest {
    pub experience: ExperienceId,
    pub kind: ExperienceType,
    pub selected: bool,
    pub version: u64,
}

/// Body shared by the decision commands; the fields a given command does
/// not use stay `None`.
#[derive(Debug, Deserialize)]
pub struct CommandRequest {
    pub version: u64,
    #[serde(default)]
    pub refusal_reasons: Option<Vec<RefusalReason>>,
    #[serde(default)]
    pub faculty_approval: Option<FacultyApprovalDetails>,
}

pub(crate) async fn initiate_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    axum::Json(request): axum::Json<InitiateRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.initiate(request.candidate, request.formation) {
        Ok(case) => (StatusCode::CREATED, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.status_view(&CaseId(case_id)) {
        Ok(view) => (StatusCode::OK, axum::Json(view)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn violations_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.validate_for_submission(&CaseId(case_id)) {
        Ok(violations) => {
            (StatusCode::OK, axum::Json(json!({ "violations": violations }))).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.submit(&CaseId(case_id)) {
        Ok(case) => (StatusCode::ACCEPTED, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.checklist(&CaseId(case_id)) {
        Ok(checklist) => (StatusCode::OK, axum::Json(checklist)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn checklist_write_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<ChecklistWriteRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.change_checklist_status(&CaseId(case_id), request.entry, request.version) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn experience_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path((case_id, experience_id)): Path<(String, String)>,
    axum::Json(request): axum::Json<ExperienceWriteRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.change_experience_status(
        &CaseId(case_id),
        &ExperienceId(experience_id),
        request.status,
        request.version,
    ) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn titles_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.selectable_access_titles(&CaseId(case_id)) {
        Ok(titles) => (StatusCode::OK, axum::Json(json!({ "titles": titles }))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn title_selection_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path(case_id): Path<String>,
    axum::Json(request): axum::Json<TitleSelectionRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    match service.modify_access_title_selection(
        &CaseId(case_id),
        request.experience,
        request.kind,
        request.selected,
        request.version,
    ) {
        Ok(case) => (StatusCode::OK, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn command_handler<R, N, A, P>(
    State(service): State<Arc<AdmissionCaseService<R, N, A, P>>>,
    Path((case_id, command)): Path<(String, String)>,
    axum::Json(request): axum::Json<CommandRequest>,
) -> Response
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
    P: CandidateProfileProvider + 'static,
{
    let id = CaseId(case_id);
    let version = request.version;
    let outcome = match command.as_str() {
        "send-to-fa" => service.send_to_fa(&id, version),
        "refusal-reasons" => {
            service.specify_refusal_reasons(&id, request.refusal_reasons.unwrap_or_default(), version)
        }
        "faculty-approval" => match request.faculty_approval {
            Some(details) => service.specify_faculty_approval(&id, details, version),
            None => {
                let payload = json!({ "error": "faculty_approval body is required" });
                return (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response();
            }
        },
        "fa-refuse" => service.fa_refuse(&id, version),
        "fa-approve" => service.fa_approve(&id, version),
        "send-to-cao" => service.send_to_cao(&id, version),
        "cao-refuse" => service.cao_refuse(&id, version),
        "cao-approve" => service.cao_approve(&id, version),
        "request-documents" => service.request_documents(&id, version),
        "receive-documents" => service.receive_candidate_documents(&id, version),
        other => {
            let payload = json!({ "error": format!("unknown command {other}") });
            return (StatusCode::NOT_FOUND, axum::Json(payload)).into_response();
        }
    };

    match outcome {
        Ok(case) => (StatusCode::OK, axum::Json(CaseStatusView::of(&case))).into_response(),
        Err(error) => error_response(error),
    }
}

/// Map coordinator errors onto HTTP statuses: incomplete data is 422, a
/// failed guard or stale version is 409, a missing case is 404.
fn error_response(error: CaseServiceError) -> Response {
    match error {
        CaseServiceError::Incomplete(violations) => {
            let payload = json!({ "violations": violations });
            (StatusCode::UNPROCESSABLE_ENTITY, axum::Json(payload)).into_response()
        }
        CaseServiceError::Precondition(failure) => {
            let payload = json!({ "error": failure.to_string() });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        CaseServiceError::Repository(RepositoryError::NotFound)
        | CaseServiceError::Profile(ProfileError::NotFound) => {
            let payload = json!({ "error": "case not found" });
            (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
        }
        CaseServiceError::Repository(RepositoryError::VersionConflict { expected, actual }) => {
            let payload = json!({
                "error": "stale case version",
                "expected": expected,
                "actual": actual,
            });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        CaseServiceError::Repository(RepositoryError::Conflict) => {
            let payload = json!({ "error": "case already exists" });
            (StatusCode::CONFLICT, axum::Json(payload)).into_response()
        }
        other => {
            let payload = json!({ "error": other.to_string() });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
