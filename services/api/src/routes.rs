use crate::infra::{AppState, InMemoryProfileProvider};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use serde_json::json;
use std::sync::Arc;

use admissions_core::workflows::admission::{
    admission_router, AdmissionCaseService, AuditTrail, CandidateProfileProvider,
    CandidateSnapshot, CaseId, CaseRepository, NotificationGateway,
};

pub(crate) fn with_admission_routes<R, N, A>(
    service: Arc<AdmissionCaseService<R, N, A, InMemoryProfileProvider>>,
    profiles: Arc<InMemoryProfileProvider>,
) -> axum::Router
where
    R: CaseRepository + 'static,
    N: NotificationGateway + 'static,
    A: AuditTrail + 'static,
{
    admission_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route(
            "/api/v1/admission/cases/:case_id/profile",
            axum::routing::put(profile_upsert_endpoint).layer(Extension(profiles)),
        )
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

/// Register the candidate resume the engine validates a case against.
pub(crate) async fn profile_upsert_endpoint(
    Extension(profiles): Extension<Arc<InMemoryProfileProvider>>,
    Path(case_id): Path<String>,
    Json(snapshot): Json<CandidateSnapshot>,
) -> impl IntoResponse {
    profiles.put(CaseId(case_id), snapshot);
    StatusCode::NO_CONTENT
}
