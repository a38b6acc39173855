use crate::cli::ServeArgs;
use crate::infra::{
    AppState, CatalogReference, InMemoryAuditTrail, InMemoryCaseRepository,
    InMemoryNotificationGateway, InMemoryProfileProvider,
};
use crate::routes::with_admission_routes;
use admissions_core::config::AppConfig;
use admissions_core::error::AppError;
use admissions_core::telemetry;
use admissions_core::workflows::admission::{AdmissionCaseService, CompletenessValidator};
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let repository = Arc::new(InMemoryCaseRepository::default());
    let notifications = Arc::new(InMemoryNotificationGateway::default());
    let audit = Arc::new(InMemoryAuditTrail::default());
    let profiles = Arc::new(InMemoryProfileProvider::default());
    let validator = CompletenessValidator::new(config.engine.engine_config());
    let case_service = Arc::new(AdmissionCaseService::new(
        repository,
        notifications,
        audit,
        profiles.clone(),
        Arc::new(CatalogReference),
        validator,
    ));

    let app = with_admission_routes(case_service, profiles)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(?config.environment, %addr, "admission workflow engine ready");

    axum::serve(listener, app).await?;
    Ok(())
}
