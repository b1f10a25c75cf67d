use apply_wizard::config::SubmissionConfig;
use apply_wizard::error::AppError;
use apply_wizard::wizard::{HttpApplicationGateway, InMemorySessionRepository, WizardService};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

pub(crate) type LiveWizardService = WizardService<InMemorySessionRepository, HttpApplicationGateway>;

/// Sessions held in memory, submissions posted to the configured backend.
pub(crate) fn live_wizard_service(
    config: &SubmissionConfig,
) -> Result<Arc<LiveWizardService>, AppError> {
    let repository = Arc::new(InMemorySessionRepository::default());
    let gateway = Arc::new(HttpApplicationGateway::from_config(config)?);
    Ok(Arc::new(WizardService::new(repository, gateway)))
}
