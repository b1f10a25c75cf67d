use crate::infra::AppState;
use apply_wizard::roles::{form_options, FormOptions, RoleCatalog, RoleDetail};
use apply_wizard::wizard::{
    wizard_router, ApplicationGateway, SessionRepository, WizardService,
};
use axum::extract::Path;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Extension;
use axum::Json;
use serde::Serialize;
use serde_json::json;
use std::sync::Arc;

#[derive(Debug, Serialize)]
pub(crate) struct RoleView {
    #[serde(flatten)]
    pub(crate) detail: RoleDetail,
    pub(crate) stipend_label: String,
}

impl From<&RoleDetail> for RoleView {
    fn from(detail: &RoleDetail) -> Self {
        Self {
            detail: detail.clone(),
            stipend_label: detail.stipend.label(),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct RolesResponse {
    pub(crate) roles: Vec<RoleView>,
    pub(crate) form_options: FormOptions,
}

pub(crate) fn with_wizard_routes<R, G>(service: Arc<WizardService<R, G>>) -> axum::Router
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    wizard_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
        .route("/api/v1/roles", axum::routing::get(roles_endpoint))
        .route("/api/v1/roles/:slug", axum::routing::get(role_endpoint))
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

/// Everything the landing page and the form dropdowns need.
pub(crate) async fn roles_endpoint() -> Json<RolesResponse> {
    let catalog = RoleCatalog::standard();
    Json(RolesResponse {
        roles: catalog.roles().iter().map(RoleView::from).collect(),
        form_options: form_options(),
    })
}

pub(crate) async fn role_endpoint(Path(slug): Path<String>) -> Response {
    let catalog = RoleCatalog::standard();
    match catalog.by_slug(&slug) {
        Some(detail) => (StatusCode::OK, Json(RoleView::from(detail))).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({ "error": format!("no role matches '{slug}'") })),
        )
            .into_response(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apply_wizard::wizard::{InMemorySessionRepository, RecordingGateway};
    use axum::body::{to_bytes, Body};
    use axum::http::Request;
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app_state(ready: bool) -> AppState {
        AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        }
    }

    fn test_router() -> axum::Router {
        let service = WizardService::new(
            Arc::new(InMemorySessionRepository::default()),
            Arc::new(RecordingGateway::default()),
        );
        with_wizard_routes(Arc::new(service)).layer(Extension(app_state(true)))
    }

    async fn get_json(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(
                Request::builder()
                    .uri(uri)
                    .body(Body::empty())
                    .expect("request builds"),
            )
            .await
            .expect("route executes");
        let status = response.status();
        let bytes = to_bytes(response.into_body(), usize::MAX)
            .await
            .expect("body reads");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn roles_endpoint_lists_catalog_and_form_options() {
        let Json(body) = roles_endpoint().await;

        assert_eq!(body.roles.len(), 4);
        assert_eq!(body.roles[0].detail.slug, "frontend");
        assert_eq!(body.roles[0].stipend_label, "$5,000 - $8,000/month");
        assert_eq!(body.form_options.skills.len(), 7);
        assert_eq!(body.form_options.experience_levels.len(), 3);
    }

    #[tokio::test]
    async fn role_route_resolves_known_slugs() {
        let (status, body) = get_json(test_router(), "/api/v1/roles/ai").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["slug"], "ai");
        assert_eq!(body["stipend_label"], "$6,000 - $9,500/month");
    }

    #[tokio::test]
    async fn role_route_rejects_unknown_slugs() {
        let (status, body) = get_json(test_router(), "/api/v1/roles/designer").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"]
            .as_str()
            .expect("error message")
            .contains("designer"));
    }

    #[tokio::test]
    async fn health_and_session_routes_share_the_router() {
        let (status, body) = get_json(test_router(), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");

        let (status, _) = get_json(test_router(), "/api/v1/sessions/session-unknown").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn readiness_reports_initializing_until_bound() {
        let response = readiness_endpoint(Extension(app_state(false)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);

        let response = readiness_endpoint(Extension(app_state(true)))
            .await
            .into_response();
        assert_eq!(response.status(), StatusCode::OK);
    }
}
