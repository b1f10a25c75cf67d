use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};

use super::common::session_at_review;
use crate::config::SubmissionConfig;
use crate::wizard::domain::FormState;
use crate::wizard::gateway::{ApplicationGateway, GatewayError, SubmissionPayload};
use crate::wizard::http::HttpApplicationGateway;
use crate::wizard::session::SubmitOutcome;
use crate::wizard::status::StatusStep;

async fn spawn_backend(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, router).await;
    });
    format!("http://{addr}")
}

fn gateway_for(base_url: String) -> HttpApplicationGateway {
    gateway_with_timeout(base_url, 2)
}

fn gateway_with_timeout(base_url: String, timeout_secs: u64) -> HttpApplicationGateway {
    let config = SubmissionConfig {
        base_url,
        path: "/posts".to_string(),
        timeout_secs,
        fallback_error: "Network error".to_string(),
    };
    HttpApplicationGateway::from_config(&config).expect("client builds")
}

fn payload() -> SubmissionPayload {
    let mut form = FormState {
        full_name: "Ada Lovelace".to_string(),
        email: "ada@x.com".to_string(),
        phone: "+1 555 123 4567".to_string(),
        ..FormState::default()
    };
    form.skills.insert("Rust".to_string());
    SubmissionPayload::from(&form)
}

#[tokio::test]
async fn posts_json_and_returns_receipt() {
    let router = Router::new().route(
        "/posts",
        post(|Json(body): Json<Value>| async move {
            (
                StatusCode::CREATED,
                Json(json!({ "id": 101, "echo": body["fullName"] })),
            )
        }),
    );
    let gateway = gateway_for(spawn_backend(router).await);

    let receipt = gateway.submit(&payload()).await.expect("accepted");
    assert_eq!(receipt.status, 201);
    assert_eq!(receipt.body["id"], 101);
    assert_eq!(receipt.body["echo"], "Ada Lovelace");
}

#[tokio::test]
async fn non_success_status_carries_body_message() {
    let router = Router::new().route(
        "/posts",
        post(|| async {
            (
                StatusCode::UNPROCESSABLE_ENTITY,
                Json(json!({ "message": "Email already applied" })),
            )
        }),
    );
    let gateway = gateway_for(spawn_backend(router).await);

    match gateway.submit(&payload()).await {
        Err(GatewayError::Rejected { status, message }) => {
            assert_eq!(status, 422);
            assert_eq!(message.as_deref(), Some("Email already applied"));
        }
        other => panic!("expected rejection, got {other:?}"),
    }
}

#[tokio::test]
async fn unreachable_backend_has_no_message() {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let gateway = gateway_for(format!("http://{addr}"));
    match gateway.submit(&payload()).await {
        Err(error @ GatewayError::Transport { .. }) => assert_eq!(error.message(), None),
        other => panic!("expected transport failure, got {other:?}"),
    }
    assert_eq!(gateway.fallback_error(), "Network error");
}

#[tokio::test]
async fn slow_backend_times_out_and_session_keeps_answers() {
    let router = Router::new().route(
        "/posts",
        post(|| async {
            tokio::time::sleep(std::time::Duration::from_secs(5)).await;
            (StatusCode::CREATED, Json(json!({ "id": 1 })))
        }),
    );
    let gateway = gateway_with_timeout(spawn_backend(router).await, 1);

    match gateway.submit(&payload()).await {
        Err(error @ GatewayError::Transport { .. }) => {
            assert_eq!(error.message(), Some("timeout of 1000ms exceeded"))
        }
        other => panic!("expected timeout, got {other:?}"),
    }

    let mut session = session_at_review();
    let before = session.form().clone();
    match session.submit(&gateway).await.expect("submit runs") {
        SubmitOutcome::Failed { error } => assert_eq!(error.message, "timeout of 1000ms exceeded"),
        other => panic!("expected failure, got {other:?}"),
    }
    assert_eq!(session.status().step(), StatusStep::Review);
    assert!(!session.is_busy());
    assert_eq!(session.form(), &before);
}

#[test]
fn endpoint_joins_base_and_path() {
    let gateway = gateway_for("http://127.0.0.1:9/".to_string());
    assert_eq!(gateway.endpoint(), "http://127.0.0.1:9/posts");
}
