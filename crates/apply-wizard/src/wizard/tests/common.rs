use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use axum::response::Response;
use serde_json::Value;
use tokio::sync::{oneshot, Mutex as AsyncMutex, Notify};

use crate::wizard::domain::{ExperienceLevel, FieldEdit, ResumeRef, Role};
use crate::wizard::gateway::{ApplicationGateway, GatewayError, Receipt, SubmissionPayload};
use crate::wizard::repository::InMemorySessionRepository;
use crate::wizard::service::WizardService;
use crate::wizard::session::ApplicationSession;

pub(super) fn identity_edits() -> Vec<FieldEdit> {
    vec![
        FieldEdit::FullName("Ada Lovelace".to_string()),
        FieldEdit::Email("ada@x.com".to_string()),
        FieldEdit::Phone("+1 555 123 4567".to_string()),
        FieldEdit::Role(Role::Backend),
    ]
}

pub(super) fn skills_edits() -> Vec<FieldEdit> {
    vec![
        FieldEdit::Skills(vec!["Rust".to_string(), "SQL".to_string()]),
        FieldEdit::Experience(ExperienceLevel::Mid),
        FieldEdit::Portfolio("https://github.com/ada".to_string()),
        FieldEdit::Resume(Some(ResumeRef {
            name: "ada-lovelace.pdf".to_string(),
        })),
    ]
}

pub(super) fn started_session() -> ApplicationSession {
    let mut session = ApplicationSession::new();
    session.begin().expect("home -> applying");
    session
}

/// A session that has walked every step and sits on the review surface.
pub(super) fn session_at_review() -> ApplicationSession {
    let mut session = started_session();
    for edit in identity_edits() {
        session.edit_field(edit).expect("edit allowed");
    }
    session.advance().expect("advance from identity");
    for edit in skills_edits() {
        session.edit_field(edit).expect("edit allowed");
    }
    session.advance().expect("advance from skills");
    session.advance().expect("leave wizard");
    session
}

/// Backend that fails without any message, like a dropped connection.
#[derive(Debug, Default)]
pub(super) struct OfflineGateway {
    pub(super) calls: AtomicUsize,
}

impl ApplicationGateway for OfflineGateway {
    async fn submit(&self, _payload: &SubmissionPayload) -> Result<Receipt, GatewayError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        Err(GatewayError::Transport { message: None })
    }
}

/// Backend that rejects with a structured message.
#[derive(Debug)]
pub(super) struct RejectingGateway {
    pub(super) message: &'static str,
}

impl ApplicationGateway for RejectingGateway {
    async fn submit(&self, _payload: &SubmissionPayload) -> Result<Receipt, GatewayError> {
        Err(GatewayError::Rejected {
            status: 409,
            message: Some(self.message.to_string()),
        })
    }

    fn fallback_error(&self) -> &str {
        "Submission failed"
    }
}

/// Backend that holds every call until the test releases it.
#[derive(Debug, Default)]
pub(super) struct HeldGateway {
    pub(super) release: Notify,
    entered: AsyncMutex<Option<oneshot::Sender<()>>>,
}

impl HeldGateway {
    pub(super) async fn entered(&self) -> oneshot::Receiver<()> {
        let (tx, rx) = oneshot::channel();
        *self.entered.lock().await = Some(tx);
        rx
    }
}

impl ApplicationGateway for HeldGateway {
    async fn submit(&self, _payload: &SubmissionPayload) -> Result<Receipt, GatewayError> {
        if let Some(tx) = self.entered.lock().await.take() {
            let _ = tx.send(());
        }
        self.release.notified().await;
        Ok(Receipt {
            status: 201,
            body: serde_json::json!({ "id": 101 }),
        })
    }
}

pub(super) fn build_service<G>(
    gateway: G,
) -> (
    WizardService<InMemorySessionRepository, G>,
    Arc<InMemorySessionRepository>,
    Arc<G>,
)
where
    G: ApplicationGateway + 'static,
{
    let repository = Arc::new(InMemorySessionRepository::default());
    let gateway = Arc::new(gateway);
    let service = WizardService::new(repository.clone(), gateway.clone());
    (service, repository, gateway)
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 64 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
