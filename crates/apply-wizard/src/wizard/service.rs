use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use axum::http::StatusCode;
use chrono::Utc;
use tracing::{info, warn};

use super::controller::{AdvanceOutcome, WizardStep};
use super::domain::FieldEdit;
use super::gateway::{ApplicationGateway, GatewayError};
use super::repository::{RepositoryError, SessionId, SessionRepository};
use super::session::{
    ApplicationSession, SessionError, SessionSnapshot, SubmissionStart, SubmitOutcome,
};

/// Service composing session storage with the submission backend.
pub struct WizardService<R, G> {
    repository: Arc<R>,
    gateway: Arc<G>,
}

static SESSION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_session_id() -> SessionId {
    let id = SESSION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SessionId(format!("session-{id:06}"))
}

impl<R, G> WizardService<R, G>
where
    R: SessionRepository + 'static,
    G: ApplicationGateway + 'static,
{
    pub fn new(repository: Arc<R>, gateway: Arc<G>) -> Self {
        Self {
            repository,
            gateway,
        }
    }

    /// Create a session that has already entered the wizard.
    pub fn open(&self) -> Result<(SessionId, SessionSnapshot), WizardServiceError> {
        let mut session = ApplicationSession::new();
        session.begin()?;
        let snapshot = session.snapshot();
        let id = next_session_id();
        self.repository.insert(id.clone(), session)?;
        info!(session = %id, "application session opened");
        Ok((id, snapshot))
    }

    pub fn snapshot(&self, id: &SessionId) -> Result<SessionSnapshot, WizardServiceError> {
        let session = self
            .repository
            .fetch(id)?
            .ok_or(RepositoryError::NotFound)?;
        Ok(session.snapshot())
    }

    pub fn begin(&self, id: &SessionId) -> Result<SessionSnapshot, WizardServiceError> {
        self.mutate(id, |session| session.begin())
            .map(|(_, snapshot)| snapshot)
    }

    pub fn edit_field(
        &self,
        id: &SessionId,
        edit: FieldEdit,
    ) -> Result<SessionSnapshot, WizardServiceError> {
        let mut edit = Some(edit);
        self.mutate(id, |session| match edit.take() {
            Some(edit) => session.edit_field(edit).map(|_| ()),
            None => Ok(()),
        })
        .map(|(_, snapshot)| snapshot)
    }

    pub fn advance(
        &self,
        id: &SessionId,
    ) -> Result<(AdvanceOutcome, SessionSnapshot), WizardServiceError> {
        self.mutate(id, ApplicationSession::advance)
    }

    pub fn back(&self, id: &SessionId) -> Result<(WizardStep, SessionSnapshot), WizardServiceError> {
        self.mutate(id, ApplicationSession::back)
    }

    pub fn return_to_edit(&self, id: &SessionId) -> Result<SessionSnapshot, WizardServiceError> {
        self.mutate(id, ApplicationSession::return_to_edit)
            .map(|(_, snapshot)| snapshot)
    }

    pub fn reset(&self, id: &SessionId) -> Result<SessionSnapshot, WizardServiceError> {
        self.mutate(id, ApplicationSession::reset)
            .map(|(_, snapshot)| snapshot)
    }

    /// Start the submission under the repository lock, call the backend with
    /// the lock released, then record the answer.
    pub async fn submit(
        &self,
        id: &SessionId,
    ) -> Result<(SubmitOutcome, SessionSnapshot), WizardServiceError> {
        let (start, snapshot) =
            self.mutate(id, |session| session.begin_submission(Utc::now()))?;

        let pending = match start {
            SubmissionStart::Ready(pending) => pending,
            SubmissionStart::Incomplete(errors) => {
                return Ok((SubmitOutcome::Incomplete { errors }, snapshot));
            }
        };

        info!(session = %id, application_id = %pending.application_id, "forwarding application to backend");
        let fallback = self.gateway.fallback_error().to_string();
        let mut in_flight = InFlight {
            repository: self.repository.as_ref(),
            id,
            fallback: &fallback,
            settled: false,
        };
        let mut result = Some(self.gateway.submit(&pending.payload).await);

        let completed = self.mutate(id, |session| match result.take() {
            Some(result) => session.complete_submission(result, &fallback),
            None => Err(SessionError::NoSubmissionPending),
        });
        in_flight.settled = true;
        completed
    }

    /// Destroy the session. An in-flight submission for it finishes against a
    /// missing record and reports not found.
    pub fn abandon(&self, id: &SessionId) -> Result<(), WizardServiceError> {
        self.repository.remove(id)?;
        info!(session = %id, "application session abandoned");
        Ok(())
    }

    fn mutate<T, F>(&self, id: &SessionId, mut op: F) -> Result<(T, SessionSnapshot), WizardServiceError>
    where
        F: FnMut(&mut ApplicationSession) -> Result<T, SessionError>,
    {
        let mut outcome = None;
        self.repository.update(id, &mut |session: &mut ApplicationSession| {
            let result = op(session).map(|value| (value, session.snapshot()));
            outcome = Some(result);
        })?;

        match outcome {
            Some(result) => Ok(result?),
            None => Err(RepositoryError::NotFound.into()),
        }
    }
}

/// Settles a started submission as a transport failure if the caller stops
/// waiting before the backend answers.
struct InFlight<'a, R: SessionRepository> {
    repository: &'a R,
    id: &'a SessionId,
    fallback: &'a str,
    settled: bool,
}

impl<R: SessionRepository> Drop for InFlight<'_, R> {
    fn drop(&mut self) {
        if self.settled {
            return;
        }
        warn!(session = %self.id, "submission dropped before the backend answered");
        let fallback = self.fallback;
        let _ = self
            .repository
            .update(self.id, &mut |session: &mut ApplicationSession| {
                if session.is_busy() {
                    let _ = session.complete_submission(
                        Err(GatewayError::Transport { message: None }),
                        fallback,
                    );
                }
            });
    }
}

/// Error raised by the wizard service.
#[derive(Debug, thiserror::Error)]
pub enum WizardServiceError {
    #[error(transparent)]
    Session(#[from] SessionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
}

impl WizardServiceError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            WizardServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
            WizardServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
            WizardServiceError::Repository(RepositoryError::Unavailable(_)) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            WizardServiceError::Session(_) => StatusCode::CONFLICT,
        }
    }
}
