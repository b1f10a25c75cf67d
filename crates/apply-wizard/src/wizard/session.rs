use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{info, warn};

use super::controller::{AdvanceOutcome, WizardController, WizardStep};
use super::domain::{FieldEdit, FormField, FormState};
use super::gateway::{
    ApplicationGateway, GatewayError, Receipt, SubmissionError, SubmissionPayload,
};
use super::status::{
    ApplicationId, ApplicationStatus, ApplicationStatusView, StatusStep, StatusTransitionError,
};
use super::validation::{validate_all, ValidationErrors};

/// Operations rejected because the session is not in a state that allows them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error("cannot {operation} while the application is {status}")]
    InvalidState {
        operation: &'static str,
        status: StatusStep,
    },
    #[error("a submission is already in flight")]
    SubmissionPending,
    #[error("no submission is in flight")]
    NoSubmissionPending,
    #[error(transparent)]
    Transition(#[from] StatusTransitionError),
}

/// What the session produced when asked to submit.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SubmitOutcome {
    /// The final integrity check failed; the wizard was reopened at the
    /// earliest step with a problem.
    Incomplete { errors: ValidationErrors },
    /// The backend confirmed receipt.
    Accepted {
        application_id: ApplicationId,
        receipt: Receipt,
    },
    /// The backend call failed; the form is untouched and retry is allowed.
    Failed { error: SubmissionError },
}

/// A submission that has been recorded locally and awaits the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingSubmission {
    pub application_id: ApplicationId,
    pub payload: SubmissionPayload,
}

/// Either a ticket for the backend call or the reason it never started.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionStart {
    Ready(PendingSubmission),
    Incomplete(ValidationErrors),
}

/// One applicant's flow: the form, the wizard position, and the journey status.
#[derive(Debug, Clone, Default)]
pub struct ApplicationSession {
    form: FormState,
    controller: WizardController,
    status: ApplicationStatus,
}

impl ApplicationSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn form(&self) -> &FormState {
        &self.form
    }

    pub fn controller(&self) -> &WizardController {
        &self.controller
    }

    pub fn status(&self) -> &ApplicationStatus {
        &self.status
    }

    #[cfg(test)]
    pub(crate) fn status_mut(&mut self) -> &mut ApplicationStatus {
        &mut self.status
    }

    /// True while a submission awaits the backend.
    pub fn is_busy(&self) -> bool {
        self.status.step() == StatusStep::Submitted
    }

    /// Enter the wizard from the landing page.
    pub fn begin(&mut self) -> Result<(), SessionError> {
        self.status.begin()?;
        Ok(())
    }

    pub fn edit_field(&mut self, edit: FieldEdit) -> Result<FormField, SessionError> {
        self.require(StatusStep::Applying, "edit a field")?;
        let field = edit.field();
        self.form.apply(edit);
        Ok(field)
    }

    pub fn toggle_skill(&mut self, skill: &str) -> Result<bool, SessionError> {
        self.require(StatusStep::Applying, "edit a field")?;
        Ok(self.form.toggle_skill(skill))
    }

    /// Validate the active step and move on. Leaving the last step moves the
    /// journey to review.
    pub fn advance(&mut self) -> Result<AdvanceOutcome, SessionError> {
        self.require(StatusStep::Applying, "advance")?;
        let outcome = self.controller.advance(&self.form);
        if outcome == AdvanceOutcome::ReadyForReview {
            self.status.enter_review()?;
        }
        Ok(outcome)
    }

    pub fn back(&mut self) -> Result<WizardStep, SessionError> {
        self.require(StatusStep::Applying, "go back")?;
        Ok(self.controller.back())
    }

    /// Leave review to change answers. The wizard restarts at its first step.
    pub fn return_to_edit(&mut self) -> Result<(), SessionError> {
        self.require(StatusStep::Review, "return to editing")?;
        self.status.return_to_edit()?;
        self.controller.reset();
        Ok(())
    }

    /// Run the full-form check and record intent to submit. The caller must
    /// hand the result of the backend call to [`Self::complete_submission`].
    pub fn begin_submission(&mut self, now: DateTime<Utc>) -> Result<SubmissionStart, SessionError> {
        if self.is_busy() {
            return Err(SessionError::SubmissionPending);
        }
        self.require(StatusStep::Review, "submit")?;

        let errors = validate_all(&self.form);
        if !errors.is_empty() {
            let step = earliest_step_with(&errors);
            warn!(fields = errors.len(), ?step, "final integrity check failed");
            self.status.return_to_edit()?;
            self.controller.reopen_at(step, errors.clone());
            return Ok(SubmissionStart::Incomplete(errors));
        }

        let application_id = self.status.submit_application(now)?.clone();
        info!(%application_id, role = %self.form.role, "application submission started");
        Ok(SubmissionStart::Ready(PendingSubmission {
            application_id,
            payload: SubmissionPayload::from(&self.form),
        }))
    }

    /// Apply the backend's answer to a submission started with
    /// [`Self::begin_submission`].
    pub fn complete_submission(
        &mut self,
        result: Result<Receipt, GatewayError>,
        fallback_error: &str,
    ) -> Result<SubmitOutcome, SessionError> {
        if !self.is_busy() {
            return Err(SessionError::NoSubmissionPending);
        }

        match result {
            Ok(receipt) => {
                self.status.confirm_success()?;
                let application_id = self
                    .status
                    .application_id()
                    .cloned()
                    .ok_or(SessionError::NoSubmissionPending)?;
                self.form = FormState::default();
                self.controller.reset();
                info!(%application_id, "application confirmed by backend");
                Ok(SubmitOutcome::Accepted {
                    application_id,
                    receipt,
                })
            }
            Err(err) => {
                let error = SubmissionError::normalize(&err, fallback_error);
                warn!(cause = %err, message = %error.message, "application submission failed");
                self.status.record_failure(error.message.clone())?;
                Ok(SubmitOutcome::Failed { error })
            }
        }
    }

    /// Validate, record, call the backend, and apply its answer.
    pub async fn submit<G>(&mut self, gateway: &G) -> Result<SubmitOutcome, SessionError>
    where
        G: ApplicationGateway,
    {
        let pending = match self.begin_submission(Utc::now())? {
            SubmissionStart::Ready(pending) => pending,
            SubmissionStart::Incomplete(errors) => return Ok(SubmitOutcome::Incomplete { errors }),
        };
        let result = gateway.submit(&pending.payload).await;
        self.complete_submission(result, gateway.fallback_error())
    }

    /// Abandon or restart: everything goes back to the landing page defaults.
    pub fn reset(&mut self) -> Result<(), SessionError> {
        if self.is_busy() {
            return Err(SessionError::SubmissionPending);
        }
        *self = Self::default();
        Ok(())
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            form: self.form.clone(),
            step: self.controller.step(),
            step_index: self.controller.step().index(),
            errors: self.controller.errors().clone(),
            status: self.status.view(),
            busy: self.is_busy(),
        }
    }

    fn require(&self, expected: StatusStep, operation: &'static str) -> Result<(), SessionError> {
        if self.status.step() == expected {
            Ok(())
        } else {
            Err(SessionError::InvalidState {
                operation,
                status: self.status.step(),
            })
        }
    }
}

fn earliest_step_with(errors: &ValidationErrors) -> WizardStep {
    let skills_step = errors
        .fields()
        .all(|field| matches!(field, FormField::Skills | FormField::Portfolio));
    if skills_step {
        WizardStep::Skills
    } else {
        WizardStep::Identity
    }
}

/// Read-only view handed to the display layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionSnapshot {
    pub form: FormState,
    pub step: WizardStep,
    pub step_index: u8,
    pub errors: ValidationErrors,
    pub status: ApplicationStatusView,
    pub busy: bool,
}
