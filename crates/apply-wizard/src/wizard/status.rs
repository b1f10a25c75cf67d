use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lifecycle positions shown by the progress indicator.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatusStep {
    #[default]
    Home,
    Applying,
    Review,
    Submitted,
    Success,
}

impl StatusStep {
    pub const fn ordered() -> [Self; 5] {
        [
            Self::Home,
            Self::Applying,
            Self::Review,
            Self::Submitted,
            Self::Success,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Applying => "applying",
            Self::Review => "review",
            Self::Submitted => "submitted",
            Self::Success => "success",
        }
    }

    pub const fn completion_percentage(self) -> u8 {
        match self {
            Self::Home => 0,
            Self::Applying => 33,
            Self::Review => 66,
            Self::Submitted => 95,
            Self::Success => 100,
        }
    }
}

impl fmt::Display for StatusStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Identifier stamped on an application when it is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ApplicationId(pub String);

impl fmt::Display for ApplicationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

static APPLICATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_application_id(now: DateTime<Utc>) -> ApplicationId {
    let sequence = APPLICATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    ApplicationId(format!("APP-{}-{sequence:04}", now.timestamp_millis()))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("cannot move application status from {from} to {to}")]
pub struct StatusTransitionError {
    pub from: StatusStep,
    pub to: StatusStep,
}

/// Journey-level progress, kept apart from the form data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ApplicationStatus {
    step: StatusStep,
    submitted_at: Option<DateTime<Utc>>,
    application_id: Option<ApplicationId>,
    error: Option<String>,
}

impl ApplicationStatus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(&self) -> StatusStep {
        self.step
    }

    pub fn completion_percentage(&self) -> u8 {
        self.step.completion_percentage()
    }

    pub fn submitted_at(&self) -> Option<DateTime<Utc>> {
        self.submitted_at
    }

    pub fn application_id(&self) -> Option<&ApplicationId> {
        self.application_id.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn begin(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(&[StatusStep::Home], StatusStep::Applying)
    }

    pub fn enter_review(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(&[StatusStep::Applying], StatusStep::Review)
    }

    /// "Edit" navigation from the review surface back into the wizard.
    pub fn return_to_edit(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(&[StatusStep::Review], StatusStep::Applying)
    }

    /// Record local intent to submit. Stamps the time and a fresh identifier.
    pub fn submit_application(
        &mut self,
        now: DateTime<Utc>,
    ) -> Result<&ApplicationId, StatusTransitionError> {
        self.transition(&[StatusStep::Review], StatusStep::Submitted)?;
        self.submitted_at = Some(now);
        self.error = None;
        Ok(self.application_id.insert(next_application_id(now)))
    }

    /// The backend confirmed receipt.
    pub fn confirm_success(&mut self) -> Result<(), StatusTransitionError> {
        self.transition(&[StatusStep::Submitted], StatusStep::Success)
    }

    /// The backend call failed; withdraw the submission and keep the message.
    pub fn record_failure(&mut self, message: impl Into<String>) -> Result<(), StatusTransitionError> {
        self.transition(&[StatusStep::Submitted], StatusStep::Review)?;
        self.submitted_at = None;
        self.application_id = None;
        self.error = Some(message.into());
        Ok(())
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    fn transition(
        &mut self,
        allowed_from: &[StatusStep],
        to: StatusStep,
    ) -> Result<(), StatusTransitionError> {
        if !allowed_from.contains(&self.step) {
            return Err(StatusTransitionError {
                from: self.step,
                to,
            });
        }
        self.step = to;
        Ok(())
    }

    pub fn view(&self) -> ApplicationStatusView {
        ApplicationStatusView {
            step: self.step,
            completion_percentage: self.completion_percentage(),
            submitted_at: self.submitted_at,
            application_id: self.application_id.clone(),
            error: self.error.clone(),
        }
    }
}

/// Read-only status snapshot for progress indicators.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplicationStatusView {
    pub step: StatusStep,
    pub completion_percentage: u8,
    pub submitted_at: Option<DateTime<Utc>>,
    pub application_id: Option<ApplicationId>,
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn at_review() -> ApplicationStatus {
        let mut status = ApplicationStatus::new();
        status.begin().expect("home -> applying");
        status.enter_review().expect("applying -> review");
        status
    }

    fn instant() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 10, 1, 9, 30, 0)
            .single()
            .expect("valid timestamp")
    }

    #[test]
    fn completion_percentage_follows_the_fixed_table() {
        let expected = [0, 33, 66, 95, 100];
        for (step, percentage) in StatusStep::ordered().into_iter().zip(expected) {
            assert_eq!(step.completion_percentage(), percentage, "{step}");
        }
    }

    #[test]
    fn walks_the_happy_path() {
        let mut status = at_review();
        assert_eq!(status.completion_percentage(), 66);

        let id = status.submit_application(instant()).expect("review -> submitted").clone();
        assert_eq!(status.step(), StatusStep::Submitted);
        assert_eq!(status.completion_percentage(), 95);
        assert_eq!(status.submitted_at(), Some(instant()));
        assert!(id.0.starts_with("APP-"));

        status.confirm_success().expect("submitted -> success");
        assert_eq!(status.completion_percentage(), 100);
        assert_eq!(status.application_id(), Some(&id));
    }

    #[test]
    fn application_ids_differ_between_submissions() {
        let mut first = at_review();
        let mut second = at_review();
        let a = first.submit_application(instant()).expect("submits").clone();
        let b = second
            .submit_application(instant() + Duration::milliseconds(5))
            .expect("submits")
            .clone();
        assert_ne!(a, b);
    }

    #[test]
    fn review_can_return_to_applying() {
        let mut status = at_review();
        status.return_to_edit().expect("review -> applying");
        assert_eq!(status.step(), StatusStep::Applying);
        assert_eq!(status.completion_percentage(), 33);
    }

    #[test]
    fn rejects_out_of_order_transitions() {
        let mut status = ApplicationStatus::new();
        assert_eq!(
            status.enter_review(),
            Err(StatusTransitionError {
                from: StatusStep::Home,
                to: StatusStep::Review,
            })
        );
        assert!(status.submit_application(instant()).is_err());
        assert!(status.confirm_success().is_err());
        assert_eq!(status.step(), StatusStep::Home);
        assert!(status.application_id().is_none());
    }

    #[test]
    fn failure_rolls_back_to_review_with_message() {
        let mut status = at_review();
        status.submit_application(instant()).expect("submits");
        status.record_failure("Network error").expect("submitted -> review");

        assert_eq!(status.step(), StatusStep::Review);
        assert_eq!(status.error(), Some("Network error"));
        assert!(status.application_id().is_none());
        assert!(status.submitted_at().is_none());

        status.submit_application(instant()).expect("retry allowed");
        assert!(status.error().is_none());
    }

    #[test]
    fn reset_clears_every_derived_field() {
        let mut status = at_review();
        status.submit_application(instant()).expect("submits");
        status.confirm_success().expect("success");

        status.reset();
        assert_eq!(status, ApplicationStatus::new());
        assert_eq!(status.view().completion_percentage, 0);
    }
}
