//! Three-step application wizard: form answers, step gating, journey status,
//! and the hand-off to the submission backend.

pub mod controller;
pub mod domain;
pub mod gateway;
pub mod http;
pub mod repository;
pub mod router;
pub mod service;
pub mod session;
pub mod status;
pub mod validation;

#[cfg(test)]
mod tests;

pub use controller::{AdvanceOutcome, WizardController, WizardStep};
pub use domain::{ExperienceLevel, FieldEdit, FormField, FormState, ResumeRef, Role, SKILL_OPTIONS};
pub use gateway::{
    ApplicationGateway, GatewayError, Receipt, RecordingGateway, SubmissionError,
    SubmissionPayload, DEFAULT_FALLBACK_ERROR,
};
pub use http::HttpApplicationGateway;
pub use repository::{InMemorySessionRepository, RepositoryError, SessionId, SessionRepository};
pub use router::wizard_router;
pub use service::{WizardService, WizardServiceError};
pub use session::{
    ApplicationSession, PendingSubmission, SessionError, SessionSnapshot, SubmissionStart,
    SubmitOutcome,
};
pub use status::{
    ApplicationId, ApplicationStatus, ApplicationStatusView, StatusStep, StatusTransitionError,
};
pub use validation::{validate_all, validate_step, ValidationErrors};
