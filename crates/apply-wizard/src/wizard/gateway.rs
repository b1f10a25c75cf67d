use std::future::Future;
use std::sync::{Arc, Mutex};

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::domain::{ExperienceLevel, FormState, Role};

pub const DEFAULT_FALLBACK_ERROR: &str = "Network error";

/// JSON body posted to the application backend. Carries the resume name only.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionPayload {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub skills: Vec<String>,
    pub experience: ExperienceLevel,
    pub portfolio: String,
    pub resume_name: Option<String>,
}

impl From<&FormState> for SubmissionPayload {
    fn from(form: &FormState) -> Self {
        Self {
            full_name: form.full_name.clone(),
            email: form.email.clone(),
            phone: form.phone.clone(),
            role: form.role,
            skills: form.skills.iter().cloned().collect(),
            experience: form.experience,
            portfolio: form.portfolio.clone(),
            resume_name: form.resume_name().map(str::to_string),
        }
    }
}

/// Opaque confirmation returned by the backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Receipt {
    pub status: u16,
    pub body: Value,
}

/// Raw failure reported by a gateway before normalization.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    #[error("transport failure: {}", .message.as_deref().unwrap_or("no details"))]
    Transport { message: Option<String> },
    #[error("backend rejected submission with status {status}")]
    Rejected { status: u16, message: Option<String> },
}

impl GatewayError {
    pub fn message(&self) -> Option<&str> {
        match self {
            GatewayError::Transport { message } | GatewayError::Rejected { message, .. } => {
                message.as_deref().filter(|message| !message.trim().is_empty())
            }
        }
    }
}

/// Normalized, human readable submission failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct SubmissionError {
    pub message: String,
}

impl SubmissionError {
    pub fn normalize(error: &GatewayError, fallback: &str) -> Self {
        let message = error.message().unwrap_or(fallback).to_string();
        Self { message }
    }
}

/// The backend the finished application is handed to.
pub trait ApplicationGateway: Send + Sync {
    fn submit(
        &self,
        payload: &SubmissionPayload,
    ) -> impl Future<Output = Result<Receipt, GatewayError>> + Send;

    /// Message used when a failure carries no usable text.
    fn fallback_error(&self) -> &str {
        DEFAULT_FALLBACK_ERROR
    }
}

/// Gateway that accepts everything and remembers what it saw.
#[derive(Debug, Default, Clone)]
pub struct RecordingGateway {
    submissions: Arc<Mutex<Vec<SubmissionPayload>>>,
}

impl RecordingGateway {
    pub fn submissions(&self) -> Vec<SubmissionPayload> {
        self.submissions
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }
}

impl ApplicationGateway for RecordingGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Receipt, GatewayError> {
        let mut guard = self
            .submissions
            .lock()
            .map_err(|_| GatewayError::Transport {
                message: Some("recording gateway poisoned".to_string()),
            })?;
        guard.push(payload.clone());
        let id = guard.len();
        Ok(Receipt {
            status: 201,
            body: serde_json::json!({ "id": id }),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::wizard::domain::ResumeRef;

    #[test]
    fn payload_uses_camel_case_and_resume_name_only() {
        let mut form = FormState {
            full_name: "Ada Lovelace".to_string(),
            email: "ada@x.com".to_string(),
            phone: "+1 555 123 4567".to_string(),
            role: Role::FullStack,
            resume: Some(ResumeRef {
                name: "ada.pdf".to_string(),
            }),
            ..FormState::default()
        };
        form.skills.insert("Rust".to_string());

        let json = serde_json::to_value(SubmissionPayload::from(&form)).expect("serializes");
        assert_eq!(json["fullName"], "Ada Lovelace");
        assert_eq!(json["role"], "Full Stack");
        assert_eq!(json["experience"], "Junior");
        assert_eq!(json["skills"], serde_json::json!(["Rust"]));
        assert_eq!(json["resumeName"], "ada.pdf");
        assert!(json.get("resume").is_none());
    }

    #[test]
    fn normalize_prefers_structured_message() {
        let error = GatewayError::Rejected {
            status: 422,
            message: Some("Duplicate application".to_string()),
        };
        assert_eq!(
            SubmissionError::normalize(&error, DEFAULT_FALLBACK_ERROR).message,
            "Duplicate application"
        );
    }

    #[test]
    fn normalize_falls_back_when_message_missing_or_blank() {
        let missing = GatewayError::Transport { message: None };
        assert_eq!(
            SubmissionError::normalize(&missing, DEFAULT_FALLBACK_ERROR).message,
            "Network error"
        );

        let blank = GatewayError::Rejected {
            status: 500,
            message: Some("  ".to_string()),
        };
        assert_eq!(
            SubmissionError::normalize(&blank, "Try again later").message,
            "Try again later"
        );
    }
}
