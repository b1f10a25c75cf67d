use std::time::Duration;

use serde_json::Value;
use tracing::{debug, warn};

use super::gateway::{ApplicationGateway, GatewayError, Receipt, SubmissionPayload};
use crate::config::SubmissionConfig;

/// Posts applications as JSON to the configured backend endpoint.
#[derive(Debug, Clone)]
pub struct HttpApplicationGateway {
    client: reqwest::Client,
    endpoint: String,
    timeout: Duration,
    fallback_error: String,
}

impl HttpApplicationGateway {
    pub fn from_config(config: &SubmissionConfig) -> Result<Self, GatewayError> {
        let timeout = config.timeout();
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| GatewayError::Transport {
                message: Some(err.to_string()),
            })?;

        Ok(Self {
            client,
            endpoint: config.endpoint(),
            timeout,
            fallback_error: config.fallback_error.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> GatewayError {
        let message = if err.is_timeout() {
            Some(format!("timeout of {}ms exceeded", self.timeout.as_millis()))
        } else if err.is_connect() {
            None
        } else {
            Some(err.to_string())
        };
        GatewayError::Transport { message }
    }
}

/// Pull a `message` out of an error body, whatever else it contains.
fn message_from_body(body: &[u8]) -> Option<String> {
    let value: Value = serde_json::from_slice(body).ok()?;
    value
        .get("message")
        .or_else(|| value.get("error"))
        .and_then(Value::as_str)
        .map(str::to_string)
}

impl ApplicationGateway for HttpApplicationGateway {
    async fn submit(&self, payload: &SubmissionPayload) -> Result<Receipt, GatewayError> {
        debug!(endpoint = %self.endpoint, role = %payload.role, "posting application");

        let response = self
            .client
            .post(&self.endpoint)
            .json(payload)
            .send()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|err| self.map_transport_error(err))?;

        if !status.is_success() {
            warn!(status = status.as_u16(), "application backend rejected submission");
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
                message: message_from_body(&body),
            });
        }

        let body = serde_json::from_slice(&body).unwrap_or(Value::Null);
        Ok(Receipt {
            status: status.as_u16(),
            body,
        })
    }

    fn fallback_error(&self) -> &str {
        &self.fallback_error
    }
}
