//! Eligibility client — one outbound request per check, failures reported
//! as values.

use async_trait::async_trait;
use secrecy::ExposeSecret;
use tracing::{error, info};

use crate::config::EligibilityConfig;
use crate::error::{ConfigError, EligibilityError};

use super::model::{EligibilityRequest, EligibilityResponse, PatientDetails};

/// Remote eligibility verification.
///
/// Implementations issue exactly one request per call and never retry.
#[async_trait]
pub trait EligibilityProvider: Send + Sync {
    /// Check eligibility for `patient`. `retry_count` is the attempt
    /// number in this conversation, starting at 1.
    async fn check(
        &self,
        patient: &PatientDetails,
        retry_count: u32,
    ) -> Result<EligibilityResponse, EligibilityError>;
}

/// HTTP eligibility client (Stedi-compatible JSON API).
pub struct HttpEligibilityClient {
    config: EligibilityConfig,
    client: reqwest::Client,
}

impl HttpEligibilityClient {
    pub fn new(config: EligibilityConfig) -> Result<Self, ConfigError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ConfigError::InvalidValue {
                key: "ELIGIBILITY_TIMEOUT_SECS".into(),
                message: format!("failed to build HTTP client: {e}"),
            })?;
        Ok(Self { config, client })
    }

    fn send_error(&self, e: reqwest::Error) -> EligibilityError {
        if e.is_timeout() {
            EligibilityError::Timeout {
                timeout: self.config.timeout,
            }
        } else {
            EligibilityError::Transport {
                reason: e.to_string(),
            }
        }
    }
}

#[async_trait]
impl EligibilityProvider for HttpEligibilityClient {
    async fn check(
        &self,
        patient: &PatientDetails,
        retry_count: u32,
    ) -> Result<EligibilityResponse, EligibilityError> {
        let Some(api_key) = self.config.api_key.as_ref() else {
            error!("Missing STEDI_API_KEY; eligibility check skipped");
            return Err(EligibilityError::Configuration);
        };

        let body = EligibilityRequest::new(&self.config, patient);
        info!(
            retry_count,
            url = %self.config.url,
            "Sending eligibility request"
        );

        let resp = self
            .client
            .post(&self.config.url)
            .header("Authorization", format!("Key {}", api_key.expose_secret()))
            .json(&body)
            .send()
            .await
            .map_err(|e| self.send_error(e))?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| self.send_error(e))?;

        if !status.is_success() {
            let message = serde_json::from_str::<serde_json::Value>(&text)
                .ok()
                .and_then(|v| v.get("message").and_then(|m| m.as_str()).map(String::from))
                .unwrap_or(text);
            error!(status = status.as_u16(), "Eligibility service returned an error");
            return Err(EligibilityError::Status {
                status: status.as_u16(),
                message,
            });
        }

        serde_json::from_str::<EligibilityResponse>(&text).map_err(|e| {
            error!(error = %e, "Failed to parse eligibility response");
            EligibilityError::MalformedResponse {
                reason: e.to_string(),
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn patient() -> PatientDetails {
        PatientDetails {
            first_name: "Anne".into(),
            last_name: "Smith".into(),
            insurance_id: "W123".into(),
            date_of_birth: "19900105".into(),
        }
    }

    #[tokio::test]
    async fn missing_key_is_configuration_error() {
        let client = HttpEligibilityClient::new(EligibilityConfig {
            url: "http://127.0.0.1:9/unused".into(),
            ..EligibilityConfig::default()
        })
        .unwrap();
        let err = client.check(&patient(), 0).await.unwrap_err();
        assert!(err.is_configuration());
    }

    #[tokio::test]
    async fn unreachable_service_is_transport_error() {
        let client = HttpEligibilityClient::new(EligibilityConfig {
            // Port 9 (discard) is not listening on test hosts.
            url: "http://127.0.0.1:9/eligibility".into(),
            api_key: Some(secrecy::SecretString::from("test-key")),
            ..EligibilityConfig::default()
        })
        .unwrap();
        let err = client.check(&patient(), 0).await.unwrap_err();
        assert!(matches!(
            err,
            EligibilityError::Transport { .. } | EligibilityError::Timeout { .. }
        ));
    }
}
