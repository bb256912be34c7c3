//! Persistence boundary for a completed profile.
//!
//! One external save call, invoked exactly once after the wizard submits.
//! Failures are surfaced to the user by the caller; nothing here retries.

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, warn};

use crate::error::SaveError;

use super::model::DogProfile;

/// Where a completed profile goes.
#[async_trait]
pub trait ProfileSink: Send + Sync {
    async fn save(&self, profile: &DogProfile) -> Result<(), SaveError>;
}

/// Saves the profile to the account service with a bearer token.
pub struct HttpProfileSink {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl HttpProfileSink {
    pub fn new(url: impl Into<String>, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl ProfileSink for HttpProfileSink {
    async fn save(&self, profile: &DogProfile) -> Result<(), SaveError> {
        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .header(reqwest::header::CACHE_CONTROL, "no-cache")
            .json(profile)
            .send()
            .await
            .map_err(|e| SaveError::RequestFailed {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "profile save rejected");
            return Err(SaveError::BadStatus {
                status: status.as_u16(),
            });
        }

        debug!(dog = %profile.name, "profile saved");
        Ok(())
    }
}
