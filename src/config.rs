//! Configuration types.

use secrecy::SecretString;

use crate::error::ConfigError;

/// Default greeting shown as the first coach message in a fresh conversation.
pub const DEFAULT_GREETING: &str = "Hi, I am your personalized behavior dog coach. \
Ask me any question about your dog and I will use everything I know about them \
to find the most relevant research for you.";

/// Assistant configuration.
#[derive(Debug, Clone)]
pub struct AssistConfig {
    /// Streaming chat endpoint.
    pub chat_url: String,
    /// Account service endpoint for saving a completed dog profile.
    pub save_dog_url: String,
    /// Backend endpoint for uploading a finished consultation recording.
    pub upload_url: String,
    /// Bearer token attached to every outbound request.
    pub auth_token: SecretString,
    /// Greeting seeded into a fresh conversation log.
    pub greeting: String,
}

impl Default for AssistConfig {
    fn default() -> Self {
        Self {
            chat_url: "http://localhost:8080/chat".to_string(),
            save_dog_url: "http://localhost:8081/save-dog".to_string(),
            upload_url: "http://localhost:8080/upload-consultation".to_string(),
            auth_token: SecretString::from(""),
            greeting: DEFAULT_GREETING.to_string(),
        }
    }
}

impl AssistConfig {
    /// Load configuration from `VET_ASSIST_*` environment variables.
    ///
    /// The auth token is required; endpoints fall back to local defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let auth_token = std::env::var("VET_ASSIST_TOKEN")
            .map(SecretString::from)
            .map_err(|_| ConfigError::MissingEnvVar("VET_ASSIST_TOKEN".to_string()))?;

        Ok(Self {
            chat_url: std::env::var("VET_ASSIST_CHAT_URL").unwrap_or(defaults.chat_url),
            save_dog_url: std::env::var("VET_ASSIST_SAVE_DOG_URL")
                .unwrap_or(defaults.save_dog_url),
            upload_url: std::env::var("VET_ASSIST_UPLOAD_URL").unwrap_or(defaults.upload_url),
            auth_token,
            greeting: std::env::var("VET_ASSIST_GREETING").unwrap_or(defaults.greeting),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_points_at_local_services() {
        let config = AssistConfig::default();
        assert!(config.chat_url.ends_with("/chat"));
        assert!(config.save_dog_url.ends_with("/save-dog"));
        assert!(config.upload_url.ends_with("/upload-consultation"));
        assert_eq!(config.greeting, DEFAULT_GREETING);
    }
}
