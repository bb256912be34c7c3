//! Error types for Vet Assist.

/// Top-level error type for the assistant core.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),

    #[error("Chat error: {0}")]
    Chat(#[from] ChatError),

    #[error("Wizard error: {0}")]
    Wizard(#[from] WizardError),

    #[error("Profile error: {0}")]
    Profile(#[from] ProfileError),

    #[error("Recorder error: {0}")]
    Recorder(#[from] RecorderError),

    #[error("Save error: {0}")]
    Save(#[from] SaveError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnvVar(String),
}

/// Errors from the streaming chat transport.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Chat endpoint returned status {status}")]
    BadStatus { status: u16 },

    #[error("Stream interrupted after {chunks} chunk(s): {reason}")]
    StreamInterrupted { chunks: u32, reason: String },

    #[error("Response body is not valid UTF-8: {0}")]
    InvalidEncoding(String),

    #[error("Exchange cancelled")]
    Cancelled,
}

/// Contract violations on the chat controller.
///
/// These fire loudly instead of silently corrupting the conversation log.
#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("A streamed exchange is already in progress")]
    SessionAlreadyOpen,

    #[error("No streamed exchange is in progress")]
    NoOpenSession,

    #[error("Session already completed; late chunk rejected")]
    SessionComplete,

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Wizard state machine errors.
#[derive(Debug, thiserror::Error)]
pub enum WizardError {
    #[error("Step {step} rejected input: {message}")]
    Validation { step: u32, message: String },

    #[error("Wizard already submitted; no further transitions")]
    AlreadySubmitted,

    #[error("Cannot retreat from the first step")]
    AtFirstStep,

    #[error("Step {requested} is out of range (furthest reached: {furthest})")]
    StepOutOfRange { requested: u32, furthest: u32 },

    #[error("A wizard needs at least one step")]
    NoSteps,
}

/// Errors assembling a dog profile from collected wizard output.
#[derive(Debug, thiserror::Error)]
pub enum ProfileError {
    #[error("Missing collected field: {0}")]
    MissingField(&'static str),

    #[error("Invalid value for {field}: {message}")]
    InvalidField { field: &'static str, message: String },
}

/// Recording lifecycle errors.
#[derive(Debug, thiserror::Error)]
pub enum RecorderError {
    #[error("Recorder is already recording")]
    AlreadyRecording,

    #[error("Recorder is not recording")]
    NotRecording,

    #[error("Recorder is not paused")]
    NotPaused,

    #[error("Recording already finished")]
    AlreadyFinished,
}

/// Errors from the one-shot external save/upload calls.
#[derive(Debug, thiserror::Error)]
pub enum SaveError {
    #[error("Request to {url} failed: {reason}")]
    RequestFailed { url: String, reason: String },

    #[error("Save endpoint returned status {status}")]
    BadStatus { status: u16 },
}

/// Result type alias for the assistant core.
pub type Result<T> = std::result::Result<T, Error>;
