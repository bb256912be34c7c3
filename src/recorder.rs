//! Consultation recording — capture lifecycle and one-shot upload.
//!
//! A recording session moves Idle → Recording ⇄ Paused → Finished. Audio
//! arrives as raw byte frames while recording; finishing yields a
//! `Recording` artifact the caller hands to a `ConsultationUploader`
//! exactly once. One recorder per screen instance, never reused.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::error::{RecorderError, SaveError};

/// File name given to recordings captured via the microphone.
pub const DEFAULT_RECORDING_NAME: &str = "recorded_audio.mp3";

/// Lifecycle phase of a recorder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecorderPhase {
    Idle,
    Recording,
    Paused,
    Finished,
}

/// A finished consultation recording, ready for upload.
#[derive(Debug, Clone)]
pub struct Recording {
    pub id: Uuid,
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub recorded_at: DateTime<Utc>,
}

/// Captures one consultation recording.
#[derive(Debug, Default)]
pub struct Recorder {
    phase: RecorderPhaseState,
    buffer: Vec<u8>,
    started_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Default)]
enum RecorderPhaseState {
    #[default]
    Idle,
    Recording {
        paused: bool,
    },
    Finished,
}

impl Recorder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> RecorderPhase {
        match self.phase {
            RecorderPhaseState::Idle => RecorderPhase::Idle,
            RecorderPhaseState::Recording { paused: false } => RecorderPhase::Recording,
            RecorderPhaseState::Recording { paused: true } => RecorderPhase::Paused,
            RecorderPhaseState::Finished => RecorderPhase::Finished,
        }
    }

    /// Begin recording. Valid only from Idle.
    pub fn start(&mut self) -> Result<(), RecorderError> {
        match self.phase {
            RecorderPhaseState::Idle => {
                self.phase = RecorderPhaseState::Recording { paused: false };
                self.started_at = Some(Utc::now());
                info!("recording started");
                Ok(())
            }
            RecorderPhaseState::Recording { .. } => Err(RecorderError::AlreadyRecording),
            RecorderPhaseState::Finished => Err(RecorderError::AlreadyFinished),
        }
    }

    /// Take a break. Frames arriving while paused are rejected.
    pub fn pause(&mut self) -> Result<(), RecorderError> {
        match self.phase {
            RecorderPhaseState::Recording { paused: false } => {
                self.phase = RecorderPhaseState::Recording { paused: true };
                debug!("recording paused");
                Ok(())
            }
            _ => Err(RecorderError::NotRecording),
        }
    }

    /// Continue after a pause.
    pub fn resume(&mut self) -> Result<(), RecorderError> {
        match self.phase {
            RecorderPhaseState::Recording { paused: true } => {
                self.phase = RecorderPhaseState::Recording { paused: false };
                debug!("recording resumed");
                Ok(())
            }
            _ => Err(RecorderError::NotPaused),
        }
    }

    /// Absorb one frame of captured audio.
    pub fn append(&mut self, frame: &[u8]) -> Result<(), RecorderError> {
        match self.phase {
            RecorderPhaseState::Recording { paused: false } => {
                self.buffer.extend_from_slice(frame);
                Ok(())
            }
            _ => Err(RecorderError::NotRecording),
        }
    }

    /// Stop and hand back the captured artifact. Valid while recording or
    /// paused; the recorder is terminal afterwards.
    pub fn finish(&mut self) -> Result<Recording, RecorderError> {
        match self.phase {
            RecorderPhaseState::Recording { .. } => {
                self.phase = RecorderPhaseState::Finished;
                let recording = Recording {
                    id: Uuid::new_v4(),
                    file_name: DEFAULT_RECORDING_NAME.to_string(),
                    bytes: std::mem::take(&mut self.buffer),
                    recorded_at: self.started_at.unwrap_or_else(Utc::now),
                };
                info!(id = %recording.id, bytes = recording.bytes.len(), "recording finished");
                Ok(recording)
            }
            RecorderPhaseState::Idle => Err(RecorderError::NotRecording),
            RecorderPhaseState::Finished => Err(RecorderError::AlreadyFinished),
        }
    }
}

// ── Upload boundary ─────────────────────────────────────────────────────

/// One-shot upload of a finished recording for transcription.
#[async_trait]
pub trait ConsultationUploader: Send + Sync {
    async fn upload(&self, recording: &Recording) -> Result<(), SaveError>;
}

/// Uploads the recording as a multipart form with a bearer token.
pub struct HttpConsultationUploader {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl HttpConsultationUploader {
    pub fn new(url: impl Into<String>, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl ConsultationUploader for HttpConsultationUploader {
    async fn upload(&self, recording: &Recording) -> Result<(), SaveError> {
        let part = reqwest::multipart::Part::bytes(recording.bytes.clone())
            .file_name(recording.file_name.clone());
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("name", recording.file_name.clone());

        let response = self
            .client
            .post(&self.url)
            .bearer_auth(self.token.expose_secret())
            .multipart(form)
            .send()
            .await
            .map_err(|e| SaveError::RequestFailed {
                url: self.url.clone(),
                reason: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!(status = status.as_u16(), "consultation upload rejected");
            return Err(SaveError::BadStatus {
                status: status.as_u16(),
            });
        }

        info!(id = %recording.id, "consultation uploaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lifecycle_happy_path() {
        let mut recorder = Recorder::new();
        assert_eq!(recorder.phase(), RecorderPhase::Idle);

        recorder.start().unwrap();
        assert_eq!(recorder.phase(), RecorderPhase::Recording);
        recorder.append(b"abc").unwrap();

        recorder.pause().unwrap();
        assert_eq!(recorder.phase(), RecorderPhase::Paused);
        recorder.resume().unwrap();
        recorder.append(b"def").unwrap();

        let recording = recorder.finish().unwrap();
        assert_eq!(recorder.phase(), RecorderPhase::Finished);
        assert_eq!(recording.bytes, b"abcdef");
        assert_eq!(recording.file_name, DEFAULT_RECORDING_NAME);
    }

    #[test]
    fn finish_while_paused_is_allowed() {
        let mut recorder = Recorder::new();
        recorder.start().unwrap();
        recorder.append(b"xy").unwrap();
        recorder.pause().unwrap();

        let recording = recorder.finish().unwrap();
        assert_eq!(recording.bytes, b"xy");
    }

    #[test]
    fn frames_rejected_unless_actively_recording() {
        let mut recorder = Recorder::new();
        assert!(matches!(
            recorder.append(b"x").unwrap_err(),
            RecorderError::NotRecording
        ));

        recorder.start().unwrap();
        recorder.pause().unwrap();
        assert!(matches!(
            recorder.append(b"x").unwrap_err(),
            RecorderError::NotRecording
        ));
    }

    #[test]
    fn invalid_transitions_fail_loudly() {
        let mut recorder = Recorder::new();
        assert!(matches!(
            recorder.pause().unwrap_err(),
            RecorderError::NotRecording
        ));
        assert!(matches!(
            recorder.resume().unwrap_err(),
            RecorderError::NotPaused
        ));
        assert!(matches!(
            recorder.finish().unwrap_err(),
            RecorderError::NotRecording
        ));

        recorder.start().unwrap();
        assert!(matches!(
            recorder.start().unwrap_err(),
            RecorderError::AlreadyRecording
        ));
        assert!(matches!(
            recorder.resume().unwrap_err(),
            RecorderError::NotPaused
        ));

        recorder.finish().unwrap();
        assert!(matches!(
            recorder.start().unwrap_err(),
            RecorderError::AlreadyFinished
        ));
        assert!(matches!(
            recorder.finish().unwrap_err(),
            RecorderError::AlreadyFinished
        ));
    }
}
