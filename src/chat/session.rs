//! Streamed exchange state — incremental assembly of one coach reply.
//!
//! Architecture:
//! - `StreamSession` is the in-progress aggregation state for one exchange.
//! - `ChatController` owns the conversation log and at most one open session;
//!   every mutation goes through it and is pushed to subscribers, so the view
//!   re-renders on change instead of polling.

use futures::StreamExt;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

use crate::chat::log::{ConversationLog, Message};
use crate::chat::transport::ChatTransport;
use crate::error::ChatError;

/// In-progress aggregation state for one streamed exchange.
#[derive(Debug, Clone, Default)]
pub struct StreamSession {
    /// The reply assembled so far; grows monotonically.
    pub accumulated_text: String,
    /// Chunks received so far. Zero means the coach bubble does not exist yet.
    pub chunk_index: u32,
    /// Set once end-of-data was observed.
    pub is_complete: bool,
}

impl StreamSession {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Pushed to subscribers on every log mutation.
#[derive(Debug, Clone)]
pub enum ChatEvent {
    /// The user's bubble was appended.
    UserMessage { text: String },
    /// The in-progress coach bubble changed. `first` marks the chunk that
    /// created the bubble; `delta` is the fragment that arrived.
    CoachUpdate {
        text: String,
        delta: String,
        first: bool,
    },
    /// The exchange finished; `text` is the final reply.
    Completed { text: String },
    /// The exchange failed. With `partial` set, a frozen partial reply
    /// remains visible in the log.
    Failed { partial: bool },
}

/// Owns one conversation log and at most one in-flight streamed exchange.
pub struct ChatController {
    log: ConversationLog,
    session: Option<StreamSession>,
    events: broadcast::Sender<ChatEvent>,
}

impl ChatController {
    /// A controller over an empty conversation.
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(256);
        Self {
            log: ConversationLog::new(),
            session: None,
            events,
        }
    }

    /// A controller whose conversation opens with a coach greeting.
    pub fn with_greeting(greeting: impl Into<String>) -> Self {
        let mut controller = Self::new();
        controller.log = ConversationLog::with_greeting(greeting);
        controller
    }

    /// Subscribe to log mutations. Each subscriber sees every event.
    pub fn subscribe(&self) -> broadcast::Receiver<ChatEvent> {
        self.events.subscribe()
    }

    /// Read-only view of the conversation for rendering.
    pub fn log(&self) -> &ConversationLog {
        &self.log
    }

    /// The current session, if any (open or just completed).
    pub fn session(&self) -> Option<&StreamSession> {
        self.session.as_ref()
    }

    /// Begin a streamed exchange: append the user bubble synchronously,
    /// before any transport activity, and open a fresh session.
    ///
    /// An empty `user_message` is accepted and produces an empty visible
    /// bubble; rejecting empty sends is the caller UI's job. Starting while
    /// another exchange is still open is an error.
    pub fn start_session(&mut self, user_message: &str) -> Result<(), ChatError> {
        if self.session.as_ref().is_some_and(|s| !s.is_complete) {
            return Err(ChatError::SessionAlreadyOpen);
        }

        self.log.push(Message::user(user_message));
        let _ = self.events.send(ChatEvent::UserMessage {
            text: user_message.to_string(),
        });

        // A previously completed session is discarded here.
        self.session = Some(StreamSession::new());
        debug!("chat session opened");
        Ok(())
    }

    /// Absorb one chunk: grow the accumulated reply and commit it to the
    /// log — a new coach bubble on the first chunk, replacing it afterwards.
    ///
    /// Chunks are trusted in arrival order; none are dropped or reordered.
    pub fn on_chunk(&mut self, chunk: &str) -> Result<(), ChatError> {
        let session = self.session.as_mut().ok_or(ChatError::NoOpenSession)?;
        if session.is_complete {
            return Err(ChatError::SessionComplete);
        }

        session.accumulated_text.push_str(chunk);
        let first = session.chunk_index == 0;
        let committed = Message::coach(session.accumulated_text.clone());
        if first {
            self.log.push(committed);
        } else {
            self.log.replace_last(committed);
        }
        session.chunk_index += 1;

        let text = session.accumulated_text.clone();
        let _ = self.events.send(ChatEvent::CoachUpdate {
            text,
            delta: chunk.to_string(),
            first,
        });
        Ok(())
    }

    /// Mark end-of-data. The assembled reply is already committed to the
    /// log; further chunks for this session are rejected.
    pub fn on_complete(&mut self) -> Result<(), ChatError> {
        let session = self.session.as_mut().ok_or(ChatError::NoOpenSession)?;
        if session.is_complete {
            return Err(ChatError::SessionComplete);
        }
        session.is_complete = true;
        let text = session.accumulated_text.clone();
        debug!(chunks = session.chunk_index, "chat session completed");
        let _ = self.events.send(ChatEvent::Completed { text });
        Ok(())
    }

    /// Run one full exchange against the transport.
    ///
    /// Failure before the first chunk leaves only the user bubble; failure
    /// mid-stream freezes whatever partial reply was last committed. Neither
    /// is retried or rolled back here — the caller surfaces the notice and
    /// the user may re-send.
    pub async fn send_message(
        &mut self,
        user_message: &str,
        transport: &dyn ChatTransport,
        cancel: &CancellationToken,
    ) -> Result<(), ChatError> {
        self.start_session(user_message)?;

        let mut stream = match transport.send(user_message, cancel).await {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "chat request failed before any chunk arrived");
                self.abandon_session(false);
                return Err(e.into());
            }
        };

        while let Some(item) = stream.next().await {
            match item {
                Ok(chunk) => self.on_chunk(&chunk)?,
                Err(e) => {
                    let partial = self
                        .session
                        .as_ref()
                        .is_some_and(|s| s.chunk_index > 0);
                    warn!(error = %e, partial, "chat stream failed mid-exchange");
                    self.abandon_session(partial);
                    return Err(e.into());
                }
            }
        }

        self.on_complete()
    }

    /// Drop the open session after a transport failure, leaving the log in
    /// its last consistent form.
    fn abandon_session(&mut self, partial: bool) {
        self.session = None;
        let _ = self.events.send(ChatEvent::Failed { partial });
    }
}

impl Default for ChatController {
    fn default() -> Self {
        Self::new()
    }
}
