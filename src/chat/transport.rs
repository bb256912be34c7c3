//! Chat transport boundary — how a streamed coach reply reaches the core.
//!
//! The aggregation engine only requires that chunks arrive as ordered text
//! fragments and that end-of-stream is observable. The HTTP implementation
//! talks to the coach endpoint; tests script their own streams.

use async_trait::async_trait;
use futures::StreamExt;
use futures::stream::BoxStream;
use secrecy::{ExposeSecret, SecretString};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::error::TransportError;

/// Ordered stream of text fragments for one exchange.
///
/// Ends when the underlying response body is exhausted; an `Err` item ends
/// the stream early.
pub type ChunkStream = BoxStream<'static, Result<String, TransportError>>;

/// A request/response exchange returning a readable stream of text chunks.
///
/// The implementation attaches the caller's auth token before the request
/// goes out. Cancelling the token tears the in-flight exchange down instead
/// of leaving orphaned work on the server.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn send(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<ChunkStream, TransportError>;
}

/// HTTP transport for the streaming chat endpoint.
///
/// POSTs `{"input": ...}` with a bearer token and yields the response body
/// incrementally as UTF-8 text.
pub struct HttpChatTransport {
    client: reqwest::Client,
    url: String,
    token: SecretString,
}

impl HttpChatTransport {
    pub fn new(url: impl Into<String>, token: SecretString) -> Self {
        Self {
            client: reqwest::Client::new(),
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl ChatTransport for HttpChatTransport {
    async fn send(
        &self,
        input: &str,
        cancel: &CancellationToken,
    ) -> Result<ChunkStream, TransportError> {
        if cancel.is_cancelled() {
            return Err(TransportError::Cancelled);
        }

        let response = tokio::select! {
            biased;
            _ = cancel.cancelled() => return Err(TransportError::Cancelled),
            result = self
                .client
                .post(&self.url)
                .bearer_auth(self.token.expose_secret())
                .json(&serde_json::json!({ "input": input }))
                .send() => result.map_err(|e| TransportError::RequestFailed {
                    url: self.url.clone(),
                    reason: e.to_string(),
                })?,
        };

        let status = response.status();
        if !status.is_success() {
            return Err(TransportError::BadStatus {
                status: status.as_u16(),
            });
        }

        debug!(url = %self.url, "chat stream opened");
        let bytes = response
            .bytes_stream()
            .map(|r| r.map(|b| b.to_vec()))
            .boxed();
        Ok(decode_chunks(bytes, cancel.clone()))
    }
}

/// Decode a byte stream into text chunks, carrying incomplete UTF-8
/// sequences over to the next frame.
fn decode_chunks<S, E>(bytes: S, cancel: CancellationToken) -> ChunkStream
where
    S: futures::Stream<Item = std::result::Result<Vec<u8>, E>> + Send + Unpin + 'static,
    E: std::fmt::Display,
{
    struct DecodeState<S> {
        bytes: S,
        pending: Vec<u8>,
        chunks: u32,
        cancel: CancellationToken,
        done: bool,
    }

    let state = DecodeState {
        bytes,
        pending: Vec::new(),
        chunks: 0,
        cancel,
        done: false,
    };

    futures::stream::unfold(state, |mut state| async move {
        loop {
            if state.done {
                return None;
            }

            let (cancelled, frame) = tokio::select! {
                biased;
                _ = state.cancel.cancelled() => (true, None),
                frame = state.bytes.next() => (false, frame),
            };

            if cancelled {
                state.done = true;
                return Some((Err(TransportError::Cancelled), state));
            }

            match frame {
                Some(Ok(frame)) => {
                    state.pending.extend_from_slice(&frame);
                    let text = match take_complete_utf8(&mut state.pending) {
                        Ok(text) => text,
                        Err(e) => {
                            state.done = true;
                            return Some((Err(TransportError::InvalidEncoding(e)), state));
                        }
                    };
                    if text.is_empty() {
                        // Frame ended mid-codepoint; wait for the rest.
                        continue;
                    }
                    state.chunks += 1;
                    return Some((Ok(text), state));
                }
                Some(Err(e)) => {
                    state.done = true;
                    return Some((
                        Err(TransportError::StreamInterrupted {
                            chunks: state.chunks,
                            reason: e.to_string(),
                        }),
                        state,
                    ));
                }
                None => {
                    state.done = true;
                    if !state.pending.is_empty() {
                        return Some((
                            Err(TransportError::InvalidEncoding(
                                "stream ended mid-codepoint".to_string(),
                            )),
                            state,
                        ));
                    }
                    return None;
                }
            }
        }
    })
    .boxed()
}

/// Split off the longest valid UTF-8 prefix of `pending`, leaving any
/// trailing incomplete sequence in place.
fn take_complete_utf8(pending: &mut Vec<u8>) -> std::result::Result<String, String> {
    match std::str::from_utf8(pending) {
        Ok(text) => {
            let text = text.to_string();
            pending.clear();
            Ok(text)
        }
        Err(e) => {
            if e.error_len().is_some() {
                // Invalid bytes in the middle, not a truncated tail.
                return Err(e.to_string());
            }
            let valid = e.valid_up_to();
            let text = String::from_utf8_lossy(&pending[..valid]).into_owned();
            pending.drain(..valid);
            Ok(text)
        }
    }
}
