//! Streaming chat — incremental assembly of coach replies.
//!
//! A send appends the user's bubble, opens a `StreamSession`, and feeds
//! transport chunks through the `ChatController`, which keeps the
//! conversation log showing the most recently assembled reply at every
//! chunk boundary.

pub mod log;
pub mod session;
pub mod transport;

pub use log::{ConversationLog, Message};
pub use session::{ChatController, ChatEvent, StreamSession};
pub use transport::{ChatTransport, ChunkStream, HttpChatTransport};
