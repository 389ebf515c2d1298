//! Channel trait and the message types that flow through it.

use std::pin::Pin;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use futures::Stream;
use uuid::Uuid;

use crate::error::ChannelError;

/// A line of visitor input.
#[derive(Debug, Clone)]
pub struct IncomingMessage {
    pub id: Uuid,
    /// Name of the channel it arrived on.
    pub channel: String,
    pub user_id: String,
    /// Raw text, untrimmed.
    pub content: String,
    pub received_at: DateTime<Utc>,
}

impl IncomingMessage {
    pub fn new(channel: &str, user_id: &str, content: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            channel: channel.to_string(),
            user_id: user_id.to_string(),
            content: content.to_string(),
            received_at: Utc::now(),
        }
    }
}

/// Text to show the visitor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingResponse {
    pub content: String,
}

impl OutgoingResponse {
    pub fn text(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}

/// Transient indicators that are not part of the transcript.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// The bot is composing its next message.
    Composing,
    /// The composing indicator should disappear.
    Idle,
}

/// Stream of visitor input. Ends when the visitor goes away.
pub type MessageStream = Pin<Box<dyn Stream<Item = IncomingMessage> + Send>>;

/// A surface a conversation can be hosted on.
#[async_trait]
pub trait Channel: Send + Sync {
    fn name(&self) -> &str;

    /// Begin receiving visitor input.
    async fn start(&self) -> Result<MessageStream, ChannelError>;

    /// Show a message or rendered view.
    async fn respond(&self, response: OutgoingResponse) -> Result<(), ChannelError>;

    /// Show or clear a transient indicator.
    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError>;

    async fn shutdown(&self) -> Result<(), ChannelError> {
        Ok(())
    }
}
