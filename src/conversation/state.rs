//! Conversation state machine: tracks which stage a session is in.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::ConversationError;
use crate::leads::{LeadDetails, UserType};

/// The coarse phases of a conversation.
///
/// Progresses linearly: Greeting → TypeSelect → Flow → Done.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    #[default]
    Greeting,
    TypeSelect,
    Flow,
    Done,
}

impl Stage {
    /// Check if a transition from `self` to `target` is valid. Only the next
    /// stage in the progression is reachable.
    pub fn can_transition_to(&self, target: Stage) -> bool {
        self.next() == Some(target)
    }

    /// Whether this stage is terminal.
    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }

    /// Get the next stage in the linear progression, if any.
    pub fn next(&self) -> Option<Stage> {
        use Stage::*;
        match self {
            Greeting => Some(TypeSelect),
            TypeSelect => Some(Flow),
            Flow => Some(Done),
            Done => None,
        }
    }
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Self::Greeting => "greeting",
            Self::TypeSelect => "type_select",
            Self::Flow => "flow",
            Self::Done => "done",
        };
        write!(f, "{s}")
    }
}

/// Who wrote a transcript message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sender {
    Bot,
    User,
}

/// One entry in the conversation transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub sender: Sender,
    pub text: String,
    pub sent_at: DateTime<Utc>,
}

impl ChatMessage {
    pub fn bot(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::Bot,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            sender: Sender::User,
            text: text.into(),
            sent_at: Utc::now(),
        }
    }
}

/// Per-session conversation state. Discarded when the session ends.
#[derive(Debug, Clone, Default)]
pub struct ConversationState {
    pub stage: Stage,
    pub user_type: Option<UserType>,
    /// Index of the question currently awaiting an answer.
    pub step_index: usize,
    /// Answers collected so far. `None` until a user type is chosen.
    pub draft: Option<LeadDetails>,
    /// Ordered, append-only.
    pub transcript: Vec<ChatMessage>,
    /// The bot is showing its composing indicator.
    pub composing: bool,
}

impl ConversationState {
    /// Move to `target`, which must be the next stage.
    pub fn advance_to(&mut self, target: Stage) -> Result<(), ConversationError> {
        if !self.stage.can_transition_to(target) {
            return Err(ConversationError::InvalidTransition {
                from: self.stage,
                to: target,
            });
        }
        tracing::debug!(from = %self.stage, to = %target, "Conversation stage changed");
        self.stage = target;
        Ok(())
    }

    /// Fail unless the conversation is in `expected`.
    pub fn require(&self, expected: Stage, action: &'static str) -> Result<(), ConversationError> {
        if self.stage == expected {
            Ok(())
        } else {
            Err(ConversationError::WrongStage {
                action,
                stage: self.stage,
            })
        }
    }

    pub fn push(&mut self, message: ChatMessage) {
        self.transcript.push(message);
    }
}
