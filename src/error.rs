//! Error types for the chatbot.

use crate::conversation::state::Stage;

/// Top-level error type.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Conversation error: {0}")]
    Conversation(#[from] ConversationError),

    #[error("Channel error: {0}")]
    Channel(#[from] ChannelError),
}

/// Configuration-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration value for {key}: {message}")]
    InvalidValue { key: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Conversation engine errors.
///
/// These are ordering mistakes by the caller. Bad user input is never an
/// error; see [`crate::conversation::Submission`].
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConversationError {
    #[error("Cannot {action} while the conversation is in stage {stage}")]
    WrongStage { action: &'static str, stage: Stage },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition { from: Stage, to: Stage },

    #[error("The bot is still composing a reply")]
    Composing,
}

/// Channel-related errors.
#[derive(Debug, thiserror::Error)]
pub enum ChannelError {
    #[error("Channel {name} failed to start: {reason}")]
    StartupFailed { name: String, reason: String },

    #[error("Failed to send response on channel {name}: {reason}")]
    SendFailed { name: String, reason: String },
}

/// Result type alias for the chatbot.
pub type Result<T> = std::result::Result<T, Error>;
