//! Conversation system: the scripted question flow a visitor walks through.
//!
//! A conversation greets the visitor, asks whether they are a parent or a
//! school, then steps through that type's fixed questions. Once every
//! question has a non-empty answer the collected record is captured as a
//! lead in the session's [`crate::leads::LeadStore`].

pub mod engine;
pub mod flows;
pub mod player;
pub mod script;
pub mod state;
pub mod validation;

pub use engine::{ConversationEngine, Submission};
pub use flows::{FlowStep, InputKind, PARENT_FLOW, SCHOOL_FLOW, flow_for};
pub use player::{PlayOutcome, ScriptPlayer};
pub use script::{BotScript, ScriptStep};
pub use state::{ChatMessage, ConversationState, Sender, Stage};
pub use validation::{AnswerValidator, Rejection};
