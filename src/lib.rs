//! Wizbot: scripted lead-capture chatbot.

pub mod channels;
pub mod config;
pub mod conversation;
pub mod error;
pub mod leads;
pub mod logging;
pub mod render;
pub mod session;
