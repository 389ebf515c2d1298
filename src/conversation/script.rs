//! Bot scripts: ordered (message, delay) sequences revealed one at a time.

use std::time::Duration;

use crate::leads::{LeadDetails, UserType};
use crate::leads::scoring::HOT_THRESHOLD;

use super::flows::FlowStep;

/// Default composing delay for a bot message.
pub const DEFAULT_DELAY: Duration = Duration::from_millis(600);

const QUESTION_DELAY: Duration = Duration::from_millis(700);
const ACK_DELAY: Duration = Duration::from_millis(800);
const GREETING_PAUSE: Duration = Duration::from_millis(300);

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScriptStep {
    /// Show the composing indicator for `delay`, then reveal `text`.
    Say { text: String, delay: Duration },
    /// Wait without the composing indicator.
    Pause(Duration),
}

/// A sequence of bot steps, played strictly in order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BotScript {
    steps: Vec<ScriptStep>,
}

impl BotScript {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a message with its composing delay.
    pub fn say(mut self, text: impl Into<String>, delay: Duration) -> Self {
        self.steps.push(ScriptStep::Say {
            text: text.into(),
            delay,
        });
        self
    }

    /// Append a silent pause.
    pub fn pause(mut self, delay: Duration) -> Self {
        self.steps.push(ScriptStep::Pause(delay));
        self
    }

    /// Append every step of `other`.
    pub fn then(mut self, other: BotScript) -> Self {
        self.steps.extend(other.steps);
        self
    }

    pub fn steps(&self) -> &[ScriptStep] {
        &self.steps
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Texts of the messages this script reveals, in order.
    pub fn messages(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter_map(|s| match s {
                ScriptStep::Say { text, .. } => Some(text.as_str()),
                ScriptStep::Pause(_) => None,
            })
            .collect()
    }

    /// Sum of all nominal delays.
    pub fn total_delay(&self) -> Duration {
        self.steps
            .iter()
            .map(|s| match s {
                ScriptStep::Say { delay, .. } => *delay,
                ScriptStep::Pause(delay) => *delay,
            })
            .sum()
    }
}

/// Welcome sequence played when a session starts.
pub fn greeting() -> BotScript {
    BotScript::new()
        .say(
            "👋 Hi there! Welcome to **WizKlub** — where young minds discover their superpowers through STEM! 🚀",
            Duration::from_millis(400),
        )
        .pause(GREETING_PAUSE)
        .say(
            "I'm Wiz, your AI guide. I can help you explore our programs or set up a free demo.",
            Duration::from_millis(1000),
        )
        .pause(GREETING_PAUSE)
}

/// What the visitor "says" when choosing a type.
pub fn type_choice_echo(user_type: UserType) -> &'static str {
    match user_type {
        UserType::Parent => "👨‍👩‍👧 I'm a Parent",
        UserType::School => "🏫 I represent a School",
    }
}

/// Acknowledgment after a type is chosen.
pub fn acknowledge(user_type: UserType) -> BotScript {
    let text = match user_type {
        UserType::Parent => "Awesome! Let me personalize this for you 🎯",
        UserType::School => "Excellent! Let me get some details to tailor the best solution for you 🌟",
    };
    BotScript::new().say(text, ACK_DELAY)
}

/// Ask one flow question.
pub fn question(step: &FlowStep) -> BotScript {
    BotScript::new().say(step.prompt, QUESTION_DELAY)
}

/// A visible notice, used for rejected answers.
pub fn notice(text: &str) -> BotScript {
    BotScript::new().say(text, DEFAULT_DELAY)
}

/// Closing sequence once every question is answered.
pub fn completion(details: &LeadDetails, score: u32) -> BotScript {
    let outcome = if score >= HOT_THRESHOLD {
        format!(
            "You're a priority lead (Score: {score}/100)! Our team will reach out within 2 hours. 🔥"
        )
    } else {
        format!(
            "Thank you {}! Our team will reach out within 24 hours.",
            details.first_name()
        )
    };

    BotScript::new()
        .say("🎉 Perfect! I have all the details I need.", ACK_DELAY)
        .say(outcome, Duration::from_millis(1000))
        .say(
            "📅 Want to skip the wait? Book a FREE demo directly:",
            Duration::from_millis(1200),
        )
}
