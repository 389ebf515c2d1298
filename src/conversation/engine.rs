//! ConversationEngine: drives a visitor through greeting, type selection and
//! the question flow, capturing a lead at the end.
//!
//! Every action mutates state immediately and returns the [`BotScript`] the
//! bot should play in response. Pacing is left to the script player, which
//! reports back through [`ConversationEngine::begin_composing`] and
//! [`ConversationEngine::reveal`].

use std::sync::Arc;

use tracing::debug;

use crate::error::ConversationError;
use crate::leads::{Lead, LeadDetails, LeadStore, UserType, scoring};

use super::flows::{FlowStep, flow_for};
use super::script::{self, BotScript};
use super::state::{ChatMessage, ConversationState, Stage};
use super::validation::{AnswerValidator, Checked, Rejection};

/// Result of submitting an answer during the flow.
#[derive(Debug, Clone, PartialEq)]
pub enum Submission {
    /// Empty or whitespace-only input. Nothing changed.
    Ignored,
    /// Non-empty input that was not accepted. Nothing changed except the
    /// transcript; `script` explains why.
    Rejected { reason: Rejection, script: BotScript },
    /// Answer stored; `script` asks the next question.
    Accepted { script: BotScript },
    /// Last answer stored and the lead captured.
    Completed {
        lead: Lead,
        score: u32,
        script: BotScript,
    },
}

impl Submission {
    /// The script to play, if any.
    pub fn script(&self) -> Option<&BotScript> {
        match self {
            Self::Ignored => None,
            Self::Rejected { script, .. }
            | Self::Accepted { script }
            | Self::Completed { script, .. } => Some(script),
        }
    }
}

/// One visitor's conversation.
pub struct ConversationEngine {
    state: ConversationState,
    store: Arc<LeadStore>,
    validator: AnswerValidator,
    captured: Option<Lead>,
}

impl ConversationEngine {
    pub fn new(store: Arc<LeadStore>, validator: AnswerValidator) -> Self {
        Self {
            state: ConversationState::default(),
            store,
            validator,
            captured: None,
        }
    }

    pub fn state(&self) -> &ConversationState {
        &self.state
    }

    pub fn stage(&self) -> Stage {
        self.state.stage
    }

    /// The flow for the chosen user type, or an empty flow before selection.
    pub fn flow(&self) -> &'static [FlowStep] {
        self.state.user_type.map(flow_for).unwrap_or(&[])
    }

    /// The question awaiting an answer, if in the flow.
    pub fn current_step(&self) -> Option<&'static FlowStep> {
        if self.state.stage != Stage::Flow || self.state.composing {
            return None;
        }
        self.flow().get(self.state.step_index)
    }

    /// The lead captured by this conversation, once done.
    pub fn captured(&self) -> Option<&Lead> {
        self.captured.as_ref()
    }

    /// Score of the answers collected so far.
    pub fn draft_score(&self) -> Option<u32> {
        self.state.draft.as_ref().map(scoring::score)
    }

    /// Script for the opening greeting. Call [`Self::finish_greeting`] once
    /// it has played.
    pub fn start(&self) -> Result<BotScript, ConversationError> {
        self.state.require(Stage::Greeting, "start")?;
        Ok(script::greeting())
    }

    /// Greeting played; wait for a type choice.
    pub fn finish_greeting(&mut self) -> Result<(), ConversationError> {
        self.state.advance_to(Stage::TypeSelect)
    }

    /// Record the visitor's type and ask the first question.
    pub fn select_type(&mut self, user_type: UserType) -> Result<BotScript, ConversationError> {
        self.state.require(Stage::TypeSelect, "select a user type")?;
        if self.state.composing {
            return Err(ConversationError::Composing);
        }

        self.state.push(ChatMessage::user(script::type_choice_echo(user_type)));
        self.state.advance_to(Stage::Flow)?;
        self.state.user_type = Some(user_type);
        self.state.draft = Some(LeadDetails::new(user_type));
        self.state.step_index = 0;

        debug!(user_type = %user_type, "User type selected");

        let mut reply = script::acknowledge(user_type);
        if let Some(first) = flow_for(user_type).first() {
            reply = reply.then(script::question(first));
        }
        Ok(reply)
    }

    /// Answer the current question.
    pub async fn submit(&mut self, raw: &str) -> Result<Submission, ConversationError> {
        self.state.require(Stage::Flow, "answer a question")?;

        let step_index = self.state.step_index;
        let flow = self.flow();
        let step = flow
            .get(step_index)
            .ok_or(ConversationError::WrongStage {
                action: "answer a question",
                stage: self.state.stage,
            })?;

        if self.state.composing {
            debug!(step = step.id, "Answer refused while composing");
            return Ok(Submission::Rejected {
                reason: Rejection::Busy,
                script: BotScript::new(),
            });
        }

        let value = match self.validator.check(step, raw) {
            Checked::Empty => {
                debug!(step = step.id, "Empty answer ignored");
                return Ok(Submission::Ignored);
            }
            Checked::Rejected(reason) => {
                debug!(step = step.id, %reason, "Answer rejected");
                self.state.push(ChatMessage::user(raw));
                return Ok(Submission::Rejected {
                    script: script::notice(reason.notice()),
                    reason,
                });
            }
            Checked::Accepted(value) => value,
        };

        self.state.push(ChatMessage::user(value.clone()));
        let draft = self
            .state
            .draft
            .as_mut()
            .ok_or(ConversationError::WrongStage {
                action: "answer a question",
                stage: Stage::TypeSelect,
            })?;
        draft.set(step.field, value);
        self.state.step_index += 1;

        if let Some(next) = flow.get(self.state.step_index) {
            debug!(step = next.id, index = self.state.step_index, "Asking next question");
            return Ok(Submission::Accepted {
                script: script::question(next),
            });
        }

        self.complete().await
    }

    /// Every question answered: capture the lead and say goodbye.
    async fn complete(&mut self) -> Result<Submission, ConversationError> {
        self.state.advance_to(Stage::Done)?;

        let details = self.state.draft.clone().ok_or(ConversationError::WrongStage {
            action: "capture a lead",
            stage: Stage::Done,
        })?;
        let score = scoring::score(&details);
        let lead = Lead::new(details);

        self.store.append(lead.clone()).await;
        self.captured = Some(lead.clone());

        Ok(Submission::Completed {
            script: script::completion(&lead.details, score),
            lead,
            score,
        })
    }

    /// The composing indicator is showing.
    pub fn begin_composing(&mut self) {
        self.state.composing = true;
    }

    /// A bot message became visible.
    pub fn reveal(&mut self, text: &str) {
        self.state.composing = false;
        self.state.push(ChatMessage::bot(text));
    }

    /// A script ended early; drop the composing indicator.
    pub fn stop_composing(&mut self) {
        self.state.composing = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conversation::state::Sender;
    use crate::leads::LeadField;

    fn engine(strict: bool) -> (ConversationEngine, Arc<LeadStore>) {
        let store = LeadStore::new();
        let engine = ConversationEngine::new(Arc::clone(&store), AnswerValidator::new(strict));
        (engine, store)
    }

    /// Reveal every message of `script` immediately.
    fn play(engine: &mut ConversationEngine, script: &BotScript) {
        for text in script.messages() {
            engine.begin_composing();
            engine.reveal(text);
        }
    }

    fn into_flow(engine: &mut ConversationEngine, user_type: UserType) {
        let greeting = engine.start().unwrap();
        play(engine, &greeting);
        engine.finish_greeting().unwrap();
        let reply = engine.select_type(user_type).unwrap();
        play(engine, &reply);
    }

    #[test]
    fn greeting_then_type_select() {
        let (mut engine, _) = engine(false);
        assert_eq!(engine.stage(), Stage::Greeting);
        let script = engine.start().unwrap();
        assert_eq!(script.messages().len(), 2);
        engine.finish_greeting().unwrap();
        assert_eq!(engine.stage(), Stage::TypeSelect);
        assert!(engine.start().is_err());
    }

    #[test]
    fn cannot_select_type_during_greeting() {
        let (mut engine, _) = engine(false);
        let err = engine.select_type(UserType::Parent).unwrap_err();
        assert_eq!(
            err,
            ConversationError::WrongStage {
                action: "select a user type",
                stage: Stage::Greeting
            }
        );
    }

    #[test]
    fn select_type_resets_flow_and_asks_first_question() {
        let (mut engine, _) = engine(false);
        engine.finish_greeting().unwrap();
        let script = engine.select_type(UserType::School).unwrap();

        assert_eq!(engine.stage(), Stage::Flow);
        assert_eq!(engine.state().user_type, Some(UserType::School));
        assert_eq!(engine.state().step_index, 0);
        let messages = script.messages();
        assert_eq!(messages.len(), 2);
        assert!(messages[1].contains("your role at the school"));

        let last = engine.state().transcript.last().unwrap();
        assert_eq!(last.sender, Sender::User);
        assert_eq!(last.text, "🏫 I represent a School");

        assert!(engine.select_type(UserType::Parent).is_err());
    }

    #[tokio::test]
    async fn empty_answer_changes_nothing() {
        let (mut engine, store) = engine(false);
        into_flow(&mut engine, UserType::Parent);
        let before_len = engine.state().transcript.len();
        let before_draft = engine.state().draft.clone();

        for raw in ["", "   ", "\n"] {
            assert_eq!(engine.submit(raw).await.unwrap(), Submission::Ignored);
        }

        assert_eq!(engine.stage(), Stage::Flow);
        assert_eq!(engine.state().step_index, 0);
        assert_eq!(engine.state().draft, before_draft);
        assert_eq!(engine.state().transcript.len(), before_len);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn answer_is_written_to_step_field() {
        let (mut engine, _) = engine(false);
        into_flow(&mut engine, UserType::Parent);

        let outcome = engine.submit("Anita Rao").await.unwrap();
        match outcome {
            Submission::Accepted { script } => {
                assert!(script.messages()[0].starts_with("How old"));
            }
            other => panic!("Expected Accepted, got {other:?}"),
        }
        assert_eq!(engine.state().step_index, 1);
        assert_eq!(
            engine.state().draft.as_ref().unwrap().get(LeadField::Name),
            Some("Anita Rao")
        );
    }

    #[tokio::test]
    async fn unknown_option_is_rejected_without_advancing() {
        let (mut engine, _) = engine(false);
        into_flow(&mut engine, UserType::Parent);
        engine.submit("Anita").await.unwrap();
        engine.submit("8").await.unwrap();

        let outcome = engine.submit("Painting").await.unwrap();
        assert!(matches!(
            outcome,
            Submission::Rejected {
                reason: Rejection::NotAnOption,
                ..
            }
        ));
        assert_eq!(engine.state().step_index, 2);
        assert!(!engine.state().draft.as_ref().unwrap().has(LeadField::Interest));

        engine.submit("2").await.unwrap();
        assert_eq!(
            engine.state().draft.as_ref().unwrap().get(LeadField::Interest),
            Some("Math & Logic")
        );
    }

    #[tokio::test]
    async fn answers_refused_while_composing() {
        let (mut engine, _) = engine(false);
        into_flow(&mut engine, UserType::Parent);
        engine.begin_composing();
        assert!(engine.current_step().is_none());

        let outcome = engine.submit("Anita").await.unwrap();
        assert!(matches!(
            outcome,
            Submission::Rejected {
                reason: Rejection::Busy,
                ..
            }
        ));
        assert_eq!(engine.state().step_index, 0);
        engine.stop_composing();
        assert!(engine.current_step().is_some());
    }

    #[tokio::test]
    async fn parent_flow_captures_exploring_lead() {
        let (mut engine, store) = engine(false);
        into_flow(&mut engine, UserType::Parent);

        let answers = ["Anita Rao", "8, 11", "1", "ASAP", "9876543210"];
        for answer in answers {
            assert!(matches!(
                engine.submit(answer).await.unwrap(),
                Submission::Accepted { .. }
            ));
            assert!(store.is_empty().await, "lead stored before flow finished");
        }

        let outcome = engine.submit("anita@example.com").await.unwrap();
        let Submission::Completed { lead, score, script } = outcome else {
            panic!("Expected Completed");
        };
        assert_eq!(score, 25);
        assert_eq!(lead.user_type(), UserType::Parent);
        assert_eq!(lead.details.urgency.as_deref(), Some("ASAP"));
        assert_eq!(lead.details.interest.as_deref(), Some("Coding & Robotics"));
        assert_eq!(
            script.messages()[1],
            "Thank you Anita! Our team will reach out within 24 hours."
        );

        assert_eq!(engine.stage(), Stage::Done);
        assert!(engine.stage().is_terminal());
        assert_eq!(store.len().await, 1);
        assert_eq!(engine.captured().map(|l| l.id), Some(lead.id));
        assert!(engine.submit("more").await.is_err());
    }

    #[tokio::test]
    async fn school_flow_captures_warm_lead() {
        for bucket in ["1", "2", "3", "4"] {
            let (mut engine, store) = engine(false);
            into_flow(&mut engine, UserType::School);

            let answers = [
                "Priya Sharma, Principal",
                "Green Valley High",
                bucket,
                "Full School Partnership",
                "This academic year",
                "+91 98765 43210",
            ];
            for answer in answers {
                engine.submit(answer).await.unwrap();
            }
            let Submission::Completed { lead, score, .. } =
                engine.submit("principal@gv.edu").await.unwrap()
            else {
                panic!("Expected Completed");
            };
            assert_eq!(score, 55);
            assert_eq!(scoring::ScoreBand::from_score(score), scoring::ScoreBand::Warm);
            assert_eq!(lead.details.urgency.as_deref(), Some("This academic year"));
            assert_eq!(store.len().await, 1);
        }
    }

    #[tokio::test]
    async fn strict_mode_rejects_bad_contact() {
        let (mut engine, _) = engine(true);
        into_flow(&mut engine, UserType::Parent);
        for answer in ["Anita", "8", "1", "2"] {
            engine.submit(answer).await.unwrap();
        }

        let outcome = engine.submit("not a phone").await.unwrap();
        assert!(matches!(
            outcome,
            Submission::Rejected {
                reason: Rejection::InvalidPhone,
                ..
            }
        ));
        assert_eq!(engine.state().step_index, 4);

        engine.submit("98765 43210").await.unwrap();
        let outcome = engine.submit("anita at example").await.unwrap();
        assert!(matches!(
            outcome,
            Submission::Rejected {
                reason: Rejection::InvalidEmail,
                ..
            }
        ));
        assert_eq!(engine.stage(), Stage::Flow);
    }

    #[test]
    fn reveal_appends_bot_message() {
        let (mut engine, _) = engine(false);
        engine.begin_composing();
        assert!(engine.state().composing);
        engine.reveal("hello");
        assert!(!engine.state().composing);
        let last = engine.state().transcript.last().unwrap();
        assert_eq!(last.sender, Sender::Bot);
        assert_eq!(last.text, "hello");
    }
}
