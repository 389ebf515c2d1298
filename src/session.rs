//! Chat session: the application context hosting one conversation.
//!
//! The session owns the lead store handle, the conversation engine, the
//! current view and the channel. It dispatches visitor input to the engine,
//! plays the bot's replies, and renders the derived views.

use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::channels::{Channel, IncomingMessage, OutgoingResponse};
use crate::config::ChatConfig;
use crate::conversation::{
    AnswerValidator, BotScript, ConversationEngine, PlayOutcome, ScriptPlayer, Stage, Submission,
};
use crate::error::Result;
use crate::leads::{Dashboard, LeadStore};
use crate::render;

/// Which view the visitor is looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum View {
    #[default]
    Chat,
    Dashboard,
}

/// Slash commands available in every view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Dashboard,
    Chat,
    Transcript,
    Export,
    Help,
    Quit,
}

impl Command {
    /// Parse a slash command. Anything else is conversation input.
    pub fn parse(input: &str) -> Option<Self> {
        match input.trim().to_ascii_lowercase().as_str() {
            "/dashboard" => Some(Self::Dashboard),
            "/chat" => Some(Self::Chat),
            "/transcript" => Some(Self::Transcript),
            "/export" => Some(Self::Export),
            "/help" => Some(Self::Help),
            "/quit" | "/exit" => Some(Self::Quit),
            _ => None,
        }
    }
}

/// Whether the session should keep reading input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Stop,
}

/// One conversation hosted on a channel.
pub struct ChatSession {
    config: ChatConfig,
    store: Arc<LeadStore>,
    engine: ConversationEngine,
    player: ScriptPlayer,
    channel: Arc<dyn Channel>,
    view: View,
    shutdown: watch::Receiver<bool>,
}

impl ChatSession {
    pub fn new(
        config: ChatConfig,
        store: Arc<LeadStore>,
        channel: Arc<dyn Channel>,
        shutdown: watch::Receiver<bool>,
    ) -> Self {
        let engine = ConversationEngine::new(
            Arc::clone(&store),
            AnswerValidator::new(config.strict_contact),
        );
        Self {
            player: ScriptPlayer::new(config.clone()),
            config,
            store,
            engine,
            channel,
            view: View::default(),
            shutdown,
        }
    }

    /// Run until the visitor leaves or shutdown is requested.
    pub async fn run(&mut self) -> Result<()> {
        let mut stream = self.channel.start().await?;
        info!(channel = self.channel.name(), "Chat session started");

        self.say(render::header()).await?;

        let greeting = self.engine.start()?;
        if self.play(&greeting).await? == PlayOutcome::Completed {
            self.engine.finish_greeting()?;
            self.show_controls().await?;

            loop {
                let message = tokio::select! {
                    message = stream.next() => message,
                    Ok(()) = self.shutdown.changed() => None,
                };
                let Some(message) = message else { break };
                if self.handle(message).await? == Flow::Stop {
                    break;
                }
                if *self.shutdown.borrow() {
                    break;
                }
            }
        }

        let leads = self.store.len().await;
        let stage = self.engine.stage();
        info!(
            %stage,
            completed = stage.is_terminal(),
            leads,
            "Chat session ended"
        );
        self.channel.shutdown().await?;
        Ok(())
    }

    /// Handle one line of visitor input.
    async fn handle(&mut self, message: IncomingMessage) -> Result<Flow> {
        if let Some(command) = Command::parse(&message.content) {
            return self.command(command).await;
        }

        if self.view == View::Dashboard {
            debug!("Input ignored while the dashboard is shown");
            self.say("  (showing the dashboard, type /chat to continue chatting)")
                .await?;
            return Ok(Flow::Continue);
        }

        match self.engine.stage() {
            Stage::Greeting => {}
            Stage::TypeSelect => self.choose_type(&message.content).await?,
            Stage::Flow => self.answer(&message.content).await?,
            Stage::Done => {
                self.say("  (this chat is complete, type /dashboard to see leads)")
                    .await?;
            }
        }
        Ok(Flow::Continue)
    }

    async fn command(&mut self, command: Command) -> Result<Flow> {
        match command {
            Command::Dashboard => {
                self.view = View::Dashboard;
                let dash = Dashboard::build(&self.store).await;
                self.say(render::dashboard(&dash)).await?;
            }
            Command::Chat => {
                if self.view != View::Chat {
                    self.view = View::Chat;
                    self.show_controls().await?;
                }
            }
            Command::Transcript => {
                self.say(render::transcript(&self.engine.state().transcript))
                    .await?;
            }
            Command::Export => self.export().await?,
            Command::Help => self.say(render::help()).await?,
            Command::Quit => return Ok(Flow::Stop),
        }
        Ok(Flow::Continue)
    }

    async fn choose_type(&mut self, input: &str) -> Result<()> {
        if input.trim().is_empty() {
            return Ok(());
        }
        let Some(user_type) = render::parse_type_choice(input) else {
            self.say(render::type_select_controls()).await?;
            return Ok(());
        };

        let reply = self.engine.select_type(user_type)?;
        if self.play(&reply).await? == PlayOutcome::Completed {
            self.show_controls().await?;
        }
        Ok(())
    }

    async fn answer(&mut self, input: &str) -> Result<()> {
        let submission = self.engine.submit(input).await?;
        if let Submission::Completed { lead, score, .. } = &submission {
            info!(lead_id = %lead.id, score, "Conversation complete");
        }

        let Some(script) = submission.script() else {
            return Ok(());
        };
        if self.play(script).await? == PlayOutcome::Completed {
            self.show_controls().await?;
        }
        Ok(())
    }

    /// Render the input controls for the current stage.
    async fn show_controls(&self) -> Result<()> {
        let controls = match self.engine.stage() {
            Stage::Greeting => return Ok(()),
            Stage::TypeSelect => render::type_select_controls(),
            Stage::Flow => match self.engine.current_step() {
                Some(step) => render::step_controls(step),
                None => return Ok(()),
            },
            Stage::Done => {
                let score = self
                    .engine
                    .captured()
                    .map(|lead| crate::leads::score(&lead.details))
                    .or_else(|| self.engine.draft_score())
                    .unwrap_or(0);
                render::call_to_action(&self.config, score)
            }
        };
        self.say(controls).await
    }

    async fn export(&self) -> Result<()> {
        let leads = self.store.list().await;
        match serde_json::to_string_pretty(&leads) {
            Ok(json) => self.say(json).await,
            Err(e) => {
                warn!("Failed to serialize leads: {}", e);
                Ok(())
            }
        }
    }

    async fn play(&mut self, script: &BotScript) -> Result<PlayOutcome> {
        let outcome = self
            .player
            .play(
                script,
                &mut self.engine,
                self.channel.as_ref(),
                &mut self.shutdown,
            )
            .await?;
        Ok(outcome)
    }

    async fn say(&self, text: impl Into<String>) -> Result<()> {
        if let Err(e) = self.channel.respond(OutgoingResponse::text(text)).await {
            warn!(channel = self.channel.name(), "Failed to respond: {}", e);
            return Err(e.into());
        }
        Ok(())
    }
}

/// Host a single session on `channel` with a fresh store.
pub async fn run_session(
    config: ChatConfig,
    channel: Arc<dyn Channel>,
    shutdown: watch::Receiver<bool>,
) -> Result<Arc<LeadStore>> {
    let store = LeadStore::new();
    let mut session = ChatSession::new(config, Arc::clone(&store), channel, shutdown);
    session.run().await?;
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::CliChannel;

    fn assert_send<T: Send>(_: &T) {}

    #[test]
    fn session_future_can_be_spawned() {
        let (_tx, rx) = watch::channel(false);
        let channel: Arc<dyn Channel> = Arc::new(CliChannel::new());
        // Never polled; only the future's type matters here.
        let session = run_session(ChatConfig::unpaced(), channel, rx);
        assert_send(&session);
    }

    #[test]
    fn parse_commands() {
        assert_eq!(Command::parse("/dashboard"), Some(Command::Dashboard));
        assert_eq!(Command::parse(" /CHAT "), Some(Command::Chat));
        assert_eq!(Command::parse("/export"), Some(Command::Export));
        assert_eq!(Command::parse("/exit"), Some(Command::Quit));
        assert_eq!(Command::parse("/transcript"), Some(Command::Transcript));
        assert_eq!(Command::parse("dashboard"), None);
        assert_eq!(Command::parse("/unknown"), None);
        assert_eq!(Command::parse(""), None);
    }

    #[test]
    fn default_view_is_chat() {
        assert_eq!(View::default(), View::Chat);
    }
}
