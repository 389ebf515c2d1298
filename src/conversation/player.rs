//! Script player: reveals a [`BotScript`] on a channel with paced delays.
//!
//! Steps run strictly one after another. During normal operation a script
//! always plays to the end; a shutdown signal cancels it, and no further
//! messages are revealed after that.

use tokio::sync::watch;
use tracing::debug;

use crate::channels::{Channel, OutgoingResponse, StatusUpdate};
use crate::config::ChatConfig;
use crate::error::ChannelError;
use crate::render;

use super::engine::ConversationEngine;
use super::script::{BotScript, ScriptStep};

/// How a script playback ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    Completed,
    /// Shutdown requested; `revealed` messages were shown before stopping.
    Cancelled { revealed: usize },
}

/// Plays scripts with delays scaled by the session's pacing.
#[derive(Debug, Clone)]
pub struct ScriptPlayer {
    config: ChatConfig,
}

impl ScriptPlayer {
    pub fn new(config: ChatConfig) -> Self {
        Self { config }
    }

    /// Play `script`, recording each revealed message in `engine`.
    pub async fn play(
        &self,
        script: &BotScript,
        engine: &mut ConversationEngine,
        channel: &dyn Channel,
        shutdown: &mut watch::Receiver<bool>,
    ) -> Result<PlayOutcome, ChannelError> {
        let mut revealed = 0;
        debug!(
            steps = script.steps().len(),
            nominal_ms = script.total_delay().as_millis() as u64,
            "Playing script"
        );

        for step in script.steps() {
            match step {
                ScriptStep::Say { text, delay } => {
                    engine.begin_composing();
                    channel.send_status(StatusUpdate::Composing).await?;

                    if !self.wait(*delay, shutdown).await {
                        engine.stop_composing();
                        channel.send_status(StatusUpdate::Idle).await?;
                        debug!(revealed, "Script cancelled while composing");
                        return Ok(PlayOutcome::Cancelled { revealed });
                    }

                    channel.send_status(StatusUpdate::Idle).await?;
                    engine.reveal(text);
                    channel
                        .respond(OutgoingResponse::text(render::bot_line(text)))
                        .await?;
                    revealed += 1;
                }
                ScriptStep::Pause(delay) => {
                    if !self.wait(*delay, shutdown).await {
                        debug!(revealed, "Script cancelled during pause");
                        return Ok(PlayOutcome::Cancelled { revealed });
                    }
                }
            }
        }

        Ok(PlayOutcome::Completed)
    }

    /// Sleep for the paced `nominal` delay. Returns false if shutdown was
    /// requested first.
    async fn wait(
        &self,
        nominal: std::time::Duration,
        shutdown: &mut watch::Receiver<bool>,
    ) -> bool {
        if *shutdown.borrow() {
            return false;
        }
        let delay = self.config.scale_delay(nominal);
        if delay.is_zero() {
            return true;
        }
        tokio::select! {
            _ = tokio::time::sleep(delay) => true,
            changed = shutdown.changed() => match changed {
                Ok(()) => !*shutdown.borrow(),
                // Sender gone: nobody can cancel any more, finish the delay.
                Err(_) => {
                    tokio::time::sleep(delay).await;
                    true
                }
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::stream;

    use super::*;
    use crate::channels::MessageStream;
    use crate::conversation::AnswerValidator;
    use crate::leads::LeadStore;

    /// Records everything written to it.
    #[derive(Default)]
    struct RecordingChannel {
        events: Mutex<Vec<String>>,
    }

    impl RecordingChannel {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Channel for RecordingChannel {
        fn name(&self) -> &str {
            "recording"
        }
        async fn start(&self) -> Result<MessageStream, ChannelError> {
            Ok(Box::pin(stream::empty()))
        }
        async fn respond(&self, response: OutgoingResponse) -> Result<(), ChannelError> {
            self.events.lock().unwrap().push(response.content);
            Ok(())
        }
        async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
            self.events.lock().unwrap().push(format!("{status:?}"));
            Ok(())
        }
    }

    fn engine() -> ConversationEngine {
        ConversationEngine::new(LeadStore::new(), AnswerValidator::new(false))
    }

    fn two_messages() -> BotScript {
        BotScript::new()
            .say("first", Duration::from_millis(400))
            .pause(Duration::from_millis(300))
            .say("second", Duration::from_millis(1000))
    }

    #[tokio::test(start_paused = true)]
    async fn plays_in_order_with_composing_indicator() {
        let player = ScriptPlayer::new(ChatConfig::default());
        let channel = RecordingChannel::default();
        let mut engine = engine();
        let (_tx, mut rx) = watch::channel(false);

        let started = tokio::time::Instant::now();
        let outcome = player
            .play(&two_messages(), &mut engine, &channel, &mut rx)
            .await
            .unwrap();

        assert_eq!(outcome, PlayOutcome::Completed);
        assert_eq!(started.elapsed(), Duration::from_millis(1700));
        assert_eq!(
            channel.events(),
            vec![
                "Composing".to_string(),
                "Idle".to_string(),
                render::bot_line("first"),
                "Composing".to_string(),
                "Idle".to_string(),
                render::bot_line("second"),
            ]
        );
        let texts: Vec<_> = engine.state().transcript.iter().map(|m| m.text.as_str()).collect();
        assert_eq!(texts, vec!["first", "second"]);
        assert!(!engine.state().composing);
    }

    #[tokio::test(start_paused = true)]
    async fn pacing_scales_delays() {
        let mut config = ChatConfig::default();
        config.pacing_percent = 50;
        let player = ScriptPlayer::new(config);
        let channel = RecordingChannel::default();
        let mut engine = engine();
        let (_tx, mut rx) = watch::channel(false);

        let started = tokio::time::Instant::now();
        player
            .play(&two_messages(), &mut engine, &channel, &mut rx)
            .await
            .unwrap();
        assert_eq!(started.elapsed(), Duration::from_millis(850));
    }

    #[tokio::test]
    async fn unpaced_plays_immediately() {
        let player = ScriptPlayer::new(ChatConfig::unpaced());
        let channel = RecordingChannel::default();
        let mut engine = engine();
        let (_tx, mut rx) = watch::channel(false);

        let outcome = tokio::time::timeout(
            Duration::from_millis(100),
            player.play(&two_messages(), &mut engine, &channel, &mut rx),
        )
        .await
        .expect("unpaced playback should not wait")
        .unwrap();
        assert_eq!(outcome, PlayOutcome::Completed);
        assert_eq!(engine.state().transcript.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_cancels_mid_script() {
        let player = ScriptPlayer::new(ChatConfig::default());
        let channel = Arc::new(RecordingChannel::default());
        let mut engine = engine();
        let (tx, mut rx) = watch::channel(false);

        tokio::spawn(async move {
            // Lands inside the second message's composing delay.
            tokio::time::sleep(Duration::from_millis(1000)).await;
            let _ = tx.send(true);
        });

        let outcome = player
            .play(&two_messages(), &mut engine, channel.as_ref(), &mut rx)
            .await
            .unwrap();

        assert_eq!(outcome, PlayOutcome::Cancelled { revealed: 1 });
        assert_eq!(engine.state().transcript.len(), 1);
        assert!(!engine.state().composing);
        assert_eq!(channel.events().last().map(String::as_str), Some("Idle"));
    }

    #[tokio::test]
    async fn already_shut_down_reveals_nothing() {
        let player = ScriptPlayer::new(ChatConfig::default());
        let channel = RecordingChannel::default();
        let mut engine = engine();
        let (_tx, mut rx) = watch::channel(true);

        let outcome = player
            .play(&two_messages(), &mut engine, &channel, &mut rx)
            .await
            .unwrap();
        assert_eq!(outcome, PlayOutcome::Cancelled { revealed: 0 });
        assert!(engine.state().transcript.is_empty());
    }
}
