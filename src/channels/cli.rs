//! CLI channel: stdin/stdout chat for a terminal visitor.

use async_trait::async_trait;
use futures::stream;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

use crate::channels::{Channel, IncomingMessage, MessageStream, OutgoingResponse, StatusUpdate};
use crate::error::ChannelError;

const COMPOSING_INDICATOR: &str = "🤖 Wiz is typing…";

/// Reads visitor lines from stdin and writes the chat to stdout.
///
/// The composing indicator goes to stderr so redirected stdout holds only
/// the conversation.
pub struct CliChannel;

impl CliChannel {
    pub fn new() -> Self {
        Self
    }

    fn send_failed(&self, err: std::io::Error) -> ChannelError {
        ChannelError::SendFailed {
            name: self.name().to_string(),
            reason: err.to_string(),
        }
    }
}

impl Default for CliChannel {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Channel for CliChannel {
    fn name(&self) -> &str {
        "cli"
    }

    async fn start(&self) -> Result<MessageStream, ChannelError> {
        let (tx, rx) = tokio::sync::mpsc::unbounded_channel();

        tokio::spawn(async move {
            let stdin = tokio::io::stdin();
            let reader = BufReader::new(stdin);
            let mut lines = reader.lines();

            loop {
                match lines.next_line().await {
                    Ok(Some(line)) => {
                        // Empty lines are forwarded; the engine ignores them.
                        let msg = IncomingMessage::new("cli", "local-visitor", &line);
                        if tx.send(msg).is_err() {
                            break;
                        }
                    }
                    Ok(None) => break, // EOF
                    Err(e) => {
                        tracing::error!("Error reading stdin: {}", e);
                        break;
                    }
                }
            }
        });

        let stream = stream::unfold(rx, |mut rx| async move {
            rx.recv().await.map(|msg| (msg, rx))
        });

        Ok(Box::pin(stream))
    }

    async fn respond(&self, response: OutgoingResponse) -> Result<(), ChannelError> {
        let mut stdout = tokio::io::stdout();
        stdout
            .write_all(format!("{}\n", response.content).as_bytes())
            .await
            .map_err(|e| self.send_failed(e))?;
        stdout.flush().await.map_err(|e| self.send_failed(e))?;
        Ok(())
    }

    async fn send_status(&self, status: StatusUpdate) -> Result<(), ChannelError> {
        match status {
            StatusUpdate::Composing => eprint!("{COMPOSING_INDICATOR}\r"),
            // Erase the indicator line.
            StatusUpdate::Idle => eprint!("\x1b[2K\r"),
        }
        Ok(())
    }
}
