use std::sync::Arc;

use anyhow::Context;
use tokio::sync::watch;

use wizbot::channels::{Channel, CliChannel};
use wizbot::config::ChatConfig;
use wizbot::leads::Dashboard;
use wizbot::logging::init_logging;
use wizbot::session::run_session;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ChatConfig::from_env().context("Failed to load configuration")?;
    let _log_guard = init_logging(&config).context("Failed to initialize logging")?;

    eprintln!("🤖 Wizbot v{}", env!("CARGO_PKG_VERSION"));
    eprintln!("   Pacing: {}%", config.pacing_percent);
    eprintln!(
        "   Contact validation: {}",
        if config.strict_contact { "strict" } else { "non-empty only" }
    );
    if let Some(dir) = &config.log_dir {
        eprintln!("   Log dir: {}", dir.display());
    }
    eprintln!("   Type /help for commands, /quit to exit.\n");

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received, shutting down");
            let _ = shutdown_tx.send(true);
        }
    });

    let channel: Arc<dyn Channel> = Arc::new(CliChannel::new());
    let store = run_session(config, channel, shutdown_rx).await?;

    let dash = Dashboard::build(&store).await;
    tracing::info!(
        total = dash.totals.total,
        hot = dash.totals.hot,
        schools = dash.totals.schools,
        "Session summary"
    );

    Ok(())
}
