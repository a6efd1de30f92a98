use anyhow::{Context, Result, bail};
use tracing::info;

use crate::core::{PollingController, Reported, SessionState};

/// Polls until Ctrl-C, or until the session ends on its own.
///
/// Failures the controller already sent to the sink come back as
/// [`Reported`], so the caller can exit non-zero without repeating them.
pub async fn run(mut controller: PollingController, coins: &str, interval: &str) -> Result<()> {
    controller.start(coins, interval).map_err(Reported)?;

    let mut state = controller.subscribe();
    let ended_on_its_own = tokio::select! {
        signal = tokio::signal::ctrl_c() => {
            signal.context("Failed to listen for Ctrl-C")?;
            info!("Received Ctrl-C, stopping");
            false
        }
        _ = state.wait_for(|s| *s == SessionState::Idle) => true,
    };

    match controller.exit().await {
        Some(e) if e.is_fatal() => Err(Reported(e).into()),
        _ if ended_on_its_own => bail!("Polling session ended unexpectedly"),
        _ => Ok(()),
    }
}
