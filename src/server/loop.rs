// Server loop module
// Accepts connections until shutdown, then drains active connections

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::watch;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::error::ServerError;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(50);
/// Pause after a failed accept (e.g. EMFILE) before trying again
const ACCEPT_ERROR_BACKOFF: Duration = Duration::from_millis(50);

/// Run the accept loop on `listener` until `shutdown` resolves.
///
/// `shutdown` yields a label for the log line (for example the signal name).
/// After it fires no new connections are accepted, open connections are told
/// to finish and the call waits up to `performance.shutdown_grace_period`
/// seconds for them.
pub async fn run<S, L>(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: S,
) -> Result<(), ServerError>
where
    S: Future<Output = L>,
    L: std::fmt::Display,
{
    let active_connections = Arc::new(AtomicUsize::new(0));
    let (notify_tx, notify_rx) = watch::channel(false);

    logger::log_server_ready(&listener.local_addr()?);

    let mut shutdown = std::pin::pin!(shutdown);
    let reason = loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &notify_rx,
                        );
                    }
                    Err(e) => accept_failed(&e).await,
                }
            }
            reason = shutdown.as_mut() => break reason,
        }
    };

    logger::log_shutdown_requested(&reason.to_string());
    drop(listener);
    // Receivers may all be gone already; nothing to notify then
    let _ = notify_tx.send(true);

    let grace = Duration::from_secs(state.config.performance.shutdown_grace_period);
    let remaining = drain(&active_connections, grace).await;
    logger::log_shutdown_complete(remaining);
    Ok(())
}

/// Log a failed accept and back off so a persistent error cannot spin the loop
async fn accept_failed(err: &std::io::Error) {
    logger::log_error(&format!("Failed to accept connection: {err}"));
    tokio::time::sleep(ACCEPT_ERROR_BACKOFF).await;
}

/// Wait until the counter reaches zero or `grace` elapses; returns what is left
async fn drain(active_connections: &AtomicUsize, grace: Duration) -> usize {
    let deadline = tokio::time::Instant::now() + grace;
    loop {
        let remaining = active_connections.load(Ordering::SeqCst);
        if remaining == 0 || tokio::time::Instant::now() >= deadline {
            return remaining;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
}
