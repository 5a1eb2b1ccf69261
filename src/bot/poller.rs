use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tokio::time;
use tracing::{debug, info, warn};

use crate::constants::POLL_RETRY_DELAY_SECS;
use crate::telegram::{Messenger, Update};

use super::{stop_requested, ShutdownSignal};

/// Long-polls the messenger and forwards updates, in delivery order, to `sink`.
///
/// Returns on any stop request or when the receiving side is gone; dropping
/// `sink` on return lets the dispatcher finish what is already queued.
pub async fn run_poller(
    messenger: Arc<dyn Messenger>,
    timeout: Duration,
    sink: mpsc::Sender<Update>,
    mut shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    info!(timeout_secs = timeout.as_secs(), "update poller started");
    let mut offset: i64 = 0;

    'poll: loop {
        let polled = tokio::select! {
            polled = messenger.poll_updates(offset, timeout) => polled,
            _ = stop_requested(&mut shutdown) => break,
        };

        let batch = match polled {
            Ok(batch) => batch,
            Err(err) => {
                warn!(
                    error = %err,
                    retry_secs = POLL_RETRY_DELAY_SECS,
                    "failed to get updates, retrying"
                );
                tokio::select! {
                    _ = time::sleep(Duration::from_secs(POLL_RETRY_DELAY_SECS)) => continue,
                    _ = stop_requested(&mut shutdown) => break,
                }
            }
        };

        offset = offset.max(batch.next_offset);
        debug!(count = batch.updates.len(), offset, "received updates");

        for update in batch.updates {
            tokio::select! {
                sent = sink.send(update) => {
                    if sent.is_err() {
                        break 'poll;
                    }
                }
                _ = stop_requested(&mut shutdown) => break 'poll,
            }
        }
    }

    info!("update poller stopped");
    Ok(())
}
