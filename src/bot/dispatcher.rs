use std::sync::Arc;

use anyhow::Result;
use tokio::sync::{mpsc, watch};
use tracing::{debug, error, info, warn};

use crate::commands::CommandRegistry;
use crate::constants::INVALID_COIN_REPLY;
use crate::market::MarketData;
use crate::telegram::{Messenger, OutboundReply, Update};

use super::metrics::Metrics;
use super::{stop_requested, ShutdownSignal};

/// Turns command updates into replies, one update at a time.
pub struct Dispatcher {
    messenger: Arc<dyn Messenger>,
    market: Arc<dyn MarketData>,
    registry: CommandRegistry,
    metrics: Arc<Metrics>,
}

impl Dispatcher {
    pub fn new(
        messenger: Arc<dyn Messenger>,
        market: Arc<dyn MarketData>,
        registry: CommandRegistry,
        metrics: Arc<Metrics>,
    ) -> Self {
        Self {
            messenger,
            market,
            registry,
            metrics,
        }
    }

    /// Consumes `updates` in order until the channel closes or an immediate stop is requested.
    pub async fn run(
        &self,
        mut updates: mpsc::Receiver<Update>,
        mut shutdown: watch::Receiver<ShutdownSignal>,
    ) -> Result<()> {
        info!("dispatcher started");
        let mut draining = false;

        loop {
            tokio::select! {
                biased;
                signal = stop_requested(&mut shutdown), if !draining => {
                    if signal == ShutdownSignal::Immediate {
                        warn!("dispatcher stopping immediately");
                        break;
                    }
                    info!("dispatcher draining queued updates");
                    draining = true;
                }
                next = updates.recv() => match next {
                    Some(update) => self.handle_update(update).await,
                    None => break,
                },
            }
        }

        info!("dispatcher stopped");
        Ok(())
    }

    /// Replies to a command update exactly once; anything else is skipped.
    pub async fn handle_update(&self, update: Update) {
        debug!(
            update_id = update.update_id,
            chat_id = update.chat_id,
            text = %update.text,
            "got message"
        );

        let Some(command) = update.command.as_deref() else {
            debug!(update_id = update.update_id, "received non-command");
            return;
        };

        self.metrics.record_command();
        let argument = update.argument.as_deref().unwrap_or_default();
        debug!(command, argument, "received command");

        let text = match self
            .registry
            .resolve(command)
            .handle(self.market.as_ref(), argument)
            .await
        {
            Ok(text) => text,
            Err(err) => {
                self.metrics.record_failure();
                warn!(command, argument, error = ?err, "{err}");
                INVALID_COIN_REPLY.to_string()
            }
        };

        let reply = OutboundReply {
            chat_id: update.chat_id,
            reply_to_message_id: update.message_id,
            text,
        };

        if let Err(err) = self.messenger.send_reply(&reply).await {
            self.metrics.record_send_failure();
            error!(chat_id = reply.chat_id, error = ?err, "failed to send reply: {err}");
        }
    }
}
