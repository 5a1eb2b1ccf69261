mod dispatcher;
pub mod metrics;
mod poller;

use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal::unix::{signal, SignalKind};
use tokio::sync::{mpsc, watch};
use tracing::{info, warn};

use crate::commands::CommandRegistry;
use crate::config::BotConfig;
use crate::constants::UPDATE_BUFFER;
use crate::market::PaprikaClient;
use crate::telegram::TelegramClient;

pub use dispatcher::Dispatcher;
pub use metrics::Metrics;
pub use poller::run_poller;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ShutdownSignal {
    None,
    /// Stop polling, finish the updates already queued.
    Graceful,
    /// Stop after the update in flight.
    Immediate,
}

/// Resolves with the first stop request. Pends forever once the sender is gone.
pub(crate) async fn stop_requested(shutdown: &mut watch::Receiver<ShutdownSignal>) -> ShutdownSignal {
    loop {
        let current = *shutdown.borrow_and_update();
        if current != ShutdownSignal::None {
            return current;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

pub async fn run_with_config(config: BotConfig) -> Result<()> {
    let (shutdown_tx, shutdown_rx) = watch::channel(ShutdownSignal::None);
    let signals_task = tokio::spawn(handle_signals(shutdown_tx));

    let run_result = run_with_shutdown(config, shutdown_rx).await;

    signals_task.abort();
    let _ = signals_task.await;
    run_result
}

/// Runs the bot until `shutdown` asks it to stop.
pub async fn run_with_shutdown(
    config: BotConfig,
    shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    let listener = TcpListener::bind(config.metrics_addr)
        .await
        .with_context(|| format!("failed to bind metrics endpoint at {}", config.metrics_addr))?;
    run_with_listener(config, listener, shutdown).await
}

/// Same as [`run_with_shutdown`] with the metrics endpoint served on an already bound listener.
pub async fn run_with_listener(
    config: BotConfig,
    listener: TcpListener,
    shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    let config = Arc::new(config);
    info!(debug = config.debug, "starting telegram bot");

    let telegram = Arc::new(TelegramClient::new(
        config.telegram_api_url.as_str(),
        config.token.as_str(),
    ));
    let me = telegram
        .get_me()
        .await
        .context("could not create telegram bot")?;
    info!(
        bot_id = me.id,
        username = me.username.as_deref().unwrap_or(&me.first_name),
        "authorized on telegram"
    );

    let market = Arc::new(PaprikaClient::new(config.paprika_api_url.as_str()));
    let metrics = Arc::new(Metrics::default());

    let metrics_addr = listener
        .local_addr()
        .context("metrics listener has no local address")?;
    info!(addr = %metrics_addr, "launching metrics endpoint /metrics");

    let (update_tx, update_rx) = mpsc::channel(UPDATE_BUFFER);
    let dispatcher = Dispatcher::new(
        telegram.clone(),
        market,
        CommandRegistry::standard(),
        Arc::clone(&metrics),
    );

    tokio::try_join!(
        run_poller(telegram, config.updates_timeout, update_tx, shutdown.clone()),
        dispatcher.run(update_rx, shutdown.clone()),
        metrics::serve(listener, metrics, shutdown),
    )?;

    info!("telegram bot stopped");
    Ok(())
}

async fn handle_signals(shutdown_tx: watch::Sender<ShutdownSignal>) -> Result<()> {
    let mut sigterm =
        signal(SignalKind::terminate()).context("failed to register SIGTERM handler")?;
    let mut sigint =
        signal(SignalKind::interrupt()).context("failed to register SIGINT handler")?;

    loop {
        tokio::select! {
            _ = sigterm.recv() => {
                info!(signal = "SIGTERM", "shutting down gracefully");
                if shutdown_tx.send(ShutdownSignal::Graceful).is_err() {
                    break;
                }
            }
            _ = sigint.recv() => {
                warn!(signal = "SIGINT", "stopping immediately");
                let _ = shutdown_tx.send(ShutdownSignal::Immediate);
                break;
            }
        }
    }

    Ok(())
}
