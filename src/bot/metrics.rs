use std::fmt::Write as _;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::extract::State;
use axum::http::header;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Router;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::info;

use super::{stop_requested, ShutdownSignal};

const CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Process-wide counters, shared by reference between the dispatcher and the endpoint.
#[derive(Debug, Default)]
pub struct Metrics {
    commands_processed: AtomicU64,
    commands_failed: AtomicU64,
    replies_failed: AtomicU64,
}

impl Metrics {
    pub fn record_command(&self) {
        self.commands_processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_failure(&self) {
        self.commands_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_send_failure(&self) {
        self.replies_failed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn commands_processed(&self) -> u64 {
        self.commands_processed.load(Ordering::Relaxed)
    }

    pub fn commands_failed(&self) -> u64 {
        self.commands_failed.load(Ordering::Relaxed)
    }

    pub fn replies_failed(&self) -> u64 {
        self.replies_failed.load(Ordering::Relaxed)
    }

    /// Prometheus text exposition of every counter.
    pub fn render(&self) -> String {
        let counters = [
            (
                "commands_processed",
                "The total number of processed commands",
                self.commands_processed(),
            ),
            (
                "commands_failed",
                "The total number of commands answered with an error reply",
                self.commands_failed(),
            ),
            (
                "replies_failed",
                "The total number of replies that could not be sent",
                self.replies_failed(),
            ),
        ];

        let mut out = String::new();
        for (name, help, value) in counters {
            let _ = writeln!(out, "# HELP {name} {help}");
            let _ = writeln!(out, "# TYPE {name} counter");
            let _ = writeln!(out, "{name} {value}");
        }
        out
    }
}

pub fn router(metrics: Arc<Metrics>) -> Router {
    Router::new()
        .route("/metrics", get(scrape))
        .with_state(metrics)
}

async fn scrape(State(metrics): State<Arc<Metrics>>) -> impl IntoResponse {
    ([(header::CONTENT_TYPE, CONTENT_TYPE)], metrics.render())
}

pub async fn serve(
    listener: TcpListener,
    metrics: Arc<Metrics>,
    mut shutdown: watch::Receiver<ShutdownSignal>,
) -> Result<()> {
    let shutdown_signal = async move {
        stop_requested(&mut shutdown).await;
    };

    axum::serve(listener, router(metrics).into_make_service())
        .with_graceful_shutdown(shutdown_signal)
        .await
        .context("metrics server terminated with error")?;

    info!("metrics endpoint stopped");
    Ok(())
}
