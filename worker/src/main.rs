/*!
# Sluice Worker

Worker executable for Sluice, a bounded-concurrency message queue poller.

The worker:
- Loads layered settings from a config file, `SLUICE__*` variables and flags
- Connects to Amazon SQS (or any compatible endpoint)
- Echoes every received message to stdout as a JSON line
- Drains in-flight messages on Ctrl+C before exiting
*/

mod echo;
mod settings;
mod sqs;

use clap::{Parser, Subcommand};
use echo::EchoHandler;
use settings::{Settings, StartArgs};
use sluice_core::{Poller, PollerEvent};
use sqs::SqsQueue;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Sluice Worker - Queue Consumer
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start consuming a queue
    Start(StartArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Start(args) => run_worker(args).await,
    }
}

/// Running totals of poller notifications, reported on shutdown
#[derive(Default)]
struct EventTally {
    empty_receives: AtomicUsize,
    fetch_errors: AtomicUsize,
    message_errors: AtomicUsize,
}

impl EventTally {
    fn record(&self, event: PollerEvent) {
        let counter = match event {
            PollerEvent::EmptyQueue => &self.empty_receives,
            PollerEvent::FetchError(_) => &self.fetch_errors,
            PollerEvent::MessageError { .. } => &self.message_errors,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }
}

async fn run_worker(args: StartArgs) -> anyhow::Result<()> {
    let settings = Settings::load(&args)?;
    info!(
        queue_url = %settings.poller.queue_url,
        max_concurrency = settings.poller.max_concurrency,
        "Starting Sluice worker"
    );

    let queue = SqsQueue::connect(&settings.poller.client).await;
    let tally = Arc::new(EventTally::default());
    let recorder = tally.clone();
    let poller = Poller::with_observer(
        settings.poller.clone(),
        Arc::new(queue),
        EchoHandler,
        move |event: PollerEvent| recorder.record(event),
    )?;

    poller.start().await;
    info!("Worker is running. Press Ctrl+C to exit.");

    tokio::signal::ctrl_c().await?;

    info!(
        in_flight = poller.in_flight().await,
        "Shutting down worker..."
    );

    match tokio::time::timeout(settings.shutdown_timeout(), poller.stop()).await {
        Ok(()) => info!("All in-flight messages settled"),
        Err(_) => warn!(
            "Shutdown timed out after {}s; unsettled messages will be redelivered",
            settings.shutdown_timeout_seconds
        ),
    }

    info!(
        empty_receives = tally.empty_receives.load(Ordering::Relaxed),
        fetch_errors = tally.fetch_errors.load(Ordering::Relaxed),
        message_errors = tally.message_errors.load(Ordering::Relaxed),
        "Worker stopped"
    );

    Ok(())
}
