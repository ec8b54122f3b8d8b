//! Asset availability service over stdin/stdout.
//!
//! Reads one JSON request per line, writes one JSON response per line, and
//! sweeps overdue locks in the background until EOF or Ctrl-C.

use asset_availability::application::{
    AvailabilityService, OverdueLockHandling, run_overdue_sweeps,
};
use asset_availability::config::Config;
use asset_availability::controller::AssetAvailabilityController;
use asset_availability::domain::AssetAvailabilityRepository;
use asset_availability::infrastructure::{
    ChannelEventPublisher, InMemoryAssetAvailabilityRepository,
};
use asset_availability::types::Principal;
use asset_availability_core::environment::{Clock, SystemClock};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::signal;
use tokio::sync::broadcast;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // A missing .env file is fine
    dotenvy::dotenv().ok();
    let config = Config::from_env()?;

    // Logs go to stderr; stdout carries responses
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.log_filter())),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!(
        sweep_interval_ms = config.sweep_interval.as_millis(),
        default_principal = %config.default_principal,
        event_buffer = config.event_buffer,
        "Starting asset availability service"
    );

    let clock: Arc<dyn Clock> = Arc::new(SystemClock);
    let repository: Arc<dyn AssetAvailabilityRepository> =
        Arc::new(InMemoryAssetAvailabilityRepository::new(Arc::clone(&clock)));
    let (publisher, mut published) =
        ChannelEventPublisher::new(config.event_buffer, Arc::clone(&clock));

    let service = Arc::new(AvailabilityService::new(
        Arc::clone(&repository),
        Arc::new(publisher),
        Arc::clone(&clock),
    ));
    let handling = Arc::new(OverdueLockHandling::new(Arc::clone(&service), repository));
    let controller = AssetAvailabilityController::new(service, clock);

    let (shutdown, _) = broadcast::channel(1);
    let sweeper = tokio::spawn(run_overdue_sweeps(
        handling,
        config.sweep_interval,
        shutdown.subscribe(),
    ));

    // Ends once every publisher handle is dropped
    let event_log = tokio::spawn(async move {
        while let Some(event) = published.recv().await {
            info!(
                event_type = %event.event_type,
                metadata = ?event.metadata,
                "Event published"
            );
        }
    });

    let principal = Principal::new(config.default_principal.clone());
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else {
                    info!("End of input");
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }

                let response = controller.handle_json(&line, &principal);
                let mut rendered = response.to_json_line()?;
                rendered.push('\n');
                stdout.write_all(rendered.as_bytes()).await?;
                stdout.flush().await?;
            }
            result = signal::ctrl_c() => {
                result?;
                info!("Received Ctrl-C");
                break;
            }
        }
    }

    // No receivers left is fine; the sweeper may already have stopped
    shutdown.send(()).ok();
    let released = sweeper.await?;
    drop(controller);
    event_log.await?;

    info!(released, "Asset availability service stopped");
    Ok(())
}
