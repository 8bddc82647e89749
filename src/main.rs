use anyhow::Context;
use std::net::SocketAddr;
use tokio::task;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use seat_booking::{app, config::Config, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = Config::from_env().context("invalid configuration")?;

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(&config.app.rust_log))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting seat booking widget");
    info!(
        "Seat layout: rows {:?} x {} seats, events from {}",
        config.seating.rows(),
        config.seating.seats_per_row(),
        config.backend.events_source
    );

    let addr: SocketAddr = format!("{}:{}", config.app.host, config.app.port)
        .parse()
        .context("invalid HOST/PORT")?;

    // Create the shared application state
    let app_state = AppState::new(config).context("failed to build HTTP client")?;

    // Периодически удаляем брошенные страницы
    let sweeper_state = app_state.clone();
    let sweep_interval = app_state.config.sessions.sweep_interval;
    task::spawn(async move {
        loop {
            tokio::time::sleep(sweep_interval).await;
            sweeper_state.sessions.sweep_expired().await;
        }
    });

    let app = app(app_state);

    info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service()).await?;
    Ok(())
}
