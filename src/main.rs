use chrono::Utc;
use habit_tracker::{AppState, Config, load_data, persist_data, router, sample::sample_data};
use std::net::SocketAddr;
use tokio::fs;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("info".parse()?))
        .init();

    let config = Config::from_env();
    if let Some(parent) = config.data_path.parent() {
        if !parent.as_os_str().is_empty() {
            fs::create_dir_all(parent).await?;
        }
    }

    let loaded = load_data(&config.data_path).await;
    let mut data = loaded.data;
    let now = Utc::now();

    if loaded.fresh && config.seed_sample_data {
        info!("seeding sample goals and habits");
        data = sample_data(habit_tracker::dates::today(), now);
        persist_data(&config.data_path, &data).await?;
    }

    let repaired = data.reconcile(now);
    if repaired > 0 {
        warn!("recomputed {repaired} stale habit streak(s) on load");
        persist_data(&config.data_path, &data).await?;
    }

    info!(
        habits = data.habits.len(),
        goals = data.goals.len(),
        "loaded {}",
        config.data_path.display()
    );

    let state = AppState::new(config.data_path.clone(), data);
    let app = router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!("listening on http://{addr}");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("failed to listen for shutdown signal: {err}");
    }
}
