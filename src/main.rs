//! TableBook Server — Restaurant Reservation Engine
//!
//! Main entry point that wires all crates together and starts the
//! reservation engine with its scheduled sweeps.

use std::sync::Arc;

use tracing;
use tracing_subscriber::{EnvFilter, fmt};

use tablebook_core::config::AppConfig;
use tablebook_core::error::AppError;
use tablebook_service::{LogDispatcher, ReservationService};

#[tokio::main]
async fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("TABLEBOOK_ENV").unwrap_or_else(|_| "development".to_string());
    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(true)
                .with_thread_ids(true)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(true)
                .init();
        }
    }
}

/// Main run function
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting TableBook v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    tracing::info!("Connecting to database...");
    let database = tablebook_database::DatabasePool::connect(&config.database).await?;
    database.health_check().await?;

    tracing::info!("Running database migrations...");
    tablebook_database::migration::run_migrations(database.pool()).await?;
    tracing::info!("Database migrations complete");

    let db_pool = database.into_pool();

    // ── Step 2: Initialize repositories ──────────────────────────
    let reservation_repo = Arc::new(
        tablebook_database::repositories::ReservationRepository::new(db_pool.clone()),
    );
    let time_slot_repo = Arc::new(tablebook_database::repositories::TimeSlotRepository::new(
        db_pool.clone(),
    ));
    let restaurant_repo = Arc::new(tablebook_database::repositories::RestaurantRepository::new(
        db_pool.clone(),
    ));

    // ── Step 3: Initialize services ──────────────────────────────
    tracing::info!("Initializing services...");
    let dispatcher = Arc::new(LogDispatcher::new());

    let reservation_service = Arc::new(ReservationService::new(
        db_pool.clone(),
        reservation_repo,
        time_slot_repo,
        restaurant_repo,
        dispatcher,
        config.reservation.clone(),
    ));
    tracing::info!("Services initialized");

    // ── Step 4: Start cron scheduler ─────────────────────────────
    let scheduler = if config.worker.enabled {
        tracing::info!("Starting scheduled sweeps...");

        let scheduler = tablebook_worker::CronScheduler::new(
            Arc::clone(&reservation_service),
            config.worker.clone(),
        )
        .await?;
        scheduler.register_default_tasks().await?;
        scheduler.start().await?;

        tracing::info!("Scheduled sweeps started");
        Some(scheduler)
    } else {
        tracing::info!("Scheduled sweeps disabled");
        None
    };

    tracing::info!("TableBook engine running");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    db_pool.close().await;

    tracing::info!("TableBook shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM)
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
