//! Armada Transit core service entrypoint
//!
//! Core service for a scheduled passenger-transport operation: trip
//! generation, seat inventory, booking, payment reconciliation and
//! reminder sweeps. Reads configuration from a TOML file
//! (~/.config/armada-transit/config.toml).

use std::sync::Arc;

use sea_orm_migration::MigratorTrait;
use tracing::{error, info, warn};

use armada_transit::application::services::{
    start_hold_expiry_task, BookingService, CancellationService, ReconciliationService,
    ReminderService, SubscriptionService, TripGenerator,
};
use armada_transit::config::AppConfig;
use armada_transit::domain::ports::{NotificationDispatcher, PaymentGateway};
use armada_transit::domain::RepositoryProvider;
use armada_transit::infrastructure::notify::ServiceNotificationDispatcher;
use armada_transit::infrastructure::payment::HttpPaymentGateway;
use armada_transit::shared::shutdown::{listen_for_shutdown_signals, ShutdownSignal};
use armada_transit::{
    create_api_router, default_config_path, init_database, DatabaseConfig, Migrator,
    SeaOrmRepositoryProvider,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Load configuration ─────────────────────────────────────
    let config_path = std::env::var("TRANSIT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| default_config_path());
    let app_cfg = match AppConfig::load(&config_path) {
        Ok(cfg) => {
            // Initialize logging with configured level
            tracing_subscriber::fmt()
                .with_env_filter(
                    tracing_subscriber::EnvFilter::try_from_default_env()
                        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cfg.logging.level)),
                )
                .init();
            info!("Configuration loaded from {}", config_path.display());
            cfg
        }
        Err(e) => {
            tracing_subscriber::fmt()
                .with_env_filter(tracing_subscriber::EnvFilter::new("info"))
                .init();
            error!("Failed to load config: {}. Using defaults.", e);
            AppConfig::default()
        }
    };

    info!("Starting Armada Transit core service...");

    // ── Prometheus metrics recorder (must be installed before any metrics calls) ──
    let prometheus_handle = metrics_exporter_prometheus::PrometheusBuilder::new()
        .install_recorder()
        .expect("Failed to install Prometheus metrics recorder");
    info!("📊 Prometheus metrics recorder installed");

    // ── Database ───────────────────────────────────────────────
    let db_config = DatabaseConfig {
        url: app_cfg.database.url.clone(),
    };
    info!("Database: {}", db_config.url);

    let db = match init_database(&db_config).await {
        Ok(db) => db,
        Err(e) => {
            error!("Failed to connect to database: {}", e);
            return Err(e.into());
        }
    };

    info!("Running database migrations...");
    if let Err(e) = Migrator::up(&db, None).await {
        error!("Failed to run migrations: {}", e);
        return Err(e.into());
    }
    info!("Migrations completed");

    // ── Adapters ───────────────────────────────────────────────
    let repos: Arc<dyn RepositoryProvider> =
        Arc::new(SeaOrmRepositoryProvider::new(db.clone()));
    let gateway: Arc<dyn PaymentGateway> =
        Arc::new(HttpPaymentGateway::new(&app_cfg.payment)?);
    let dispatcher: Arc<dyn NotificationDispatcher> =
        Arc::new(ServiceNotificationDispatcher::new(db.clone(), &app_cfg.mail)?);

    // ── Workflow services ──────────────────────────────────────
    let generator = Arc::new(TripGenerator::new(db.clone()));
    let booking = Arc::new(BookingService::new(
        db.clone(),
        gateway.clone(),
        app_cfg.payment.clone(),
        app_cfg.booking.clone(),
    ));
    let cancellation = Arc::new(CancellationService::new(db.clone(), gateway.clone()));
    let reconciliation = Arc::new(ReconciliationService::new(db.clone(), dispatcher.clone()));
    let reminders = Arc::new(ReminderService::new(
        repos.clone(),
        dispatcher.clone(),
        app_cfg.reminders.maintenance_tolerance_km,
    ));
    let subscriptions = Arc::new(SubscriptionService::new(
        db.clone(),
        gateway.clone(),
        app_cfg.payment.clone(),
    ));

    // ── Shutdown coordination ──────────────────────────────────
    let shutdown = ShutdownSignal::new();
    tokio::spawn(listen_for_shutdown_signals(shutdown.clone()));

    // ── Background seat-hold expiry sweep ──────────────────────
    start_hold_expiry_task(
        repos.clone(),
        shutdown.clone(),
        app_cfg.booking.hold_check_interval_secs,
    );

    // ── REST API server ────────────────────────────────────────
    let router = create_api_router(
        repos,
        generator,
        booking,
        cancellation,
        reconciliation,
        reminders,
        subscriptions,
        &app_cfg,
        prometheus_handle,
    );

    let addr = format!("{}:{}", app_cfg.server.host, app_cfg.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("REST API server listening on http://{}", addr);
    info!("Swagger UI available at http://{}/docs/", addr);
    info!("🚀 Service started. Press Ctrl+C to shutdown gracefully.");

    let server_shutdown = shutdown.clone();
    axum::serve(listener, router)
        .with_graceful_shutdown(async move {
            server_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        })
        .await?;

    // Perform final cleanup
    info!("🧹 Performing final cleanup...");
    if let Err(e) = db.close().await {
        warn!("Error closing database connection: {}", e);
    } else {
        info!("✅ Database connection closed");
    }

    info!("👋 Armada Transit core service shutdown complete");
    Ok(())
}
