mod cli;

use std::sync::Arc;

use clap::Parser;
use parkspot_core::ParkingSpots;
use parkspot_gateway::{App, AppState};
use parkspot_service::ParkingSpotService;
use parkspot_storage::{InMemoryRepository, MySqlRepository};
use parkspot_telemetry::TelemetryConfig;
use tokio::net::TcpListener;
use tracing::info;

use crate::cli::{StorageBackendArg, CLI};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = CLI::try_parse()?;

    let _telemetry = parkspot_telemetry::init(
        TelemetryConfig::builder()
            .service_name("parkspot-gateway")
            .format(config.log_format.into())
            .otlp_endpoint(config.otlp_endpoint.clone())
            .build(),
    )?;

    info!(
        listen_addr = %config.listen_addr,
        storage_backend = %config.storage,
        "starting parking control gateway"
    );

    let spots: Arc<dyn ParkingSpots> = match config.storage {
        StorageBackendArg::InMemory => Arc::new(ParkingSpotService::new(InMemoryRepository::new())),
        StorageBackendArg::Mysql => {
            let mysql_dsn = config
                .mysql_dsn
                .ok_or("mysql dsn is required when storage backend is mysql")?;
            let repository =
                MySqlRepository::connect(&mysql_dsn, config.mysql_max_connections).await?;
            repository.ensure_schema().await?;
            Arc::new(ParkingSpotService::new(repository))
        }
    };

    let listener = TcpListener::bind(config.listen_addr).await?;
    info!(addr = %listener.local_addr()?, "listening");

    axum::serve(listener, App::router(AppState::new(spots)))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("gateway stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(%err, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(%err, "failed to install SIGTERM handler");
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

    info!("shutdown signal received");
}
