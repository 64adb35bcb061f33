// SPDX-FileCopyrightText: 2026 sqlpilot Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! `sqlpilot serve`: run the HTTP API until interrupted.

use std::sync::Arc;

use sqlpilot_config::SqlPilotConfig;
use sqlpilot_core::SqlPilotError;
use sqlpilot_gateway::{AppState, ServerConfig, start_server};
use tracing::{info, warn};

use crate::app::build_service;

pub async fn run_serve(config: SqlPilotConfig) -> Result<(), SqlPilotError> {
    info!(service = %config.service.name, "starting sqlpilot serve");

    let service = Arc::new(build_service(&config).await?);
    let state = AppState::new(service.clone());
    let server = ServerConfig {
        host: config.server.host.clone(),
        port: config.server.port,
    };

    let served = start_server(&server, state, shutdown_signal()).await;
    if let Err(e) = service.close().await {
        warn!(error = %e, "failed to close conversation store");
    }
    served?;
    info!("sqlpilot serve shutdown complete");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};
        match signal(SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => info!("received ctrl-c, shutting down"),
        () = terminate => info!("received SIGTERM, shutting down"),
    }
}
