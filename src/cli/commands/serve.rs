use anyhow::Result;
use std::{net::SocketAddr, path::Path};
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::Settings;
use crate::router::{create_router, documented_routes};
use crate::schemas::AppState;

pub async fn serve(bind_address: Option<String>, config_file: Option<&Path>) -> Result<()> {
    trace!("Entering serve function");
    info!("Forecast mock server starting up");

    // Load configuration
    trace!("Loading settings");
    let mut settings = match Settings::load(config_file) {
        Ok(settings) => {
            debug!("Settings loaded: {:?}", settings);
            settings
        }
        Err(e) => {
            error!("Failed to load settings: {}", e);
            return Err(e.into());
        }
    };
    if let Some(bind_address) = bind_address {
        settings.bind_address = bind_address;
    }
    let bind_address = settings.bind_address.clone();
    debug!("Bind address: {}", bind_address);

    if settings.log_routes {
        for (method, path) in documented_routes() {
            info!("ROUTE [{}] {}", method, path);
        }
    }

    // Create router
    trace!("Creating application router");
    let app = create_router(AppState::new(settings));
    debug!("Router created successfully");

    // Start server
    info!("Starting server on {}", bind_address);
    trace!("Attempting to bind TCP listener to {}", bind_address);
    let listener = match TcpListener::bind(&bind_address).await {
        Ok(listener) => {
            debug!("Successfully bound to address: {}", bind_address);
            listener
        }
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("Forecast mock API running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);
    debug!("Server is ready to accept connections");

    trace!("Starting axum server");
    let service = app.into_make_service_with_connect_info::<SocketAddr>();
    if let Err(e) = axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}

/// Resolves on Ctrl-C, or SIGTERM on unix.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("Failed to listen for SIGTERM: {}", e);
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

    info!("Shutdown signal received");
}
