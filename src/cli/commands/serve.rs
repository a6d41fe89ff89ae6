use anyhow::Result;
use tokio::net::TcpListener;
use tracing::{debug, error, info, trace};

use crate::config::{initialize_app_state_with_url, Settings};
use crate::router::create_router;

pub async fn serve(settings: &Settings) -> Result<()> {
    trace!("Entering serve function");
    info!("fundsadmin starting up");
    debug!("Database URL: {}", settings.database_url);
    debug!("Bind address: {}", settings.bind_address);

    let state = match initialize_app_state_with_url(&settings.database_url).await {
        Ok(state) => {
            debug!("Application state initialized successfully");
            state
        }
        Err(e) => {
            error!("Failed to initialize application state: {}", e);
            return Err(e);
        }
    };

    let app = create_router(state, settings);
    debug!("Router created successfully");

    let bind_address = &settings.bind_address;
    info!("Starting server on {}", bind_address);
    let listener = match TcpListener::bind(bind_address).await {
        Ok(listener) => listener,
        Err(e) => {
            error!("Failed to bind to address {}: {}", bind_address, e);
            return Err(e.into());
        }
    };

    info!("fundsadmin API server running on http://{}", bind_address);
    info!("Swagger UI available at http://{}/swagger-ui", bind_address);

    if let Err(e) = axum::serve(listener, app).await {
        error!("Server error: {}", e);
        return Err(e.into());
    }

    info!("Server shutdown gracefully");
    Ok(())
}
