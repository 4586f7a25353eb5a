use axum::http::{header::CONTENT_TYPE, HeaderName, Method};
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use tenancy_api::{create_router, AppState};
use tenancy_core::services::bootstrap;
use tenancy_infrastructure::connect_store;
use tenancy_shared::config::AppConfig;
use tenancy_shared::constants::{HEADER_API_KEY, HEADER_IDENTITY_PROVIDER_ID, HEADER_TENANT_ID};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env
    dotenvy::dotenv().ok();

    // Initialize telemetry
    tenancy_shared::telemetry::init_telemetry();

    info!("Tenancy server starting...");

    // Load configuration
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    // Store (postgres is migrated on connect)
    let backend = connect_store(&config.database).await?;

    // Seed master tenant and admin
    let outcome = bootstrap::seed(backend.clone(), &config.auth).await?;
    info!("Bootstrap: {:?}", outcome);

    let state = AppState::new(backend, config.clone());

    let mut allowed_headers = vec![CONTENT_TYPE];
    for name in [HEADER_API_KEY, HEADER_TENANT_ID, HEADER_IDENTITY_PROVIDER_ID] {
        allowed_headers.push(HeaderName::from_bytes(name.as_bytes())?);
    }

    let app = create_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(
            CorsLayer::new()
                .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
                .allow_headers(allowed_headers),
        );

    // Bind address
    let host: std::net::IpAddr = config.app.host.parse()?;
    let addr = SocketAddr::from((host, config.app.port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
