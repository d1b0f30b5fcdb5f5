// session-control-rs/src/main.rs
// Session Control Service - HTTP entry point
//
// Hosts POST /api/v1/start behind a declarative validation chain,
// a global rate limit, and the usual health/root endpoints.

use session_control::{config, SessionControl, DEFAULT_PORT, START_TIME};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let _ = *START_TIME;

    let addr = config::get_bind_address("SESSION_CONTROL", DEFAULT_PORT);

    let app = SessionControl::create_router();

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Session control service starting on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
