use std::net::SocketAddr;

use tower_http::trace::TraceLayer;

use meter_server::routes;
use meter_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()))
        .init();

    let cfg = meter_core::load_config()?;
    let state = AppState::init(&cfg).await?;

    let app = routes::router(state).layer(TraceLayer::new_for_http());

    tracing::info!(address = %cfg.server.bind, "meter-server listening");
    let listener = tokio::net::TcpListener::bind(&cfg.server.bind).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}
